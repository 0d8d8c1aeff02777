use serde::{Deserialize, Serialize};

use simplerest_core::{Entity, LangCode};

/// A greeting message for a given language code.
///
/// The language code is both part of the body and the key the greeting is
/// stored under, so creating and replacing share one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Greeting {
    pub lang: LangCode,
    pub message: String,
}

impl Greeting {
    pub fn new(lang: LangCode, message: impl Into<String>) -> Self {
        Self {
            lang,
            message: message.into(),
        }
    }
}

impl Entity for Greeting {
    type Key = LangCode;

    const KIND: &'static str = "greeting";

    fn key(&self) -> &LangCode {
        &self.lang
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str) -> LangCode {
        code.parse().unwrap()
    }

    #[test]
    fn greeting_key_is_its_language() {
        let g = Greeting::new(lang("de"), "Guten tag!");
        assert_eq!(g.key().as_str(), "de");
    }

    #[test]
    fn greeting_decodes_from_json() {
        let g: Greeting = serde_json::from_str(r#"{"lang":"en","message":"Good day to you"}"#).unwrap();
        assert_eq!(g, Greeting::new(lang("en"), "Good day to you"));
    }

    #[test]
    fn greeting_without_lang_is_rejected() {
        assert!(serde_json::from_str::<Greeting>(r#"{"message":"Hallo!"}"#).is_err());
    }
}
