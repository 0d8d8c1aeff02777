use simplerest_auth::Principal;

/// Principal context for a request.
///
/// Always present on routed requests. `None` means the request carried no
/// credentials at all; requests with bad credentials never get this far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPrincipal(Option<Principal>);

impl RequestPrincipal {
    pub fn new(principal: Option<Principal>) -> Self {
        Self(principal)
    }

    pub fn get(&self) -> Option<&Principal> {
        self.0.as_ref()
    }
}
