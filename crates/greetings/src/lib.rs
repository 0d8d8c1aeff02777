//! Greetings module (natural-key entities keyed by language code).

pub mod greeting;

pub use greeting::Greeting;
