//! Anonymous session identity.
//!
//! A [`SessionId`] is minted once when the plugin loads and lives as long as
//! the plugin instance. It attributes feedback and personalizes
//! recommendations. It is not persisted, and it is not a security token.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const PREFIX: &str = "user_";
const TOKEN_LEN: usize = 9;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identifier of the current client session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Mints a new `user_xxxxxxxxx` identifier from nine random base-36 digits.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token: String = (0..TOKEN_LEN)
            .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
            .collect();
        Self(format!("{PREFIX}{token}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
