//! Secure credential handling using the secrecy crate
//!
//! AWS secret keys and session tokens are wrapped in [`SecretString`] so they
//! are zeroized on drop and redacted from `Debug` output.
//!
//! # Example
//!
//! ```rust
//! use logvault::config::{secret_string, SecretString};
//! use secrecy::ExposeSecret;
//!
//! let key: SecretString = secret_string("wJalrXUtnFEMI/K7MDENG");
//! assert_eq!(key.expose_secret().as_ref(), "wJalrXUtnFEMI/K7MDENG");
//! assert!(!format!("{key:?}").contains("wJalr"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string: zeroized on drop, redacted in Debug, explicit `expose_secret()`
pub type SecretString = Secret<SecretValue>;

/// Wrap a plain string as a [`SecretString`]
pub fn secret_string(value: impl Into<String>) -> SecretString {
    Secret::new(SecretValue::from(value.into()))
}

/// Wrap an optional plain string as an optional [`SecretString`]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}
