//! # Identifier Types
//!
//! Strongly-typed identifiers for the rate aggregation engine.
//!
//! UUID-based identifiers ([`RateId`], [`RequestId`]) are generated
//! with `new_v4()`. String-based identifiers ([`ProviderKey`]) wrap a
//! caller-supplied key.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[inline]
            #[must_use]
            pub fn get(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a universal rate.
    RateId
}

uuid_id! {
    /// Unique identifier for a rate-shopping run.
    RequestId
}

/// String-based identifier for a rate provider.
///
/// Provider keys are the primary identity across the merged registry;
/// a dynamically configured provider with the same key as a static one
/// supersedes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderKey(String);

impl ProviderKey {
    /// Creates a new provider key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rate_id_unique() {
        let a = RateId::new_v4();
        let b = RateId::new_v4();
        assert_ne!(a, b);
    }

    #[test]
    fn rate_id_from_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = RateId::from_uuid(uuid);
        assert_eq!(id.get(), uuid);
    }

    #[test]
    fn provider_key_display() {
        let key = ProviderKey::new("fastfreight");
        assert_eq!(key.to_string(), "fastfreight");
        assert_eq!(key.as_str(), "fastfreight");
    }

    #[test]
    fn provider_key_equality() {
        assert_eq!(ProviderKey::new("a"), ProviderKey::from("a"));
        assert_ne!(ProviderKey::new("a"), ProviderKey::new("A"));
    }

    #[test]
    fn serde_transparent() {
        let key = ProviderKey::new("pk");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"pk\"");
    }
}
