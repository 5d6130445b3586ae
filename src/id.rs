//! Typed entity identifiers.
//!
//! Identifiers are UUID-formatted strings wrapped in per-entity newtypes so
//! that a session id can never be passed where a user id is expected. They
//! are constructed either through the validating [`new`](SessionId::new)
//! constructor or generated fresh with [`generate`](SessionId::generate);
//! the inner string is never writable directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AuthError;

/// Hyphenated UUID strings are always 36 characters.
const ID_LENGTH: usize = 36;

fn validate(value: &str) -> Result<(), AuthError> {
    if value.len() != ID_LENGTH {
        return Err(AuthError::InvalidIdentifier(value.to_owned()));
    }
    Ok(())
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an existing identifier string.
            ///
            /// # Errors
            ///
            /// Returns `AuthError::InvalidIdentifier` unless the value is a
            /// 36-character UUID-formatted string.
            pub fn new(value: impl Into<String>) -> Result<Self, AuthError> {
                let value = value.into();
                validate(&value)?;
                Ok(Self(value))
            }

            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id! {
    /// Identifier of an access [`Session`](crate::Session).
    SessionId
}

entity_id! {
    /// Identifier of the registered [`User`](crate::User).
    UserId
}

entity_id! {
    /// Identifier of a [`Gatekeeper`](crate::Gatekeeper).
    GatekeeperId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_is_36_characters() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_new_accepts_uuid_string() {
        let raw = uuid::Uuid::new_v4().to_string();
        let id = UserId::new(raw.clone()).unwrap();
        assert_eq!(id.as_str(), raw);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert_eq!(
            GatekeeperId::new("too-short"),
            Err(AuthError::InvalidIdentifier("too-short".to_owned()))
        );
        assert!(SessionId::new("").is_err());
        assert!(SessionId::new("x".repeat(37)).is_err());
    }

    #[test]
    fn test_serde_round_trip_is_transparent() {
        let id = SessionId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));

        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
