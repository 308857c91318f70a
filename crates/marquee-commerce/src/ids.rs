//! Newtype IDs for type-safe identifiers.
//!
//! Using newtypes prevents accidentally mixing up different ID types,
//! e.g., passing an ArtistId where an ItemId is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID is empty or only whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identity of a purchasable entity (product, gig or track); the cart's merge key.
    ItemId
);
define_id!(
    /// Identity of an artist profile.
    ArtistId
);
define_id!(
    /// Payment-provider checkout session identifier.
    CheckoutSessionId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ItemId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
        assert_eq!(format!("{}", id), "prod-123");
    }

    #[test]
    fn test_id_blank() {
        assert!(ItemId::new("  ").is_blank());
        assert!(!ItemId::new("gig-1").is_blank());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ArtistId::new("artist-9");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""artist-9""#);
        let back: ArtistId = serde_json::from_str(r#""artist-9""#).unwrap();
        assert_eq!(back, id);
    }
}
