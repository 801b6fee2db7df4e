//! Newtype wrappers around [`uuid::Uuid`] for domain entity identifiers.
//!
//! Book and comment identities come from uploaded CSV files and stay plain
//! strings; identifiers minted by BookLens itself get a distinct type so
//! they cannot be confused with user-supplied keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `Uuid`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Return the inner UUID value.
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for an uploaded CSV batch.
    UploadId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_id_new_is_unique() {
        let id1 = UploadId::new();
        let id2 = UploadId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_upload_id_display_roundtrip() {
        let id = UploadId::new();
        let parsed: UploadId = id.to_string().parse().expect("should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = UploadId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        let parsed: UploadId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }
}
