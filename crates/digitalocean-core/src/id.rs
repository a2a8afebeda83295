//! Strongly-typed numeric identifiers for DigitalOcean resources.
//!
//! The API assigns plain integer ids. Wrapping them keeps a droplet id from
//! being passed where an image id is expected. The decimal rendering from
//! [`Display`](std::fmt::Display) is what goes into request paths.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Accepts an id sent either as a JSON number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

/// Macro to generate strongly-typed numeric id wrappers.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw id.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Parses an id from its decimal rendering.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is not a non-negative integer.
            pub fn parse_str(input: &str) -> Result<Self> {
                input
                    .trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| Error::InvalidRequest(format!(
                        "invalid {}: `{input}`",
                        stringify!($name)
                    )))
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                match RawId::deserialize(deserializer)? {
                    RawId::Number(id) => Ok(Self(id)),
                    RawId::Text(text) => {
                        Self::parse_str(&text).map_err(serde::de::Error::custom)
                    }
                }
            }
        }
    };
}

numeric_id!(DropletId, "Droplet id");
numeric_id!(ImageId, "Image id");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_decimal() {
        assert_eq!(DropletId::new(25).to_string(), "25");
        assert_eq!(ImageId::new(449_676_389).to_string(), "449676389");
    }

    #[test]
    fn test_parse_str() {
        assert_eq!(DropletId::parse_str("25").unwrap(), DropletId::new(25));
        assert_eq!(" 7 ".parse::<ImageId>().unwrap(), ImageId::new(7));
    }

    #[test]
    fn test_parse_str_invalid() {
        let err = DropletId::parse_str("droplet-25").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(DropletId::parse_str("-1").is_err());
    }

    #[test]
    fn test_deserialize_number_or_string() {
        let from_number: DropletId = serde_json::from_str("25").unwrap();
        let from_string: DropletId = serde_json::from_str("\"25\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<ImageId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<ImageId>("true").is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&DropletId::new(25)).unwrap(), "25");
    }

    #[test]
    fn test_conversions() {
        let id: DropletId = 42u64.into();
        let raw: u64 = id.into();
        assert_eq!(raw, 42);
        assert_eq!(id.get(), 42);
    }
}
