//! Domain types for the marketplace with strong typing.
//!
//! Newtype identifiers keep ad, category, tag and user ids from being mixed up
//! at call sites that take several of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an ad.
///
/// # Examples
///
/// ```rust
/// use goodcorner::domain::AdId;
///
/// let id: AdId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
/// assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdId(Uuid);

impl AdId {
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub const fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AdId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<AdId> for Uuid {
    fn from(id: AdId) -> Self {
        id.0
    }
}

impl FromStr for AdId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

int_id!(
    /// Identifier of a category. Every ad belongs to exactly one.
    CategoryId
);

int_id!(
    /// Identifier of a tag.
    TagId
);

int_id!(
    /// Identifier of a user, the owner of an ad.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_id_parse_and_display() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let id: AdId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
        assert!("not-a-uuid".parse::<AdId>().is_err());
    }

    #[test]
    fn int_id_conversions() {
        let id = CategoryId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(i32::from(id), 7);
        assert_eq!(CategoryId::from(7), id);
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&TagId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: UserId = serde_json::from_str("12").unwrap();
        assert_eq!(back, UserId::new(12));

        let ad = AdId::new_random();
        let json = serde_json::to_string(&ad).unwrap();
        assert_eq!(json, format!("\"{ad}\""));
    }
}
