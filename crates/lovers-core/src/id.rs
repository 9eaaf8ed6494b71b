//! Integer identifiers for stored records.
//!
//! Identifiers are references by value; no type in this crate holds a live
//! pointer to another record.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl From<i64> for $name {
      fn from(value: i64) -> Self { Self(value) }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  };
}

id_type!(
  /// Shared id of a human being. Both the Person and the Participant facet
  /// use it as their own key.
  IndividualId
);
id_type!(LocationId);
id_type!(EventId);
id_type!(ParticipationId);
