//! Events and the venues they take place in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{
  Error, Result,
  id::{EventId, LocationId},
  language::validate_language,
};

// ─── Location ────────────────────────────────────────────────────────────────

/// Bookkeeping data for a venue. Descriptive material lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub id:      LocationId,
  /// Unique across all locations.
  pub name:    String,
  pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
  pub name:    String,
  pub address: Option<String>,
}

// ─── Event ───────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
  ArtProject,
  GentleOrgy,
  Meeting,
  Workshop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
  pub id:          EventId,
  /// Unique across all events.
  pub name:        String,
  pub kind:        EventKind,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  /// Language of the common programme.
  pub language:    Option<String>,
  pub location_id: Option<LocationId>,
}

/// Input to [`crate::store::EventStore::add_event`].
#[derive(Debug, Clone)]
pub struct NewEvent {
  pub name:        String,
  pub kind:        EventKind,
  pub start_time:  DateTime<Utc>,
  pub end_time:    DateTime<Utc>,
  pub language:    Option<String>,
  pub location_id: Option<LocationId>,
}

impl NewEvent {
  pub fn new(
    name: impl Into<String>,
    kind: EventKind,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
  ) -> Self {
    Self {
      name: name.into(),
      kind,
      start_time,
      end_time,
      language: None,
      location_id: None,
    }
  }

  /// Checks everything that does not need the database.
  pub fn validate(&self) -> Result<()> {
    if self.end_time < self.start_time {
      return Err(Error::InvalidTimeRange {
        start: self.start_time,
        end:   self.end_time,
      });
    }
    if let Some(language) = &self.language {
      validate_language(language)?;
    }
    Ok(())
  }

  pub fn into_event(self, id: EventId) -> Event {
    Event {
      id,
      name: self.name,
      kind: self.kind,
      start_time: self.start_time,
      end_time: self.end_time,
      language: self.language,
      location_id: self.location_id,
    }
  }
}
