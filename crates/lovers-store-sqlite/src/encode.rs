//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Enums are stored as their
//! snake_case names. Rows are first read into `Raw*` structs on the
//! connection thread and decoded afterwards.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use lovers_core::{
  EventId, IndividualId, LocationId, ParticipationId,
  event::Event,
  identity::{Orientation, Participant, Person},
  participation::Participation,
  status::StatusEntry,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_variant<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| {
    lovers_core::Error::UnknownVariant { kind, value: s.to_owned() }.into()
  })
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const PERSON_SELECT: &str = "SELECT id, first_names, last_name, nickname, email, phone, allergies
   FROM persons";

pub const PARTICIPANT_SELECT: &str = "SELECT p.id, p.birth_year, p.genitalia,
          o.id, o.female, o.male, o.other, o.comment
   FROM participants p
   LEFT JOIN orientations o ON o.id = p.id";

pub const EVENT_SELECT: &str = "SELECT id, name, kind, start_time, end_time, language, location_id
   FROM events";

pub const PARTICIPATION_SELECT: &str = "SELECT id, participant_id, event_id, role, notes, invitation_source_id
   FROM participations";

pub const STATUS_SELECT: &str = "SELECT participation_id, position, timestamp, status, notes
   FROM status_log";

// ─── Person ──────────────────────────────────────────────────────────────────

/// Persons hold only text, so they decode directly from the row.
pub fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:          IndividualId(row.get(0)?),
    first_names: row.get(1)?,
    last_name:   row.get(2)?,
    nickname:    row.get(3)?,
    email:       row.get(4)?,
    phone:       row.get(5)?,
    allergies:   row.get(6)?,
  })
}

// ─── Participant ─────────────────────────────────────────────────────────────

/// A `participants` row left-joined with `orientations`.
pub struct RawParticipant {
  pub id:             i64,
  pub birth_year:     Option<i32>,
  pub genitalia:      String,
  pub orientation_id: Option<i64>,
  pub female:         Option<i64>,
  pub male:           Option<i64>,
  pub other:          Option<i64>,
  pub comment:        Option<String>,
}

impl RawParticipant {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      birth_year:     row.get(1)?,
      genitalia:      row.get(2)?,
      orientation_id: row.get(3)?,
      female:         row.get(4)?,
      male:           row.get(5)?,
      other:          row.get(6)?,
      comment:        row.get(7)?,
    })
  }

  pub fn into_participant(self) -> Result<Participant> {
    let orientation = self.orientation_id.map(|_| Orientation {
      female:  self.female,
      male:    self.male,
      other:   self.other,
      comment: self.comment,
    });
    Ok(Participant {
      id: IndividualId(self.id),
      birth_year: self.birth_year,
      genitalia: decode_variant("genitalia", &self.genitalia)?,
      orientation,
    })
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

pub struct RawEvent {
  pub id:          i64,
  pub name:        String,
  pub kind:        String,
  pub start_time:  String,
  pub end_time:    String,
  pub language:    Option<String>,
  pub location_id: Option<i64>,
}

impl RawEvent {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      kind:        row.get(2)?,
      start_time:  row.get(3)?,
      end_time:    row.get(4)?,
      language:    row.get(5)?,
      location_id: row.get(6)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:          EventId(self.id),
      name:        self.name,
      kind:        decode_variant("event kind", &self.kind)?,
      start_time:  decode_dt(&self.start_time)?,
      end_time:    decode_dt(&self.end_time)?,
      language:    self.language,
      location_id: self.location_id.map(LocationId),
    })
  }
}

// ─── Participation ───────────────────────────────────────────────────────────

pub struct RawParticipation {
  pub id:                   i64,
  pub participant_id:       i64,
  pub event_id:             i64,
  pub role:                 String,
  pub notes:                Option<String>,
  pub invitation_source_id: Option<i64>,
}

impl RawParticipation {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      participant_id:       row.get(1)?,
      event_id:             row.get(2)?,
      role:                 row.get(3)?,
      notes:                row.get(4)?,
      invitation_source_id: row.get(5)?,
    })
  }

  pub fn into_participation(self) -> Result<Participation> {
    Ok(Participation {
      id:                ParticipationId(self.id),
      participant_id:    IndividualId(self.participant_id),
      event_id:          EventId(self.event_id),
      role:              decode_variant("role", &self.role)?,
      notes:             self.notes,
      invitation_source: self.invitation_source_id.map(ParticipationId),
    })
  }
}

// ─── Status entry ────────────────────────────────────────────────────────────

pub struct RawStatusEntry {
  pub participation_id: i64,
  pub position:         u32,
  pub timestamp:        String,
  pub status:           String,
  pub notes:            Option<String>,
}

impl RawStatusEntry {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      participation_id: row.get(0)?,
      position:         row.get(1)?,
      timestamp:        row.get(2)?,
      status:           row.get(3)?,
      notes:            row.get(4)?,
    })
  }

  pub fn into_entry(self) -> Result<StatusEntry> {
    Ok(StatusEntry {
      participation_id: ParticipationId(self.participation_id),
      position:         self.position,
      timestamp:        decode_dt(&self.timestamp)?,
      status:           decode_variant("participation status", &self.status)?,
      notes:            self.notes,
    })
  }
}
