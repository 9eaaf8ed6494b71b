//! The participation status log.
//!
//! Every participation owns an ordered, append-only sequence of status
//! entries keyed by `(participation_id, position)`. Positions start at 0 and
//! grow by one per append. The current status is the status of the entry with
//! the highest position. Entry timestamps describe when something happened in
//! the real world; they may be backdated and play no part in ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{Error, Result, id::ParticipationId};

// ─── Status ──────────────────────────────────────────────────────────────────

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
pub enum ParticipationStatus {
  /// The organisers sent an invitation.
  Invited,
  /// An invitation was turned down.
  Declined,
  /// Signed up and waiting for a decision.
  Signed,
  /// Sign-up turned down by the organisers.
  Rejected,
  /// On the waiting list.
  Queued,
  Accepted,
  /// Backed out after being told they were accepted.
  Withdrew,
  /// Backed out after signing up.
  Cancelled,
  /// Accepted but never showed up.
  Faded,
  Participated,
}

// ─── Entries ─────────────────────────────────────────────────────────────────

/// A persisted status transition. Never mutated once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
  pub participation_id: ParticipationId,
  pub position:         u32,
  /// When the change happened, not when it was recorded.
  pub timestamp:        DateTime<Utc>,
  pub status:           ParticipationStatus,
  pub notes:            Option<String>,
}

/// Input to [`crate::store::EventStore::append_status`]. The position is
/// always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewStatusEntry {
  pub status:    ParticipationStatus,
  pub timestamp: DateTime<Utc>,
  pub notes:     Option<String>,
}

impl NewStatusEntry {
  pub fn new(status: ParticipationStatus, timestamp: DateTime<Utc>) -> Self {
    Self { status, timestamp, notes: None }
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }

  pub fn at_position(self, participation_id: ParticipationId, position: u32) -> StatusEntry {
    StatusEntry {
      participation_id,
      position,
      timestamp: self.timestamp,
      status: self.status,
      notes: self.notes,
    }
  }
}

// ─── Log ─────────────────────────────────────────────────────────────────────

/// A read snapshot of one participation's status history, in position order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLog {
  participation_id: ParticipationId,
  entries:          Vec<StatusEntry>,
}

impl StatusLog {
  /// Builds a log from stored entries in any order. Fails if the positions
  /// are not exactly `0..n`.
  pub fn from_entries(
    participation_id: ParticipationId,
    mut entries: Vec<StatusEntry>,
  ) -> Result<Self> {
    entries.sort_by_key(|e| e.position);
    for (expected, entry) in (0u32..).zip(&entries) {
      if entry.position != expected || entry.participation_id != participation_id {
        return Err(Error::LogGap {
          participation: participation_id,
          expected,
          found: entry.position,
        });
      }
    }
    Ok(Self { participation_id, entries })
  }

  pub fn participation_id(&self) -> ParticipationId { self.participation_id }

  pub fn entries(&self) -> &[StatusEntry] { &self.entries }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }

  /// The position the next append will receive.
  pub fn next_position(&self) -> u32 { self.entries.len() as u32 }

  /// The most recently appended entry.
  pub fn current(&self) -> Result<&StatusEntry> {
    self
      .entries
      .last()
      .ok_or(Error::EmptyLog(self.participation_id))
  }

  pub fn current_status(&self) -> Result<ParticipationStatus> {
    self.current().map(|e| e.status)
  }

  /// The last appended entry whose timestamp is at or before `moment`.
  ///
  /// This answers "what had we recorded as having happened by then" for
  /// audit purposes. It is not the current status.
  pub fn latest_as_of(&self, moment: DateTime<Utc>) -> Option<&StatusEntry> {
    self.entries.iter().rev().find(|e| e.timestamp <= moment)
  }
}
