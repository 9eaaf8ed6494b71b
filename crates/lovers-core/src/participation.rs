//! Participation records, one per participant per event.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::{
  id::{EventId, IndividualId, ParticipationId},
  invitation::InvitationLink,
  status::NewStatusEntry,
};

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
pub enum Role {
  Participant,
  Organizer,
  Assistant,
  Artist,
  Model,
  Staff,
}

/// Binds a participant to an event.
///
/// Status is not stored here; it lives in the participation's status log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
  pub id:                ParticipationId,
  pub participant_id:    IndividualId,
  pub event_id:          EventId,
  pub role:              Role,
  /// General notes, unrelated to status changes.
  pub notes:             Option<String>,
  /// The participation of whoever invited this participant. `None` means the
  /// organisers invited them directly.
  pub invitation_source: Option<ParticipationId>,
}

impl Participation {
  pub fn link(&self) -> InvitationLink {
    InvitationLink {
      id:                self.id,
      event_id:          self.event_id,
      invitation_source: self.invitation_source,
    }
  }
}

/// Input to [`crate::store::EventStore::create_participation`].
///
/// A participation can only be created together with its first status entry.
#[derive(Debug, Clone)]
pub struct NewParticipation {
  pub participant_id:    IndividualId,
  pub event_id:          EventId,
  pub role:              Role,
  pub notes:             Option<String>,
  pub invitation_source: Option<ParticipationId>,
  pub initial_status:    NewStatusEntry,
}

impl NewParticipation {
  pub fn new(
    participant_id: IndividualId,
    event_id: EventId,
    role: Role,
    initial_status: NewStatusEntry,
  ) -> Self {
    Self {
      participant_id,
      event_id,
      role,
      notes: None,
      invitation_source: None,
      initial_status,
    }
  }

  pub fn invited_by(mut self, source: ParticipationId) -> Self {
    self.invitation_source = Some(source);
    self
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }

  pub fn into_participation(self, id: ParticipationId) -> (Participation, NewStatusEntry) {
    let participation = Participation {
      id,
      participant_id: self.participant_id,
      event_id: self.event_id,
      role: self.role,
      notes: self.notes,
      invitation_source: self.invitation_source,
    };
    (participation, self.initial_status)
  }
}
