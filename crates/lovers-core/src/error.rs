//! Error types for `lovers-core`.

use chrono::{DateTime, Utc};
use strum::Display;
use thiserror::Error;

use crate::id::{EventId, IndividualId, ParticipationId};

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Entity {
  Individual,
  Person,
  Participant,
  Location,
  Event,
  Participation,
}

/// Why an inviting participation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InviterRejection {
  #[error("inviter {inviter} belongs to event {inviter_event}, not {event}")]
  CrossEvent {
    inviter:       ParticipationId,
    inviter_event: EventId,
    event:         EventId,
  },

  #[error("participation {0} cannot invite itself")]
  SelfInvitation(ParticipationId),

  #[error("invitation chain through {0} leads back to the invitee")]
  Cycle(ParticipationId),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("participant {participant} is already registered for event {event}")]
  DuplicateParticipation {
    participant: IndividualId,
    event:       EventId,
  },

  #[error("invalid inviter: {0}")]
  InvalidInviter(#[from] InviterRejection),

  /// A participation without status entries. Participations are always
  /// created together with their first entry, so this is a data-integrity
  /// failure rather than a user error.
  #[error("status log of participation {0} is empty")]
  EmptyLog(ParticipationId),

  #[error("status log of participation {participation} expected position {expected}, found {found}")]
  LogGap {
    participation: ParticipationId,
    expected:      u32,
    found:         u32,
  },

  #[error("referential integrity violated: {0}")]
  ReferentialIntegrity(String),

  #[error("{entity} name {name:?} is already taken")]
  DuplicateName { entity: Entity, name: String },

  #[error("individual {0} already has a {1} record")]
  FacetExists(IndividualId, Entity),

  #[error("{0} not found: {1}")]
  NotFound(Entity, i64),

  #[error("invalid language code: {0:?}")]
  InvalidLanguage(String),

  #[error("event ends ({end}) before it starts ({start})")]
  InvalidTimeRange {
    start: DateTime<Utc>,
    end:   DateTime<Utc>,
  },

  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
