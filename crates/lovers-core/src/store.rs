//! The `EventStore` trait.
//!
//! Implemented by storage backends (e.g. `lovers-store-sqlite`). The backend
//! is responsible for referential integrity, uniqueness and transactions;
//! the rules about the status log and the invitation graph are expressed
//! through the types and helpers in this crate and must be upheld by every
//! implementation.

use std::future::Future;

use crate::{
  event::{Event, Location, NewEvent, NewLocation},
  id::{EventId, IndividualId, LocationId, ParticipationId},
  identity::{Individual, NewParticipant, NewPerson, Orientation, Participant, Person},
  participation::{NewParticipation, Participation},
  status::{NewStatusEntry, ParticipationStatus, StatusEntry, StatusLog},
};

/// Abstraction over a Lovers' Base storage backend.
///
/// Status entries are append-only: there is no method that changes or
/// removes one. Participations are permanent once created.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Individuals ───────────────────────────────────────────────────────

  /// Allocate a fresh individual id with no facets attached.
  fn allocate_individual(
    &self,
  ) -> impl Future<Output = Result<IndividualId, Self::Error>> + Send + '_;

  /// Retrieve an individual together with whichever facets exist.
  fn get_individual(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<Option<Individual>, Self::Error>> + Send + '_;

  /// Remove an individual id. Fails while any facet still refers to it.
  fn delete_individual(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Person facet ──────────────────────────────────────────────────────

  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  fn get_person(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Purge contact data. The participant facet and its history stay.
  /// Returns `false` if there was no person facet.
  fn delete_person(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Replace the person's spoken languages. Index 0 is the preferred one.
  fn set_languages(
    &self,
    id: IndividualId,
    languages: Vec<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Spoken languages in priority order.
  fn languages(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Participant facet ─────────────────────────────────────────────────

  fn add_participant(
    &self,
    input: NewParticipant,
  ) -> impl Future<Output = Result<Participant, Self::Error>> + Send + '_;

  fn get_participant(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  /// Replace (or with `None`, remove) the participant's orientation record.
  fn set_orientation(
    &self,
    id: IndividualId,
    orientation: Option<Orientation>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the participant facet and its orientation. Fails while the
  /// participant has participations.
  fn delete_participant(
    &self,
    id: IndividualId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Locations and events ──────────────────────────────────────────────

  fn add_location(
    &self,
    input: NewLocation,
  ) -> impl Future<Output = Result<Location, Self::Error>> + Send + '_;

  fn get_location(
    &self,
    id: LocationId,
  ) -> impl Future<Output = Result<Option<Location>, Self::Error>> + Send + '_;

  fn add_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: EventId,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  fn find_event<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + 'a;

  /// All participations of an event, oldest first.
  fn event_participations(
    &self,
    event: EventId,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + '_;

  // ── Participations ────────────────────────────────────────────────────

  /// Create a participation together with its first status entry (position
  /// 0). Either both are stored or neither is.
  ///
  /// Fails if the participant is already registered for the event, or if
  /// the invitation source belongs to another event.
  fn create_participation(
    &self,
    input: NewParticipation,
  ) -> impl Future<Output = Result<(Participation, StatusEntry), Self::Error>> + Send + '_;

  fn get_participation(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<Option<Participation>, Self::Error>> + Send + '_;

  /// All participations of a participant, oldest first.
  fn participations_of(
    &self,
    participant: IndividualId,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + '_;

  fn set_participation_notes(
    &self,
    id: ParticipationId,
    notes: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Re-point (or clear) who invited a participation. Rejects links across
  /// events, self-invitation and anything that would close a cycle.
  fn set_invitation_source(
    &self,
    id: ParticipationId,
    source: Option<ParticipationId>,
  ) -> impl Future<Output = Result<Participation, Self::Error>> + Send + '_;

  // ── Status log ────────────────────────────────────────────────────────

  /// Append a status entry at the next free position.
  fn append_status(
    &self,
    id: ParticipationId,
    entry: NewStatusEntry,
  ) -> impl Future<Output = Result<StatusEntry, Self::Error>> + Send + '_;

  fn status_log(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<StatusLog, Self::Error>> + Send + '_;

  /// Status of the entry with the highest position.
  fn current_status(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<ParticipationStatus, Self::Error>> + Send + '_;

  // ── Invitation graph ──────────────────────────────────────────────────

  /// The participant behind this participation's invitation source.
  fn get_inviter(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  /// Participants this participation invited directly, in invitation order.
  fn get_companions(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<Vec<Participant>, Self::Error>> + Send + '_;

  /// The invitation chain up to the root, nearest inviter first.
  fn ancestors(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + '_;

  /// Everyone invited directly or transitively, breadth-first.
  fn descendants(
    &self,
    id: ParticipationId,
  ) -> impl Future<Output = Result<Vec<Participation>, Self::Error>> + Send + '_;
}
