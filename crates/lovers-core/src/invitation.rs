//! The invitation graph.
//!
//! Participations point at the participation of whoever invited them through
//! `invitation_source`. Links never cross events and never form a cycle, so
//! within each event the graph is a forest. Both rules are enforced on write
//! by [`validate_inviter`]; the storage layer does not check them.
//!
//! Traversals work over id lookups through a [`LinkSource`] and are
//! iterative, so deep chains cannot overflow the stack.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{
  Error, InviterRejection,
  id::{EventId, ParticipationId},
};

/// The part of a participation the graph algorithms need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationLink {
  pub id:                ParticipationId,
  pub event_id:          EventId,
  pub invitation_source: Option<ParticipationId>,
}

/// Read access to invitation links, typically backed by a database
/// connection inside a transaction.
pub trait LinkSource {
  type Error: From<Error>;

  fn link(&self, id: ParticipationId) -> Result<Option<InvitationLink>, Self::Error>;

  /// Participations whose `invitation_source` is `id`, in invitation order.
  fn invitees(&self, id: ParticipationId) -> Result<Vec<ParticipationId>, Self::Error>;
}

fn missing(id: ParticipationId) -> Error {
  Error::ReferentialIntegrity(format!("participation {id} does not exist"))
}

// ─── Ancestors ───────────────────────────────────────────────────────────────

/// Lazily walks the `invitation_source` chain towards the root, nearest
/// inviter first. The starting participation itself is not yielded.
///
/// A chain that revisits a node yields a single
/// [`InviterRejection::Cycle`] error and then ends.
pub struct Ancestors<'s, S: LinkSource> {
  source: &'s S,
  next:   Option<ParticipationId>,
  seen:   HashSet<ParticipationId>,
}

pub fn ancestors<'s, S: LinkSource>(source: &'s S, start: &InvitationLink) -> Ancestors<'s, S> {
  Ancestors {
    source,
    next: start.invitation_source,
    seen: HashSet::from([start.id]),
  }
}

impl<S: LinkSource> Iterator for Ancestors<'_, S> {
  type Item = Result<InvitationLink, S::Error>;

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.next.take()?;
    if !self.seen.insert(id) {
      return Some(Err(Error::from(InviterRejection::Cycle(id)).into()));
    }
    match self.source.link(id) {
      Ok(Some(link)) => {
        self.next = link.invitation_source;
        Some(Ok(link))
      }
      Ok(None) => Some(Err(missing(id).into())),
      Err(e) => Some(Err(e)),
    }
  }
}

// ─── Descendants ─────────────────────────────────────────────────────────────

/// Breadth-first walk of everyone invited, directly or transitively, by
/// `root`. The root itself is excluded.
pub fn descendants<S: LinkSource>(
  source: &S,
  root: ParticipationId,
) -> Result<Vec<ParticipationId>, S::Error> {
  let mut seen = HashSet::from([root]);
  let mut queue = VecDeque::from([root]);
  let mut out = Vec::new();

  while let Some(id) = queue.pop_front() {
    for child in source.invitees(id)? {
      if !seen.insert(child) {
        return Err(Error::from(InviterRejection::Cycle(child)).into());
      }
      out.push(child);
      queue.push_back(child);
    }
  }
  Ok(out)
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Checks that `inviter` may be the invitation source of a participation in
/// `event`.
///
/// `subject` is the participation being (re)linked, or `None` when it does not
/// exist yet. Rejects a missing inviter, an inviter from another event, a
/// self-invitation, and any link that would make the chain loop.
pub fn validate_inviter<S: LinkSource>(
  source: &S,
  subject: Option<ParticipationId>,
  event: EventId,
  inviter: ParticipationId,
) -> Result<(), S::Error> {
  if subject == Some(inviter) {
    return Err(Error::from(InviterRejection::SelfInvitation(inviter)).into());
  }

  let link = source.link(inviter)?.ok_or_else(|| missing(inviter))?;
  if link.event_id != event {
    return Err(
      Error::from(InviterRejection::CrossEvent {
        inviter,
        inviter_event: link.event_id,
        event,
      })
      .into(),
    );
  }

  let Some(subject) = subject else {
    return Ok(());
  };
  for ancestor in ancestors(source, &link) {
    if ancestor?.id == subject {
      return Err(Error::from(InviterRejection::Cycle(inviter)).into());
    }
  }
  Ok(())
}
