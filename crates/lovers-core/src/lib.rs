//! Core types and trait definitions for Lovers' Base.
//!
//! This crate holds the event-participation model: identities and their
//! facets, events, participations with their append-only status logs, and the
//! invitation graph. It is free of database dependencies; storage backends
//! implement [`store::EventStore`].

#![allow(async_fn_in_trait)]

pub mod error;
pub mod event;
pub mod id;
pub mod identity;
pub mod invitation;
pub mod language;
pub mod participation;
pub mod status;
pub mod store;

pub use error::{Entity, Error, InviterRejection, Result};
pub use id::{EventId, IndividualId, LocationId, ParticipationId};
