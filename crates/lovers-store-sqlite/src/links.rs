//! [`LinkSource`] over a live connection, so invitation checks and
//! traversals run inside the caller's transaction.

use lovers_core::{
  EventId, ParticipationId,
  invitation::{InvitationLink, LinkSource},
};
use rusqlite::{Connection, OptionalExtension as _};

use crate::error::TxError;

pub(crate) struct SqlLinks<'c>(pub &'c Connection);

impl LinkSource for SqlLinks<'_> {
  type Error = TxError;

  fn link(&self, id: ParticipationId) -> Result<Option<InvitationLink>, TxError> {
    let link = self
      .0
      .query_row(
        "SELECT id, event_id, invitation_source_id FROM participations WHERE id = ?1",
        [id.get()],
        |row| {
          Ok(InvitationLink {
            id:                ParticipationId(row.get(0)?),
            event_id:          EventId(row.get(1)?),
            invitation_source: row.get::<_, Option<i64>>(2)?.map(ParticipationId),
          })
        },
      )
      .optional()?;
    Ok(link)
  }

  fn invitees(&self, id: ParticipationId) -> Result<Vec<ParticipationId>, TxError> {
    let mut stmt = self
      .0
      .prepare_cached("SELECT id FROM participations WHERE invitation_source_id = ?1 ORDER BY id")?;
    let ids = stmt
      .query_map([id.get()], |row| Ok(ParticipationId(row.get(0)?)))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
  }
}
