//! [`SqliteStore`]: the SQLite implementation of [`EventStore`].

use std::{path::Path, time::Duration};

use lovers_core::{
  Entity, Error as CoreError, EventId, IndividualId, LocationId, ParticipationId,
  event::{Event, Location, NewEvent, NewLocation},
  identity::{Individual, NewParticipant, NewPerson, Orientation, Participant, Person},
  invitation::{self, LinkSource as _, validate_inviter},
  language::validate_language,
  participation::{NewParticipation, Participation},
  status::{NewStatusEntry, ParticipationStatus, StatusEntry, StatusLog},
  store::EventStore,
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Error, Result, StoreConfig,
  encode::{
    EVENT_SELECT, PARTICIPANT_SELECT, PARTICIPATION_SELECT, PERSON_SELECT, RawEvent,
    RawParticipant, RawParticipation, RawStatusEntry, STATUS_SELECT, decode_variant, encode_dt,
    person_from_row,
  },
  error::{TxError, constraint, foreign_key, is_retryable, not_found},
  links::SqlLinks,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Lovers' Base store backed by a single SQLite database.
///
/// Cloning is cheap; the inner connection is reference-counted. All clones
/// share one connection thread; separate [`SqliteStore::open`] calls on the
/// same file get separate connections and coordinate through SQLite locking.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  append_retries:  u32,
}

impl SqliteStore {
  /// Open (or create) a store at `path` with default settings.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(&StoreConfig::at(path.as_ref())).await
  }

  /// Open an in-memory store, used in tests.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_with(&StoreConfig::default()).await
  }

  pub async fn open_with(config: &StoreConfig) -> Result<Self> {
    let conn = match &config.path {
      Some(path) => tokio_rusqlite::Connection::open(path).await?,
      None => tokio_rusqlite::Connection::open_in_memory().await?,
    };
    let store = Self { conn, append_retries: config.append_retries };
    store
      .init_schema(Duration::from_millis(config.busy_timeout_ms))
      .await?;
    tracing::info!(path = ?config.path, "opened event store");
    Ok(store)
  }

  async fn init_schema(&self, busy_timeout: Duration) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.busy_timeout(busy_timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Connection-thread helpers ───────────────────────────────────────────────

fn exists(conn: &Connection, table: &'static str, id: i64) -> rusqlite::Result<bool> {
  conn.query_row(
    &format!("SELECT EXISTS (SELECT 1 FROM {table} WHERE id = ?1)"),
    [id],
    |row| row.get(0),
  )
}

fn read_person(conn: &Connection, id: i64) -> rusqlite::Result<Option<Person>> {
  conn
    .query_row(&format!("{PERSON_SELECT} WHERE id = ?1"), [id], person_from_row)
    .optional()
}

fn read_participant(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawParticipant>> {
  conn
    .query_row(
      &format!("{PARTICIPANT_SELECT} WHERE p.id = ?1"),
      [id],
      RawParticipant::from_row,
    )
    .optional()
}

fn read_participation(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawParticipation>> {
  conn
    .query_row(
      &format!("{PARTICIPATION_SELECT} WHERE id = ?1"),
      [id],
      RawParticipation::from_row,
    )
    .optional()
}

/// Participations matching `column = value`, oldest first.
fn read_participations_by(
  conn: &Connection,
  column: &'static str,
  value: i64,
) -> rusqlite::Result<Vec<RawParticipation>> {
  let mut stmt = conn.prepare(&format!(
    "{PARTICIPATION_SELECT} WHERE {column} = ?1 ORDER BY id"
  ))?;
  let rows = stmt
    .query_map([value], RawParticipation::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn read_participations(
  conn: &Connection,
  ids: &[ParticipationId],
) -> Result<Vec<RawParticipation>, TxError> {
  ids
    .iter()
    .map(|id| {
      read_participation(conn, id.get())?
        .ok_or_else(|| not_found(Entity::Participation, id.get()))
    })
    .collect()
}

fn write_orientation(
  conn: &Connection,
  id: IndividualId,
  orientation: Option<&Orientation>,
) -> rusqlite::Result<()> {
  conn.execute("DELETE FROM orientations WHERE id = ?1", [id.get()])?;
  if let Some(o) = orientation {
    conn.execute(
      "INSERT INTO orientations (id, female, male, other, comment)
       VALUES (?1, ?2, ?3, ?4, ?5)",
      params![id.get(), o.female, o.male, o.other, o.comment],
    )?;
  }
  Ok(())
}

fn insert_entry(conn: &Connection, entry: &StatusEntry) -> rusqlite::Result<()> {
  conn.execute(
    "INSERT INTO status_log (participation_id, position, timestamp, status, notes)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      entry.participation_id.get(),
      entry.position,
      encode_dt(entry.timestamp),
      entry.status.as_ref(),
      entry.notes,
    ],
  )?;
  Ok(())
}

fn create_participation_tx(
  conn: &mut Connection,
  input: NewParticipation,
) -> Result<(Participation, StatusEntry), TxError> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  if let Some(source) = input.invitation_source {
    validate_inviter(&SqlLinks(&tx), None, input.event_id, source)?;
  }

  tx.execute(
    "INSERT INTO participations (participant_id, event_id, role, notes, invitation_source_id)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![
      input.participant_id.get(),
      input.event_id.get(),
      input.role.as_ref(),
      input.notes,
      input.invitation_source.map(ParticipationId::get),
    ],
  )
  .map_err(|e| {
    constraint(e, "participant and event must exist", || {
      CoreError::DuplicateParticipation {
        participant: input.participant_id,
        event:       input.event_id,
      }
    })
  })?;

  let id = ParticipationId(tx.last_insert_rowid());
  let (participation, initial) = input.into_participation(id);
  let entry = initial.at_position(id, 0);
  insert_entry(&tx, &entry)?;

  tx.commit()?;
  Ok((participation, entry))
}

fn relink_tx(
  conn: &mut Connection,
  id: ParticipationId,
  source: Option<ParticipationId>,
) -> Result<RawParticipation, TxError> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let links = SqlLinks(&tx);
  let link = links
    .link(id)?
    .ok_or_else(|| not_found(Entity::Participation, id.get()))?;
  if let Some(source) = source {
    validate_inviter(&links, Some(id), link.event_id, source)?;
  }

  tx.execute(
    "UPDATE participations SET invitation_source_id = ?1 WHERE id = ?2",
    params![source.map(ParticipationId::get), id.get()],
  )?;
  let raw = read_participation(&tx, id.get())?
    .ok_or_else(|| not_found(Entity::Participation, id.get()))?;

  tx.commit()?;
  Ok(raw)
}

/// One attempt at appending: read the highest position and insert the next
/// one inside a single write transaction.
fn try_append(
  conn: &mut Connection,
  id: ParticipationId,
  input: &NewStatusEntry,
) -> Result<StatusEntry, TxError> {
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  if !exists(&tx, "participations", id.get())? {
    return Err(not_found(Entity::Participation, id.get()));
  }
  let position: u32 = tx.query_row(
    "SELECT COALESCE(MAX(position) + 1, 0) FROM status_log WHERE participation_id = ?1",
    [id.get()],
    |row| row.get(0),
  )?;

  let entry = input.clone().at_position(id, position);
  insert_entry(&tx, &entry)?;
  tx.commit()?;
  Ok(entry)
}

fn append_tx(
  conn: &mut Connection,
  id: ParticipationId,
  input: &NewStatusEntry,
  retries: u32,
) -> Result<StatusEntry, TxError> {
  let mut attempt = 0;
  loop {
    match try_append(conn, id, input) {
      Err(TxError::Sql(e)) if attempt < retries && is_retryable(&e) => {
        attempt += 1;
        tracing::warn!(participation = %id, attempt, error = %e, "status append conflicted, retrying");
      }
      other => return other,
    }
  }
}

fn ancestors_tx(conn: &mut Connection, id: ParticipationId) -> Result<Vec<RawParticipation>, TxError> {
  let tx = conn.transaction()?;
  let links = SqlLinks(&tx);
  let start = links
    .link(id)?
    .ok_or_else(|| not_found(Entity::Participation, id.get()))?;
  let ids = invitation::ancestors(&links, &start)
    .map(|link| link.map(|l| l.id))
    .collect::<Result<Vec<_>, TxError>>()?;
  read_participations(&tx, &ids)
}

fn descendants_tx(
  conn: &mut Connection,
  id: ParticipationId,
) -> Result<Vec<RawParticipation>, TxError> {
  let tx = conn.transaction()?;
  if !exists(&tx, "participations", id.get())? {
    return Err(not_found(Entity::Participation, id.get()));
  }
  let ids = invitation::descendants(&SqlLinks(&tx), id)?;
  read_participations(&tx, &ids)
}

fn into_participations(raws: Vec<RawParticipation>) -> Result<Vec<Participation>> {
  raws
    .into_iter()
    .map(RawParticipation::into_participation)
    .collect()
}

fn into_participants(raws: Vec<RawParticipant>) -> Result<Vec<Participant>> {
  raws.into_iter().map(RawParticipant::into_participant).collect()
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  // ── Individuals ───────────────────────────────────────────────────────────

  async fn allocate_individual(&self) -> Result<IndividualId> {
    let id = self
      .conn
      .call(|conn| {
        conn.execute("INSERT INTO individuals DEFAULT VALUES", [])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(individual = id, "allocated individual");
    Ok(IndividualId(id))
  }

  async fn get_individual(&self, id: IndividualId) -> Result<Option<Individual>> {
    let raw = self
      .conn
      .call(move |conn| {
        if !exists(conn, "individuals", id.get())? {
          return Ok(None);
        }
        let person = read_person(conn, id.get())?;
        let participant = read_participant(conn, id.get())?;
        Ok(Some((person, participant)))
      })
      .await?;

    let Some((person, participant)) = raw else {
      return Ok(None);
    };
    Ok(Some(Individual {
      id,
      person,
      participant: participant.map(RawParticipant::into_participant).transpose()?,
    }))
  }

  async fn delete_individual(&self, id: IndividualId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn
          .execute("DELETE FROM individuals WHERE id = ?1", [id.get()])
          .map_err(|e| foreign_key(e, "individual still has a person or participant"))?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Person facet ──────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = input.into_person();
    let row = person.clone();

    self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO persons (id, first_names, last_name, nickname, email, phone, allergies)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
              row.id.get(),
              row.first_names,
              row.last_name,
              row.nickname,
              row.email,
              row.phone,
              row.allergies,
            ],
          )
          .map_err(|e| {
            constraint(e, "person needs an allocated individual", || {
              CoreError::FacetExists(row.id, Entity::Person)
            })
          })?;
        Ok(())
      })
      .await?;

    tracing::debug!(individual = %person.id, "added person");
    Ok(person)
  }

  async fn get_person(&self, id: IndividualId) -> Result<Option<Person>> {
    let person = self
      .conn
      .call(move |conn| Ok(read_person(conn, id.get())?))
      .await?;
    Ok(person)
  }

  async fn delete_person(&self, id: IndividualId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM persons WHERE id = ?1", [id.get()])? > 0))
      .await?;

    if deleted {
      tracing::debug!(individual = %id, "deleted person");
    }
    Ok(deleted)
  }

  async fn set_languages(&self, id: IndividualId, languages: Vec<String>) -> Result<()> {
    for language in &languages {
      validate_language(language)?;
    }

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !exists(&tx, "persons", id.get())? {
          return Err(not_found(Entity::Person, id.get()).into());
        }
        tx.execute(
          "DELETE FROM language_proficiencies WHERE person_id = ?1",
          [id.get()],
        )?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO language_proficiencies (person_id, priority, language)
             VALUES (?1, ?2, ?3)",
          )?;
          for (priority, language) in languages.iter().enumerate() {
            stmt.execute(params![id.get(), priority as i64, language])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn languages(&self, id: IndividualId) -> Result<Vec<String>> {
    let languages = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT language FROM language_proficiencies WHERE person_id = ?1 ORDER BY priority",
        )?;
        let rows = stmt
          .query_map([id.get()], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(languages)
  }

  // ── Participant facet ─────────────────────────────────────────────────────

  async fn add_participant(&self, input: NewParticipant) -> Result<Participant> {
    let participant = input.into_participant();
    let row = participant.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "INSERT INTO participants (id, birth_year, genitalia) VALUES (?1, ?2, ?3)",
          params![row.id.get(), row.birth_year, row.genitalia.as_ref()],
        )
        .map_err(|e| {
          constraint(e, "participant needs an allocated individual", || {
            CoreError::FacetExists(row.id, Entity::Participant)
          })
        })?;
        write_orientation(&tx, row.id, row.orientation.as_ref())?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(individual = %participant.id, "added participant");
    Ok(participant)
  }

  async fn get_participant(&self, id: IndividualId) -> Result<Option<Participant>> {
    let raw = self
      .conn
      .call(move |conn| Ok(read_participant(conn, id.get())?))
      .await?;
    raw.map(RawParticipant::into_participant).transpose()
  }

  async fn set_orientation(&self, id: IndividualId, orientation: Option<Orientation>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !exists(&tx, "participants", id.get())? {
          return Err(not_found(Entity::Participant, id.get()).into());
        }
        write_orientation(&tx, id, orientation.as_ref())?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn delete_participant(&self, id: IndividualId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn
          .execute("DELETE FROM participants WHERE id = ?1", [id.get()])
          .map_err(|e| foreign_key(e, "participant has participations"))?;
        Ok(n > 0)
      })
      .await?;
    Ok(deleted)
  }

  // ── Locations and events ──────────────────────────────────────────────────

  async fn add_location(&self, input: NewLocation) -> Result<Location> {
    let name = input.name.clone();
    let address = input.address.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO locations (name, address) VALUES (?1, ?2)",
            params![name, address],
          )
          .map_err(|e| {
            constraint(e, "location", || CoreError::DuplicateName {
              entity: Entity::Location,
              name:   name.clone(),
            })
          })?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Location {
      id:      LocationId(id),
      name:    input.name,
      address: input.address,
    })
  }

  async fn get_location(&self, id: LocationId) -> Result<Option<Location>> {
    let location = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, address FROM locations WHERE id = ?1",
              [id.get()],
              |row| {
                Ok(Location {
                  id:      LocationId(row.get(0)?),
                  name:    row.get(1)?,
                  address: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(location)
  }

  async fn add_event(&self, input: NewEvent) -> Result<Event> {
    input.validate()?;

    let name        = input.name.clone();
    let kind        = input.kind.as_ref().to_owned();
    let start_time  = encode_dt(input.start_time);
    let end_time    = encode_dt(input.end_time);
    let language    = input.language.clone();
    let location_id = input.location_id.map(LocationId::get);

    let id = self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO events (name, kind, start_time, end_time, language, location_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![name, kind, start_time, end_time, language, location_id],
          )
          .map_err(|e| {
            constraint(e, "event location must exist", || CoreError::DuplicateName {
              entity: Entity::Event,
              name:   name.clone(),
            })
          })?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(event = id, name = %input.name, "added event");
    Ok(input.into_event(EventId(id)))
  }

  async fn get_event(&self, id: EventId) -> Result<Option<Event>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&format!("{EVENT_SELECT} WHERE id = ?1"), [id.get()], RawEvent::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawEvent::into_event).transpose()
  }

  async fn find_event<'a>(&'a self, name: &'a str) -> Result<Option<Event>> {
    let name = name.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&format!("{EVENT_SELECT} WHERE name = ?1"), [name], RawEvent::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawEvent::into_event).transpose()
  }

  async fn event_participations(&self, event: EventId) -> Result<Vec<Participation>> {
    let raws = self
      .conn
      .call(move |conn| Ok(read_participations_by(conn, "event_id", event.get())?))
      .await?;
    into_participations(raws)
  }

  // ── Participations ────────────────────────────────────────────────────────

  async fn create_participation(
    &self,
    input: NewParticipation,
  ) -> Result<(Participation, StatusEntry)> {
    let (participation, entry) = self
      .conn
      .call(move |conn| Ok(create_participation_tx(conn, input)?))
      .await?;

    tracing::debug!(
      participation = %participation.id,
      participant = %participation.participant_id,
      event = %participation.event_id,
      status = entry.status.as_ref(),
      "created participation"
    );
    Ok((participation, entry))
  }

  async fn get_participation(&self, id: ParticipationId) -> Result<Option<Participation>> {
    let raw = self
      .conn
      .call(move |conn| Ok(read_participation(conn, id.get())?))
      .await?;
    raw.map(RawParticipation::into_participation).transpose()
  }

  async fn participations_of(&self, participant: IndividualId) -> Result<Vec<Participation>> {
    let raws = self
      .conn
      .call(move |conn| Ok(read_participations_by(conn, "participant_id", participant.get())?))
      .await?;
    into_participations(raws)
  }

  async fn set_participation_notes(&self, id: ParticipationId, notes: Option<String>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE participations SET notes = ?1 WHERE id = ?2",
          params![notes, id.get()],
        )?;
        if n == 0 {
          return Err(not_found(Entity::Participation, id.get()).into());
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn set_invitation_source(
    &self,
    id: ParticipationId,
    source: Option<ParticipationId>,
  ) -> Result<Participation> {
    let raw = self
      .conn
      .call(move |conn| Ok(relink_tx(conn, id, source)?))
      .await?;

    tracing::debug!(participation = %id, source = ?source, "changed invitation source");
    raw.into_participation()
  }

  // ── Status log ────────────────────────────────────────────────────────────

  async fn append_status(&self, id: ParticipationId, entry: NewStatusEntry) -> Result<StatusEntry> {
    let retries = self.append_retries;
    let entry = self
      .conn
      .call(move |conn| Ok(append_tx(conn, id, &entry, retries)?))
      .await?;

    tracing::debug!(
      participation = %id,
      position = entry.position,
      status = entry.status.as_ref(),
      "appended status"
    );
    Ok(entry)
  }

  async fn status_log(&self, id: ParticipationId) -> Result<StatusLog> {
    let raws = self
      .conn
      .call(move |conn| {
        if !exists(conn, "participations", id.get())? {
          return Err(not_found(Entity::Participation, id.get()).into());
        }
        let mut stmt = conn.prepare(&format!(
          "{STATUS_SELECT} WHERE participation_id = ?1 ORDER BY position"
        ))?;
        let rows = stmt
          .query_map([id.get()], RawStatusEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let entries = raws
      .into_iter()
      .map(RawStatusEntry::into_entry)
      .collect::<Result<Vec<_>>>()?;
    Ok(StatusLog::from_entries(id, entries)?)
  }

  async fn current_status(&self, id: ParticipationId) -> Result<ParticipationStatus> {
    let (found, status): (bool, Option<String>) = self
      .conn
      .call(move |conn| {
        if !exists(conn, "participations", id.get())? {
          return Ok((false, None));
        }
        let status = conn
          .query_row(
            "SELECT status FROM status_log WHERE participation_id = ?1
             ORDER BY position DESC LIMIT 1",
            [id.get()],
            |row| row.get(0),
          )
          .optional()?;
        Ok((true, status))
      })
      .await?;

    if !found {
      return Err(CoreError::NotFound(Entity::Participation, id.get()).into());
    }
    match status {
      Some(s) => decode_variant("participation status", &s),
      None => Err(CoreError::EmptyLog(id).into()),
    }
  }

  // ── Invitation graph ──────────────────────────────────────────────────────

  async fn get_inviter(&self, id: ParticipationId) -> Result<Option<Participant>> {
    let raw = self
      .conn
      .call(move |conn| {
        let link = SqlLinks(conn)
          .link(id)?
          .ok_or_else(|| not_found(Entity::Participation, id.get()))?;
        let Some(source) = link.invitation_source else {
          return Ok(None);
        };
        let inviter = read_participation(conn, source.get())?
          .ok_or_else(|| not_found(Entity::Participation, source.get()))?;
        Ok(read_participant(conn, inviter.participant_id)?)
      })
      .await?;
    raw.map(RawParticipant::into_participant).transpose()
  }

  async fn get_companions(&self, id: ParticipationId) -> Result<Vec<Participant>> {
    let raws = self
      .conn
      .call(move |conn| {
        if !exists(conn, "participations", id.get())? {
          return Err(not_found(Entity::Participation, id.get()).into());
        }
        let mut stmt = conn.prepare(&format!(
          "{PARTICIPANT_SELECT}
           JOIN participations pa ON pa.participant_id = p.id
           WHERE pa.invitation_source_id = ?1
           ORDER BY pa.id"
        ))?;
        let rows = stmt
          .query_map([id.get()], RawParticipant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    into_participants(raws)
  }

  async fn ancestors(&self, id: ParticipationId) -> Result<Vec<Participation>> {
    let raws = self
      .conn
      .call(move |conn| Ok(ancestors_tx(conn, id)?))
      .await?;
    into_participations(raws)
  }

  async fn descendants(&self, id: ParticipationId) -> Result<Vec<Participation>> {
    let raws = self
      .conn
      .call(move |conn| Ok(descendants_tx(conn, id)?))
      .await?;
    into_participations(raws)
  }
}
