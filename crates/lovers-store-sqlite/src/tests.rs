//! Integration tests for `SqliteStore` against in-memory and file databases.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use lovers_core::{
  Entity, Error as CoreError, EventId, IndividualId, InviterRejection, LocationId,
  ParticipationId,
  event::{EventKind, NewEvent, NewLocation},
  identity::{Genitalia, NewParticipant, NewPerson, Orientation},
  participation::{NewParticipation, Participation, Role},
  status::{NewStatusEntry, ParticipationStatus},
  store::EventStore,
};

use crate::{Error, SqliteStore, StoreConfig};

use ParticipationStatus::*;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn t0() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap() }

fn core(err: Error) -> CoreError {
  match err {
    Error::Core(e) => e,
    other => panic!("expected a core error, got {other}"),
  }
}

async fn participant(s: &SqliteStore, genitalia: Genitalia) -> IndividualId {
  let id = s.allocate_individual().await.unwrap();
  s.add_participant(NewParticipant::new(id, genitalia)).await.unwrap();
  id
}

async fn event(s: &SqliteStore, name: &str) -> EventId {
  s.add_event(NewEvent::new(
    name,
    EventKind::GentleOrgy,
    t0(),
    t0() + Duration::hours(6),
  ))
  .await
  .unwrap()
  .id
}

async fn join(
  s: &SqliteStore,
  who: IndividualId,
  event: EventId,
  invited_by: Option<ParticipationId>,
) -> Participation {
  let mut input = NewParticipation::new(who, event, Role::Participant, NewStatusEntry::new(Invited, t0()));
  input.invitation_source = invited_by;
  s.create_participation(input).await.unwrap().0
}

fn person(id: IndividualId, nickname: &str) -> NewPerson {
  NewPerson {
    id,
    first_names: format!("{nickname} Example"),
    last_name: "Tester".into(),
    nickname: nickname.into(),
    email: format!("{}@example.org", nickname.to_lowercase()),
    phone: None,
    allergies: Some("none".into()),
  }
}

// ─── Identity and facets ─────────────────────────────────────────────────────

#[tokio::test]
async fn allocated_ids_are_unique() {
  let s = store().await;
  let a = s.allocate_individual().await.unwrap();
  let b = s.allocate_individual().await.unwrap();
  assert_ne!(a, b);

  let individual = s.get_individual(a).await.unwrap().unwrap();
  assert!(individual.person.is_none());
  assert!(individual.participant.is_none());
}

#[tokio::test]
async fn get_individual_missing_returns_none() {
  let s = store().await;
  assert!(s.get_individual(IndividualId(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn facets_share_the_individual_id() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  s.add_person(person(id, "Robin")).await.unwrap();
  let mut input = NewParticipant::new(id, Genitalia::Female);
  input.birth_year = Some(1990);
  s.add_participant(input).await.unwrap();

  let individual = s.get_individual(id).await.unwrap().unwrap();
  assert_eq!(individual.person.unwrap().name(), "Robin Tester");
  assert_eq!(individual.participant.unwrap().birth_year, Some(1990));
}

#[tokio::test]
async fn facet_without_individual_is_referential_error() {
  let s = store().await;
  let err = s.add_person(person(IndividualId(77), "Ghost")).await.unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));
}

#[tokio::test]
async fn second_facet_of_same_kind_is_rejected() {
  let s = store().await;
  let id = participant(&s, Genitalia::Male).await;
  let err = s
    .add_participant(NewParticipant::new(id, Genitalia::Male))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::FacetExists(i, Entity::Participant) if i == id));
}

#[tokio::test]
async fn deleting_person_keeps_participation_history() {
  let s = store().await;
  let id = participant(&s, Genitalia::Other).await;
  s.add_person(person(id, "Sam")).await.unwrap();
  s.set_languages(id, vec!["fi".into(), "en".into()]).await.unwrap();
  let e = event(&s, "midsummer").await;
  let p = join(&s, id, e, None).await;

  assert!(s.delete_person(id).await.unwrap());
  assert!(!s.delete_person(id).await.unwrap());

  let individual = s.get_individual(id).await.unwrap().unwrap();
  assert!(individual.is_anonymous());
  assert!(s.languages(id).await.unwrap().is_empty());
  assert_eq!(s.current_status(p.id).await.unwrap(), Invited);
}

#[tokio::test]
async fn languages_keep_priority_order() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  s.add_person(person(id, "Alex")).await.unwrap();

  s.set_languages(id, vec!["sv".into(), "fi".into(), "en".into()]).await.unwrap();
  assert_eq!(s.languages(id).await.unwrap(), ["sv", "fi", "en"]);

  s.set_languages(id, vec!["en".into()]).await.unwrap();
  assert_eq!(s.languages(id).await.unwrap(), ["en"]);
}

#[tokio::test]
async fn invalid_language_is_rejected_before_writing() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  s.add_person(person(id, "Kim")).await.unwrap();
  s.set_languages(id, vec!["fi".into()]).await.unwrap();

  let err = s
    .set_languages(id, vec!["en".into(), "English".into()])
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::InvalidLanguage(_)));
  assert_eq!(s.languages(id).await.unwrap(), ["fi"]);
}

#[tokio::test]
async fn orientation_is_replaced_and_removed() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  let mut input = NewParticipant::new(id, Genitalia::Female);
  input.orientation = Some(Orientation {
    female:  Some(3),
    male:    Some(1),
    other:   None,
    comment: Some("curious".into()),
  });
  let added = s.add_participant(input).await.unwrap();
  assert_eq!(s.get_participant(id).await.unwrap().unwrap(), added);

  let updated = Orientation { male: Some(5), ..Default::default() };
  s.set_orientation(id, Some(updated.clone())).await.unwrap();
  let fetched = s.get_participant(id).await.unwrap().unwrap();
  assert_eq!(fetched.orientation, Some(updated));

  s.set_orientation(id, None).await.unwrap();
  assert!(s.get_participant(id).await.unwrap().unwrap().orientation.is_none());
}

#[tokio::test]
async fn orientation_is_deleted_with_participant() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  let mut input = NewParticipant::new(id, Genitalia::Male);
  input.orientation = Some(Orientation::default());
  s.add_participant(input).await.unwrap();

  assert!(s.delete_participant(id).await.unwrap());
  assert!(s.get_participant(id).await.unwrap().is_none());

  // The orientation row went with it, so the id can get a fresh participant.
  s.add_participant(NewParticipant::new(id, Genitalia::Male)).await.unwrap();
  assert!(s.get_participant(id).await.unwrap().unwrap().orientation.is_none());
}

#[tokio::test]
async fn participant_with_history_cannot_be_deleted() {
  let s = store().await;
  let id = participant(&s, Genitalia::Female).await;
  let e = event(&s, "workshop-1").await;
  join(&s, id, e, None).await;

  let err = s.delete_participant(id).await.unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));

  let err = s.delete_individual(id).await.unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));
}

#[tokio::test]
async fn bare_individual_can_be_deleted() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  assert!(s.delete_individual(id).await.unwrap());
  assert!(s.get_individual(id).await.unwrap().is_none());
}

#[tokio::test]
async fn individual_with_facets_cannot_be_deleted() {
  let s = store().await;
  let id = s.allocate_individual().await.unwrap();
  s.add_person(person(id, "Noa")).await.unwrap();

  let err = s.delete_individual(id).await.unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));

  // Once the person is gone a participant facet blocks deletion the same way.
  s.delete_person(id).await.unwrap();
  s.add_participant(NewParticipant::new(id, Genitalia::Other)).await.unwrap();
  let err = s.delete_individual(id).await.unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));

  s.delete_participant(id).await.unwrap();
  assert!(s.delete_individual(id).await.unwrap());
}

// ─── Locations and events ────────────────────────────────────────────────────

#[tokio::test]
async fn event_with_location_roundtrip() {
  let s = store().await;
  let location = s
    .add_location(NewLocation { name: "loft".into(), address: Some("Katu 1".into()) })
    .await
    .unwrap();
  assert_eq!(s.get_location(location.id).await.unwrap(), Some(location.clone()));

  let mut input = NewEvent::new("art-night", EventKind::ArtProject, t0(), t0() + Duration::hours(3));
  input.language = Some("en".into());
  input.location_id = Some(location.id);
  let created = s.add_event(input).await.unwrap();

  assert_eq!(s.get_event(created.id).await.unwrap(), Some(created.clone()));
  assert_eq!(s.find_event("art-night").await.unwrap(), Some(created));
  assert!(s.find_event("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn names_are_unique() {
  let s = store().await;
  s.add_location(NewLocation { name: "loft".into(), address: None }).await.unwrap();
  let err = s
    .add_location(NewLocation { name: "loft".into(), address: None })
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::DuplicateName { entity: Entity::Location, .. }));

  event(&s, "meetup").await;
  let err = s
    .add_event(NewEvent::new("meetup", EventKind::Meeting, t0(), t0()))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::DuplicateName { entity: Entity::Event, ref name } if name == "meetup"));
}

#[tokio::test]
async fn event_with_unknown_location_is_referential_error() {
  let s = store().await;
  let mut input = NewEvent::new("lost", EventKind::Workshop, t0(), t0());
  input.location_id = Some(LocationId(9));
  let err = s.add_event(input).await.unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));
}

#[tokio::test]
async fn event_ending_before_start_is_rejected() {
  let s = store().await;
  let err = s
    .add_event(NewEvent::new("backwards", EventKind::Meeting, t0(), t0() - Duration::hours(1)))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::InvalidTimeRange { .. }));
}

// ─── Participation and status log ────────────────────────────────────────────

#[tokio::test]
async fn status_lifecycle_example() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let e = event(&s, "E").await;

  let (p, first) = s
    .create_participation(NewParticipation::new(a, e, Role::Participant, NewStatusEntry::new(Invited, t0())))
    .await
    .unwrap();
  assert_eq!(first.position, 0);
  assert_eq!(s.current_status(p.id).await.unwrap(), Invited);

  s.append_status(p.id, NewStatusEntry::new(Signed, t0() + Duration::hours(1)))
    .await
    .unwrap();
  assert_eq!(s.current_status(p.id).await.unwrap(), Signed);

  let last = s
    .append_status(
      p.id,
      NewStatusEntry::new(Accepted, t0() + Duration::hours(2)).with_notes("welcome"),
    )
    .await
    .unwrap();
  assert_eq!(last.position, 2);
  assert_eq!(s.current_status(p.id).await.unwrap(), Accepted);

  let log = s.status_log(p.id).await.unwrap();
  assert_eq!(log.len(), 3);
  let positions: Vec<_> = log.entries().iter().map(|e| e.position).collect();
  assert_eq!(positions, [0, 1, 2]);
  assert_eq!(log.entries()[2].notes.as_deref(), Some("welcome"));
}

#[tokio::test]
async fn backdated_entry_still_becomes_current() {
  let s = store().await;
  let a = participant(&s, Genitalia::Male).await;
  let e = event(&s, "late-fix").await;
  let p = join(&s, a, e, None).await;

  s.append_status(p.id, NewStatusEntry::new(Accepted, t0() + Duration::days(3)))
    .await
    .unwrap();
  // Recorded later, but happened earlier.
  s.append_status(p.id, NewStatusEntry::new(Cancelled, t0() + Duration::days(1)))
    .await
    .unwrap();

  assert_eq!(s.current_status(p.id).await.unwrap(), Cancelled);
  let log = s.status_log(p.id).await.unwrap();
  assert_eq!(log.current().unwrap().timestamp, t0() + Duration::days(1));
  assert_eq!(log.entries()[1].status, Accepted);
}

#[tokio::test]
async fn duplicate_participation_is_rejected() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let e = event(&s, "twice").await;
  join(&s, a, e, None).await;

  let err = s
    .create_participation(NewParticipation::new(a, e, Role::Staff, NewStatusEntry::new(Signed, t0())))
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::DuplicateParticipation { participant, event } if participant == a && event == e
  ));
  assert_eq!(s.event_participations(e).await.unwrap().len(), 1);
}

#[tokio::test]
async fn participation_for_unknown_event_is_referential_error() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let err = s
    .create_participation(NewParticipation::new(a, EventId(99), Role::Participant, NewStatusEntry::new(Signed, t0())))
    .await
    .unwrap_err();
  assert!(matches!(core(err), CoreError::ReferentialIntegrity(_)));
}

#[tokio::test]
async fn failed_creation_leaves_nothing_behind() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let b = participant(&s, Genitalia::Male).await;
  let e1 = event(&s, "one").await;
  let e2 = event(&s, "two").await;
  let pa = join(&s, a, e1, None).await;

  // Cross-event inviter: rejected before anything is written.
  let err = s
    .create_participation(
      NewParticipation::new(b, e2, Role::Participant, NewStatusEntry::new(Invited, t0())).invited_by(pa.id),
    )
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::InvalidInviter(InviterRejection::CrossEvent { .. })
  ));
  assert!(s.participations_of(b).await.unwrap().is_empty());

  // The pair is still free.
  let pb = join(&s, b, e2, None).await;
  assert_eq!(s.status_log(pb.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn creation_rolls_back_when_first_entry_fails() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let e = event(&s, "rollback").await;

  s.conn
    .call(|conn| {
      conn.execute_batch(
        "CREATE TRIGGER refuse_status BEFORE INSERT ON status_log
         BEGIN SELECT RAISE(ABORT, 'refused'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let result = s
    .create_participation(NewParticipation::new(a, e, Role::Participant, NewStatusEntry::new(Invited, t0())))
    .await;
  assert!(result.is_err());
  assert!(s.participations_of(a).await.unwrap().is_empty());
  assert!(s.event_participations(e).await.unwrap().is_empty());

  s.conn
    .call(|conn| {
      conn.execute_batch("DROP TRIGGER refuse_status;")?;
      Ok(())
    })
    .await
    .unwrap();

  let p = join(&s, a, e, None).await;
  assert_eq!(s.status_log(p.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn participation_fields_roundtrip() {
  let s = store().await;
  let a = participant(&s, Genitalia::Other).await;
  let e = event(&s, "notes").await;
  let (p, _) = s
    .create_participation(
      NewParticipation::new(a, e, Role::Artist, NewStatusEntry::new(Signed, t0())).with_notes("brings paint"),
    )
    .await
    .unwrap();

  assert_eq!(s.get_participation(p.id).await.unwrap(), Some(p.clone()));
  assert_eq!(s.participations_of(a).await.unwrap(), [p.clone()]);

  s.set_participation_notes(p.id, None).await.unwrap();
  let fetched = s.get_participation(p.id).await.unwrap().unwrap();
  assert!(fetched.notes.is_none());
  assert_eq!(fetched.role, Role::Artist);
}

#[tokio::test]
async fn status_of_unknown_participation_is_not_found() {
  let s = store().await;
  let missing = ParticipationId(5);
  for err in [
    s.current_status(missing).await.unwrap_err(),
    s.status_log(missing).await.unwrap_err(),
    s.append_status(missing, NewStatusEntry::new(Signed, t0())).await.unwrap_err(),
  ] {
    assert!(matches!(core(err), CoreError::NotFound(Entity::Participation, 5)));
  }
}

#[tokio::test]
async fn status_log_rows_cannot_be_changed() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let e = event(&s, "immutable").await;
  let p = join(&s, a, e, None).await;
  let id = p.id.get();

  let update = s
    .conn
    .call(move |conn| {
      conn.execute(
        "UPDATE status_log SET status = 'accepted' WHERE participation_id = ?1",
        [id],
      )?;
      Ok(())
    })
    .await;
  assert!(update.is_err());

  let delete = s
    .conn
    .call(move |conn| {
      conn.execute("DELETE FROM status_log WHERE participation_id = ?1", [id])?;
      Ok(())
    })
    .await;
  assert!(delete.is_err());

  assert_eq!(s.current_status(p.id).await.unwrap(), Invited);
}

#[tokio::test]
async fn empty_log_is_reported() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let e = event(&s, "corrupt").await;
  let (participant_id, event_id) = (a.get(), e.get());

  // Only reachable by bypassing the store.
  let id = s
    .conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO participations (participant_id, event_id, role) VALUES (?1, ?2, 'participant')",
        [participant_id, event_id],
      )?;
      Ok(conn.last_insert_rowid())
    })
    .await
    .unwrap();

  let err = s.current_status(ParticipationId(id)).await.unwrap_err();
  assert!(matches!(core(err), CoreError::EmptyLog(p) if p == ParticipationId(id)));
  let log = s.status_log(ParticipationId(id)).await.unwrap();
  assert!(matches!(log.current(), Err(CoreError::EmptyLog(_))));
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_get_distinct_positions() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let e = event(&s, "busy").await;
  let p = join(&s, a, e, None).await;

  let tasks: Vec<_> = (0..20)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.append_status(p.id, NewStatusEntry::new(Queued, t0() + Duration::minutes(i)))
          .await
          .unwrap()
          .position
      })
    })
    .collect();

  let mut positions = BTreeSet::new();
  for task in tasks {
    assert!(positions.insert(task.await.unwrap()));
  }
  assert_eq!(positions, (1..=20).collect());
  assert_eq!(s.status_log(p.id).await.unwrap().len(), 21);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn appends_from_separate_connections_do_not_collide() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("lovers.db");

  let first = SqliteStore::open(&path).await.unwrap();
  let a = participant(&first, Genitalia::Female).await;
  let e = event(&first, "shared-file").await;
  let p = join(&first, a, e, None).await;

  let second = SqliteStore::open_with(&StoreConfig {
    append_retries: 20,
    ..StoreConfig::at(&path)
  })
  .await
  .unwrap();

  let run = |s: SqliteStore| {
    tokio::spawn(async move {
      let mut got = Vec::new();
      for _ in 0..10 {
        got.push(s.append_status(p.id, NewStatusEntry::new(Signed, t0())).await.unwrap().position);
      }
      got
    })
  };
  let (left, right) = tokio::join!(run(first.clone()), run(second));

  let all: BTreeSet<_> = left.unwrap().into_iter().chain(right.unwrap()).collect();
  assert_eq!(all, (1..=20).collect());
  assert_eq!(first.status_log(p.id).await.unwrap().len(), 21);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn logs_of_different_participations_are_independent() {
  let s = store().await;
  let e = event(&s, "parallel").await;
  let mut ids = Vec::new();
  for _ in 0..4 {
    let who = participant(&s, Genitalia::Other).await;
    ids.push(join(&s, who, e, None).await.id);
  }

  let tasks: Vec<_> = ids
    .iter()
    .flat_map(|&id| (0..5).map(move |_| id))
    .map(|id| {
      let s = s.clone();
      tokio::spawn(async move { s.append_status(id, NewStatusEntry::new(Accepted, t0())).await.unwrap() })
    })
    .collect();
  for task in tasks {
    task.await.unwrap();
  }

  for id in ids {
    let positions: Vec<_> = s
      .status_log(id)
      .await
      .unwrap()
      .entries()
      .iter()
      .map(|e| e.position)
      .collect();
    assert_eq!(positions, (0..=5).collect::<Vec<u32>>());
  }
}

// ─── Invitation graph ────────────────────────────────────────────────────────

#[tokio::test]
async fn inviter_and_companions_example() {
  let s = store().await;
  let a = participant(&s, Genitalia::Female).await;
  let b = participant(&s, Genitalia::Male).await;
  let c = participant(&s, Genitalia::Other).await;
  let e = event(&s, "E").await;

  let pa = join(&s, a, e, None).await;
  let pb = join(&s, b, e, Some(pa.id)).await;
  let pc = join(&s, c, e, Some(pa.id)).await;

  assert!(s.get_inviter(pa.id).await.unwrap().is_none());
  assert_eq!(s.get_inviter(pb.id).await.unwrap().unwrap().id, a);

  let companions: Vec<_> = s.get_companions(pa.id).await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(companions, [b, c]);

  // Every companion's inviter is the participant behind pa.
  for companion in [pb.id, pc.id] {
    assert_eq!(s.get_inviter(companion).await.unwrap().unwrap().id, pa.participant_id);
  }
  assert!(s.get_companions(pb.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn graph_traversals() {
  let s = store().await;
  let e = event(&s, "chain").await;
  let mut people = Vec::new();
  for _ in 0..5 {
    people.push(participant(&s, Genitalia::Female).await);
  }

  // root ← p1 ← p2, root ← p3 ← p4
  let root = join(&s, people[0], e, None).await;
  let p1 = join(&s, people[1], e, Some(root.id)).await;
  let p2 = join(&s, people[2], e, Some(p1.id)).await;
  let p3 = join(&s, people[3], e, Some(root.id)).await;
  let p4 = join(&s, people[4], e, Some(p3.id)).await;

  let up: Vec<_> = s.ancestors(p2.id).await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(up, [p1.id, root.id]);
  assert!(s.ancestors(root.id).await.unwrap().is_empty());

  let down: Vec<_> = s.descendants(root.id).await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(down, [p1.id, p3.id, p2.id, p4.id]);

  let err = s.ancestors(ParticipationId(999)).await.unwrap_err();
  assert!(matches!(core(err), CoreError::NotFound(Entity::Participation, 999)));
}

#[tokio::test]
async fn relinking_rejects_cycles_and_self_invitation() {
  let s = store().await;
  let e = event(&s, "relink").await;
  let a = participant(&s, Genitalia::Female).await;
  let b = participant(&s, Genitalia::Male).await;
  let c = participant(&s, Genitalia::Other).await;

  let pa = join(&s, a, e, None).await;
  let pb = join(&s, b, e, Some(pa.id)).await;
  let pc = join(&s, c, e, Some(pb.id)).await;

  let err = s.set_invitation_source(pa.id, Some(pc.id)).await.unwrap_err();
  assert!(matches!(core(err), CoreError::InvalidInviter(InviterRejection::Cycle(_))));

  let err = s.set_invitation_source(pb.id, Some(pb.id)).await.unwrap_err();
  assert!(matches!(core(err), CoreError::InvalidInviter(InviterRejection::SelfInvitation(_))));

  // The graph is unchanged after the rejections.
  let up: Vec<_> = s.ancestors(pc.id).await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(up, [pb.id, pa.id]);

  // Moving c directly under a and then detaching b is fine.
  let moved = s.set_invitation_source(pc.id, Some(pa.id)).await.unwrap();
  assert_eq!(moved.invitation_source, Some(pa.id));
  let detached = s.set_invitation_source(pb.id, None).await.unwrap();
  assert!(detached.invitation_source.is_none());
  assert!(s.get_inviter(pb.id).await.unwrap().is_none());
}

#[tokio::test]
async fn relinking_across_events_is_rejected() {
  let s = store().await;
  let e1 = event(&s, "first").await;
  let e2 = event(&s, "second").await;
  let a = participant(&s, Genitalia::Female).await;
  let b = participant(&s, Genitalia::Male).await;

  let pa = join(&s, a, e1, None).await;
  let pb = join(&s, b, e2, None).await;

  let err = s.set_invitation_source(pb.id, Some(pa.id)).await.unwrap_err();
  assert!(matches!(
    core(err),
    CoreError::InvalidInviter(InviterRejection::CrossEvent { event, .. }) if event == e2
  ));
}

// ─── Configuration ───────────────────────────────────────────────────────────

#[tokio::test]
async fn config_file_is_loaded() {
  let dir = tempfile::tempdir().unwrap();
  let db = dir.path().join("from-config.db");
  let file = dir.path().join("lovers.toml");
  std::fs::write(
    &file,
    format!("path = {:?}\nappend_retries = 9\n", db.display().to_string()),
  )
  .unwrap();

  let config = StoreConfig::load(Some(&file)).unwrap();
  assert_eq!(config.path.as_deref(), Some(db.as_path()));
  assert_eq!(config.append_retries, 9);
  assert_eq!(config.busy_timeout_ms, 5_000);

  let s = SqliteStore::open_with(&config).await.unwrap();
  s.allocate_individual().await.unwrap();
  assert!(db.exists());
}
