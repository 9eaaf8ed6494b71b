//! Individuals and their two facets.
//!
//! An [`Individual`] is a bare id. Contact data lives in the [`Person`] facet,
//! event-facing data in the [`Participant`] facet. Either facet may be present
//! or absent independently; deleting the Person facet anonymises someone
//! without touching their participation history.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::id::IndividualId;

// ─── Individual ──────────────────────────────────────────────────────────────

/// An allocated id together with whichever facets currently exist for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
  pub id:          IndividualId,
  pub person:      Option<Person>,
  pub participant: Option<Participant>,
}

impl Individual {
  /// `true` when the contact data has been purged but event history remains.
  pub fn is_anonymous(&self) -> bool {
    self.person.is_none() && self.participant.is_some()
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// Contact information needed to reach someone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          IndividualId,
  pub first_names: String,
  pub last_name:   String,
  /// The name this person wants to be called by.
  pub nickname:    String,
  pub email:       String,
  pub phone:       Option<String>,
  pub allergies:   Option<String>,
}

impl Person {
  /// Nickname followed by last name.
  pub fn name(&self) -> String { format!("{} {}", self.nickname, self.last_name) }
}

/// Input to [`crate::store::EventStore::add_person`].
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub id:          IndividualId,
  pub first_names: String,
  pub last_name:   String,
  pub nickname:    String,
  pub email:       String,
  pub phone:       Option<String>,
  pub allergies:   Option<String>,
}

impl NewPerson {
  pub fn into_person(self) -> Person {
    Person {
      id:          self.id,
      first_names: self.first_names,
      last_name:   self.last_name,
      nickname:    self.nickname,
      email:       self.email,
      phone:       self.phone,
      allergies:   self.allergies,
    }
  }
}

// ─── Participant ─────────────────────────────────────────────────────────────

/// Rough genital category of a participant.
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
pub enum Genitalia {
  Female,
  Male,
  Other,
}

/// How attractive a participant finds each genital category, plus free text.
/// Scores are on whatever scale the organisers agree on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
  pub female:  Option<i64>,
  pub male:    Option<i64>,
  pub other:   Option<i64>,
  pub comment: Option<String>,
}

/// The event-facing facet of an individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub id:          IndividualId,
  pub birth_year:  Option<i32>,
  pub genitalia:   Genitalia,
  /// Owned exclusively by the participant and removed together with it.
  pub orientation: Option<Orientation>,
}

/// Input to [`crate::store::EventStore::add_participant`].
#[derive(Debug, Clone)]
pub struct NewParticipant {
  pub id:          IndividualId,
  pub birth_year:  Option<i32>,
  pub genitalia:   Genitalia,
  pub orientation: Option<Orientation>,
}

impl NewParticipant {
  pub fn new(id: IndividualId, genitalia: Genitalia) -> Self {
    Self { id, birth_year: None, genitalia, orientation: None }
  }

  pub fn into_participant(self) -> Participant {
    Participant {
      id:          self.id,
      birth_year:  self.birth_year,
      genitalia:   self.genitalia,
      orientation: self.orientation,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn person_name_is_nickname_and_last_name() {
    let person = NewPerson {
      id:          IndividualId(1),
      first_names: "Anna Maria".into(),
      last_name:   "Virtanen".into(),
      nickname:    "Annu".into(),
      email:       "annu@example.org".into(),
      phone:       None,
      allergies:   None,
    }
    .into_person();
    assert_eq!(person.name(), "Annu Virtanen");
  }

  #[test]
  fn genitalia_text_form_matches_serde() {
    for g in Genitalia::iter() {
      let json = serde_json::to_value(g).unwrap();
      assert_eq!(json.as_str(), Some(g.as_ref()));
      assert_eq!(Genitalia::from_str(g.as_ref()).unwrap(), g);
    }
  }

  #[test]
  fn anonymous_means_participant_without_person() {
    let participant = NewParticipant::new(IndividualId(3), Genitalia::Other).into_participant();
    let individual = Individual {
      id:          IndividualId(3),
      person:      None,
      participant: Some(participant),
    };
    assert!(individual.is_anonymous());
  }
}
