//! Guests and RSVP state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::document::{Collection, Document, DocumentMeta, present};

/// Which side of the couple a guest is invited by.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum Side {
  Bride,
  Groom,
  #[default]
  Both,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum Relationship {
  Family,
  #[default]
  Friend,
  Colleague,
  Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
  #[serde(flatten)]
  pub meta:         DocumentMeta,
  pub name:         String,
  pub email:        Option<String>,
  pub phone:        Option<String>,
  pub relationship: Relationship,
  pub side:         Side,
  pub invited:      bool,
  /// RSVP received.
  pub confirmed:    bool,
  pub attending:    bool,
  /// Bringing one extra person; counts twice toward headcount.
  pub plus_one:     bool,
  pub table_number: Option<u32>,
}

impl Guest {
  /// Seats this guest occupies: two with a plus-one, otherwise one.
  pub fn headcount(&self) -> u32 { if self.plus_one { 2 } else { 1 } }
}

/// Input to [`crate::store::PlannerStore::add`] for guests.
/// New guests are invited, unconfirmed and not yet attending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGuest {
  pub name:         String,
  #[serde(default)]
  pub email:        Option<String>,
  #[serde(default)]
  pub phone:        Option<String>,
  #[serde(default)]
  pub relationship: Relationship,
  #[serde(default)]
  pub side:         Side,
  #[serde(default)]
  pub plus_one:     bool,
  #[serde(default)]
  pub table_number: Option<u32>,
}

impl NewGuest {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name:         name.into(),
      email:        None,
      phone:        None,
      relationship: Relationship::default(),
      side:         Side::default(),
      plus_one:     false,
      table_number: None,
    }
  }
}

/// Partial update for a guest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestPatch {
  pub name:         Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub email:        Option<Option<String>>,
  #[serde(default, deserialize_with = "present")]
  pub phone:        Option<Option<String>>,
  pub relationship: Option<Relationship>,
  pub side:         Option<Side>,
  pub invited:      Option<bool>,
  pub confirmed:    Option<bool>,
  pub attending:    Option<bool>,
  pub plus_one:     Option<bool>,
  #[serde(default, deserialize_with = "present")]
  pub table_number: Option<Option<u32>>,
}

impl GuestPatch {
  pub fn confirmed(confirmed: bool) -> Self {
    Self { confirmed: Some(confirmed), ..Self::default() }
  }
}

impl Document for Guest {
  type New = NewGuest;
  type Patch = GuestPatch;

  const COLLECTION: Collection = Collection::Guests;

  fn create(meta: DocumentMeta, input: NewGuest) -> Self {
    Self {
      meta,
      name: input.name,
      email: input.email,
      phone: input.phone,
      relationship: input.relationship,
      side: input.side,
      invited: true,
      confirmed: false,
      attending: false,
      plus_one: input.plus_one,
      table_number: input.table_number,
    }
  }

  fn meta(&self) -> &DocumentMeta { &self.meta }

  fn meta_mut(&mut self) -> &mut DocumentMeta { &mut self.meta }

  fn apply(&mut self, patch: GuestPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(email) = patch.email {
      self.email = email;
    }
    if let Some(phone) = patch.phone {
      self.phone = phone;
    }
    if let Some(relationship) = patch.relationship {
      self.relationship = relationship;
    }
    if let Some(side) = patch.side {
      self.side = side;
    }
    if let Some(invited) = patch.invited {
      self.invited = invited;
    }
    if let Some(confirmed) = patch.confirmed {
      self.confirmed = confirmed;
    }
    if let Some(attending) = patch.attending {
      self.attending = attending;
    }
    if let Some(plus_one) = patch.plus_one {
      self.plus_one = plus_one;
    }
    if let Some(table_number) = patch.table_number {
      self.table_number = table_number;
    }
  }

  /// Alphabetical by name, ignoring case.
  fn snapshot_order(a: &Self, b: &Self) -> Ordering {
    a.name
      .to_lowercase()
      .cmp(&b.name.to_lowercase())
      .then_with(|| a.name.cmp(&b.name))
  }
}
