//! Prioritised checklist items.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::document::{Collection, Document, DocumentMeta};

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
pub enum ChecklistCategory {
  #[default]
  Venue,
  Catering,
  Decoration,
  Photography,
  Entertainment,
  Attire,
  Other,
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  High,
  #[default]
  Medium,
  Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
  #[serde(flatten)]
  pub meta:      DocumentMeta,
  pub title:     String,
  pub category:  ChecklistCategory,
  pub priority:  Priority,
  pub completed: bool,
}

/// Input to [`crate::store::PlannerStore::add`] for checklist items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChecklistItem {
  pub title:    String,
  #[serde(default)]
  pub category: ChecklistCategory,
  #[serde(default)]
  pub priority: Priority,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistPatch {
  pub title:     Option<String>,
  pub category:  Option<ChecklistCategory>,
  pub priority:  Option<Priority>,
  pub completed: Option<bool>,
}

impl Document for ChecklistItem {
  type New = NewChecklistItem;
  type Patch = ChecklistPatch;

  const COLLECTION: Collection = Collection::ChecklistItems;

  fn create(meta: DocumentMeta, input: NewChecklistItem) -> Self {
    Self {
      meta,
      title: input.title,
      category: input.category,
      priority: input.priority,
      completed: false,
    }
  }

  fn meta(&self) -> &DocumentMeta { &self.meta }

  fn meta_mut(&mut self) -> &mut DocumentMeta { &mut self.meta }

  fn apply(&mut self, patch: ChecklistPatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
    if let Some(priority) = patch.priority {
      self.priority = priority;
    }
    if let Some(completed) = patch.completed {
      self.completed = completed;
    }
  }

  /// Newest first.
  fn snapshot_order(a: &Self, b: &Self) -> Ordering {
    b.meta.created_at.cmp(&a.meta.created_at)
  }
}
