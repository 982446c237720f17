//! Planning tasks with due dates.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::document::{Collection, Document, DocumentMeta, present};

/// The fixed set of task categories, in display order.
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
pub enum TaskCategory {
  #[default]
  Planning,
  Venue,
  Catering,
  Shopping,
  Decor,
  Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  #[serde(flatten)]
  pub meta:        DocumentMeta,
  pub title:       String,
  pub description: Option<String>,
  pub due_at:      DateTime<Utc>,
  pub completed:   bool,
  pub category:    TaskCategory,
}

impl Task {
  /// A task is overdue when it is still open and its due instant has passed.
  pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
    !self.completed && self.due_at < now
  }
}

/// Input to [`crate::store::PlannerStore::add`] for tasks.
/// Tasks always start out incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
  pub title:       String,
  #[serde(default)]
  pub description: Option<String>,
  pub due_at:      DateTime<Utc>,
  #[serde(default)]
  pub category:    TaskCategory,
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
  pub title:       Option<String>,
  #[serde(default, deserialize_with = "present")]
  pub description: Option<Option<String>>,
  pub due_at:      Option<DateTime<Utc>>,
  pub completed:   Option<bool>,
  pub category:    Option<TaskCategory>,
}

impl TaskPatch {
  pub fn completed(completed: bool) -> Self {
    Self { completed: Some(completed), ..Self::default() }
  }
}

impl Document for Task {
  type New = NewTask;
  type Patch = TaskPatch;

  const COLLECTION: Collection = Collection::Tasks;

  fn create(meta: DocumentMeta, input: NewTask) -> Self {
    Self {
      meta,
      title: input.title,
      description: input.description,
      due_at: input.due_at,
      completed: false,
      category: input.category,
    }
  }

  fn meta(&self) -> &DocumentMeta { &self.meta }

  fn meta_mut(&mut self) -> &mut DocumentMeta { &mut self.meta }

  fn apply(&mut self, patch: TaskPatch) {
    if let Some(title) = patch.title {
      self.title = title;
    }
    if let Some(description) = patch.description {
      self.description = description;
    }
    if let Some(due_at) = patch.due_at {
      self.due_at = due_at;
    }
    if let Some(completed) = patch.completed {
      self.completed = completed;
    }
    if let Some(category) = patch.category {
      self.category = category;
    }
  }

  /// Earliest due date first.
  fn snapshot_order(a: &Self, b: &Self) -> Ordering { a.due_at.cmp(&b.due_at) }
}
