//! Budget line items.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::document::{Collection, Document, DocumentMeta, present};

/// The fixed set of expense categories. Declaration order is the tie-break
/// order for the category breakdown.
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
pub enum ExpenseCategory {
  #[default]
  Venue,
  Catering,
  Photography,
  Decoration,
  Attire,
  Entertainment,
  Invitations,
  Transportation,
  Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
  #[serde(flatten)]
  pub meta:           DocumentMeta,
  pub category:       ExpenseCategory,
  pub item:           String,
  pub estimated_cost: f64,
  pub actual_cost:    f64,
  pub paid:           bool,
  pub notes:          Option<String>,
}

/// Input to [`crate::store::PlannerStore::add`] for expenses.
/// Nothing has been spent on a new expense: `actual_cost` is 0 and it is
/// unpaid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
  #[serde(default)]
  pub category:       ExpenseCategory,
  pub item:           String,
  pub estimated_cost: f64,
  #[serde(default)]
  pub notes:          Option<String>,
}

/// Partial update for an expense.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpensePatch {
  pub category:       Option<ExpenseCategory>,
  pub item:           Option<String>,
  pub estimated_cost: Option<f64>,
  pub actual_cost:    Option<f64>,
  pub paid:           Option<bool>,
  #[serde(default, deserialize_with = "present")]
  pub notes:          Option<Option<String>>,
}

impl Document for Expense {
  type New = NewExpense;
  type Patch = ExpensePatch;

  const COLLECTION: Collection = Collection::Expenses;

  fn create(meta: DocumentMeta, input: NewExpense) -> Self {
    Self {
      meta,
      category: input.category,
      item: input.item,
      estimated_cost: input.estimated_cost,
      actual_cost: 0.0,
      paid: false,
      notes: input.notes,
    }
  }

  fn meta(&self) -> &DocumentMeta { &self.meta }

  fn meta_mut(&mut self) -> &mut DocumentMeta { &mut self.meta }

  fn apply(&mut self, patch: ExpensePatch) {
    if let Some(category) = patch.category {
      self.category = category;
    }
    if let Some(item) = patch.item {
      self.item = item;
    }
    if let Some(estimated_cost) = patch.estimated_cost {
      self.estimated_cost = estimated_cost;
    }
    if let Some(actual_cost) = patch.actual_cost {
      self.actual_cost = actual_cost;
    }
    if let Some(paid) = patch.paid {
      self.paid = paid;
    }
    if let Some(notes) = patch.notes {
      self.notes = notes;
    }
  }

  /// Newest first.
  fn snapshot_order(a: &Self, b: &Self) -> Ordering {
    b.meta.created_at.cmp(&a.meta.created_at)
  }
}
