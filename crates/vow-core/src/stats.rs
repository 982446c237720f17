//! Summary statistics over already-fetched collections.
//!
//! Every reduction here is a single pass over an in-memory slice. None of them
//! can fail: empty input yields zeroes, and a zero denominator yields a zero
//! percentage rather than NaN.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
  checklist::ChecklistItem,
  expense::{Expense, ExpenseCategory},
  guest::Guest,
  task::Task,
};

/// `part / whole` as a whole-number percentage, rounded half away from zero.
/// A non-positive or non-finite `whole` yields 0.
pub fn percent(part: f64, whole: f64) -> u32 {
  if !whole.is_finite() || whole <= 0.0 || !part.is_finite() || part <= 0.0 {
    return 0;
  }
  (100.0 * part / whole).round() as u32
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
  pub total:            usize,
  pub completed:        usize,
  pub pending:          usize,
  /// Open tasks whose due instant has passed.
  pub overdue:          usize,
  pub percent_complete: u32,
}

impl TaskStats {
  pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
    let mut completed = 0;
    let mut overdue   = 0;
    for task in tasks {
      if task.completed {
        completed += 1;
      } else if task.is_overdue(now) {
        overdue += 1;
      }
    }
    let total = tasks.len();
    Self {
      total,
      completed,
      pending: total - completed,
      overdue,
      percent_complete: percent(completed as f64, total as f64),
    }
  }
}

// ─── Guests ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuestStats {
  pub total:     usize,
  pub confirmed: usize,
  pub pending:   usize,
  /// Seats needed, counting plus-ones, regardless of RSVP status.
  pub headcount: u32,
}

impl GuestStats {
  pub fn compute(guests: &[Guest]) -> Self {
    let (confirmed, headcount) = guests.iter().fold((0, 0), |(c, h), g| {
      (c + usize::from(g.confirmed), h + g.headcount())
    });
    Self {
      total: guests.len(),
      confirmed,
      pending: guests.len() - confirmed,
      headcount,
    }
  }
}

// ─── Budget ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetStats {
  pub total_estimated: f64,
  pub total_actual:    f64,
  /// Actual cost of the expenses marked paid.
  pub total_paid:      f64,
  /// Estimated minus actual. Negative when over budget; never clamped.
  pub remaining:       f64,
  pub percent_spent:   u32,
}

impl BudgetStats {
  pub fn compute(expenses: &[Expense]) -> Self {
    let mut total_estimated = 0.0;
    let mut total_actual    = 0.0;
    let mut total_paid      = 0.0;
    for e in expenses {
      total_estimated += e.estimated_cost;
      total_actual += e.actual_cost;
      if e.paid {
        total_paid += e.actual_cost;
      }
    }
    Self {
      total_estimated,
      total_actual,
      total_paid,
      remaining: total_estimated - total_actual,
      percent_spent: percent(total_actual, total_estimated),
    }
  }

  pub fn is_over_budget(&self) -> bool { self.remaining < 0.0 }

  /// `|remaining|`, for rendering "X left" or "X over".
  pub fn remaining_magnitude(&self) -> f64 { self.remaining.abs() }
}

/// Spend within one expense category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
  pub category:        ExpenseCategory,
  pub estimated:       f64,
  pub actual:          f64,
  pub count:           usize,
  /// This category's estimate as a percentage of the overall estimate.
  pub share_of_budget: u32,
  /// `actual / estimated`, capped at 1.0; 0.0 with no estimate.
  pub spent_ratio:     f64,
}

/// Per-category totals for the non-empty categories, largest estimate first.
///
/// The sort is stable over [`ExpenseCategory`] declaration order, so
/// categories with equal estimates keep that order.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
  let mut sums: HashMap<ExpenseCategory, (f64, f64, usize)> = HashMap::new();
  for e in expenses {
    let entry = sums.entry(e.category).or_default();
    entry.0 += e.estimated_cost;
    entry.1 += e.actual_cost;
    entry.2 += 1;
  }

  let overall: f64 = sums.values().map(|(est, _, _)| est).sum();

  let mut breakdown: Vec<CategoryTotal> = ExpenseCategory::iter()
    .filter_map(|category| {
      let &(estimated, actual, count) = sums.get(&category)?;
      let spent_ratio = if estimated > 0.0 {
        (actual / estimated).min(1.0)
      } else {
        0.0
      };
      Some(CategoryTotal {
        category,
        estimated,
        actual,
        count,
        share_of_budget: percent(estimated, overall),
        spent_ratio,
      })
    })
    .collect();

  breakdown.sort_by(|a, b| b.estimated.total_cmp(&a.estimated));
  breakdown
}

// ─── Checklist ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChecklistStats {
  pub total:           usize,
  pub completed:       usize,
  pub pending:         usize,
  pub completion_rate: u32,
}

impl ChecklistStats {
  pub fn compute(items: &[ChecklistItem]) -> Self {
    let completed = items.iter().filter(|i| i.completed).count();
    Self {
      total: items.len(),
      completed,
      pending: items.len() - completed,
      completion_rate: percent(completed as f64, items.len() as f64),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};
  use uuid::Uuid;

  use super::*;
  use crate::{
    checklist::{ChecklistCategory, Priority},
    document::{DocumentMeta, OwnerId},
    guest::{Relationship, Side},
    task::TaskCategory,
  };

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap() }

  fn meta() -> DocumentMeta {
    DocumentMeta {
      id:         Uuid::new_v4(),
      owner_id:   OwnerId::from("owner"),
      created_at: now(),
      updated_at: None,
    }
  }

  fn task(completed: bool, due_in_days: i64) -> Task {
    Task {
      meta:        meta(),
      title:       "t".into(),
      description: None,
      due_at:      now() + Duration::days(due_in_days),
      completed,
      category:    TaskCategory::Planning,
    }
  }

  fn guest(confirmed: bool, plus_one: bool) -> Guest {
    Guest {
      meta:         meta(),
      name:         "g".into(),
      email:        None,
      phone:        None,
      relationship: Relationship::Friend,
      side:         Side::Both,
      invited:      true,
      confirmed,
      attending:    false,
      plus_one,
      table_number: None,
    }
  }

  fn expense(category: ExpenseCategory, estimated: f64, actual: f64, paid: bool) -> Expense {
    Expense {
      meta:           meta(),
      category,
      item:           "e".into(),
      estimated_cost: estimated,
      actual_cost:    actual,
      paid,
      notes:          None,
    }
  }

  fn item(completed: bool) -> ChecklistItem {
    ChecklistItem {
      meta:      meta(),
      title:     "c".into(),
      category:  ChecklistCategory::Venue,
      priority:  Priority::High,
      completed,
    }
  }

  #[test]
  fn percent_guards_zero_denominator() {
    assert_eq!(percent(5.0, 0.0), 0);
    assert_eq!(percent(0.0, 0.0), 0);
    assert_eq!(percent(1.0, f64::NAN), 0);
    assert_eq!(percent(1.0, 3.0), 33);
    assert_eq!(percent(2.0, 3.0), 67);
    assert_eq!(percent(1.0, 8.0), 13);
  }

  #[test]
  fn empty_collections_are_all_zero() {
    assert_eq!(TaskStats::compute(&[], now()), TaskStats::default());
    assert_eq!(GuestStats::compute(&[]), GuestStats::default());
    assert_eq!(BudgetStats::compute(&[]), BudgetStats::default());
    assert_eq!(ChecklistStats::compute(&[]), ChecklistStats::default());
    assert!(category_breakdown(&[]).is_empty());
  }

  #[test]
  fn task_stats_count_and_round() {
    let tasks = vec![task(true, -3), task(false, -1), task(false, 4)];
    let stats = TaskStats::compute(&tasks, now());
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2);
    assert!(stats.completed <= stats.total);
    assert_eq!(stats.percent_complete, 33);
  }

  #[test]
  fn completed_tasks_are_never_overdue() {
    let tasks = vec![task(true, -10), task(false, -1), task(false, 1)];
    assert_eq!(TaskStats::compute(&tasks, now()).overdue, 1);
  }

  #[test]
  fn headcount_counts_plus_ones_regardless_of_rsvp() {
    let guests = vec![guest(true, true), guest(false, true), guest(false, false)];
    let stats = GuestStats::compute(&guests);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.confirmed, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.headcount, 5);
  }

  #[test]
  fn zero_estimate_means_zero_percent_spent() {
    let expenses = vec![expense(ExpenseCategory::Venue, 0.0, 250.0, true)];
    let stats = BudgetStats::compute(&expenses);
    assert_eq!(stats.percent_spent, 0);
    assert_eq!(stats.remaining, -250.0);
    assert!(stats.is_over_budget());
    assert_eq!(stats.remaining_magnitude(), 250.0);
  }

  #[test]
  fn budget_totals_and_paid_only_counts_paid() {
    let expenses = vec![
      expense(ExpenseCategory::Venue, 1000.0, 600.0, true),
      expense(ExpenseCategory::Catering, 1000.0, 300.0, false),
    ];
    let stats = BudgetStats::compute(&expenses);
    assert_eq!(stats.total_estimated, 2000.0);
    assert_eq!(stats.total_actual, 900.0);
    assert_eq!(stats.total_paid, 600.0);
    assert_eq!(stats.remaining, 1100.0);
    assert_eq!(stats.percent_spent, 45);
    assert!(!stats.is_over_budget());
  }

  #[test]
  fn over_budget_percent_exceeds_100() {
    let expenses = vec![expense(ExpenseCategory::Attire, 100.0, 150.0, false)];
    assert_eq!(BudgetStats::compute(&expenses).percent_spent, 150);
  }

  #[test]
  fn breakdown_groups_sorts_and_drops_empty_categories() {
    let expenses = vec![
      expense(ExpenseCategory::Catering, 500.0, 0.0, false),
      expense(ExpenseCategory::Venue, 1000.0, 0.0, false),
      expense(ExpenseCategory::Venue, 2000.0, 0.0, false),
    ];
    let breakdown = category_breakdown(&expenses);
    assert_eq!(breakdown.len(), 2);

    assert_eq!(breakdown[0].category, ExpenseCategory::Venue);
    assert_eq!(breakdown[0].estimated, 3000.0);
    assert_eq!(breakdown[0].count, 2);
    assert_eq!(breakdown[0].share_of_budget, 86);

    assert_eq!(breakdown[1].category, ExpenseCategory::Catering);
    assert_eq!(breakdown[1].estimated, 500.0);
    assert_eq!(breakdown[1].count, 1);

    assert!(breakdown.iter().all(|c| c.category != ExpenseCategory::Photography));
  }

  #[test]
  fn breakdown_ties_keep_enumeration_order() {
    let expenses = vec![
      expense(ExpenseCategory::Other, 100.0, 0.0, false),
      expense(ExpenseCategory::Attire, 100.0, 0.0, false),
      expense(ExpenseCategory::Catering, 100.0, 0.0, false),
    ];
    let order: Vec<_> = category_breakdown(&expenses)
      .into_iter()
      .map(|c| c.category)
      .collect();
    assert_eq!(order, [
      ExpenseCategory::Catering,
      ExpenseCategory::Attire,
      ExpenseCategory::Other,
    ]);
  }

  #[test]
  fn breakdown_spent_ratio_is_capped() {
    let expenses = vec![
      expense(ExpenseCategory::Venue, 100.0, 250.0, false),
      expense(ExpenseCategory::Catering, 0.0, 10.0, false),
      expense(ExpenseCategory::Attire, 200.0, 50.0, false),
    ];
    let breakdown = category_breakdown(&expenses);
    let ratio = |cat| breakdown.iter().find(|c| c.category == cat).unwrap().spent_ratio;
    assert_eq!(ratio(ExpenseCategory::Venue), 1.0);
    assert_eq!(ratio(ExpenseCategory::Catering), 0.0);
    assert_eq!(ratio(ExpenseCategory::Attire), 0.25);
  }

  #[test]
  fn checklist_completion_rate_rounds() {
    let items = vec![item(true), item(true), item(false)];
    let stats = ChecklistStats::compute(&items);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.completion_rate, 67);
  }
}
