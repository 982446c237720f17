//! The home-screen summary: countdown plus every collection's statistics.
//!
//! [`HomeSummary::compute`] is the pure form. [`SummaryFeed`] keeps the latest
//! snapshot of each collection, recomputes on every change and owns the
//! countdown ticker for the plan's wedding instant.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::{
  checklist::ChecklistItem,
  countdown::{Clock, Countdown, CountdownTicker, TimeRemaining},
  document::OwnerId,
  expense::Expense,
  guest::Guest,
  plan::WeddingPlan,
  stats::{
    BudgetStats, CategoryTotal, ChecklistStats, GuestStats, TaskStats,
    category_breakdown,
  },
  store::PlannerStore,
  subscription::Subscription,
  task::Task,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSummary {
  pub plan_name:   Option<String>,
  pub couple_name: Option<String>,
  pub wedding_at:  Option<DateTime<Utc>>,
  pub countdown:   Countdown,
  pub tasks:       TaskStats,
  pub guests:      GuestStats,
  pub budget:      BudgetStats,
  pub breakdown:   Vec<CategoryTotal>,
  pub checklist:   ChecklistStats,
}

impl HomeSummary {
  pub fn compute(
    plan: Option<&WeddingPlan>,
    tasks: &[Task],
    guests: &[Guest],
    expenses: &[Expense],
    checklist: &[ChecklistItem],
    now: DateTime<Utc>,
  ) -> Self {
    let wedding_at = plan.map(|p| p.wedding_at);
    Self {
      plan_name: plan.map(|p| p.plan_name.clone()),
      couple_name: plan.map(|p| p.couple_name.clone()),
      wedding_at,
      countdown: TimeRemaining::until(wedding_at, now).padded(),
      tasks: TaskStats::compute(tasks, now),
      guests: GuestStats::compute(guests),
      budget: BudgetStats::compute(expenses),
      breakdown: category_breakdown(expenses),
      checklist: ChecklistStats::compute(checklist),
    }
  }
}

/// The five snapshot sequences a [`SummaryFeed`] listens to.
pub struct SummarySources {
  pub plan:      Subscription<WeddingPlan>,
  pub tasks:     Subscription<Task>,
  pub guests:    Subscription<Guest>,
  pub expenses:  Subscription<Expense>,
  pub checklist: Subscription<ChecklistItem>,
}

impl SummarySources {
  /// Open all five subscriptions for `owner`.
  pub async fn subscribe<S: PlannerStore>(
    store: &S,
    owner: &OwnerId,
  ) -> Result<Self, S::Error> {
    Ok(Self {
      plan:      store.subscribe_plan(owner.clone()).await?,
      tasks:     store.subscribe::<Task>(owner.clone()).await?,
      guests:    store.subscribe::<Guest>(owner.clone()).await?,
      expenses:  store.subscribe::<Expense>(owner.clone()).await?,
      checklist: store.subscribe::<ChecklistItem>(owner.clone()).await?,
    })
  }
}

/// Latest-snapshot state behind the home summary.
pub struct SummaryFeed {
  clock:     Arc<dyn Clock>,
  ticker:    CountdownTicker,
  plan:      Option<WeddingPlan>,
  tasks:     Vec<Task>,
  guests:    Vec<Guest>,
  expenses:  Vec<Expense>,
  checklist: Vec<ChecklistItem>,
}

impl SummaryFeed {
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self {
      ticker: CountdownTicker::new(Arc::clone(&clock)),
      clock,
      plan: None,
      tasks: Vec::new(),
      guests: Vec::new(),
      expenses: Vec::new(),
      checklist: Vec::new(),
    }
  }

  /// Live countdown to the current plan's wedding instant.
  pub fn countdown(&self) -> watch::Receiver<TimeRemaining> { self.ticker.subscribe() }

  pub fn summary(&self) -> HomeSummary {
    HomeSummary::compute(
      self.plan.as_ref(),
      &self.tasks,
      &self.guests,
      &self.expenses,
      &self.checklist,
      self.clock.now(),
    )
  }

  /// Replace the plan and rebind the countdown if the wedding instant moved.
  ///
  /// Must be called from within a tokio runtime.
  pub fn set_plan(&mut self, plan: Option<WeddingPlan>) {
    self.ticker.retarget(plan.as_ref().map(|p| p.wedding_at));
    self.plan = plan;
  }

  pub fn set_tasks(&mut self, tasks: Vec<Task>) { self.tasks = tasks; }

  pub fn set_guests(&mut self, guests: Vec<Guest>) { self.guests = guests; }

  pub fn set_expenses(&mut self, expenses: Vec<Expense>) { self.expenses = expenses; }

  pub fn set_checklist(&mut self, checklist: Vec<ChecklistItem>) {
    self.checklist = checklist;
  }

  /// Apply snapshots from every source as they arrive, publishing a fresh
  /// summary after each one, until all sources have ended.
  ///
  /// Sources are independent; no arrival order is assumed. The countdown
  /// ticker is stopped on return.
  pub async fn run(
    mut self,
    mut sources: SummarySources,
    out: watch::Sender<HomeSummary>,
  ) {
    let mut plan_open      = true;
    let mut tasks_open     = true;
    let mut guests_open    = true;
    let mut expenses_open  = true;
    let mut checklist_open = true;

    loop {
      tokio::select! {
        snapshot = sources.plan.next(), if plan_open => match snapshot {
          Some(mut plans) => self.set_plan(plans.pop()),
          None => { plan_open = false; continue; }
        },
        snapshot = sources.tasks.next(), if tasks_open => match snapshot {
          Some(tasks) => self.set_tasks(tasks),
          None => { tasks_open = false; continue; }
        },
        snapshot = sources.guests.next(), if guests_open => match snapshot {
          Some(guests) => self.set_guests(guests),
          None => { guests_open = false; continue; }
        },
        snapshot = sources.expenses.next(), if expenses_open => match snapshot {
          Some(expenses) => self.set_expenses(expenses),
          None => { expenses_open = false; continue; }
        },
        snapshot = sources.checklist.next(), if checklist_open => match snapshot {
          Some(items) => self.set_checklist(items),
          None => { checklist_open = false; continue; }
        },
        else => break,
      }
      out.send_replace(self.summary());
    }

    self.ticker.stop();
    tracing::debug!("summary feed sources exhausted");
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
    expense::ExpenseCategory,
    guest::{Relationship, Side},
    plan::BudgetRange,
    task::TaskCategory,
  };

  struct FixedClock(DateTime<Utc>);

  impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> { self.0 }
  }

  fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap() }

  fn meta() -> DocumentMeta {
    DocumentMeta {
      id:         Uuid::new_v4(),
      owner_id:   OwnerId::from("owner"),
      created_at: now(),
      updated_at: None,
    }
  }

  fn plan(days_out: i64) -> WeddingPlan {
    WeddingPlan {
      owner_id:       OwnerId::from("owner"),
      plan_name:      "Autumn".into(),
      couple_name:    "Sam & Alex".into(),
      wedding_at:     now() + Duration::days(days_out),
      budget:         BudgetRange::From3MTo5M,
      guest_estimate: 80,
      location:       "Porto".into(),
      setup_complete: true,
      created_at:     now(),
      updated_at:     now(),
    }
  }

  fn task(completed: bool) -> Task {
    Task {
      meta: meta(),
      title: "t".into(),
      description: None,
      due_at: now() + Duration::days(1),
      completed,
      category: TaskCategory::Planning,
    }
  }

  fn guest(plus_one: bool) -> Guest {
    Guest {
      meta: meta(),
      name: "g".into(),
      email: None,
      phone: None,
      relationship: Relationship::Friend,
      side: Side::Bride,
      invited: true,
      confirmed: false,
      attending: false,
      plus_one,
      table_number: None,
    }
  }

  fn expense(estimated: f64, actual: f64) -> Expense {
    Expense {
      meta: meta(),
      category: ExpenseCategory::Venue,
      item: "hall".into(),
      estimated_cost: estimated,
      actual_cost: actual,
      paid: false,
      notes: None,
    }
  }

  fn item() -> ChecklistItem {
    ChecklistItem {
      meta: meta(),
      title: "c".into(),
      category: ChecklistCategory::Catering,
      priority: Priority::Low,
      completed: true,
    }
  }

  #[test]
  fn without_a_plan_everything_is_zero() {
    let summary = HomeSummary::compute(None, &[], &[], &[], &[], now());
    assert_eq!(summary.plan_name, None);
    assert_eq!(summary.countdown, Countdown::default());
    assert_eq!(summary.budget.percent_spent, 0);
    assert!(summary.breakdown.is_empty());
  }

  #[test]
  fn summary_reflects_plan_and_collections() {
    let plan = plan(10);
    let summary = HomeSummary::compute(
      Some(&plan),
      &[task(true), task(false)],
      &[guest(true)],
      &[expense(400.0, 100.0)],
      &[item()],
      now(),
    );
    assert_eq!(summary.couple_name.as_deref(), Some("Sam & Alex"));
    assert_eq!(summary.countdown.days, "10");
    assert_eq!(summary.tasks.percent_complete, 50);
    assert_eq!(summary.guests.headcount, 2);
    assert_eq!(summary.budget.percent_spent, 25);
    assert_eq!(summary.checklist.completion_rate, 100);
  }

  #[tokio::test]
  async fn feed_applies_synthetic_snapshots_in_any_order() {
    let feed = SummaryFeed::new(Arc::new(FixedClock(now())));
    let countdown = feed.countdown();

    let sources = SummarySources {
      plan:      Subscription::from_snapshots(vec![vec![], vec![plan(3)]]),
      tasks:     Subscription::from_snapshots(vec![
        vec![task(false)],
        vec![task(false), task(true)],
      ]),
      guests:    Subscription::from_snapshots(vec![vec![guest(false), guest(true)]]),
      expenses:  Subscription::from_snapshots(vec![
        vec![expense(1000.0, 0.0)],
        vec![],
      ]),
      checklist: Subscription::from_snapshots(Vec::new()),
    };

    let (tx, rx) = watch::channel(HomeSummary::compute(None, &[], &[], &[], &[], now()));
    feed.run(sources, tx).await;

    let last = rx.borrow().clone();
    assert_eq!(last.plan_name.as_deref(), Some("Autumn"));
    assert_eq!(last.countdown.days, "03");
    assert_eq!(last.tasks.total, 2);
    assert_eq!(last.tasks.completed, 1);
    assert_eq!(last.guests.headcount, 3);
    assert_eq!(last.budget.total_estimated, 0.0);
    assert_eq!(last.checklist.total, 0);

    // The ticker was bound to the plan's instant and published at bind time.
    assert_eq!(countdown.borrow().days, 3);
  }

  #[tokio::test]
  async fn plan_change_rebinds_countdown() {
    let mut feed = SummaryFeed::new(Arc::new(FixedClock(now())));
    let countdown = feed.countdown();

    feed.set_plan(Some(plan(7)));
    assert_eq!(countdown.borrow().days, 7);

    feed.set_plan(Some(plan(2)));
    assert_eq!(countdown.borrow().days, 2);

    feed.set_plan(None);
    assert_eq!(*countdown.borrow(), TimeRemaining::default());
  }
}
