//! The wedding plan: one per owner, written by the setup wizard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::document::OwnerId;

/// The budget bracket picked during setup. Display names are persisted.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum BudgetRange {
  #[serde(rename = "Under 1.5M")]
  #[strum(to_string = "Under 1.5M")]
  Under1_5M,
  #[serde(rename = "1.5M - 3M")]
  #[strum(to_string = "1.5M - 3M")]
  From1_5MTo3M,
  #[serde(rename = "3M - 5M")]
  #[strum(to_string = "3M - 5M")]
  From3MTo5M,
  #[serde(rename = "Above 5M")]
  #[strum(to_string = "Above 5M")]
  Above5M,
}

/// The stored plan, keyed by its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeddingPlan {
  pub owner_id:       OwnerId,
  pub plan_name:      String,
  pub couple_name:    String,
  pub wedding_at:     DateTime<Utc>,
  pub budget:         BudgetRange,
  pub guest_estimate: u32,
  pub location:       String,
  pub setup_complete: bool,
  /// Set by the first save only.
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

/// Input to [`crate::store::PlannerStore::save_plan`].
///
/// Saving is an upsert: every field is overwritten, `created_at` survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
  pub plan_name:      String,
  pub couple_name:    String,
  pub wedding_at:     DateTime<Utc>,
  pub budget:         BudgetRange,
  pub guest_estimate: u32,
  pub location:       String,
}

impl WeddingPlan {
  /// Build the stored plan from a save, keeping `created_at` from `previous`
  /// when there is one.
  pub fn from_save(
    owner_id: OwnerId,
    input: PlanInput,
    previous: Option<&WeddingPlan>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      owner_id,
      plan_name: input.plan_name,
      couple_name: input.couple_name,
      wedding_at: input.wedding_at,
      budget: input.budget,
      guest_estimate: input.guest_estimate,
      location: input.location,
      setup_complete: true,
      created_at: previous.map_or(now, |p| p.created_at),
      updated_at: now,
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  fn input() -> PlanInput {
    PlanInput {
      plan_name:      "Summer".into(),
      couple_name:    "Ada & Grace".into(),
      wedding_at:     Utc.with_ymd_and_hms(2027, 6, 12, 15, 0, 0).unwrap(),
      budget:         BudgetRange::From1_5MTo3M,
      guest_estimate: 120,
      location:       "Lisbon".into(),
    }
  }

  #[test]
  fn budget_range_uses_display_names() {
    let json = serde_json::to_string(&BudgetRange::From1_5MTo3M).unwrap();
    assert_eq!(json, r#""1.5M - 3M""#);
    assert_eq!(BudgetRange::Above5M.to_string(), "Above 5M");
    let parsed: BudgetRange = "Under 1.5M".parse().unwrap();
    assert_eq!(parsed, BudgetRange::Under1_5M);
  }

  #[test]
  fn resave_keeps_created_at() {
    let first_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let owner = OwnerId::from("u1");
    let first = WeddingPlan::from_save(owner.clone(), input(), None, first_at);
    assert_eq!(first.created_at, first_at);
    assert!(first.setup_complete);

    let later = first_at + Duration::days(3);
    let second = WeddingPlan::from_save(owner, input(), Some(&first), later);
    assert_eq!(second.created_at, first_at);
    assert_eq!(second.updated_at, later);
  }
}
