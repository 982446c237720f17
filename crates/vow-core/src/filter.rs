//! Dashboard list filters over already-fetched snapshots.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, de};

use crate::{
  checklist::{ChecklistCategory, ChecklistItem},
  expense::{Expense, ExpenseCategory},
  guest::{Guest, Side},
  task::{Task, TaskCategory},
};

/// RSVP filter for the guest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpFilter {
  #[default]
  All,
  Confirmed,
  Pending,
}

/// Completion filter for tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionFilter {
  #[default]
  All,
  Pending,
  Completed,
}

impl CompletionFilter {
  fn matches(self, completed: bool) -> bool {
    match self {
      Self::All => true,
      Self::Pending => !completed,
      Self::Completed => completed,
    }
  }
}

/// Reads a single-choice filter value. Absent, blank and `All` (any case)
/// all mean no restriction.
fn all_or<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr,
  T::Err: Display,
{
  let value = Option::<String>::deserialize(d)?;
  match value.as_deref().map(str::trim) {
    None | Some("") => Ok(None),
    Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
    Some(v) => v.parse().map(Some).map_err(de::Error::custom),
  }
}

/// `None` on any field means "All".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuestFilter {
  /// Case-insensitive substring of the name or email.
  pub search: Option<String>,
  #[serde(default, deserialize_with = "all_or")]
  pub side:   Option<Side>,
  #[serde(default)]
  pub status: RsvpFilter,
}

impl GuestFilter {
  pub fn matches(&self, guest: &Guest) -> bool {
    let search_match = match self.search.as_deref().map(str::trim) {
      None | Some("") => true,
      Some(needle) => {
        let needle = needle.to_lowercase();
        guest.name.to_lowercase().contains(&needle)
          || guest
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&needle))
      }
    };
    let side_match = self.side.is_none_or(|side| guest.side == side);
    let status_match = match self.status {
      RsvpFilter::All => true,
      RsvpFilter::Confirmed => guest.confirmed,
      RsvpFilter::Pending => !guest.confirmed,
    };
    search_match && side_match && status_match
  }

  pub fn apply<'a>(&self, guests: &'a [Guest]) -> Vec<&'a Guest> {
    guests.iter().filter(|g| self.matches(g)).collect()
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
  #[serde(default, deserialize_with = "all_or")]
  pub category: Option<TaskCategory>,
  #[serde(default)]
  pub status:   CompletionFilter,
}

impl TaskFilter {
  pub fn matches(&self, task: &Task) -> bool {
    self.category.is_none_or(|c| task.category == c) && self.status.matches(task.completed)
  }

  pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
    tasks.iter().filter(|t| self.matches(t)).collect()
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseFilter {
  #[serde(default, deserialize_with = "all_or")]
  pub category: Option<ExpenseCategory>,
}

impl ExpenseFilter {
  pub fn matches(&self, expense: &Expense) -> bool {
    self.category.is_none_or(|c| expense.category == c)
  }

  pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
    expenses.iter().filter(|e| self.matches(e)).collect()
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChecklistFilter {
  #[serde(default, deserialize_with = "all_or")]
  pub category: Option<ChecklistCategory>,
}

impl ChecklistFilter {
  pub fn matches(&self, item: &ChecklistItem) -> bool {
    self.category.is_none_or(|c| item.category == c)
  }

  pub fn apply<'a>(&self, items: &'a [ChecklistItem]) -> Vec<&'a ChecklistItem> {
    items.iter().filter(|i| self.matches(i)).collect()
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{
    document::{DocumentMeta, OwnerId},
    guest::Relationship,
  };

  fn meta() -> DocumentMeta {
    DocumentMeta {
      id:         Uuid::new_v4(),
      owner_id:   OwnerId::from("owner"),
      created_at: Utc::now(),
      updated_at: None,
    }
  }

  fn guest(name: &str, email: Option<&str>, side: Side, confirmed: bool) -> Guest {
    Guest {
      meta: meta(),
      name: name.into(),
      email: email.map(Into::into),
      phone: None,
      relationship: Relationship::Family,
      side,
      invited: true,
      confirmed,
      attending: false,
      plus_one: false,
      table_number: None,
    }
  }

  fn task(category: TaskCategory, completed: bool) -> Task {
    Task {
      meta: meta(),
      title: "t".into(),
      description: None,
      due_at: Utc::now(),
      completed,
      category,
    }
  }

  #[test]
  fn guest_search_matches_name_or_email_ignoring_case() {
    let guests = vec![
      guest("Ada Lovelace", None, Side::Bride, true),
      guest("Grace", Some("GRACE@navy.mil"), Side::Groom, false),
      guest("Alan", Some("alan@example.com"), Side::Both, false),
    ];

    let by_name = GuestFilter { search: Some("ada".into()), ..Default::default() };
    assert_eq!(by_name.apply(&guests).len(), 1);

    let by_email = GuestFilter { search: Some("navy".into()), ..Default::default() };
    assert_eq!(by_email.apply(&guests)[0].name, "Grace");

    let blank = GuestFilter { search: Some("  ".into()), ..Default::default() };
    assert_eq!(blank.apply(&guests).len(), 3);
  }

  #[test]
  fn guest_side_and_status_combine() {
    let guests = vec![
      guest("A", None, Side::Bride, true),
      guest("B", None, Side::Bride, false),
      guest("C", None, Side::Groom, false),
    ];
    let filter = GuestFilter {
      search: None,
      side:   Some(Side::Bride),
      status: RsvpFilter::Pending,
    };
    let matched = filter.apply(&guests);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "B");
  }

  #[test]
  fn task_category_and_status() {
    let tasks = vec![
      task(TaskCategory::Venue, true),
      task(TaskCategory::Venue, false),
      task(TaskCategory::Decor, false),
    ];
    let venue = TaskFilter { category: Some(TaskCategory::Venue), ..Default::default() };
    assert_eq!(venue.apply(&tasks).len(), 2);

    let done = TaskFilter { category: None, status: CompletionFilter::Completed };
    assert_eq!(done.apply(&tasks).len(), 1);

    let pending_decor = TaskFilter {
      category: Some(TaskCategory::Decor),
      status:   CompletionFilter::Pending,
    };
    assert_eq!(pending_decor.apply(&tasks).len(), 1);
  }

  #[test]
  fn all_means_no_restriction() {
    let guests: GuestFilter = serde_json::from_str(r#"{"side":"All"}"#).unwrap();
    assert_eq!(guests.side, None);

    let tasks: TaskFilter = serde_json::from_str(r#"{"category":"all"}"#).unwrap();
    assert_eq!(tasks.category, None);

    let picked: ExpenseFilter = serde_json::from_str(r#"{"category":"Venue"}"#).unwrap();
    assert_eq!(picked.category, Some(ExpenseCategory::Venue));

    let empty: ChecklistFilter = serde_json::from_str("{}").unwrap();
    assert_eq!(empty.category, None);

    assert!(serde_json::from_str::<GuestFilter>(r#"{"side":"Nobody"}"#).is_err());
  }
}
