//! Local, synchronous input validation.
//!
//! Every form payload passes through [`Validate::validate`] before it reaches
//! a store. Validation also normalises: text is trimmed and blank optional
//! fields become `None`.

use thiserror::Error;

use crate::{
  checklist::{ChecklistPatch, NewChecklistItem},
  document::non_empty,
  expense::{ExpensePatch, NewExpense},
  guest::{GuestPatch, NewGuest},
  identity::{Credentials, Registration},
  plan::PlanInput,
  task::{NewTask, TaskPatch},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{0} is required")]
  Required(&'static str),

  #[error("{0} must be a finite, non-negative amount")]
  InvalidAmount(&'static str),

  #[error("passwords do not match")]
  PasswordMismatch,
}

/// Check and normalise a payload, consuming it.
pub trait Validate: Sized {
  fn validate(self) -> Result<Self, ValidationError>;
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
  non_empty(value).ok_or(ValidationError::Required(field))
}

fn required_patch(
  field: &'static str,
  value: Option<String>,
) -> Result<Option<String>, ValidationError> {
  value.map(|v| required(field, &v)).transpose()
}

fn optional(value: Option<String>) -> Option<String> {
  value.as_deref().and_then(non_empty)
}

fn optional_patch(value: Option<Option<String>>) -> Option<Option<String>> {
  value.map(optional)
}

fn amount(field: &'static str, value: f64) -> Result<f64, ValidationError> {
  if value.is_finite() && value >= 0.0 {
    Ok(value)
  } else {
    Err(ValidationError::InvalidAmount(field))
  }
}

// ─── Tasks ───────────────────────────────────────────────────────────────────

impl Validate for NewTask {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      title: required("title", &self.title)?,
      description: optional(self.description),
      ..self
    })
  }
}

impl Validate for TaskPatch {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      title: required_patch("title", self.title)?,
      description: optional_patch(self.description),
      ..self
    })
  }
}

// ─── Guests ──────────────────────────────────────────────────────────────────

impl Validate for NewGuest {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      name: required("name", &self.name)?,
      email: optional(self.email),
      phone: optional(self.phone),
      ..self
    })
  }
}

impl Validate for GuestPatch {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      name: required_patch("name", self.name)?,
      email: optional_patch(self.email),
      phone: optional_patch(self.phone),
      ..self
    })
  }
}

// ─── Expenses ────────────────────────────────────────────────────────────────

impl Validate for NewExpense {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      item: required("item", &self.item)?,
      estimated_cost: amount("estimated cost", self.estimated_cost)?,
      notes: optional(self.notes),
      ..self
    })
  }
}

impl Validate for ExpensePatch {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      item: required_patch("item", self.item)?,
      estimated_cost: self
        .estimated_cost
        .map(|v| amount("estimated cost", v))
        .transpose()?,
      actual_cost: self
        .actual_cost
        .map(|v| amount("actual cost", v))
        .transpose()?,
      notes: optional_patch(self.notes),
      ..self
    })
  }
}

// ─── Checklist ───────────────────────────────────────────────────────────────

impl Validate for NewChecklistItem {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self { title: required("title", &self.title)?, ..self })
  }
}

impl Validate for ChecklistPatch {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self { title: required_patch("title", self.title)?, ..self })
  }
}

// ─── Plan ────────────────────────────────────────────────────────────────────

impl Validate for PlanInput {
  fn validate(self) -> Result<Self, ValidationError> {
    Ok(Self {
      plan_name: required("plan name", &self.plan_name)?,
      couple_name: required("couple name", &self.couple_name)?,
      location: required("location", &self.location)?,
      ..self
    })
  }
}

// ─── Identity ────────────────────────────────────────────────────────────────

impl Validate for Registration {
  fn validate(self) -> Result<Self, ValidationError> {
    let name = required("name", &self.name)?;
    let email = required("email", &self.email)?;
    if self.password.is_empty() {
      return Err(ValidationError::Required("password"));
    }
    if self.confirm_password.is_empty() {
      return Err(ValidationError::Required("password confirmation"));
    }
    if self.password != self.confirm_password {
      return Err(ValidationError::PasswordMismatch);
    }
    Ok(Self { name, email, ..self })
  }
}

impl Validate for Credentials {
  fn validate(self) -> Result<Self, ValidationError> {
    let email = required("email", &self.email)?;
    if self.password.is_empty() {
      return Err(ValidationError::Required("password"));
    }
    Ok(Self { email, ..self })
  }
}
