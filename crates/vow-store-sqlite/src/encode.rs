//! Encoding helpers between domain types and SQLite column text.
//!
//! Timestamps are RFC 3339 strings and UUIDs hyphenated lowercase, so that
//! `ORDER BY created_at` sorts chronologically.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vow_core::document::Document;

use crate::Result;

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Decode a batch of JSON bodies into documents.
pub fn decode_bodies<D: Document>(bodies: Vec<String>) -> Result<Vec<D>> {
  bodies
    .iter()
    .map(|body| Ok(D::from_json(body)?))
    .collect()
}
