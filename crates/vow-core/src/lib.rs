//! Core types and trait definitions for the Vow wedding planner.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::PlannerStore`]; everything derived
//! from the stored collections (statistics, countdown, filters) lives here.

// Trait impls use native `async fn`; the trait declarations spell out `Send`.
#![allow(async_fn_in_trait)]

pub mod checklist;
pub mod countdown;
pub mod document;
pub mod error;
pub mod expense;
pub mod filter;
pub mod guest;
pub mod identity;
pub mod plan;
pub mod stats;
pub mod store;
pub mod subscription;
pub mod summary;
pub mod task;
pub mod validate;

pub use error::{Error, Result};
