//! Task tracker domain model.
//!
//! # Responsibility
//! - Define the records and value types shared by the scheduling engine,
//!   persistence and services.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Invalid records are rejected at construction or decode, never repaired.

pub mod date;
pub mod recurrence;
pub mod task;
