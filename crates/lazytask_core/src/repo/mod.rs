//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the load/save contract the scheduling services consume.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
