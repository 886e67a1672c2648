//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls and scheduling transitions into
//!   use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod task_query;
pub mod task_service;
