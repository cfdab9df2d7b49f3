//! # lowshot-harness
//!
//! Operator-facing layer: the `lowshot` CLI, logging setup, dataset
//! directory preflight, and the workflow that fans sessions out across
//! tasks, problem types, and data splits.

pub mod cli;
pub mod dataset;
pub mod logging;
pub mod workflow;

pub use workflow::{Workflow, WorkflowReport};
