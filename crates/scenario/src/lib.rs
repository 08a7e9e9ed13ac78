//! `budgetplan-scenario`: session-scoped scenario store and comparator.
//!
//! Pure engine crate: receives a baseline table and edited working copies,
//! returns named snapshots and comparison results. No CLI or IO dependencies.
//! One [`ScenarioStore`] per session; stores are never shared between sessions.

pub mod compare;
pub mod error;
pub mod insights;
pub mod model;
pub mod store;

pub use compare::{compare, detail, summarize};
pub use error::ScenarioError;
pub use model::{Comparison, DetailTable, Insights, Scenario, SummaryRow};
pub use store::ScenarioStore;
