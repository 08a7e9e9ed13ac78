//! `budgetplan-model`: channel budget allocation tables.
//!
//! Pure data crate: rows, columns, CPM option policy, validation and the
//! planning context a table is viewed under. No IO.

pub mod context;
pub mod cpm;
pub mod error;
pub mod policy;
pub mod table;
pub mod validation;
pub mod views;

pub use context::{Horizon, PlanningContext};
pub use cpm::CpmOptions;
pub use error::{ContextError, ValidationError};
pub use policy::{column_policy, ColumnSpec};
pub use table::{AllocationTable, BudgetColumn, CellChange, ChannelRow, Column, TableEdit};
pub use validation::{problems, validate};
pub use views::{PlannedRow, RecommendedRow};
