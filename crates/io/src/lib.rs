// File I/O operations

pub mod csv;
pub mod sample;
pub mod workbook;
pub mod xlsx;

pub use workbook::{load, read_workbook, BudgetWorkbook, DataSource, LoadError, LoadedWorkbook};

/// Default workbook file name, looked up relative to the working directory.
pub const DEFAULT_WORKBOOK: &str = "backend_data.xlsx";

/// Sheet names the loader expects.
pub const SHEET_PLANNED: &str = "planned";
pub const SHEET_RECOMMENDED: &str = "recommended";
pub const SHEET_SIMULATION: &str = "simulation";
