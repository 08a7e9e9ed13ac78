use std::collections::HashSet;

use crate::cpm::CpmOptions;
use crate::error::ValidationError;
use crate::table::{AllocationTable, BudgetColumn};

const BUDGET_COLUMNS: [BudgetColumn; 3] =
    [BudgetColumn::Planned, BudgetColumn::Recommended, BudgetColumn::Desired];

/// Check a table against its invariants. Returns the first problem found.
pub fn validate(table: &AllocationTable, options: &CpmOptions) -> Result<(), ValidationError> {
    match problems(table, options).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every problem in row order. Empty when the table is valid.
pub fn problems(table: &AllocationTable, options: &CpmOptions) -> Vec<ValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut found = Vec::new();

    for row in table.rows() {
        if !seen.insert(row.channel()) {
            found.push(ValidationError::DuplicateChannel { channel: row.channel().to_string() });
        }

        for column in BUDGET_COLUMNS {
            let value = column.value(row);
            if !value.is_finite() || value < 0.0 {
                found.push(ValidationError::NegativeBudget {
                    channel: row.channel().to_string(),
                    column,
                    value,
                });
            }
        }

        if !options.allows(row.channel(), row.expected_cpm_range()) {
            found.push(ValidationError::InvalidCpm {
                channel: row.channel().to_string(),
                value: row.expected_cpm_range().to_string(),
            });
        }
    }

    found
}
