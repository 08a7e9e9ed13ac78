// Column edit policy handed to the tabular editor.

use serde::Serialize;

use crate::cpm::CpmOptions;
use crate::table::Column;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub column: Column,
    pub header: &'static str,
    pub editable: bool,
    pub numeric: bool,
    /// Dropdown options for the CPM range column; absent when free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<CpmOptions>,
}

/// One spec per simulation column, in workbook order.
pub fn column_policy(cpm: &CpmOptions) -> Vec<ColumnSpec> {
    Column::ALL
        .into_iter()
        .map(|column| ColumnSpec {
            column,
            header: column.header(),
            editable: column.is_editable(),
            numeric: column.is_numeric(),
            options: (column == Column::ExpectedCpmRange && cpm.is_constrained())
                .then(|| cpm.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cpm_column_carries_options() {
        let specs = column_policy(&CpmOptions::default_per_channel());
        assert_eq!(specs.len(), 7);
        for spec in &specs {
            assert_eq!(spec.options.is_some(), spec.column == Column::ExpectedCpmRange);
        }
        let desired = specs.iter().find(|s| s.column == Column::DesiredBudget).unwrap();
        assert!(desired.editable && desired.numeric);
        let planned = specs.iter().find(|s| s.column == Column::PlannedBudget).unwrap();
        assert!(!planned.editable);
    }

    #[test]
    fn unconstrained_has_no_dropdown() {
        let specs = column_policy(&CpmOptions::Unconstrained);
        assert!(specs.iter().all(|s| s.options.is_none()));
    }
}
