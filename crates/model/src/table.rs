use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// Columns of the simulation table, in workbook order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Channel,
    Site,
    PlannedBudget,
    PlannedCpmRange,
    RecommendedBudget,
    DesiredBudget,
    ExpectedCpmRange,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Channel,
        Column::Site,
        Column::PlannedBudget,
        Column::PlannedCpmRange,
        Column::RecommendedBudget,
        Column::DesiredBudget,
        Column::ExpectedCpmRange,
    ];

    /// Header text used by the workbook's `simulation` sheet.
    pub fn header(&self) -> &'static str {
        match self {
            Self::Channel => "Channel",
            Self::Site => "Site",
            Self::PlannedBudget => "Planned Budget",
            Self::PlannedCpmRange => "Exp. CPM (Planned)",
            Self::RecommendedBudget => "Recommended Budget",
            Self::DesiredBudget => "Desired Budget",
            Self::ExpectedCpmRange => "Exp. CPM Range",
        }
    }

    /// Only the desired budget and its CPM range are user-editable.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::DesiredBudget | Self::ExpectedCpmRange)
    }

    pub fn is_numeric(&self) -> bool {
        self.budget().is_some()
    }

    pub fn budget(&self) -> Option<BudgetColumn> {
        match self {
            Self::PlannedBudget => Some(BudgetColumn::Planned),
            Self::RecommendedBudget => Some(BudgetColumn::Recommended),
            Self::DesiredBudget => Some(BudgetColumn::Desired),
            _ => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The numeric budget columns a table can be totalled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetColumn {
    Planned,
    Recommended,
    Desired,
}

impl BudgetColumn {
    pub fn header(&self) -> &'static str {
        match self {
            Self::Planned => Column::PlannedBudget.header(),
            Self::Recommended => Column::RecommendedBudget.header(),
            Self::Desired => Column::DesiredBudget.header(),
        }
    }

    pub fn value(&self, row: &ChannelRow) -> f64 {
        match self {
            Self::Planned => row.planned_budget,
            Self::Recommended => row.recommended_budget,
            Self::Desired => row.desired_budget,
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One channel of an allocation table.
///
/// Planned and recommended figures are fixed at construction; only the
/// desired budget and its CPM range change afterwards, through [`TableEdit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRow {
    channel: String,
    site: String,
    planned_budget: f64,
    planned_cpm_range: String,
    recommended_budget: f64,
    desired_budget: f64,
    expected_cpm_range: String,
}

impl ChannelRow {
    pub fn new(channel: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            site: site.into(),
            planned_budget: 0.0,
            planned_cpm_range: String::new(),
            recommended_budget: 0.0,
            desired_budget: 0.0,
            expected_cpm_range: String::new(),
        }
    }

    pub fn with_planned(mut self, budget: f64, cpm_range: impl Into<String>) -> Self {
        self.planned_budget = budget;
        self.planned_cpm_range = cpm_range.into();
        self
    }

    pub fn with_recommended(mut self, budget: f64) -> Self {
        self.recommended_budget = budget;
        self
    }

    pub fn with_desired(mut self, budget: f64, cpm_range: impl Into<String>) -> Self {
        self.desired_budget = budget;
        self.expected_cpm_range = cpm_range.into();
        self
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn planned_budget(&self) -> f64 {
        self.planned_budget
    }

    pub fn planned_cpm_range(&self) -> &str {
        &self.planned_cpm_range
    }

    pub fn recommended_budget(&self) -> f64 {
        self.recommended_budget
    }

    pub fn desired_budget(&self) -> f64 {
        self.desired_budget
    }

    pub fn expected_cpm_range(&self) -> &str {
        &self.expected_cpm_range
    }

    /// Cell text for `column`, unformatted.
    pub fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Channel => self.channel.clone(),
            Column::Site => self.site.clone(),
            Column::PlannedCpmRange => self.planned_cpm_range.clone(),
            Column::ExpectedCpmRange => self.expected_cpm_range.clone(),
            Column::PlannedBudget | Column::RecommendedBudget | Column::DesiredBudget => {
                // is_numeric columns always map to a budget
                let budget = column.budget().map(|b| b.value(self)).unwrap_or_default();
                format!("{budget}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// A single cell change coming back from the tabular editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEdit {
    pub channel: String,
    pub change: CellChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellChange {
    DesiredBudget(f64),
    CpmRange(String),
}

impl TableEdit {
    pub fn desired_budget(channel: impl Into<String>, amount: f64) -> Self {
        Self {
            channel: channel.into(),
            change: CellChange::DesiredBudget(amount),
        }
    }

    pub fn cpm_range(channel: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            change: CellChange::CpmRange(label.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Ordered channel rows sharing the simulation schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationTable {
    rows: Vec<ChannelRow>,
}

impl AllocationTable {
    pub fn new(rows: Vec<ChannelRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ChannelRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.channel.as_str())
    }

    /// First row for `channel`. Channel ids are unique in a valid table.
    pub fn row(&self, channel: &str) -> Option<&ChannelRow> {
        self.rows.iter().find(|r| r.channel == channel)
    }

    /// Sum of a budget column across all rows.
    pub fn total(&self, column: BudgetColumn) -> f64 {
        self.rows.iter().map(|r| column.value(r)).sum()
    }

    /// Apply an editor change to this working copy.
    pub fn apply(&mut self, edit: &TableEdit) -> Result<(), ValidationError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.channel == edit.channel)
            .ok_or_else(|| ValidationError::UnknownChannel { channel: edit.channel.clone() })?;

        match &edit.change {
            CellChange::DesiredBudget(amount) => {
                if !amount.is_finite() || *amount < 0.0 {
                    return Err(ValidationError::NegativeBudget {
                        channel: edit.channel.clone(),
                        column: BudgetColumn::Desired,
                        value: *amount,
                    });
                }
                row.desired_budget = *amount;
            }
            CellChange::CpmRange(label) => {
                row.expected_cpm_range = label.clone();
            }
        }
        Ok(())
    }

    pub fn apply_all<'a>(
        &mut self,
        edits: impl IntoIterator<Item = &'a TableEdit>,
    ) -> Result<(), ValidationError> {
        for edit in edits {
            self.apply(edit)?;
        }
        Ok(())
    }
}

/// Free-function form of [`AllocationTable::total`].
pub fn total(table: &AllocationTable, column: BudgetColumn) -> f64 {
    table.total(column)
}
