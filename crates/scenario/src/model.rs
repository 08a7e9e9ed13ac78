use budgetplan_model::AllocationTable;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Label of the baseline row in summaries and detail headers.
pub const BASELINE_LABEL: &str = "Original";

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A named, immutable snapshot of an edited allocation table.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub name: String,
    pub table: AllocationTable,
    pub saved_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Baseline,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetChange {
    pub delta_vs_baseline: f64,
    /// `None` when the baseline total is zero (percentage undefined).
    pub percent_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub scenario_name: String,
    pub kind: RowKind,
    pub total_budget: f64,
    pub channel_count: usize,
    /// Absent on the baseline row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<BudgetChange>,
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// One scenario's value for one channel. Both fields are `None` when the
/// scenario's table lacks the channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetailCell {
    pub budget: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub channel: String,
    pub baseline_budget: f64,
    /// Parallel to [`DetailTable::scenarios`].
    pub cells: Vec<DetailCell>,
}

/// Per-channel budgets, left-joined on the baseline's channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailTable {
    pub scenarios: Vec<String>,
    pub rows: Vec<DetailRow>,
}

impl DetailTable {
    pub fn scenario_index(&self, scenario: &str) -> Option<usize> {
        self.scenarios.iter().position(|s| s == scenario)
    }

    pub fn cell(&self, channel: &str, scenario: &str) -> Option<&DetailCell> {
        let idx = self.scenario_index(scenario)?;
        self.rows.iter().find(|r| r.channel == channel).and_then(|r| r.cells.get(idx))
    }

    /// Flat headers: channel, baseline, every `<name> Budget`, then every
    /// `<name> vs Original`.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = vec!["Channel".to_string(), format!("{BASELINE_LABEL} Budget")];
        headers.extend(self.scenarios.iter().map(|s| format!("{s} Budget")));
        headers.extend(self.scenarios.iter().map(|s| format!("{s} vs {BASELINE_LABEL}")));
        headers
    }

    /// Row values matching [`headers`](Self::headers) after the channel column.
    pub fn row_values(row: &DetailRow) -> Vec<Option<f64>> {
        let mut values = vec![Some(row.baseline_budget)];
        values.extend(row.cells.iter().map(|c| c.budget));
        values.extend(row.cells.iter().map(|c| c.delta));
        values
    }
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increase,
    Decrease,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub scenario: String,
    pub total_change: f64,
    /// Mean delta over channels present in both tables.
    pub average_channel_change: Option<f64>,
    pub max_increase_channel: Option<String>,
    pub max_decrease_channel: Option<String>,
    pub trend: Trend,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMeta {
    pub engine_version: String,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub meta: ComparisonMeta,
    pub summary: Vec<SummaryRow>,
    pub detail: DetailTable,
    pub insights: Insights,
}
