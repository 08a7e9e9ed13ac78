use budgetplan_model::{AllocationTable, BudgetColumn};

use crate::model::{DetailTable, Insights, Scenario, Trend};

/// Key figures for `scenario` relative to the baseline.
///
/// Channel-level figures only count channels present in both tables. The
/// largest increase (decrease) names a channel only when some channel went
/// up (down). Ties resolve to the first channel in baseline order.
pub fn compute_insights(
    baseline: &AllocationTable,
    scenario: &Scenario,
    detail: &DetailTable,
) -> Insights {
    let total_change =
        scenario.table.total(BudgetColumn::Desired) - baseline.total(BudgetColumn::Desired);

    let deltas: Vec<(&str, f64)> = match detail.scenario_index(&scenario.name) {
        Some(idx) => detail
            .rows
            .iter()
            .filter_map(|r| r.cells.get(idx).and_then(|c| c.delta).map(|d| (r.channel.as_str(), d)))
            .collect(),
        None => Vec::new(),
    };

    let average_channel_change = if deltas.is_empty() {
        None
    } else {
        Some(deltas.iter().map(|(_, d)| d).sum::<f64>() / deltas.len() as f64)
    };

    let mut max_increase: Option<(&str, f64)> = None;
    let mut max_decrease: Option<(&str, f64)> = None;
    for &(channel, delta) in &deltas {
        if max_increase.map_or(true, |(_, best)| delta > best) {
            max_increase = Some((channel, delta));
        }
        if max_decrease.map_or(true, |(_, best)| delta < best) {
            max_decrease = Some((channel, delta));
        }
    }

    let trend = if total_change > 0.0 {
        Trend::Increase
    } else if total_change < 0.0 {
        Trend::Decrease
    } else {
        Trend::Unchanged
    };

    Insights {
        scenario: scenario.name.clone(),
        total_change,
        average_channel_change,
        max_increase_channel: max_increase
            .filter(|&(_, d)| d > 0.0)
            .map(|(c, _)| c.to_string()),
        max_decrease_channel: max_decrease
            .filter(|&(_, d)| d < 0.0)
            .map(|(c, _)| c.to_string()),
        trend,
    }
}
