use budgetplan_model::{AllocationTable, BudgetColumn};

use crate::error::ScenarioError;
use crate::insights::compute_insights;
use crate::model::{
    BudgetChange, Comparison, ComparisonMeta, DetailCell, DetailRow, DetailTable, RowKind, Scenario,
    SummaryRow, BASELINE_LABEL,
};

/// Column every comparison runs over.
const COMPARED: BudgetColumn = BudgetColumn::Desired;

/// Baseline row first, then one row per selected scenario in selection order.
///
/// An empty selection yields just the baseline row; use [`compare`] to get
/// `EmptySelection` instead.
pub fn summarize(baseline: &AllocationTable, selection: &[&Scenario]) -> Vec<SummaryRow> {
    let baseline_total = baseline.total(COMPARED);

    let mut rows = Vec::with_capacity(selection.len() + 1);
    rows.push(SummaryRow {
        scenario_name: BASELINE_LABEL.to_string(),
        kind: RowKind::Baseline,
        total_budget: baseline_total,
        channel_count: baseline.len(),
        change: None,
    });

    for scenario in selection {
        let total = scenario.table.total(COMPARED);
        let delta = total - baseline_total;
        rows.push(SummaryRow {
            scenario_name: scenario.name.clone(),
            kind: RowKind::Custom,
            total_budget: total,
            channel_count: scenario.table.len(),
            change: Some(BudgetChange {
                delta_vs_baseline: delta,
                percent_change: percent_change(delta, baseline_total),
            }),
        });
    }

    rows
}

/// `delta / base * 100`, undefined for a zero base.
pub fn percent_change(delta: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some(delta / base * 100.0)
    }
}

/// Per-channel budgets for each scenario, keyed on the baseline's channels.
pub fn detail(baseline: &AllocationTable, selection: &[&Scenario]) -> DetailTable {
    let rows = baseline
        .rows()
        .iter()
        .map(|base| {
            let baseline_budget = COMPARED.value(base);
            let cells = selection
                .iter()
                .map(|scenario| {
                    let budget = scenario.table.row(base.channel()).map(|r| COMPARED.value(r));
                    DetailCell { budget, delta: budget.map(|b| b - baseline_budget) }
                })
                .collect();
            DetailRow { channel: base.channel().to_string(), baseline_budget, cells }
        })
        .collect();

    DetailTable { scenarios: selection.iter().map(|s| s.name.clone()).collect(), rows }
}

/// Summary, detail and insights for a non-empty selection.
pub fn compare(
    baseline: &AllocationTable,
    selection: &[&Scenario],
) -> Result<Comparison, ScenarioError> {
    let last = selection.last().ok_or(ScenarioError::EmptySelection)?;

    let summary = summarize(baseline, selection);
    let detail = detail(baseline, selection);
    let insights = compute_insights(baseline, last, &detail);

    log::debug!(
        "compared {} scenario(s) against baseline of {} channel(s)",
        selection.len(),
        baseline.len()
    );

    Ok(Comparison {
        meta: ComparisonMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        detail,
        insights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetplan_model::ChannelRow;
    use chrono::Utc;

    fn table(rows: &[(&str, f64)]) -> AllocationTable {
        AllocationTable::new(
            rows.iter()
                .map(|(c, b)| ChannelRow::new(*c, "site").with_desired(*b, ""))
                .collect(),
        )
    }

    fn scenario(name: &str, rows: &[(&str, f64)]) -> Scenario {
        Scenario { name: name.into(), table: table(rows), saved_at: Utc::now() }
    }

    #[test]
    fn percent_change_zero_base() {
        assert_eq!(percent_change(10.0, 0.0), None);
        assert_eq!(percent_change(-50.0, 200.0), Some(-25.0));
    }

    #[test]
    fn summarize_zero_baseline_total() {
        let base = table(&[("Display", 0.0)]);
        let s = scenario("scenario-1", &[("Display", 100.0)]);
        let rows = summarize(&base, &[&s]);
        let change = rows[1].change.as_ref().unwrap();
        assert_eq!(change.delta_vs_baseline, 100.0);
        assert_eq!(change.percent_change, None);
    }

    #[test]
    fn summarize_keeps_selection_order() {
        let base = table(&[("Display", 10.0)]);
        let b = scenario("scenario-2", &[("Display", 20.0)]);
        let a = scenario("scenario-1", &[("Display", 5.0)]);
        let rows = summarize(&base, &[&b, &a]);
        let names: Vec<&str> = rows.iter().map(|r| r.scenario_name.as_str()).collect();
        assert_eq!(names, ["Original", "scenario-2", "scenario-1"]);
    }

    #[test]
    fn detail_left_join_on_baseline() {
        let base = table(&[("Display", 10.0), ("Search", 20.0)]);
        // Scenario drops Search and adds Radio; Radio is ignored.
        let s = scenario("scenario-1", &[("Display", 15.0), ("Radio", 99.0)]);
        let d = detail(&base, &[&s]);
        assert_eq!(d.rows.len(), 2);
        assert_eq!(
            d.cell("Display", "scenario-1"),
            Some(&DetailCell { budget: Some(15.0), delta: Some(5.0) })
        );
        assert_eq!(d.cell("Search", "scenario-1"), Some(&DetailCell { budget: None, delta: None }));
        assert!(d.cell("Radio", "scenario-1").is_none());
    }

    #[test]
    fn detail_headers() {
        let base = table(&[("Display", 10.0)]);
        let a = scenario("scenario-1", &[("Display", 1.0)]);
        let b = scenario("scenario-2", &[("Display", 2.0)]);
        let d = detail(&base, &[&a, &b]);
        assert_eq!(
            d.headers(),
            [
                "Channel",
                "Original Budget",
                "scenario-1 Budget",
                "scenario-2 Budget",
                "scenario-1 vs Original",
                "scenario-2 vs Original",
            ]
        );
        assert_eq!(
            DetailTable::row_values(&d.rows[0]),
            vec![Some(10.0), Some(1.0), Some(2.0), Some(-9.0), Some(-8.0)]
        );
    }

    #[test]
    fn compare_empty_selection() {
        let base = table(&[("Display", 10.0)]);
        assert_eq!(compare(&base, &[]).unwrap_err(), ScenarioError::EmptySelection);
    }
}
