// End-to-end session flows: initialize, edit, save, compare.
// Run with: cargo test -p budgetplan-scenario --test session

use budgetplan_model::{AllocationTable, BudgetColumn, ChannelRow, CpmOptions, TableEdit};
use budgetplan_scenario::model::{DetailCell, RowKind, Trend};
use budgetplan_scenario::{ScenarioError, ScenarioStore};

fn simulation() -> AllocationTable {
    let rows = [
        ("Display", "NYT", 700_000.0, "$6.5 - $7.0", 650_000.0, 650_000.0, "$6.3 - $6.8"),
        ("FEP", "FEP_YT", 500_000.0, "$8.0 - $8.7", 520_000.0, 500_000.0, "$8.1 - $8.9"),
        ("Search", "Search", 300_000.0, "$5.2 - $5.8", 350_000.0, 350_000.0, "$5.0 - $5.5"),
        (
            "Social Media",
            "Facebook",
            200_000.0,
            "$9.1 - $9.8",
            180_000.0,
            150_000.0,
            "$9.3 - $10.0",
        ),
        ("Video", "Youtube", 600_000.0, "$6.5 - $7.0", 450_000.0, 450_000.0, "$6.3 - $6.8"),
    ];
    AllocationTable::new(
        rows.iter()
            .map(|(ch, site, planned, pcpm, rec, desired, cpm)| {
                ChannelRow::new(*ch, *site)
                    .with_planned(*planned, *pcpm)
                    .with_recommended(*rec)
                    .with_desired(*desired, *cpm)
            })
            .collect(),
    )
}

fn session() -> ScenarioStore {
    let mut store = ScenarioStore::new(CpmOptions::default_per_channel());
    store.initialize(simulation()).unwrap();
    store
}

#[test]
fn baseline_total_is_2_1m() {
    let store = session();
    assert_eq!(store.baseline().unwrap().total(BudgetColumn::Desired), 2_100_000.0);
}

#[test]
fn snapshot_is_independent_of_working_copy() {
    let mut store = session();
    let mut wc = store.working_copy().unwrap();
    wc.apply(&TableEdit::desired_budget("Display", 600_000.0)).unwrap();

    let name = store.save(&wc).unwrap();
    assert_eq!(store.get(&name).unwrap(), &wc);

    wc.apply(&TableEdit::desired_budget("Display", 1.0)).unwrap();
    wc.apply(&TableEdit::cpm_range("Display", "$6.5 - $7.0")).unwrap();

    let saved = store.get(&name).unwrap();
    assert_eq!(saved.row("Display").unwrap().desired_budget(), 600_000.0);
    assert_eq!(saved.row("Display").unwrap().expected_cpm_range(), "$6.3 - $6.8");
    // Baseline untouched too
    assert_eq!(store.baseline().unwrap(), &simulation());
}

#[test]
fn successive_saves_are_named_in_sequence() {
    let mut store = session();
    let wc = store.working_copy().unwrap();
    assert_eq!(store.save(&wc).unwrap(), "scenario-1");
    assert_eq!(store.save(&wc).unwrap(), "scenario-2");
    assert_eq!(store.list(), ["scenario-1", "scenario-2"]);
}

#[test]
fn empty_selection_summarize_returns_baseline_only() {
    let store = session();
    let none: [&str; 0] = [];
    let rows = store.summarize(&none).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].scenario_name, "Original");
    assert_eq!(rows[0].kind, RowKind::Baseline);
    assert_eq!(rows[0].total_budget, 2_100_000.0);
    assert_eq!(rows[0].channel_count, 5);
    assert!(rows[0].change.is_none());
}

#[test]
fn empty_selection_compare_is_an_error() {
    let store = session();
    let none: [&str; 0] = [];
    assert_eq!(store.compare(&none).unwrap_err(), ScenarioError::EmptySelection);
}

#[test]
fn summary_delta_and_percent() {
    let mut store = session();
    let mut wc = store.working_copy().unwrap();
    // 2,100,000 -> 2,020,000
    wc.apply(&TableEdit::desired_budget("Video", 370_000.0)).unwrap();
    let name = store.save(&wc).unwrap();

    let rows = store.summarize(&[name.as_str()]).unwrap();
    assert_eq!(rows.len(), 2);
    let row = &rows[1];
    assert_eq!(row.kind, RowKind::Custom);
    assert_eq!(row.total_budget, 2_020_000.0);
    let change = row.change.as_ref().unwrap();
    assert_eq!(change.delta_vs_baseline, -80_000.0);
    let pct = change.percent_change.unwrap();
    assert!((pct - (-3.8095238)).abs() < 1e-6, "pct = {pct}");
}

#[test]
fn detail_delta_exact_and_missing() {
    let mut store = session();
    let mut wc = store.working_copy().unwrap();
    wc.apply(&TableEdit::desired_budget("Search", 420_000.0)).unwrap();
    let edited = store.save(&wc).unwrap();

    // A table without the Video channel, as a workbook edited elsewhere might produce
    let partial = AllocationTable::new(
        wc.rows().iter().filter(|r| r.channel() != "Video").cloned().collect(),
    );
    let short = store.save(&partial).unwrap();

    let cmp = store.compare(&[short.as_str(), edited.as_str()]).unwrap();
    assert_eq!(cmp.detail.scenarios, [short.clone(), edited.clone()]);

    assert_eq!(
        cmp.detail.cell("Search", &edited),
        Some(&DetailCell { budget: Some(420_000.0), delta: Some(70_000.0) })
    );
    assert_eq!(
        cmp.detail.cell("Video", &short),
        Some(&DetailCell { budget: None, delta: None })
    );
    assert_eq!(cmp.detail.cell("Video", &edited).unwrap().delta, Some(0.0));

    // Summary in selection order
    let names: Vec<&str> = cmp.summary.iter().map(|r| r.scenario_name.as_str()).collect();
    assert_eq!(names, ["Original", "scenario-2", "scenario-1"]);
    assert_eq!(cmp.summary[1].channel_count, 4);

    // Insights follow the last selected scenario
    assert_eq!(cmp.insights.scenario, edited);
    assert_eq!(cmp.insights.total_change, 70_000.0);
    assert_eq!(cmp.insights.trend, Trend::Increase);
    assert_eq!(cmp.insights.max_increase_channel.as_deref(), Some("Search"));
}

#[test]
fn compare_unknown_scenario() {
    let store = session();
    assert_eq!(
        store.compare(&["scenario-7"]).unwrap_err(),
        ScenarioError::NotFound("scenario-7".into())
    );
}

#[test]
fn comparison_serializes_without_baseline_change() {
    let mut store = session();
    let wc = store.working_copy().unwrap();
    let name = store.save(&wc).unwrap();
    let cmp = store.compare(&[name]).unwrap();
    let json = serde_json::to_value(&cmp).unwrap();
    assert!(json["summary"][0].get("change").is_none());
    assert_eq!(json["summary"][0]["kind"], "baseline");
    assert_eq!(json["summary"][1]["change"]["delta_vs_baseline"], 0.0);
    assert_eq!(json["insights"]["trend"], "unchanged");
}

#[test]
fn separate_sessions_do_not_share_scenarios() {
    let mut a = session();
    let b = session();
    let wc = a.working_copy().unwrap();
    a.save(&wc).unwrap();
    assert_eq!(a.len(), 1);
    assert!(b.is_empty());
    a.teardown();
    assert!(b.get("scenario-1").is_err());
}
