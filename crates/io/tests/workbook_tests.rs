// Integration tests for workbook loading, fallback and export.
// Run with: cargo test -p budgetplan-io --test workbook_tests

use std::path::Path;

use budgetplan_io::sample::sample_workbook;
use budgetplan_io::xlsx::{export_comparison, write_workbook};
use budgetplan_io::{load, read_workbook, DataSource, LoadError};
use budgetplan_model::{BudgetColumn, CpmOptions, TableEdit};
use budgetplan_scenario::ScenarioStore;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

#[test]
fn nonexistent_path_yields_fallback_dataset() {
    let loaded = load(Path::new("/nonexistent/dir/backend_data.xlsx")).unwrap();

    assert!(matches!(loaded.source, DataSource::Fallback { .. }));
    let channels: Vec<&str> = loaded.workbook.simulation.channels().collect();
    assert_eq!(channels, ["Display", "FEP", "Search", "Social Media", "Video"]);
    let planned: Vec<f64> = loaded.workbook.planned.iter().map(|r| r.planned_budget).collect();
    assert_eq!(planned, [700000.0, 500000.0, 300000.0, 200000.0, 600000.0]);
    let sim_planned: Vec<f64> =
        loaded.workbook.simulation.rows().iter().map(|r| r.planned_budget()).collect();
    assert_eq!(sim_planned, planned);
    assert_eq!(loaded.workbook.simulation.total(BudgetColumn::Desired), 2_100_000.0);
}

#[test]
fn written_workbook_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backend_data.xlsx");

    let original = sample_workbook();
    let result = write_workbook(&original, &path).unwrap();
    assert_eq!(result.sheets_written, 3);
    assert_eq!(result.rows_written, 15);

    let loaded = load(&path).unwrap();
    assert_eq!(loaded.source, DataSource::Workbook { path: path.clone() });
    assert_eq!(loaded.workbook, original);
}

#[test]
fn corrupt_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("backend_data.xlsx");
    std::fs::write(&path, b"this is not a spreadsheet").unwrap();

    assert!(matches!(read_workbook(&path), Err(LoadError::Open(_))));
    let loaded = load(&path).unwrap();
    assert!(loaded.source.is_fallback());
    assert_eq!(loaded.workbook, sample_workbook());
}

#[test]
fn missing_sheet_is_reported_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.xlsx");

    let mut wb = Workbook::new();
    wb.add_worksheet().set_name("planned").unwrap().write_string(0, 0, "Channel").unwrap();
    wb.save(&path).unwrap();

    assert_eq!(read_workbook(&path).unwrap_err(), LoadError::MissingSheet("recommended".into()));
    assert_eq!(load(&path).unwrap_err(), LoadError::MissingSheet("recommended".into()));
}

#[test]
fn text_amounts_and_reordered_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text.xlsx");

    let mut wb = Workbook::new();
    {
        let ws = wb.add_worksheet().set_name("Planned").unwrap();
        for (c, h) in ["Expected CPM", "Planned Budget", "Site", "Channel"].iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 0, "$6.5").unwrap();
        ws.write_string(1, 1, "$700,000").unwrap();
        ws.write_string(1, 2, "NYT").unwrap();
        ws.write_string(1, 3, "Display").unwrap();
    }
    {
        let ws = wb.add_worksheet().set_name("recommended").unwrap();
        write_headers(ws, &["Channel", "Site", "Recommended Budget", "Expected CPM", "IUs", "ROI"]);
        ws.write_string(1, 0, "Display").unwrap();
        ws.write_string(1, 1, "NYT").unwrap();
        ws.write_number(1, 2, 650000).unwrap();
        ws.write_string(1, 3, "$6.3 - $6.8").unwrap();
        ws.write_number(1, 4, 3500).unwrap();
        ws.write_number(1, 5, 3.14).unwrap();
    }
    {
        let ws = wb.add_worksheet().set_name("simulation").unwrap();
        let headers = [
            "Channel",
            "Site",
            "Planned Budget",
            "Exp. CPM (Planned)",
            "Recommended Budget",
            "Desired Budget",
            "Exp. CPM Range",
        ];
        for (c, h) in headers.iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 0, "Display").unwrap();
        ws.write_string(1, 1, "NYT").unwrap();
        ws.write_number(1, 2, 700000).unwrap();
        ws.write_string(1, 3, "$6.5 - $7.0").unwrap();
        ws.write_number(1, 4, 650000).unwrap();
        ws.write_string(1, 5, "640,000").unwrap();
        ws.write_string(1, 6, "$6.3 - $6.8").unwrap();
    }
    wb.save(&path).unwrap();

    let book = read_workbook(&path).unwrap();
    assert_eq!(book.planned[0].planned_budget, 700_000.0);
    assert_eq!(book.planned[0].expected_cpm, "$6.5");
    assert_eq!(book.recommended[0].roi, 3.14);
    let row = book.simulation.row("Display").unwrap();
    assert_eq!(row.desired_budget(), 640_000.0);
    assert_eq!(row.expected_cpm_range(), "$6.3 - $6.8");
}

#[test]
fn bad_number_is_located() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.xlsx");

    let mut wb = Workbook::new();
    {
        let ws = wb.add_worksheet().set_name("planned").unwrap();
        for (c, h) in ["Channel", "Site", "Planned Budget", "Expected CPM"].iter().enumerate() {
            ws.write_string(0, c as u16, *h).unwrap();
        }
        ws.write_string(1, 0, "Display").unwrap();
        ws.write_string(1, 1, "NYT").unwrap();
        ws.write_string(1, 2, "lots").unwrap();
        ws.write_string(1, 3, "$6.5").unwrap();
    }
    wb.add_worksheet().set_name("recommended").unwrap();
    wb.add_worksheet().set_name("simulation").unwrap();
    wb.save(&path).unwrap();

    match read_workbook(&path) {
        Err(LoadError::BadNumber { sheet, row, column, value }) => {
            assert_eq!(sheet, "planned");
            assert_eq!(row, 2);
            assert_eq!(column, "Planned Budget");
            assert_eq!(value, "lots");
        }
        other => panic!("expected BadNumber, got {other:?}"),
    }
}

fn write_headers(ws: &mut rust_xlsxwriter::Worksheet, headers: &[&str]) {
    for (c, h) in headers.iter().enumerate() {
        ws.write_string(0, c as u16, *h).unwrap();
    }
}

#[test]
fn blank_budget_cell_is_reported_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.xlsx");

    let mut wb = Workbook::new();
    {
        let ws = wb.add_worksheet().set_name("planned").unwrap();
        write_headers(ws, &["Channel", "Site", "Planned Budget", "Expected CPM"]);
        ws.write_string(1, 0, "Radio").unwrap();
        ws.write_string(1, 1, "iHeart").unwrap();
        ws.write_number(1, 2, 120000).unwrap();
        ws.write_string(1, 3, "$4.0").unwrap();
    }
    {
        let ws = wb.add_worksheet().set_name("recommended").unwrap();
        write_headers(ws, &["Channel", "Site", "Recommended Budget", "Expected CPM", "IUs", "ROI"]);
        ws.write_string(1, 0, "Radio").unwrap();
        ws.write_string(1, 1, "iHeart").unwrap();
        ws.write_number(1, 2, 110000).unwrap();
        ws.write_string(1, 3, "$4.0 - $4.5").unwrap();
        ws.write_number(1, 4, 900).unwrap();
        ws.write_number(1, 5, 1.2).unwrap();
    }
    {
        let ws = wb.add_worksheet().set_name("simulation").unwrap();
        write_headers(
            ws,
            &[
                "Channel",
                "Site",
                "Planned Budget",
                "Exp. CPM (Planned)",
                "Recommended Budget",
                "Desired Budget",
                "Exp. CPM Range",
            ],
        );
        ws.write_string(1, 0, "Radio").unwrap();
        ws.write_string(1, 1, "iHeart").unwrap();
        ws.write_number(1, 2, 120000).unwrap();
        ws.write_string(1, 3, "$4.0 - $4.5").unwrap();
        ws.write_number(1, 4, 110000).unwrap();
        // Desired Budget (column 5) left blank
        ws.write_string(1, 6, "$4.0 - $4.5").unwrap();
    }
    wb.save(&path).unwrap();

    match load(&path) {
        Err(LoadError::BadNumber { sheet, row, column, value }) => {
            assert_eq!(sheet, "simulation");
            assert_eq!(row, 2);
            assert_eq!(column, "Desired Budget");
            assert_eq!(value, "");
        }
        Err(other) => panic!("expected BadNumber, got {other:?}"),
        Ok(loaded) => panic!("expected an error, loaded {:?}", loaded.source),
    }
}

#[test]
fn comparison_export_has_summary_and_detail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comparison.xlsx");

    let mut store = ScenarioStore::new(CpmOptions::default_per_channel());
    store.initialize(sample_workbook().simulation).unwrap();
    let mut wc = store.working_copy().unwrap();
    wc.apply(&TableEdit::desired_budget("Video", 370_000.0)).unwrap();
    let name = store.save(&wc).unwrap();
    let cmp = store.compare(&[name]).unwrap();

    let result = export_comparison(&cmp, &path).unwrap();
    assert_eq!(result.sheets_written, 2);

    let mut book = open_workbook_auto(&path).unwrap();
    let summary = book.worksheet_range("summary").unwrap();
    assert_eq!(summary.get_value((1, 0)), Some(&Data::String("Original".into())));
    assert_eq!(summary.get_value((2, 2)), Some(&Data::Float(-80_000.0)));

    let detail = book.worksheet_range("detail").unwrap();
    assert_eq!(detail.get_value((0, 3)), Some(&Data::String("scenario-1 vs Original".into())));
    // Video is the last channel
    assert_eq!(detail.get_value((5, 3)), Some(&Data::Float(-80_000.0)));
}
