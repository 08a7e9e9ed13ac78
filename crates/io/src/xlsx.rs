// Excel export: budget workbooks in the loader's layout, and comparisons.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};

use budgetplan_model::{Column, PlannedRow, RecommendedRow};
use budgetplan_scenario::model::{Comparison, DetailTable, RowKind, SummaryRow};

use crate::workbook::BudgetWorkbook;
use crate::{SHEET_PLANNED, SHEET_RECOMMENDED, SHEET_SIMULATION};

const BUDGET_FORMAT: &str = "#,##0";
const PERCENT_FORMAT: &str = "0.0";

#[derive(Debug, Default, Clone)]
pub struct ExportResult {
    pub sheets_written: usize,
    pub rows_written: usize,
}

/// Write `workbook` as three sheets readable by [`crate::workbook::read_workbook`].
pub fn write_workbook(workbook: &BudgetWorkbook, path: &Path) -> Result<ExportResult, String> {
    let mut result = ExportResult::default();
    let mut xlsx = XlsxWorkbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(BUDGET_FORMAT);

    {
        let ws = new_sheet(&mut xlsx, SHEET_PLANNED)?;
        write_headers(ws, &["Channel", "Site", "Planned Budget", "Expected CPM"], &header)?;
        for (i, r) in workbook.planned.iter().enumerate() {
            write_planned_row(ws, i as u32 + 1, r, &money)
                .map_err(|e| format!("Failed to write planned row: {e}"))?;
        }
        result.rows_written += workbook.planned.len();
    }

    {
        let ws = new_sheet(&mut xlsx, SHEET_RECOMMENDED)?;
        write_headers(
            ws,
            &["Channel", "Site", "Recommended Budget", "Expected CPM", "IUs", "ROI"],
            &header,
        )?;
        for (i, r) in workbook.recommended.iter().enumerate() {
            write_recommended_row(ws, i as u32 + 1, r, &money)
                .map_err(|e| format!("Failed to write recommended row: {e}"))?;
        }
        result.rows_written += workbook.recommended.len();
    }

    {
        let ws = new_sheet(&mut xlsx, SHEET_SIMULATION)?;
        let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        write_headers(ws, &headers, &header)?;
        for (i, r) in workbook.simulation.rows().iter().enumerate() {
            let row = i as u32 + 1;
            for (col, column) in Column::ALL.iter().enumerate() {
                let col = col as u16;
                let written = match column.budget() {
                    Some(budget) => ws.write_number_with_format(row, col, budget.value(r), &money),
                    None => ws.write_string(row, col, r.cell_text(*column)),
                };
                written.map_err(|e| format!("Failed to write simulation row {row}: {e}"))?;
            }
        }
        result.rows_written += workbook.simulation.len();
    }

    result.sheets_written = 3;
    xlsx.save(path).map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;
    log::debug!("wrote {} rows to {}", result.rows_written, path.display());
    Ok(result)
}

/// Write a comparison as `summary` and `detail` sheets. Missing detail
/// values are left blank.
pub fn export_comparison(comparison: &Comparison, path: &Path) -> Result<ExportResult, String> {
    let mut result = ExportResult::default();
    let mut xlsx = XlsxWorkbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(BUDGET_FORMAT);
    let pct = Format::new().set_num_format(PERCENT_FORMAT);

    {
        let ws = new_sheet(&mut xlsx, "summary")?;
        write_headers(
            ws,
            &["Scenario", "Total Budget", "Budget Change", "Change %", "Channel Count", "Status"],
            &header,
        )?;
        for (i, s) in comparison.summary.iter().enumerate() {
            write_summary_row(ws, i as u32 + 1, s, &money, &pct)
                .map_err(|e| format!("Failed to write summary row: {e}"))?;
        }
        result.rows_written += comparison.summary.len();
    }

    {
        let ws = new_sheet(&mut xlsx, "detail")?;
        let detail: &DetailTable = &comparison.detail;
        let headers = detail.headers();
        let refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        write_headers(ws, &refs, &header)?;
        for (i, r) in detail.rows.iter().enumerate() {
            let row = i as u32 + 1;
            ws.write_string(row, 0, &r.channel)
                .map_err(|e| format!("Failed to write detail row {row}: {e}"))?;
            for (j, value) in DetailTable::row_values(r).into_iter().enumerate() {
                if let Some(v) = value {
                    ws.write_number_with_format(row, j as u16 + 1, v, &money)
                        .map_err(|e| format!("Failed to write detail row {row}: {e}"))?;
                }
            }
        }
        result.rows_written += detail.rows.len();
    }

    result.sheets_written = 2;
    xlsx.save(path).map_err(|e| format!("Failed to save {}: {}", path.display(), e))?;
    Ok(result)
}

fn new_sheet<'a>(xlsx: &'a mut XlsxWorkbook, name: &str) -> Result<&'a mut Worksheet, String> {
    xlsx.add_worksheet()
        .set_name(name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", name, e))
}

fn write_headers(ws: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), String> {
    for (col, h) in headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *h, format)
            .map_err(|e| format!("Failed to write header '{}': {}", h, e))?;
    }
    Ok(())
}

fn write_planned_row(
    ws: &mut Worksheet,
    row: u32,
    r: &PlannedRow,
    money: &Format,
) -> Result<(), XlsxError> {
    ws.write_string(row, 0, &r.channel)?;
    ws.write_string(row, 1, &r.site)?;
    ws.write_number_with_format(row, 2, r.planned_budget, money)?;
    ws.write_string(row, 3, &r.expected_cpm)?;
    Ok(())
}

fn write_recommended_row(
    ws: &mut Worksheet,
    row: u32,
    r: &RecommendedRow,
    money: &Format,
) -> Result<(), XlsxError> {
    ws.write_string(row, 0, &r.channel)?;
    ws.write_string(row, 1, &r.site)?;
    ws.write_number_with_format(row, 2, r.recommended_budget, money)?;
    ws.write_string(row, 3, &r.expected_cpm)?;
    ws.write_number(row, 4, r.ius)?;
    ws.write_number(row, 5, r.roi)?;
    Ok(())
}

fn write_summary_row(
    ws: &mut Worksheet,
    row: u32,
    s: &SummaryRow,
    money: &Format,
    pct: &Format,
) -> Result<(), XlsxError> {
    ws.write_string(row, 0, &s.scenario_name)?;
    ws.write_number_with_format(row, 1, s.total_budget, money)?;
    if let Some(change) = &s.change {
        ws.write_number_with_format(row, 2, change.delta_vs_baseline, money)?;
        if let Some(p) = change.percent_change {
            ws.write_number_with_format(row, 3, p, pct)?;
        }
    }
    ws.write_number(row, 4, s.channel_count as f64)?;
    ws.write_string(
        row,
        5,
        match s.kind {
            RowKind::Baseline => "Baseline",
            RowKind::Custom => "Custom",
        },
    )?;
    Ok(())
}
