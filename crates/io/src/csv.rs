// CSV export of comparison tables

use std::io::Write;

use budgetplan_scenario::model::{DetailTable, RowKind, SummaryRow};

/// Detail table with the same headers as the Excel export; missing values are empty fields.
pub fn write_detail<W: Write>(writer: W, detail: &DetailTable) -> Result<(), String> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(detail.headers()).map_err(|e| e.to_string())?;

    for row in &detail.rows {
        let mut record = vec![row.channel.clone()];
        record.extend(DetailTable::row_values(row).into_iter().map(format_value));
        wtr.write_record(&record).map_err(|e| e.to_string())?;
    }

    wtr.flush().map_err(|e| e.to_string())
}

pub fn write_summary<W: Write>(writer: W, summary: &[SummaryRow]) -> Result<(), String> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record([
        "Scenario",
        "Total Budget",
        "Budget Change",
        "Change %",
        "Channel Count",
        "Status",
    ])
    .map_err(|e| e.to_string())?;

    for row in summary {
        let (delta, pct) = match &row.change {
            Some(c) => (format_value(Some(c.delta_vs_baseline)), format_value(c.percent_change)),
            None => (String::new(), String::new()),
        };
        let status = match row.kind {
            RowKind::Baseline => "Baseline",
            RowKind::Custom => "Custom",
        };
        wtr.write_record([
            row.scenario_name.clone(),
            format_value(Some(row.total_budget)),
            delta,
            pct,
            row.channel_count.to_string(),
            status.to_string(),
        ])
        .map_err(|e| e.to_string())?;
    }

    wtr.flush().map_err(|e| e.to_string())
}

fn format_value(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Some(n) => format!("{n}"),
    }
}
