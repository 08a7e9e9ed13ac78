//! `bplan simulate`: save scripted scenarios for one session and compare them.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;

use budgetplan_io::csv::{write_detail, write_summary};
use budgetplan_io::xlsx::export_comparison;
use budgetplan_io::DataSource;
use budgetplan_model::{AllocationTable, BudgetColumn, PlanningContext};
use budgetplan_scenario::model::{RowKind, Trend};
use budgetplan_scenario::{Comparison, DetailTable, ScenarioStore};

use crate::plan::{print_json, source_line};
use crate::render::{money, optional_money, percent, signed_money, TextTable};
use crate::script::ScenarioScript;
use crate::{CliError, ContextArgs, Sources};

/// Scenarios compared when `--select` is not given, in creation order.
const DEFAULT_SELECTION: usize = 2;

/// Optional files written next to the report.
#[derive(Debug, Default)]
pub struct Exports {
    pub xlsx: Option<PathBuf>,
    pub detail_csv: Option<PathBuf>,
    pub summary_csv: Option<PathBuf>,
}

#[derive(Serialize)]
struct SimulationReport<'a> {
    context: &'a PlanningContext,
    source: &'a DataSource,
    scenarios: Vec<SavedScenario>,
    deleted: &'a [String],
    comparison: &'a Comparison,
}

/// Listing entry for a scenario still in the store after the script ran.
#[derive(Serialize)]
struct SavedScenario {
    name: String,
    desired_total: f64,
    saved_at: String,
}

pub fn cmd_simulate(
    sources: &Sources,
    script_path: &Path,
    select: &[String],
    args: &ContextArgs,
    json_output: bool,
    exports: &Exports,
) -> Result<(), CliError> {
    let script_str = std::fs::read_to_string(script_path)
        .map_err(|e| CliError::io(format!("cannot read script {}: {e}", script_path.display())))?;
    let script =
        ScenarioScript::from_toml(&script_str).map_err(|e| CliError::usage(e.to_string()))?;

    let settings = sources.settings()?;
    let context = args.resolve(&settings)?;
    let loaded = sources.load(&settings)?;

    let mut store = ScenarioStore::new(settings.cpm_options());
    store
        .initialize(loaded.workbook.simulation.clone())
        .map_err(|e| {
            CliError::scenario(e).with_hint("run `bplan validate` to list every problem")
        })?;

    let mut previous: Option<AllocationTable> = None;
    for (i, block) in script.scenarios.iter().enumerate() {
        let mut working = match previous.take() {
            Some(table) if block.carry => table,
            _ => store.working_copy().map_err(CliError::scenario)?,
        };
        let block_err = |e: &dyn std::fmt::Display| {
            CliError::validation(format!("scenario block {}: {e}", i + 1))
        };
        working.apply_all(&block.table_edits()).map_err(|e| block_err(&e))?;
        let name = store.save(&working).map_err(|e| block_err(&e))?;
        log::debug!("block {} saved as {name}", i + 1);
        previous = Some(working);
    }

    for name in &script.delete {
        store.delete(name).map_err(CliError::scenario)?;
    }

    let selection: Vec<String> = if select.is_empty() {
        store.list().into_iter().take(DEFAULT_SELECTION).map(String::from).collect()
    } else {
        select.iter().map(|s| s.trim().to_string()).collect()
    };
    let comparison = store.compare(&selection).map_err(CliError::scenario)?;

    if let Some(path) = &exports.xlsx {
        let result = export_comparison(&comparison, path).map_err(CliError::io)?;
        eprintln!(
            "wrote {} ({} sheets, {} rows)",
            path.display(),
            result.sheets_written,
            result.rows_written
        );
    }
    if let Some(path) = &exports.detail_csv {
        write_csv(path, |w| write_detail(w, &comparison.detail))?;
        eprintln!("wrote {}", path.display());
    }
    if let Some(path) = &exports.summary_csv {
        write_csv(path, |w| write_summary(w, &comparison.summary))?;
        eprintln!("wrote {}", path.display());
    }

    let saved: Vec<SavedScenario> = store
        .scenarios()
        .iter()
        .map(|s| SavedScenario {
            name: s.name.clone(),
            desired_total: s.table.total(BudgetColumn::Desired),
            saved_at: s.saved_at.to_rfc3339(),
        })
        .collect();

    if json_output {
        print_json(&SimulationReport {
            context: &context,
            source: &loaded.source,
            scenarios: saved,
            deleted: &script.delete,
            comparison: &comparison,
        })?;
    } else {
        print_report(&context, &loaded.source, &saved, &comparison);
    }

    store.teardown();
    Ok(())
}

fn write_csv(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<(), String>,
) -> Result<(), CliError> {
    let file = File::create(path)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
    write(BufWriter::new(file)).map_err(CliError::io)
}

fn print_report(
    context: &PlanningContext,
    source: &DataSource,
    saved: &[SavedScenario],
    cmp: &Comparison,
) {
    println!("{context}");
    println!("{}", source_line(source));
    println!();

    println!("Saved scenarios");
    let mut listing = TextTable::new(&["Scenario", "Desired Total"]).numeric_from(1);
    for s in saved {
        listing.row(vec![s.name.clone(), money(s.desired_total)]);
    }
    print!("{}", listing.render());
    println!();

    println!("Summary");
    let mut summary =
        TextTable::new(&[
            "Scenario",
            "Total Budget",
            "Budget Change",
            "Change %",
            "Channels",
            "Status",
        ])
        .numeric_from(1);
    for row in &cmp.summary {
        let (delta, pct) = match &row.change {
            Some(c) => (signed_money(c.delta_vs_baseline), percent(c.percent_change)),
            None => ("-".to_string(), "-".to_string()),
        };
        summary.row(vec![
            row.scenario_name.clone(),
            money(row.total_budget),
            delta,
            pct,
            row.channel_count.to_string(),
            match row.kind {
                RowKind::Baseline => "Baseline".to_string(),
                RowKind::Custom => "Custom".to_string(),
            },
        ]);
    }
    print!("{}", summary.render());
    println!();

    println!("Detail");
    let mut detail = TextTable::new(&cmp.detail.headers()[..]).numeric_from(1);
    for row in &cmp.detail.rows {
        let mut cells = vec![row.channel.clone()];
        cells.extend(DetailTable::row_values(row).into_iter().map(optional_money));
        detail.row(cells);
    }
    print!("{}", detail.render());
    println!();

    let ins = &cmp.insights;
    println!("Key insights ({})", ins.scenario);
    println!("  Total budget change:        {}", signed_money(ins.total_change));
    match ins.average_channel_change {
        Some(avg) => println!("  Average change per channel: {}", signed_money(avg)),
        None => println!("  Average change per channel: n/a"),
    }
    let increase = ins.max_increase_channel.as_deref().unwrap_or("-");
    let decrease = ins.max_decrease_channel.as_deref().unwrap_or("-");
    println!("  Largest increase:           {increase}");
    println!("  Largest decrease:           {decrease}");
    let trend = match ins.trend {
        Trend::Increase => "budget increased",
        Trend::Decrease => "budget decreased",
        Trend::Unchanged => "budget unchanged",
    };
    println!("  Overall:                    {trend}");
}
