//! `bplan init | show | policy | validate | periods`: single-table commands.

use std::path::PathBuf;

use serde::Serialize;

use budgetplan_io::sample::sample_workbook;
use budgetplan_io::xlsx::write_workbook;
use budgetplan_io::{DataSource, DEFAULT_WORKBOOK};
use budgetplan_model::views::{planned_total, recommended_total};
use budgetplan_model::{
    column_policy, problems, BudgetColumn, Column, CpmOptions, Horizon, PlanningContext,
};

use crate::render::{money, signed_money, TextTable};
use crate::{CliError, ContextArgs, Sources, View};

#[derive(Serialize)]
struct ViewOutput<'a, T: Serialize> {
    context: &'a PlanningContext,
    source: &'a DataSource,
    rows: T,
    total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommended_vs_planned: Option<f64>,
}

#[derive(Serialize)]
struct ValidationOutput<'a> {
    source: &'a DataSource,
    valid: bool,
    problems: Vec<String>,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

pub fn source_line(source: &DataSource) -> String {
    match source {
        DataSource::Workbook { path } => format!("Source: {}", path.display()),
        DataSource::Fallback { reason, .. } => format!("Source: built-in sample data ({reason})"),
    }
}

pub fn cmd_init(path: Option<PathBuf>, force: bool) -> Result<(), CliError> {
    let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK));
    if path.exists() && !force {
        return Err(CliError::usage(format!("{} already exists", path.display()))
            .with_hint("pass --force to overwrite"));
    }

    let result = write_workbook(&sample_workbook(), &path).map_err(CliError::io)?;
    eprintln!(
        "wrote {} ({} sheets, {} rows)",
        path.display(),
        result.sheets_written,
        result.rows_written
    );
    Ok(())
}

pub fn cmd_show(
    sources: &Sources,
    view: View,
    args: &ContextArgs,
    json: bool,
) -> Result<(), CliError> {
    let settings = sources.settings()?;
    let context = args.resolve(&settings)?;
    let loaded = sources.load(&settings)?;
    let book = &loaded.workbook;

    match view {
        View::Planned => {
            let total = planned_total(&book.planned);
            if json {
                return print_json(&ViewOutput {
                    context: &context,
                    source: &loaded.source,
                    rows: &book.planned,
                    total,
                    recommended_vs_planned: None,
                });
            }
            let headers = ["Channel", "Site", "Planned Budget", "Expected CPM"];
            let mut table = TextTable::new(&headers).numeric_from(2);
            for r in &book.planned {
                table.row(vec![
                    r.channel.clone(),
                    r.site.clone(),
                    money(r.planned_budget),
                    r.expected_cpm.clone(),
                ]);
            }
            print_view(&context, &loaded.source, &table);
            println!("Total planned budget: {}", money(total));
        }
        View::Recommended => {
            let total = recommended_total(&book.recommended);
            let delta = total - planned_total(&book.planned);
            if json {
                return print_json(&ViewOutput {
                    context: &context,
                    source: &loaded.source,
                    rows: &book.recommended,
                    total,
                    recommended_vs_planned: Some(delta),
                });
            }
            let mut table = TextTable::new(&[
                "Channel",
                "Site",
                "Recommended Budget",
                "Expected CPM",
                "IUs",
                "ROI",
            ])
            .numeric_from(2);
            for r in &book.recommended {
                table.row(vec![
                    r.channel.clone(),
                    r.site.clone(),
                    money(r.recommended_budget),
                    r.expected_cpm.clone(),
                    r.ius.to_string(),
                    r.roi.to_string(),
                ]);
            }
            print_view(&context, &loaded.source, &table);
            println!("Total recommended budget: {}", money(total));
            println!("Recommended vs planned: {}", signed_money(delta));
        }
        View::Simulation => {
            let sim = &book.simulation;
            let total = sim.total(BudgetColumn::Desired);
            if json {
                return print_json(&ViewOutput {
                    context: &context,
                    source: &loaded.source,
                    rows: sim,
                    total,
                    recommended_vs_planned: None,
                });
            }
            let headers: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
            let mut table = TextTable::new(&headers[..]).numeric_from(2);
            for r in sim.rows() {
                table.row(
                    Column::ALL
                        .iter()
                        .map(|c| match c.budget() {
                            Some(b) => money(b.value(r)),
                            None => r.cell_text(*c),
                        })
                        .collect(),
                );
            }
            print_view(&context, &loaded.source, &table);
            println!("Total desired budget: {}", money(total));
        }
    }
    Ok(())
}

fn print_view(context: &PlanningContext, source: &DataSource, table: &TextTable) {
    println!("{context}");
    println!("{}", source_line(source));
    println!();
    print!("{}", table.render());
}

pub fn cmd_policy(sources: &Sources, json: bool) -> Result<(), CliError> {
    let settings = sources.settings()?;
    let cpm = settings.cpm_options();
    let specs = column_policy(&cpm);

    if json {
        return print_json(&specs);
    }

    let mut table = TextTable::new(&["Column", "Editable", "Type"]);
    for spec in &specs {
        table.row(vec![
            spec.header.to_string(),
            (if spec.editable { "yes" } else { "no" }).to_string(),
            (if spec.numeric { "number" } else { "text" }).to_string(),
        ]);
    }
    print!("{}", table.render());
    println!();

    match &cpm {
        CpmOptions::Unconstrained => println!("Exp. CPM Range: free text"),
        CpmOptions::Global(values) => println!("Exp. CPM Range options: {}", values.join(" | ")),
        CpmOptions::PerChannel(map) => {
            println!("Exp. CPM Range options per channel:");
            for (channel, values) in map {
                println!("  {channel}: {}", values.join(" | "));
            }
        }
    }
    Ok(())
}

pub fn cmd_validate(sources: &Sources, json: bool) -> Result<(), CliError> {
    let settings = sources.settings()?;
    let loaded = sources.load(&settings)?;
    let sim = &loaded.workbook.simulation;
    let found: Vec<String> =
        problems(sim, &settings.cpm_options()).iter().map(|p| p.to_string()).collect();

    if json {
        print_json(&ValidationOutput {
            source: &loaded.source,
            valid: found.is_empty(),
            problems: found.clone(),
        })?;
    } else if found.is_empty() {
        println!("ok: {} channel(s) valid", sim.len());
    } else {
        for p in &found {
            println!("  - {p}");
        }
    }

    if found.is_empty() {
        Ok(())
    } else {
        Err(CliError::validation(format!("{} problem(s) found", found.len())))
    }
}

pub fn cmd_periods(horizon: &str) -> Result<(), CliError> {
    let horizon: Horizon = horizon.parse::<Horizon>().map_err(|e| CliError::usage(e.to_string()))?;
    for period in horizon.periods() {
        println!("{period}");
    }
    Ok(())
}
