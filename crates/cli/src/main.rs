// bplan - channel budget planning and scenario comparison (headless)

mod exit_codes;
mod plan;
mod render;
mod script;
mod simulate;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgetplan_config::Settings;
use budgetplan_io::{LoadedWorkbook, DEFAULT_WORKBOOK};
use budgetplan_model::context::DEFAULT_YEAR;
use budgetplan_model::{ContextError, Horizon, PlanningContext};
use budgetplan_scenario::ScenarioError;

use exit_codes::{
    scenario_exit_code, EXIT_CONTEXT, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE, EXIT_VALIDATION,
};

#[derive(Parser)]
#[command(name = "bplan")]
#[command(about = "Channel budget planning and scenario comparison")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Budget workbook (overrides data.workbookPath in settings)
    #[arg(long, global = true, env = "BPLAN_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// Settings file (default: <config dir>/budgetplan/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in dataset as a budget workbook
    #[command(after_help = "\
Examples:
  bplan init
  bplan init data/backend_data.xlsx --force")]
    Init {
        /// Output path (default: backend_data.xlsx)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show one of the workbook tables for a planning context
    #[command(after_help = "\
Examples:
  bplan show planned --brand 'Brand A' --segment Bath
  bplan show simulation --horizon half-yearly --period H2 --brand 'Brand B' --segment LDS --json")]
    Show {
        /// Table to show
        view: View,

        #[command(flatten)]
        context: ContextArgs,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Print which simulation columns are editable and their CPM options
    Policy {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// Validate the simulation table against the configured CPM options
    Validate {
        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },

    /// List period options for a horizon
    #[command(after_help = "\
Examples:
  bplan periods quarterly
  bplan periods half-yearly")]
    Periods {
        /// quarterly, half-yearly or annual
        horizon: String,
    },

    /// Save edited scenarios from a script and compare them with the baseline
    #[command(after_help = "\
Script format (TOML):
  delete = [\"scenario-1\"] # optional, applied after all saves

  [[scenario]]
  [[scenario.edit]]
  channel = \"Video\"
  desired = 370000

  [[scenario]]
  carry = true            # start from the previous scenario's edits
  [[scenario.edit]]
  channel = \"Display\"
  cpm = \"$6.5 - $7.0\"

Examples:
  bplan simulate --script edits.toml --brand 'Brand A' --segment Bath
  bplan simulate --script edits.toml --brand 'Brand A' --segment Bath --select scenario-2 --json
  bplan simulate --script edits.toml --brand 'Brand A' --segment Bath --xlsx cmp.xlsx
  bplan simulate --script edits.toml --brand 'Brand A' --segment Bath --csv detail.csv
  bplan simulate --script edits.toml --brand 'Brand A' --segment Bath --summary-csv summary.csv")]
    Simulate {
        /// Scenario script (TOML)
        #[arg(long)]
        script: PathBuf,

        /// Scenarios to compare (default: the first two saved).
        /// Repeatable; comma-separated accepted.
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        #[command(flatten)]
        context: ContextArgs,

        /// Output JSON to stdout instead of tables
        #[arg(long)]
        json: bool,

        /// Also write the comparison as an Excel workbook
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,

        /// Also write the detail table as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Also write the summary table as CSV
        #[arg(long, value_name = "PATH")]
        summary_csv: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum View {
    Planned,
    Recommended,
    Simulation,
}

/// Planning context selections. Validated before any table is shown.
#[derive(Args, Debug)]
pub struct ContextArgs {
    /// Planning year (2020-2030)
    #[arg(long, default_value_t = DEFAULT_YEAR)]
    year: i32,

    /// quarterly, half-yearly or annual
    #[arg(long, default_value = "quarterly")]
    horizon: String,

    /// Period within the horizon (default: the first one)
    #[arg(long)]
    period: Option<String>,

    /// Brand, one of planning.brands
    #[arg(long)]
    brand: Option<String>,

    /// Segment, one of planning.segments
    #[arg(long)]
    segment: Option<String>,
}

impl ContextArgs {
    pub fn resolve(&self, settings: &Settings) -> Result<PlanningContext, CliError> {
        let horizon: Horizon = self.horizon.parse().map_err(|e| CliError::context(e, settings))?;
        PlanningContext::select(
            self.year,
            horizon,
            self.period.as_deref(),
            self.brand.as_deref(),
            self.segment.as_deref(),
            &settings.brands,
            &settings.segments,
        )
        .map_err(|e| CliError::context(e, settings))
    }
}

/// `--workbook` / `--config` overrides shared by every data command.
pub struct Sources {
    workbook: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Sources {
    pub fn settings(&self) -> Result<Settings, CliError> {
        match &self.config {
            Some(path) => Settings::load_from(path).map_err(CliError::io),
            None => Ok(Settings::load()),
        }
    }

    pub fn workbook_path(&self, settings: &Settings) -> PathBuf {
        self.workbook
            .clone()
            .or_else(|| settings.workbook_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK))
    }

    pub fn load(&self, settings: &Settings) -> Result<LoadedWorkbook, CliError> {
        let path = self.workbook_path(settings);
        budgetplan_io::load(&path).map_err(|e| {
            CliError::validation(format!("{}: {e}", path.display()))
                .with_hint("fix the workbook, or move it aside to use the built-in sample data")
        })
    }
}

fn main() -> ExitCode {
    // `log` records from the library crates are bridged into this subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).without_time())
        .init();

    let cli = Cli::parse();
    let sources = Sources { workbook: cli.workbook, config: cli.config };

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: bplan <command> [options]");
            eprintln!("       bplan --help for more information");
            Ok(())
        }
        Some(Commands::Init { path, force }) => plan::cmd_init(path, force),
        Some(Commands::Show { view, context, json }) => {
            plan::cmd_show(&sources, view, &context, json)
        }
        Some(Commands::Policy { json }) => plan::cmd_policy(&sources, json),
        Some(Commands::Validate { json }) => plan::cmd_validate(&sources, json),
        Some(Commands::Periods { horizon }) => plan::cmd_periods(&horizon),
        Some(Commands::Simulate { script, select, context, json, xlsx, csv, summary_csv }) => {
            let exports = simulate::Exports { xlsx, detail_csv: csv, summary_csv };
            simulate::cmd_simulate(&sources, &script, &select, &context, json, &exports)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn validation(msg: impl fmt::Display) -> Self {
        Self { code: EXIT_VALIDATION, message: msg.to_string(), hint: None }
    }

    /// Context errors carry the valid choices as a hint.
    pub fn context(err: ContextError, settings: &Settings) -> Self {
        let hint = match &err {
            ContextError::BrandNotSelected | ContextError::UnknownBrand(_) => {
                Some(format!("pass --brand with one of: {}", settings.brands.join(", ")))
            }
            ContextError::SegmentNotSelected | ContextError::UnknownSegment(_) => {
                Some(format!("pass --segment with one of: {}", settings.segments.join(", ")))
            }
            ContextError::InvalidPeriod { .. } => Some("see `bplan periods <horizon>`".to_string()),
            _ => None,
        };
        Self { code: EXIT_CONTEXT, message: err.to_string(), hint }
    }

    /// Create error from scenario error with proper exit code.
    pub fn scenario(err: ScenarioError) -> Self {
        let code = scenario_exit_code(&err);
        let hint = match &err {
            ScenarioError::EmptySelection => Some("save a scenario or pass --select".to_string()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
