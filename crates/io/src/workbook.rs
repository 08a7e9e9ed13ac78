// Budget workbook loading (xlsx, xls, xlsb, ods)
//
// Three sheets, header in row 1, columns matched by header text in any order.
// A missing or unreadable source yields the built-in dataset; problems in a
// workbook that opened are returned to the caller.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::Serialize;

use budgetplan_model::{AllocationTable, ChannelRow, Column, PlannedRow, RecommendedRow};

use crate::sample::sample_workbook;
use crate::{SHEET_PLANNED, SHEET_RECOMMENDED, SHEET_SIMULATION};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetWorkbook {
    pub planned: Vec<PlannedRow>,
    pub recommended: Vec<RecommendedRow>,
    pub simulation: AllocationTable,
}

/// Where the loaded tables came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Workbook { path: PathBuf },
    /// Source missing or unreadable; the built-in dataset was used instead.
    Fallback { path: PathBuf, reason: String },
}

impl DataSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadedWorkbook {
    pub source: DataSource,
    #[serde(flatten)]
    pub workbook: BudgetWorkbook,
}

/// Why a workbook could not be read. [`load`] recovers `NotFound` and `Open`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    NotFound(PathBuf),
    Open(String),
    MissingSheet(String),
    EmptySheet(String),
    MissingColumn { sheet: String, column: String },
    BadNumber { sheet: String, row: usize, column: String, value: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "workbook not found: {}", path.display()),
            Self::Open(msg) => write!(f, "failed to open workbook: {msg}"),
            Self::MissingSheet(sheet) => write!(f, "missing sheet '{sheet}'"),
            Self::EmptySheet(sheet) => write!(f, "sheet '{sheet}' has no header row"),
            Self::MissingColumn { sheet, column } => {
                write!(f, "sheet '{sheet}': missing column '{column}'")
            }
            Self::BadNumber { sheet, row, column, value } => {
                write!(f, "sheet '{sheet}', row {row}: cannot parse '{value}' in column '{column}'")
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl LoadError {
    /// The source itself could not be read, as opposed to bad data inside it.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Open(_))
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Load the workbook at `path`, falling back to the built-in dataset when the
/// file is missing or cannot be opened. Data problems in a readable workbook
/// (missing sheet or column, unparseable number) are returned as errors.
pub fn load(path: &Path) -> Result<LoadedWorkbook, LoadError> {
    match read_workbook(path) {
        Ok(workbook) => {
            log::debug!(
                "loaded {} channel(s) from {}",
                workbook.simulation.len(),
                path.display()
            );
            Ok(LoadedWorkbook {
                source: DataSource::Workbook { path: path.to_path_buf() },
                workbook,
            })
        }
        Err(e) if e.is_unavailable() => {
            log::warn!("{e}; using built-in sample data");
            Ok(LoadedWorkbook {
                source: DataSource::Fallback {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
                workbook: sample_workbook(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Strict read: any problem is returned instead of recovered.
pub fn read_workbook(path: &Path) -> Result<BudgetWorkbook, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Open(e.to_string()))?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut range_for = |wanted: &str| -> Result<Range<Data>, LoadError> {
        let name = sheet_names
            .iter()
            .find(|n| n.trim().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LoadError::MissingSheet(wanted.to_string()))?;
        workbook
            .worksheet_range(name)
            .map_err(|e| LoadError::Open(format!("failed to read sheet '{name}': {e}")))
    };

    let planned_range = range_for(SHEET_PLANNED)?;
    let recommended_range = range_for(SHEET_RECOMMENDED)?;
    let simulation_range = range_for(SHEET_SIMULATION)?;

    let planned = SheetReader::new(SHEET_PLANNED, &planned_range)?
        .records(|r| {
            Ok(PlannedRow {
                channel: r.text("Channel")?,
                site: r.text("Site")?,
                planned_budget: r.number("Planned Budget")?,
                expected_cpm: r.text("Expected CPM")?,
            })
        })?;

    let recommended = SheetReader::new(SHEET_RECOMMENDED, &recommended_range)?
        .records(|r| {
            Ok(RecommendedRow {
                channel: r.text("Channel")?,
                site: r.text("Site")?,
                recommended_budget: r.number("Recommended Budget")?,
                expected_cpm: r.text("Expected CPM")?,
                ius: r.number("IUs")?,
                roi: r.number("ROI")?,
            })
        })?;

    let simulation = SheetReader::new(SHEET_SIMULATION, &simulation_range)?
        .records(|r| {
            Ok(ChannelRow::new(r.text(Column::Channel.header())?, r.text(Column::Site.header())?)
                .with_planned(
                    r.number(Column::PlannedBudget.header())?,
                    r.text(Column::PlannedCpmRange.header())?,
                )
                .with_recommended(r.number(Column::RecommendedBudget.header())?)
                .with_desired(
                    r.number(Column::DesiredBudget.header())?,
                    r.text(Column::ExpectedCpmRange.header())?,
                ))
        })?;

    Ok(BudgetWorkbook { planned, recommended, simulation: AllocationTable::new(simulation) })
}

// ---------------------------------------------------------------------------
// Sheet reading
// ---------------------------------------------------------------------------

static EMPTY: Data = Data::Empty;

struct SheetReader<'a> {
    sheet: &'static str,
    range: &'a Range<Data>,
    columns: HashMap<String, usize>,
}

struct RowReader<'r> {
    sheet: &'static str,
    /// 1-based workbook row, for error messages.
    row_number: usize,
    cells: &'r [Data],
    columns: &'r HashMap<String, usize>,
}

impl<'a> SheetReader<'a> {
    fn new(sheet: &'static str, range: &'a Range<Data>) -> Result<Self, LoadError> {
        let header = range.rows().next().ok_or_else(|| LoadError::EmptySheet(sheet.to_string()))?;
        let columns = header
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| {
                let text = cell_text(cell);
                (!text.is_empty()).then(|| (normalize_header(&text), idx))
            })
            .collect();
        Ok(Self { sheet, range, columns })
    }

    fn records<T>(
        &self,
        mut build: impl FnMut(&RowReader<'_>) -> Result<T, LoadError>,
    ) -> Result<Vec<T>, LoadError> {
        let (start_row, _) = self.range.start().unwrap_or((0, 0));
        let mut out = Vec::new();
        for (idx, cells) in self.range.rows().enumerate().skip(1) {
            if cells.iter().all(|c| cell_text(c).is_empty()) {
                continue;
            }
            let row = RowReader {
                sheet: self.sheet,
                row_number: start_row as usize + idx + 1,
                cells,
                columns: &self.columns,
            };
            out.push(build(&row)?);
        }
        Ok(out)
    }
}

impl RowReader<'_> {
    fn cell(&self, column: &str) -> Result<&Data, LoadError> {
        let idx = self
            .columns
            .get(&normalize_header(column))
            .ok_or_else(|| LoadError::MissingColumn {
                sheet: self.sheet.to_string(),
                column: column.to_string(),
            })?;
        Ok(self.cells.get(*idx).unwrap_or(&EMPTY))
    }

    fn text(&self, column: &str) -> Result<String, LoadError> {
        self.cell(column).map(cell_text)
    }

    fn number(&self, column: &str) -> Result<f64, LoadError> {
        let cell = self.cell(column)?;
        let value = match cell {
            Data::Float(n) => Some(*n),
            Data::Int(n) => Some(*n as f64),
            Data::String(s) => parse_amount(s),
            _ => None,
        };
        value.ok_or_else(|| LoadError::BadNumber {
            sheet: self.sheet.to_string(),
            row: self.row_number,
            column: column.to_string(),
            value: cell_text(cell),
        })
    }
}

fn normalize_header(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_lowercase()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        // Format nicely: integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{n}"),
        Data::Int(n) => format!("{n}"),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::Error(e) => format!("#{e:?}"),
    }
}

/// Parse a budget typed as text: "$650,000", " 1 200.50 ".
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| !matches!(c, '$' | ',' | ' ' | '\u{a0}')).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
