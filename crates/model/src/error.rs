use std::fmt;

use crate::table::BudgetColumn;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two rows share the same channel id.
    DuplicateChannel { channel: String },
    /// CPM range label outside the channel's allowed set.
    InvalidCpm { channel: String, value: String },
    /// Budget amount below zero, NaN or infinite.
    NegativeBudget { channel: String, column: BudgetColumn, value: f64 },
    /// Edit addressed a channel the table does not contain.
    UnknownChannel { channel: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateChannel { channel } => write!(f, "duplicate channel '{channel}'"),
            Self::InvalidCpm { channel, value } => {
                write!(f, "channel '{channel}': CPM range '{value}' is not an allowed option")
            }
            Self::NegativeBudget { channel, column, value } => {
                write!(
                    f,
                    "channel '{channel}': {} must be a non-negative amount, got {value}",
                    column.header()
                )
            }
            Self::UnknownChannel { channel } => write!(f, "unknown channel '{channel}'"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    YearOutOfRange { year: i32 },
    InvalidPeriod { horizon: String, period: String },
    UnknownHorizon(String),
    /// No brand picked (the "Select Brand" placeholder).
    BrandNotSelected,
    UnknownBrand(String),
    /// No segment picked (the "Select Segment" placeholder).
    SegmentNotSelected,
    UnknownSegment(String),
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YearOutOfRange { year } => {
                write!(f, "year {year} is outside the planning range 2020-2030")
            }
            Self::InvalidPeriod { horizon, period } => {
                write!(f, "period '{period}' is not valid for horizon {horizon}")
            }
            Self::UnknownHorizon(h) => {
                write!(f, "unknown horizon '{h}' (expected quarterly, half-yearly or annual)")
            }
            Self::BrandNotSelected => write!(f, "please select a valid brand to view results"),
            Self::UnknownBrand(b) => write!(f, "unknown brand '{b}'"),
            Self::SegmentNotSelected => write!(f, "please select a valid segment to view results"),
            Self::UnknownSegment(s) => write!(f, "unknown segment '{s}'"),
        }
    }
}

impl std::error::Error for ContextError {}
