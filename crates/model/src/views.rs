// Read-only planned / recommended sheets.
//
// IUs and ROI are static figures carried from the source data. Nothing in
// this workspace computes them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedRow {
    pub channel: String,
    pub site: String,
    pub planned_budget: f64,
    pub expected_cpm: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedRow {
    pub channel: String,
    pub site: String,
    pub recommended_budget: f64,
    pub expected_cpm: String,
    pub ius: f64,
    pub roi: f64,
}

pub fn planned_total(rows: &[PlannedRow]) -> f64 {
    rows.iter().map(|r| r.planned_budget).sum()
}

pub fn recommended_total(rows: &[RecommendedRow]) -> f64 {
    rows.iter().map(|r| r.recommended_budget).sum()
}
