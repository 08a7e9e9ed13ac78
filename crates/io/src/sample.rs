// Built-in dataset used when no workbook can be read.

use budgetplan_model::{AllocationTable, ChannelRow, PlannedRow, RecommendedRow};

use crate::workbook::BudgetWorkbook;

const CHANNELS: [&str; 5] = ["Display", "FEP", "Search", "Social Media", "Video"];
const SITES: [&str; 5] = ["NYT", "FEP_YT", "Search", "Facebook", "Youtube"];
const PLANNED: [f64; 5] = [700_000.0, 500_000.0, 300_000.0, 200_000.0, 600_000.0];
const PLANNED_CPM: [&str; 5] = ["$6.5", "$8.5", "$5.5", "$9.5", "6.5"];
const RECOMMENDED: [f64; 5] = [650_000.0, 520_000.0, 350_000.0, 180_000.0, 450_000.0];
const RECOMMENDED_CPM: [&str; 5] =
    ["$6.3 - $6.8", "$8.1 - $8.9", "$5.0 - $5.5", "$9.3 - $10.0", "$6.3 - $6.8"];
const IUS: [f64; 5] = [3500.0, 8100.0, 12750.0, 4000.0, 7000.0];
const ROI: [f64; 5] = [3.14, 1.414, 3.43, 3.01, 3.14];
const PLANNED_CPM_RANGE: [&str; 5] =
    ["$6.5 - $7.0", "$8.0 - $8.7", "$5.2 - $5.8", "$9.1 - $9.8", "$6.5 - $7.0"];
const DESIRED: [f64; 5] = [650_000.0, 500_000.0, 350_000.0, 150_000.0, 450_000.0];

pub fn sample_workbook() -> BudgetWorkbook {
    let planned = (0..CHANNELS.len())
        .map(|i| PlannedRow {
            channel: CHANNELS[i].to_string(),
            site: SITES[i].to_string(),
            planned_budget: PLANNED[i],
            expected_cpm: PLANNED_CPM[i].to_string(),
        })
        .collect();

    let recommended = (0..CHANNELS.len())
        .map(|i| RecommendedRow {
            channel: CHANNELS[i].to_string(),
            site: SITES[i].to_string(),
            recommended_budget: RECOMMENDED[i],
            expected_cpm: RECOMMENDED_CPM[i].to_string(),
            ius: IUS[i],
            roi: ROI[i],
        })
        .collect();

    BudgetWorkbook { planned, recommended, simulation: sample_simulation() }
}

pub fn sample_simulation() -> AllocationTable {
    AllocationTable::new(
        (0..CHANNELS.len())
            .map(|i| {
                ChannelRow::new(CHANNELS[i], SITES[i])
                    .with_planned(PLANNED[i], PLANNED_CPM_RANGE[i])
                    .with_recommended(RECOMMENDED[i])
                    .with_desired(DESIRED[i], RECOMMENDED_CPM[i])
            })
            .collect(),
    )
}
