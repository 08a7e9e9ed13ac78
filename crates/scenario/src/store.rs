use budgetplan_model::{validate, AllocationTable, CpmOptions};
use chrono::Utc;

use crate::compare;
use crate::error::ScenarioError;
use crate::model::{Comparison, Scenario, SummaryRow};

/// Prefix of auto-generated scenario names (`scenario-1`, `scenario-2`, ...).
pub const SCENARIO_PREFIX: &str = "scenario-";

/// Session-scoped owner of the baseline and every saved snapshot.
///
/// Scenarios move from absent to saved and stay saved until the store is
/// torn down. The name counter never goes backwards, so names are unique for
/// the whole session even after deletes.
#[derive(Debug, Default)]
pub struct ScenarioStore {
    baseline: Option<AllocationTable>,
    scenarios: Vec<Scenario>,
    name_counter: u64,
    cpm: CpmOptions,
}

impl ScenarioStore {
    pub fn new(cpm: CpmOptions) -> Self {
        Self {
            baseline: None,
            scenarios: Vec::new(),
            name_counter: 0,
            cpm,
        }
    }

    /// Set the baseline once. Returns `false` (and leaves the store untouched)
    /// when a baseline is already present.
    pub fn initialize(&mut self, baseline: AllocationTable) -> Result<bool, ScenarioError> {
        if self.baseline.is_some() {
            log::debug!("scenario store already initialized; ignoring new baseline");
            return Ok(false);
        }
        validate(&baseline, &self.cpm)?;
        log::debug!("scenario store initialized with {} channel(s)", baseline.len());
        self.baseline = Some(baseline);
        Ok(true)
    }

    pub fn is_initialized(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Result<&AllocationTable, ScenarioError> {
        self.baseline.as_ref().ok_or(ScenarioError::NotInitialized)
    }

    /// A fresh editable copy of the baseline.
    pub fn working_copy(&self) -> Result<AllocationTable, ScenarioError> {
        self.baseline().cloned()
    }

    pub fn cpm_options(&self) -> &CpmOptions {
        &self.cpm
    }

    /// Snapshot `working_copy` under the next generated name.
    pub fn save(&mut self, working_copy: &AllocationTable) -> Result<String, ScenarioError> {
        validate(working_copy, &self.cpm)?;

        self.name_counter += 1;
        let name = format!("{SCENARIO_PREFIX}{}", self.name_counter);
        self.scenarios.push(Scenario {
            name: name.clone(),
            table: working_copy.clone(),
            saved_at: Utc::now(),
        });

        log::info!("saved {name} ({} channel(s))", working_copy.len());
        Ok(name)
    }

    /// Names in creation order.
    pub fn list(&self) -> Vec<&str> {
        self.scenarios.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn scenario(&self, name: &str) -> Result<&Scenario, ScenarioError> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ScenarioError::NotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<&AllocationTable, ScenarioError> {
        self.scenario(name).map(|s| &s.table)
    }

    pub fn delete(&mut self, name: &str) -> Result<Scenario, ScenarioError> {
        let idx = self
            .scenarios
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ScenarioError::NotFound(name.to_string()))?;
        log::info!("deleted {name}");
        Ok(self.scenarios.remove(idx))
    }

    /// Resolve names in the order given. Repeated names keep their first position.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Scenario>, ScenarioError> {
        let mut selected: Vec<&Scenario> = Vec::with_capacity(names.len());
        for name in names {
            let scenario = self.scenario(name.as_ref())?;
            if !selected.iter().any(|s| s.name == scenario.name) {
                selected.push(scenario);
            }
        }
        Ok(selected)
    }

    /// Summary rows for the named scenarios. Empty selection gives the
    /// baseline row only.
    pub fn summarize<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<SummaryRow>, ScenarioError> {
        let selection = self.select(names)?;
        Ok(compare::summarize(self.baseline()?, &selection))
    }

    /// Full comparison for the named scenarios; empty selection is an error.
    pub fn compare<S: AsRef<str>>(&self, names: &[S]) -> Result<Comparison, ScenarioError> {
        let selection = self.select(names)?;
        compare::compare(self.baseline()?, &selection)
    }

    /// End of session: drop the baseline and every snapshot.
    pub fn teardown(self) {
        log::info!("scenario store torn down ({} scenario(s) discarded)", self.scenarios.len());
    }
}
