// Scenario scripts: TOML lists of working-copy edits, one block per saved scenario.

use std::fmt;

use serde::Deserialize;

use budgetplan_model::TableEdit;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptError {
    Parse(String),
    Validation(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "script parse error: {msg}"),
            Self::Validation(msg) => write!(f, "script validation error: {msg}"),
        }
    }
}

impl std::error::Error for ScriptError {}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioScript {
    /// Scenario names to delete after every block has been saved.
    #[serde(default)]
    pub delete: Vec<String>,

    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<ScenarioBlock>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioBlock {
    /// Start from the previous block's working copy instead of a fresh one.
    #[serde(default)]
    pub carry: bool,

    #[serde(default, rename = "edit")]
    pub edits: Vec<EditEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditEntry {
    pub channel: String,
    pub desired: Option<f64>,
    pub cpm: Option<String>,
}

impl EditEntry {
    /// One table edit per field set, desired budget first.
    pub fn table_edits(&self) -> Vec<TableEdit> {
        let mut edits = Vec::with_capacity(2);
        if let Some(amount) = self.desired {
            edits.push(TableEdit::desired_budget(&self.channel, amount));
        }
        if let Some(label) = &self.cpm {
            edits.push(TableEdit::cpm_range(&self.channel, label));
        }
        edits
    }
}

impl ScenarioBlock {
    pub fn table_edits(&self) -> Vec<TableEdit> {
        self.edits.iter().flat_map(EditEntry::table_edits).collect()
    }
}

impl ScenarioScript {
    pub fn from_toml(input: &str) -> Result<Self, ScriptError> {
        let script: ScenarioScript =
            toml::from_str(input).map_err(|e| ScriptError::Parse(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), ScriptError> {
        for (i, block) in self.scenarios.iter().enumerate() {
            for (j, edit) in block.edits.iter().enumerate() {
                if edit.channel.trim().is_empty() {
                    return Err(ScriptError::Validation(format!(
                        "scenario {}, edit {}: channel is empty",
                        i + 1,
                        j + 1
                    )));
                }
                if edit.desired.is_none() && edit.cpm.is_none() {
                    return Err(ScriptError::Validation(format!(
                        "scenario {}, edit {} ({}): set `desired` or `cpm`",
                        i + 1,
                        j + 1,
                        edit.channel
                    )));
                }
            }
        }
        Ok(())
    }
}
