use std::fmt;

use budgetplan_model::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioError {
    /// No saved scenario with this name.
    NotFound(String),
    /// Comparison requested with nothing selected.
    EmptySelection,
    /// Baseline requested before `initialize`.
    NotInitialized,
    /// Working copy or baseline failed validation.
    Invalid(ValidationError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "scenario not found: {name}"),
            Self::EmptySelection => write!(f, "select at least one scenario to compare"),
            Self::NotInitialized => write!(f, "scenario store has no baseline yet"),
            Self::Invalid(e) => write!(f, "invalid table: {e}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ScenarioError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}
