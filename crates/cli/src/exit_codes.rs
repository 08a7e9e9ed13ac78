//! CLI Exit Code Registry
//!
//! This is the single source of truth for all `bplan` exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                    |
//! |------|------------------------------------------------------------|
//! | 0    | Success                                                    |
//! | 2    | Usage error (bad args, malformed scenario script)          |
//! | 3    | Planning context not selected or invalid                   |
//! | 4    | Table failed validation (baseline, edit or saved scenario) |
//! | 5    | Scenario error (unknown name, empty selection)             |
//! | 6    | I/O error (settings, script, export target)                |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use budgetplan_scenario::ScenarioError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unreadable scenario script contents.
/// clap also exits with 2 on argument errors.
pub const EXIT_USAGE: u8 = 2;

/// Year, horizon, period, brand or segment missing or not in the configured lists.
pub const EXIT_CONTEXT: u8 = 3;

/// A table failed validation: duplicate channel, negative budget,
/// CPM label outside the allowed list, or an edit to an unknown channel.
pub const EXIT_VALIDATION: u8 = 4;

/// Unknown scenario name, or a comparison with nothing selected.
pub const EXIT_SCENARIO: u8 = 5;

/// Cannot read or write a file (settings, script, export target).
pub const EXIT_IO: u8 = 6;

/// Map a scenario error to its exit code.
pub fn scenario_exit_code(err: &ScenarioError) -> u8 {
    match err {
        ScenarioError::Invalid(_) => EXIT_VALIDATION,
        ScenarioError::NotFound(_)
        | ScenarioError::EmptySelection
        | ScenarioError::NotInitialized => EXIT_SCENARIO,
    }
}
