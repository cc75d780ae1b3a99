//! What a run did

use serde::Serialize;
use tm_core::{Direction, Label, Version};

/// One migration of a run
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub version: Version,
    pub file_name: String,
    pub direction: Direction,
    /// Statements run (or, in dry runs, that would have run). Empty unless
    /// SQL was requested.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<String>,
    /// False for dry runs
    pub executed: bool,
}

/// Summary of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub direction: Direction,
    pub from: Version,
    pub to: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    pub steps: Vec<StepReport>,
    /// Store version after the run
    pub final_version: Version,
}

impl RunReport {
    /// Nothing to do: the database was already at the destination
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn executed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.executed).count()
    }
}
