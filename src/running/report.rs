//! What happened when a Test was executed.

use crate::running::error::RunError;

#[derive(Debug)]
pub enum Outcome {
    Passed,
    Skipped,
    /// Not attempted because the setup failed.
    Blocked,
    Failed(RunError),
}

#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct TestReport {
    pub name: String,
    pub skipped: bool,
    pub setup: Option<RunError>,
    pub cases: Vec<CaseReport>,
}

impl TestReport {
    pub fn passed(&self) -> bool {
        self.setup
            .is_none()
            && self
                .cases
                .iter()
                .all(|case| matches!(case.outcome, Outcome::Passed | Outcome::Skipped))
    }

    pub fn count(&self, predicate: fn(&Outcome) -> bool) -> usize {
        self.cases
            .iter()
            .filter(|case| predicate(&case.outcome))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &RunError)> {
        self.cases
            .iter()
            .filter_map(|case| match &case.outcome {
                Outcome::Failed(error) => Some((case.name.as_str(), error)),
                _ => None,
            })
    }
}
