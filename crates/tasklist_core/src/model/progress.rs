//! Completion summary for a task sequence.
//!
//! # Invariants
//! - `completed <= total`.
//! - Exactly half complete counts as `AlmostThere`; ties favour the
//!   higher-progress stage.

use crate::model::task::Task;
use serde::Serialize;

/// Qualitative progress bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    NotStarted,
    KeepGoing,
    AlmostThere,
    AllComplete,
}

impl ProgressStage {
    /// User-facing message for this stage.
    pub fn message(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started yet",
            Self::KeepGoing => "Keep going!",
            Self::AlmostThere => "Almost there!",
            Self::AllComplete => "All tasks complete!",
        }
    }
}

/// Derived progress for the currently displayed tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed: completed.min(total),
            total,
        }
    }

    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self::new(completed, tasks.len())
    }

    /// Rounded completion percentage; `0` for an empty sequence.
    pub fn percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // Half-up rounding in integer arithmetic.
        let pct = (self.completed * 200 + self.total) / (self.total * 2);
        u8::try_from(pct).unwrap_or(100)
    }

    pub fn stage(&self) -> ProgressStage {
        if self.total == 0 || self.completed == 0 {
            ProgressStage::NotStarted
        } else if self.completed == self.total {
            ProgressStage::AllComplete
        } else if self.completed * 2 >= self.total {
            ProgressStage::AlmostThere
        } else {
            ProgressStage::KeepGoing
        }
    }

    pub fn message(&self) -> &'static str {
        self.stage().message()
    }

    /// One-line tracker text, e.g. `3 completed out of 4 tasks (75%)`.
    pub fn summary(&self) -> String {
        format!(
            "{} completed out of {} tasks ({}%)",
            self.completed,
            self.total,
            self.percentage()
        )
    }
}
