//! How a run ended and the process exit code that goes with it.

/// Normal ways a run can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Button 1 was released, or the fixed-position sample was written.
    Completed,
    /// A non-primary button was pressed and released before sampling began.
    Cancelled,
    /// The output reader went away mid-stream.
    OutputClosed,
}

/// Process exit statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    SetupFailed = 1,
    Cancelled = 2,
    InvalidConfig = 3,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<Outcome> for ExitStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Completed | Outcome::OutputClosed => ExitStatus::Success,
            Outcome::Cancelled => ExitStatus::Cancelled,
        }
    }
}
