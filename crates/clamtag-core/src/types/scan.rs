//! Scan outcome and batch result types

use serde::{Deserialize, Serialize};

/// Status value written when a scan was started
pub const SCAN_IN_PROGRESS: &str = "IN_PROGRESS";
/// Status value written when the scan service refused or was unreachable
pub const SCAN_FAILED_TO_START: &str = "FAILED_TO_START";

/// Status recorded on an object after starting or completing a scan
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    InProgress,
    FailedToStart,
    /// Status reported by the scanner, not validated
    Reported(String),
}

impl ScanOutcome {
    /// Map the scan service response status to an outcome
    pub fn from_start_status(status: Option<u16>) -> Self {
        match status {
            Some(200) => ScanOutcome::InProgress,
            _ => ScanOutcome::FailedToStart,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ScanOutcome::InProgress => SCAN_IN_PROGRESS,
            ScanOutcome::FailedToStart => SCAN_FAILED_TO_START,
            ScanOutcome::Reported(status) => status,
        }
    }

    /// True for a scan that never started, including a status update that
    /// relays `FAILED_TO_START` from upstream.
    pub fn is_failed_to_start(&self) -> bool {
        self.as_str() == SCAN_FAILED_TO_START
    }
}

impl std::fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub status: u16,
    pub body: String,
}

impl BatchResult {
    pub const OK: u16 = 200;
    pub const UNPROCESSABLE: u16 = 422;

    pub fn from_counts(records: usize, errors: usize) -> Self {
        Self {
            status: if errors > 0 {
                Self::UNPROCESSABLE
            } else {
                Self::OK
            },
            body: format!("Event records processesed: {}, Errors: {}", records, errors),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }
}
