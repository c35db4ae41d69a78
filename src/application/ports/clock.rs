//! Time source port

use chrono::{DateTime, Local};

/// Port for the current wall-clock time used to stamp entries
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}
