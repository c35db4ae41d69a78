//! Wall-clock time source

use chrono::{DateTime, Local};

use crate::application::ports::Clock;

/// Clock reading the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
