//! Recording domain module

mod duration;
mod session;

pub use duration::{Duration, DEFAULT_MAX_DURATION_SECS};
pub use session::{InvalidStateTransition, RecorderState, RecordingSession};
