//! Timeline domain module

mod entry;
mod store;

pub use entry::{EntryContent, EntryId, EntryKind, ModuleTag, TimelineEntry};
pub use store::Timeline;
