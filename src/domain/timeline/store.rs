//! Ordered timeline of committed entries

use std::collections::VecDeque;

use super::entry::{EntryId, TimelineEntry};

/// Newest-first sequence of entries. Grows only by prepend.
#[derive(Debug)]
pub struct Timeline {
    entries: VecDeque<TimelineEntry>,
    next_id: u64,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Create a timeline seeded with pre-existing entries, given newest first.
    /// Entries without an identifier get one, oldest first, so identifiers
    /// keep increasing toward the head.
    pub fn with_entries(seed: Vec<TimelineEntry>) -> Self {
        let mut timeline = Self::new();
        timeline.next_id = seed
            .iter()
            .filter_map(|e| e.id())
            .map(|id| id.get() + 1)
            .max()
            .unwrap_or(1);

        for entry in seed.into_iter().rev() {
            timeline.prepend(entry);
        }
        timeline
    }

    /// Insert at the head, assigning an identifier if the entry has none.
    /// Existing entries keep their order; nothing is deduplicated.
    pub fn prepend(&mut self, mut entry: TimelineEntry) -> EntryId {
        let fresh = EntryId::new(self.next_id);
        entry.assign_id(fresh);

        let id = entry.id().unwrap_or(fresh);
        self.next_id = self.next_id.max(id.get() + 1);
        self.entries.push_front(entry);
        id
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &TimelineEntry> + '_ {
        self.entries.iter()
    }

    /// Look up an entry by identifier
    pub fn get(&self, id: EntryId) -> Option<&TimelineEntry> {
        self.entries.iter().find(|e| e.id() == Some(id))
    }

    /// Most recently inserted entry
    pub fn latest(&self) -> Option<&TimelineEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
