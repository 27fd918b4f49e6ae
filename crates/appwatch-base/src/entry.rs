//! Link entries and the per-identifier override list.

use appwatch_link::Link;

use std::path::Path;
use std::rc::Rc;

/// A tracked desktop entry and the priority of the directory it came from.
///
/// The entry holds the registry's only strong reference to its link.
#[derive(Debug)]
pub struct LinkEntry {
    priority: u32,
    link: Rc<Link>,
}

impl LinkEntry {
    pub(crate) fn new(priority: u32, link: Rc<Link>) -> Self {
        Self { priority, link }
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn link(&self) -> &Rc<Link> {
        &self.link
    }
}

/// Where an entry of a given priority belongs in a bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Insert before this index.
    Free(usize),
    /// An entry with the same priority is already tracked.
    Taken(usize),
}

/// Entries for one identifier, sorted by priority. The head is the effective entry.
#[derive(Debug, Default)]
pub struct IdentifierBucket {
    entries: Vec<LinkEntry>,
}

impl IdentifierBucket {
    pub fn head(&self) -> Option<&LinkEntry> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry whose link was read from `full_path`.
    pub fn find_path(&self, full_path: &Path) -> Option<(usize, &LinkEntry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, entry)| entry.link.source_path() == full_path)
    }

    /// Position of the first entry with a priority number >= `priority`.
    pub fn slot_for(&self, priority: u32) -> Slot {
        match self.entries.iter().position(|e| e.priority >= priority) {
            Some(index) if self.entries[index].priority == priority => Slot::Taken(index),
            Some(index) => Slot::Free(index),
            None => Slot::Free(self.entries.len()),
        }
    }

    pub(crate) fn insert(&mut self, index: usize, entry: LinkEntry) {
        debug_assert!(index == 0 || self.entries[index - 1].priority < entry.priority);
        debug_assert!(index == self.entries.len() || self.entries[index].priority > entry.priority);
        self.entries.insert(index, entry);
    }

    pub(crate) fn remove(&mut self, index: usize) -> LinkEntry {
        self.entries.remove(index)
    }
}
