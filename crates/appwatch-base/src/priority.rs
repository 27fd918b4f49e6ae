//! Directory priority table.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Priority of every watched base directory, in first-registered order.
///
/// Lower numbers win. Priorities are never reassigned or compacted.
#[derive(Debug, Default)]
pub struct PriorityTable {
    priorities: HashMap<PathBuf, u32>,
    order: Vec<PathBuf>,
}

impl PriorityTable {
    /// Assign the next priority to `dir`. Returns `None` if it already has one.
    pub fn register(&mut self, dir: PathBuf) -> Option<u32> {
        if self.priorities.contains_key(&dir) {
            return None;
        }
        let priority = self.order.len() as u32;
        self.priorities.insert(dir.clone(), priority);
        self.order.push(dir);
        Some(priority)
    }

    pub fn get(&self, dir: &Path) -> Option<u32> {
        self.priorities.get(dir).copied()
    }

    /// Registered directories, strongest first.
    pub fn directories(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
