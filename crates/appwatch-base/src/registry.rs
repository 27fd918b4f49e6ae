//! Identifier registry: desktop file ID -> override list.

use crate::entry::{IdentifierBucket, LinkEntry};

use std::collections::HashMap;

/// Maps every tracked identifier to its non-empty bucket.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    buckets: HashMap<String, IdentifierBucket>,
}

impl IdentifierRegistry {
    pub fn get(&self, id: &str) -> Option<&IdentifierBucket> {
        self.buckets.get(id)
    }

    /// The winning entry for `id`.
    pub fn effective(&self, id: &str) -> Option<&LinkEntry> {
        self.buckets.get(id).and_then(IdentifierBucket::head)
    }

    /// Take the bucket out of the map for mutation. Pair with [`attach`](Self::attach).
    pub(crate) fn detach(&mut self, id: &str) -> Option<IdentifierBucket> {
        self.buckets.remove(id)
    }

    /// Put a bucket back under `id`. Empty buckets are dropped instead.
    pub(crate) fn attach(&mut self, id: String, bucket: IdentifierBucket) {
        if bucket.is_empty() {
            return;
        }
        let previous = self.buckets.insert(id, bucket);
        debug_assert!(previous.is_none(), "bucket attached twice");
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }
}
