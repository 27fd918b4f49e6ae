//! Applying filesystem notifications to the link base.

use crate::entry::{LinkEntry, Slot};
use crate::linkbase::{LinkBase, LinkBaseUpdate};
use crate::watch::{WatchKind, WatchNotification};

use appwatch_link::{Link, id_from_ddfile, is_desktop_file};
use log::{debug, trace};

use std::path::Path;
use std::rc::Rc;

impl LinkBase {
    /// Apply one filesystem notification.
    ///
    /// Never fails: files that cannot be parsed or should not be displayed are
    /// simply not tracked, and notifications for untracked files are ignored.
    /// A Modified notification for a tracked file reports `Removed` and then,
    /// if the new contents are accepted, `Added`.
    pub fn process(&mut self, notification: &WatchNotification) {
        let WatchNotification {
            base_path,
            sub_path,
            full_path,
            kind,
        } = notification;

        if !is_desktop_file(sub_path) {
            return;
        }
        let id = id_from_ddfile(sub_path);
        trace!("{:?} {} ({})", kind, id, full_path.display());

        match kind {
            WatchKind::SelfRemoved => {
                debug!("Watched directory {:?} was removed", base_path);
            }
            WatchKind::Removed => {
                self.remove_entry(&id, full_path);
            }
            WatchKind::Modified => {
                if self.remove_entry(&id, full_path) {
                    self.add_entry(id, base_path, full_path);
                }
            }
            WatchKind::Added => self.add_entry(id, base_path, full_path),
        }
    }

    /// Stop tracking the entry read from `full_path`. Returns false if there was none.
    fn remove_entry(&mut self, id: &str, full_path: &Path) -> bool {
        let Some((index, link)) = self
            .identifiers
            .get(id)
            .and_then(|bucket| bucket.find_path(full_path))
            .map(|(index, entry)| (index, Rc::clone(entry.link())))
        else {
            trace!("{} is not tracked", full_path.display());
            return false;
        };

        self.emit(LinkBaseUpdate::Removed, &link);
        self.categories.remove_link(&link);

        if let Some(mut bucket) = self.identifiers.detach(id) {
            let entry = bucket.remove(index);
            debug_assert!(Rc::ptr_eq(entry.link(), &link));
            self.identifiers.attach(id.to_string(), bucket);
        }
        true
    }

    fn add_entry(&mut self, id: String, base_path: &Path, full_path: &Path) {
        let Some(priority) = self.priorities.get(base_path) else {
            debug!("{:?} is not a watched directory", base_path);
            return;
        };

        let slot = self
            .identifiers
            .get(&id)
            .map_or(Slot::Free(0), |bucket| bucket.slot_for(priority));
        let Slot::Free(index) = slot else {
            trace!("{} already tracked at priority {}", id, priority);
            return;
        };

        let link = match Link::from_ddfile(full_path, &self.paths, &self.locale) {
            Ok(link) => link,
            Err(e) => {
                debug!("Skipping {}: {}", full_path.display(), e);
                return;
            }
        };
        if !link.display(self.environments) {
            debug!("Not displaying {}", full_path.display());
            return;
        }
        let link = Rc::new(link);

        self.emit(LinkBaseUpdate::Added, &link);

        let mut bucket = self.identifiers.detach(&id).unwrap_or_default();
        bucket.insert(index, LinkEntry::new(priority, Rc::clone(&link)));
        self.identifiers.attach(id, bucket);
        self.categories.insert_link(&link);
    }
}
