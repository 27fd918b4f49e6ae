//! appwatch-base: live registry of desktop entries.
//!
//! Watches `<data dir>/applications` for every XDG data directory and keeps
//! two indexes in sync with the filesystem:
//! - desktop file ID -> entries from each directory, strongest first
//! - category -> application entries declaring it
//!
//! Every change is reported to a single update sink as it is applied.
//! A link base is single-threaded: it is driven and queried from the thread
//! that owns it.

mod category;
mod entry;
mod error;
mod linkbase;
mod priority;
mod registry;
mod update;
mod watch;

#[cfg(test)]
mod test_support;

pub use category::CategoryIndex;
pub use entry::{IdentifierBucket, LinkEntry, Slot};
pub use error::LinkBaseError;
pub use linkbase::{APPLICATIONS_DIR, LinkBase, LinkBaseUpdate, SharedLinkBase, UpdateFunc};
pub use priority::PriorityTable;
pub use registry::IdentifierRegistry;
pub use watch::{NotifyWatch, WatchKind, WatchNotification, WatchService, scan_existing};

pub use appwatch_link::{Environments, Link, LinkType, Locale, XdgPaths};
