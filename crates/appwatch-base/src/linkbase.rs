//! The link base: construction, queries, the update sink and teardown.

use crate::category::CategoryIndex;
use crate::entry::{IdentifierBucket, LinkEntry};
use crate::error::LinkBaseError;
use crate::priority::PriorityTable;
use crate::registry::IdentifierRegistry;
use crate::watch::{NotifyWatch, WatchService};

use appwatch_link::{Environments, Link, Locale, XdgPaths};
use log::{debug, info, warn};

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Subdirectory of each data directory that holds desktop entries.
pub const APPLICATIONS_DIR: &str = "applications";

/// Change reported to the update sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkBaseUpdate {
    Added,
    Removed,
}

/// Update sink. Runs on the mutation's call stack and sees the link base as
/// of its own event: a removed link is still tracked, an added one not yet.
pub type UpdateFunc = Box<dyn FnMut(&LinkBase, LinkBaseUpdate, &Rc<Link>)>;

/// Reference-counted link base. Cloning acquires; dropping the last clone
/// releases every tracked link and tears down the watches.
pub type SharedLinkBase = Rc<RefCell<LinkBase>>;

/// Desktop entries from every `<data dir>/applications`, kept in sync with the
/// filesystem.
///
/// Directories earlier in the search path take precedence: for each desktop
/// file ID the entry from the strongest directory is the effective one.
pub struct LinkBase {
    pub(crate) environments: Environments,
    pub(crate) locale: Locale,
    pub(crate) paths: XdgPaths,
    pub(crate) priorities: PriorityTable,
    pub(crate) identifiers: IdentifierRegistry,
    pub(crate) categories: CategoryIndex,
    watch: Box<dyn WatchService>,
    update_func: Option<UpdateFunc>,
}

impl LinkBase {
    /// Build a link base watching the application directories of `paths`
    /// with a notify backend.
    pub fn new(
        paths: XdgPaths,
        locale: &str,
        environments: Environments,
    ) -> Result<Self, LinkBaseError> {
        let watch = NotifyWatch::new()?;
        Ok(Self::with_watch(paths, locale, environments, Box::new(watch)))
    }

    /// Build a link base on top of any [`WatchService`].
    ///
    /// Files already present are tracked before this returns. A directory
    /// that does not exist yet keeps its priority but is not watched, so
    /// entries appearing there are only seen by a new link base.
    pub fn with_watch(
        paths: XdgPaths,
        locale: &str,
        environments: Environments,
        watch: Box<dyn WatchService>,
    ) -> Self {
        let mut base = Self {
            environments,
            locale: Locale::parse(locale),
            paths,
            priorities: PriorityTable::default(),
            identifiers: IdentifierRegistry::default(),
            categories: CategoryIndex::default(),
            watch,
            update_func: None,
        };
        base.watch_directories();

        info!(
            "Link base ready: {} directories, {} identifiers",
            base.priorities.len(),
            base.identifiers.len()
        );
        base
    }

    fn watch_directories(&mut self) {
        let dirs: Vec<PathBuf> = self
            .paths
            .data_dirs()
            .iter()
            .map(|dir| dir.join(APPLICATIONS_DIR))
            .collect();

        for dir in dirs {
            // The priority must exist before the watch replays existing files.
            let Some(priority) = self.priorities.register(dir.clone()) else {
                debug!("Skipping duplicate search path {:?}", dir);
                continue;
            };

            match self.watch.add(&dir) {
                Ok(replay) => {
                    debug!(
                        "Directory {:?} has priority {}, {} files present",
                        dir,
                        priority,
                        replay.len()
                    );
                    for notification in &replay {
                        self.process(notification);
                    }
                }
                Err(LinkBaseError::MissingDirectory(_)) => {
                    debug!("Directory {:?} does not exist (priority {})", dir, priority);
                }
                Err(e) => warn!("Failed to watch {:?}: {}", dir, e),
            }
        }
    }

    /// Wrap in a [`SharedLinkBase`].
    pub fn into_shared(self) -> SharedLinkBase {
        Rc::new(RefCell::new(self))
    }

    /// Install the update sink, replacing any previous one.
    pub fn set_update_func<F>(&mut self, func: F)
    where
        F: FnMut(&LinkBase, LinkBaseUpdate, &Rc<Link>) + 'static,
    {
        self.update_func = Some(Box::new(func));
    }

    pub fn clear_update_func(&mut self) {
        self.update_func = None;
    }

    pub(crate) fn emit(&mut self, update: LinkBaseUpdate, link: &Rc<Link>) {
        if let Some(mut func) = self.update_func.take() {
            func(self, update, link);
            self.update_func = Some(func);
        }
    }

    /// Apply every notification the watch service has pending, waiting up to
    /// `timeout` for the first one. Returns how many were applied.
    pub fn dispatch(&mut self, timeout: Option<Duration>) -> usize {
        let notifications = self.watch.poll(timeout);
        for notification in &notifications {
            self.process(notification);
        }
        notifications.len()
    }

    /// The effective link for a desktop file ID.
    pub fn effective(&self, id: &str) -> Option<Rc<Link>> {
        self.identifiers
            .effective(id)
            .map(|entry| Rc::clone(entry.link()))
    }

    /// Every tracked entry for a desktop file ID, strongest first.
    pub fn entries(&self, id: &str) -> &[LinkEntry] {
        self.identifiers
            .get(id)
            .map(IdentifierBucket::entries)
            .unwrap_or(&[])
    }

    /// Application links declaring `category`, including overridden ones.
    pub fn category(&self, category: &str) -> Vec<Rc<Link>> {
        self.categories.get(category)
    }

    pub fn category_tags(&self) -> impl Iterator<Item = &str> {
        self.categories.tags()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.identifiers.identifiers()
    }

    /// Priority of a watched `applications` directory.
    pub fn priority_of(&self, dir: &Path) -> Option<u32> {
        self.priorities.get(dir)
    }

    /// Watched `applications` directories, strongest first.
    pub fn directories(&self) -> &[PathBuf] {
        self.priorities.directories()
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn environments(&self) -> Environments {
        self.environments
    }
}

impl Drop for LinkBase {
    fn drop(&mut self) {
        for dir in self.priorities.directories() {
            self.watch.remove(dir);
        }
        self.categories.clear();
        self.identifiers.clear();
        debug!("Link base released");
    }
}
