//! Filesystem watching for application directories.
//!
//! The notify backend thread only forwards raw events over a crossbeam
//! channel. They are converted into [`WatchNotification`]s on the thread that
//! polls, which is the thread that owns the link base.

use crate::error::LinkBaseError;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use log::{debug, error, info, warn};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use walkdir::WalkDir;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to a path below a watched directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchKind {
    Added,
    Modified,
    Removed,
    /// The watched directory itself went away.
    SelfRemoved,
}

/// One change below a watched base directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchNotification {
    pub base_path: PathBuf,
    /// Path relative to `base_path`; empty for [`WatchKind::SelfRemoved`].
    pub sub_path: PathBuf,
    pub full_path: PathBuf,
    pub kind: WatchKind,
}

impl WatchNotification {
    pub fn new(base_path: &Path, sub_path: &Path, kind: WatchKind) -> Self {
        let full_path = if sub_path.as_os_str().is_empty() {
            base_path.to_path_buf()
        } else {
            base_path.join(sub_path)
        };
        Self {
            base_path: base_path.to_path_buf(),
            sub_path: sub_path.to_path_buf(),
            full_path,
            kind,
        }
    }
}

/// A source of filesystem notifications for a set of base directories.
pub trait WatchService {
    /// Start watching `base` recursively.
    ///
    /// Files already present are returned as [`WatchKind::Added`]
    /// notifications in path order. The caller replays them before polling
    /// for anything else.
    fn add(&mut self, base: &Path) -> Result<Vec<WatchNotification>, LinkBaseError>;

    /// Stop watching `base`. Unknown directories are ignored.
    fn remove(&mut self, base: &Path);

    /// Collect pending notifications. With a timeout, wait up to that long
    /// for the first one.
    fn poll(&mut self, timeout: Option<Duration>) -> Vec<WatchNotification>;
}

/// Every file below `base`, as Added notifications sorted by path.
pub fn scan_existing(base: &Path) -> Result<Vec<WatchNotification>, LinkBaseError> {
    if !base.is_dir() {
        return Err(LinkBaseError::MissingDirectory(base.to_path_buf()));
    }
    Ok(scan_tree(base, base))
}

fn scan_tree(base: &Path, dir: &Path) -> Vec<WatchNotification> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let sub_path = entry.path().strip_prefix(base).ok()?;
            Some(WatchNotification::new(base, sub_path, WatchKind::Added))
        })
        .collect()
}

/// [`WatchService`] backed by the platform's recommended notify watcher.
///
/// Remembers every file it has reported below its roots, so that a directory
/// moved or deleted as a whole is reported as one removal per file.
pub struct NotifyWatch {
    watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    roots: Vec<PathBuf>,
    files: BTreeSet<PathBuf>,
}

impl NotifyWatch {
    pub fn new() -> Result<Self, LinkBaseError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = tx.send(event);
        })?;

        Ok(Self {
            watcher,
            rx,
            roots: Vec::new(),
            files: BTreeSet::new(),
        })
    }

    /// The innermost watched root containing `path`.
    fn root_of(&self, path: &Path) -> Option<PathBuf> {
        self.roots
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
            .cloned()
    }

    fn push(&mut self, path: &Path, kind: WatchKind, out: &mut Vec<WatchNotification>) {
        let Some(root) = self.root_of(path) else {
            return;
        };
        if path == root {
            if kind == WatchKind::Removed {
                self.files.retain(|file| !file.starts_with(&root));
                out.push(WatchNotification::new(&root, Path::new(""), WatchKind::SelfRemoved));
            }
            return;
        }
        match kind {
            WatchKind::Added => {
                self.files.insert(path.to_path_buf());
            }
            WatchKind::Removed => {
                self.files.remove(path);
            }
            WatchKind::Modified | WatchKind::SelfRemoved => {}
        }
        if let Ok(sub_path) = path.strip_prefix(&root) {
            out.push(WatchNotification::new(&root, sub_path, kind));
        }
    }

    /// A new file, or every file below a new directory.
    fn push_added(&mut self, path: &Path, out: &mut Vec<WatchNotification>) {
        if !path.is_dir() {
            self.push(path, WatchKind::Added, out);
            return;
        }
        let Some(root) = self.root_of(path) else {
            return;
        };
        for notification in scan_tree(&root, path) {
            self.files.insert(notification.full_path.clone());
            out.push(notification);
        }
    }

    /// A path renamed into place. A file may replace one that is tracked, so
    /// the old one is removed first.
    fn push_renamed_to(&mut self, path: &Path, out: &mut Vec<WatchNotification>) {
        if path.is_dir() {
            self.push_added(path, out);
            return;
        }
        self.push(path, WatchKind::Removed, out);
        self.push(path, WatchKind::Added, out);
    }

    /// A file that went away, or every known file below a directory that did.
    /// A removed root is reported file by file before its SelfRemoved.
    fn push_removed(&mut self, path: &Path, out: &mut Vec<WatchNotification>) {
        let below: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|file| file.starts_with(path) && file.as_path() != path)
            .cloned()
            .collect();
        let is_root = self.roots.iter().any(|root| root == path);
        let report_path = below.is_empty() || is_root;

        for file in below {
            self.push(&file, WatchKind::Removed, out);
        }
        if report_path {
            self.push(path, WatchKind::Removed, out);
        }
    }

    fn convert(&mut self, event: Event, out: &mut Vec<WatchNotification>) {
        match event.kind {
            EventKind::Create(_) => {
                for path in &event.paths {
                    self.push_added(path, out);
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                if let [from, to] = event.paths.as_slice() {
                    self.push_removed(from, out);
                    self.push_renamed_to(to, out);
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                for path in &event.paths {
                    self.push_removed(path, out);
                }
            }
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
                for path in &event.paths {
                    self.push_renamed_to(path, out);
                }
            }
            EventKind::Modify(ModifyKind::Name(_)) => {
                for path in &event.paths {
                    if path.exists() {
                        self.push_renamed_to(path, out);
                    } else {
                        self.push_removed(path, out);
                    }
                }
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => {}
            EventKind::Modify(_) => {
                for path in &event.paths {
                    self.push(path, WatchKind::Modified, out);
                }
            }
            EventKind::Remove(_) => {
                for path in &event.paths {
                    self.push_removed(path, out);
                }
            }
            EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
        }
    }
}

impl WatchService for NotifyWatch {
    fn add(&mut self, base: &Path) -> Result<Vec<WatchNotification>, LinkBaseError> {
        if self.roots.iter().any(|root| root == base) {
            return Ok(Vec::new());
        }
        if !base.is_dir() {
            return Err(LinkBaseError::MissingDirectory(base.to_path_buf()));
        }

        // Watch first so nothing created during the scan is missed.
        self.watcher.watch(base, RecursiveMode::Recursive)?;
        self.roots.push(base.to_path_buf());
        info!("Watching directory: {:?}", base);

        let existing = scan_existing(base)?;
        self.files
            .extend(existing.iter().map(|notification| notification.full_path.clone()));
        Ok(existing)
    }

    fn remove(&mut self, base: &Path) {
        let Some(index) = self.roots.iter().position(|root| root == base) else {
            return;
        };
        self.roots.remove(index);
        self.files.retain(|file| !file.starts_with(base));
        if let Err(e) = self.watcher.unwatch(base) {
            debug!("Failed to unwatch {:?}: {}", base, e);
        }
    }

    fn poll(&mut self, timeout: Option<Duration>) -> Vec<WatchNotification> {
        let mut events = Vec::new();

        if let Some(timeout) = timeout {
            match self.rx.recv_timeout(timeout) {
                Ok(event) => events.push(event),
                Err(RecvTimeoutError::Timeout) => return Vec::new(),
                Err(RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    return Vec::new();
                }
            }
        }
        events.extend(self.rx.try_iter());

        let mut notifications = Vec::new();
        for event in events {
            match event {
                Ok(event) => self.convert(event, &mut notifications),
                Err(e) => warn!("File watcher error: {}", e),
            }
        }
        notifications
    }
}
