//! On-disk fixtures and a scripted watch service for tests.

use crate::error::LinkBaseError;
use crate::linkbase::{APPLICATIONS_DIR, LinkBase, LinkBaseUpdate};
use crate::watch::{WatchKind, WatchNotification, WatchService, scan_existing};

use appwatch_link::{Environments, XdgPaths};
use tempfile::TempDir;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

type Queue = Rc<RefCell<VecDeque<WatchNotification>>>;

/// Replays real files on `add`, then hands out whatever the test queued.
pub(crate) struct QueueWatch {
    queue: Queue,
}

impl WatchService for QueueWatch {
    fn add(&mut self, base: &Path) -> Result<Vec<WatchNotification>, LinkBaseError> {
        scan_existing(base)
    }

    fn remove(&mut self, _base: &Path) {}

    fn poll(&mut self, _timeout: Option<Duration>) -> Vec<WatchNotification> {
        self.queue.borrow_mut().drain(..).collect()
    }
}

/// `count` data directories `d0..`, each with an empty `applications` dir.
pub(crate) struct Fixture {
    pub root: TempDir,
    count: usize,
    queue: Queue,
}

impl Fixture {
    pub fn new(count: usize) -> Self {
        let root = tempfile::tempdir().unwrap();
        for i in 0..count {
            fs::create_dir_all(root.path().join(format!("d{i}")).join(APPLICATIONS_DIR)).unwrap();
        }
        Self {
            root,
            count,
            queue: Rc::default(),
        }
    }

    pub fn app(name: &str, categories: &str) -> String {
        format!(
            "[Desktop Entry]\nType=Application\nName={name}\nExec={name}\nCategories={categories}\n"
        )
    }

    pub fn data_dir(&self, i: usize) -> PathBuf {
        self.root.path().join(format!("d{i}"))
    }

    pub fn app_dir(&self, i: usize) -> PathBuf {
        self.data_dir(i).join(APPLICATIONS_DIR)
    }

    pub fn paths(&self) -> XdgPaths {
        XdgPaths::new((0..self.count).map(|i| self.data_dir(i)).collect(), Vec::new())
    }

    pub fn watch(&self) -> Box<dyn WatchService> {
        Box::new(QueueWatch {
            queue: Rc::clone(&self.queue),
        })
    }

    pub fn link_base(&self) -> LinkBase {
        self.link_base_with(self.paths())
    }

    pub fn link_base_with(&self, paths: XdgPaths) -> LinkBase {
        LinkBase::with_watch(paths, "C", Environments::GNOME, self.watch())
    }

    /// Write `sub` under directory `i` and return the matching Added notification.
    pub fn write(&self, i: usize, sub: &str, content: &str) -> WatchNotification {
        let path = self.app_dir(i).join(sub);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self.notification(i, sub, WatchKind::Added)
    }

    pub fn notification(&self, i: usize, sub: &str, kind: WatchKind) -> WatchNotification {
        WatchNotification::new(&self.app_dir(i), Path::new(sub), kind)
    }

    pub fn queue(&self, notification: WatchNotification) {
        self.queue.borrow_mut().push_back(notification);
    }
}

/// Updates seen by the sink, as (kind, source path).
pub(crate) type Recorded = Rc<RefCell<Vec<(LinkBaseUpdate, PathBuf)>>>;

pub(crate) fn record(base: &mut LinkBase) -> Recorded {
    let recorded = Recorded::default();
    let sink = Rc::clone(&recorded);
    base.set_update_func(move |_, update, link| {
        sink.borrow_mut()
            .push((update, link.source_path().to_path_buf()));
    });
    recorded
}
