//! Category index: category tag -> application links declaring it.

use appwatch_link::{Link, LinkType};
use log::warn;

use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

/// Non-owning index of every tracked application link by category.
///
/// Links are held weakly; the owning [`LinkEntry`](crate::LinkEntry) must
/// uncategorize its link before releasing it. Overridden entries stay indexed
/// for as long as they are tracked.
#[derive(Debug, Default)]
pub struct CategoryIndex {
    buckets: HashMap<String, VecDeque<Weak<Link>>>,
}

impl CategoryIndex {
    pub(crate) fn add(&mut self, tag: &str, link: &Rc<Link>) {
        self.buckets
            .entry(tag.to_string())
            .or_default()
            .push_front(Rc::downgrade(link));
    }

    /// Returns false if `link` was not indexed under `tag`.
    pub(crate) fn remove(&mut self, tag: &str, link: &Rc<Link>) -> bool {
        let Some(bucket) = self.buckets.get_mut(tag) else {
            return false;
        };
        let Some(index) = bucket.iter().position(|l| l.as_ptr() == Rc::as_ptr(link)) else {
            return false;
        };

        bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(tag);
        }
        true
    }

    /// Index an application link under each of its categories.
    pub(crate) fn insert_link(&mut self, link: &Rc<Link>) {
        if link.link_type() != LinkType::Application {
            return;
        }
        for tag in link.categories() {
            self.add(tag, link);
        }
    }

    /// Drop an application link from each of its categories.
    pub(crate) fn remove_link(&mut self, link: &Rc<Link>) {
        if link.link_type() != LinkType::Application {
            return;
        }
        for tag in link.categories() {
            if !self.remove(tag, link) {
                warn!(
                    "{} was not indexed under category {}",
                    link.source_path().display(),
                    tag
                );
            }
        }
    }

    /// Links in `tag`, most recently added first.
    pub fn get(&self, tag: &str) -> Vec<Rc<Link>> {
        self.buckets
            .get(tag)
            .map(|bucket| bucket.iter().filter_map(Weak::upgrade).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, tag: &str, link: &Rc<Link>) -> bool {
        self.buckets
            .get(tag)
            .is_some_and(|bucket| bucket.iter().any(|l| l.as_ptr() == Rc::as_ptr(link)))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appwatch_link::{Locale, XdgPaths};
    use std::path::Path;

    fn link(content: &str) -> Rc<Link> {
        Rc::new(
            Link::parse(
                content,
                Path::new("/d/app.desktop"),
                &XdgPaths::default(),
                &Locale::default(),
            )
            .unwrap(),
        )
    }

    fn app(categories: &str) -> Rc<Link> {
        link(&format!(
            "[Desktop Entry]\nType=Application\nName=App\nExec=app\nCategories={categories}\n"
        ))
    }

    #[test]
    fn test_add_prepends_and_remove_drops_empty() {
        let mut index = CategoryIndex::default();
        let first = app("Utility;");
        let second = app("Utility;");

        index.add("Utility", &first);
        index.add("Utility", &second);
        let links = index.get("Utility");
        assert!(Rc::ptr_eq(&links[0], &second));
        assert!(Rc::ptr_eq(&links[1], &first));

        assert!(index.remove("Utility", &first));
        assert!(!index.remove("Utility", &first));
        assert!(index.remove("Utility", &second));
        assert!(index.get("Utility").is_empty());
        assert_eq!(index.tags().count(), 0);
    }

    #[test]
    fn test_insert_and_remove_link() {
        let mut index = CategoryIndex::default();
        let editor = app("Development;Utility;");

        index.insert_link(&editor);
        assert!(index.contains("Development", &editor));
        assert!(index.contains("Utility", &editor));

        index.remove_link(&editor);
        assert!(!index.contains("Development", &editor));
        assert_eq!(index.tags().count(), 0);
    }

    #[test]
    fn test_non_applications_not_indexed() {
        let mut index = CategoryIndex::default();
        let url = link("[Desktop Entry]\nType=Link\nName=Docs\nURL=https://example.org\n");

        index.insert_link(&url);
        assert_eq!(index.tags().count(), 0);
    }
}
