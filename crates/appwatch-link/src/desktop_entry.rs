//! Desktop entry parsing.

use crate::environment::Environments;
use crate::error::LinkError;
use crate::locale::Locale;
use crate::paths::XdgPaths;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File suffix of desktop entry files.
pub const DESKTOP_SUFFIX: &str = ".desktop";

const DESKTOP_GROUP: &str = "[Desktop Entry]";

/// Whether a path names a desktop entry file.
pub fn is_desktop_file(path: &Path) -> bool {
    path.to_str().is_some_and(|p| p.ends_with(DESKTOP_SUFFIX))
}

/// Desktop file ID for a path relative to an `applications` directory.
/// "kde4/konsole.desktop" -> "kde4-konsole"
pub fn id_from_ddfile(sub_path: &Path) -> String {
    let path = sub_path.to_string_lossy();
    path.strip_suffix(DESKTOP_SUFFIX)
        .unwrap_or(&path)
        .replace('/', "-")
}

/// Kind of entry, from the `Type` key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkType {
    Application,
    Url,
    Directory,
}

/// Keys only meaningful for `Type=Application`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppData {
    pub exec: String,
    pub working_dir: Option<PathBuf>,
    pub terminal: bool,
    pub startup_notify: bool,
    pub startup_wm_class: Option<String>,
    pub categories: Vec<String>,
    pub mime_types: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LinkData {
    Application(AppData),
    Url(String),
    Directory,
}

/// A parsed desktop entry.
#[derive(Clone, Debug)]
pub struct Link {
    pub name: String,
    pub generic_name: Option<String>,
    pub comment: Option<String>,
    pub icon_name: Option<String>,
    pub data: LinkData,
    hidden: bool,
    no_display: bool,
    try_exec_found: bool,
    /// `None` when the entry does not restrict itself with `OnlyShowIn`.
    only_show_in: Option<Environments>,
    not_show_in: Environments,
    source_path: PathBuf,
}

impl Link {
    /// Read and parse a desktop entry file.
    ///
    /// Localized keys are resolved for `locale`, and `TryExec` is checked
    /// against the exec directories of `paths`.
    pub fn from_ddfile(path: &Path, paths: &XdgPaths, locale: &Locale) -> Result<Self, LinkError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path, paths, locale)
    }

    /// Parse desktop entry text that was read from `source_path`.
    pub fn parse(
        content: &str,
        source_path: &Path,
        paths: &XdgPaths,
        locale: &Locale,
    ) -> Result<Self, LinkError> {
        let entries = read_desktop_group(content).ok_or(LinkError::MissingGroup)?;
        let group = Group {
            entries: &entries,
            locale,
        };

        let data = match group.raw("Type") {
            Some("Application") => LinkData::Application(AppData {
                exec: group.string("Exec").ok_or(LinkError::MissingKey("Exec"))?,
                working_dir: group.string("Path").map(PathBuf::from),
                terminal: group.boolean("Terminal"),
                startup_notify: group.boolean("StartupNotify"),
                startup_wm_class: group.string("StartupWMClass"),
                categories: group.list("Categories"),
                mime_types: group.list("MimeType"),
                keywords: group.localized_list("Keywords"),
            }),
            Some("Link") => LinkData::Url(group.string("URL").ok_or(LinkError::MissingKey("URL"))?),
            Some("Directory") => LinkData::Directory,
            Some(other) => return Err(LinkError::UnknownType(other.to_string())),
            None => return Err(LinkError::MissingKey("Type")),
        };

        let name = group
            .localized("Name")
            .ok_or(LinkError::MissingKey("Name"))?;

        let only_show_in = group
            .raw("OnlyShowIn")
            .map(split_list)
            .filter(|names| !names.is_empty())
            .map(Environments::from_names);

        Ok(Self {
            name,
            generic_name: group.localized("GenericName"),
            comment: group.localized("Comment"),
            icon_name: group.localized("Icon"),
            data,
            hidden: group.boolean("Hidden"),
            no_display: group.boolean("NoDisplay"),
            try_exec_found: group
                .string("TryExec")
                .is_none_or(|program| paths.try_exec(&program)),
            only_show_in,
            not_show_in: Environments::from_names(group.list("NotShowIn")),
            source_path: source_path.to_path_buf(),
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn link_type(&self) -> LinkType {
        match self.data {
            LinkData::Application(_) => LinkType::Application,
            LinkData::Url(_) => LinkType::Url,
            LinkData::Directory => LinkType::Directory,
        }
    }

    pub fn app(&self) -> Option<&AppData> {
        match &self.data {
            LinkData::Application(app) => Some(app),
            _ => None,
        }
    }

    /// Declared categories; always empty for non-application entries.
    pub fn categories(&self) -> &[String] {
        self.app().map(|app| app.categories.as_slice()).unwrap_or(&[])
    }

    /// Whether the entry should be shown when `environments` are active.
    pub fn display(&self, environments: Environments) -> bool {
        if self.hidden || self.no_display || !self.try_exec_found {
            return false;
        }
        match self.only_show_in {
            Some(required) => required.intersects(environments),
            None => !self.not_show_in.intersects(environments),
        }
    }
}

/// Key/value pairs of the `[Desktop Entry]` group, or `None` without one.
fn read_desktop_group(content: &str) -> Option<HashMap<&str, &str>> {
    let mut entries = HashMap::new();
    let mut found = false;
    let mut in_group = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            in_group = line == DESKTOP_GROUP;
            found |= in_group;
            continue;
        }

        if in_group {
            if let Some((key, value)) = line.split_once('=') {
                entries.entry(key.trim()).or_insert(value.trim());
            }
        }
    }

    found.then_some(entries)
}

struct Group<'a> {
    entries: &'a HashMap<&'a str, &'a str>,
    locale: &'a Locale,
}

impl<'a> Group<'a> {
    fn raw(&self, key: &str) -> Option<&'a str> {
        self.entries.get(key).copied()
    }

    fn raw_localized(&self, key: &str) -> Option<&'a str> {
        self.locale
            .localized_keys(key)
            .iter()
            .find_map(|localized| self.raw(localized))
            .or_else(|| self.raw(key))
    }

    fn string(&self, key: &str) -> Option<String> {
        self.raw(key).map(unescape).filter(|s| !s.is_empty())
    }

    fn localized(&self, key: &str) -> Option<String> {
        self.raw_localized(key)
            .map(unescape)
            .filter(|s| !s.is_empty())
    }

    fn boolean(&self, key: &str) -> bool {
        matches!(self.raw(key), Some("true") | Some("1"))
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.raw(key).map(split_list).unwrap_or_default()
    }

    fn localized_list(&self, key: &str) -> Vec<String> {
        self.raw_localized(key).map(split_list).unwrap_or_default()
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a `;`-separated list, honouring `\;`. Empty and repeated items are dropped.
fn split_list(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(';') => current.push(';'),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            ';' => push_item(&mut items, &mut current),
            _ => current.push(c),
        }
    }
    push_item(&mut items, &mut current);

    items
}

fn push_item(items: &mut Vec<String>, current: &mut String) {
    let item = unescape(current.trim());
    current.clear();
    if !item.is_empty() && !items.contains(&item) {
        items.push(item);
    }
}
