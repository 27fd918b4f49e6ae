//! appwatch-link: desktop entry records for Linux desktops.
//!
//! Provides:
//! - Desktop entry parsing with locale-aware key lookup
//! - Visibility rules for the active desktop environments
//! - Desktop file IDs derived from paths
//! - XDG data and exec directory resolution

mod desktop_entry;
mod environment;
mod error;
mod locale;
mod paths;

pub use desktop_entry::{
    AppData, DESKTOP_SUFFIX, Link, LinkData, LinkType, id_from_ddfile, is_desktop_file,
};
pub use environment::Environments;
pub use error::LinkError;
pub use locale::{Locale, env_locale};
pub use paths::XdgPaths;
