//! Desktop environment flags used by `OnlyShowIn` / `NotShowIn`.

use bitflags::bitflags;

bitflags! {
    /// Set of desktop environments, either active ones or ones named by an entry.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Environments: u32 {
        const OPENBOX  = 1 << 0;
        const GNOME    = 1 << 1;
        const KDE      = 1 << 2;
        const LXDE     = 1 << 3;
        const LXQT     = 1 << 4;
        const MATE     = 1 << 5;
        const CINNAMON = 1 << 6;
        const UNITY    = 1 << 7;
        const XFCE     = 1 << 8;
        const ROX      = 1 << 9;
        /// Legacy environments (`Old` in the registered names list).
        const OLD      = 1 << 10;
    }
}

impl Environments {
    /// Map one registered desktop name to its flag (case-insensitive).
    pub fn from_desktop_name(name: &str) -> Option<Self> {
        let flag = match name.trim().to_ascii_lowercase().as_str() {
            "openbox" => Self::OPENBOX,
            "gnome" => Self::GNOME,
            "kde" => Self::KDE,
            "lxde" => Self::LXDE,
            "lxqt" => Self::LXQT,
            "mate" => Self::MATE,
            "cinnamon" | "x-cinnamon" => Self::CINNAMON,
            "unity" => Self::UNITY,
            "xfce" => Self::XFCE,
            "rox" => Self::ROX,
            "old" => Self::OLD,
            _ => return None,
        };
        Some(flag)
    }

    /// Union of the flags for every known name; unknown names are skipped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| Self::from_desktop_name(name.as_ref()))
            .fold(Self::empty(), |acc, flag| acc | flag)
    }

    /// Active environments from `XDG_CURRENT_DESKTOP` (colon-separated).
    pub fn from_env() -> Self {
        std::env::var("XDG_CURRENT_DESKTOP")
            .map(|desktops| Self::from_names(desktops.split(':')))
            .unwrap_or_default()
    }
}
