//! Path helpers for XDG data directories and executable lookup.

use log::debug;

use std::fs;
use std::path::{Path, PathBuf};

/// Search paths used to discover and validate desktop entries.
///
/// `data_dirs` is ordered by precedence: the first directory overrides the
/// ones after it.
#[derive(Clone, Debug, Default)]
pub struct XdgPaths {
    data_dirs: Vec<PathBuf>,
    exec_dirs: Vec<PathBuf>,
}

impl XdgPaths {
    pub fn new(data_dirs: Vec<PathBuf>, exec_dirs: Vec<PathBuf>) -> Self {
        Self {
            data_dirs,
            exec_dirs,
        }
    }

    /// Resolve the data directories (XDG + Flatpak + Snap) and `$PATH`.
    pub fn from_env() -> Self {
        let home = dirs::home_dir().unwrap_or_default();
        let mut data_dirs = Vec::new();

        match std::env::var("XDG_DATA_HOME") {
            Ok(dir) if !dir.is_empty() => data_dirs.push(PathBuf::from(dir)),
            _ => data_dirs.push(home.join(".local/share")),
        }

        let xdg_data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|dirs| !dirs.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        for data_dir in xdg_data_dirs.split(':') {
            if !data_dir.is_empty() {
                data_dirs.push(PathBuf::from(data_dir));
            }
        }

        // App formats (flatpak, snap)
        data_dirs.push(home.join(".local/share/flatpak/exports/share"));
        data_dirs.push(PathBuf::from("/var/lib/flatpak/exports/share"));
        data_dirs.push(PathBuf::from("/var/lib/snapd/desktop"));

        let exec_dirs = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();

        debug!("XDG data directories: {:?}", data_dirs);
        Self::new(data_dirs, exec_dirs)
    }

    pub fn data_dirs(&self) -> &[PathBuf] {
        &self.data_dirs
    }

    pub fn exec_dirs(&self) -> &[PathBuf] {
        &self.exec_dirs
    }

    /// Whether `program` names an executable file, either directly when it
    /// contains a slash or through the exec directories.
    pub fn try_exec(&self, program: &str) -> bool {
        let program = program.trim();
        if program.is_empty() {
            return false;
        }
        if program.contains('/') {
            return is_executable(Path::new(program));
        }
        self.exec_dirs
            .iter()
            .any(|dir| is_executable(&dir.join(program)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_from_env_orders_data_home_first() {
        let _guard = ENV_LOCK.lock().unwrap();

        unsafe {
            env::set_var("XDG_DATA_HOME", "/tmp/appwatch-home");
            env::set_var("XDG_DATA_DIRS", "/opt/share::/usr/share");
        }
        let paths = XdgPaths::from_env();
        unsafe {
            env::remove_var("XDG_DATA_HOME");
            env::remove_var("XDG_DATA_DIRS");
        }

        let dirs = paths.data_dirs();
        assert_eq!(dirs[0], PathBuf::from("/tmp/appwatch-home"));
        assert_eq!(dirs[1], PathBuf::from("/opt/share"));
        assert_eq!(dirs[2], PathBuf::from("/usr/share"));
        assert!(dirs.contains(&PathBuf::from("/var/lib/flatpak/exports/share")));
    }

    #[cfg(unix)]
    #[test]
    fn test_try_exec() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        let plain = dir.path().join("plain");
        fs::write(&plain, "data").unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

        let paths = XdgPaths::new(Vec::new(), vec![dir.path().to_path_buf()]);
        assert!(paths.try_exec("tool"));
        assert!(paths.try_exec(tool.to_str().unwrap()));
        assert!(!paths.try_exec("plain"));
        assert!(!paths.try_exec("missing"));
        assert!(!paths.try_exec(""));
    }
}
