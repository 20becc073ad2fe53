//! Filesystem helpers shared by the settings code

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::constants::config::{APP_DIR, CONFIG_DIR_ENV, EXECUTABLE_SUBDIR};
use crate::serializer::{Error, Result};

/// Create `path` (and its parents) unless it already is a directory.
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        // Current directory
        return Ok(());
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::invalid(format!(
            "{} exists but is not a directory",
            path.display()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "creating directory");
            fs::create_dir_all(path).map_err(|e| Error::io("creating directory", path, e))
        }
        Err(e) => Err(Error::io("inspecting", path, e)),
    }
}

/// Create an empty file at `path` unless one exists. Never truncates.
pub fn ensure_file_exists(path: &Path) -> Result<()> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            debug!(path = %path.display(), "created empty file");
            Ok(())
        }
        // Already there, or created concurrently
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::io("creating file", path, e)),
    }
}

/// Directory containing the running executable
pub fn executable_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .inspect_err(|e| warn!(error = %e, "cannot resolve executable path"))
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

/// Where settings files live when no directory is given explicitly.
///
/// Priority: `$VN_DASHBOARD_CONFIG_DIR` > `<executable dir>/config` >
/// platform config dir > `./config`
pub fn default_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = executable_dir() {
        return dir.join(EXECUTABLE_SUBDIR);
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(EXECUTABLE_SUBDIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directory_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        // Second call is a no-op
        ensure_directory_exists(&nested).unwrap();
    }

    #[test]
    fn test_ensure_directory_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain");
        fs::write(&file, "x").unwrap();
        assert!(matches!(ensure_directory_exists(&file), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_ensure_file_never_truncates() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("settings.yml");

        ensure_file_exists(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "");

        fs::write(&file, "cfg:\n  a: 1\n").unwrap();
        ensure_file_exists(&file).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "cfg:\n  a: 1\n");
    }

    #[test]
    fn test_ensure_file_missing_parent() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("missing").join("settings.yml");
        assert!(matches!(ensure_file_exists(&file), Err(Error::Io { .. })));
    }
}
