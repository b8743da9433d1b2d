//! Path utilities: the data directory for log files and `~` expansion for
//! user-supplied paths.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
const APP_DIR: &str = "bulkbar";

/// Returns the directory bulkbar writes its log file to.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/bulkbar`
/// 2. `$HOME/.local/share/bulkbar`
/// 3. `<temp dir>/bulkbar`
#[must_use]
pub fn data_dir() -> PathBuf {
    data_dir_from(env::var_os("XDG_DATA_HOME"), env::var_os("HOME"))
}

fn data_dir_from(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(xdg) = non_empty(xdg_data_home) {
        return xdg.join(APP_DIR);
    }
    if let Some(home) = non_empty(home) {
        return home.join(".local").join("share").join(APP_DIR);
    }
    env::temp_dir().join(APP_DIR)
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~`, or with no known home directory, are returned
/// unchanged.
///
/// ```
/// use bulkbar::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/etc/bulkbar.toml"), PathBuf::from("/etc/bulkbar.toml"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, env::var_os("HOME").as_deref().map(Path::new))
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (_, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_data_home_wins() {
        let dir = data_dir_from(Some("/xdg".into()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/xdg/bulkbar"));
    }

    #[test]
    fn home_is_the_fallback() {
        let dir = data_dir_from(Some("".into()), Some("/home/ada".into()));
        assert_eq!(dir, PathBuf::from("/home/ada/.local/share/bulkbar"));
    }

    #[test]
    fn temp_dir_is_the_last_resort() {
        assert_eq!(data_dir_from(None, None), env::temp_dir().join("bulkbar"));
    }

    #[test]
    fn tilde_expansion() {
        let home = Path::new("/home/ada");

        assert_eq!(expand_tilde_with("~", Some(home)), PathBuf::from("/home/ada"));
        assert_eq!(expand_tilde_with("~/themes/a.toml", Some(home)), PathBuf::from("/home/ada/themes/a.toml"));
        assert_eq!(expand_tilde_with("~other/x", Some(home)), PathBuf::from("~other/x"));
        assert_eq!(expand_tilde_with("~/x", None), PathBuf::from("~/x"));
    }
}
