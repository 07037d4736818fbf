//! Where per-command log files live.
use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "symlinker";

/// Base cache directory: `$XDG_CACHE_HOME` when it holds an absolute path,
/// otherwise `.cache` under the home directory.
fn cache_home(xdg: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(dir) = xdg.map(PathBuf::from)
        && dir.is_absolute()
    {
        return Some(dir);
    }
    home.filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(".cache"))
}

/// Path of the log file for `command`, creating its directory on the way.
///
/// `None` when no cache directory can be determined or created, in which
/// case nothing is written to disk.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"));
    let dir = cache_home(std::env::var_os("XDG_CACHE_HOME"), home)?.join(APP_DIR);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}
