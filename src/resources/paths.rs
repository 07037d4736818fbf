//! Lexical path resolution.
//!
//! Nothing in this module touches the filesystem: `.` and `..` segments are
//! folded textually and symlinks are never resolved.  This is what lets the
//! engine compute the relative body of a link whose target does not exist
//! yet, and compare stored link bodies without following them.
use std::path::{Component, Path, PathBuf};

/// Lexically normalize `path`.
///
/// Drops `.` segments and folds each `..` onto the preceding normal
/// segment.  A `..` directly below the root is discarded (`/..` is `/`);
/// leading `..` segments of a relative path are kept.  An empty result is
/// returned as `.`.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use symlinker_cli::resources::paths::normalize;
///
/// assert_eq!(normalize(Path::new("/proj/./vendor/../shared")), PathBuf::from("/proj/shared"));
/// assert_eq!(normalize(Path::new("../a/./b/..")), PathBuf::from("../a"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(segment) => out.push(segment),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Return `path` as an absolute, normalized path.
///
/// Absolute inputs are only normalized; relative inputs are joined onto
/// `working_dir` first.
#[must_use]
pub fn to_absolute(path: &Path, working_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&working_dir.join(path))
    }
}

/// Compute the relative path that leads from `base_dir` to `path`.
///
/// Both inputs are normalized first.  Equal inputs yield `.`.  When no
/// relative form exists (e.g. paths on different Windows drives) the
/// normalized `path` is returned unchanged.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use symlinker_cli::resources::paths::to_relative;
///
/// assert_eq!(
///     to_relative(Path::new("/shared/lib"), Path::new("/proj/vendor")),
///     PathBuf::from("../../shared/lib"),
/// );
/// ```
#[must_use]
pub fn to_relative(path: &Path, base_dir: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base_dir);
    match pathdiff::diff_paths(&path, &base) {
        Some(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Some(rel) => rel,
        None => path,
    }
}

/// Directory that contains `path`, or `path` itself for a root.
#[must_use]
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| path.to_path_buf(), Path::to_path_buf)
}
