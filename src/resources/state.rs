//! Read-only inspection of target and source paths.
use std::io;
use std::path::{Path, PathBuf};

use super::LinkClassification;
use super::paths;

/// Classify what currently occupies `target` relative to `source`.
///
/// `target` is inspected without following it: a dangling symlink is
/// occupied, not absent.  For a symlink the stored body is resolved against
/// the link's own directory and compared textually (after lexical
/// normalization) with the absolute `source`, so two different spellings
/// of the same inode are reported as [`LinkClassification::LinkedToOther`].
///
/// # Errors
///
/// Returns an error if the target's metadata or link body cannot be read
/// for any reason other than the path not existing (e.g. a parent
/// directory without search permission).
pub fn classify(target: &Path, source: &Path) -> io::Result<LinkClassification> {
    let meta = match std::fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LinkClassification::Absent),
        Err(e) => return Err(e),
    };

    if !meta.file_type().is_symlink() {
        return Ok(LinkClassification::OccupiedNonLink);
    }

    let body = std::fs::read_link(target)?;
    if link_destination(target, &body) == paths::normalize(source) {
        Ok(LinkClassification::LinkedToSource)
    } else {
        Ok(LinkClassification::LinkedToOther)
    }
}

/// Returns `true` if `source` exists.  Symlinks are followed, so a dangling
/// source counts as missing.
#[must_use]
pub fn source_exists(source: &Path) -> bool {
    source.exists()
}

/// Absolute, normalized location that the link body `body` stored at `link`
/// refers to.
#[must_use]
pub fn link_destination(link: &Path, body: &Path) -> PathBuf {
    let body = strip_verbatim_prefix(body);
    paths::to_absolute(&body, &paths::parent_dir(link))
}

/// Drop the `\\?\` prefix that Windows `read_link` prepends to
/// extended-length paths.
fn strip_verbatim_prefix(p: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let s = p.to_string_lossy();
        if let Some(rest) = s.strip_prefix(r"\\?\") {
            return PathBuf::from(rest);
        }
    }
    p.to_path_buf()
}
