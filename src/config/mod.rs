//! Mapping document loading.
//!
//! A mapping document declares, in order, which target paths should be
//! symlinks to which sources.  YAML is the default format; a `.toml`
//! extension selects TOML.  Relative paths in the document are resolved
//! against the directory the document lives in.
pub mod toml_loader;
pub mod yaml_loader;

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// File name looked up when no mapping file is given.
pub const DEFAULT_MAPPING_FILE: &str = "symlinker.yml";

/// Serialization format of a mapping document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    /// `target: source` pairs in a top-level YAML mapping.
    Yaml,
    /// `"target" = "source"` pairs in a top-level TOML table.
    Toml,
}

impl MappingFormat {
    /// Pick the format from the file extension; anything but `.toml` is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// One declared link, exactly as written in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Where the link should exist.
    pub target: String,
    /// What the link should point to.
    pub source: String,
}

impl MappingEntry {
    pub(crate) fn new(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
        }
    }
}

/// A loaded mapping document.
#[derive(Debug)]
pub struct Mapping {
    /// Path the document was read from, as given.
    pub path: PathBuf,
    /// Canonical directory containing the document.
    pub working_dir: PathBuf,
    /// Entries in declaration order.
    pub entries: Vec<MappingEntry>,
}

impl Mapping {
    /// Read and parse the mapping document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MappingNotFound`] if the file does not exist,
    /// [`ConfigError::Io`] if it or its directory cannot be read, and the
    /// parser's errors for malformed content.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::MappingNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let working_dir = dunce::canonicalize(dir).map_err(|source| ConfigError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let entries = Self::parse(&content, MappingFormat::from_path(path), path)?;

        Ok(Self {
            path: path.to_path_buf(),
            working_dir,
            entries,
        })
    }

    /// Parse document `content` in the given format.
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSyntax`], [`ConfigError::InvalidEntry`]
    /// or [`ConfigError::SourceNotGiven`] for malformed content.
    pub fn parse(
        content: &str,
        format: MappingFormat,
        path: &Path,
    ) -> Result<Vec<MappingEntry>, ConfigError> {
        let file = path.display().to_string();
        match format {
            MappingFormat::Yaml => yaml_loader::parse(content, &file),
            MappingFormat::Toml => toml_loader::parse(content, &file),
        }
    }

    /// Entries as `(target, source)` pairs, in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.target.as_str(), e.source.as_str()))
    }
}
