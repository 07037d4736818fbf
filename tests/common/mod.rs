// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed project and a fluent builder so each
// integration test can lay out sources, pre-existing targets and a mapping
// document without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use symlinker_cli::config::{DEFAULT_MAPPING_FILE, Mapping};
use symlinker_cli::reconcile::{self, EntryReport, Policy};
use symlinker_cli::resources::symlink::SourceBase;

/// An isolated project directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct IntegrationTestContext {
    /// Temporary directory containing the project.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty project directory.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the project root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `rel` inside the project.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Path of the default mapping document.
    pub fn mapping_path(&self) -> PathBuf {
        self.path(DEFAULT_MAPPING_FILE)
    }

    /// Load the default mapping document.
    pub fn load_mapping(&self) -> Mapping {
        Mapping::load(&self.mapping_path()).expect("load mapping")
    }

    /// Load the mapping document and reconcile it under `policy`.
    pub fn reconcile(&self, policy: &Policy) -> Vec<EntryReport> {
        let mapping = self.load_mapping();
        reconcile::reconcile_all(
            mapping.pairs(),
            &mapping.working_dir,
            policy,
            SourceBase::WorkingDir,
        )
    }

    /// Read `rel` through any symlinks.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel)).expect("read file")
    }

    /// Stored body of the symlink at `rel`.
    pub fn link_body(&self, rel: &str) -> PathBuf {
        std::fs::read_link(self.path(rel)).expect("read link")
    }

    /// Whether `rel` is a symlink (not followed).
    pub fn is_symlink(&self, rel: &str) -> bool {
        std::fs::symlink_metadata(self.path(rel))
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    /// Names in the directory containing `rel` that start with `rel`'s file
    /// name and end in `.bak`.
    pub fn backups_of(&self, rel: &str) -> Vec<PathBuf> {
        let target = self.path(rel);
        let dir = target.parent().expect("target has a parent");
        let name = target
            .file_name()
            .expect("target has a file name")
            .to_string_lossy()
            .into_owned();
        let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
            .expect("read dir")
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                let file = p.file_name().unwrap_or_default().to_string_lossy();
                file.starts_with(&format!("{name}.")) && file.ends_with(".bak")
            })
            .collect();
        found.sort();
        found
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by an empty project.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write the default mapping document.
    pub fn with_mapping(self, content: &str) -> Self {
        std::fs::write(self.ctx.mapping_path(), content).expect("write mapping");
        self
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = self.ctx.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Create the directory `rel` and its parents.
    pub fn with_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.ctx.path(rel)).expect("create dir");
        self
    }

    /// Create a symlink at `rel` storing `body`.
    #[cfg(unix)]
    pub fn with_symlink(self, rel: &str, body: &str) -> Self {
        let path = self.ctx.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::os::unix::fs::symlink(body, &path).expect("create symlink");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}
