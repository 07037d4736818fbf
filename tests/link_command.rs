#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for reconciling a mapping document end to end.
//!
//! Each test lays out a throwaway project, loads its `symlinker.yml` and
//! runs the batch reconciler the same way the `link` command does.

mod common;

use std::os::unix::fs::{MetadataExt as _, PermissionsExt as _};
use std::path::PathBuf;

use common::TestContextBuilder;
use symlinker_cli::reconcile::{Policy, Resolution};
use symlinker_cli::resources::ReconcileOutcome;
use symlinker_cli::resources::error::ResourceError;
use symlinker_cli::resources::symlink::ParentDirs;

const FORCE_BACKUP: Policy = Policy {
    force: true,
    backup: true,
    parents: ParentDirs::Create,
};

const FORCE_REMOVE: Policy = Policy {
    force: true,
    backup: false,
    parents: ParentDirs::Create,
};

fn outcomes(reports: &[symlinker_cli::reconcile::EntryReport]) -> String {
    reports
        .iter()
        .map(|r| {
            format!(
                "{} -> {}: {:?}",
                r.spec.target().file_name().unwrap().to_string_lossy(),
                r.spec.declared_source().display(),
                r.final_outcome()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Creation and idempotence
// ---------------------------------------------------------------------------

/// A relative source outside the project directory produces a body
/// relative to the link's own directory.
#[test]
fn relative_source_outside_project() {
    let ctx = TestContextBuilder::new()
        .with_file("shared/lib/mod.txt", "shared")
        .with_file("proj/symlinker.yml", "./vendor/lib: ../shared/lib\n")
        .build();
    let mapping = symlinker_cli::config::Mapping::load(&ctx.path("proj/symlinker.yml")).unwrap();

    let reports = symlinker_cli::reconcile::reconcile_all(
        mapping.pairs(),
        &mapping.working_dir,
        &Policy::default(),
        symlinker_cli::resources::symlink::SourceBase::WorkingDir,
    );

    assert_eq!(reports[0].outcome, ReconcileOutcome::Created);
    assert_eq!(
        ctx.link_body("proj/vendor/lib"),
        PathBuf::from("../../shared/lib")
    );
    assert_eq!(ctx.read("proj/vendor/lib/mod.txt"), "shared");
}

#[test]
fn second_run_changes_nothing() {
    let ctx = TestContextBuilder::new()
        .with_file("dotfiles/bashrc", "bash")
        .with_dir("dotfiles/nvim")
        .with_mapping("home/.bashrc: dotfiles/bashrc\nhome/.config/nvim: dotfiles/nvim\n")
        .build();

    let first = ctx.reconcile(&Policy::default());
    let second = ctx.reconcile(&Policy::default());

    insta::assert_snapshot!(outcomes(&first), @r"
    .bashrc -> dotfiles/bashrc: Created
    nvim -> dotfiles/nvim: Created
    ");
    insta::assert_snapshot!(outcomes(&second), @r"
    .bashrc -> dotfiles/bashrc: AlreadySatisfied
    nvim -> dotfiles/nvim: AlreadySatisfied
    ");
    assert_eq!(ctx.link_body("home/.bashrc"), PathBuf::from("../dotfiles/bashrc"));
    assert_eq!(
        ctx.link_body("home/.config/nvim"),
        PathBuf::from("../../dotfiles/nvim")
    );
}

#[test]
fn absolute_source_is_stored_absolute() {
    let ctx = TestContextBuilder::new()
        .with_file("data/file", "abs")
        .build();
    let source = dunce::canonicalize(ctx.path("data/file")).unwrap();
    std::fs::write(
        ctx.mapping_path(),
        format!("link: {}\n", source.display()),
    )
    .unwrap();

    let reports = ctx.reconcile(&Policy::default());

    assert_eq!(reports[0].outcome, ReconcileOutcome::Created);
    assert_eq!(ctx.link_body("link"), source);
    assert_eq!(ctx.read("link"), "abs");
}

#[test]
fn self_link_is_not_touched() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "s")
        .with_symlink("dst", "src")
        .with_mapping("dst: src\n")
        .build();
    let before = std::fs::symlink_metadata(ctx.path("dst")).unwrap();

    let reports = ctx.reconcile(&FORCE_REMOVE);

    let after = std::fs::symlink_metadata(ctx.path("dst")).unwrap();
    assert_eq!(reports[0].outcome, ReconcileOutcome::AlreadySatisfied);
    assert!(reports[0].resolution.is_none());
    assert_eq!(before.ino(), after.ino());
    assert_eq!(before.modified().unwrap(), after.modified().unwrap());
}

/// A body spelled differently but normalizing to the same place counts as
/// linked to the source.
#[test]
fn equivalent_spelling_is_already_satisfied() {
    let ctx = TestContextBuilder::new()
        .with_file("a/src", "s")
        .with_symlink("dst", "./a/../a/src")
        .with_mapping("dst: a/src\n")
        .build();

    let reports = ctx.reconcile(&Policy::default());

    assert_eq!(reports[0].outcome, ReconcileOutcome::AlreadySatisfied);
    assert_eq!(ctx.link_body("dst"), PathBuf::from("./a/../a/src"));
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn entries_run_in_declared_order() {
    let ctx = TestContextBuilder::new()
        .with_dir("assets")
        .with_file("assets/logo.svg", "<svg/>")
        .with_mapping(
            "public/assets: assets\n\
             zz: missing\n\
             public/logo.svg: public/assets/logo.svg\n",
        )
        .build();

    let reports = ctx.reconcile(&Policy::default());

    insta::assert_snapshot!(outcomes(&reports), @r"
    assets -> assets: Created
    zz -> missing: SourceMissing
    logo.svg -> public/assets/logo.svg: Created
    ");
    assert_eq!(ctx.read("public/logo.svg"), "<svg/>");
}

// ---------------------------------------------------------------------------
// Conflicts without force
// ---------------------------------------------------------------------------

#[test]
fn occupied_target_is_left_alone_by_default() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("dst", "precious")
        .with_mapping("dst: src\n")
        .build();

    let reports = ctx.reconcile(&Policy::default());

    assert_eq!(reports[0].outcome, ReconcileOutcome::ConflictExists);
    assert!(matches!(reports[0].resolution, Some(Ok(Resolution::Reported))));
    assert!(reports[0].is_failure());
    assert_eq!(ctx.read("dst"), "precious");
    assert!(!ctx.is_symlink("dst"));
}

#[test]
fn foreign_link_is_left_alone_by_default() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("other", "other")
        .with_symlink("dst", "other")
        .with_mapping("dst: src\n")
        .build();

    let reports = ctx.reconcile(&Policy::default());

    assert_eq!(reports[0].outcome, ReconcileOutcome::ConflictLinked);
    assert_eq!(ctx.link_body("dst"), PathBuf::from("other"));
}

#[test]
fn dangling_link_is_a_conflict() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_symlink("dst", "gone")
        .with_mapping("dst: src\n")
        .build();

    let reports = ctx.reconcile(&Policy::default());

    assert_eq!(reports[0].outcome, ReconcileOutcome::ConflictLinked);
}

// ---------------------------------------------------------------------------
// Missing sources
// ---------------------------------------------------------------------------

#[test]
fn missing_source_mutates_nothing() {
    let ctx = TestContextBuilder::new()
        .with_file("present", "keep")
        .with_file("other", "o")
        .with_symlink("linked", "other")
        .with_mapping("absent: nope\npresent: nope\nlinked: nope\n")
        .build();

    let reports = ctx.reconcile(&FORCE_REMOVE);

    assert!(
        reports
            .iter()
            .all(|r| r.outcome == ReconcileOutcome::SourceMissing && r.resolution.is_none())
    );
    assert!(ctx.path("absent").symlink_metadata().is_err());
    assert_eq!(ctx.read("present"), "keep");
    assert_eq!(ctx.link_body("linked"), PathBuf::from("other"));
}

// ---------------------------------------------------------------------------
// Forced resolution
// ---------------------------------------------------------------------------

#[test]
fn backup_preserves_content_under_timestamped_name() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("dst", "old")
        .with_mapping("dst: src\n")
        .build();

    let reports = ctx.reconcile(&FORCE_BACKUP);

    let Some(Ok(Resolution::BackedUp { backup, retry })) = &reports[0].resolution else {
        panic!("expected a backup, got {:?}", reports[0].resolution);
    };
    assert_eq!(retry, &ReconcileOutcome::Created);
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "old");

    // dst.<YYYY-MM-DDTHH:MM:SS+HH:MM>.bak
    let name = backup.file_name().unwrap().to_string_lossy().into_owned();
    let stamp = name
        .strip_prefix("dst.")
        .and_then(|rest| rest.strip_suffix(".bak"))
        .expect("backup name shape");
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "bad stamp {stamp}");

    assert!(ctx.is_symlink("dst"));
    assert_eq!(ctx.read("dst"), "new");
}

#[test]
fn repeated_backups_never_collide() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("dst", "first")
        .with_mapping("dst: src\n")
        .build();

    ctx.reconcile(&FORCE_BACKUP);
    std::fs::remove_file(ctx.path("dst")).unwrap();
    std::fs::write(ctx.path("dst"), "second").unwrap();
    ctx.reconcile(&FORCE_BACKUP);

    let backups = ctx.backups_of("dst");
    assert_eq!(backups.len(), 2, "backups: {backups:?}");
    let mut contents: Vec<String> = backups
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, ["first", "second"]);
}

#[test]
fn backup_of_foreign_link_keeps_the_link() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("other", "o")
        .with_symlink("dst", "other")
        .with_mapping("dst: src\n")
        .build();

    let reports = ctx.reconcile(&FORCE_BACKUP);

    assert_eq!(reports[0].final_outcome(), &ReconcileOutcome::Created);
    let backups = ctx.backups_of("dst");
    assert_eq!(std::fs::read_link(&backups[0]).unwrap(), PathBuf::from("other"));
    assert_eq!(ctx.read("other"), "o");
}

#[test]
fn force_without_backup_removes_whole_tree() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("dst/a/b/c.txt", "c")
        .with_file("dst/a/readonly.txt", "r")
        .with_file("outside/keep.txt", "k")
        .with_symlink("dst/a/escape", "../../outside")
        .with_mapping("dst: src\n")
        .build();
    std::fs::set_permissions(
        ctx.path("dst/a/readonly.txt"),
        std::fs::Permissions::from_mode(0o444),
    )
    .unwrap();
    std::fs::set_permissions(ctx.path("dst/a/b"), std::fs::Permissions::from_mode(0o555))
        .unwrap();

    let reports = ctx.reconcile(&FORCE_REMOVE);

    assert_eq!(
        reports[0].resolution.as_ref().unwrap().as_ref().unwrap(),
        &Resolution::Removed {
            retry: ReconcileOutcome::Created
        }
    );
    assert!(ctx.is_symlink("dst"));
    assert_eq!(ctx.read("dst"), "new");
    assert!(ctx.backups_of("dst").is_empty());
    // The symlink inside the tree was removed, not followed.
    assert_eq!(ctx.read("outside/keep.txt"), "k");
}

#[test]
fn force_replaces_foreign_link_without_touching_its_target() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "new")
        .with_file("other/data", "d")
        .with_symlink("dst", "other")
        .with_mapping("dst: src\n")
        .build();

    let reports = ctx.reconcile(&FORCE_REMOVE);

    assert_eq!(reports[0].final_outcome(), &ReconcileOutcome::Created);
    assert_eq!(ctx.link_body("dst"), PathBuf::from("src"));
    assert_eq!(ctx.read("other/data"), "d");
}

/// Clearing a target that contains its own source would destroy the source.
#[test]
fn force_never_clears_a_target_holding_its_source() {
    let ctx = TestContextBuilder::new()
        .with_file("lib/inner/keep.txt", "data")
        .with_file("cfg", "settings")
        .with_mapping("lib: lib/inner\ncfg: cfg\n")
        .build();

    for policy in [FORCE_REMOVE, FORCE_BACKUP] {
        let reports = ctx.reconcile(&policy);

        assert!(reports.iter().all(|r| matches!(
            r.resolution,
            Some(Err(ResourceError::SourceInsideTarget { .. }))
        )));
        assert!(reports.iter().all(symlinker_cli::reconcile::EntryReport::is_failure));
        assert_eq!(ctx.read("lib/inner/keep.txt"), "data");
        assert_eq!(ctx.read("cfg"), "settings");
        assert!(ctx.backups_of("lib").is_empty());
        assert!(ctx.backups_of("cfg").is_empty());
    }
}

// ---------------------------------------------------------------------------
// Parent directories
// ---------------------------------------------------------------------------

#[test]
fn missing_parent_fails_when_creation_disabled() {
    let ctx = TestContextBuilder::new()
        .with_file("src", "s")
        .with_mapping("deep/er/dst: src\n")
        .build();
    let policy = Policy {
        parents: ParentDirs::Require,
        ..Policy::default()
    };

    let reports = ctx.reconcile(&policy);

    assert!(matches!(
        reports[0].outcome,
        ReconcileOutcome::CreationFailed { .. }
    ));
    assert!(!ctx.path("deep").exists());
}
