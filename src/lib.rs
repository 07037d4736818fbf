//! Declarative symlink reconciliation.
//!
//! Reads an ordered mapping of `target -> source` pairs and makes every
//! target a symlink to its source: creating missing links, leaving correct
//! ones alone, and reporting (or, when forced, backing up or removing)
//! whatever else occupies a target.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: locate and parse the mapping document
//! - **[`resources`]**: path math, link classification, single-attempt reconciliation
//! - **[`reconcile`]**: conflict resolution and ordered batch reconciliation
//! - **[`commands`]**: top-level subcommand orchestration (`link`, `link-one`, `check`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod resources;
