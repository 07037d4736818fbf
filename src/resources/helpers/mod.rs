//! Shared filesystem helpers for resource implementations.
pub mod fs;
