//! Command: print version information.

/// Version string: the build-time `SYMLINKER_VERSION` if set, else the
/// crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("SYMLINKER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the symlinker version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("symlinker {}", version());
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_is_not_empty() {
        assert!(!super::version().is_empty());
    }
}
