//! Version information injected at compile time by `build.rs`.

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (short form)
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");

/// Build timestamp (RFC3339 format)
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

/// Full version line, e.g. `rxnarrative v0.1.0 (commit abc123, built 2026-10-18T06:00:00+00:00)`.
pub fn full_version() -> String {
    format!(
        "rxnarrative v{} (commit {}, built {})",
        VERSION, GIT_COMMIT, BUILD_TIMESTAMP
    )
}

/// Short version string, e.g. `v0.1.0`.
pub fn short_version() -> String {
    format!("v{}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_version_contains_parts() {
        let version = full_version();
        assert!(version.starts_with("rxnarrative v"));
        assert!(version.contains(VERSION));
        assert!(version.contains(GIT_COMMIT));
    }

    #[test]
    fn test_short_version() {
        assert_eq!(short_version(), format!("v{}", VERSION));
    }
}
