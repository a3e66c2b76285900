//! Build metadata embedded at compile time

/// Marker reported for local, uninstalled builds
const DEVEL_MARKERS: [&str; 2] = ["(devel)", "devel"];

/// Version string embedded in this binary
///
/// `LINKCTL_BUILD_VERSION` set at compile time (release pipelines pass the
/// git tag here) takes precedence over the package version. Placeholder
/// values resolve to an empty string.
#[must_use]
#[inline]
pub fn version() -> String {
    let embedded = option_env!("LINKCTL_BUILD_VERSION").or(Some(env!("CARGO_PKG_VERSION")));
    resolve(embedded)
}

/// Turn raw build metadata into the application version
#[must_use]
pub fn resolve(embedded: Option<&str>) -> String {
    match embedded.map(str::trim) {
        Some(raw) if !raw.is_empty() && !DEVEL_MARKERS.contains(&raw) => raw.to_owned(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_release_version() {
        assert_eq!(resolve(Some("v1.4.0")), "v1.4.0");
        assert_eq!(resolve(Some(" 0.2.1\n")), "0.2.1");
    }

    #[test]
    fn test_resolve_placeholders_are_empty() {
        assert_eq!(resolve(None), "");
        assert_eq!(resolve(Some("")), "");
        assert_eq!(resolve(Some("(devel)")), "");
        assert_eq!(resolve(Some("devel")), "");
    }

    #[test]
    fn test_version_is_never_a_placeholder() {
        let version = version();
        assert_ne!(version, "(devel)");
        assert_ne!(version, "devel");
    }
}
