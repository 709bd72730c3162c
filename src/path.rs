//! Remote path handling — resolution against the working folder,
//! normalization, and the case-folded form the API uses for identity.
//!
//! Dropbox treats paths case-insensitively for identity while keeping
//! original casing for display, so equality checks go through
//! [`path_lower`].

/// Normalize a path into absolute, `/`-rooted form with redundant
/// separators collapsed and no trailing slash (except the root itself).
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for component in path.split('/').filter(|c| !c.is_empty()) {
        out.push('/');
        out.push_str(component);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Resolve a possibly-relative path against a base folder.
///
/// Absolute inputs (leading `/`) ignore the base; anything else is
/// joined under it. The result is always normalized.
pub fn resolve(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        normalize(path)
    } else {
        normalize(&format!("{base}/{path}"))
    }
}

/// The case-folded form used for identity comparisons against the API.
pub fn path_lower(path: &str) -> String {
    normalize(path).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_separators() {
        assert_eq!(normalize("//tests///sub/"), "/tests/sub");
    }

    #[test]
    fn normalize_adds_root() {
        assert_eq!(normalize("tests"), "/tests");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
    }

    #[test]
    fn resolve_relative_against_base() {
        assert_eq!(resolve("/tests", "simplefile.txt"), "/tests/simplefile.txt");
        assert_eq!(resolve("/", "tests"), "/tests");
    }

    #[test]
    fn resolve_absolute_ignores_base() {
        assert_eq!(resolve("/tests", "/other/file.txt"), "/other/file.txt");
    }

    #[test]
    fn resolve_nested_relative() {
        assert_eq!(resolve("/a/b", "c/d.txt"), "/a/b/c/d.txt");
    }

    #[test]
    fn path_lower_folds_case() {
        assert_eq!(path_lower("/Tests/File.TXT"), "/tests/file.txt");
    }

    #[test]
    fn path_lower_keeps_unicode() {
        assert_eq!(path_lower("/T\u{2202}sts/Filé.txt"), "/t\u{2202}sts/filé.txt");
    }
}
