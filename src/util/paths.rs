//! Path math for package prefixes and workspace containment.

use std::path::{Path, PathBuf};

/// Check whether `path` lies inside `base` (inclusive).
pub fn is_inside(base: &Path, path: &Path) -> bool {
    path.starts_with(base)
}

/// Compute `path` relative to `base` with separators replaced by `.`.
///
/// Returns `None` when `path` is not inside `base` or when the relative
/// path is empty (the paths are equal).
pub fn dotted_relative(base: &Path, path: &Path) -> Option<String> {
    let rel = pathdiff::diff_paths(path, base)?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    for component in rel.components() {
        match component {
            std::path::Component::Normal(seg) => segments.push(seg.to_str()?.to_owned()),
            // Any parent traversal means `path` is outside `base`.
            _ => return None,
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

/// Infer a dotted package prefix for `dir` from a set of declared roots.
///
/// Picks the deepest declared root that is an ancestor of `dir` and returns
/// the remainder of the path with separators replaced by `.`. Returns the
/// empty string when no declared root matches or `dir` equals the root.
pub fn infer_package_prefix(declared_roots: &[PathBuf], dir: &Path) -> String {
    let deepest = declared_roots
        .iter()
        .filter(|root| dir.starts_with(root))
        .max_by_key(|root| root.components().count());

    match deepest {
        Some(root) => dotted_relative(root, dir).unwrap_or_default(),
        None => String::new(),
    }
}

/// Strip the trailing directory segments named by a dotted package prefix.
///
/// `strip_package_suffix("/w/src/main/foo", "foo")` is `/w/src/main`. Stops
/// as soon as a segment does not match, so a prefix that disagrees with the
/// directory layout leaves the path untouched from that point on.
pub fn strip_package_suffix(dir: &Path, prefix: &str) -> PathBuf {
    let mut out = dir.to_path_buf();
    for segment in prefix.split('.').rev().filter(|s| !s.is_empty()) {
        if out.file_name().and_then(|n| n.to_str()) == Some(segment) {
            out.pop();
        } else {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_inside() {
        assert!(is_inside(Path::new("/w"), Path::new("/w/src")));
        assert!(is_inside(Path::new("/w"), Path::new("/w")));
        assert!(!is_inside(Path::new("/w"), Path::new("/other/src")));
    }

    #[test]
    fn test_dotted_relative() {
        assert_eq!(
            dotted_relative(Path::new("/w"), Path::new("/w/src/main")),
            Some("src.main".to_string())
        );
        assert_eq!(dotted_relative(Path::new("/w"), Path::new("/w")), None);
        assert_eq!(
            dotted_relative(Path::new("/w/deep"), Path::new("/w/other")),
            None
        );
    }

    #[test]
    fn test_infer_package_prefix_deepest_root_wins() {
        let roots = vec![PathBuf::from("/w/src"), PathBuf::from("/w/src/main")];
        assert_eq!(
            infer_package_prefix(&roots, Path::new("/w/src/main/com/acme")),
            "com.acme"
        );
    }

    #[test]
    fn test_infer_package_prefix_no_match() {
        let roots = vec![PathBuf::from("/w/src/main")];
        assert_eq!(infer_package_prefix(&roots, Path::new("/elsewhere")), "");
    }

    #[test]
    fn test_infer_package_prefix_dir_equals_root() {
        let roots = vec![PathBuf::from("/w/src/main")];
        assert_eq!(infer_package_prefix(&roots, Path::new("/w/src/main")), "");
    }

    #[test]
    fn test_strip_package_suffix() {
        assert_eq!(
            strip_package_suffix(Path::new("/w/src/main/com/acme"), "com.acme"),
            PathBuf::from("/w/src/main")
        );
    }

    #[test]
    fn test_strip_package_suffix_mismatch_stops() {
        assert_eq!(
            strip_package_suffix(Path::new("/w/src/main/foo"), "com.acme"),
            PathBuf::from("/w/src/main/foo")
        );
    }

    #[test]
    fn test_strip_package_suffix_empty_prefix() {
        assert_eq!(
            strip_package_suffix(Path::new("/w/src/main"), ""),
            PathBuf::from("/w/src/main")
        );
    }
}
