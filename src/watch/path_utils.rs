// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// This is intentionally robust:
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize both paths and try again.
/// - Only if both attempts fail do we give up.
///
/// Returns `None` if the path cannot be reasonably related to `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(to_forward_slashes(rel));
    }

    // macOS reports events under /private/var/... for roots given as
    // /var/...; a deleted path cannot be canonicalized, so fall back to its
    // parent.
    let root_canon = root.canonicalize().ok()?;
    if let Ok(path_canon) = path.canonicalize() {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(to_forward_slashes(rel));
        }
    }

    let parent = path.parent()?.canonicalize().ok()?;
    let name = path.file_name()?;
    let rel = parent.join(name);
    rel.strip_prefix(&root_canon).ok().map(to_forward_slashes)
}

fn to_forward_slashes(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}

/// Normalize a relative path string for equivalence checks: backslashes
/// become `/`, empty and `.` segments are dropped and `..` pops the previous
/// segment. `"textures\\.\\a/../b.png"` becomes `"textures/b.png"`.
pub fn normalize_rel(rel: &str) -> String {
    let replaced = rel.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();
    for seg in replaced.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// True if `path` lies strictly beneath the directory `dir` (both relative,
/// forward-slash).
pub fn is_within(dir: &str, path: &str) -> bool {
    path.len() > dir.len() && path.starts_with(dir) && path.as_bytes()[dir.len()] == b'/'
}
