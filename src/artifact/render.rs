// src/artifact/render.rs

use std::collections::BTreeSet;

use crate::types::ArtifactGenerator;

/// The tracked entry a generator derives from a normalized relative path.
pub fn entry_for(generator: ArtifactGenerator, rel_path: &str) -> String {
    match generator {
        ArtifactGenerator::FileList => rel_path.to_string(),
        ArtifactGenerator::TextureList => strip_extension(rel_path).to_string(),
    }
}

fn strip_extension(rel_path: &str) -> &str {
    let name_start = rel_path.rfind('/').map_or(0, |i| i + 1);
    match rel_path[name_start..].rfind('.') {
        Some(0) | None => rel_path,
        Some(dot) => &rel_path[..name_start + dot],
    }
}

/// JSON array of the entries `generator` derives from `paths`, deduplicated
/// and sorted, two-space indented, no trailing newline. Same set in, same
/// bytes out.
pub fn render_entries(generator: ArtifactGenerator, paths: &BTreeSet<String>) -> String {
    let entries: BTreeSet<String> = paths.iter().map(|p| entry_for(generator, p)).collect();
    let list: Vec<&str> = entries.iter().map(String::as_str).collect();
    // Serializing a list of strings cannot fail.
    serde_json::to_string_pretty(&list).unwrap_or_else(|_| "[]".to_string())
}
