// src/sync/hash.rs

//! Content hashing for the `changed` copy policy.

use std::io::{self, Read};
use std::path::Path;

use blake3::Hasher;

use crate::fs::FileSystem;

/// Compute the blake3 hash of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> io::Result<String> {
    let mut hasher = Hasher::new();
    let mut file = fs.open_read(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// True if `dest` is a file with the same content as `src`. A missing or
/// unreadable destination counts as different.
pub fn same_content(fs: &dyn FileSystem, src: &Path, dest: &Path) -> io::Result<bool> {
    if !fs.is_file(dest) {
        return Ok(false);
    }
    let src_hash = compute_file_hash(fs, src)?;
    match compute_file_hash(fs, dest) {
        Ok(dest_hash) => Ok(src_hash == dest_hash),
        Err(_) => Ok(false),
    }
}
