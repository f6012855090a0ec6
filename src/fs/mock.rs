// src/fs/mock.rs

use super::FileSystem;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(BTreeSet<String>), // child names
}

/// In-memory filesystem for tests.
///
/// Paths are stored exactly as given (no canonicalization), so tests should
/// consistently use the same absolute roots, e.g. `/src` and `/out`.
/// Paths registered with [`MockFileSystem::deny`] fail every operation with
/// `PermissionDenied`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    denied: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut files = self.files.lock().unwrap();
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(&mut files, parent);
        }
        files.insert(path.to_path_buf(), MockEntry::File(content.into()));
        Self::link_to_parent(&mut files, path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Make every operation on `path` fail with `PermissionDenied`.
    pub fn deny(&self, path: impl AsRef<Path>) {
        self.denied.lock().unwrap().insert(path.as_ref().to_path_buf());
    }

    /// File contents, if `path` is a file.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.files.lock().unwrap().get(path.as_ref()) {
            Some(MockEntry::File(c)) => Some(c.clone()),
            _ => None,
        }
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.denied.lock().unwrap().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {:?}", path),
            ));
        }
        Ok(())
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if path.as_os_str().is_empty() || files.contains_key(path) {
            return;
        }
        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(files, parent);
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(BTreeSet::new()));
        Self::link_to_parent(files, path);
    }

    fn link_to_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            children.insert(name.to_string_lossy().into_owned());
        }
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("not found: {:?}", path))
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        self.check(path)?;
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(io::Error::other(format!("is a directory: {:?}", path))),
            None => Err(Self::not_found(path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.check(path)?;
        self.add_file(path, contents);
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.check(from)?;
        self.check(to)?;
        let content = {
            let files = self.files.lock().unwrap();
            match files.get(from) {
                Some(MockEntry::File(c)) => c.clone(),
                Some(MockEntry::Dir(_)) => {
                    return Err(io::Error::other(format!("is a directory: {:?}", from)));
                }
                None => return Err(Self::not_found(from)),
            }
        };
        {
            let files = self.files.lock().unwrap();
            let parent_ok = to
                .parent()
                .is_some_and(|p| matches!(files.get(p), Some(MockEntry::Dir(_))));
            if !parent_ok {
                return Err(Self::not_found(to));
            }
            if matches!(files.get(to), Some(MockEntry::Dir(_))) {
                return Err(io::Error::other(format!("is a directory: {:?}", to)));
            }
        }
        self.add_file(to, content);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        let mut files = self.files.lock().unwrap();
        if let Some(MockEntry::File(_)) = files.get(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {:?}", path),
            ));
        }
        Self::ensure_dir_entry(&mut files, path);
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        let mut files = self.files.lock().unwrap();
        if !files.contains_key(path) {
            return Ok(());
        }
        files.retain(|p, _| !p.starts_with(path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                children.remove(name.to_string_lossy().as_ref());
            }
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.files.lock().unwrap().get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.files.lock().unwrap().get(path), Some(MockEntry::Dir(_)))
    }

    /// The in-memory tree has no links.
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.check(path)?;
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            Some(MockEntry::File(_)) => {
                Err(io::Error::other(format!("not a directory: {:?}", path)))
            }
            None => Err(Self::not_found(path)),
        }
    }
}
