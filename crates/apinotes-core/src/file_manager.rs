//! Uniquing of file and directory entries.
//!
//! The notes manager keys its caches by directory identity, so the file
//! manager hands out one [`DirectoryId`] per physical directory no matter how
//! many spellings reach it.

use id_arena::{Arena, Id};
use rustc_hash::FxHashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

use crate::fs::FileSystem;

pub type DirectoryId = Id<DirectoryEntry>;
pub type FileId = Id<FileEntry>;

/// A directory known to the file manager
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// The path this directory was first requested under
    name: PathBuf,
    /// Canonical location on disk
    real_path: PathBuf,
}

impl DirectoryEntry {
    pub fn name(&self) -> &Path {
        &self.name
    }

    pub fn real_path(&self) -> &Path {
        &self.real_path
    }
}

/// A file known to the file manager
#[derive(Debug, Clone)]
pub struct FileEntry {
    name: PathBuf,
    real_path: Option<PathBuf>,
    dir: DirectoryId,
}

impl FileEntry {
    /// The path this file was first requested under
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// The case-preserved on-disk path, when the file system reports one
    pub fn real_path(&self) -> Option<&Path> {
        self.real_path.as_deref()
    }

    /// The directory containing this file
    pub fn dir(&self) -> DirectoryId {
        self.dir
    }
}

/// Interns files and directories by physical identity
pub struct FileManager {
    fs: Arc<dyn FileSystem>,
    dirs: Arena<DirectoryEntry>,
    files: Arena<FileEntry>,
    /// canonical path -> directory
    unique_dirs: FxHashMap<PathBuf, DirectoryId>,
    /// canonical path -> file
    unique_files: FxHashMap<PathBuf, FileId>,
    /// requested spelling -> result, including misses
    seen_dir_names: FxHashMap<PathBuf, Option<DirectoryId>>,
    seen_file_names: FxHashMap<PathBuf, Option<FileId>>,
}

impl FileManager {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            dirs: Arena::new(),
            files: Arena::new(),
            unique_dirs: FxHashMap::default(),
            unique_files: FxHashMap::default(),
            seen_dir_names: FxHashMap::default(),
            seen_file_names: FxHashMap::default(),
        }
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    /// Look up a directory, returning `None` if it does not exist
    pub fn get_directory(&mut self, path: impl AsRef<Path>) -> Option<DirectoryId> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return None;
        }
        if let Some(known) = self.seen_dir_names.get(path) {
            return *known;
        }

        let result = if self.fs.is_dir(path) {
            match self.fs.canonicalize(path) {
                Ok(real_path) => Some(self.intern_dir(path, real_path)),
                Err(e) => {
                    trace!("Cannot canonicalize {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        self.seen_dir_names.insert(path.to_path_buf(), result);
        result
    }

    /// Look up a file, returning `None` if it does not exist
    pub fn get_file(&mut self, path: impl AsRef<Path>) -> Option<FileId> {
        let path = path.as_ref();
        if let Some(known) = self.seen_file_names.get(path) {
            return *known;
        }

        let result = if self.fs.is_file(path) {
            self.intern_file(path)
        } else {
            None
        };

        self.seen_file_names.insert(path.to_path_buf(), result);
        result
    }

    fn intern_dir(&mut self, name: &Path, real_path: PathBuf) -> DirectoryId {
        if let Some(&id) = self.unique_dirs.get(&real_path) {
            return id;
        }
        let id = self.dirs.alloc(DirectoryEntry {
            name: name.to_path_buf(),
            real_path: real_path.clone(),
        });
        self.unique_dirs.insert(real_path, id);
        id
    }

    fn intern_file(&mut self, name: &Path) -> Option<FileId> {
        let real_path = self.fs.canonicalize(name).ok();
        if let Some(id) = real_path.as_ref().and_then(|p| self.unique_files.get(p)) {
            return Some(*id);
        }

        let parent = match name.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let dir = self.get_directory(parent)?;

        let id = self.files.alloc(FileEntry {
            name: name.to_path_buf(),
            real_path: real_path.clone(),
            dir,
        });
        if let Some(real_path) = real_path {
            self.unique_files.insert(real_path, id);
        }
        Some(id)
    }

    pub fn directory(&self, id: DirectoryId) -> &DirectoryEntry {
        &self.dirs[id]
    }

    pub fn file(&self, id: FileId) -> &FileEntry {
        &self.files[id]
    }

    /// Read the contents of a file
    pub fn read_file(&self, id: FileId) -> io::Result<String> {
        self.fs.read_file(&self.files[id].name)
    }

    /// Number of distinct directories interned so far
    pub fn directory_count(&self) -> usize {
        self.dirs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn manager_with(fs: MockFileSystem) -> FileManager {
        FileManager::new(Arc::new(fs))
    }

    #[test]
    fn test_same_directory_same_id() {
        let mut fs = MockFileSystem::new();
        fs.add_dir("/usr/include");
        fs.add_symlink("/inc", "/usr/include");
        let mut files = manager_with(fs);

        let a = files.get_directory("/usr/include").unwrap();
        let b = files.get_directory("/inc").unwrap();
        let c = files.get_directory("/usr/./include").unwrap();

        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(files.directory(a).name(), Path::new("/usr/include"));
        assert_eq!(files.directory_count(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let mut files = manager_with(MockFileSystem::new());
        assert!(files.get_directory("/missing").is_none());
        assert!(files.get_directory("").is_none());
    }

    #[test]
    fn test_file_knows_its_directory() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/src/lib/a.h", "");
        let mut files = manager_with(fs);

        let file = files.get_file("/src/lib/a.h").unwrap();
        let dir = files.get_directory("/src/lib").unwrap();
        assert_eq!(files.file(file).dir(), dir);
        assert_eq!(
            files.file(file).real_path(),
            Some(Path::new("/src/lib/a.h"))
        );
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let mut fs = MockFileSystem::new();
        fs.add_dir("/src");
        let mut files = manager_with(fs);
        assert!(files.get_file("/src").is_none());
    }

    #[test]
    fn test_read_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/a.apinotes", "Name: A");
        let mut files = manager_with(fs);
        let id = files.get_file("/a.apinotes").unwrap();
        assert_eq!(files.read_file(id).unwrap(), "Name: A");
    }
}
