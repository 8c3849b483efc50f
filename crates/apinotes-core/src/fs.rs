//! Filesystem abstraction used by the file manager.
//!
//! Everything the notes manager learns about the disk goes through the
//! [`FileSystem`] trait so tests can run against [`MockFileSystem`].

use rustc_hash::FxHashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Upper bound on symbolic links followed while canonicalizing one path.
const MAX_SYMLINK_DEPTH: usize = 40;

/// Trait for file system operations
/// This allows for dependency injection and testing with mock file systems
pub trait FileSystem: Send + Sync {
    /// Read the whole file as UTF-8 text
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Whether `path` names an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` names an existing directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Resolve `path` to its physical location, following symbolic links.
    ///
    /// Two paths naming the same file or directory must canonicalize to the
    /// same result; on case-insensitive file systems the result carries the
    /// on-disk spelling.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Real file system implementation backed by `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// In-memory file system for tests
///
/// Parent directories are created implicitly by [`MockFileSystem::add_file`]
/// and [`MockFileSystem::add_dir`]. Symbolic links are followed by
/// [`FileSystem::canonicalize`].
#[derive(Debug, Default, Clone)]
pub struct MockFileSystem {
    /// lookup key -> (on-disk spelling, contents)
    files: FxHashMap<PathBuf, (PathBuf, String)>,
    /// lookup key -> on-disk spelling
    dirs: FxHashMap<PathBuf, PathBuf>,
    /// link location -> target
    symlinks: FxHashMap<PathBuf, PathBuf>,
    case_insensitive: bool,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut fs = Self::default();
        fs.dirs.insert(PathBuf::from("/"), PathBuf::from("/"));
        fs
    }

    /// Create a mock that matches names case-insensitively but remembers the
    /// spelling each entry was created with, like the default macOS volume.
    pub fn case_insensitive() -> Self {
        let mut fs = Self::new();
        fs.case_insensitive = true;
        fs
    }

    /// Add a file, creating every missing ancestor directory
    pub fn add_file(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        let path = normalize_lexically(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        let key = self.key(&path);
        self.files.insert(key, (path, contents.into()));
    }

    /// Add a directory and all of its ancestors
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = normalize_lexically(path.as_ref());
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            let key = self.key(&current);
            self.dirs.entry(key).or_insert_with(|| current.clone());
        }
    }

    /// Add a symbolic link at `link` pointing to `target`
    ///
    /// Relative targets are interpreted against the link's parent directory.
    pub fn add_symlink(&mut self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = normalize_lexically(link.as_ref());
        if let Some(parent) = link.parent() {
            self.add_dir(parent);
        }
        let target = target.as_ref();
        let target = if target.is_absolute() {
            target.to_path_buf()
        } else {
            link.parent().unwrap_or(Path::new("/")).join(target)
        };
        let key = self.key(&link);
        self.symlinks.insert(key, target);
    }

    /// Remove a file if present
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        let key = self.key(&normalize_lexically(path.as_ref()));
        self.files.remove(&key);
    }

    fn key(&self, path: &Path) -> PathBuf {
        if self.case_insensitive {
            PathBuf::from(path.to_string_lossy().to_lowercase())
        } else {
            path.to_path_buf()
        }
    }

    fn resolve(&self, path: &Path, depth: usize) -> io::Result<PathBuf> {
        if depth > MAX_SYMLINK_DEPTH {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("too many levels of symbolic links: {}", path.display()),
            ));
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new("/").join(path)
        };

        let mut resolved = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => resolved.push(component),
                Component::CurDir => {}
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(name) => {
                    resolved.push(name);
                    let key = self.key(&resolved);
                    if let Some(target) = self.symlinks.get(&key) {
                        resolved = self.resolve(target, depth + 1)?;
                    } else if let Some(spelled) = self.dirs.get(&key) {
                        resolved = spelled.clone();
                    } else if let Some((spelled, _)) = self.files.get(&key) {
                        resolved = spelled.clone();
                    }
                }
            }
        }
        Ok(resolved)
    }
}

impl FileSystem for MockFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        let resolved = self.resolve(path, 0)?;
        self.files
            .get(&self.key(&resolved))
            .map(|(_, contents)| contents.clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                )
            })
    }

    fn is_file(&self, path: &Path) -> bool {
        self.resolve(path, 0)
            .map(|resolved| self.files.contains_key(&self.key(&resolved)))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path, 0)
            .map(|resolved| self.dirs.contains_key(&self.key(&resolved)))
            .unwrap_or(false)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let resolved = self.resolve(path, 0)?;
        let key = self.key(&resolved);
        if self.files.contains_key(&key) || self.dirs.contains_key(&key) {
            Ok(resolved)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {}", path.display()),
            ))
        }
    }
}

/// Collapse `.` and `..` components without touching the file system
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
