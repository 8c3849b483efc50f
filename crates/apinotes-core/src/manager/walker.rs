//! Directory walk from a header's directory toward the root.
//!
//! Each walk consults the [`DirectoryCache`] first, probes the disk only for
//! directories nobody has looked at yet, and finishes by pointing every
//! directory it passed through straight at the answer.

use id_arena::Arena;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::path::{Component, Path};
use tracing::debug;

use super::directory_cache::{CacheEntry, DirectoryCache, ReaderId};
use super::framework::{framework_name, locate_ambient_api_notes, locate_framework_api_notes};
use super::loader::NotesLoader;
use super::statistics::Statistics;
use crate::file_manager::{DirectoryId, FileId, FileManager};
use crate::notes::NotesReader;

pub struct ResolutionWalker<'a> {
    files: &'a mut FileManager,
    cache: &'a mut DirectoryCache,
    readers: &'a mut Arena<NotesReader>,
    loader: &'a NotesLoader,
    stats: &'a mut Statistics,
}

impl<'a> ResolutionWalker<'a> {
    pub fn new(
        files: &'a mut FileManager,
        cache: &'a mut DirectoryCache,
        readers: &'a mut Arena<NotesReader>,
        loader: &'a NotesLoader,
        stats: &'a mut Statistics,
    ) -> Self {
        Self {
            files,
            cache,
            readers,
            loader,
            stats,
        }
    }

    /// Find the reader governing headers in `start`, if any
    pub fn resolve(&mut self, start: DirectoryId) -> Option<ReaderId> {
        let mut visited: IndexSet<DirectoryId, FxBuildHasher> = IndexSet::default();
        let mut current = Some(start);
        let mut result = None;

        while let Some(dir) = current {
            if visited.contains(&dir) {
                debug!(
                    "Directory {} reached twice in one walk; giving up",
                    self.files.directory(dir).name().display()
                );
                current = None;
                break;
            }

            match self.cache.lookup(dir) {
                CacheEntry::Redirect(target) => {
                    current = Some(target);
                    continue;
                }
                CacheEntry::Resolved(reader) => {
                    result = reader;
                    break;
                }
                CacheEntry::Unresolved => {}
            }

            let path = self.files.directory(dir).name().to_path_buf();
            if let Some(name) = framework_name(&path) {
                self.stats.frameworks_searched += 1;
                let public = self.probe_framework(&path, name, true);
                let private = self.probe_framework(&path, name, false);

                if public.is_some() || private.is_some() {
                    // Nothing outside the bundle may supply its notes.
                    self.cache.record(dir, CacheEntry::Resolved(None));

                    // Attribute the answer to the header directory the walk
                    // climbed out of, when there is one.
                    let mut terminal = dir;
                    if let Some(&last) = visited.last() {
                        if public == Some(last) || private == Some(last) {
                            visited.pop();
                            terminal = last;
                        }
                    }

                    current = Some(terminal);
                    result = self.cache.resolved(terminal).flatten();
                    break;
                }
            } else {
                self.stats.directories_searched += 1;
                if let Some(file) = locate_ambient_api_notes(self.files, dir) {
                    let reader = self.load(file);
                    if reader.is_some() {
                        self.stats.header_notes_loaded += 1;
                    }
                    self.cache.record(dir, CacheEntry::Resolved(reader));
                    result = reader;
                    break;
                }
            }

            visited.insert(dir);
            current = parent_directory(self.files, &path);
        }

        for &dir in &visited {
            self.cache.compress(dir, current);
        }
        result
    }

    /// Load the public or private notes of the framework at `path`, caching
    /// the reader under its header directory.
    ///
    /// Returns the header directory whenever the notes are actionable, even
    /// if they failed to load.
    fn probe_framework(&mut self, path: &Path, name: &str, public: bool) -> Option<DirectoryId> {
        let notes = locate_framework_api_notes(self.files, path, name, public)?;

        if self.cache.peek(notes.header_dir).is_unresolved() {
            let reader = self.load(notes.notes_file);
            if reader.is_some() {
                if public {
                    self.stats.public_framework_notes_loaded += 1;
                } else {
                    self.stats.private_framework_notes_loaded += 1;
                }
            }
            self.cache
                .record(notes.header_dir, CacheEntry::Resolved(reader));
        } else {
            debug!(
                "Header directory {} already has notes",
                self.files.directory(notes.header_dir).name().display()
            );
        }

        Some(notes.header_dir)
    }

    fn load(&mut self, file: FileId) -> Option<ReaderId> {
        self.loader
            .load_file(self.files, file)
            .map(|reader| self.readers.alloc(reader))
    }
}

/// The directory above `path`, skipping trailing `..` components
fn parent_directory(files: &mut FileManager, path: &Path) -> Option<DirectoryId> {
    let mut parent = path.parent()?;
    while parent.components().next_back() == Some(Component::ParentDir) {
        parent = parent.parent()?;
    }
    if parent.as_os_str().is_empty() {
        return None;
    }
    files.get_directory(parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticHandler;
    use crate::fs::MockFileSystem;
    use crate::notes::YamlNotesCompiler;
    use std::sync::Arc;

    struct Fixture {
        files: FileManager,
        cache: DirectoryCache,
        readers: Arena<NotesReader>,
        loader: NotesLoader,
        stats: Statistics,
    }

    impl Fixture {
        fn new(fs: MockFileSystem) -> Self {
            Self {
                files: FileManager::new(Arc::new(fs)),
                cache: DirectoryCache::new(),
                readers: Arena::new(),
                loader: NotesLoader::new(
                    Box::new(YamlNotesCompiler::new()),
                    Arc::new(CollectingDiagnosticHandler::new()),
                    None,
                ),
                stats: Statistics::default(),
            }
        }

        fn resolve(&mut self, path: &str) -> Option<String> {
            let dir = self.files.get_directory(path).unwrap();
            let reader = ResolutionWalker::new(
                &mut self.files,
                &mut self.cache,
                &mut self.readers,
                &self.loader,
                &mut self.stats,
            )
            .resolve(dir)?;
            Some(self.readers[reader].module_name().to_string())
        }
    }

    #[test]
    fn test_parent_directory_skips_dot_dot() {
        let mut fs = MockFileSystem::new();
        fs.add_dir("/a/b");
        let mut files = FileManager::new(Arc::new(fs));

        let parent = parent_directory(&mut files, Path::new("/a/b/../c")).unwrap();
        assert_eq!(files.directory(parent).name(), Path::new("/a/b"));
        assert!(parent_directory(&mut files, Path::new("/")).is_none());
        assert!(parent_directory(&mut files, Path::new("relative")).is_none());
    }

    #[test]
    fn test_ambient_notes_in_ancestor() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/A/APINotes.apinotes", "Name: A\n");
        fs.add_dir("/A/B/C");
        let mut fixture = Fixture::new(fs);

        assert_eq!(fixture.resolve("/A/B/C").as_deref(), Some("A"));
        assert_eq!(fixture.stats.header_notes_loaded, 1);
        assert_eq!(fixture.stats.directories_searched, 3);
    }

    #[test]
    fn test_compressed_walk_never_probes() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/A/APINotes.apinotes", "Name: A\n");
        fs.add_dir("/A/B/C");
        let mut fixture = Fixture::new(fs);

        fixture.resolve("/A/B/C");
        let probes = fixture.stats.probes();
        let hits = fixture.cache.hits();

        assert_eq!(fixture.resolve("/A/B").as_deref(), Some("A"));
        assert_eq!(fixture.resolve("/A/B/C").as_deref(), Some("A"));
        assert_eq!(fixture.stats.probes(), probes);
        assert!(fixture.cache.hits() > hits);
        assert_eq!(fixture.readers.len(), 1);
    }

    #[test]
    fn test_no_notes_compresses_to_absent() {
        let mut fs = MockFileSystem::new();
        fs.add_dir("/x/y");
        let mut fixture = Fixture::new(fs);

        assert!(fixture.resolve("/x/y").is_none());
        let y = fixture.files.get_directory("/x/y").unwrap();
        assert_eq!(fixture.cache.peek(y), CacheEntry::Resolved(None));
    }

    #[test]
    fn test_framework_header_dir_gets_answer() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/F/Foo.framework/APINotes/Foo.apinotes", "Name: Foo\n");
        fs.add_dir("/F/Foo.framework/Headers/Sub");
        fs.add_dir("/F/Foo.framework/Resources");
        let mut fixture = Fixture::new(fs);

        assert_eq!(
            fixture.resolve("/F/Foo.framework/Headers/Sub").as_deref(),
            Some("Foo")
        );
        assert_eq!(fixture.stats.public_framework_notes_loaded, 1);

        // Inside the bundle but outside Headers: the bundle root answers
        assert!(fixture.resolve("/F/Foo.framework/Resources").is_none());
        assert_eq!(fixture.resolve("/F/Foo.framework/Headers").as_deref(), Some("Foo"));
        assert_eq!(fixture.stats.frameworks_searched, 1);
    }

    #[test]
    fn test_failed_ambient_load_stops_walk() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/A/APINotes.apinotes", "Name: A\n");
        fs.add_file("/A/B/APINotes.apinotes", "Name: [\n");
        let mut fixture = Fixture::new(fs);

        assert!(fixture.resolve("/A/B").is_none());
        assert_eq!(fixture.stats.header_notes_loaded, 0);
    }
}
