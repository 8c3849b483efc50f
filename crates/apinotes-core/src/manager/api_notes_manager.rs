use id_arena::Arena;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ApiNotesOptions;
use crate::diagnostics::DiagnosticHandler;
use crate::errors::Result;
use crate::module::Module;
use crate::notes::{NotesCompiler, NotesReader, YamlNotesCompiler};
use crate::source::{SourceLocation, SourceManager};

use super::current_module::{
    current_module_api_notes, CurrentModuleReaders, CurrentModuleSearch,
    MAX_CURRENT_MODULE_READERS,
};
use super::directory_cache::DirectoryCache;
use super::loader::NotesLoader;
use super::statistics::Statistics;
use super::walker::ResolutionWalker;

/// Finds, loads and caches the API notes that govern each header.
///
/// Every notes file is loaded at most once per manager; readers live as long
/// as the manager does.
pub struct ApiNotesManager {
    /// Files and source locations owned by the host
    sources: SourceManager,

    loader: NotesLoader,

    /// Readers reached through implicit lookup
    readers: Arena<NotesReader>,

    cache: DirectoryCache,

    /// Readers for the module being compiled; these bypass the cache
    current_module: CurrentModuleReaders,

    /// Notes files the current module's readers came from
    current_module_files: Vec<PathBuf>,

    options: ApiNotesOptions,

    stats: Statistics,
}

impl ApiNotesManager {
    /// Create a manager that compiles YAML notes sources
    ///
    /// Fails if `options.swift_version` is not a valid version.
    pub fn new(
        sources: SourceManager,
        options: ApiNotesOptions,
        diagnostics: Arc<dyn DiagnosticHandler>,
    ) -> Result<Self> {
        Self::with_compiler(
            sources,
            options,
            diagnostics,
            Box::new(YamlNotesCompiler::new()),
        )
    }

    /// Create a manager with a custom notes compiler
    pub fn with_compiler(
        sources: SourceManager,
        options: ApiNotesOptions,
        diagnostics: Arc<dyn DiagnosticHandler>,
        compiler: Box<dyn NotesCompiler>,
    ) -> Result<Self> {
        let swift_version = options.parsed_swift_version()?;
        Ok(Self {
            sources,
            loader: NotesLoader::new(compiler, diagnostics, swift_version),
            readers: Arena::new(),
            cache: DirectoryCache::new(),
            current_module: CurrentModuleReaders::new(),
            current_module_files: Vec::new(),
            options,
            stats: Statistics::default(),
        })
    }

    /// Find the notes that apply to the header containing `loc`.
    ///
    /// Once readers for the current module are established they are the
    /// answer for every location.
    pub fn find_api_notes(&mut self, loc: SourceLocation) -> Vec<&NotesReader> {
        if !self.current_module.is_empty() {
            return self.current_module.iter().collect();
        }

        if !self.options.implicit_api_notes || !loc.is_valid() {
            return Vec::new();
        }

        // Notes belong to the file a macro was expanded in, not where it was
        // spelled.
        let expansion = self.sources.expansion_loc(loc);
        let Some(file) = self.sources.file_for_location(expansion) else {
            return Vec::new();
        };
        let dir = self.sources.file_manager().file(file).dir();

        let reader = ResolutionWalker::new(
            self.sources.file_manager_mut(),
            &mut self.cache,
            &mut self.readers,
            &self.loader,
            &mut self.stats,
        )
        .resolve(dir);

        reader.map(|id| &self.readers[id]).into_iter().collect()
    }

    /// Find the notes for the header at `path`, registering it as a source
    /// file first. Returns nothing if the file does not exist.
    pub fn find_api_notes_for_file(&mut self, path: impl AsRef<Path>) -> Vec<&NotesReader> {
        match self.sources.load_file(path) {
            Some(loc) => self.find_api_notes(loc),
            None => Vec::new(),
        }
    }

    /// Load the notes for `module`, the module being compiled.
    ///
    /// Returns whether any notes file was loaded.
    ///
    /// # Panics
    ///
    /// Panics if readers for the current module were already established.
    pub fn load_current_module_api_notes(
        &mut self,
        module: &Module,
        look_in_module: bool,
        search_paths: &[PathBuf],
    ) -> bool {
        assert!(
            self.current_module.is_empty(),
            "API notes for the current module were already loaded"
        );

        let search = CurrentModuleSearch {
            look_in_module,
            search_paths,
            private_naming: self.options.private_notes_naming,
            diagnostics: &**self.loader.diagnostics(),
        };
        let files = current_module_api_notes(self.sources.file_manager_mut(), module, &search);

        let mut readers = Vec::with_capacity(files.len());
        for file in files {
            let file_manager = self.sources.file_manager();
            if let Some(reader) = self.loader.load_file(file_manager, file) {
                self.current_module_files
                    .push(file_manager.file(file).name().to_path_buf());
                readers.push(reader);
            }
        }

        let loaded = self.current_module.populate(readers);
        if loaded > 0 {
            info!(
                "Loaded {} API notes file(s) for current module '{}'",
                loaded, module.name
            );
        } else {
            debug!("No API notes for current module '{}'", module.name);
        }
        loaded > 0
    }

    /// Use in-memory notes sources as the current module's notes.
    ///
    /// Returns whether any buffer compiled.
    ///
    /// # Panics
    ///
    /// Panics if more than two buffers are given or readers for the current
    /// module were already established.
    pub fn load_current_module_api_notes_from_buffers(&mut self, buffers: &[&str]) -> bool {
        assert!(
            buffers.len() <= MAX_CURRENT_MODULE_READERS,
            "the current module has at most {} API notes readers",
            MAX_CURRENT_MODULE_READERS
        );
        let readers: Vec<_> = buffers
            .iter()
            .filter_map(|buffer| self.loader.load_buffer(buffer))
            .collect();
        self.current_module.populate(readers) > 0
    }

    pub fn current_module_readers(&self) -> Vec<&NotesReader> {
        self.current_module.iter().collect()
    }

    /// Notes files loaded for the current module
    pub fn current_module_api_notes_files(&self) -> &[PathBuf] {
        &self.current_module_files
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            directory_cache_hits: self.cache.hits(),
            directory_cache_misses: self.cache.misses(),
            ..self.stats
        }
    }

    pub fn source_manager(&self) -> &SourceManager {
        &self.sources
    }

    pub fn source_manager_mut(&mut self) -> &mut SourceManager {
        &mut self.sources
    }

    pub fn options(&self) -> &ApiNotesOptions {
        &self.options
    }
}
