//! Notes for the module being compiled, found by module name rather than by
//! walking directories.

use std::path::PathBuf;
use tracing::debug;

use super::framework::{find_api_notes_file, PRIVATE_HEADERS_DIR, PUBLIC_HEADERS_DIR};
use crate::config::StrictLevel;
use crate::diagnostics::{error_codes, Diagnostic, DiagnosticHandler, DiagnosticLocation};
use crate::file_manager::{DirectoryId, FileId, FileManager};
use crate::module::Module;
use crate::notes::{NotesReader, PRIVATE_SUFFIX};

/// Maximum number of readers for the current module: public and private
pub const MAX_CURRENT_MODULE_READERS: usize = 2;

/// Readers for the current module, established at most once
#[derive(Debug, Default)]
pub struct CurrentModuleReaders {
    slots: [Option<NotesReader>; MAX_CURRENT_MODULE_READERS],
}

impl CurrentModuleReaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the slots from `readers`.
    ///
    /// # Panics
    ///
    /// Panics if the slots were already populated or more than two readers
    /// are given.
    pub fn populate(&mut self, readers: impl IntoIterator<Item = NotesReader>) -> usize {
        assert!(
            self.is_empty(),
            "API notes for the current module were already loaded"
        );
        let mut count = 0;
        for reader in readers {
            assert!(
                count < MAX_CURRENT_MODULE_READERS,
                "the current module has at most {} API notes readers",
                MAX_CURRENT_MODULE_READERS
            );
            self.slots[count] = Some(reader);
            count += 1;
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotesReader> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

/// Where to look for the current module's notes and how strict to be about
/// their names
pub struct CurrentModuleSearch<'a> {
    pub look_in_module: bool,
    pub search_paths: &'a [PathBuf],
    pub private_naming: StrictLevel,
    pub diagnostics: &'a dyn DiagnosticHandler,
}

/// Find the notes files for `module`: beside the module first, then in the
/// search paths.
pub fn current_module_api_notes(
    files: &mut FileManager,
    module: &Module,
    search: &CurrentModuleSearch<'_>,
) -> Vec<FileId> {
    let name = module.top_level_name();
    let mut found = Vec::with_capacity(MAX_CURRENT_MODULE_READERS);
    let wants_private = module.module_map_is_private || module.has_private_submodules();

    if search.look_in_module {
        let mut try_notes = |files: &mut FileManager, dir: DirectoryId, want_public: bool| {
            if let Some(file) = find_api_notes_file(files, dir, name, want_public) {
                if !want_public {
                    check_private_api_notes_name(files, file, module, search);
                }
                found.push(file);
            }
        };

        if module.is_framework {
            // Public modules: Headers/Foo.apinotes, plus
            // PrivateHeaders/Foo_private.apinotes with private submodules.
            // Private modules: PrivateHeaders/Foo.apinotes.
            if !module.module_map_is_private {
                if let Some(dir) = files.get_directory(module.directory().join(PUBLIC_HEADERS_DIR)) {
                    try_notes(files, dir, true);
                }
            }
            if wants_private {
                if let Some(dir) = files.get_directory(module.directory().join(PRIVATE_HEADERS_DIR))
                {
                    try_notes(files, dir, module.module_map_is_private);
                }
            }
        } else if let Some(dir) = files.get_directory(module.directory()) {
            try_notes(files, dir, true);
            if wants_private {
                try_notes(files, dir, false);
            }
        }

        if !found.is_empty() {
            return found;
        }
    }

    for path in search.search_paths {
        let Some(dir) = files.get_directory(path) else {
            debug!("Skipping missing API notes search path {}", path.display());
            continue;
        };
        if let Some(file) = find_api_notes_file(files, dir, name, true) {
            found.push(file);
            break;
        }
    }
    found
}

/// Warn when a private notes file's real name lacks the `_private` suffix.
///
/// The file is used either way.
pub fn check_private_api_notes_name(
    files: &FileManager,
    file: FileId,
    module: &Module,
    search: &CurrentModuleSearch<'_>,
) {
    let Some(real_path) = files.file(file).real_path() else {
        return;
    };
    let Some(real_name) = real_path.file_name().and_then(|n| n.to_str()) else {
        return;
    };
    let stem = real_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(real_name);
    if stem.ends_with(PRIVATE_SUFFIX) {
        return;
    }

    let (level, code) = if module.is_system {
        (
            search.private_naming.escalated(),
            error_codes::PRIVATE_NOTES_NAME_SYSTEM,
        )
    } else {
        (search.private_naming, error_codes::PRIVATE_NOTES_NAME)
    };
    let location = Some(DiagnosticLocation::file(real_path));
    let message = format!(
        "private API notes file for module '{}' should be named '{}{}.apinotes', not '{}'",
        module.name, module.name, PRIVATE_SUFFIX, real_name
    );

    let diagnostic = match level {
        StrictLevel::Off => return,
        StrictLevel::Warning => Diagnostic::warning(location, message),
        StrictLevel::Error => Diagnostic::error(location, message),
    };
    search.diagnostics.report(diagnostic.with_code(code));
}
