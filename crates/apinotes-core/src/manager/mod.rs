//! Resolution and caching of API notes.
//!
//! Implicit lookup walks from a header's directory toward the root, probing
//! framework bundles and directory-wide `APINotes.apinotes` files, and caches
//! every answer by directory. Notes for the module being compiled are found
//! by name instead and take precedence over everything else.

mod api_notes_manager;
mod current_module;
mod directory_cache;
mod framework;
mod loader;
mod statistics;
mod walker;

pub use api_notes_manager::ApiNotesManager;
pub use current_module::{
    check_private_api_notes_name, current_module_api_notes, CurrentModuleReaders,
    CurrentModuleSearch, MAX_CURRENT_MODULE_READERS,
};
pub use directory_cache::{CacheEntry, DirectoryCache, ReaderId};
pub use framework::{
    find_api_notes_file, framework_name, locate_ambient_api_notes, locate_framework_api_notes,
    notes_file_name, FrameworkNotes, FRAMEWORK_EXTENSION, FRAMEWORK_NOTES_DIR,
    PRIVATE_HEADERS_DIR, PUBLIC_HEADERS_DIR,
};
pub use loader::NotesLoader;
pub use statistics::Statistics;
pub use walker::ResolutionWalker;
