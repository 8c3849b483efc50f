pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod file_manager;
pub mod fs;
pub mod manager;
pub mod module;
pub mod notes;
pub mod source;

pub use config::{ApiNotesConfig, ApiNotesOptions, CliOverrides, StrictLevel};
pub use diagnostics::{
    error_codes, CollectingDiagnosticHandler, ConsoleDiagnosticHandler, Diagnostic,
    DiagnosticCode, DiagnosticHandler, DiagnosticLevel, DiagnosticLocation,
};
pub use errors::{ApiNotesError, Result};
pub use file_manager::{DirectoryId, FileId, FileManager};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use manager::{ApiNotesManager, Statistics};
pub use module::Module;
pub use notes::{EntityKind, NotesReader, VersionTuple};
pub use source::{SourceLocation, SourceManager};
