//! Notes sources, their compiled binary form, and the reader over it.

mod binary;
mod compiler;
mod document;
mod reader;
mod version;

pub use binary::{CompiledNotes, FormatError, FORMAT_VERSION_MAJOR, FORMAT_VERSION_MINOR};
pub use compiler::{NotesCompiler, YamlNotesCompiler, AVAILABILITY_KINDS};
pub use document::{EntityKind, EntityLists, EntityNotes, NotesDocument, VersionedNotes};
pub use reader::NotesReader;
pub use version::VersionTuple;

/// Extension of notes source files
pub const SOURCE_APINOTES_EXTENSION: &str = "apinotes";

/// Base name of the directory-wide notes file used by implicit lookup
pub const AMBIENT_NOTES_BASENAME: &str = "APINotes";

/// Suffix appended to the base name of private notes files
pub const PRIVATE_SUFFIX: &str = "_private";
