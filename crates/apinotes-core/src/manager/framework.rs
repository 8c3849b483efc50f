//! Where notes files live relative to headers, frameworks and modules.

use std::path::Path;

use crate::file_manager::{DirectoryId, FileId, FileManager};
use crate::notes::{AMBIENT_NOTES_BASENAME, PRIVATE_SUFFIX, SOURCE_APINOTES_EXTENSION};

/// Directory extension that marks a framework bundle
pub const FRAMEWORK_EXTENSION: &str = "framework";

/// Framework subdirectory holding notes files
pub const FRAMEWORK_NOTES_DIR: &str = "APINotes";
pub const PUBLIC_HEADERS_DIR: &str = "Headers";
pub const PRIVATE_HEADERS_DIR: &str = "PrivateHeaders";

/// A framework notes file together with the header directory it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkNotes {
    pub notes_file: FileId,
    pub header_dir: DirectoryId,
}

/// The name of the framework `path` names, if it is a framework bundle
pub fn framework_name(path: &Path) -> Option<&str> {
    if path.extension().and_then(|e| e.to_str()) != Some(FRAMEWORK_EXTENSION) {
        return None;
    }
    path.file_stem().and_then(|s| s.to_str())
}

/// `<basename>.apinotes`, or `<basename>_private.apinotes` when not public
pub fn notes_file_name(basename: &str, want_public: bool) -> String {
    let suffix = if want_public { "" } else { PRIVATE_SUFFIX };
    format!("{}{}.{}", basename, suffix, SOURCE_APINOTES_EXTENSION)
}

/// Look for `<basename>[_private].apinotes` directly inside `directory`
pub fn find_api_notes_file(
    files: &mut FileManager,
    directory: DirectoryId,
    basename: &str,
    want_public: bool,
) -> Option<FileId> {
    let path = files
        .directory(directory)
        .name()
        .join(notes_file_name(basename, want_public));
    files.get_file(path)
}

/// Look for `<framework>/APINotes/<name>[_private].apinotes`.
///
/// The notes only count when the matching `Headers` or `PrivateHeaders`
/// directory exists too; orphaned notes are never reported.
pub fn locate_framework_api_notes(
    files: &mut FileManager,
    framework_path: &Path,
    framework_name: &str,
    public: bool,
) -> Option<FrameworkNotes> {
    let notes_path = framework_path
        .join(FRAMEWORK_NOTES_DIR)
        .join(notes_file_name(framework_name, public));
    let notes_file = files.get_file(notes_path)?;

    let headers = if public {
        PUBLIC_HEADERS_DIR
    } else {
        PRIVATE_HEADERS_DIR
    };
    let header_dir = files.get_directory(framework_path.join(headers))?;

    Some(FrameworkNotes {
        notes_file,
        header_dir,
    })
}

/// Look for the directory-wide `APINotes.apinotes` inside `directory`
pub fn locate_ambient_api_notes(files: &mut FileManager, directory: DirectoryId) -> Option<FileId> {
    let path = files.directory(directory).name().join(format!(
        "{}.{}",
        AMBIENT_NOTES_BASENAME, SOURCE_APINOTES_EXTENSION
    ));
    files.get_file(path)
}
