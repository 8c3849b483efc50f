use std::path::{Path, PathBuf};

use super::binary::{CompiledNotes, FormatError};
use super::document::{EntityKind, EntityNotes};
use super::VersionTuple;

/// Read-only view over one compiled notes file
#[derive(Debug)]
pub struct NotesReader {
    notes: CompiledNotes,
    swift_version: Option<VersionTuple>,
    content_hash: blake3::Hash,
    source_path: Option<PathBuf>,
}

impl NotesReader {
    /// Parse a compiled buffer.
    ///
    /// `swift_version` selects which `SwiftVersions` block, if any, overrides
    /// the unversioned notes.
    pub fn from_binary(
        buffer: &[u8],
        swift_version: Option<VersionTuple>,
    ) -> Result<Self, FormatError> {
        let notes = CompiledNotes::from_bytes(buffer)?;
        Ok(Self {
            notes,
            swift_version,
            content_hash: blake3::hash(buffer),
            source_path: None,
        })
    }

    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Name of the module the notes describe
    pub fn module_name(&self) -> &str {
        &self.notes.module_name
    }

    /// The notes file this reader was loaded from; `None` for in-memory buffers
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Hash of the compiled buffer; equal hashes mean equal content
    pub fn content_hash(&self) -> &blake3::Hash {
        &self.content_hash
    }

    pub fn swift_version(&self) -> Option<VersionTuple> {
        self.swift_version
    }

    pub fn module_availability(&self) -> Option<&str> {
        self.notes.availability.as_deref()
    }

    pub fn module_availability_msg(&self) -> Option<&str> {
        self.notes.availability_msg.as_deref()
    }

    pub fn swift_infer_import_as_member(&self) -> Option<bool> {
        self.notes.swift_infer_import_as_member
    }

    /// Find notes for a declaration, preferring the block for the selected
    /// Swift version
    pub fn lookup(&self, kind: EntityKind, name: &str) -> Option<&EntityNotes> {
        if let Some(target) = &self.swift_version {
            let versioned = self
                .notes
                .versioned
                .iter()
                .filter(|(version, _)| version.matches(target))
                .find_map(|(_, lists)| lists.lookup(kind, name));
            if versioned.is_some() {
                return versioned;
            }
        }
        self.notes.entities.lookup(kind, name)
    }

    /// Number of unversioned entities
    pub fn entity_count(&self) -> usize {
        self.notes.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticHandler;
    use crate::notes::{NotesCompiler, YamlNotesCompiler};
    use indoc::indoc;

    const SOURCE: &str = indoc! {"
        Name: Widgets
        Classes:
          - Name: NSWidget
            SwiftName: Widget
          - Name: NSGadget
        SwiftVersions:
          - Version: 4
            Classes:
              - Name: NSWidget
                SwiftName: NSWidget
    "};

    fn compiled() -> Vec<u8> {
        let handler = CollectingDiagnosticHandler::new();
        YamlNotesCompiler::new()
            .compile(SOURCE, None, &handler)
            .unwrap()
    }

    #[test]
    fn test_unversioned_lookup() {
        let reader = NotesReader::from_binary(&compiled(), None).unwrap();
        assert_eq!(reader.module_name(), "Widgets");
        assert_eq!(reader.entity_count(), 2);

        let widget = reader.lookup(EntityKind::Class, "NSWidget").unwrap();
        assert_eq!(widget.swift_name.as_deref(), Some("Widget"));
        assert!(reader.lookup(EntityKind::Protocol, "NSWidget").is_none());
    }

    #[test]
    fn test_versioned_lookup_prefers_matching_block() {
        let reader =
            NotesReader::from_binary(&compiled(), Some(VersionTuple::new(4, Some(2)))).unwrap();

        let widget = reader.lookup(EntityKind::Class, "NSWidget").unwrap();
        assert_eq!(widget.swift_name.as_deref(), Some("NSWidget"));

        // Falls back to unversioned notes when the block has no entry
        assert!(reader.lookup(EntityKind::Class, "NSGadget").is_some());
    }

    #[test]
    fn test_other_version_uses_unversioned() {
        let reader =
            NotesReader::from_binary(&compiled(), Some(VersionTuple::new(5, None))).unwrap();
        let widget = reader.lookup(EntityKind::Class, "NSWidget").unwrap();
        assert_eq!(widget.swift_name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_same_buffer_same_hash() {
        let a = NotesReader::from_binary(&compiled(), None).unwrap();
        let b = NotesReader::from_binary(&compiled(), None).unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_corrupt_buffer() {
        assert!(NotesReader::from_binary(b"garbage!", None).is_err());
    }
}
