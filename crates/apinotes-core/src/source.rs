//! Source locations and the files they point into.

use std::sync::Arc;

use crate::file_manager::{FileId, FileManager};
use crate::fs::FileSystem;

/// Identifies one registered source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceFileId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LocationKind {
    Invalid,
    File { file: SourceFileId, offset: u32 },
    Macro { expansion: u32 },
}

/// A position in a registered source file or inside a macro expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation(LocationKind);

impl SourceLocation {
    pub fn invalid() -> Self {
        Self(LocationKind::Invalid)
    }

    pub fn is_valid(self) -> bool {
        !matches!(self.0, LocationKind::Invalid)
    }

    pub fn is_macro(self) -> bool {
        matches!(self.0, LocationKind::Macro { .. })
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::invalid()
    }
}

#[derive(Debug, Clone, Copy)]
struct ExpansionInfo {
    spelling: SourceLocation,
    expansion: SourceLocation,
}

/// Maps source locations back to files
pub struct SourceManager {
    files: FileManager,
    sources: Vec<FileId>,
    expansions: Vec<ExpansionInfo>,
}

impl SourceManager {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self::with_file_manager(FileManager::new(fs))
    }

    pub fn with_file_manager(files: FileManager) -> Self {
        Self {
            files,
            sources: Vec::new(),
            expansions: Vec::new(),
        }
    }

    pub fn file_manager(&self) -> &FileManager {
        &self.files
    }

    pub fn file_manager_mut(&mut self) -> &mut FileManager {
        &mut self.files
    }

    /// Register a file as a source buffer
    pub fn create_file_id(&mut self, file: FileId) -> SourceFileId {
        if let Some(index) = self.sources.iter().position(|&f| f == file) {
            return SourceFileId(index as u32);
        }
        self.sources.push(file);
        SourceFileId((self.sources.len() - 1) as u32)
    }

    /// Look up `path` and register it, returning the location of its first byte
    pub fn load_file(&mut self, path: impl AsRef<std::path::Path>) -> Option<SourceLocation> {
        let file = self.files.get_file(path)?;
        let id = self.create_file_id(file);
        Some(self.location(id, 0))
    }

    pub fn location(&self, file: SourceFileId, offset: u32) -> SourceLocation {
        SourceLocation(LocationKind::File { file, offset })
    }

    /// Record a macro expansion whose text was spelled at `spelling` and
    /// expanded at `expansion`
    pub fn create_expansion_loc(
        &mut self,
        spelling: SourceLocation,
        expansion: SourceLocation,
    ) -> SourceLocation {
        self.expansions.push(ExpansionInfo {
            spelling,
            expansion,
        });
        SourceLocation(LocationKind::Macro {
            expansion: (self.expansions.len() - 1) as u32,
        })
    }

    /// Walk out of macro expansions to the file location that triggered them
    pub fn expansion_loc(&self, mut loc: SourceLocation) -> SourceLocation {
        while let LocationKind::Macro { expansion } = loc.0 {
            match self.expansions.get(expansion as usize) {
                Some(info) => loc = info.expansion,
                None => return SourceLocation::invalid(),
            }
        }
        loc
    }

    /// Where the text at a macro location was written
    pub fn spelling_loc(&self, mut loc: SourceLocation) -> SourceLocation {
        while let LocationKind::Macro { expansion } = loc.0 {
            match self.expansions.get(expansion as usize) {
                Some(info) => loc = info.spelling,
                None => return SourceLocation::invalid(),
            }
        }
        loc
    }

    /// The file a (non-macro) location points into
    pub fn file_for_location(&self, loc: SourceLocation) -> Option<FileId> {
        match self.expansion_loc(loc).0 {
            LocationKind::File { file, .. } => self.sources.get(file.0 as usize).copied(),
            _ => None,
        }
    }

    pub fn offset(&self, loc: SourceLocation) -> Option<u32> {
        match self.expansion_loc(loc).0 {
            LocationKind::File { offset, .. } => Some(offset),
            _ => None,
        }
    }
}
