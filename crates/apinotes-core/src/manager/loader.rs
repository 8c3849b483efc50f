use std::sync::Arc;
use tracing::{info, info_span, warn};

use crate::diagnostics::{error_codes, Diagnostic, DiagnosticHandler, DiagnosticLocation};
use crate::file_manager::{FileId, FileManager};
use crate::notes::{NotesCompiler, NotesReader, VersionTuple};

/// Compiles notes sources and opens readers over the result.
///
/// The loader remembers nothing between calls; loading the same file twice
/// yields two independent readers.
pub struct NotesLoader {
    compiler: Box<dyn NotesCompiler>,
    diagnostics: Arc<dyn DiagnosticHandler>,
    swift_version: Option<VersionTuple>,
}

impl NotesLoader {
    pub fn new(
        compiler: Box<dyn NotesCompiler>,
        diagnostics: Arc<dyn DiagnosticHandler>,
        swift_version: Option<VersionTuple>,
    ) -> Self {
        Self {
            compiler,
            diagnostics,
            swift_version,
        }
    }

    pub fn diagnostics(&self) -> &Arc<dyn DiagnosticHandler> {
        &self.diagnostics
    }

    pub fn swift_version(&self) -> Option<VersionTuple> {
        self.swift_version
    }

    /// Load the notes file `file`
    pub fn load_file(&self, files: &FileManager, file: FileId) -> Option<NotesReader> {
        let path = files.file(file).name();
        let _span = info_span!("load_api_notes", file = %path.display()).entered();

        let source = match files.read_file(file) {
            Ok(source) => source,
            Err(e) => {
                self.diagnostics.report(
                    Diagnostic::error(
                        Some(DiagnosticLocation::file(path)),
                        format!("cannot read API notes file: {}", e),
                    )
                    .with_code(error_codes::NOTES_UNREADABLE),
                );
                return None;
            }
        };

        let reader = self.compile_and_open(&source, Some(path))?;
        info!("Loaded API notes for module '{}'", reader.module_name());
        Some(reader.with_source_path(path))
    }

    /// Load notes supplied as an in-memory buffer
    pub fn load_buffer(&self, source: &str) -> Option<NotesReader> {
        let _span = info_span!("load_api_notes", file = "<buffer>").entered();
        self.compile_and_open(source, None)
    }

    fn compile_and_open(
        &self,
        source: &str,
        origin: Option<&std::path::Path>,
    ) -> Option<NotesReader> {
        let buffer = self.compiler.compile(source, origin, &*self.diagnostics)?;
        match NotesReader::from_binary(&buffer, self.swift_version) {
            Ok(reader) => Some(reader),
            Err(e) => {
                warn!("Compiled API notes could not be read back: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnosticHandler;
    use crate::fs::MockFileSystem;
    use crate::notes::YamlNotesCompiler;

    fn loader(handler: Arc<CollectingDiagnosticHandler>) -> NotesLoader {
        NotesLoader::new(Box::new(YamlNotesCompiler::new()), handler, None)
    }

    #[test]
    fn test_load_file() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/lib/APINotes.apinotes", "Name: Lib\n");
        let mut files = FileManager::new(Arc::new(fs));
        let file = files.get_file("/lib/APINotes.apinotes").unwrap();

        let handler = Arc::new(CollectingDiagnosticHandler::new());
        let reader = loader(handler.clone()).load_file(&files, file).unwrap();

        assert_eq!(reader.module_name(), "Lib");
        assert_eq!(
            reader.source_path(),
            Some(std::path::Path::new("/lib/APINotes.apinotes"))
        );
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_loading_twice_gives_independent_readers() {
        let handler = Arc::new(CollectingDiagnosticHandler::new());
        let loader = loader(handler);

        let a = loader.load_buffer("Name: A\n").unwrap();
        let b = loader.load_buffer("Name: A\n").unwrap();
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_invalid_source_is_absent() {
        let handler = Arc::new(CollectingDiagnosticHandler::new());
        assert!(loader(handler.clone()).load_buffer("Name: [").is_none());
        assert_eq!(handler.error_count(), 1);
    }

    /// Claims every path exists but refuses to read any of them
    struct UnreadableFileSystem;

    impl crate::fs::FileSystem for UnreadableFileSystem {
        fn read_file(&self, _path: &std::path::Path) -> std::io::Result<String> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            ))
        }

        fn is_file(&self, path: &std::path::Path) -> bool {
            path.extension().is_some()
        }

        fn is_dir(&self, path: &std::path::Path) -> bool {
            path.extension().is_none()
        }

        fn canonicalize(&self, path: &std::path::Path) -> std::io::Result<std::path::PathBuf> {
            Ok(path.to_path_buf())
        }
    }

    #[test]
    fn test_unreadable_file_reports() {
        let mut files = FileManager::new(Arc::new(UnreadableFileSystem));
        let file = files.get_file("/lib/APINotes.apinotes").unwrap();

        let handler = Arc::new(CollectingDiagnosticHandler::new());
        assert!(loader(handler.clone()).load_file(&files, file).is_none());

        let diagnostics = handler.get_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(error_codes::NOTES_UNREADABLE));
    }
}
