use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}

/// Stable identifier for a class of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub code: &'static str,
    pub name: &'static str,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

pub mod error_codes {
    use super::DiagnosticCode;

    pub const NOTES_SYNTAX: DiagnosticCode = DiagnosticCode {
        code: "E001",
        name: "apinotes-syntax",
    };
    pub const NOTES_INVALID: DiagnosticCode = DiagnosticCode {
        code: "E002",
        name: "apinotes-invalid",
    };
    pub const NOTES_UNREADABLE: DiagnosticCode = DiagnosticCode {
        code: "E003",
        name: "apinotes-unreadable",
    };
    pub const PRIVATE_NOTES_NAME: DiagnosticCode = DiagnosticCode {
        code: "W001",
        name: "apinotes-private-case",
    };
    pub const PRIVATE_NOTES_NAME_SYSTEM: DiagnosticCode = DiagnosticCode {
        code: "W002",
        name: "apinotes-private-case-system",
    };
}

/// Where in a notes source file a diagnostic points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLocation {
    pub file: Option<PathBuf>,
    /// 1-based; 0 when unknown
    pub line: usize,
    /// 1-based; 0 when unknown
    pub column: usize,
}

impl DiagnosticLocation {
    pub fn new(file: Option<&Path>, line: usize, column: usize) -> Self {
        Self {
            file: file.map(Path::to_path_buf),
            line,
            column,
        }
    }

    pub fn file(file: &Path) -> Self {
        Self::new(Some(file), 0, 0)
    }
}

impl fmt::Display for DiagnosticLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}", file.display())?,
            None => write!(f, "<buffer>")?,
        }
        if self.line > 0 {
            write!(f, ":{}:{}", self.line, self.column)?;
        }
        Ok(())
    }
}

/// A diagnostic message with location and severity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: Option<DiagnosticCode>,
    pub location: Option<DiagnosticLocation>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        level: DiagnosticLevel,
        location: Option<DiagnosticLocation>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            code: None,
            location,
            message: message.into(),
        }
    }

    pub fn error(location: Option<DiagnosticLocation>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, location, message)
    }

    pub fn warning(location: Option<DiagnosticLocation>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, location, message)
    }

    pub fn info(location: Option<DiagnosticLocation>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, location, message)
    }

    pub fn with_code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Info => "info",
        };
        if let Some(location) = &self.location {
            write!(f, "{}: ", location)?;
        }
        write!(f, "{}", level)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Trait for handling diagnostics
/// This allows for dependency injection and testing with mock handlers
pub trait DiagnosticHandler: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    fn error(&self, location: Option<DiagnosticLocation>, message: &str) {
        self.report(Diagnostic::error(location, message));
    }

    fn warning(&self, location: Option<DiagnosticLocation>, message: &str) {
        self.report(Diagnostic::warning(location, message));
    }

    fn info(&self, location: Option<DiagnosticLocation>, message: &str) {
        self.report(Diagnostic::info(location, message));
    }

    fn has_errors(&self) -> bool;
    fn error_count(&self) -> usize;
    fn warning_count(&self) -> usize;
    fn get_diagnostics(&self) -> Vec<Diagnostic>;
}

fn count_level(diagnostics: &Mutex<Vec<Diagnostic>>, level: DiagnosticLevel) -> usize {
    diagnostics
        .lock()
        .map(|d| d.iter().filter(|d| d.level == level).count())
        .unwrap_or(0)
}

/// Console-based diagnostic handler that prints to stderr
pub struct ConsoleDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
    pretty: bool,
}

impl ConsoleDiagnosticHandler {
    pub fn new(pretty: bool) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            pretty,
        }
    }
}

impl DiagnosticHandler for ConsoleDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        if self.pretty {
            eprintln!("\x1b[1m{}\x1b[0m", diagnostic);
        } else {
            eprintln!("{}", diagnostic);
        }

        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Warning)
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

/// Collecting diagnostic handler for testing
/// Collects all diagnostics without printing
pub struct CollectingDiagnosticHandler {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticHandler {
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
        }
    }
}

impl Default for CollectingDiagnosticHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticHandler for CollectingDiagnosticHandler {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn error_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Error)
    }

    fn warning_count(&self) -> usize {
        count_level(&self.diagnostics, DiagnosticLevel::Warning)
    }

    fn get_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}
