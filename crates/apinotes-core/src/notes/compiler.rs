use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::debug;

use super::binary::CompiledNotes;
use super::document::{EntityKind, EntityLists, NotesDocument};
use super::VersionTuple;
use crate::diagnostics::{error_codes, Diagnostic, DiagnosticHandler, DiagnosticLocation};

/// Availability kinds accepted in notes sources
pub const AVAILABILITY_KINDS: &[&str] = &[
    "available", "none", "nonswift", "iOS", "OSX", "macOS", "tvOS", "watchOS",
];

/// Turns notes source text into the binary form read by [`super::NotesReader`]
pub trait NotesCompiler: Send + Sync {
    /// Compile `source`, reporting problems to `diagnostics`.
    ///
    /// `origin` is the file the text was read from, if any, and is only
    /// used to locate diagnostics. Returns `None` if the source is invalid.
    fn compile(
        &self,
        source: &str,
        origin: Option<&Path>,
        diagnostics: &dyn DiagnosticHandler,
    ) -> Option<Vec<u8>>;
}

/// Compiles YAML notes sources
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlNotesCompiler;

impl YamlNotesCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl NotesCompiler for YamlNotesCompiler {
    fn compile(
        &self,
        source: &str,
        origin: Option<&Path>,
        diagnostics: &dyn DiagnosticHandler,
    ) -> Option<Vec<u8>> {
        let document: NotesDocument = match serde_yaml::from_str(source) {
            Ok(document) => document,
            Err(e) => {
                let location = match e.location() {
                    Some(loc) => DiagnosticLocation::new(origin, loc.line(), loc.column()),
                    None => DiagnosticLocation::new(origin, 0, 0),
                };
                diagnostics.report(
                    Diagnostic::error(Some(location), e.to_string())
                        .with_code(error_codes::NOTES_SYNTAX),
                );
                return None;
            }
        };

        let compiled = validate(document, origin, diagnostics)?;
        match compiled.to_bytes() {
            Ok(bytes) => {
                debug!(
                    "Compiled notes for module '{}' ({} bytes)",
                    compiled.module_name,
                    bytes.len()
                );
                Some(bytes)
            }
            Err(e) => {
                diagnostics.report(
                    Diagnostic::error(origin.map(DiagnosticLocation::file), e.to_string())
                        .with_code(error_codes::NOTES_INVALID),
                );
                None
            }
        }
    }
}

/// Check the semantic rules YAML parsing cannot express.
///
/// Every problem is reported before giving up so one run shows them all.
fn validate(
    document: NotesDocument,
    origin: Option<&Path>,
    diagnostics: &dyn DiagnosticHandler,
) -> Option<CompiledNotes> {
    let mut valid = true;
    let mut invalid = |message: String| {
        diagnostics.report(
            Diagnostic::error(origin.map(DiagnosticLocation::file), message)
                .with_code(error_codes::NOTES_INVALID),
        );
        valid = false;
    };

    if let Some(availability) = &document.availability {
        if !AVAILABILITY_KINDS.contains(&availability.as_str()) {
            invalid(format!(
                "unknown availability '{}' for module '{}'",
                availability, document.name
            ));
        }
    }

    check_entities(&document.entities, &mut invalid);

    let mut versioned = Vec::with_capacity(document.swift_versions.len());
    for block in &document.swift_versions {
        match block.version.parse::<VersionTuple>() {
            Ok(version) => {
                check_entities(&block.entities, &mut invalid);
                versioned.push((version, block.entities.clone()));
            }
            Err(e) => invalid(e.to_string()),
        }
    }

    if !valid {
        return None;
    }

    Some(CompiledNotes {
        module_name: document.name,
        availability: document.availability,
        availability_msg: document.availability_msg,
        swift_infer_import_as_member: document.swift_infer_import_as_member,
        entities: document.entities,
        versioned,
    })
}

fn check_entities(lists: &EntityLists, invalid: &mut impl FnMut(String)) {
    for kind in EntityKind::ALL {
        let mut seen = FxHashSet::default();
        for entity in lists.of_kind(kind) {
            if !seen.insert(entity.name.as_str()) {
                invalid(format!("multiple definitions of {} '{}'", kind, entity.name));
            }
            if let Some(availability) = &entity.availability {
                if !AVAILABILITY_KINDS.contains(&availability.as_str()) {
                    invalid(format!(
                        "unknown availability '{}' for {} '{}'",
                        availability, kind, entity.name
                    ));
                }
            }
        }
    }
}
