use apinotes_core::diagnostics::CollectingDiagnosticHandler;
use apinotes_core::fs::RealFileSystem;
use apinotes_core::{ApiNotesManager, ApiNotesOptions, Module, SourceManager};
use indoc::indoc;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn real_manager() -> ApiNotesManager {
    ApiNotesManager::new(
        SourceManager::new(Arc::new(RealFileSystem::new())),
        ApiNotesOptions::default(),
        Arc::new(CollectingDiagnosticHandler::new()),
    )
    .unwrap()
}

#[test]
fn test_ambient_notes_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "include/APINotes.apinotes",
        indoc! {"
            Name: SomeKit
            Classes:
              - Name: SKWidget
                SwiftName: Widget
        "},
    );
    write(root, "include/SomeKit/Widget.h", "");

    let mut manager = real_manager();
    let found = manager.find_api_notes_for_file(root.join("include/SomeKit/Widget.h"));
    assert_eq!(found.len(), 1);
    let notes = found[0]
        .lookup(apinotes_core::EntityKind::Class, "SKWidget")
        .expect("class notes");
    assert_eq!(notes.swift_name.as_deref(), Some("Widget"));
}

#[test]
fn test_framework_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Frameworks/Kit.framework/APINotes/Kit.apinotes", "Name: Kit\n");
    write(root, "Frameworks/Kit.framework/Headers/Kit.h", "");
    write(root, "Frameworks/Loose.h", "");

    let mut manager = real_manager();
    let found = manager.find_api_notes_for_file(root.join("Frameworks/Kit.framework/Headers/Kit.h"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].module_name(), "Kit");

    assert!(manager
        .find_api_notes_for_file(root.join("Frameworks/Loose.h"))
        .is_empty());
}

#[test]
fn test_current_module_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "Kit/Kit.apinotes", "Name: Kit\n");

    let mut manager = real_manager();
    assert!(manager.load_current_module_api_notes(&Module::new("Kit", root.join("Kit")), true, &[]));
    assert_eq!(
        manager.current_module_api_notes_files(),
        &[root.join("Kit/Kit.apinotes")]
    );
}

#[test]
fn test_missing_header_has_no_notes() {
    let temp_dir = TempDir::new().unwrap();
    let mut manager = real_manager();
    assert!(manager
        .find_api_notes_for_file(temp_dir.path().join("nope.h"))
        .is_empty());
}
