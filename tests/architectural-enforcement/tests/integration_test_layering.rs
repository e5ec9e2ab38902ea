//! Integration Test: Core/Surface Layering
//!
//! **Policy**: `doomsday-core` is headless. It must not depend on, or import,
//! any terminal or UI crate, so it can run under tests and other surfaces.
//! Its production code also never panics on `unwrap()`/`expect()`; failures
//! are propagated or absorbed into fallback poems.

use std::fs;

use architectural_enforcement::{code_part, production_lines, rust_files, workspace_root};

/// Crates that belong to the terminal surface only
const UI_CRATES: &[&str] = &["ratatui", "crossterm", "textwrap", "unicode-width"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("core").join("Cargo.toml"))
        .expect("core/Cargo.toml should be readable");

    let violations: Vec<&str> = manifest
        .lines()
        .map(|line| code_part(line).trim())
        .filter(|line| {
            UI_CRATES
                .iter()
                .any(|krate| line.starts_with(&format!("{krate} ")) || line.starts_with(&format!("{krate}=")))
        })
        .collect();

    assert!(
        violations.is_empty(),
        "core/Cargo.toml depends on UI crates: {violations:?}"
    );
}

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_files("core/src") {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            let code = code_part(line);
            for krate in UI_CRATES {
                let ident = krate.replace('-', "_");
                if code.contains(&format!("{ident}::")) {
                    violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "core imports UI crates:\n  {}",
        violations.join("\n  ")
    );
}

#[test]
fn test_no_unwrap_in_production_code() {
    let mut violations = Vec::new();

    for dir in ["core/src", "tui/src"] {
        for path in rust_files(dir) {
            for (idx, line) in production_lines(&path).iter().enumerate() {
                let code = code_part(line);
                if code.contains(".unwrap()") || code.contains(".expect(") {
                    violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "unwrap()/expect() in production code:\n  {}",
        violations.join("\n  ")
    );
}
