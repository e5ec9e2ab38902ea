//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the core and the TUI MUST NOT call sleep
//! methods. Typewriters are advanced by elapsed time and poem requests are
//! awaited, so nothing needs to sleep.
//! **Exceptions**: Frame rate limiting (TUI app loop only), test code

use std::path::Path;

use architectural_enforcement::{code_part, production_lines, rust_files};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nCRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  {violation}");
        }

        eprintln!("\nACCEPTABLE sleep uses:");
        eprintln!("  - Frame rate limiting in the TUI app loop");
        eprintln!("  - Test code (#[cfg(test)] modules, tests/ directories)");
        eprintln!("\nFORBIDDEN:");
        eprintln!("  - Sleep to pace typewriters (advance by elapsed time instead)");
        eprintln!("  - Sleep to wait for a poem request (await or poll the handle)");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();

    // Check core production code
    for path in rust_files("core/src") {
        check_file(&path, &mut violations, &SleepPolicy { allow_frame_limiting: false });
    }

    // Check TUI production code
    for path in rust_files("tui/src") {
        check_file(&path, &mut violations, &SleepPolicy { allow_frame_limiting: true });
    }

    violations
}

struct SleepPolicy {
    allow_frame_limiting: bool,
}

fn check_file(path: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let lines = production_lines(path);

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        if !(code.contains("::sleep(") || code.contains(".sleep(")) {
            continue;
        }

        // Frame limiting is only allowed in the TUI app loop
        if policy.allow_frame_limiting
            && path.ends_with("tui/src/app.rs")
            && is_frame_limiting_context(&lines, idx)
        {
            continue;
        }

        violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
    }
}

/// Check if sleep is used for frame rate limiting (acceptable in TUI)
fn is_frame_limiting_context(lines: &[String], current_idx: usize) -> bool {
    // Look for frame or FPS in nearby lines
    let context_range = current_idx.saturating_sub(10)..std::cmp::min(current_idx + 5, lines.len());

    lines[context_range].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps")
    })
}

#[test]
fn test_frame_limiting_detection() {
    let lines: Vec<String> = [
        "// Frame rate limiting",
        "let elapsed = start.elapsed();",
        "tokio::time::sleep(d).await;",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert!(is_frame_limiting_context(&lines, 2));

    let lines: Vec<String> = ["loop {", "tokio::time::sleep(d).await;"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(!is_frame_limiting_context(&lines, 1));
}
