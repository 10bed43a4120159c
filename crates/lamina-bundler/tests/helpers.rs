//! Shared test utilities for lamina-bundler tests

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use lamina_config::{LaminaConfig, OutputFormat};
use serde_json::json;
use tempfile::TempDir;

/// Create a project directory containing the given files.
pub fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        write_file(dir.path(), path, contents);
    }
    dir
}

pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Single standalone target with one output per `(file, format)` pair.
pub fn standalone_config(
    entry: &str,
    externals: &[&str],
    outputs: &[(&str, OutputFormat)],
) -> LaminaConfig {
    let outputs: Vec<_> = outputs
        .iter()
        .map(|(file, format)| json!({ "file": file, "format": format }))
        .collect();

    LaminaConfig::from_value(json!({
        "settings": { "externals": externals },
        "targets": [{ "entry": entry, "plugins": ["standalone"], "outputs": outputs }]
    }))
    .unwrap()
}

/// Read every entry of a zip archive as `(name, contents)`.
pub fn read_archive(path: &Path) -> Vec<(String, String)> {
    let bytes = fs::read(path).unwrap();
    let mut zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..zip.len())
        .map(|i| {
            let mut entry = zip.by_index(i).unwrap();
            let mut contents = String::new();
            entry.read_to_string(&mut contents).unwrap();
            (entry.name().to_string(), contents)
        })
        .collect()
}

/// Assert that bundled code keeps a runtime reference to `package`.
pub fn assert_references_package(code: &str, package: &str) {
    let double = format!("\"{package}\"");
    let single = format!("'{package}'");
    assert!(
        code.contains(&double) || code.contains(&single),
        "Expected code to reference '{}', but it didn't.\nCode preview (first 500 chars): {}",
        package,
        &code[..code.len().min(500)]
    );
}

/// Assert that bundled code has no runtime reference to `package`.
pub fn assert_inlined_package(code: &str, package: &str) {
    let double = format!("\"{package}\"");
    let single = format!("'{package}'");
    assert!(
        !code.contains(&double) && !code.contains(&single),
        "Expected '{}' to be inlined, but a reference remains.\nCode preview (first 500 chars): {}",
        package,
        &code[..code.len().min(500)]
    );
}

/// Names exported by an ES module through `export { a, b as c }` clauses or
/// `export const|let|var|function|class` declarations.
pub fn exported_names(code: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = code;
    while let Some(at) = rest.find("export") {
        rest = rest[at + "export".len()..].trim_start();
        if let Some(clause) = rest.strip_prefix('{') {
            let Some(end) = clause.find('}') else { break };
            for spec in clause[..end].split(',') {
                let spec = spec.trim();
                let name = spec.rsplit(" as ").next().unwrap_or(spec).trim();
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
            rest = &clause[end..];
            continue;
        }
        for keyword in ["const ", "let ", "var ", "function ", "class "] {
            if let Some(declared) = rest.strip_prefix(keyword) {
                let name: String = declared
                    .trim_start()
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                    .collect();
                names.push(name);
                break;
            }
        }
    }
    names
}

/// Assert that an ES module exports a binding called `name`.
pub fn assert_exports(code: &str, name: &str) {
    let names = exported_names(code);
    assert!(
        names.iter().any(|n| n == name),
        "Expected an export named '{}', found {:?}.\nCode preview (first 500 chars): {}",
        name,
        names,
        &code[..code.len().min(500)]
    );
}
