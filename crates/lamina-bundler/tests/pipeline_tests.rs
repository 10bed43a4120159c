//! End-to-end builds through the nested Rolldown compile.

mod helpers;

use std::fs;

use helpers::*;
use lamina_bundler::{OutputKind, build};
use lamina_config::{LaminaConfig, OutputFormat};
use serde_json::json;

#[test]
fn greet_module_builds_without_external_imports() {
    let dir = project(&[("lib/greet.ts", "export const greet = () => 'hi'")]);
    let config = standalone_config("lib/greet.ts", &[], &[("out/lib.js", OutputFormat::Module)]);

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");

    let code = fs::read_to_string(dir.path().join("out/lib.js")).unwrap();
    assert_exports(&code, "greet");
    assert_eq!(exported_names(&code), vec!["greet"], "{code}");
    assert!(code.contains("hi"), "{code}");
    assert!(!code.contains("import"), "{code}");
    assert!(!code.contains("require("), "{code}");
}

#[test]
fn export_names_are_read_from_clauses_and_declarations() {
    assert_eq!(exported_names("const e=()=>`hi`;export{e as greet};"), vec!["greet"]);
    assert_eq!(
        exported_names("export const answer = 42;\nexport { a, b as c };"),
        vec!["answer", "a", "c"]
    );
    assert!(exported_names("module.exports = 1;").is_empty());
}

#[test]
fn external_package_stays_referenced_in_archive() {
    let dir = project(&[(
        "lib/handler.ts",
        "import sharp from 'sharp';\nexport const handler = async () => sharp('in.png').resize(10);\n",
    )]);
    let config = standalone_config(
        "lib/handler.ts",
        &["sharp"],
        &[("out/handler.zip", OutputFormat::Module)],
    );

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");
    assert_eq!(report.written().next().unwrap().kind, OutputKind::Archive);

    let entries = read_archive(&dir.path().join("out/handler.zip"));
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, "index.js");
    assert_references_package(&entries[0].1, "sharp");
}

#[test]
fn external_subpath_stays_referenced() {
    let dir = project(&[(
        "lib/upload.ts",
        "import { S3 } from 'aws-sdk/clients/s3';\nexport const client = new S3();\n",
    )]);
    let config = LaminaConfig::from_value(json!({
        "targets": [{
            "entry": "lib/upload.ts",
            "plugins": ["standalone"],
            "outputs": [{ "file": "dist/upload.js" }]
        }]
    }))
    .unwrap();

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");

    let code = fs::read_to_string(dir.path().join("dist/upload.js")).unwrap();
    assert_references_package(&code, "aws-sdk/clients/s3");
}

#[test]
fn non_external_dependency_is_inlined() {
    let dir = project(&[
        (
            "node_modules/leftpad/package.json",
            r#"{ "name": "leftpad", "type": "module", "main": "index.js" }"#,
        ),
        (
            "node_modules/leftpad/index.js",
            "export default function leftpad(s, n) { return String(s).padStart(n, '*'); }\n",
        ),
        (
            "lib/handler.ts",
            "import leftpad from 'leftpad';\nexport const pad = (s: string) => leftpad(s, 8);\n",
        ),
    ]);
    let config = standalone_config(
        "lib/handler.ts",
        &["sharp"],
        &[("dist/handler.js", OutputFormat::Module)],
    );

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");

    let code = fs::read_to_string(dir.path().join("dist/handler.js")).unwrap();
    assert_inlined_package(&code, "leftpad");
    assert!(code.contains("padStart"), "{code}");
}

#[test]
fn relative_imports_and_dynamic_imports_collapse_into_one_file() {
    let dir = project(&[
        ("lib/util.ts", "export const twice = (n: number) => n * 2;\n"),
        ("lib/lazy.ts", "export const lazyValue = 'loaded-lazily';\n"),
        (
            "lib/index.ts",
            "import { twice } from './util';\nexport const run = () => twice(21);\nexport const later = () => import('./lazy');\n",
        ),
    ]);
    let config = standalone_config("lib/index.ts", &[], &[("dist/index.js", OutputFormat::Module)]);

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");

    let dist: Vec<_> = fs::read_dir(dir.path().join("dist")).unwrap().collect();
    assert_eq!(dist.len(), 1);

    let code = fs::read_to_string(dir.path().join("dist/index.js")).unwrap();
    assert!(code.contains("loaded-lazily"), "{code}");
    assert!(!code.contains("./util"), "{code}");
}

#[test]
fn commonjs_output_uses_require_for_externals() {
    let dir = project(&[(
        "lib/handler.ts",
        "import next from 'next';\nexport const handler = () => next({});\n",
    )]);
    let config = standalone_config(
        "lib/handler.ts",
        &["next"],
        &[("dist/handler.cjs", OutputFormat::CommonJs)],
    );

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");

    let code = fs::read_to_string(dir.path().join("dist/handler.cjs")).unwrap();
    assert!(code.contains("require"), "{code}");
    assert_references_package(&code, "next");
}

#[test]
fn rebuilding_produces_identical_artifacts() {
    let dir = project(&[(
        "lib/handler.ts",
        "import sharp from 'sharp';\nexport const handler = () => sharp();\n",
    )]);
    let config = standalone_config(
        "lib/handler.ts",
        &["sharp"],
        &[
            ("dist/handler.zip", OutputFormat::Module),
            ("dist/handler.js", OutputFormat::Module),
        ],
    );

    assert!(build(&config, dir.path()).is_success());
    let zip_first = fs::read(dir.path().join("dist/handler.zip")).unwrap();
    let js_first = fs::read(dir.path().join("dist/handler.js")).unwrap();

    assert!(build(&config, dir.path()).is_success());
    assert_eq!(fs::read(dir.path().join("dist/handler.zip")).unwrap(), zip_first);
    assert_eq!(fs::read(dir.path().join("dist/handler.js")).unwrap(), js_first);
}

#[test]
fn archive_payload_equals_plain_bundle() {
    let dir = project(&[("lib/handler.ts", "export const handler = () => 42;\n")]);
    let config = standalone_config(
        "lib/handler.ts",
        &[],
        &[
            ("dist/handler.zip", OutputFormat::Module),
            ("dist/handler.js", OutputFormat::Module),
        ],
    );

    assert!(build(&config, dir.path()).is_success());

    let plain = fs::read_to_string(dir.path().join("dist/handler.js")).unwrap();
    let entries = read_archive(&dir.path().join("dist/handler.zip"));
    assert_eq!(entries[0].1, plain);
}

#[test]
fn source_map_written_when_enabled() {
    let dir = project(&[("lib/a.ts", "export const a = (x: number) => x + 1;\n")]);
    let config = LaminaConfig::from_value(json!({
        "settings": { "sourcemap": true },
        "targets": [{
            "entry": "lib/a.ts",
            "plugins": ["standalone"],
            "outputs": [{ "file": "dist/a.js" }]
        }]
    }))
    .unwrap();

    assert!(build(&config, dir.path()).is_success());

    let map = fs::read_to_string(dir.path().join("dist/a.js.map")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&map).unwrap();
    assert_eq!(parsed["version"], 3);
}

#[test]
fn json_entry_is_bundled_as_default_export() {
    let dir = project(&[("data/regions.json", r#"{ "primary": "eu-west-1" }"#)]);
    let config = LaminaConfig::from_value(json!({
        "targets": [{
            "entry": "data/regions.json",
            "plugins": ["json", "standalone"],
            "outputs": [{ "file": "dist/regions.js" }]
        }]
    }))
    .unwrap();

    assert!(build(&config, dir.path()).is_success());
    let code = fs::read_to_string(dir.path().join("dist/regions.js")).unwrap();
    assert!(code.contains("eu-west-1"), "{code}");
}

#[test]
fn target_without_plugins_is_compiled() {
    let dir = project(&[("lib/answer.ts", "export const answer: number = 42;\n")]);
    let config = LaminaConfig::from_value(json!({
        "targets": [{
            "entry": "lib/answer.ts",
            "outputs": [{ "file": "dist/answer.js" }]
        }]
    }))
    .unwrap();

    let report = build(&config, dir.path());
    assert!(report.is_success(), "{report:#?}");

    let code = fs::read_to_string(dir.path().join("dist/answer.js")).unwrap();
    assert_exports(&code, "answer");
    assert!(!code.contains(": number"), "{code}");
}
