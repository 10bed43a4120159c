//! End-to-end tests of the `lamina` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, contents) in files {
        let path = dir.path().join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
    dir
}

fn lamina(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lamina").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    for var in ["MINIFY", "SOURCEMAP", "PLATFORM", "EXTERNALS", "ARCHIVE_ENTRY", "PARALLEL", "CWD"] {
        cmd.env_remove(format!("LAMINA_{var}"));
    }
    cmd
}

const CONFIG: &str = r#"
[[targets]]
name = "answer"
entry = "lib/answer.ts"
outputs = [
  { file = "dist/answer.js", format = "cjs" },
  { file = "dist/answer.zip", format = "cjs" },
]
"#;

const ENTRY: &str = "export const answer: number = 42;\n";

#[test]
fn help_lists_commands() {
    Command::cargo_bin("lamina")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_accepts_valid_config() {
    let dir = project(&[("lamina.toml", CONFIG), ("lib/answer.ts", ENTRY)]);

    lamina(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration is valid"));
}

#[test]
fn check_reports_missing_entry() {
    let dir = project(&[("lamina.toml", CONFIG)]);

    lamina(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry module not found"));
}

#[test]
fn check_without_config_fails() {
    let dir = TempDir::new().unwrap();

    lamina(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config not found"));
}

#[test]
fn build_writes_plain_and_archive_outputs() {
    let dir = project(&[("lamina.toml", CONFIG), ("lib/answer.ts", ENTRY)]);

    lamina(dir.path())
        .arg("build")
        .assert()
        .success()
        .stderr(predicate::str::contains("dist/answer.zip"))
        .stderr(predicate::str::contains("Built 2 artifact(s)"));

    let code = fs::read_to_string(dir.path().join("dist/answer.js")).unwrap();
    assert!(code.contains("42"), "{code}");
    assert!(code.contains("answer"), "{code}");
    assert!(!code.contains(": number"), "type annotation survived: {code}");
    assert!(!code.contains("export const"), "ESM syntax in CommonJS output: {code}");
    let archive = fs::read(dir.path().join("dist/answer.zip")).unwrap();
    assert_eq!(&archive[..2], b"PK");
}

#[test]
fn build_json_report_goes_to_stdout() {
    let dir = project(&[("lamina.toml", CONFIG), ("lib/answer.ts", ENTRY)]);

    let output = lamina(dir.path())
        .args(["build", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outputs = report["targets"][0]["outputs"].as_array().unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[1]["kind"], "archive");
    assert_eq!(outputs[1]["format"], "commonjs");
}

#[test]
fn cwd_flag_selects_project() {
    let dir = project(&[
        ("api/lamina.toml", CONFIG),
        ("api/lib/answer.ts", ENTRY),
    ]);

    lamina(dir.path())
        .args(["build", "--cwd", "api"])
        .assert()
        .success();

    assert!(dir.path().join("api/dist/answer.js").exists());
}

#[test]
fn environment_overrides_archive_entry() {
    let dir = project(&[("lamina.toml", CONFIG), ("lib/answer.ts", ENTRY)]);

    lamina(dir.path())
        .env("LAMINA_ARCHIVE_ENTRY", "handler.js")
        .arg("build")
        .assert()
        .success();

    let archive = fs::read(dir.path().join("dist/answer.zip")).unwrap();
    let name = b"handler.js";
    assert!(archive.windows(name.len()).any(|w| w == name));
}

#[test]
fn failed_output_exits_nonzero() {
    let dir = project(&[
        (
            "lamina.toml",
            "[[targets]]\nentry = \"lib/a.js\"\noutputs = [{ file = \"../escape.js\" }]\n",
        ),
        ("lib/a.js", "1;\n"),
    ]);

    lamina(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build failed"));
}

#[test]
fn duplicate_output_rejected_before_build() {
    let dir = project(&[
        (
            "lamina.toml",
            "[[targets]]\nentry = \"lib/a.js\"\noutputs = [{ file = \"dist/a.js\" }]\n\n[[targets]]\nentry = \"lib/b.js\"\noutputs = [{ file = \"dist/a.js\" }]\n",
        ),
        ("lib/a.js", "1;\n"),
        ("lib/b.js", "2;\n"),
    ]);

    lamina(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one build target"));

    assert!(!dir.path().join("dist").exists());
}
