//! Descriptor and snapshot loading against real files.

use camino::{Utf8Path, Utf8PathBuf};
use codefix_receipts::{ReceiptLoadError, expand_sources, load_analysis, load_descriptor};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn temp_root() -> (TempDir, Utf8PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
    (temp, root)
}

fn write(root: &Utf8Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, contents).expect("write");
}

#[test]
fn descriptor_defaults_root_to_its_directory() {
    let (_temp, root) = temp_root();
    write(&root, "project.toml", "sources = [\"src/*.ts\"]\n");

    let descriptor = load_descriptor(&root.join("project.toml")).expect("load");
    assert_eq!(descriptor.root_dir(), root);
    assert_eq!(descriptor.sources, vec!["src/*.ts".to_string()]);
    assert_eq!(descriptor.analysis_path(), root.join("codefix.analysis.json"));
}

#[test]
fn descriptor_resolves_relative_root_and_analysis() {
    let (_temp, root) = temp_root();
    write(
        &root,
        "config/project.toml",
        "root = \"..\"\nsources = [\"src/**/*.ts\"]\nanalysis = \"artifacts/analysis.json\"\n",
    );

    let descriptor = load_descriptor(&root.join("config/project.toml")).expect("load");
    assert_eq!(descriptor.root_dir(), root.join("config").join(".."));
    assert_eq!(
        descriptor.analysis_path(),
        root.join("config").join("..").join("artifacts/analysis.json")
    );
}

#[test]
fn missing_descriptor_is_io_error() {
    let (_temp, root) = temp_root();
    let err = load_descriptor(&root.join("nope.toml")).expect_err("missing");
    assert!(matches!(err, ReceiptLoadError::Io { .. }));
}

#[test]
fn invalid_descriptor_is_toml_error() {
    let (_temp, root) = temp_root();
    write(&root, "project.toml", "sources = [unterminated\n");
    let err = load_descriptor(&root.join("project.toml")).expect_err("invalid");
    assert!(matches!(err, ReceiptLoadError::Toml { .. }));
}

#[test]
fn expand_sources_sorts_and_dedups() {
    let (_temp, root) = temp_root();
    write(&root, "src/b.ts", "b");
    write(&root, "src/a.ts", "a");
    write(&root, "src/nested/c.ts", "c");
    write(&root, "src/readme.md", "skip");

    let files = expand_sources(
        &root,
        &["src/**/*.ts".to_string(), "src/*.ts".to_string()],
    )
    .expect("expand");

    assert_eq!(
        files,
        vec![
            Utf8PathBuf::from("src/a.ts"),
            Utf8PathBuf::from("src/b.ts"),
            Utf8PathBuf::from("src/nested/c.ts"),
        ]
    );
}

#[test]
fn expand_sources_rejects_bad_pattern() {
    let (_temp, root) = temp_root();
    let err = expand_sources(&root, &["src/[".to_string()]).expect_err("bad pattern");
    assert!(matches!(err, ReceiptLoadError::Pattern { .. }));
}

#[test]
fn load_analysis_reads_snapshot() {
    let (_temp, root) = temp_root();
    write(
        &root,
        "analysis.json",
        r#"{
            "schema": "codefix.analysis.v1",
            "diagnostics": [{ "file": "src/a.ts", "start": 0, "length": 1, "code": 7 }],
            "fixes": []
        }"#,
    );

    let receipt = load_analysis(&root.join("analysis.json")).expect("load");
    assert_eq!(receipt.diagnostics.len(), 1);
    assert_eq!(receipt.diagnostics[0].code, 7);
}

#[test]
fn load_analysis_reports_json_errors() {
    let (_temp, root) = temp_root();
    write(&root, "analysis.json", "{ not json");
    let err = load_analysis(&root.join("analysis.json")).expect_err("bad json");
    assert!(matches!(err, ReceiptLoadError::Json { .. }));
}
