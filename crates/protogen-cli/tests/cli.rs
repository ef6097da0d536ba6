//! End-to-end tests for the protogen binary.

use assert_cmd::Command;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[[types]]
name = "Item"
conventions = ["rich-record"]
fields = [{ name = "name", type = "str" }]

[[types]]
name = "Box"
conventions = ["rich-record"]
fields = [
    { name = "items", type = "Dict[str, Item]" },
    { name = "note", type = "Optional[str]" },
]
"#;

fn protogen(dir: &Path, args: &[&str]) -> Output {
    Command::cargo_bin("protogen")
        .unwrap()
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run protogen")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("types.toml"), MANIFEST).unwrap();
    dir
}

#[test]
fn prints_schema_for_model() {
    let dir = workspace();
    let output = protogen(dir.path(), &["types.toml", "--model", "Box"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "message Box {\n    map<string, Item> items = 1;\n    string note = 2;\n}\n\nmessage Item {\n    string name = 1;\n}\n"
    );
}

#[test]
fn visited_and_flags() {
    let dir = workspace();
    let output = protogen(
        dir.path(),
        &[
            "types.toml",
            "-m",
            "Box",
            "--visited",
            "Item",
            "--optional-keyword",
            "--indent",
            "2",
        ],
    );

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "message Box {\n  map<string, Item> items = 1;\n  optional string note = 2;\n}\n"
    );
}

#[test]
fn project_config_applies() {
    let dir = workspace();
    std::fs::create_dir_all(dir.path().join(".protogen")).unwrap();
    std::fs::write(
        dir.path().join(".protogen/config.toml"),
        "[output]\noptional_keyword = true\n",
    )
    .unwrap();

    let output = protogen(dir.path(), &["types.toml", "-m", "Box", "--visited", "Item"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("optional string note = 2;"));
}

#[test]
fn unknown_model_fails() {
    let dir = workspace();
    let output = protogen(dir.path(), &["types.toml", "--model", "Missing"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown type `Missing`"));
}

#[test]
fn writes_output_file() {
    let dir = workspace();
    let output = protogen(dir.path(), &["types.toml", "-o", "schema.proto"]);

    assert!(output.status.success());
    let schema = std::fs::read_to_string(dir.path().join("schema.proto")).unwrap();
    // Every declared type, last declared first.
    assert!(schema.starts_with("message Box {"));
    assert_eq!(schema.matches("message Item").count(), 1);
}
