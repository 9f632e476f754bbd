use clap::Parser;
use codestudio::config::StudioConfig;
use codestudio::deploy::UploadManifest;
use codestudio::error::ApiError;
use codestudio::tooling::cli::{Cli, CliContext, Commands};
use codestudio::tree::mount::MountTree;
use std::fs;
use std::path::PathBuf;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn context() -> CliContext {
    CliContext::with_config(StudioConfig::default()).unwrap()
}

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["codestudio", "parse", "response.txt"],
        vec!["codestudio", "parse", "response.txt", "--format", "json"],
        vec!["codestudio", "build", "one.txt", "two.txt"],
        vec!["codestudio", "ingest", "doc.xml"],
        vec!["codestudio", "mount", "one.txt"],
        vec!["codestudio", "manifest", "one.txt", "--project-id", "site"],
        vec!["codestudio", "--vocabulary", "studio", "config"],
        vec!["codestudio", "--log-level", "debug", "--log-format", "json", "config"],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(args.clone()).is_ok(), "expected valid parse: {args:?}");
    }
}

#[test]
fn parse_rejects_missing_inputs() {
    assert!(Cli::try_parse_from(["codestudio", "build"]).is_err());
    assert!(Cli::try_parse_from(["codestudio", "--vocabulary", "other", "config"]).is_err());
}

#[test]
fn build_applies_files_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        &dir,
        "1.txt",
        r#"<boltAction type="file" filePath="src/app.js">v1</boltAction>"#,
    );
    let second = write(
        &dir,
        "2.txt",
        r#"<boltAction type="file" filePath="src/app.js">v2</boltAction>
<boltAction type="file" filePath="src/app.js/x">bad</boltAction>"#,
    );

    let output = context()
        .execute(&Commands::Build {
            files: vec![first, second],
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.starts_with("root/\n  src/\n    app.js (2 bytes)"));
    assert!(output.contains("1 files, 1 created, 1 updated"));
    assert!(output.contains("Conflict: src/app.js/x"));
}

#[test]
fn mount_and_manifest_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let response = write(
        &dir,
        "r.txt",
        r#"<boltAction type="file" filePath="index.html">hi</boltAction>
<boltAction type="file" filePath="empty.txt"></boltAction>"#,
    );

    let mount: MountTree = serde_json::from_str(
        &context()
            .execute(&Commands::Mount {
                files: vec![response.clone()],
            })
            .unwrap(),
    )
    .unwrap();
    assert_eq!(mount.len(), 2);

    let manifest: UploadManifest = serde_json::from_str(
        &context()
            .execute(&Commands::Manifest {
                files: vec![response],
                project_id: Some("demo".to_string()),
            })
            .unwrap(),
    )
    .unwrap();
    assert_eq!(manifest.entries.len(), 1);
    assert_eq!(manifest.entries[0].key, "demo/index.html");
}

#[test]
fn ingest_reports_malformed_xml() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write(&dir, "doc.xml", "<boltArtifact><boltAction>");
    let result = context().execute(&Commands::Ingest {
        file: doc,
        format: "text".to_string(),
    });
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[test]
fn config_from_file_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "codestudio.toml",
        "[session]\nroot_name = \"project\"\n",
    );
    let cli = Cli::try_parse_from(["codestudio", "--vocabulary", "studio", "config"]).unwrap();
    let mut context = CliContext::new(Some(path)).unwrap();
    cli.apply_overrides(context.config_mut());

    let rendered = context.execute(&cli.command).unwrap();
    assert!(rendered.contains("root_name = \"project\""));
    assert!(rendered.contains("vocabulary = \"studio\""));
}
