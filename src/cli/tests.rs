//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use crate::router::NavigationType;
use crate::runtime_config::RuntimeConfig;
use clap::Parser;
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
base_url: https://music.test/
routes:
  home: /
  song: /song/:song_id
rules:
  - with: home
  - between: [home, song]
    class: expand
  - from: song
    to: home
    type: back
    class: shrink
"#;

fn config_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn run_to_string(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run(&cli, &RuntimeConfig::default(), &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_check_command_parses() {
    let cli = Cli::try_parse_from(["velvette", "check", "--config", "t.yaml", "--watch"]).unwrap();
    match cli.command {
        Commands::Check { config, watch } => {
            assert_eq!(config.to_string_lossy(), "t.yaml");
            assert!(watch);
        }
        _ => panic!("Expected Check command"),
    }
}

#[test]
fn test_match_command_parses_negative_delta() {
    let cli = Cli::try_parse_from([
        "velvette",
        "match",
        "-c",
        "t.yaml",
        "--from",
        "https://a.test/x",
        "--to",
        "https://a.test/",
        "--type",
        "traverse",
        "--delta",
        "-1",
    ])
    .unwrap();
    match cli.command {
        Commands::Match {
            navigation_type,
            delta,
            ..
        } => {
            assert_eq!(navigation_type, NavigationType::Traverse);
            assert_eq!(delta, -1);
        }
        _ => panic!("Expected Match command"),
    }
}

#[test]
fn test_match_rejects_unknown_type() {
    let parsed = Cli::try_parse_from([
        "velvette", "match", "-c", "t.yaml", "--from", "https://a.test/", "--to", "https://a.test/", "--type",
        "teleport",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_check_prints_expanded_rules() {
    let file = config_file(CONFIG, ".yaml");
    let path = file.path().to_str().unwrap();
    let out = run_to_string(&["velvette", "check", "--config", path]).unwrap();
    assert!(out.contains("5 rules, 0 captures, 0 styles"), "{out}");
    let lines: Vec<&str> = out.lines().skip(1).map(str::trim).collect();
    assert_eq!(lines[0], "#2 song -> home [back] .shrink");
    assert_eq!(lines[1], "#1 song -> home [auto] .expand");
    assert_eq!(lines[2], "#1 home -> song [auto] .expand");
    assert_eq!(lines[4], "#0 home -> * [auto]");
}

#[test]
fn test_check_reports_unknown_route() {
    let file = config_file("routes: { a: /a }\nrules:\n  - from: a\n    to: b\n", ".yaml");
    let path = file.path().to_str().unwrap();
    let err = run_to_string(&["velvette", "check", "--config", path]).unwrap_err();
    assert!(format!("{err:#}").contains("unknown route"), "{err:#}");
}

#[test]
fn test_match_prints_json_result() {
    let file = config_file(CONFIG, ".yaml");
    let path = file.path().to_str().unwrap();
    let out = run_to_string(&[
        "velvette",
        "match",
        "--config",
        path,
        "--from",
        "https://music.test/",
        "--to",
        "https://music.test/song/12",
    ])
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["from"], "home");
    assert_eq!(value["to"], "song");
    assert_eq!(value["class"], "expand");
    assert_eq!(value["params"]["song_id"], "12");
}

#[test]
fn test_match_back_traversal() {
    let file = config_file(CONFIG, ".yaml");
    let path = file.path().to_str().unwrap();
    let out = run_to_string(&[
        "velvette",
        "match",
        "--config",
        path,
        "--from",
        "https://music.test/song/12",
        "--to",
        "https://music.test/",
        "--type",
        "traverse",
        "--delta",
        "-1",
    ])
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["class"], "shrink");
}

#[test]
fn test_match_prints_null_without_match() {
    let file = config_file(CONFIG, ".yaml");
    let path = file.path().to_str().unwrap();
    let out = run_to_string(&[
        "velvette",
        "match",
        "--config",
        path,
        "--from",
        "https://music.test/song/1",
        "--to",
        "https://music.test/song/2",
    ])
    .unwrap();
    assert_eq!(out.trim(), "null");
}

#[test]
fn test_match_rejects_relative_urls() {
    let file = config_file(CONFIG, ".yaml");
    let path = file.path().to_str().unwrap();
    let err = run_to_string(&["velvette", "match", "--config", path, "--from", "/", "--to", "/song/1"]).unwrap_err();
    assert!(format!("{err:#}").contains("absolute URLs"), "{err:#}");
}
