use velvette::config::{load_config, CompiledConfig, Config, ConfigError, RuleConfig};
use velvette::router::{PatternError, RuleKind};

mod common;
use common::temp_files;

const YAML: &str = r#"
base_url: https://example.com/app/
routes:
  home: /app/
  song: song/:id
rules:
  - with: home
  - between: [home, song]
    class: expand
captures:
  "main section[:name] .hero": part-$(name)
styles:
  "::view-transition-group(.any-box)":
    animationDuration: 1s
    opacity: 0.5
"#;

const JSON: &str = r#"{
  "base_url": "https://example.com/app/",
  "routes": { "home": "/app/", "song": "song/:id" },
  "rules": [
    { "with": "home" },
    { "between": ["home", "song"], "class": "expand" }
  ],
  "captures": { "main section[:name] .hero": "part-$(name)" },
  "styles": {
    "::view-transition-group(.any-box)": { "animationDuration": "1s", "opacity": 0.5 }
  }
}"#;

const TOML: &str = r#"
base_url = "https://example.com/app/"

[routes]
home = "/app/"
song = "song/:id"

[[rules]]
with = "home"

[[rules]]
between = ["home", "song"]
class = "expand"

[captures]
"main section[:name] .hero" = "part-$(name)"

[styles."::view-transition-group(.any-box)"]
animationDuration = "1s"
opacity = 0.5
"#;

#[test]
fn test_all_formats_load_the_same_config() {
    let files = [
        temp_files::create_temp_config(YAML, "yaml"),
        temp_files::create_temp_config(JSON, "json"),
        temp_files::create_temp_config(TOML, "toml"),
    ];
    let configs: Vec<Config> = files.iter().map(|f| load_config(&f.path).unwrap()).collect();
    assert_eq!(configs[0], configs[1]);
    assert_eq!(configs[1], configs[2]);

    let config = &configs[0];
    assert_eq!(config.routes.keys().collect::<Vec<_>>(), vec!["home", "song"]);
    assert_eq!(config.rules.len(), 2);
    let declaration = config.styles.get("::view-transition-group(.any-box)").unwrap();
    assert_eq!(declaration.get("opacity").unwrap().as_str(), "0.5");
}

#[test]
fn test_loaded_config_compiles() {
    let file = temp_files::create_temp_yaml(YAML);
    let compiled = CompiledConfig::compile(&load_config(&file.path).unwrap()).unwrap();
    assert_eq!(compiled.router.rules().len(), 4);
    assert_eq!(compiled.captures.len(), 1);
    assert_eq!(compiled.styles[0].tag(), Some("any-box"));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.yaml");
    let err = load_config(&path).unwrap_err();
    assert!(format!("{err:#}").contains("nope.yaml"), "{err:#}");
}

#[test]
fn test_unknown_fields_are_rejected() {
    let file = temp_files::create_temp_yaml("routes: {}\ntransitions: []\n");
    assert!(load_config(&file.path).is_err());
}

#[test]
fn test_between_needs_exactly_two_routes() {
    let file = temp_files::create_temp_yaml("routes: { a: /a }\nrules:\n  - between: [a]\n");
    assert!(load_config(&file.path).is_err());
}

#[test]
fn test_compile_errors() {
    let unknown = Config::new()
        .route("a", "/a")
        .rule(RuleConfig::from_to("a", "missing"));
    assert_eq!(
        CompiledConfig::compile(&unknown).unwrap_err(),
        ConfigError::UnknownRoute {
            rule: 0,
            route: "missing".to_string()
        }
    );

    let empty = Config::new().route("a", "/a").rule(RuleConfig::default());
    assert_eq!(
        CompiledConfig::compile(&empty).unwrap_err(),
        ConfigError::EmptyRule { rule: 0 }
    );

    let base = Config::new().base_url("not a url");
    assert!(matches!(
        CompiledConfig::compile(&base),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));

    let relative = Config::new().route("song", "song/:id");
    assert_eq!(
        CompiledConfig::compile(&relative).unwrap_err(),
        ConfigError::InvalidPattern {
            route: "song".to_string(),
            source: PatternError::RelativeWithoutBase("song/:id".to_string()),
        }
    );
}

#[test]
fn test_rule_kind_parses_from_config() {
    let config: Config = serde_json::from_str(
        r#"{ "routes": { "a": "/a", "b": "/b" }, "rules": [ { "from": "a", "to": "b", "type": "forward" } ] }"#,
    )
    .unwrap();
    assert_eq!(config.rules[0].kind, RuleKind::Forward);
}
