use anyhow::Context;
use std::path::Path;

use super::types::Config;

/// Configuration file formats, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension; anything unknown is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => ConfigFormat::Yaml,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Parse a configuration document in the given format.
pub fn parse_config(content: &str, format: ConfigFormat) -> anyhow::Result<Config> {
    let config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(config)
}

/// Read and parse a configuration file.
///
/// The file is only parsed here; route patterns and rule references are
/// checked by [`CompiledConfig::compile`](super::CompiledConfig::compile).
pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&content, ConfigFormat::from_path(path))
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WithRoutes;
    use crate::router::RuleKind;

    const YAML: &str = r#"
routes:
  home: /app/
  song: /app/song/:song_id
rules:
  - with: home
  - between: [home, song]
    class: expand
  - from: song
    to: home
    type: back
captures:
  "li#song$(song_id) a": song-link
styles:
  "::view-transition-group(.any-box)":
    animationDuration: 1s
    opacity: 0.5
"#;

    #[test]
    fn test_parse_yaml() {
        let config = parse_config(YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.routes.keys().collect::<Vec<_>>(), vec!["home", "song"]);
        assert_eq!(config.rules.len(), 3);
        assert_eq!(config.rules[0].with, Some(WithRoutes::One("home".to_string())));
        assert_eq!(config.rules[2].kind, RuleKind::Back);
        let style = config.styles.get("::view-transition-group(.any-box)").unwrap();
        assert_eq!(style.get("opacity").map(|v| v.as_str()), Some("0.5"));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[routes]
page = "/page/:page"

[[rules]]
with = ["page", "page"]
type = "push"

[captures]
"nav.$(page)" = "page-nav-link"
"#;
        let config = parse_config(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.routes.get("page").map(String::as_str), Some("/page/:page"));
        assert_eq!(config.rules[0].kind, RuleKind::Push);
        assert_eq!(
            config.rules[0].with,
            Some(WithRoutes::Pair(["page".to_string(), "page".to_string()]))
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = parse_config(r#"{"routes": {}, "navs": []}"#, ConfigFormat::Json);
        assert!(err.is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
    }
}
