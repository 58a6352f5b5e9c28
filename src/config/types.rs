use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::ordered::OrderedMap;
use crate::router::RuleKind;

/// A style declaration: CSS property name to value, in declaration order.
pub type StyleDeclaration = OrderedMap<CssValue>;

/// The declarative configuration a [`Choreographer`](crate::Choreographer) is built from.
///
/// ```yaml
/// routes:
///   home: /app/
///   song: /app/song/:song_id
/// rules:
///   - between: [home, song]
///     class: expand
/// captures:
///   "li#song$(song_id) a": song
/// styles:
///   "::view-transition-group(.any-box)":
///     animationDuration: 1s
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base URL relative route patterns are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Route name to URL pattern
    #[serde(default)]
    pub routes: OrderedMap<String>,
    /// Navigation rules; the last matching rule wins
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
    /// Selector template to transition name template
    #[serde(default)]
    pub captures: OrderedMap<String>,
    /// Pseudo-element selector (with an optional `(.tag)` placeholder) to declaration
    #[serde(default)]
    pub styles: OrderedMap<StyleDeclaration>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name, pattern.into());
        self
    }

    #[must_use]
    pub fn rule(mut self, rule: RuleConfig) -> Self {
        self.rules.push(rule);
        self
    }

    #[must_use]
    pub fn capture(mut self, selector: impl Into<String>, name: impl Into<String>) -> Self {
        self.captures.insert(selector, name.into());
        self
    }

    #[must_use]
    pub fn style<K, V>(mut self, selector: impl Into<String>, declaration: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<CssValue>,
    {
        let declaration = declaration
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<StyleDeclaration>();
        self.styles.insert(selector, declaration);
        self
    }
}

/// The `with` shorthand: a single route, or an unordered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WithRoutes {
    One(String),
    Pair([String; 2]),
}

/// One navigation rule as declared.
///
/// Exactly one of the shapes applies, checked in this order:
/// - `from` and/or `to`: a single directional rule
/// - `with: X`: matches any navigation leaving or entering `X`
/// - `with: [A, B]` or `between: [A, B]`: matches `A → B` and `B → A`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<WithRoutes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub between: Option<[String; 2]>,
    #[serde(rename = "type", default)]
    pub kind: RuleKind,
    /// Applied to the root as `vt-<class>` while the transition runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl RuleConfig {
    #[must_use]
    pub fn from_route(route: impl Into<String>) -> Self {
        Self {
            from: Some(route.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_route(route: impl Into<String>) -> Self {
        Self {
            to: Some(route.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_to(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_route(route: impl Into<String>) -> Self {
        Self {
            with: Some(WithRoutes::One(route.into())),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn between(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            between: Some([a.into(), b.into()]),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: RuleKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Expand the shorthands into directional `(from, to)` pairs.
    ///
    /// Returns an empty list when the rule names no routes at all.
    #[must_use]
    pub fn expand(&self) -> Vec<(Option<String>, Option<String>)> {
        if self.from.is_some() || self.to.is_some() {
            return vec![(self.from.clone(), self.to.clone())];
        }
        match (&self.with, &self.between) {
            (Some(WithRoutes::One(route)), _) => {
                vec![(Some(route.clone()), None), (None, Some(route.clone()))]
            }
            (Some(WithRoutes::Pair([a, b])), _) | (None, Some([a, b])) => vec![
                (Some(a.clone()), Some(b.clone())),
                (Some(b.clone()), Some(a.clone())),
            ],
            (None, None) => Vec::new(),
        }
    }
}

/// A CSS property value.
///
/// Deserializes from strings, numbers and booleans so that YAML such as
/// `opacity: 0.5` works without quoting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssValue(pub String);

impl CssValue {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CssValue {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CssValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CssValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

struct CssValueVisitor;

impl Visitor<'_> for CssValueVisitor {
    type Value = CssValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a CSS value as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(CssValue(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(CssValue(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(CssValue(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(CssValue(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(CssValue(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(CssValue(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for CssValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CssValueVisitor)
    }
}
