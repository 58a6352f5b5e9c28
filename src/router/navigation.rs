//! Navigation descriptions and the event shapes they are built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// The kind of a navigation, as reported by the navigation-interception primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationType {
    Push,
    Replace,
    Reload,
    Traverse,
}

impl NavigationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NavigationType::Push => "push",
            NavigationType::Replace => "replace",
            NavigationType::Reload => "reload",
            NavigationType::Traverse => "traverse",
        }
    }
}

impl fmt::Display for NavigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a navigation or rule type from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown navigation type `{0}`")]
pub struct UnknownNavigationType(pub String);

impl FromStr for NavigationType {
    type Err = UnknownNavigationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" => Ok(NavigationType::Push),
            "replace" => Ok(NavigationType::Replace),
            "reload" => Ok(NavigationType::Reload),
            "traverse" => Ok(NavigationType::Traverse),
            _ => Err(UnknownNavigationType(s.to_string())),
        }
    }
}

/// The navigation type a rule accepts.
///
/// Besides the plain [`NavigationType`]s:
/// - `auto` matches any navigation apart from `reload`
/// - `back` matches a `traverse` with a delta of -1
/// - `forward` matches a `traverse` with a delta of 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    #[default]
    Auto,
    Back,
    Forward,
    Push,
    Replace,
    Reload,
    Traverse,
}

impl RuleKind {
    /// Returns `true` if a navigation of `actual` kind, moving `delta`
    /// history entries, satisfies this rule kind.
    #[must_use]
    pub fn matches(self, actual: NavigationType, delta: i64) -> bool {
        match self {
            RuleKind::Auto => actual != NavigationType::Reload,
            RuleKind::Back => actual == NavigationType::Traverse && delta == -1,
            RuleKind::Forward => actual == NavigationType::Traverse && delta == 1,
            RuleKind::Push => actual == NavigationType::Push,
            RuleKind::Replace => actual == NavigationType::Replace,
            RuleKind::Reload => actual == NavigationType::Reload,
            RuleKind::Traverse => actual == NavigationType::Traverse,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Auto => "auto",
            RuleKind::Back => "back",
            RuleKind::Forward => "forward",
            RuleKind::Push => "push",
            RuleKind::Replace => "replace",
            RuleKind::Reload => "reload",
            RuleKind::Traverse => "traverse",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NavigationType> for RuleKind {
    fn from(kind: NavigationType) -> Self {
        match kind {
            NavigationType::Push => RuleKind::Push,
            NavigationType::Replace => RuleKind::Replace,
            NavigationType::Reload => RuleKind::Reload,
            NavigationType::Traverse => RuleKind::Traverse,
        }
    }
}

impl FromStr for RuleKind {
    type Err = UnknownNavigationType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(RuleKind::Auto),
            "back" => Ok(RuleKind::Back),
            "forward" => Ok(RuleKind::Forward),
            other => other
                .parse::<NavigationType>()
                .map(RuleKind::from)
                .map_err(|_| UnknownNavigationType(s.to_string())),
        }
    }
}

/// A navigation attempt, constructed per navigation and matched against the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationDescription {
    pub from: Url,
    pub to: Url,
    pub navigation_type: NavigationType,
    pub traverse_delta: i64,
}

impl NavigationDescription {
    /// Describe a navigation between two absolute URLs with a delta of 0.
    pub fn new(from: &str, to: &str, navigation_type: NavigationType) -> Result<Self, url::ParseError> {
        Ok(Self {
            from: Url::parse(from)?,
            to: Url::parse(to)?,
            navigation_type,
            traverse_delta: 0,
        })
    }

    #[must_use]
    pub fn with_delta(mut self, traverse_delta: i64) -> Self {
        self.traverse_delta = traverse_delta;
        self
    }
}

/// A session history entry: its URL and its index in the history list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: Url,
    pub index: i64,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(url: Url, index: i64) -> Self {
        Self { url, index }
    }
}

/// A same-document navigation event as delivered by the interception primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateEvent {
    pub destination: HistoryEntry,
    pub navigation_type: NavigationType,
}

impl NavigateEvent {
    /// Build the navigation description for this event, leaving `current`.
    #[must_use]
    pub fn describe(&self, current: &HistoryEntry) -> NavigationDescription {
        NavigationDescription {
            from: current.url.clone(),
            to: self.destination.url.clone(),
            navigation_type: self.navigation_type,
            traverse_delta: self.destination.index - current.index,
        }
    }
}

/// How the current document was activated by a cross-document navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub from: HistoryEntry,
    pub entry: HistoryEntry,
    pub navigation_type: NavigationType,
}

impl Activation {
    #[must_use]
    pub fn describe(&self) -> NavigationDescription {
        NavigationDescription {
            from: self.from.url.clone(),
            to: self.entry.url.clone(),
            navigation_type: self.navigation_type,
            traverse_delta: self.entry.index - self.from.index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_matching() {
        assert!(RuleKind::Auto.matches(NavigationType::Push, 0));
        assert!(RuleKind::Auto.matches(NavigationType::Traverse, -3));
        assert!(!RuleKind::Auto.matches(NavigationType::Reload, 0));

        assert!(RuleKind::Back.matches(NavigationType::Traverse, -1));
        assert!(!RuleKind::Back.matches(NavigationType::Traverse, -2));
        assert!(!RuleKind::Back.matches(NavigationType::Push, -1));

        assert!(RuleKind::Forward.matches(NavigationType::Traverse, 1));
        assert!(!RuleKind::Forward.matches(NavigationType::Traverse, -1));

        assert!(RuleKind::Reload.matches(NavigationType::Reload, 0));
        assert!(!RuleKind::Replace.matches(NavigationType::Push, 0));
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!("BACK".parse::<RuleKind>().unwrap(), RuleKind::Back);
        assert_eq!("replace".parse::<RuleKind>().unwrap(), RuleKind::Replace);
        assert!("sideways".parse::<RuleKind>().is_err());
        assert!("auto".parse::<NavigationType>().is_err());
    }

    #[test]
    fn test_event_delta_is_destination_minus_current() {
        let current = HistoryEntry::new(Url::parse("https://x.test/a").unwrap(), 4);
        let event = NavigateEvent {
            destination: HistoryEntry::new(Url::parse("https://x.test/b").unwrap(), 3),
            navigation_type: NavigationType::Traverse,
        };
        let nav = event.describe(&current);
        assert_eq!(nav.traverse_delta, -1);
        assert_eq!(nav.from.path(), "/a");
        assert_eq!(nav.to.path(), "/b");
    }
}
