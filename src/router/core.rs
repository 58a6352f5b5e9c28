//! Rule table and navigation matching.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

use super::navigation::{HistoryEntry, NavigateEvent, NavigationDescription, RuleKind};
use super::pattern::UrlPattern;
use super::Params;
use crate::config::{Config, ConfigError};

/// Result of matching a navigation against the rule table.
///
/// Consumed by the orchestrator to build the transition's classes and to
/// substitute `$(key)` tokens in capture templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Path and query groups from both sides; the `to` side wins on collision
    pub params: Params,
    /// The matched rule's class, if any
    pub class: Option<String>,
    /// Route name of the old URL, `None` when the rule left it open
    pub from: Option<String>,
    /// Route name of the new URL, `None` when the rule left it open
    pub to: Option<String>,
}

/// A directional rule after shorthand expansion.
#[derive(Debug, Clone)]
pub struct NavRule {
    pub from: Option<String>,
    pub to: Option<String>,
    pub kind: RuleKind,
    pub class: Option<String>,
    /// Index of the rule in the configuration it was expanded from
    pub declared_at: usize,
    from_pattern: Arc<UrlPattern>,
    to_pattern: Arc<UrlPattern>,
}

impl fmt::Display for NavRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} -> {} [{}]",
            self.declared_at,
            self.from.as_deref().unwrap_or("*"),
            self.to.as_deref().unwrap_or("*"),
            self.kind
        )?;
        if let Some(class) = &self.class {
            write!(f, " .{class}")?;
        }
        Ok(())
    }
}

/// Compiled routes plus the rule list in evaluation order.
///
/// Immutable after construction; reloads build a new router.
#[derive(Debug, Clone)]
pub struct NavRouter {
    routes: HashMap<String, Arc<UrlPattern>>,
    /// Expanded rules, last-declared first
    rules: Vec<NavRule>,
}

impl NavRouter {
    /// Compile the routes and rules of a configuration.
    ///
    /// Fails on invalid patterns, rules naming unknown routes, and rules
    /// naming no route at all.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let base = config
            .base_url
            .as_deref()
            .map(|b| {
                Url::parse(b).map_err(|e| ConfigError::InvalidBaseUrl {
                    url: b.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        let mut routes = HashMap::with_capacity(config.routes.len());
        for (name, pattern) in config.routes.iter() {
            let compiled = UrlPattern::new(pattern, base.as_ref()).map_err(|source| {
                ConfigError::InvalidPattern {
                    route: name.to_string(),
                    source,
                }
            })?;
            routes.insert(name.to_string(), Arc::new(compiled));
        }

        let wildcard = Arc::new(UrlPattern::wildcard());
        let lookup = |rule: usize, name: &Option<String>| -> Result<Arc<UrlPattern>, ConfigError> {
            match name {
                None => Ok(Arc::clone(&wildcard)),
                Some(name) => routes.get(name).map(Arc::clone).ok_or_else(|| {
                    ConfigError::UnknownRoute {
                        rule,
                        route: name.clone(),
                    }
                }),
            }
        };

        let mut rules = Vec::with_capacity(config.rules.len() * 2);
        for (index, rule) in config.rules.iter().enumerate() {
            let expanded = rule.expand();
            if expanded.is_empty() {
                return Err(ConfigError::EmptyRule { rule: index });
            }
            for (from, to) in expanded {
                rules.push(NavRule {
                    from_pattern: lookup(index, &from)?,
                    to_pattern: lookup(index, &to)?,
                    from,
                    to,
                    kind: rule.kind,
                    class: rule.class.clone(),
                    declared_at: index,
                });
            }
        }
        // last-declared rule wins
        rules.reverse();

        info!(
            routes_count = routes.len(),
            rules_count = rules.len(),
            base_url = ?config.base_url,
            "Navigation rules loaded"
        );

        Ok(Self { routes, rules })
    }

    /// Expanded rules in evaluation order (last-declared first).
    #[must_use]
    pub fn rules(&self) -> &[NavRule] {
        &self.rules
    }

    /// Look up a compiled route by name.
    #[must_use]
    pub fn route(&self, name: &str) -> Option<&UrlPattern> {
        self.routes.get(name).map(|pattern| &**pattern)
    }

    /// Find the highest-priority rule matching a navigation.
    ///
    /// # Returns
    ///
    /// * `Some(MatchResult)` - route names, class and merged params of the winning rule
    /// * `None` - no rule matched; the update should run without a transition
    #[must_use]
    pub fn find_matching_nav(&self, nav: &NavigationDescription) -> Option<MatchResult> {
        debug!(
            from = %nav.from,
            to = %nav.to,
            navigation_type = %nav.navigation_type,
            traverse_delta = nav.traverse_delta,
            "Navigation match attempt"
        );
        let match_start = Instant::now();

        for rule in &self.rules {
            if !rule.kind.matches(nav.navigation_type, nav.traverse_delta) {
                continue;
            }
            let Some(mut params) = rule.from_pattern.exec(&nav.from) else {
                continue;
            };
            let Some(to_params) = rule.to_pattern.exec(&nav.to) else {
                continue;
            };
            params.extend(to_params);

            info!(
                from = %nav.from,
                to = %nav.to,
                rule = %rule,
                params = ?params,
                duration_us = match_start.elapsed().as_micros(),
                "Navigation matched"
            );
            return Some(MatchResult {
                params,
                class: rule.class.clone(),
                from: rule.from.clone(),
                to: rule.to.clone(),
            });
        }

        let duration = match_start.elapsed();
        if duration > std::time::Duration::from_millis(1) {
            warn!(
                from = %nav.from,
                to = %nav.to,
                rules_count = self.rules.len(),
                duration_us = duration.as_micros(),
                "Slow navigation matching detected"
            );
        }
        debug!(
            from = %nav.from,
            to = %nav.to,
            "No navigation rule matched"
        );
        None
    }

    /// Match a same-document navigation event leaving `current`.
    #[must_use]
    pub fn find_matching_nav_for_event(
        &self,
        current: &HistoryEntry,
        event: &NavigateEvent,
    ) -> Option<MatchResult> {
        self.find_matching_nav(&event.describe(current))
    }
}
