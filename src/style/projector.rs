use tracing::trace;

use super::sheet::{StyleRule, Stylesheet};
use crate::config::{CssValue, StyleDeclaration};

/// Byte range of the first `(.tag)` placeholder in a style selector.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    start: usize,
    end: usize,
    tag: String,
}

fn find_placeholder(selector: &str) -> Option<Placeholder> {
    let start = selector.find("(.")?;
    let body_start = start + 2;
    let close = selector[body_start..].find(')')? + body_start;
    if close == body_start {
        return None;
    }
    Some(Placeholder {
        start,
        end: close + 1,
        tag: selector[body_start..close].to_string(),
    })
}

/// Convert a camelCase property name to CSS kebab-case.
///
/// Custom properties (`--foo`) and names already containing a `-` are kept.
#[must_use]
pub fn css_property_name(name: &str) -> String {
    if name.contains('-') {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// A style rule template keyed by a class tag.
///
/// `::view-transition-group(.any-box)` with `{animationDuration: 1s}` becomes
/// `::view-transition-group(box-7) { animation-duration: 1s; }` for every
/// captured element whose generated name carried `.any-box`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpec {
    selector: String,
    placeholder: Option<Placeholder>,
    declaration: Vec<(String, String)>,
}

impl StyleSpec {
    #[must_use]
    pub fn new(selector: &str, declaration: &StyleDeclaration) -> Self {
        Self::with_properties(selector, declaration.iter().map(|(k, v)| (k, v.as_str())))
    }

    /// Build a spec from `(property, value)` pairs.
    pub fn with_properties<K, V>(selector: &str, properties: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<CssValue>,
    {
        Self {
            selector: selector.to_string(),
            placeholder: find_placeholder(selector),
            declaration: properties
                .into_iter()
                .map(|(k, v)| (css_property_name(k.as_ref()), v.into().0))
                .collect(),
        }
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The class tag this spec is activated by, if its selector has a placeholder.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.placeholder.as_ref().map(|p| p.tag.as_str())
    }

    /// The concrete rule for an element named `name` carrying `tags`.
    ///
    /// Only the first placeholder is considered; `None` when it is absent or
    /// its tag is not among `tags`.
    #[must_use]
    pub fn rule_for(&self, name: &str, tags: &[String]) -> Option<StyleRule> {
        let placeholder = self.placeholder.as_ref()?;
        if !tags.iter().any(|t| *t == placeholder.tag) {
            return None;
        }
        let selector = format!(
            "{}({}){}",
            &self.selector[..placeholder.start],
            name,
            &self.selector[placeholder.end..]
        );
        let mut rule = StyleRule::new(selector);
        for (property, value) in &self.declaration {
            rule.set_property(property.as_str(), value.as_str());
        }
        Some(rule)
    }
}

/// Project the styles activated by `tags` for the element named `name` into `sheet`.
///
/// Returns the number of rules added.
pub fn project(name: &str, tags: &[String], specs: &[StyleSpec], sheet: &mut Stylesheet) -> usize {
    let mut added = 0;
    for spec in specs {
        let Some(rule) = spec.rule_for(name, tags) else {
            continue;
        };
        trace!(transition_name = name, selector = %rule.selector(), "Projecting style rule");
        if sheet.insert_rule(rule) {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_placeholder_substitution() {
        let spec = StyleSpec::with_properties("::view-transition-group(.any-box)", [("filter", "blur(1px)")]);
        assert_eq!(spec.tag(), Some("any-box"));
        let rule = spec.rule_for("box-3", &tags(&["any-box"])).unwrap();
        assert_eq!(rule.selector(), "::view-transition-group(box-3)");
        assert_eq!(rule.property("filter"), Some("blur(1px)"));
        assert!(spec.rule_for("box-3", &tags(&["other"])).is_none());
    }

    #[test]
    fn test_spec_without_placeholder_never_projects() {
        let spec = StyleSpec::with_properties("::view-transition-group(root)", [("opacity", "0")]);
        assert_eq!(spec.tag(), None);
        assert!(spec.rule_for("root", &tags(&["root"])).is_none());
    }

    #[test]
    fn test_only_first_placeholder_counts() {
        let spec = StyleSpec::with_properties("::a(.x)::b(.y)", [("opacity", "0")]);
        assert!(spec.rule_for("n", &tags(&["y"])).is_none());
        let rule = spec.rule_for("n", &tags(&["x"])).unwrap();
        assert_eq!(rule.selector(), "::a(n)::b(.y)");
    }

    #[test]
    fn test_property_names_normalized() {
        assert_eq!(css_property_name("animationDuration"), "animation-duration");
        assert_eq!(css_property_name("animation-duration"), "animation-duration");
        assert_eq!(css_property_name("--accentColor"), "--accentColor");
        assert_eq!(css_property_name("opacity"), "opacity");
    }

    #[test]
    fn test_project_per_element() {
        let specs = vec![
            StyleSpec::with_properties("::view-transition-group(.any-box)", [("animationDuration", "1s")]),
            StyleSpec::with_properties("::view-transition-old(.fade)", [("opacity", "0")]),
        ];
        let mut sheet = Stylesheet::new();
        assert_eq!(project("box-1", &tags(&["any-box"]), &specs, &mut sheet), 1);
        assert_eq!(project("box-2", &tags(&["any-box", "fade"]), &specs, &mut sheet), 2);
        assert_eq!(project("plain", &[], &specs, &mut sheet), 0);
        assert_eq!(project("box-1", &tags(&["any-box"]), &specs, &mut sheet), 0);
        assert_eq!(sheet.len(), 3);
        assert_eq!(
            sheet.rules()[0].to_string(),
            "::view-transition-group(box-1) { animation-duration: 1s; }"
        );
    }
}
