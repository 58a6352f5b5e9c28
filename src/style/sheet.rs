use std::fmt;

/// A single style rule: a selector and its ordered property list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    selector: String,
    properties: Vec<(String, String)>,
}

impl StyleRule {
    /// An empty rule (`selector {}`).
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: Vec::new(),
        }
    }

    /// Set a property, replacing an earlier value for the same name.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((name, value)),
        }
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector)?;
        for (name, value) in &self.properties {
            write!(f, " {name}: {value};")?;
        }
        f.write_str(" }")
    }
}

/// The ephemeral stylesheet of a transition.
///
/// Rules keep insertion order. Inserting a rule identical to one already in
/// the sheet is a no-op, so capturing the same element in both phases does
/// not duplicate its styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
}

impl Stylesheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Returns `false` if an identical rule was already present.
    pub fn insert_rule(&mut self, rule: StyleRule) -> bool {
        if self.rules.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Rules whose selector is exactly `selector`.
    pub fn rules_for<'a>(&'a self, selector: &'a str) -> impl Iterator<Item = &'a StyleRule> + 'a {
        self.rules.iter().filter(move |r| r.selector == selector)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Serialize the sheet as CSS text, one rule per line.
    #[must_use]
    pub fn css_text(&self) -> String {
        self.rules
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
