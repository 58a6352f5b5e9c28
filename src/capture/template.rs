use smallvec::SmallVec;
use std::fmt;

use crate::router::Params;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A string with `$(key)` substitution tokens.
///
/// Parsing never fails: `$(` without a closing `)` and the empty `$()` are
/// kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;
        while let Some(open) = rest.find("$(") {
            let after = &rest[open + 2..];
            match after.find(')') {
                Some(close) if close > 0 => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Param(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push_str(&rest[..open + 2]);
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self {
            source: source.to_string(),
            segments,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Keys referenced by `$(key)` tokens, in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(key) => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every token; tokens whose key is missing stay as written.
    #[must_use]
    pub fn render(&self, params: &Params) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Param(key) => match params.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("$(");
                        out.push_str(key);
                        out.push(')');
                    }
                },
            }
        }
        out
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A rendered transition name split into the name proper and its class tags.
///
/// Every `.` followed by at least one non-`.` character starts a tag that runs
/// to the next `.`; tags are removed from the name. `box-3.any-box.wide`
/// yields the name `box-3` with tags `any-box` and `wide`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedName {
    pub name: String,
    pub tags: SmallVec<[String; 2]>,
}

impl GeneratedName {
    #[must_use]
    pub fn parse(rendered: &str) -> Self {
        let mut name = String::with_capacity(rendered.len());
        let mut tags: SmallVec<[String; 2]> = SmallVec::new();
        let mut chars = rendered.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '.' || matches!(chars.peek(), None | Some('.')) {
                name.push(c);
                continue;
            }
            let mut tag = String::new();
            while let Some(&next) = chars.peek() {
                if next == '.' {
                    break;
                }
                tag.push(next);
                chars.next();
            }
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        Self { name, tags }
    }
}
