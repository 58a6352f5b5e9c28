//! URL pattern compilation.
//!
//! Route templates such as `/app/song/:song_id` or `https://example.com/search?q=:term`
//! are compiled into anchored regular expressions, one per URL component, the
//! same way OpenAPI paths used to be turned into `^/users/([^/]+)$`.
//!
//! Supported syntax, per component:
//!
//! - `:name` captures a segment (`[^/]+` in the path, `[^&]*` in the query, `.+` in the hash)
//! - `:name(regex)` captures with a custom regex
//! - `(regex)` captures under the next numeric key (`"0"`, `"1"`, ...)
//! - `*` captures anything under the next numeric key
//! - a trailing `?` makes the preceding group optional; in the path the `/`
//!   before an optional group is optional too
//! - `\` escapes the next character
//!
//! A pattern that is exactly `*` matches every URL. Components a pattern does
//! not mention (query, hash) accept anything.

use regex::Regex;
use url::Url;

use super::Params;

/// Error compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// The pattern string was empty
    #[error("route pattern is empty")]
    Empty,
    /// A relative path was given but no base URL is available to resolve it
    #[error("relative route pattern `{0}` needs a base URL")]
    RelativeWithoutBase(String),
    /// `(` without a matching `)`
    #[error("unbalanced group in route pattern `{0}`")]
    UnbalancedGroup(String),
    /// `:` not followed by a valid group name
    #[error("missing or invalid group name in route pattern `{0}`")]
    InvalidName(String),
    /// The `scheme://host` prefix did not parse
    #[error("invalid origin in route pattern `{0}`")]
    InvalidOrigin(String),
    /// The generated regex was rejected
    #[error("invalid regex in route pattern `{pattern}`: {message}")]
    Regex {
        /// The route pattern being compiled
        pattern: String,
        /// Message from the regex engine
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Pathname,
    Search,
    Hash,
}

impl Component {
    fn default_segment(self) -> &'static str {
        match self {
            Component::Pathname => "[^/]+",
            Component::Search => "[^&]*",
            Component::Hash => ".+",
        }
    }
}

/// One compiled URL component.
///
/// Param names live beside the regex (`groups[i]` is the param captured by
/// regex group `p{i}`) so custom group bodies may contain their own groups
/// without shifting indices.
#[derive(Debug, Clone)]
struct ComponentMatcher {
    regex: Regex,
    groups: Vec<(String, String)>,
}

impl ComponentMatcher {
    fn compile(source: &str, component: Component, full: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = source.chars().collect();
        let mut pattern = String::with_capacity(source.len() + 8);
        pattern.push('^');
        let mut params: Vec<String> = Vec::new();
        let mut unnamed = 0usize;
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\\' => {
                    let c = chars.get(i + 1).copied().unwrap_or('\\');
                    push_literal(&mut pattern, c);
                    i += 2;
                }
                ':' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && is_name_char(chars[end], end == start) {
                        end += 1;
                    }
                    if end == start {
                        return Err(PatternError::InvalidName(full.to_string()));
                    }
                    let name: String = chars[start..end].iter().collect();
                    i = end;
                    let body = if chars.get(i) == Some(&'(') {
                        let (body, next) = read_group(&chars, i, full)?;
                        i = next;
                        body
                    } else {
                        component.default_segment().to_string()
                    };
                    let optional = take_modifier(&chars, &mut i);
                    push_group(&mut pattern, params.len(), &body, optional, component);
                    params.push(name);
                }
                '(' => {
                    let (body, next) = read_group(&chars, i, full)?;
                    i = next;
                    let optional = take_modifier(&chars, &mut i);
                    push_group(&mut pattern, params.len(), &body, optional, component);
                    params.push(unnamed.to_string());
                    unnamed += 1;
                }
                '*' => {
                    i += 1;
                    let optional = take_modifier(&chars, &mut i);
                    push_group(&mut pattern, params.len(), ".*", optional, component);
                    params.push(unnamed.to_string());
                    unnamed += 1;
                }
                c => {
                    push_literal(&mut pattern, c);
                    i += 1;
                }
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern).map_err(|e| PatternError::Regex {
            pattern: full.to_string(),
            message: e.to_string(),
        })?;
        let groups = params
            .into_iter()
            .enumerate()
            .map(|(i, name)| (format!("p{i}"), name))
            .collect();
        Ok(Self { regex, groups })
    }

    fn capture_into(&self, haystack: &str, params: &mut Params) -> bool {
        let Some(caps) = self.regex.captures(haystack) else {
            return false;
        };
        for (group, name) in &self.groups {
            if let Some(m) = caps.name(group) {
                params.insert(name.clone(), m.as_str().to_string());
            }
        }
        true
    }
}

fn is_name_char(c: char, first: bool) -> bool {
    if first {
        c.is_alphabetic() || c == '_' || c == '$'
    } else {
        c.is_alphanumeric() || c == '_' || c == '$'
    }
}

fn push_literal(pattern: &mut String, c: char) {
    let mut buf = [0u8; 4];
    pattern.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

fn take_modifier(chars: &[char], i: &mut usize) -> bool {
    if chars.get(*i) == Some(&'?') {
        *i += 1;
        true
    } else {
        false
    }
}

/// Reads a `( ... )` group starting at `open`, returning its body and the
/// index just past the closing paren.
fn read_group(chars: &[char], open: usize, full: &str) -> Result<(String, usize), PatternError> {
    let mut depth = 0usize;
    let mut i = open;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let body: String = chars[open + 1..i].iter().collect();
                    if body.is_empty() {
                        return Err(PatternError::UnbalancedGroup(full.to_string()));
                    }
                    return Ok((body, i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(PatternError::UnbalancedGroup(full.to_string()))
}

fn push_group(pattern: &mut String, index: usize, body: &str, optional: bool, component: Component) {
    if optional && component == Component::Pathname && pattern.len() > 1 && pattern.ends_with('/') {
        pattern.pop();
        pattern.push_str(&format!("(?:/(?P<p{index}>{body}))?"));
    } else if optional {
        pattern.push_str(&format!("(?P<p{index}>{body})?"));
    } else {
        pattern.push_str(&format!("(?P<p{index}>{body})"));
    }
}

/// Splits the part of a pattern after the origin into path, query and hash.
///
/// A `?` directly after a group is a modifier, not the query separator.
fn split_components(rest: &str) -> (&str, Option<&str>, Option<&str>) {
    let chars: Vec<(usize, char)> = rest.char_indices().collect();
    let mut depth = 0usize;
    let mut after_group = false;
    let mut search_at = None;
    let mut hash_at = None;
    let mut k = 0;

    while k < chars.len() {
        let (pos, c) = chars[k];
        match c {
            '\\' => {
                after_group = false;
                k += 2;
                continue;
            }
            '(' => {
                depth += 1;
                after_group = false;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                after_group = depth == 0;
            }
            ':' if depth == 0 => {
                k += 1;
                while k < chars.len() && is_name_char(chars[k].1, false) {
                    k += 1;
                }
                after_group = true;
                continue;
            }
            '*' if depth == 0 => after_group = true,
            '?' if depth == 0 && after_group => after_group = false,
            '?' if depth == 0 && search_at.is_none() => {
                search_at = Some(pos);
                after_group = false;
            }
            '#' if depth == 0 => {
                hash_at = Some(pos);
                break;
            }
            _ => after_group = false,
        }
        k += 1;
    }

    let path_end = search_at.or(hash_at).unwrap_or(rest.len());
    let path = &rest[..path_end];
    let search = search_at.map(|s| &rest[s + 1..hash_at.unwrap_or(rest.len())]);
    let hash = hash_at.map(|h| &rest[h + 1..]);
    (path, search, hash)
}

/// Splits `scheme://authority` off the front of an absolute pattern.
fn split_origin(pattern: &str) -> Option<(&str, &str)> {
    let pos = pattern.find("://")?;
    let scheme = &pattern[..pos];
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    let after = &pattern[pos + 3..];
    let end = after.find(['/', '?', '#']).unwrap_or(after.len());
    Some((&pattern[..pos + 3 + end], &after[end..]))
}

#[derive(Debug, Clone)]
enum PatternKind {
    Any,
    Components {
        origin: Option<String>,
        pathname: ComponentMatcher,
        search: Option<ComponentMatcher>,
        hash: Option<ComponentMatcher>,
    },
}

/// A compiled route template that can be tested against URLs.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    kind: PatternKind,
}

impl UrlPattern {
    /// The pattern that matches every URL.
    #[must_use]
    pub fn wildcard() -> Self {
        Self {
            source: "*".to_string(),
            kind: PatternKind::Any,
        }
    }

    /// Compile a pattern, resolving relative paths against `base`.
    ///
    /// When `base` is given, relative patterns only match URLs with the same
    /// origin. Without one they match any origin.
    pub fn new(pattern: &str, base: Option<&Url>) -> Result<Self, PatternError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        if trimmed == "*" {
            return Ok(Self::wildcard());
        }

        let (origin, rest) = match split_origin(trimmed) {
            Some((origin, rest)) => {
                let parsed = Url::parse(&format!("{origin}/"))
                    .map_err(|_| PatternError::InvalidOrigin(trimmed.to_string()))?;
                (Some(parsed.origin().ascii_serialization()), rest)
            }
            None => (base.map(|b| b.origin().ascii_serialization()), trimmed),
        };

        let (path, search, hash) = split_components(rest);
        let path = if path.is_empty() {
            if origin.is_some() && split_origin(trimmed).is_some() {
                "/".to_string()
            } else {
                "*".to_string()
            }
        } else if path.starts_with('/') || path.starts_with('*') {
            path.to_string()
        } else {
            let base = base.ok_or_else(|| PatternError::RelativeWithoutBase(trimmed.to_string()))?;
            let base_path = base.path();
            let dir = &base_path[..base_path.rfind('/').map_or(0, |i| i + 1)];
            format!("{dir}{path}")
        };

        let pathname = ComponentMatcher::compile(&path, Component::Pathname, trimmed)?;
        let search = search
            .map(|s| ComponentMatcher::compile(s, Component::Search, trimmed))
            .transpose()?;
        let hash = hash
            .map(|h| ComponentMatcher::compile(h, Component::Hash, trimmed))
            .transpose()?;

        Ok(Self {
            source: trimmed.to_string(),
            kind: PatternKind::Components {
                origin,
                pathname,
                search,
                hash,
            },
        })
    }

    /// The pattern string this matcher was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if this is the match-everything pattern.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.kind, PatternKind::Any)
    }

    /// Test a URL against the pattern.
    #[must_use]
    pub fn is_match(&self, url: &Url) -> bool {
        self.exec(url).is_some()
    }

    /// Match a URL, returning the named path, query and hash groups.
    ///
    /// The wildcard pattern matches with no groups.
    #[must_use]
    pub fn exec(&self, url: &Url) -> Option<Params> {
        let mut params = Params::new();
        match &self.kind {
            PatternKind::Any => Some(params),
            PatternKind::Components {
                origin,
                pathname,
                search,
                hash,
            } => {
                if let Some(origin) = origin {
                    if url.origin().ascii_serialization() != *origin {
                        return None;
                    }
                }
                if !pathname.capture_into(url.path(), &mut params) {
                    return None;
                }
                if let Some(search) = search {
                    if !search.capture_into(url.query().unwrap_or(""), &mut params) {
                        return None;
                    }
                }
                if let Some(hash) = hash {
                    if !hash.capture_into(url.fragment().unwrap_or(""), &mut params) {
                        return None;
                    }
                }
                Some(params)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_named_segment() {
        let p = UrlPattern::new("/page/:page", None).unwrap();
        let params = p.exec(&url("https://example.com/page/home")).unwrap();
        assert_eq!(params.get("page").map(String::as_str), Some("home"));
        assert!(!p.is_match(&url("https://example.com/page/home/extra")));
        assert!(!p.is_match(&url("https://example.com/page/")));
    }

    #[test]
    fn test_query_ignored_unless_declared() {
        let p = UrlPattern::new("/app/", None).unwrap();
        assert!(p.is_match(&url("https://x.test/app/?tab=2#top")));

        let q = UrlPattern::new("/search?q=:term", None).unwrap();
        let params = q.exec(&url("https://x.test/search?q=jazz")).unwrap();
        assert_eq!(params["term"], "jazz");
        assert!(!q.is_match(&url("https://x.test/search")));
    }

    #[test]
    fn test_query_param_may_be_empty() {
        let q = UrlPattern::new("/search?q=:term", None).unwrap();
        let params = q.exec(&url("https://x.test/search?q=")).unwrap();
        assert_eq!(params["term"], "");
        assert!(!q.is_match(&url("https://x.test/search?q=a&page=2")));
    }

    #[test]
    fn test_optional_group_takes_slash() {
        let p = UrlPattern::new("/product/:id?", None).unwrap();
        assert!(p.is_match(&url("https://x.test/product")));
        let params = p.exec(&url("https://x.test/product/12")).unwrap();
        assert_eq!(params["id"], "12");
        let none = p.exec(&url("https://x.test/product")).unwrap();
        assert!(!none.contains_key("id"));
    }

    #[test]
    fn test_custom_regex_and_unnamed_groups() {
        let p = UrlPattern::new("/item/:id(\\d+)/*", None).unwrap();
        let params = p.exec(&url("https://x.test/item/42/a/b")).unwrap();
        assert_eq!(params["id"], "42");
        assert_eq!(params["0"], "a/b");
        assert!(!p.is_match(&url("https://x.test/item/abc/a")));
    }

    #[test]
    fn test_group_body_with_inner_groups_keeps_names_aligned() {
        let p = UrlPattern::new("/v/:kind(a(b)?c)/:rest", None).unwrap();
        let params = p.exec(&url("https://x.test/v/abc/tail")).unwrap();
        assert_eq!(params["kind"], "abc");
        assert_eq!(params["rest"], "tail");
    }

    #[test]
    fn test_origin_checks() {
        let base = url("https://example.com/app/index.html");
        let p = UrlPattern::new("/app/:x", Some(&base)).unwrap();
        assert!(p.is_match(&url("https://example.com/app/1")));
        assert!(!p.is_match(&url("https://other.com/app/1")));

        let abs = UrlPattern::new("https://example.com:443/docs", None).unwrap();
        assert!(abs.is_match(&url("https://example.com/docs")));
        assert!(!abs.is_match(&url("http://example.com/docs")));
    }

    #[test]
    fn test_relative_pattern_resolves_against_base_directory() {
        let base = url("https://example.com/app/index.html");
        let p = UrlPattern::new("song/:id", Some(&base)).unwrap();
        assert!(p.is_match(&url("https://example.com/app/song/9")));
        assert_eq!(
            UrlPattern::new("song/:id", None).unwrap_err(),
            PatternError::RelativeWithoutBase("song/:id".to_string())
        );
    }

    #[test]
    fn test_wildcard_matches_everything_without_params() {
        let p = UrlPattern::new(" * ", None).unwrap();
        assert!(p.is_wildcard());
        assert!(p.exec(&url("https://x.test/anything?at=all")).unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        assert_eq!(UrlPattern::new("", None).unwrap_err(), PatternError::Empty);
        assert!(matches!(
            UrlPattern::new("/a/:", None),
            Err(PatternError::InvalidName(_))
        ));
        assert!(matches!(
            UrlPattern::new("/a/(\\d+", None),
            Err(PatternError::UnbalancedGroup(_))
        ));
        assert!(matches!(
            UrlPattern::new("/a/:id([)", None),
            Err(PatternError::Regex { .. })
        ));
    }

    #[test]
    fn test_escaped_characters_are_literal() {
        let p = UrlPattern::new("/files/\\*.txt", None).unwrap();
        assert!(p.is_match(&url("https://x.test/files/*.txt")));
        assert!(!p.is_match(&url("https://x.test/files/a.txt")));
    }

    #[test]
    fn test_hash_component() {
        let p = UrlPattern::new("/doc#:section", None).unwrap();
        let params = p.exec(&url("https://x.test/doc#intro")).unwrap();
        assert_eq!(params["section"], "intro");
        assert!(!p.is_match(&url("https://x.test/doc")));
    }
}
