//! Selector parsing and matching for [`MemoryDocument`](super::MemoryDocument).
//!
//! Supported: type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! (quoted or bare), `:root`, descendant and `>` combinators, and `,` lists.
//! Everything else is reported as unsupported.

use super::SelectorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrMatch {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrMatch>,
    pub root: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

/// One complex selector: compounds joined by combinators, left to right.
/// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Complex {
    pub compounds: Vec<Compound>,
    pub combinators: Vec<Combinator>,
}

/// What the matcher needs to know about an element.
pub(crate) trait ElementView {
    fn tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&str>;
    fn is_root(&self) -> bool;
    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn unsupported(&self, reason: impl Into<String>) -> SelectorError {
        SelectorError::Unsupported {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(c) => self.unsupported(format!("unexpected `{c}` at offset {start}")),
                None => self.unsupported("unexpected end of selector"),
            });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<AttrMatch, SelectorError> {
        // opening `[` already consumed
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let result = match self.peek() {
            Some(']') => AttrMatch::Exists(name),
            Some('=') => {
                self.pos += 1;
                self.skip_whitespace();
                let value = match self.peek() {
                    Some(q @ ('"' | '\'')) => {
                        self.pos += 1;
                        let start = self.pos;
                        while self.peek().is_some_and(|c| c != q) {
                            self.pos += 1;
                        }
                        if self.peek().is_none() {
                            return Err(self.unsupported("unterminated string"));
                        }
                        let value: String = self.chars[start..self.pos].iter().collect();
                        self.pos += 1;
                        value
                    }
                    _ => self.ident()?,
                };
                self.skip_whitespace();
                AttrMatch::Equals(name, value)
            }
            Some(c) => return Err(self.unsupported(format!("attribute operator `{c}`"))),
            None => return Err(self.unsupported("unterminated attribute selector")),
        };
        if self.peek() != Some(']') {
            return Err(self.unsupported("unterminated attribute selector"));
        }
        self.pos += 1;
        Ok(result)
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let start = self.pos;
        match self.peek() {
            Some('*') => self.pos += 1,
            Some(c) if is_ident_char(c) => compound.tag = Some(self.ident()?.to_ascii_lowercase()),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    let pseudo = self.ident()?;
                    if pseudo != "root" {
                        return Err(self.unsupported(format!("pseudo-class `:{pseudo}`")));
                    }
                    compound.root = true;
                }
                _ => break,
            }
        }
        if self.pos == start {
            return Err(match self.peek() {
                Some(c) => self.unsupported(format!("unexpected `{c}` at offset {start}")),
                None => self.unsupported("dangling combinator"),
            });
        }
        Ok(compound)
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                }
                Some('+' | '~') => return Err(self.unsupported("sibling combinators")),
                Some(_) if had_space => combinators.push(Combinator::Descendant),
                Some(c) => return Err(self.unsupported(format!("unexpected `{c}`"))),
            }
            compounds.push(self.compound()?);
        }
        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn list(mut self) -> Result<Vec<Complex>, SelectorError> {
        let mut list = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            list.push(self.complex()?);
        }
        if self.peek().is_some() {
            return Err(self.unsupported("trailing input"));
        }
        Ok(list)
    }
}

/// Parse a selector list.
pub(crate) fn parse_selector(selector: &str) -> Result<Vec<Complex>, SelectorError> {
    if selector.trim().is_empty() {
        return Err(SelectorError::Empty);
    }
    Parser::new(selector).list()
}

fn compound_matches<E: ElementView>(compound: &Compound, element: &E) -> bool {
    if compound.root && !element.is_root() {
        return false;
    }
    if let Some(tag) = &compound.tag {
        if !element.tag().eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if element.attribute("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| element.has_class(c)) {
        return false;
    }
    compound.attrs.iter().all(|attr| match attr {
        AttrMatch::Exists(name) => element.attribute(name).is_some(),
        AttrMatch::Equals(name, value) => element.attribute(name) == Some(value.as_str()),
    })
}

/// Match `complex` against the element at the end of `path`.
///
/// `path` runs from the document root down to the candidate element, so
/// ancestors outside the query root still take part in matching.
pub(crate) fn complex_matches<E: ElementView>(complex: &Complex, path: &[E]) -> bool {
    fn step<E: ElementView>(complex: &Complex, index: usize, path: &[E]) -> bool {
        let Some((element, ancestors)) = path.split_last() else {
            return false;
        };
        if !compound_matches(&complex.compounds[index], element) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match complex.combinators[index - 1] {
            Combinator::Child => step(complex, index - 1, ancestors),
            Combinator::Descendant => {
                (1..=ancestors.len()).rev().any(|end| step(complex, index - 1, &ancestors[..end]))
            }
        }
    }
    step(complex, complex.compounds.len() - 1, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct El {
        tag: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
        root: bool,
    }

    impl ElementView for El {
        fn tag(&self) -> &str {
            self.tag
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
        fn is_root(&self) -> bool {
            self.root
        }
    }

    fn el(tag: &'static str, attrs: Vec<(&'static str, &'static str)>) -> El {
        El {
            tag,
            attrs,
            root: false,
        }
    }

    #[test]
    fn test_parse_compound_parts() {
        let list = parse_selector("li#song3.active[data-x='1'] > a").unwrap();
        assert_eq!(list.len(), 1);
        let first = &list[0].compounds[0];
        assert_eq!(first.tag.as_deref(), Some("li"));
        assert_eq!(first.id.as_deref(), Some("song3"));
        assert_eq!(first.classes, vec!["active"]);
        assert_eq!(
            first.attrs,
            vec![AttrMatch::Equals("data-x".to_string(), "1".to_string())]
        );
        assert_eq!(list[0].combinators, vec![Combinator::Child]);
    }

    #[test]
    fn test_unsupported_syntax() {
        assert_eq!(parse_selector("  "), Err(SelectorError::Empty));
        assert!(parse_selector("a:hover").is_err());
        assert!(parse_selector("a + b").is_err());
        assert!(parse_selector("li#song$(id)").is_err());
        assert!(parse_selector("a >").is_err());
        assert!(parse_selector("[x^=y]").is_err());
    }

    #[test]
    fn test_descendant_matching_backtracks() {
        let list = parse_selector("main section .hero").unwrap();
        let path = [
            El {
                tag: "html",
                attrs: vec![],
                root: true,
            },
            el("main", vec![]),
            el("section", vec![("name", "faq")]),
            el("div", vec![]),
            el("div", vec![("class", "hero big")]),
        ];
        assert!(complex_matches(&list[0], &path));
        let child = parse_selector("section > .hero").unwrap();
        assert!(!complex_matches(&child[0], &path));
    }

    #[test]
    fn test_root_pseudo_class() {
        let list = parse_selector(":root.vt-route-playlist li").unwrap();
        let path = [
            El {
                tag: "html",
                attrs: vec![("class", "vt-route-playlist")],
                root: true,
            },
            el("li", vec![]),
        ];
        assert!(complex_matches(&list[0], &path));
    }
}
