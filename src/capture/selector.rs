use crate::dom::SelectorError;

/// One `[:attr]` step: query `prefix`, bind `attribute` for each match, and
/// continue below that element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bind {
    /// Selector for the elements carrying the attribute; empty means the current root
    pub prefix: String,
    pub attribute: String,
}

/// A capture selector split at its `[:attr]` markers.
///
/// `main section[:name] .hero` parses to one bind (`main section`, `name`)
/// followed by the terminal selector `.hero`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorProgram {
    pub binds: Vec<Bind>,
    /// Selector run below the last bound element; empty means that element itself
    pub terminal: String,
}

impl SelectorProgram {
    pub fn parse(selector: &str) -> Result<Self, SelectorError> {
        let mut binds = Vec::new();
        let mut rest = selector.trim();
        while let Some(open) = rest.find("[:") {
            let body = &rest[open + 2..];
            let close = body
                .find(']')
                .ok_or_else(|| SelectorError::UnterminatedBinding(selector.to_string()))?;
            let attribute = body[..close].trim();
            if attribute.is_empty() {
                return Err(SelectorError::EmptyBinding(selector.to_string()));
            }
            binds.push(Bind {
                prefix: rest[..open].trim().to_string(),
                attribute: attribute.to_string(),
            });
            rest = body[close + 1..].trim();
        }
        Ok(Self {
            binds,
            terminal: rest.to_string(),
        })
    }

    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.binds.is_empty()
    }
}
