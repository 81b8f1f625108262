//! Doc-comment parsing.
//!
//! Doc comments are split into a free-text description and `@tag` lines:
//!
//! ```text
//! /// Fetch a single user.
//! ///
//! /// @param id the user id
//! /// @return the stored user
//! /// @book admin
//! ```
//!
//! A line that does not start with `@` after a tag continues that tag.

use serde::Serialize;
use syn::{Attribute, Expr, Lit, Meta};

/// Tag namespace. `@param` tags are keyed by parameter name, all other tags by tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Param,
    Named,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub kind: TagKind,
    pub name: String,
    pub content: String,
}

/// Parsed documentation comment of a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    pub description: Option<String>,
    pub tags: Vec<Tag>,
}

impl DocComment {
    /// Collect `#[doc = "..."]` attributes (i.e. `///` lines) and parse them.
    pub fn from_attrs(attrs: &[Attribute]) -> Self {
        let lines: Vec<String> = attrs
            .iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .filter_map(|attr| match &attr.meta {
                Meta::NameValue(nv) => match &nv.value {
                    Expr::Lit(expr_lit) => match &expr_lit.lit {
                        Lit::Str(s) => Some(s.value()),
                        _ => None,
                    },
                    _ => None,
                },
                _ => None,
            })
            .flat_map(|chunk| chunk.lines().map(str::to_string).collect::<Vec<_>>())
            .collect();

        Self::parse(&lines.join("\n"))
    }

    pub fn parse(text: &str) -> Self {
        let mut description: Vec<&str> = Vec::new();
        let mut tags: Vec<Tag> = Vec::new();

        for raw in text.lines() {
            let line = raw.trim();
            if let Some(rest) = line.strip_prefix('@') {
                tags.push(parse_tag(rest));
            } else if let Some(last) = tags.last_mut() {
                if !line.is_empty() {
                    if !last.content.is_empty() {
                        last.content.push(' ');
                    }
                    last.content.push_str(line);
                }
            } else {
                description.push(line);
            }
        }

        let description = description.join("\n").trim().to_string();
        Self {
            description: (!description.is_empty()).then_some(description),
            tags,
        }
    }

    /// Look up a tag by namespace and name; the first occurrence wins
    pub fn tag(&self, kind: TagKind, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.kind == kind && t.name == name)
    }

    pub fn param(&self, name: &str) -> Option<&Tag> {
        self.tag(TagKind::Param, name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(TagKind::Named, name).is_some()
    }

    /// First line of the description
    pub fn summary(&self) -> Option<&str> {
        self.description
            .as_deref()
            .and_then(|d| d.lines().next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_empty()
    }
}

fn parse_tag(rest: &str) -> Tag {
    let (name, content) = split_word(rest);
    if name == "param" {
        let (param, text) = split_word(content);
        Tag {
            kind: TagKind::Param,
            name: param.to_string(),
            content: text.to_string(),
        }
    } else {
        Tag {
            kind: TagKind::Named,
            name: name.to_string(),
            content: content.to_string(),
        }
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim()),
        None => (s, ""),
    }
}
