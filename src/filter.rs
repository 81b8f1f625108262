//! Only/exclude path filtering.
//!
//! Patterns are globs over route paths, compiled with `globset`:
//!
//! | token    | matches                                   |
//! |----------|-------------------------------------------|
//! | `**`     | any number of segments, including none    |
//! | `*`      | any run of characters inside one segment  |
//! | `?`      | exactly one character                     |
//! | `{name}` | a path variable, same as `*`              |
//!
//! Patterns are validated when the filter is built, never during extraction.

use crate::error::{Error, Result};
use crate::uri::Uri;
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use std::fmt;

/// A validated path pattern and the globs it compiles to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    globs: Vec<Glob>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if !trimmed.starts_with('/') {
            return Err(invalid("pattern must start with '/'"));
        }

        let mut segments = Vec::new();
        for raw in trimmed.split('/').filter(|s| !s.is_empty()) {
            if raw != "**" && raw.contains("**") {
                return Err(invalid("'**' must be a whole segment"));
            }
            segments.push(replace_variables(raw).map_err(invalid)?);
        }

        // `/a/**` also covers `/a` itself
        let mut sources = vec![format!("/{}", segments.join("/"))];
        if segments.last().map(String::as_str) == Some("**") {
            sources.push(format!("/{}", segments[..segments.len() - 1].join("/")));
        }

        let globs = sources
            .iter()
            .map(|source| compile(source).map_err(|e| invalid(&e.to_string())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source: trimmed.to_string(),
            globs,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, uri: &str) -> bool {
        let uri = Uri::parse(uri).to_string();
        self.globs
            .iter()
            .any(|glob| glob.compile_matcher().is_match(&uri))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// `*` and `?` never cross a separator; only `**` does
fn compile(source: &str) -> std::result::Result<Glob, globset::Error> {
    GlobBuilder::new(source).literal_separator(true).build()
}

/// Rewrite `{name}` groups to `*` so globset does not read them as alternations
fn replace_variables(raw: &str) -> std::result::Result<String, &'static str> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err("nested '{'"),
                        _ => {}
                    }
                }
                if !closed {
                    return Err("unbalanced '{'");
                }
                out.push('*');
            }
            '}' => return Err("unbalanced '}'"),
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Decides whether a section with a given URI is emitted.
///
/// A non-empty only-list takes precedence: the exclude-list is then ignored.
#[derive(Debug, Clone)]
pub struct PathFilter {
    only: GlobSet,
    exclude: GlobSet,
}

impl Default for PathFilter {
    fn default() -> Self {
        Self {
            only: GlobSet::empty(),
            exclude: GlobSet::empty(),
        }
    }
}

impl PathFilter {
    pub fn new<S: AsRef<str>>(only: &[S], exclude: &[S]) -> Result<Self> {
        Ok(Self {
            only: build_set(only)?,
            exclude: build_set(exclude)?,
        })
    }

    pub fn should_keep(&self, uri: &str) -> bool {
        let uri = Uri::parse(uri).to_string();
        if !self.only.is_empty() {
            return self.only.is_match(&uri);
        }
        !self.exclude.is_match(&uri)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.only.is_empty() && self.exclude.is_empty()
    }
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        for glob in PathPattern::parse(pattern.as_ref())?.globs {
            builder.add(glob);
        }
    }
    builder.build().map_err(|e| Error::InvalidPattern {
        pattern: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        reason: e.to_string(),
    })
}
