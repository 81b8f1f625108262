//! Document model: Project → Book → Chapter → Section.
//!
//! Each level exclusively owns the next one. A run builds a fresh [`Project`],
//! filters it once with [`Project::retain_renderable`] and hands it to the
//! renderers.

use crate::declaration::{Tag, TagKind};
use crate::description::Row;
use crate::filter::PathFilter;
use indexmap::IndexMap;
use log::debug;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// HTTP request method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl Method {
    /// Parse a method name, case-insensitively (`"post"`, `"POST"`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Some(Method::Get),
            "POST" => Some(Method::Post),
            "PUT" => Some(Method::Put),
            "DELETE" => Some(Method::Delete),
            "PATCH" => Some(Method::Patch),
            "HEAD" => Some(Method::Head),
            "OPTIONS" => Some(Method::Options),
            "TRACE" => Some(Method::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request or response header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub const CONTENT_TYPE: &'static str = "Content-Type";
    pub const APPLICATION_JSON: &'static str = "application/json";

    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Parse a header declaration such as `X-Version=2` or `Accept: text/plain`.
    /// A bare name gets an empty value.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let (key, value) = match text.find(|c: char| c == '=' || c == ':') {
            Some(idx) => (&text[..idx], &text[idx + 1..]),
            None => (text, ""),
        };
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key, value.trim()))
    }

    pub fn json_content_type() -> Self {
        Self::new(Self::CONTENT_TYPE, Self::APPLICATION_JSON)
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

fn rows_as_list<S: Serializer>(
    rows: &IndexMap<String, Row>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(rows.values())
}

/// One documented endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub method: Method,
    pub uri: String,
    pub path_variables: IndexMap<String, String>,
    pub in_headers: IndexMap<String, Header>,
    pub out_headers: IndexMap<String, Header>,
    /// Parameters travel in the query string rather than a body
    pub query_parameter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(serialize_with = "rows_as_list")]
    pub request_rows: IndexMap<String, Row>,
    #[serde(serialize_with = "rows_as_list")]
    pub response_rows: IndexMap<String, Row>,
    pub tags: Vec<Tag>,
    #[serde(skip)]
    pub ignore: bool,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            query_parameter: true,
            ..Self::default()
        }
    }

    /// Add or replace an inbound header; an existing key keeps its position
    pub fn add_in_header(&mut self, header: Header) {
        self.in_headers.insert(header.key.clone(), header);
    }

    pub fn add_out_header(&mut self, header: Header) {
        self.out_headers.insert(header.key.clone(), header);
    }

    pub fn add_request_row(&mut self, row: Row) {
        self.request_rows.insert(row.key.clone(), row);
    }

    pub fn add_request_rows(&mut self, rows: impl IntoIterator<Item = Row>) {
        for row in rows {
            self.add_request_row(row);
        }
    }

    pub fn add_response_rows(&mut self, rows: impl IntoIterator<Item = Row>) {
        for row in rows {
            self.response_rows.insert(row.key.clone(), row);
        }
    }

    pub fn tag(&self, kind: TagKind, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.kind == kind && t.name == name)
    }

    /// The `@param` tag documenting parameter `name`
    pub fn param(&self, name: &str) -> Option<&Tag> {
        self.tag(TagKind::Param, name)
    }

    pub fn has_request_body(&self) -> bool {
        !self.query_parameter && self.parameter.is_some()
    }

    pub fn has_response_body(&self) -> bool {
        self.response.is_some()
    }

    /// Request line as shown in documents, e.g. `GET /users?page=0&size=20`
    pub fn request_line(&self) -> String {
        let mut line = format!("{} {}", self.method, self.uri);
        if self.query_parameter {
            if let Some(Value::Object(params)) = &self.parameter {
                let query: Vec<String> = params
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, query_value(value)))
                    .collect();
                if !query.is_empty() {
                    line.push('?');
                    line.push_str(&query.join("&"));
                }
            }
        }
        line
    }

    pub fn parameter_string(&self) -> String {
        pretty(self.parameter.as_ref())
    }

    pub fn response_string(&self) -> String {
        pretty(self.response.as_ref())
    }
}

fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn pretty(value: Option<&Value>) -> String {
    value
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_default()
}

/// One controller-like declaration unit
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip)]
    pub ignore: bool,
    /// Book this chapter is filed under; `None` means [`Book::DEFAULT`]
    #[serde(skip)]
    pub book: Option<String>,
    /// Base paths inherited by every section of the chapter
    #[serde(skip)]
    pub base_uris: Vec<String>,
    pub sections: Vec<Section>,
}

impl Chapter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Named group of chapters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Book {
    pub name: String,
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub const DEFAULT: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chapters: Vec::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.name == Self::DEFAULT
    }
}

/// Top-level document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub books: IndexMap<String, Book>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get or create a book; books keep their first-insertion order
    pub fn book_mut(&mut self, name: &str) -> &mut Book {
        self.books
            .entry(name.to_string())
            .or_insert_with(|| Book::new(name))
    }

    /// File a chapter under the book it names, or the default book
    pub fn add_chapter(&mut self, chapter: Chapter) {
        let book = chapter.book.clone().unwrap_or_else(|| Book::DEFAULT.to_string());
        self.book_mut(&book).chapters.push(chapter);
    }

    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.books.values().flat_map(|b| b.chapters.iter())
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.chapters().flat_map(|c| c.sections.iter())
    }

    /// Drop everything renderers must not see: ignored sections, sections
    /// rejected by `filter`, ignored chapters, chapters left without sections
    /// and books left without chapters.
    pub fn retain_renderable(&mut self, filter: &PathFilter) {
        for book in self.books.values_mut() {
            book.chapters.retain_mut(|chapter| {
                if chapter.ignore {
                    debug!("Dropping ignored chapter {}", chapter.name);
                    return false;
                }
                chapter.sections.retain(|section| {
                    let keep = !section.ignore && filter.should_keep(&section.uri);
                    if !keep {
                        debug!("Dropping section {} {}", section.method, section.uri);
                    }
                    keep
                });
                !chapter.sections.is_empty()
            });
        }
        self.books.retain(|_, book| !book.chapters.is_empty());
    }
}
