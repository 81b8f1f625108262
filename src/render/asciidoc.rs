//! AsciiDoc rendering, one document per book.

use super::{ProjectRender, RenderedFile};
use crate::description::Row;
use crate::schema::{Book, Project, Section};
use anyhow::Result;
use log::{debug, info};

pub const EXTENSION: &str = ".adoc";

const ATTRIBUTES: &[(&str, &str)] = &[
    ("doctype", "book"),
    ("toc", "left"),
    ("toclevels", "2"),
    ("toc-title", "TOC"),
    ("source-highlighter", "highlightjs"),
];

const TABLE_HEADER: [&str; 5] = ["Key", "Type", "Condition", "Def", "Remark"];

/// Append-only AsciiDoc writer
#[derive(Debug, Default)]
pub struct MarkupBuilder {
    content: String,
}

impl MarkupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document title followed by its attribute entries
    pub fn header(&mut self, title: &str, attributes: &[(&str, &str)]) -> &mut Self {
        self.line(&format!("= {}", title));
        for (name, value) in attributes {
            self.line(&format!(":{}: {}", name, value));
        }
        self.br()
    }

    /// Section title; level 1 is a top-level section
    pub fn title(&mut self, level: usize, text: &str) -> &mut Self {
        self.line(&format!("{} {}", "=".repeat(level + 1), text));
        self.br()
    }

    /// A paragraph; blank text writes nothing
    pub fn paragraph(&mut self, text: Option<&str>) -> &mut Self {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => {
                // a blank line inside a paragraph would end it
                for line in text.lines().filter(|l| !l.trim().is_empty()) {
                    self.line(&format!("{} +", line.trim_end()));
                }
                trim_hard_break(&mut self.content);
                self.br()
            }
            None => self,
        }
    }

    /// A delimited source listing
    pub fn listing(&mut self, language: &str, lines: &[String]) -> &mut Self {
        self.line(&format!("[source,{}]", language));
        self.line("----");
        for line in lines {
            self.line(line);
        }
        self.line("----");
        self.br()
    }

    /// A table whose first row is the header; an empty table writes nothing
    pub fn table(&mut self, header: &[&str], rows: &[Vec<String>]) -> &mut Self {
        if rows.is_empty() {
            return self;
        }
        self.line(&format!("[options=\"header\",cols=\"{}\"]", header.len()));
        self.line("|===");
        self.line(&header.iter().map(|h| format!("|{}", h)).collect::<String>());
        for row in rows {
            self.line(&row.iter().map(|cell| format!("|{}", cell_text(cell))).collect::<String>());
        }
        self.line("|===");
        self.br()
    }

    pub fn line(&mut self, text: &str) -> &mut Self {
        self.content.push_str(text);
        self.content.push('\n');
        self
    }

    pub fn br(&mut self) -> &mut Self {
        self.content.push('\n');
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

fn trim_hard_break(content: &mut String) {
    if content.ends_with(" +\n") {
        let len = content.len();
        content.replace_range(len - 3.., "\n");
    }
}

fn cell_text(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

/// Renders each book of a project to `{id}_{book}.adoc`
pub struct AsciidocRender;

impl ProjectRender for AsciidocRender {
    fn render(&self, project: &Project) -> Result<Vec<RenderedFile>> {
        let files = project
            .books
            .values()
            .map(|book| {
                let path = format!("{}_{}{}", project.id, book.name, EXTENSION);
                info!("Rendering AsciiDoc {}", path);
                RenderedFile::new(path, render_book(project, book))
            })
            .collect();
        Ok(files)
    }
}

/// Concatenate rendered books into `{stem}.adoc`, in the given order
pub fn merge(stem: &str, parts: &[RenderedFile]) -> RenderedFile {
    let path = format!("{}{}", stem, EXTENSION);
    info!("Merging {} AsciiDoc files into {}", parts.len(), path);
    let content = parts
        .iter()
        .map(|part| part.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    RenderedFile::new(path, content)
}

fn render_book(project: &Project, book: &Book) -> String {
    let mut builder = MarkupBuilder::new();

    let mut title = project.name.clone();
    if !book.is_default() {
        title.push_str(" - ");
        title.push_str(&book.name);
    }
    builder.header(&title, ATTRIBUTES);
    if let Some(version) = &project.version {
        builder.paragraph(Some(format!("version:{}", version).as_str()));
    }
    builder.paragraph(project.description.as_deref());

    for chapter in &book.chapters {
        debug!("Rendering chapter {}", chapter.name);
        builder.title(1, &chapter.name);
        builder.paragraph(chapter.description.as_deref());
        for section in &chapter.sections {
            render_section(&mut builder, section);
        }
    }
    builder.into_content()
}

fn render_section(builder: &mut MarkupBuilder, section: &Section) {
    builder.title(2, &section.name);
    builder.paragraph(section.description.as_deref());

    builder.title(4, "request");
    let mut request = vec![section.request_line()];
    for header in section.in_headers.values() {
        let remark = section
            .param(&header.key)
            .map(|tag| tag.content.as_str())
            .unwrap_or_default();
        request.push(format!("header: {}  {}", header, remark).trim_end().to_string());
    }
    if section.has_request_body() {
        request.push(String::new());
        request.extend(section.parameter_string().lines().map(str::to_string));
    }
    builder.listing("HTTP", &request);
    builder.table(&TABLE_HEADER, &table_rows(section.request_rows.values()));

    builder.title(4, "response");
    let mut response: Vec<String> = section
        .out_headers
        .values()
        .map(|header| format!("header: {}", header))
        .collect();
    if section.has_response_body() {
        if !response.is_empty() {
            response.push(String::new());
        }
        response.extend(section.response_string().lines().map(str::to_string));
    } else {
        response.push("N/A".to_string());
    }
    builder.listing("JSON", &response);
    builder.table(&TABLE_HEADER, &table_rows(section.response_rows.values()));
}

fn table_rows<'a>(rows: impl Iterator<Item = &'a Row>) -> Vec<Vec<String>> {
    rows.map(|row| {
        vec![
            row.key.clone(),
            row.type_name.clone(),
            row.condition.clone(),
            row.default_value.clone().unwrap_or_default(),
            row.remark.clone().unwrap_or_default(),
        ]
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Chapter, Header, Method};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    fn row(key: &str, type_name: &str, default_value: Option<&str>) -> Row {
        Row {
            key: key.to_string(),
            type_name: type_name.to_string(),
            condition: "optional".to_string(),
            default_value: default_value.map(str::to_string),
            remark: Some("a|b".to_string()),
        }
    }

    #[test]
    fn test_builder_blocks() {
        let mut builder = MarkupBuilder::new();
        builder
            .title(1, "Users")
            .paragraph(Some("first\n\nsecond"))
            .paragraph(None)
            .listing("HTTP", &["GET /users".to_string()])
            .table(&["A", "B"], &[]);
        assert_eq!(
            builder.content(),
            "== Users\n\nfirst +\nsecond\n\n[source,HTTP]\n----\nGET /users\n----\n\n"
        );
    }

    #[test]
    fn test_builder_table_escapes_cells() {
        let mut builder = MarkupBuilder::new();
        builder.table(&["Key", "Remark"], &[vec!["a".to_string(), "x|y".to_string()]]);
        assert_eq!(
            builder.content(),
            "[options=\"header\",cols=\"2\"]\n|===\n|Key|Remark\n|a|x\\|y\n|===\n\n"
        );
    }

    #[test]
    fn test_one_file_per_book() {
        let mut project = Project::new("shop", "Shop API");
        project.version = Some("1.2".to_string());
        project.add_chapter(Chapter::new("Users"));
        let mut admin = Chapter::new("Admin");
        admin.book = Some("ops".to_string());
        project.add_chapter(admin);

        let files = AsciidocRender.render(&project).unwrap();
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("shop_default.adoc"), PathBuf::from("shop_ops.adoc")]
        );
        assert!(files[0].content.starts_with("= Shop API\n:doctype: book\n:toc: left\n"));
        assert!(files[0].content.contains("version:1.2\n"));
        assert!(files[1].content.starts_with("= Shop API - ops\n"));
        assert!(files[1].content.contains("== Admin\n"));
    }

    #[test]
    fn test_merge_keeps_order() {
        let parts = vec![
            RenderedFile::new("users_default.adoc", "= users\n"),
            RenderedFile::new("orders_default.adoc", "= orders\n"),
        ];
        let merged = merge("all", &parts);
        assert_eq!(merged.path, PathBuf::from("all.adoc"));
        assert_eq!(merged.content, "= users\n\n= orders\n");
    }

    #[test]
    fn test_section_layout() {
        let mut section = Section::new("create");
        section.name = "Create user".to_string();
        section.method = Method::Post;
        section.uri = "/users".to_string();
        section.query_parameter = false;
        section.parameter = Some(json!({"name": ""}));
        section.add_in_header(Header::json_content_type());
        section.add_in_header(Header::new("X-Token", "{value}"));
        section.tags.push(crate::declaration::Tag {
            kind: crate::declaration::TagKind::Param,
            name: "X-Token".to_string(),
            content: "access token".to_string(),
        });
        section.add_request_row(row("name", "String", Some("anon")));

        let mut builder = MarkupBuilder::new();
        render_section(&mut builder, &section);
        let text = builder.into_content();

        assert!(text.starts_with(
            "=== Create user\n\n===== request\n\n[source,HTTP]\n----\nPOST /users\n"
        ));
        assert!(text.contains("header: Content-Type: application/json\n"));
        assert!(text.contains("header: X-Token: {value}  access token\n"));
        assert!(text.contains("\n\n{\n  \"name\": \"\"\n}\n----\n"));
        assert!(text.contains("|name|String|optional|anon|a\\|b\n"));
        assert!(text.ends_with("===== response\n\n[source,JSON]\n----\nN/A\n----\n\n"));
    }
}
