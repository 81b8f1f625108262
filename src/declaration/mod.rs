//! Owned declaration tree consumed by extraction strategies.
//!
//! The tree is deliberately independent of `syn`: strategies see classes,
//! methods, parameters, annotations and doc tags, nothing else. [`lower`]
//! builds it from parsed Rust files, where a "class" is an `impl` or `trait`
//! block and its methods are the associated functions.

pub mod annotation;
pub mod doc;
pub mod lower;

pub use annotation::{Annotated, Annotation, AttrValue, VALUE};
pub use doc::{DocComment, Tag, TagKind};
pub use lower::lower_file;

use crate::type_resolver::TypeRef;
use std::path::PathBuf;

/// All declarations of one source file, in source order.
#[derive(Debug, Clone, Default)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub classes: Vec<ClassDecl>,
}

/// A controller-like declaration unit (`impl` or `trait` block).
#[derive(Debug, Clone, Default)]
pub struct ClassDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub doc: DocComment,
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, Default)]
pub struct MethodDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub doc: DocComment,
    pub params: Vec<ParamDecl>,
    /// `None` for methods returning `()`
    pub return_type: Option<TypeRef>,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    /// `None` when the parameter binds a pattern rather than a plain identifier
    pub name: Option<String>,
    pub type_ref: TypeRef,
    pub annotations: Vec<Annotation>,
}

impl ParamDecl {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: Some(name.to_string()),
            type_ref,
            annotations: Vec::new(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for ClassDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl Annotated for MethodDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl Annotated for ParamDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}
