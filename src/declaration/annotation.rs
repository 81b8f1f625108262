//! Attribute ("annotation") values lowered from `syn` attributes.
//!
//! Only literal values are kept verbatim. Anything else (function calls,
//! macros, arithmetic) becomes [`AttrValue::Unsupported`] and is reported as
//! absent by every accessor, so defaults apply instead.

use indexmap::IndexMap;
use log::debug;
use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, Lit, Meta, Token, UnOp};

/// Key under which positional arguments are stored (`#[get_mapping("/x")]`).
pub const VALUE: &str = "value";

/// A single attribute attached to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Last path segment of the attribute (`spring::get_mapping` -> `get_mapping`)
    pub name: String,
    /// Named arguments in declaration order; positional ones live under [`VALUE`]
    pub args: IndexMap<String, AttrValue>,
}

/// A lowered attribute argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// A path such as `RequestMethod::POST`, reduced to its last segment
    Path(String),
    List(Vec<AttrValue>),
    /// A non-literal expression; holds a short description of its kind
    Unsupported(String),
}

impl AttrValue {
    fn from_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Lit(expr_lit) => match &expr_lit.lit {
                Lit::Str(s) => AttrValue::Str(s.value()),
                Lit::Bool(b) => AttrValue::Bool(b.value),
                Lit::Int(i) => i
                    .base10_parse::<i64>()
                    .map(AttrValue::Int)
                    .unwrap_or_else(|_| AttrValue::Unsupported(i.to_string())),
                Lit::Float(f) => f
                    .base10_parse::<f64>()
                    .map(AttrValue::Float)
                    .unwrap_or_else(|_| AttrValue::Unsupported(f.to_string())),
                Lit::Char(c) => AttrValue::Str(c.value().to_string()),
                _ => AttrValue::Unsupported(describe_expr(expr)),
            },
            Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
                match AttrValue::from_expr(&unary.expr) {
                    AttrValue::Int(i) => AttrValue::Int(-i),
                    AttrValue::Float(f) => AttrValue::Float(-f),
                    _ => AttrValue::Unsupported(describe_expr(expr)),
                }
            }
            Expr::Path(path) => match path.path.segments.last() {
                Some(segment) => AttrValue::Path(segment.ident.to_string()),
                None => AttrValue::Unsupported(describe_expr(expr)),
            },
            Expr::Array(array) => {
                AttrValue::List(array.elems.iter().map(AttrValue::from_expr).collect())
            }
            Expr::Paren(paren) => AttrValue::from_expr(&paren.expr),
            Expr::Group(group) => AttrValue::from_expr(&group.expr),
            _ => AttrValue::Unsupported(describe_expr(expr)),
        }
    }

    /// Textual value of a scalar literal or path
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) | AttrValue::Path(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render a scalar as text (`1`, `true`, `abc`); lists and unsupported values yield `None`
    pub fn to_text(&self) -> Option<String> {
        match self {
            AttrValue::Str(s) | AttrValue::Path(s) => Some(s.clone()),
            AttrValue::Bool(b) => Some(b.to_string()),
            AttrValue::Int(i) => Some(i.to_string()),
            AttrValue::Float(f) => Some(f.to_string()),
            AttrValue::List(_) | AttrValue::Unsupported(_) => None,
        }
    }

    /// Flatten a scalar or list of scalars into strings
    pub fn to_strings(&self) -> Vec<String> {
        match self {
            AttrValue::List(items) => items.iter().filter_map(AttrValue::to_text).collect(),
            other => other.to_text().into_iter().collect(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, AttrValue::Unsupported(_))
    }
}

fn describe_expr(expr: &Expr) -> String {
    let kind = match expr {
        Expr::Call(_) => "function call",
        Expr::MethodCall(_) => "method call",
        Expr::Macro(_) => "macro invocation",
        Expr::Binary(_) => "binary expression",
        Expr::Lit(_) => "literal",
        _ => "expression",
    };
    kind.to_string()
}

impl Annotation {
    /// Create an annotation without arguments
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: IndexMap::new(),
        }
    }

    /// Builder used mainly by tests and synthetic declarations
    pub fn with_arg(mut self, key: impl Into<String>, value: AttrValue) -> Self {
        self.args.insert(key.into(), value);
        self
    }

    /// Lower a `syn` attribute. Doc attributes are not annotations and yield `None`.
    pub fn from_attribute(attr: &Attribute) -> Option<Self> {
        if attr.path().is_ident("doc") {
            return None;
        }
        let name = attr.path().segments.last()?.ident.to_string();
        let mut annotation = Annotation::marker(name);

        match &attr.meta {
            Meta::Path(_) => {}
            Meta::NameValue(name_value) => {
                annotation
                    .args
                    .insert(VALUE.to_string(), AttrValue::from_expr(&name_value.value));
            }
            Meta::List(_) => {
                match attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
                    Ok(exprs) => annotation.collect_args(exprs.iter()),
                    Err(e) => {
                        debug!(
                            "Ignoring arguments of #[{}]: {}",
                            annotation.name, e
                        );
                    }
                }
            }
        }

        Some(annotation)
    }

    fn collect_args<'a>(&mut self, exprs: impl Iterator<Item = &'a Expr>) {
        let mut positional = Vec::new();
        for expr in exprs {
            if let Expr::Assign(assign) = expr {
                if let Expr::Path(left) = &*assign.left {
                    if let Some(ident) = left.path.get_ident() {
                        self.args
                            .insert(ident.to_string(), AttrValue::from_expr(&assign.right));
                        continue;
                    }
                }
            }
            positional.push(AttrValue::from_expr(expr));
        }

        match positional.len() {
            0 => {}
            1 => {
                self.args.insert(VALUE.to_string(), positional.remove(0));
            }
            _ => {
                self.args
                    .insert(VALUE.to_string(), AttrValue::List(positional));
            }
        }
    }

    /// First supported value among `keys`; unsupported values count as absent
    pub fn attr(&self, keys: &[&str]) -> Option<&AttrValue> {
        for key in keys {
            if let Some(value) = self.args.get(*key) {
                if value.is_supported() {
                    return Some(value);
                }
                debug!("#[{}] attribute '{}' is not a literal, ignoring", self.name, key);
            }
        }
        None
    }

    pub fn attr_text(&self, keys: &[&str]) -> Option<String> {
        self.attr(keys).and_then(AttrValue::to_text)
    }

    pub fn attr_bool(&self, keys: &[&str]) -> Option<bool> {
        self.attr(keys).and_then(AttrValue::as_bool)
    }

    pub fn attr_strings(&self, keys: &[&str]) -> Vec<String> {
        self.attr(keys).map(AttrValue::to_strings).unwrap_or_default()
    }
}

/// Anything carrying annotations.
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];

    fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.name == name)
    }

    fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    fn has_any_annotation(&self, names: &[&str]) -> bool {
        self.annotations()
            .iter()
            .any(|a| names.contains(&a.name.as_str()))
    }
}

impl Annotated for [Annotation] {
    fn annotations(&self) -> &[Annotation] {
        self
    }
}
