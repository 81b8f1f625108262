//! Framework extraction strategies.
//!
//! A strategy decides which declarations are controllers and endpoint
//! handlers, and fills chapters and sections from them. The active strategy
//! is picked once from configuration through [`Framework`].

pub mod spring;

use crate::declaration::{ClassDecl, MethodDecl};
use crate::description::TypeDescription;
use crate::error::{Error, ExtractError, Result};
use crate::resolver::{TypeResolvers, TypeResolversBuilder};
use crate::schema::{Chapter, Section};
use crate::type_resolver::{TypeDescriptor, TypeRef};
use clap::ValueEnum;

/// Everything a strategy needs while visiting declarations
pub struct ExtractContext<'a> {
    pub resolvers: &'a TypeResolvers,
    pub descriptor: &'a dyn TypeDescriptor,
    /// Prepended to every chapter base path
    pub url_prefix: &'a str,
}

impl<'a> ExtractContext<'a> {
    pub fn new(resolvers: &'a TypeResolvers, descriptor: &'a dyn TypeDescriptor) -> Self {
        Self {
            resolvers,
            descriptor,
            url_prefix: "",
        }
    }

    pub fn with_url_prefix(mut self, url_prefix: &'a str) -> Self {
        self.url_prefix = url_prefix;
        self
    }

    pub fn resolve(&self, ty: &TypeRef) -> TypeDescription {
        self.resolvers.resolve(ty, self.descriptor)
    }

    pub fn resolve_name(&self, name: &str) -> TypeDescription {
        self.resolvers.resolve_name(name, self.descriptor)
    }
}

/// Contract implemented once per supported source framework.
pub trait ParserStrategy: Send + Sync {
    /// Framework name as used in configuration
    fn name(&self) -> &'static str;

    /// Register framework-specific resolvers; runs once before any extraction
    fn on_load(&self, _resolvers: &mut TypeResolversBuilder) {}

    /// Is this declaration a controller-like unit?
    fn accept_class(&self, class: &ClassDecl) -> bool;

    /// Is this member of an accepted class an endpoint handler?
    fn accept_method(&self, class: &ClassDecl, method: &MethodDecl) -> bool;

    /// Populate chapter-level shared context such as base paths
    fn visit_class(&self, class: &ClassDecl, chapter: &mut Chapter, cx: &ExtractContext<'_>);

    /// Populate `section` from a handler and return one copy per composed path.
    ///
    /// `section` arrives with its documentation (name, description, tags)
    /// already attached. An error skips this endpoint only; the caller logs
    /// it and moves on.
    fn visit_method(
        &self,
        method: &MethodDecl,
        chapter: &Chapter,
        section: Section,
        cx: &ExtractContext<'_>,
    ) -> std::result::Result<Vec<Section>, ExtractError>;
}

/// Supported source frameworks
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash)]
pub enum Framework {
    /// Spring MVC style attributes (`#[rest_controller]`, `#[get_mapping]`, ...)
    #[value(alias = "springmvc")]
    Spring,
}

impl Framework {
    /// Look up a framework by its configuration name, ignoring case
    pub fn from_name(name: &str) -> Result<Self> {
        <Framework as ValueEnum>::from_str(name.trim(), true)
            .map_err(|_| Error::UnknownFramework(name.to_string()))
    }

    pub fn strategy(self) -> Box<dyn ParserStrategy> {
        match self {
            Framework::Spring => Box::new(spring::SpringStrategy),
        }
    }
}
