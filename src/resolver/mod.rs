//! Resolver registry: an ordered chain of resolvers turning type references
//! into [`TypeDescription`]s.
//!
//! The registry is assembled once through [`TypeResolversBuilder`] (framework
//! strategies register their plugin resolvers there) and is immutable
//! afterwards. Per-run state lives in a short-lived [`Resolution`], so a
//! single `Arc<TypeResolvers>` can serve several threads.

pub mod builtin;
mod object;

pub use object::ObjectResolver;

use crate::description::TypeDescription;
use crate::type_resolver::{TypeDescriptor, TypeRef};
use log::{debug, warn};

/// Upper bound on nested resolutions within one top-level resolve
pub const MAX_DEPTH: usize = 16;

/// Attempts to describe a type reference.
///
/// A resolver that does not handle `ty` returns an unavailable description
/// and the registry moves on to the next one.
pub trait Resolver: Send + Sync {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription;
}

/// Attempts to describe a type given only by name, e.g. an attribute value
/// such as `#[response_type("Page<User>")]`.
pub trait NameResolver: Send + Sync {
    fn resolve_name(&self, name: &str, cx: &mut Resolution<'_>) -> TypeDescription;
}

/// State of one resolution run: the registry, the type capability and the
/// stack of named types currently being expanded.
pub struct Resolution<'a> {
    resolvers: &'a TypeResolvers,
    descriptor: &'a dyn TypeDescriptor,
    expanding: Vec<String>,
    depth: usize,
}

impl<'a> Resolution<'a> {
    pub fn new(resolvers: &'a TypeResolvers, descriptor: &'a dyn TypeDescriptor) -> Self {
        Self {
            resolvers,
            descriptor,
            expanding: Vec::new(),
            depth: 0,
        }
    }

    pub fn descriptor(&self) -> &'a dyn TypeDescriptor {
        self.descriptor
    }

    /// Resolve a nested type reference through the whole chain
    pub fn resolve(&mut self, ty: &TypeRef) -> TypeDescription {
        if self.depth >= MAX_DEPTH {
            warn!("Type nesting deeper than {} at {}, truncating", MAX_DEPTH, ty);
            return TypeDescription::recursive(ty.to_string());
        }
        self.depth += 1;
        let resolvers = self.resolvers;
        let description = resolvers.resolve_in(ty, self);
        self.depth -= 1;
        description
    }

    pub fn resolve_name(&mut self, name: &str) -> TypeDescription {
        let resolvers = self.resolvers;
        resolvers.resolve_name_in(name, self)
    }

    /// Whether a named type is already being expanded further up the tree
    pub fn is_expanding(&self, name: &str) -> bool {
        self.expanding.iter().any(|n| n == name)
    }

    /// Run `f` with `name` marked as being expanded
    pub fn expand<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.expanding.push(name.to_string());
        let result = f(self);
        self.expanding.pop();
        result
    }
}

/// The configured, immutable resolver chain.
pub struct TypeResolvers {
    resolvers: Vec<Box<dyn Resolver>>,
    name_resolvers: Vec<Box<dyn NameResolver>>,
    fallback: ObjectResolver,
}

impl TypeResolvers {
    pub fn builder() -> TypeResolversBuilder {
        TypeResolversBuilder::default()
    }

    /// Resolve a top-level type reference
    pub fn resolve(&self, ty: &TypeRef, descriptor: &dyn TypeDescriptor) -> TypeDescription {
        Resolution::new(self, descriptor).resolve(ty)
    }

    /// Resolve a type given by name
    pub fn resolve_name(&self, name: &str, descriptor: &dyn TypeDescriptor) -> TypeDescription {
        Resolution::new(self, descriptor).resolve_name(name)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    fn resolve_in(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        for resolver in &self.resolvers {
            let description = resolver.resolve(ty, cx);
            if description.is_available() {
                return description;
            }
        }
        self.fallback.resolve(ty, cx)
    }

    fn resolve_name_in(&self, name: &str, cx: &mut Resolution<'_>) -> TypeDescription {
        for resolver in &self.name_resolvers {
            let description = resolver.resolve_name(name, cx);
            if description.is_available() {
                return description;
            }
        }
        match TypeRef::parse(name) {
            Some(ty) => cx.resolve(&ty),
            None => TypeDescription::unavailable(name),
        }
    }
}

impl Default for TypeResolvers {
    fn default() -> Self {
        TypeResolversBuilder::default().build()
    }
}

/// Setup phase of the registry. Plugin resolvers run before the built-ins,
/// in registration order.
#[derive(Default)]
pub struct TypeResolversBuilder {
    resolvers: Vec<Box<dyn Resolver>>,
    name_resolvers: Vec<Box<dyn NameResolver>>,
}

impl TypeResolversBuilder {
    pub fn add_resolver(&mut self, resolver: impl Resolver + 'static) -> &mut Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn add_name_resolver(&mut self, resolver: impl NameResolver + 'static) -> &mut Self {
        self.name_resolvers.push(Box::new(resolver));
        self
    }

    pub fn build(self) -> TypeResolvers {
        let mut resolvers = self.resolvers;
        resolvers.extend(builtin::resolvers());
        debug!(
            "Built resolver registry with {} resolvers and {} name resolvers",
            resolvers.len(),
            self.name_resolvers.len()
        );
        TypeResolvers {
            resolvers,
            name_resolvers: self.name_resolvers,
            fallback: ObjectResolver,
        }
    }
}
