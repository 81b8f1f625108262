use crate::declaration::lower::lower_annotations;
use crate::declaration::{Annotated, DocComment, VALUE};
use crate::parser::ParsedFile;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use syn::visit::Visit;

/// A type reference as written in source, reduced to names and type arguments.
///
/// `Option<Vec<User>>` becomes `Option` with one argument `Vec`, which has one
/// argument `User`. Slices and fixed arrays become arrays of their element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The base type name (e.g., "String", "User", "i32")
    pub name: String,
    /// Generic type arguments (e.g., for `Vec<String>`, contains String)
    pub args: Vec<TypeRef>,
    /// Whether this is a slice or fixed-size array; the element is `args[0]`
    pub is_array: bool,
}

pub const UNKNOWN: &str = "Unknown";

impl TypeRef {
    /// Create a TypeRef for a simple type
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            is_array: false,
        }
    }

    /// Create a TypeRef for a generic type
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
            is_array: false,
        }
    }

    /// Create a TypeRef for a slice or array type
    pub fn array(element: TypeRef) -> Self {
        Self {
            name: element.name.clone(),
            args: vec![element],
            is_array: true,
        }
    }

    pub fn unit() -> Self {
        Self::named("()")
    }

    pub fn is_unit(&self) -> bool {
        self.name == "()" && !self.is_array
    }

    /// First generic argument, if any
    pub fn first_arg(&self) -> Option<&TypeRef> {
        self.args.first()
    }

    /// Parse a type written as text, e.g. `"Vec<User>"`
    pub fn parse(text: &str) -> Option<Self> {
        match syn::parse_str::<syn::Type>(text) {
            Ok(ty) => Some(Self::from_syn(&ty)),
            Err(e) => {
                debug!("Could not parse type name '{}': {}", text, e);
                None
            }
        }
    }

    /// Extract a TypeRef from a syn::Type
    pub fn from_syn(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => Self::from_path(&type_path.path),
            syn::Type::Reference(reference) => Self::from_syn(&reference.elem),
            syn::Type::Slice(slice) => Self::array(Self::from_syn(&slice.elem)),
            syn::Type::Array(array) => Self::array(Self::from_syn(&array.elem)),
            syn::Type::Paren(paren) => Self::from_syn(&paren.elem),
            syn::Type::Group(group) => Self::from_syn(&group.elem),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Self::unit(),
            syn::Type::ImplTrait(impl_trait) => Self::from_bounds(impl_trait.bounds.iter()),
            syn::Type::TraitObject(object) => Self::from_bounds(object.bounds.iter()),
            _ => Self::named(UNKNOWN),
        }
    }

    fn from_bounds<'a>(mut bounds: impl Iterator<Item = &'a syn::TypeParamBound>) -> Self {
        bounds
            .find_map(|bound| match bound {
                syn::TypeParamBound::Trait(t) => Some(Self::from_path(&t.path)),
                _ => None,
            })
            .unwrap_or_else(|| Self::named(UNKNOWN))
    }

    fn from_path(path: &syn::Path) -> Self {
        let Some(segment) = path.segments.last() else {
            return Self::named(UNKNOWN);
        };
        let args = match &segment.arguments {
            syn::PathArguments::AngleBracketed(angle) => angle
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(inner) => Some(Self::from_syn(inner)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Self::generic(segment.ident.to_string(), args)
    }

    /// Replace generic parameters (`T`) with bound arguments
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        if self.args.is_empty() && !self.is_array {
            if let Some(bound) = bindings.get(&self.name) {
                return bound.clone();
            }
        }
        let args: Vec<TypeRef> = self.args.iter().map(|a| a.substitute(bindings)).collect();
        if self.is_array {
            let element = args.into_iter().next().unwrap_or_else(|| Self::named(UNKNOWN));
            return Self::array(element);
        }
        Self::generic(self.name.clone(), args)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            return match self.args.first() {
                Some(element) => write!(f, "{}[]", element),
                None => write!(f, "{}[]", self.name),
            };
        }
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(ToString::to_string).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// Structural information about a named type, as declared in source.
#[derive(Debug, Clone)]
pub enum TypeShape {
    /// A struct type with named fields
    Struct(StructDef),
    /// An enum type with variants
    Enum(EnumDef),
    /// A type alias or single-field tuple struct that stands for another type
    Alias(TypeRef),
}

/// Struct definition with fields
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    /// Names of generic type parameters, in declaration order
    pub generics: Vec<String>,
    pub fields: Vec<FieldDef>,
}

/// Field definition in a struct
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub type_ref: TypeRef,
    /// Serde attributes applied to this field
    pub serde_attrs: SerdeAttributes,
    /// Declared default from `#[default_value("...")]`
    pub default_value: Option<String>,
    /// Field doc comment
    pub remark: Option<String>,
}

impl FieldDef {
    /// Key under which the field is serialized
    pub fn key(&self) -> &str {
        self.serde_attrs.rename.as_deref().unwrap_or(&self.name)
    }
}

/// Enum definition with variants
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<String>,
}

/// Serde attributes for a field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerdeAttributes {
    /// Renamed field name
    pub rename: Option<String>,
    /// Whether to skip this field during serialization
    pub skip: bool,
    /// Whether to flatten this field
    pub flatten: bool,
    /// Whether a missing value falls back to `Default`
    pub default: bool,
}

/// The type-reference capability the resolver registry walks.
///
/// Implementations must be immutable after construction so a single instance
/// can serve concurrent resolutions.
pub trait TypeDescriptor: Send + Sync {
    fn describe(&self, name: &str) -> Option<&TypeShape>;
}

/// Index of every struct, enum and type alias declared in the parsed files.
///
/// Built eagerly: after [`SourceIndex::new`] returns it is read-only.
#[derive(Debug, Default)]
pub struct SourceIndex {
    shapes: HashMap<String, TypeShape>,
}

impl SourceIndex {
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        debug!("Indexing type declarations in {} files", parsed_files.len());
        let mut collector = ShapeCollector {
            shapes: HashMap::new(),
        };
        for parsed_file in parsed_files {
            collector.visit_file(&parsed_file.syntax_tree);
        }
        debug!("Indexed {} type declarations", collector.shapes.len());
        Self {
            shapes: collector.shapes,
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Register a shape by hand; used by tests and synthetic declarations
    pub fn insert(&mut self, name: impl Into<String>, shape: TypeShape) {
        self.shapes.insert(name.into(), shape);
    }
}

impl TypeDescriptor for SourceIndex {
    fn describe(&self, name: &str) -> Option<&TypeShape> {
        self.shapes.get(name)
    }
}

struct ShapeCollector {
    shapes: HashMap<String, TypeShape>,
}

impl ShapeCollector {
    fn add(&mut self, name: String, shape: TypeShape) {
        if self.shapes.contains_key(&name) {
            debug!("Duplicate type declaration {}, keeping the first", name);
            return;
        }
        self.shapes.insert(name, shape);
    }
}

impl<'ast> Visit<'ast> for ShapeCollector {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        let name = node.ident.to_string();
        let shape = match &node.fields {
            syn::Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                TypeShape::Alias(TypeRef::from_syn(&unnamed.unnamed[0].ty))
            }
            fields => TypeShape::Struct(parse_struct_definition(node, fields)),
        };
        self.add(name, shape);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        let name = node.ident.to_string();
        let variants = node
            .variants
            .iter()
            .filter(|v| !parse_serde_attributes(&v.attrs).skip)
            .map(|v| parse_serde_attributes(&v.attrs).rename.unwrap_or_else(|| v.ident.to_string()))
            .collect();
        self.add(name.clone(), TypeShape::Enum(EnumDef { name, variants }));
    }

    fn visit_item_type(&mut self, node: &'ast syn::ItemType) {
        self.add(node.ident.to_string(), TypeShape::Alias(TypeRef::from_syn(&node.ty)));
    }
}

fn parse_struct_definition(item_struct: &syn::ItemStruct, fields: &syn::Fields) -> StructDef {
    let generics = item_struct
        .generics
        .type_params()
        .map(|p| p.ident.to_string())
        .collect();

    let fields = match fields {
        syn::Fields::Named(named) => named.named.iter().filter_map(parse_field).collect(),
        _ => Vec::new(),
    };

    StructDef {
        name: item_struct.ident.to_string(),
        generics,
        fields,
    }
}

fn parse_field(field: &syn::Field) -> Option<FieldDef> {
    let name = field.ident.as_ref()?.to_string();
    let annotations = lower_annotations(&field.attrs);
    let default_value = annotations
        .as_slice()
        .annotation("default_value")
        .and_then(|a| a.attr_text(&[VALUE]));

    Some(FieldDef {
        name,
        type_ref: TypeRef::from_syn(&field.ty),
        serde_attrs: parse_serde_attributes(&field.attrs),
        default_value,
        remark: DocComment::from_attrs(&field.attrs).description,
    })
}

/// Parse Serde attributes from field or variant attributes
fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
    let mut serde_attrs = SerdeAttributes::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                serde_attrs.rename = Some(value.value());
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                serde_attrs.skip = true;
            } else if meta.path.is_ident("flatten") {
                serde_attrs.flatten = true;
            } else if meta.path.is_ident("default") {
                serde_attrs.default = true;
                if meta.input.peek(syn::Token![=]) {
                    let _: syn::LitStr = meta.value()?.parse()?;
                }
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            } else if meta.input.peek(syn::token::Paren) {
                let _content;
                syn::parenthesized!(_content in meta.input);
            }
            Ok(())
        });
        if let Err(e) = result {
            debug!("Ignoring unparsable serde attribute: {}", e);
        }
    }

    serde_attrs
}
