//! Built-in resolvers for standard library and common ecosystem types.

use super::{Resolution, Resolver};
use crate::description::TypeDescription;
use crate::type_resolver::TypeRef;
use serde_json::{json, Value};

const INTEGERS: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];
const FLOATS: &[&str] = &["f32", "f64"];

const STRING_LIKE: &[&str] = &[
    "String",
    "str",
    "char",
    "Uuid",
    "DateTime",
    "NaiveDate",
    "NaiveDateTime",
    "NaiveTime",
    "Decimal",
    "Url",
    "PathBuf",
    "OsString",
    "IpAddr",
    "SocketAddr",
];

const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashSet",
    "BTreeSet",
    "IndexSet",
    "BinaryHeap",
];

const MAPS: &[&str] = &["HashMap", "BTreeMap", "IndexMap", "Map", "Value"];

const WRAPPERS: &[&str] = &["Box", "Rc", "Arc", "Cow", "RefCell", "Cell", "Mutex", "RwLock"];

/// The built-in chain, in resolution order
pub fn resolvers() -> Vec<Box<dyn Resolver>> {
    vec![
        Box::new(PrimitiveResolver),
        Box::new(StringResolver),
        Box::new(OptionResolver),
        Box::new(CollectionResolver),
        Box::new(MapResolver),
        Box::new(WrapperResolver),
    ]
}

fn is_plain(ty: &TypeRef, names: &[&str]) -> bool {
    !ty.is_array && names.contains(&ty.name.as_str())
}

fn unhandled(ty: &TypeRef) -> TypeDescription {
    TypeDescription::unavailable(ty.to_string())
}

/// Integers, floats and `bool`
pub struct PrimitiveResolver;

impl Resolver for PrimitiveResolver {
    fn resolve(&self, ty: &TypeRef, _cx: &mut Resolution<'_>) -> TypeDescription {
        let example: Value = if is_plain(ty, INTEGERS) {
            json!(0)
        } else if is_plain(ty, FLOATS) {
            json!(0.0)
        } else if is_plain(ty, &["bool"]) {
            json!(false)
        } else {
            return unhandled(ty);
        };
        TypeDescription::primitive(ty.name.clone(), example)
    }
}

/// Types serialized as JSON strings
pub struct StringResolver;

impl Resolver for StringResolver {
    fn resolve(&self, ty: &TypeRef, _cx: &mut Resolution<'_>) -> TypeDescription {
        if !is_plain(ty, STRING_LIKE) {
            return unhandled(ty);
        }
        let name = if ty.name == "str" { "String" } else { ty.name.as_str() };
        TypeDescription::string(name)
    }
}

/// `Option<T>`: `T`, not required
pub struct OptionResolver;

impl Resolver for OptionResolver {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        match ty.first_arg() {
            Some(inner) if is_plain(ty, &["Option"]) => {
                let mut description = cx.resolve(inner);
                description.required = false;
                description
            }
            _ => unhandled(ty),
        }
    }
}

/// Sequences, sets, slices and fixed arrays
pub struct CollectionResolver;

impl Resolver for CollectionResolver {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        let element = match ty.first_arg() {
            Some(element) if ty.is_array || COLLECTIONS.contains(&ty.name.as_str()) => element,
            _ => return unhandled(ty),
        };
        let element = cx.resolve(element);
        if !element.is_available() {
            return unhandled(ty);
        }
        TypeDescription::array(element)
    }
}

/// Maps and free-form JSON: an object with no documented fields.
///
/// Skipped when the source declares its own type of the same name.
pub struct MapResolver;

impl Resolver for MapResolver {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        if !is_plain(ty, MAPS) || cx.descriptor().describe(&ty.name).is_some() {
            return unhandled(ty);
        }
        TypeDescription::object(ty.to_string())
    }
}

/// Smart pointers and cells resolve to their content
pub struct WrapperResolver;

impl Resolver for WrapperResolver {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        match ty.first_arg() {
            Some(inner) if is_plain(ty, WRAPPERS) => cx.resolve(inner),
            _ => unhandled(ty),
        }
    }
}
