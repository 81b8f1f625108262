use crate::description::TypeDescription;
use crate::resolver::{NameResolver, Resolution, Resolver};
use crate::type_resolver::TypeRef;
use serde_json::json;

/// Response and request wrappers that serialize as their payload
const TRANSPARENT: &[&str] = &["Json", "ResponseEntity", "HttpEntity", "Result", "Query", "Form"];

const FILES: &[&str] = &["MultipartFile", "Part", "Multipart"];

/// Type names written in Java style inside `#[response_type("...")]`
const SEQUENCE_NAMES: &[&str] = &["List", "Set", "Collection", "Iterable"];

/// Framework types whose shape is known without their declaration.
///
/// A source declaration of the same name takes precedence over the built-in
/// paging shapes.
pub struct SpringComponentResolver;

impl Resolver for SpringComponentResolver {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        if ty.is_array {
            return TypeDescription::unavailable(ty.to_string());
        }
        let name = ty.name.as_str();

        if TRANSPARENT.contains(&name) {
            return match ty.first_arg() {
                Some(inner) => cx.resolve(inner),
                None => TypeDescription::unavailable(ty.to_string()),
            };
        }
        if FILES.contains(&name) {
            let mut file = TypeDescription::string("File");
            file.add_remark("multipart file");
            return file;
        }
        if cx.descriptor().describe(name).is_some() {
            return TypeDescription::unavailable(ty.to_string());
        }
        match (name, ty.first_arg()) {
            ("Page", Some(item)) => page(ty, item, cx),
            ("Pageable", None) => pageable(),
            _ => TypeDescription::unavailable(ty.to_string()),
        }
    }
}

impl NameResolver for SpringComponentResolver {
    fn resolve_name(&self, name: &str, cx: &mut Resolution<'_>) -> TypeDescription {
        let name = name.trim();
        if let Some(element) = name.strip_suffix("[]") {
            let element = cx.resolve_name(element);
            if element.is_available() {
                return TypeDescription::array(element);
            }
            return TypeDescription::unavailable(name);
        }

        match TypeRef::parse(name) {
            Some(ty) if SEQUENCE_NAMES.contains(&ty.name.as_str()) && ty.args.len() == 1 => {
                cx.resolve(&TypeRef::generic("Vec", ty.args))
            }
            _ => TypeDescription::unavailable(name),
        }
    }
}

fn page(ty: &TypeRef, item: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
    let item = cx.resolve(item);
    if !item.is_available() {
        return TypeDescription::unavailable(ty.to_string());
    }

    let mut page = TypeDescription::object(ty.to_string());
    let mut content = TypeDescription::array(item).with_key("content");
    content.add_remark("items of the current page");
    page.add_field(content);
    page.add_field(counter("totalElements", "i64", "total number of items"));
    page.add_field(counter("totalPages", "u32", "total number of pages"));
    page.add_field(counter("number", "u32", "zero-based page index"));
    page.add_field(counter("size", "u32", "page size"));
    page
}

fn pageable() -> TypeDescription {
    let mut pageable = TypeDescription::object("Pageable");

    let mut page = counter("page", "u32", "zero-based page index");
    page.required = false;
    page.set_default_value("0");
    pageable.add_field(page);

    let mut size = counter("size", "u32", "page size");
    size.required = false;
    size.set_default_value("20");
    pageable.add_field(size);

    let mut sort = TypeDescription::string("String").with_key("sort");
    sort.required = false;
    sort.add_remark("property,(asc|desc)");
    pageable.add_field(sort);

    pageable
}

fn counter(key: &str, type_name: &str, remark: &str) -> TypeDescription {
    let mut field = TypeDescription::primitive(type_name, json!(0)).with_key(key);
    field.add_remark(remark);
    field
}
