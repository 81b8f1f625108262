use super::{Resolution, Resolver};
use crate::description::TypeDescription;
use crate::type_resolver::{StructDef, TypeRef, TypeShape};
use log::{debug, warn};
use std::collections::HashMap;

/// Structural fallback: walks the declared shape of a named type.
///
/// Unknown names resolve to an unavailable object; fields whose types cannot
/// be resolved are left out with a warning, and their siblings are kept.
pub struct ObjectResolver;

impl Resolver for ObjectResolver {
    fn resolve(&self, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
        let Some(shape) = cx.descriptor().describe(&ty.name) else {
            debug!("No declaration found for type {}", ty);
            return TypeDescription::unavailable(ty.to_string());
        };

        match shape {
            TypeShape::Struct(def) => {
                // keyed on the substituted type: `Wrapper<Wrapper<User>>` is not a cycle
                let key = ty.to_string();
                if cx.is_expanding(&key) {
                    debug!("Type {} refers to itself, emitting a reference", key);
                    return TypeDescription::recursive(key);
                }
                cx.expand(&key, |cx| resolve_struct(def, ty, cx))
            }
            TypeShape::Enum(def) => {
                let example = def.variants.first().cloned().unwrap_or_default();
                let mut description =
                    TypeDescription::string_with_example(def.name.clone(), example);
                if !def.variants.is_empty() {
                    description.add_remark(&format!("enum: {}", def.variants.join(", ")));
                }
                description
            }
            TypeShape::Alias(target) => {
                let key = ty.to_string();
                if cx.is_expanding(&key) {
                    return TypeDescription::recursive(key);
                }
                let target = target.clone();
                cx.expand(&key, |cx| cx.resolve(&target))
            }
        }
    }
}

fn resolve_struct(def: &StructDef, ty: &TypeRef, cx: &mut Resolution<'_>) -> TypeDescription {
    let bindings: HashMap<String, TypeRef> = def
        .generics
        .iter()
        .cloned()
        .zip(ty.args.iter().cloned())
        .collect();

    let mut object = TypeDescription::object(ty.to_string());
    for field in &def.fields {
        if field.serde_attrs.skip {
            continue;
        }
        let field_ty = field.type_ref.substitute(&bindings);
        let mut description = cx.resolve(&field_ty);
        if !description.is_available() {
            warn!(
                "Cannot resolve type {} of field {}.{}, omitting it",
                field_ty, def.name, field.name
            );
            continue;
        }

        if field.serde_attrs.flatten {
            object.merge(description);
            continue;
        }

        description.set_key(field.key());
        if field.serde_attrs.default {
            description.required = false;
        }
        if let Some(remark) = &field.remark {
            description.add_remark(remark);
        }
        if let Some(default) = &field.default_value {
            description.set_default_value(default);
        }
        object.add_field(description);
    }
    object
}

#[cfg(test)]
mod tests {
    use crate::description::{Kind, TypeDescription};
    use crate::parser::ParsedFile;
    use crate::resolver::TypeResolvers;
    use crate::type_resolver::{SourceIndex, TypeRef};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::path::PathBuf;

    fn index(code: &str) -> SourceIndex {
        SourceIndex::new(&[ParsedFile {
            path: PathBuf::from("models.rs"),
            syntax_tree: syn::parse_file(code).expect("Failed to parse test code"),
        }])
    }

    fn resolve(index: &SourceIndex, ty: &str) -> TypeDescription {
        TypeResolvers::default().resolve(&TypeRef::parse(ty).unwrap(), index)
    }

    fn keys(d: &TypeDescription) -> Vec<String> {
        d.rows().map(|r| r.key).collect()
    }

    #[test]
    fn test_struct_fields_in_declaration_order() {
        let index = index(
            r#"
            pub struct User {
                /// Display name
                pub name: String,
                pub age: u32,
                pub email: Option<String>,
            }
            "#,
        );
        let user = resolve(&index, "User");
        assert_eq!(user.kind(), Kind::Object);
        assert_eq!(keys(&user), vec!["name", "age", "email"]);
        let fields = &user.as_object().unwrap().fields;
        assert_eq!(fields["name"].remark.as_deref(), Some("Display name"));
        assert!(!fields["email"].required);
        assert_eq!(user.value(), json!({"name": "", "age": 0, "email": ""}));
    }

    #[test]
    fn test_unavailable_field_is_omitted_but_siblings_kept() {
        let index = index(
            r#"
            pub struct Order {
                pub id: u64,
                pub secret: ExternalThing,
                pub note: String,
            }
            "#,
        );
        let order = resolve(&index, "Order");
        assert!(order.is_available());
        assert_eq!(keys(&order), vec!["id", "note"]);
    }

    #[test]
    fn test_serde_attributes_and_defaults() {
        let index = index(
            r#"
            pub struct Audit { pub created_by: String }
            pub struct Query {
                #[serde(rename = "pageNo")]
                #[default_value("1")]
                pub page: u32,
                #[serde(skip)]
                pub internal: u32,
                #[serde(default)]
                pub sort: String,
                #[serde(flatten)]
                pub audit: Audit,
            }
            "#,
        );
        let query = resolve(&index, "Query");
        assert_eq!(keys(&query), vec!["pageNo", "sort", "created_by"]);
        let fields = &query.as_object().unwrap().fields;
        assert_eq!(fields["pageNo"].default_value, Some(json!(1)));
        assert!(!fields["sort"].required);
    }

    #[test]
    fn test_generic_substitution() {
        let index = index(
            r#"
            pub struct Wrapper<T> { pub data: T, pub items: Vec<T> }
            pub struct User { pub name: String }
            "#,
        );
        let wrapped = resolve(&index, "Wrapper<User>");
        assert_eq!(wrapped.type_name, "Wrapper<User>");
        assert_eq!(keys(&wrapped), vec!["data", "data.name", "items", "items[].name"]);
    }

    #[test]
    fn test_recursive_types_terminate() {
        let index = index(
            r#"
            pub struct Node {
                pub label: String,
                pub children: Vec<Node>,
                pub parent: Option<Box<Node>>,
            }
            pub struct A { pub b: B }
            pub struct B { pub a: Option<A> }
            "#,
        );
        let node = resolve(&index, "Node");
        assert_eq!(keys(&node), vec!["label", "children", "parent"]);
        let fields = &node.as_object().unwrap().fields;
        assert!(fields["children"].element().unwrap().is_recursive());
        assert!(fields["parent"].is_recursive());

        let a = resolve(&index, "A");
        assert_eq!(keys(&a), vec!["b", "b.a"]);
    }

    #[test]
    fn test_nested_generic_is_not_a_cycle() {
        let index = index(
            r#"
            pub struct Wrapper<T> { pub code: u32, pub data: T }
            pub struct User { pub name: String }
            "#,
        );
        let nested = resolve(&index, "Wrapper<Wrapper<User>>");
        assert_eq!(
            keys(&nested),
            vec!["code", "data", "data.code", "data.data", "data.data.name"]
        );
        assert!(!nested.as_object().unwrap().fields["data"].is_recursive());
    }

    #[test]
    fn test_polymorphic_recursion_is_cut_at_max_depth() {
        let index =
            index("pub struct Fold<T> { pub head: T, pub tail: Option<Box<Fold<Vec<T>>>> }");
        let fold = resolve(&index, "Fold<u8>");
        assert!(fold.is_available());
        assert_eq!(keys(&fold)[..3], ["head", "tail", "tail.head"]);

        let mut deepest = &fold;
        while let Some(tail) = deepest.as_object().and_then(|o| o.fields.get("tail")) {
            deepest = tail;
        }
        assert!(deepest.is_recursive());
    }

    #[test]
    fn test_enums_and_aliases() {
        let index = index(
            r#"
            pub enum Status { Active, Disabled }
            pub struct UserId(pub u64);
            pub type Tags = Vec<String>;
            "#,
        );
        let status = resolve(&index, "Status");
        assert_eq!(status.kind(), Kind::StringType);
        assert_eq!(status.value(), json!("Active"));
        assert_eq!(status.remark.as_deref(), Some("enum: Active, Disabled"));
        assert_eq!(resolve(&index, "UserId").kind(), Kind::Primitive);
        assert_eq!(resolve(&index, "Tags").kind(), Kind::Array);
    }

    #[test]
    fn test_user_defined_map_name_wins() {
        let index = index("pub struct Map { pub width: u32 }");
        assert_eq!(keys(&resolve(&index, "Map")), vec!["width"]);
    }
}
