use super::{Shape, TypeDescription};
use serde::Serialize;
use serde_json::Value;

/// One flattened documentation line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// Dotted path, e.g. `address.city` or `items[].name`
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl Row {
    fn of(key: String, description: &TypeDescription) -> Self {
        Self {
            key,
            type_name: description.type_name.clone(),
            condition: condition(description).to_string(),
            default_value: description.default_value.as_ref().map(value_text),
            remark: description.remark.clone(),
        }
    }
}

fn condition(description: &TypeDescription) -> &'static str {
    match (description.required, description.default_value.is_some()) {
        (true, false) => "required",
        (true, true) => "required (has default)",
        (false, true) => "optional (has default)",
        (false, false) => "optional",
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

struct Frame<'a> {
    path: String,
    description: &'a TypeDescription,
    emit_self: bool,
}

/// Lazy depth-first row iterator returned by [`TypeDescription::rows`].
///
/// Holds only borrowed state, so calling `rows()` again always starts over.
pub struct Rows<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Rows<'a> {
    pub(super) fn new(root: &'a TypeDescription) -> Self {
        Self {
            stack: vec![Frame {
                path: root.key.clone().unwrap_or_default(),
                description: root,
                emit_self: true,
            }],
        }
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        while let Some(frame) = self.stack.pop() {
            let Frame {
                path,
                description,
                emit_self,
            } = frame;
            if !description.is_available() {
                continue;
            }

            match &description.shape {
                Shape::Primitive(_) | Shape::StringType(_) => {
                    if emit_self {
                        return Some(Row::of(path, description));
                    }
                }
                Shape::Array(element) => {
                    let element_path = format!("{}[]", path);
                    if !element.is_scalar() {
                        self.stack.push(Frame {
                            path: element_path.clone(),
                            description: element,
                            emit_self: false,
                        });
                    }
                    if path.is_empty() {
                        if element.is_scalar() {
                            return Some(Row::of(element_path, description));
                        }
                    } else if emit_self {
                        return Some(Row::of(path, description));
                    }
                }
                Shape::Object(object) => {
                    for (key, field) in object.fields.iter().rev() {
                        self.stack.push(Frame {
                            path: child_path(&path, key),
                            description: field,
                            emit_self: true,
                        });
                    }
                    if emit_self && !path.is_empty() {
                        return Some(Row::of(path, description));
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::description::{Row, TypeDescription};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn keys(d: &TypeDescription) -> Vec<String> {
        d.rows().map(|r| r.key).collect()
    }

    fn address() -> TypeDescription {
        let mut address = TypeDescription::object("Address");
        address.add_field(TypeDescription::string("String").with_key("city"));
        address.add_field(TypeDescription::string("String").with_key("street"));
        address
    }

    fn user() -> TypeDescription {
        let mut user = TypeDescription::object("User");
        user.add_field(TypeDescription::string("String").with_key("name"));
        user.add_field(TypeDescription::primitive("u32", json!(0)).with_key("age"));
        user.add_field(address().with_key("address"));
        user.add_field(TypeDescription::array(TypeDescription::string("String")).with_key("tags"));
        user.add_field(TypeDescription::array(address()).with_key("previous"));
        user
    }

    #[test]
    fn test_object_rows_in_insertion_order() {
        assert_eq!(
            keys(&user()),
            vec![
                "name",
                "age",
                "address",
                "address.city",
                "address.street",
                "tags",
                "previous",
                "previous[].city",
                "previous[].street",
            ]
        );
    }

    #[test]
    fn test_rows_are_restartable() {
        let user = user();
        let first: Vec<Row> = user.rows().collect();
        let second: Vec<Row> = user.rows().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_level_arrays() {
        assert_eq!(keys(&TypeDescription::array(address())), vec!["[].city", "[].street"]);

        let scalars = TypeDescription::array(TypeDescription::primitive("i64", json!(0)));
        let rows: Vec<Row> = scalars.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "[]");
        assert_eq!(rows[0].type_name, "i64[]");
    }

    #[test]
    fn test_scalar_row() {
        let mut size = TypeDescription::primitive("u32", json!(0)).with_key("size");
        size.required = false;
        size.set_default_value("20");
        size.add_remark("page size");
        let rows: Vec<Row> = size.rows().collect();
        assert_eq!(
            rows,
            vec![Row {
                key: "size".to_string(),
                type_name: "u32".to_string(),
                condition: "optional (has default)".to_string(),
                default_value: Some("20".to_string()),
                remark: Some("page size".to_string()),
            }]
        );
    }

    #[test]
    fn test_conditions() {
        let mut nick = TypeDescription::string("String").with_key("nick");
        assert_eq!(nick.rows().next().unwrap().condition, "required");
        nick.required = false;
        assert_eq!(nick.rows().next().unwrap().condition, "optional");
    }

    #[test]
    fn test_required_row_shows_its_default() {
        let mut page = TypeDescription::primitive("u32", json!(0)).with_key("page");
        page.set_default_value("1");
        let row = page.rows().next().unwrap();
        assert_eq!(row.condition, "required (has default)");
        assert_eq!(row.default_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_recursive_marker_has_single_row() {
        let mut node = TypeDescription::object("Node");
        node.add_field(TypeDescription::string("String").with_key("label"));
        node.add_field(TypeDescription::recursive("Node").with_key("parent"));
        assert_eq!(keys(&node), vec!["label", "parent"]);
    }

    #[test]
    fn test_rows_are_lazy() {
        let user = user();
        let mut rows = user.rows();
        assert_eq!(rows.next().map(|r| r.key), Some("name".to_string()));
        assert_eq!(rows.next().map(|r| r.key), Some("age".to_string()));
    }
}
