//! Resolved, documentation-oriented shapes of declared types.
//!
//! A [`TypeDescription`] is produced by the resolver registry for one type
//! reference. It is a tree: arrays own their element and objects own their
//! fields, keyed and ordered by insertion.

mod merge;
mod rows;

pub use rows::{Row, Rows};

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

/// Discriminant of a [`Shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Primitive,
    StringType,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Number or boolean, with its example value
    Primitive(Value),
    /// Any type documented as a string, with its example value
    StringType(Value),
    Array(Box<TypeDescription>),
    Object(ObjectDescription),
}

/// Fields of an object-shaped description, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectDescription {
    pub fields: IndexMap<String, TypeDescription>,
    /// Set on the placeholder emitted when a type refers back to itself
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescription {
    pub key: Option<String>,
    /// Display name of the declared type (`u32`, `String[]`, `User`)
    pub type_name: String,
    pub required: bool,
    pub default_value: Option<Value>,
    pub remark: Option<String>,
    pub shape: Shape,
    available: bool,
}

impl TypeDescription {
    fn with_shape(type_name: impl Into<String>, shape: Shape) -> Self {
        Self {
            key: None,
            type_name: type_name.into(),
            required: true,
            default_value: None,
            remark: None,
            shape,
            available: true,
        }
    }

    pub fn primitive(type_name: impl Into<String>, example: Value) -> Self {
        Self::with_shape(type_name, Shape::Primitive(example))
    }

    pub fn string(type_name: impl Into<String>) -> Self {
        Self::with_shape(type_name, Shape::StringType(Value::String(String::new())))
    }

    pub fn string_with_example(type_name: impl Into<String>, example: impl Into<String>) -> Self {
        Self::with_shape(type_name, Shape::StringType(Value::String(example.into())))
    }

    /// Array of `element`; the type name becomes `Element[]`
    pub fn array(element: TypeDescription) -> Self {
        let type_name = format!("{}[]", element.type_name);
        Self::with_shape(type_name, Shape::Array(Box::new(element)))
    }

    /// Object without fields; fields are added with [`TypeDescription::add_field`]
    pub fn object(type_name: impl Into<String>) -> Self {
        Self::with_shape(type_name, Shape::Object(ObjectDescription::default()))
    }

    /// Placeholder for a type that is already being expanded higher up the tree
    pub fn recursive(type_name: impl Into<String>) -> Self {
        Self::with_shape(
            type_name,
            Shape::Object(ObjectDescription {
                fields: IndexMap::new(),
                recursive: true,
            }),
        )
    }

    /// Result of failing to resolve a type. Callers must skip it.
    pub fn unavailable(type_name: impl Into<String>) -> Self {
        Self {
            available: false,
            ..Self::object(type_name)
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.shape {
            Shape::Primitive(_) => Kind::Primitive,
            Shape::StringType(_) => Kind::StringType,
            Shape::Array(_) => Kind::Array,
            Shape::Object(_) => Kind::Object,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind(), Kind::Primitive | Kind::StringType)
    }

    pub fn is_object(&self) -> bool {
        self.kind() == Kind::Object
    }

    pub fn is_array(&self) -> bool {
        self.kind() == Kind::Array
    }

    pub fn is_recursive(&self) -> bool {
        matches!(&self.shape, Shape::Object(object) if object.recursive)
    }

    pub fn as_object(&self) -> Option<&ObjectDescription> {
        match &self.shape {
            Shape::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ObjectDescription> {
        match &mut self.shape {
            Shape::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<ObjectDescription> {
        match self.shape {
            Shape::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&TypeDescription> {
        match &self.shape {
            Shape::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
    }

    /// Append `text` to the remark, separated by a space
    pub fn add_remark(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match &mut self.remark {
            Some(remark) if !remark.is_empty() => {
                remark.push(' ');
                remark.push_str(text);
            }
            _ => self.remark = Some(text.to_string()),
        }
    }

    /// Set the default from its source text.
    ///
    /// Only scalars carry defaults. Numeric and boolean text is coerced when
    /// the example value is of that type; otherwise the text is kept verbatim.
    pub fn set_default_value(&mut self, text: &str) {
        let value = match &self.shape {
            Shape::Primitive(example) => coerce(example, text),
            Shape::StringType(_) => Value::String(text.to_string()),
            _ => {
                debug!(
                    "Ignoring default '{}' on non-scalar type {}",
                    text, self.type_name
                );
                return;
            }
        };
        self.default_value = Some(value);
    }

    /// Add a keyed field to an object description; later keys replace earlier ones
    pub fn add_field(&mut self, field: TypeDescription) {
        let Some(object) = self.as_object_mut() else {
            debug!("Cannot add a field to non-object type");
            return;
        };
        match field.key.clone() {
            Some(key) => {
                object.fields.insert(key, field);
            }
            None => debug!("Dropping field without key of type {}", field.type_name),
        }
    }

    /// Materialized example: the default wins over the type's example value
    pub fn value(&self) -> Value {
        if let Some(default) = &self.default_value {
            return default.clone();
        }
        match &self.shape {
            Shape::Primitive(example) | Shape::StringType(example) => example.clone(),
            Shape::Array(element) => Value::Array(vec![element.value()]),
            Shape::Object(object) => object.value(),
        }
    }

    /// Flattened documentation rows, depth first in field order
    pub fn rows(&self) -> Rows<'_> {
        Rows::new(self)
    }
}

impl ObjectDescription {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(key, field)| (key.clone(), field.value()))
            .collect();
        Value::Object(map)
    }
}

fn coerce(example: &Value, text: &str) -> Value {
    let trimmed = text.trim();
    match example {
        Value::Bool(_) => match trimmed.parse::<bool>() {
            Ok(b) => Value::Bool(b),
            Err(_) => Value::String(text.to_string()),
        },
        Value::Number(n) if n.is_f64() => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string())),
        Value::Number(_) => match trimmed.parse::<i64>() {
            Ok(i) => Value::from(i),
            Err(_) => Value::String(text.to_string()),
        },
        _ => Value::String(text.to_string()),
    }
}
