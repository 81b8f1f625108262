use super::{ObjectDescription, TypeDescription};
use log::debug;

impl ObjectDescription {
    /// Merge `other`'s fields into `self`, deduplicating by key.
    ///
    /// Keys only present in `other` are appended in `other`'s order. For keys
    /// present in both, `self`'s field is kept and only its missing remark or
    /// default is filled in from `other`.
    pub fn merge(&mut self, other: ObjectDescription) -> &mut Self {
        for (key, incoming) in other.fields {
            match self.fields.get_mut(&key) {
                Some(existing) => {
                    if existing.remark.is_none() {
                        existing.remark = incoming.remark;
                    }
                    if existing.default_value.is_none() && existing.is_scalar() {
                        existing.default_value = incoming.default_value;
                    }
                }
                None => {
                    self.fields.insert(key, incoming);
                }
            }
        }
        self
    }
}

impl TypeDescription {
    /// Object merge lifted to descriptions. Non-object operands leave `self` untouched.
    pub fn merge(&mut self, other: TypeDescription) -> &mut Self {
        let other_name = other.type_name.clone();
        match (self.as_object_mut(), other.into_object()) {
            (Some(base), Some(incoming)) => {
                base.merge(incoming);
            }
            _ => debug!("Skipping merge of non-object type {}", other_name),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::description::TypeDescription;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(name: &str, fields: &[(&str, Option<&str>, Option<&str>)]) -> TypeDescription {
        let mut object = TypeDescription::object(name);
        for (key, remark, default) in fields {
            let mut field = TypeDescription::primitive("u32", json!(0)).with_key(*key);
            field.remark = remark.map(str::to_string);
            if let Some(default) = default {
                field.set_default_value(default);
            }
            object.add_field(field);
        }
        object
    }

    fn keys(d: &TypeDescription) -> Vec<String> {
        d.as_object().unwrap().fields.keys().cloned().collect()
    }

    #[test]
    fn test_union_of_keys_in_order() {
        let mut a = object("A", &[("page", None, None), ("size", None, None)]);
        let b = object("B", &[("size", None, None), ("sort", None, None)]);
        a.merge(b);
        assert_eq!(keys(&a), vec!["page", "size", "sort"]);
    }

    #[test]
    fn test_carries_missing_remark_and_default() {
        let mut a = object(
            "A",
            &[("page", None, None), ("size", Some("page size"), Some("20"))],
        );
        let b = object(
            "B",
            &[
                ("page", Some("page index"), Some("1")),
                ("size", Some("other"), Some("50")),
            ],
        );
        a.merge(b);
        let fields = &a.as_object().unwrap().fields;
        assert_eq!(fields["page"].remark.as_deref(), Some("page index"));
        assert_eq!(fields["page"].default_value, Some(json!(1)));
        assert_eq!(fields["size"].remark.as_deref(), Some("page size"));
        assert_eq!(fields["size"].default_value, Some(json!(20)));
    }

    #[test]
    fn test_merge_is_idempotent_and_bounded() {
        let cases = vec![
            (object("A", &[]), object("B", &[])),
            (object("A", &[("x", None, None)]), object("B", &[])),
            (object("A", &[]), object("B", &[("y", Some("r"), Some("3"))])),
            (
                object("A", &[("x", None, None), ("y", None, Some("1"))]),
                object("B", &[("y", Some("why"), Some("2")), ("z", None, None)]),
            ),
        ];

        for (a, b) in cases {
            let a_len = a.as_object().unwrap().len();
            let b_len = b.as_object().unwrap().len();

            let mut once = a.clone();
            once.merge(b.clone());
            let merged_len = once.as_object().unwrap().len();
            assert!(merged_len >= a_len.max(b_len));
            assert!(merged_len <= a_len + b_len);

            let mut twice = a.clone();
            twice.merge(once.clone());
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_non_object_merge_is_noop() {
        let mut a = object("A", &[("x", None, None)]);
        let before = a.clone();
        a.merge(TypeDescription::string("String"));
        assert_eq!(a, before);

        let mut s = TypeDescription::string("String");
        s.merge(object("B", &[("x", None, None)]));
        assert_eq!(s, TypeDescription::string("String"));
    }
}
