//! Handler parameter attributes.

use crate::declaration::{Annotated, ParamDecl, VALUE};

pub const PATH_VARIABLE: &str = "path_variable";
pub const REQUEST_PARAM: &str = "request_param";
pub const REQUEST_BODY: &str = "request_body";
pub const REQUEST_HEADER: &str = "request_header";

const PARAM_ANNOTATIONS: &[&str] = &[PATH_VARIABLE, REQUEST_PARAM, REQUEST_BODY, REQUEST_HEADER];

/// Types supplied by the framework rather than by the client
const INJECTED_TYPES: &[&str] = &[
    "HttpRequest",
    "HttpResponse",
    "HttpServletRequest",
    "HttpServletResponse",
    "HttpSession",
    "Request",
    "Response",
    "WebRequest",
    "HeaderMap",
    "State",
    "Extension",
    "Data",
    "Session",
    "Principal",
    "Authentication",
    "Model",
    "ModelMap",
    "BindingResult",
    "Errors",
    "Locale",
];

const NAME_KEYS: &[&str] = &[VALUE, "name"];

pub fn is_path_variable(param: &ParamDecl) -> bool {
    param.has_annotation(PATH_VARIABLE)
}

pub fn is_request_body(param: &ParamDecl) -> bool {
    param.has_annotation(REQUEST_BODY)
}

pub fn is_request_header(param: &ParamDecl) -> bool {
    param.has_annotation(REQUEST_HEADER)
}

/// Explicit `#[request_param]`, or a parameter with no binding attribute
/// whose type is not framework-injected
pub fn is_request_param(param: &ParamDecl) -> bool {
    if param.has_annotation(REQUEST_PARAM) {
        return true;
    }
    !param.has_any_annotation(PARAM_ANNOTATIONS)
        && !INJECTED_TYPES.contains(&param.type_ref.name.as_str())
}

/// The explicit body parameter, if any; the first one wins
pub fn request_body(params: &[ParamDecl]) -> Option<&ParamDecl> {
    params.iter().find(|p| is_request_body(p))
}

/// Name the client uses for a parameter: the attribute's `value`/`name`,
/// else the binding name
pub fn client_name(param: &ParamDecl, annotation: &str) -> Option<String> {
    param
        .annotation(annotation)
        .and_then(|a| a.attr_text(NAME_KEYS))
        .filter(|name| !name.trim().is_empty())
        .or_else(|| param.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Annotation, AttrValue};
    use crate::type_resolver::TypeRef;

    fn param(name: &str, ty: &str) -> ParamDecl {
        ParamDecl::new(name, TypeRef::parse(ty).unwrap())
    }

    #[test]
    fn test_request_param_classification() {
        assert!(is_request_param(&param("page", "u32")));
        assert!(is_request_param(
            &param("page", "u32").annotated(Annotation::marker(REQUEST_PARAM))
        ));
        assert!(!is_request_param(
            &param("id", "u64").annotated(Annotation::marker(PATH_VARIABLE))
        ));
        assert!(!is_request_param(
            &param("body", "User").annotated(Annotation::marker(REQUEST_BODY))
        ));
        assert!(!is_request_param(&param("state", "State<AppState>")));
        assert!(!is_request_param(&param("req", "HttpRequest")));
    }

    #[test]
    fn test_client_name() {
        let renamed = param("page_no", "u32").annotated(
            Annotation::marker(REQUEST_PARAM)
                .with_arg("name", AttrValue::Str("pageNo".to_string())),
        );
        assert_eq!(client_name(&renamed, REQUEST_PARAM).as_deref(), Some("pageNo"));
        assert_eq!(client_name(&param("size", "u32"), REQUEST_PARAM).as_deref(), Some("size"));

        let unnamed = ParamDecl {
            name: None,
            ..param("x", "u32")
        };
        assert_eq!(client_name(&unnamed, PATH_VARIABLE), None);
    }

    #[test]
    fn test_first_request_body() {
        let params = vec![
            param("a", "u32"),
            param("b", "User").annotated(Annotation::marker(REQUEST_BODY)),
            param("c", "Order").annotated(Annotation::marker(REQUEST_BODY)),
        ];
        assert_eq!(request_body(&params).and_then(|p| p.name.as_deref()), Some("b"));
    }
}
