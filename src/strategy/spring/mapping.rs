//! Request-mapping attributes on controllers and handlers.

use crate::declaration::{Annotated, Annotation, ClassDecl, MethodDecl, VALUE};
use crate::schema::Method;
use log::debug;

pub const CONTROLLER: &str = "controller";
pub const REST_CONTROLLER: &str = "rest_controller";
pub const RESPONSE_BODY: &str = "response_body";
pub const RESPONSE_TYPE: &str = "response_type";

pub const REQUEST_MAPPING: &str = "request_mapping";
pub const GET_MAPPING: &str = "get_mapping";
pub const POST_MAPPING: &str = "post_mapping";
pub const PUT_MAPPING: &str = "put_mapping";
pub const DELETE_MAPPING: &str = "delete_mapping";
pub const PATCH_MAPPING: &str = "patch_mapping";

pub const CONTROLLERS: &[&str] = &[CONTROLLER, REST_CONTROLLER];

pub const REQUEST_MAPPINGS: &[&str] = &[
    REQUEST_MAPPING,
    GET_MAPPING,
    POST_MAPPING,
    PUT_MAPPING,
    DELETE_MAPPING,
    PATCH_MAPPING,
];

const PATH_KEYS: &[&str] = &[VALUE, "path"];

/// Handler output is the response body: the class is a rest controller or
/// either declaration carries `#[response_body]`
pub fn is_rest(class: &ClassDecl, method: &MethodDecl) -> bool {
    class.has_annotation(REST_CONTROLLER)
        || class.has_annotation(RESPONSE_BODY)
        || method.has_annotation(RESPONSE_BODY)
}

/// The first request-mapping attribute of a declaration
pub fn mapping(annotations: &[Annotation]) -> Option<&Annotation> {
    annotations
        .iter()
        .find(|a| REQUEST_MAPPINGS.contains(&a.name.as_str()))
}

/// HTTP method of a handler; `GET` unless the mapping says otherwise
pub fn pick_method(annotations: &[Annotation]) -> Method {
    let Some(annotation) = mapping(annotations) else {
        return Method::Get;
    };
    match annotation.name.as_str() {
        POST_MAPPING => Method::Post,
        PUT_MAPPING => Method::Put,
        DELETE_MAPPING => Method::Delete,
        PATCH_MAPPING => Method::Patch,
        GET_MAPPING => Method::Get,
        _ => {
            let declared = annotation.attr_strings(&["method"]);
            let method = declared.iter().find_map(|m| Method::from_name(m));
            if method.is_none() && !declared.is_empty() {
                debug!("Unrecognized request method {:?}, using GET", declared);
            }
            method.unwrap_or_default()
        }
    }
}

/// Path fragments declared by the mapping; empty when none are declared
pub fn pick_uris(annotations: &[Annotation]) -> Vec<String> {
    mapping(annotations)
        .map(|a| a.attr_strings(PATH_KEYS))
        .unwrap_or_default()
}

/// Base paths of a controller, from its `#[request_mapping]`
pub fn pick_class_uris(class: &ClassDecl) -> Vec<String> {
    class
        .annotation(REQUEST_MAPPING)
        .map(|a| a.attr_strings(PATH_KEYS))
        .unwrap_or_default()
}

pub fn pick_headers(annotations: &[Annotation]) -> Vec<String> {
    pick(annotations, "headers")
}

pub fn pick_consumes(annotations: &[Annotation]) -> Vec<String> {
    pick(annotations, "consumes")
}

pub fn pick_produces(annotations: &[Annotation]) -> Vec<String> {
    pick(annotations, "produces")
}

fn pick(annotations: &[Annotation], key: &str) -> Vec<String> {
    mapping(annotations)
        .map(|a| a.attr_strings(&[key]))
        .unwrap_or_default()
}
