//! Spring MVC style extraction.
//!
//! Controllers are `impl`/`trait` blocks marked `#[rest_controller]` or
//! `#[controller]`; handlers carry one of the request-mapping attributes.
//! Handlers of a plain `#[controller]` are only documented when marked
//! `#[response_body]`.

pub mod component;
pub mod mapping;
pub mod params;

pub use component::SpringComponentResolver;

use self::mapping::{
    is_rest, pick_class_uris, pick_consumes, pick_headers, pick_method, pick_produces, pick_uris,
    CONTROLLERS, REQUEST_MAPPINGS, RESPONSE_TYPE,
};
use self::params::{
    client_name, is_path_variable, is_request_header, is_request_param, request_body,
    PATH_VARIABLE, REQUEST_HEADER, REQUEST_PARAM,
};
use super::{ExtractContext, ParserStrategy};
use crate::declaration::{Annotated, ClassDecl, MethodDecl, ParamDecl, VALUE};
use crate::description::{Row, TypeDescription};
use crate::error::ExtractError;
use crate::resolver::TypeResolversBuilder;
use crate::schema::{Chapter, Header, Method, Section};
use crate::uri::compose;
use log::{debug, warn};
use serde_json::Value;

pub const FRAMEWORK: &str = "spring";

/// Placeholder value of a request header without a declared default
const HEADER_PLACEHOLDER: &str = "{value}";

pub struct SpringStrategy;

impl ParserStrategy for SpringStrategy {
    fn name(&self) -> &'static str {
        FRAMEWORK
    }

    fn on_load(&self, resolvers: &mut TypeResolversBuilder) {
        resolvers
            .add_resolver(SpringComponentResolver)
            .add_name_resolver(SpringComponentResolver);
    }

    fn accept_class(&self, class: &ClassDecl) -> bool {
        class.has_any_annotation(CONTROLLERS)
    }

    fn accept_method(&self, class: &ClassDecl, method: &MethodDecl) -> bool {
        is_rest(class, method) && method.has_any_annotation(REQUEST_MAPPINGS)
    }

    fn visit_class(&self, class: &ClassDecl, chapter: &mut Chapter, cx: &ExtractContext<'_>) {
        chapter.base_uris = compose(&[cx.url_prefix], &pick_class_uris(class));
        debug!("Controller {} mapped to {:?}", class.name, chapter.base_uris);
    }

    fn visit_method(
        &self,
        method: &MethodDecl,
        chapter: &Chapter,
        mut section: Section,
        cx: &ExtractContext<'_>,
    ) -> Result<Vec<Section>, ExtractError> {
        section.method = pick_method(&method.annotations);

        let uris = compose(&chapter.base_uris, &pick_uris(&method.annotations));
        if let Some(first) = uris.first() {
            section.uri = first.clone();
        }

        visit_path_variables(method, &mut section)?;
        visit_headers(method, &mut section, cx)?;
        visit_parameters(method, &mut section, cx);
        visit_response(method, &mut section, cx);

        Ok(per_uri(section, uris))
    }
}

/// Remark for a parameter from its `@param` tag, looked up by binding name
/// first and client name second
fn param_remark(section: &Section, param: &ParamDecl, key: &str) -> Option<String> {
    param
        .name
        .as_deref()
        .and_then(|name| section.param(name))
        .or_else(|| section.param(key))
        .map(|tag| tag.content.clone())
        .filter(|content| !content.is_empty())
}

fn visit_path_variables(method: &MethodDecl, section: &mut Section) -> Result<(), ExtractError> {
    for param in method.params.iter().filter(|p| is_path_variable(p)) {
        let key = client_name(param, PATH_VARIABLE).ok_or_else(|| {
            ExtractError::missing(
                &method.name,
                "path variable binds a pattern and names no variable",
            )
        })?;
        let remark = param_remark(section, param, &key);
        section.path_variables.insert(key.clone(), String::new());
        section.add_request_row(Row {
            key,
            type_name: param.type_ref.to_string(),
            condition: "required".to_string(),
            default_value: None,
            remark,
        });
    }
    Ok(())
}

fn visit_headers(
    method: &MethodDecl,
    section: &mut Section,
    cx: &ExtractContext<'_>,
) -> Result<(), ExtractError> {
    for text in pick_headers(&method.annotations) {
        match Header::parse(&text) {
            Some(header) => section.add_in_header(header),
            None => debug!("Ignoring malformed header declaration '{}' on {}", text, method.name),
        }
    }

    let consumes = pick_consumes(&method.annotations);
    if !consumes.is_empty() {
        section.add_in_header(Header::new(Header::CONTENT_TYPE, consumes.join(",")));
    }

    let produces = pick_produces(&method.annotations);
    if !produces.is_empty() {
        section.add_out_header(Header::new(Header::CONTENT_TYPE, produces.join(",")));
    }

    for param in method.params.iter().filter(|p| is_request_header(p)) {
        let key = client_name(param, REQUEST_HEADER).ok_or_else(|| {
            ExtractError::missing(
                &method.name,
                "request header binds a pattern and names no header",
            )
        })?;
        let mut value = param
            .annotation(REQUEST_HEADER)
            .and_then(|a| a.attr_text(&["default_value"]))
            .unwrap_or_else(|| HEADER_PLACEHOLDER.to_string());

        let description = cx.resolve(&param.type_ref);
        if !description.is_available() {
            warn!(
                "Cannot resolve type {} of header {} in {}, omitting it",
                param.type_ref, key, method.name
            );
            continue;
        }
        if value.trim().is_empty() {
            if let Some(example) = scalar_text(&description.value()) {
                value = example;
            }
        }
        section.add_in_header(Header::new(key, value));
    }
    Ok(())
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// GET handlers take query parameters; every other method takes a JSON body,
/// either the explicit `#[request_body]` or all request params merged
fn visit_parameters(method: &MethodDecl, section: &mut Section, cx: &ExtractContext<'_>) {
    if section.method == Method::Get {
        let query = merge_request_params(method, section, cx);
        attach_parameters(section, query);
        return;
    }

    section.query_parameter = false;
    if !section.in_headers.contains_key(Header::CONTENT_TYPE) {
        section.add_in_header(Header::json_content_type());
    }

    match request_body(&method.params) {
        Some(param) => visit_request_body(method, param, section, cx),
        None => {
            let body = merge_request_params(method, section, cx);
            attach_parameters(section, body);
        }
    }
}

fn merge_request_params(
    method: &MethodDecl,
    section: &Section,
    cx: &ExtractContext<'_>,
) -> TypeDescription {
    let mut merged = TypeDescription::object(String::new());

    for param in method.params.iter().filter(|p| is_request_param(p)) {
        let mut description = cx.resolve(&param.type_ref);
        if !description.is_available() {
            warn!(
                "Cannot resolve type {} of parameter {} in {}, omitting it",
                param.type_ref,
                param.name.as_deref().unwrap_or("_"),
                method.name
            );
            continue;
        }

        let annotation = param.annotation(REQUEST_PARAM);
        if let Some(required) = annotation.and_then(|a| a.attr_bool(&["required"])) {
            description.required = required;
        }

        if description.is_object() {
            merged.merge(description);
            continue;
        }

        let Some(key) = client_name(param, REQUEST_PARAM) else {
            warn!(
                "Parameter of type {} in {} has no name, omitting it",
                param.type_ref, method.name
            );
            continue;
        };
        if let Some(remark) = param_remark(section, param, &key) {
            description.add_remark(&remark);
        }
        if let Some(default) = annotation.and_then(|a| a.attr_text(&["default_value"])) {
            description.set_default_value(&default);
        }
        description.set_key(key);
        merged.add_field(description);
    }
    merged
}

fn attach_parameters(section: &mut Section, merged: TypeDescription) {
    if merged.as_object().map_or(true, |object| object.is_empty()) {
        return;
    }
    section.parameter = Some(merged.value());
    section.add_request_rows(merged.rows());
}

fn visit_request_body(
    method: &MethodDecl,
    param: &ParamDecl,
    section: &mut Section,
    cx: &ExtractContext<'_>,
) {
    let mut description = cx.resolve(&param.type_ref);
    if !description.is_available() {
        warn!(
            "Cannot resolve request body type {} of {}, omitting the body",
            param.type_ref, method.name
        );
        return;
    }
    if description.is_scalar() {
        if let Some(name) = &param.name {
            description.set_key(name.clone());
        }
    }
    section.parameter = Some(description.value());
    section.add_request_rows(description.rows());
}

fn visit_response(method: &MethodDecl, section: &mut Section, cx: &ExtractContext<'_>) {
    let declared = method
        .annotation(RESPONSE_TYPE)
        .and_then(|a| a.attr_text(&[VALUE]));

    let description = match (&declared, &method.return_type) {
        (Some(name), _) => cx.resolve_name(name),
        (None, Some(ty)) => cx.resolve(ty),
        (None, None) => return,
    };
    if !description.is_available() {
        debug!(
            "Response type {} of {} is not documentable",
            description.type_name, method.name
        );
        return;
    }

    section.response = Some(description.value());
    if !description.is_scalar() {
        section.add_response_rows(description.rows());
    }
}

fn per_uri(section: Section, uris: Vec<String>) -> Vec<Section> {
    uris.into_iter()
        .enumerate()
        .map(|(index, uri)| {
            let mut copy = section.clone();
            if index > 0 {
                copy.id = format!("{}_{}", section.id, index + 1);
            }
            copy.uri = uri;
            copy
        })
        .collect()
}
