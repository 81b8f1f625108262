use apidoc_from_source::{
    cli,
    config::DocConfig,
    render::OutputFormat,
    schema::{Header, Method, Project, Section},
    serializer::serialize_json,
    strategy::Framework,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn shop_project() -> TempDir {
    create_test_project(vec![
        ("src/models.rs", include_str!("fixtures/models.rs")),
        ("src/user_controller.rs", include_str!("fixtures/user_controller.rs")),
    ])
}

fn generate(root: &Path, config: &DocConfig) -> Project {
    cli::generate(root, config, None).expect("Failed to generate project")
}

fn section<'a>(project: &'a Project, id: &str) -> &'a Section {
    project
        .sections()
        .find(|s| s.id == id)
        .unwrap_or_else(|| panic!("no section {}", id))
}

fn request_keys(section: &Section) -> Vec<&str> {
    section.request_rows.keys().map(String::as_str).collect()
}

fn response_keys(section: &Section) -> Vec<&str> {
    section.response_rows.keys().map(String::as_str).collect()
}

#[test]
fn test_end_to_end_structure() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let books: Vec<&str> = project.books.keys().map(String::as_str).collect();
    assert_eq!(books, vec!["default", "admin"]);

    let chapters: Vec<&str> = project.chapters().map(|c| c.name.as_str()).collect();
    assert_eq!(chapters, vec!["Users", "Orders"]);

    let users: Vec<(&str, Method, &str)> = project.books["default"].chapters[0]
        .sections
        .iter()
        .map(|s| (s.id.as_str(), s.method, s.uri.as_str()))
        .collect();
    assert_eq!(
        users,
        vec![
            ("list", Method::Get, "/users"),
            ("get", Method::Get, "/users/{id}"),
            ("get_2", Method::Get, "/users/by-id/{id}"),
            ("create", Method::Post, "/users"),
            ("rename", Method::Put, "/users/{id}/name"),
        ]
    );
}

#[test]
fn test_get_query_parameters() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let list = section(&project, "list");
    assert_eq!(list.name, "List users");
    assert!(list.query_parameter);
    assert_eq!(request_keys(list), vec!["page", "size"]);
    assert_eq!(list.request_rows["page"].default_value.as_deref(), Some("0"));
    assert_eq!(
        list.request_rows["page"].remark.as_deref(),
        Some("zero-based page index")
    );
    assert_eq!(list.request_line(), "GET /users?page=0&size=20");

    assert_eq!(
        response_keys(list),
        vec![
            "[].id",
            "[].name",
            "[].age",
            "[].address",
            "[].address.city",
            "[].address.zip",
            "[].role"
        ]
    );
}

#[test]
fn test_path_variables_and_multiple_paths() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let get = section(&project, "get");
    let get_2 = section(&project, "get_2");
    assert_eq!(request_keys(get), vec!["id"]);
    assert_eq!(get.request_rows["id"].type_name, "u64");
    assert_eq!(get.request_rows["id"].remark.as_deref(), Some("user identifier"));
    assert_eq!(get.request_rows, get_2.request_rows);
    assert_eq!(get.response, get_2.response);
    assert!(get.path_variables.contains_key("id"));
}

#[test]
fn test_post_body_omits_unresolvable_fields() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let create = section(&project, "create");
    assert!(!create.query_parameter);
    assert!(create.has_request_body());
    assert_eq!(request_keys(create), vec!["name", "age"]);
    assert_eq!(create.request_rows["age"].default_value.as_deref(), Some("18"));

    let headers: Vec<&str> = create.in_headers.keys().map(String::as_str).collect();
    assert_eq!(headers, vec!["X-Request-Id", "Content-Type"]);
    assert_eq!(create.in_headers["X-Request-Id"].value, "{value}");
    assert_eq!(
        create.in_headers[Header::CONTENT_TYPE].value,
        Header::APPLICATION_JSON
    );
}

#[test]
fn test_non_get_merges_implicit_parameters() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let rename = section(&project, "rename");
    assert_eq!(request_keys(rename), vec!["id", "name", "note"]);
    assert_eq!(rename.request_rows["note"].condition, "optional");
    assert_eq!(rename.parameter, Some(json!({"name": "", "note": ""})));
    assert!(rename.response.is_none());
}

#[test]
fn test_skipped_and_ignored_endpoints() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let ids: Vec<&str> = project.sections().map(|s| s.id.as_str()).collect();
    assert!(!ids.contains(&"merge"), "pattern-bound path variable skips the endpoint");
    assert!(!ids.contains(&"delete"), "@ignore drops the section");
    assert!(!ids.contains(&"helper"));
}

#[test]
fn test_paging_and_declared_response_type() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let search = section(&project, "search");
    assert_eq!(request_keys(search), vec!["page", "size", "sort"]);
    assert_eq!(
        response_keys(search),
        vec![
            "content",
            "content[].id",
            "content[].total",
            "content[].parent",
            "totalElements",
            "totalPages",
            "number",
            "size"
        ]
    );

    let export = section(&project, "export");
    assert_eq!(
        response_keys(export),
        vec!["[].id", "[].total", "[].parent"]
    );
}

#[test]
fn test_path_filter_precedence() {
    let temp_dir = shop_project();

    let only = DocConfig {
        only_patterns: vec!["/users/*".to_string()],
        exclude_patterns: vec!["/users/{id}".to_string()],
        ..DocConfig::default()
    };
    let project = generate(temp_dir.path(), &only);
    let uris: Vec<&str> = project.sections().map(|s| s.uri.as_str()).collect();
    assert_eq!(uris, vec!["/users/{id}"]);

    let exclude = DocConfig {
        exclude_patterns: vec!["/admin/**".to_string(), "/users/*/name".to_string()],
        ..DocConfig::default()
    };
    let project = generate(temp_dir.path(), &exclude);
    let books: Vec<&str> = project.books.keys().map(String::as_str).collect();
    assert_eq!(books, vec!["default"]);
    assert!(project.sections().all(|s| s.id != "rename"));
}

#[test]
fn test_url_prefix_and_explicit_framework() {
    let temp_dir = shop_project();
    let config = DocConfig {
        url_prefix: "/api".to_string(),
        ..DocConfig::default()
    };
    let project = cli::generate(temp_dir.path(), &config, Some(Framework::Spring)).unwrap();
    assert_eq!(section(&project, "list").uri, "/api/users");
    assert_eq!(section(&project, "search").uri, "/api/admin/orders/search");
}

#[test]
fn test_render_asciidoc_books() {
    let temp_dir = shop_project();
    let config = DocConfig {
        name: Some("Shop".to_string()),
        version: Some("1.0".to_string()),
        ..DocConfig::default()
    };
    let project = generate(temp_dir.path(), &config);

    let out_dir = TempDir::new().unwrap();
    let files = cli::render(&project, &[OutputFormat::Asciidoc]).unwrap();
    cli::write_output(&files, Some(out_dir.path())).unwrap();

    let default_book = std::fs::read_to_string(out_dir.path().join("api_default.adoc")).unwrap();
    assert!(default_book.starts_with("= Shop\n"));
    assert!(default_book.contains("version:1.0"));
    assert!(default_book.contains("== Users\n"));
    assert!(default_book.contains("=== List users\n"));
    assert!(default_book.contains("GET /users?page=0&size=20\n"));
    assert!(default_book.contains("header: X-Request-Id: {value}  correlation id\n"));
    assert!(default_book.contains("|page|u32|required (has default)|0|zero-based page index\n"));
    assert!(!default_book.contains("Orders"));

    let admin_book = std::fs::read_to_string(out_dir.path().join("api_admin.adoc")).unwrap();
    assert!(admin_book.starts_with("= Shop - admin\n"));
    assert!(admin_book.contains("=== Search orders\n"));
}

#[test]
fn test_json_export_matches_model() {
    let temp_dir = shop_project();
    let project = generate(temp_dir.path(), &DocConfig::default());

    let files = cli::render(&project, &[OutputFormat::Json, OutputFormat::Yaml]).unwrap();
    let names: Vec<String> = files.iter().map(|f| f.path.display().to_string()).collect();
    assert_eq!(names, vec!["api.json", "api.yaml"]);
    assert_eq!(files[0].content, serialize_json(&project).unwrap());

    let value: serde_json::Value = serde_json::from_str(&files[0].content).unwrap();
    let create = &value["books"]["default"]["chapters"][0]["sections"][3];
    assert_eq!(create["id"], "create");
    assert_eq!(create["method"], "POST");
    assert_eq!(create["parameter"]["name"], "");
}

#[test]
fn test_config_file_drives_the_run() {
    let temp_dir = shop_project();
    std::fs::write(
        temp_dir.path().join("only.yml"),
        "- /admin/**\n",
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join(cli::DEFAULT_CONFIG_FILE),
        "id: shop\nframework: spring\nurlOnlyYmlPath: only.yml\nformats: [json]\n",
    )
    .unwrap();

    let args = cli::CliArgs {
        project_path: temp_dir.path().to_path_buf(),
        config_path: None,
        formats: Vec::new(),
        output_dir: None,
        framework: None,
        only: Vec::new(),
        exclude: Vec::new(),
        url_prefix: None,
        id: None,
        name: None,
        version_label: None,
        verbose: false,
    };
    let config = cli::load_config(&args).unwrap();
    assert_eq!(config.id, "shop");
    assert_eq!(config.formats, vec![OutputFormat::Json]);

    let project = generate(temp_dir.path(), &config);
    let ids: Vec<&str> = project.sections().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["search", "export"]);
}

const BILLING_CONTROLLER: &str = r#"
/// Invoices
#[rest_controller]
#[request_mapping("/invoices")]
impl InvoiceController {
    /// List invoices
    #[get_mapping]
    pub async fn list(&self) -> Json<Vec<Invoice>> {
        todo!()
    }
}

pub struct Invoice {
    pub number: String,
    pub amount: f64,
}
"#;

fn modular_project() -> TempDir {
    create_test_project(vec![
        ("services/shop/src/models.rs", include_str!("fixtures/models.rs")),
        (
            "services/shop/src/user_controller.rs",
            include_str!("fixtures/user_controller.rs"),
        ),
        ("services/billing/src/lib.rs", BILLING_CONTROLLER),
        ("services/empty/README.md", "nothing to see"),
    ])
}

fn modular_config(max_depth: usize) -> DocConfig {
    let yaml = format!(
        concat!(
            "maxDepth: {}\n",
            "urlPrefix: /api\n",
            "modules:\n",
            "  - dirName: shop\n",
            "  - dirName: billing\n",
            "    urlPrefix: /billing\n",
            "  - dirName: empty\n",
        ),
        max_depth
    );
    DocConfig::from_yaml(&yaml).unwrap()
}

#[test]
fn test_one_project_per_module() {
    let temp_dir = modular_project();
    let projects = cli::generate_all(temp_dir.path(), &modular_config(2), None).unwrap();

    let ids: Vec<&str> = projects.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["billing", "shop"], "empty module is skipped");
    assert_eq!(projects[0].name, "billing");

    let billing: Vec<&str> = projects[0].sections().map(|s| s.uri.as_str()).collect();
    assert_eq!(billing, vec!["/billing/invoices"]);
    assert_eq!(section(&projects[1], "list").uri, "/api/users");

    let err = cli::generate_all(temp_dir.path(), &modular_config(1), None).unwrap_err();
    assert!(err.to_string().contains("No module directory produced documentation"));
}

#[test]
fn test_merged_asciidoc_file() {
    let temp_dir = modular_project();
    let mut config = modular_config(2);
    config.merge_to_one_file = true;
    config.merge_file_name = Some("everything".to_string());
    config.formats = vec![OutputFormat::Asciidoc, OutputFormat::Json];

    let projects = cli::generate_all(temp_dir.path(), &config, None).unwrap();
    let files = cli::render_all(&projects, &config).unwrap();
    let names: Vec<String> = files.iter().map(|f| f.path.display().to_string()).collect();
    assert_eq!(
        names,
        vec![
            "billing_default.adoc",
            "billing.json",
            "shop_default.adoc",
            "shop_admin.adoc",
            "shop.json",
            "everything.adoc"
        ]
    );

    let merged = &files[5].content;
    let billing = merged.find("= billing\n").unwrap();
    let shop = merged.find("= shop\n").unwrap();
    let admin = merged.find("= shop - admin\n").unwrap();
    assert!(billing < shop && shop < admin);

    config.merge_to_one_file = false;
    let files = cli::render_all(&projects, &config).unwrap();
    assert_eq!(files.len(), 5);
}
