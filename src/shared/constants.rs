/// Path under which the category resource is mounted
pub const CATEGORY_BASE_PATH: &str = "/admin/category";

/// Path serving the generated OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
