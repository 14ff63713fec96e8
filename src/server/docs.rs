//! OpenAPI document and the Swagger UI page that renders it

use axum::{response::Html, Json};
use utoipa::OpenApi;

use crate::core::models::LanguageInfo;
use crate::server::api::{ErrorResponse, TranslateBody, TranslateResponse};

/// OpenAPI document for the translation endpoints
#[derive(OpenApi)]
#[openapi(
    info(title = "Translate Gateway", version = "1.0"),
    paths(crate::server::api::languages, crate::server::api::translate),
    components(schemas(LanguageInfo, TranslateBody, TranslateResponse, ErrorResponse)),
    tags((name = "translate", description = "Text translation"))
)]
pub struct ApiDoc;

/// Machine-readable API description
pub async fn spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Translate Gateway API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/spec", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

/// Interactive docs for `/spec`
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_both_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(doc["info"]["title"], "Translate Gateway");
        assert_eq!(doc["info"]["version"], "1.0");
        assert!(doc["paths"]["/languages"]["get"].is_object());
        assert!(doc["paths"]["/translate"]["post"].is_object());
        assert!(doc["paths"]["/translate"]["post"]["responses"]["500"].is_object());
        assert!(doc["components"]["schemas"]["TranslateBody"].is_object());
    }

    #[test]
    fn test_swagger_page_is_complete() {
        assert!(SWAGGER_UI.contains(r##"dom_id: "#swagger-ui""##));
        assert!(SWAGGER_UI.trim_end().ends_with("</html>"));
    }
}
