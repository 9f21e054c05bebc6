pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::annotation::handlers as annotation;
use crate::catalog::handlers as catalog;
use crate::chat::handlers as chat;
use crate::export::handlers as export;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Catalog
        .route("/api/v1/catalog/categories", get(catalog::handle_categories))
        .route("/api/v1/catalog/products", get(catalog::handle_products))
        .route("/api/v1/prompts", get(catalog::handle_list_prompts))
        // Annotation
        .route("/api/v1/prompts/annotate", post(annotation::handle_annotate))
        .route("/api/v1/prompts/select", post(annotation::handle_select_prompt))
        // Chat
        .route("/api/v1/chat", post(chat::handle_chat))
        // Export
        .route("/api/v1/export/plan", post(export::handle_export_plan))
        .route("/api/v1/export/snapshot", post(export::handle_export_snapshot))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bytes::Bytes;
    use reqwest::Method;
    use serde_json::{json, Map, Value};
    use tower::ServiceExt;

    use crate::catalog::repository::{
        CatalogError, PromptCatalog, PromptFilter, PromptRecord, ALL_CATEGORIES,
    };
    use crate::chat::transport::{Transport, TransportError, TransportRequest, TransportResponse};
    use crate::config::Config;
    use crate::export::snapshot::tests::png_header;

    struct InMemoryCatalog {
        prompts: Vec<PromptRecord>,
        record: Value,
    }

    #[async_trait]
    impl PromptCatalog for InMemoryCatalog {
        async fn categories(&self) -> Result<Vec<String>, CatalogError> {
            Ok(vec!["Finance".to_string(), "Risk".to_string()])
        }

        async fn products(&self) -> Result<Vec<String>, CatalogError> {
            Ok(vec!["Loans".to_string()])
        }

        async fn prompts(&self, filter: &PromptFilter) -> Result<Vec<PromptRecord>, CatalogError> {
            Ok(self
                .prompts
                .iter()
                .filter(|p| match filter.category.as_deref() {
                    None | Some(ALL_CATEGORIES) => true,
                    Some(c) => p.category.as_deref() == Some(c),
                })
                .cloned()
                .collect())
        }

        async fn prompt_record(&self, prompt: &str) -> Result<Map<String, Value>, CatalogError> {
            if prompt == "unknown" {
                return Err(CatalogError::Status {
                    status: 404,
                    url: "getPrompt".to_string(),
                });
            }
            Ok(self.record.as_object().cloned().unwrap_or_default())
        }
    }

    /// Backend whose user endpoint rejects everyone.
    struct RejectingBackend;

    #[async_trait]
    impl Transport for RejectingBackend {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            if request.method == Method::HEAD {
                return Ok(TransportResponse {
                    status: 200,
                    headers: vec![("X-CSRF-Token".to_string(), "t".to_string())],
                    body: Bytes::new(),
                });
            }
            Ok(TransportResponse {
                status: 403,
                ..Default::default()
            })
        }
    }

    fn app() -> Router {
        let state = AppState {
            config: Config {
                backend_base_url: "http://backend.local/app".to_string(),
                prompt_service_url: "http://svc.local/odata".to_string(),
                port: 0,
                rust_log: "info".to_string(),
            },
            catalog: Arc::new(InMemoryCatalog {
                prompts: vec![
                    PromptRecord {
                        prompt: "Show revenue for EMEA".to_string(),
                        description: Some("Revenue by region".to_string()),
                        category: Some("Finance".to_string()),
                        product: Some("Loans".to_string()),
                    },
                    PromptRecord {
                        prompt: "List breaches".to_string(),
                        description: None,
                        category: Some("Risk".to_string()),
                        product: None,
                    },
                ],
                record: json!({
                    "prompt": "Show revenue for EMEA",
                    "key1": "EMEA",
                    "sel1": "Sales region",
                    "key2": "revenue",
                    "sel2": ""
                }),
            }),
            chat_transport: Arc::new(RejectingBackend),
        };
        build_router(state)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_categories_include_sentinel() {
        let (status, body) = send(get("/api/v1/catalog/categories")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(["All Categories", "Finance", "Risk"]));
    }

    #[tokio::test]
    async fn test_prompt_list_filters_by_category() {
        let (status, body) = send(get("/api/v1/prompts?category=Risk")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["prompt"], "List breaches");
    }

    #[tokio::test]
    async fn test_annotate_endpoint() {
        let (status, body) = send(post_json(
            "/api/v1/prompts/annotate",
            json!({
                "prompt": "corporate rate applies",
                "placeholders": [{ "value": "rate", "description": "Rate type" }]
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["legend"][0]["sequence"], 1);
        assert_eq!(body["legend"][0]["description"], "Rate type");
        assert!(body["annotated_text"]
            .as_str()
            .unwrap()
            .starts_with("corporate <span"));
    }

    #[tokio::test]
    async fn test_select_prompt_uses_catalog_record() {
        let (status, body) = send(post_json(
            "/api/v1/prompts/select",
            json!({ "prompt": "Show revenue for EMEA" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        // revenue (no description) comes first in the text, EMEA second.
        assert_eq!(body["keywords"][0]["value"], "revenue");
        assert_eq!(body["keywords"][1]["sequence"], 2);
        assert_eq!(body["legend"].as_array().unwrap().len(), 1);
        assert_eq!(body["legend"][0]["sequence"], 2);
    }

    #[tokio::test]
    async fn test_select_unknown_prompt_is_404() {
        let (status, body) = send(post_json(
            "/api/v1/prompts/select",
            json!({ "prompt": "unknown" }),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_chat_empty_prompt_rejected() {
        let (status, body) = send(post_json("/api/v1/chat", json!({ "prompt": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_chat_identity_failure_is_401() {
        let (status, body) =
            send(post_json("/api/v1/chat", json!({ "prompt": "revenue by region" }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "IDENTITY_ERROR");
    }

    #[tokio::test]
    async fn test_export_plan_defaults_to_a4() {
        let (status, body) = send(post_json(
            "/api/v1/export/plan",
            json!({ "canvas_width_px": 800, "canvas_height_px": 2000 }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filename"], "IntellibaseNLQ_Chat_Export.pdf");
        assert_eq!(body["placements"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_export_plan_over_page_limit_rejected() {
        let (status, body) = send(post_json(
            "/api/v1/export/plan",
            json!({
                "canvas_width_px": 1,
                "canvas_height_px": 4_294_967_295u32,
                "page": { "width_pt": 1e17, "height_pt": 1.0 }
            }),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_export_snapshot_reads_png_header() {
        let boundary = "snapshot-boundary";
        let mut payload = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"snapshot\"; filename=\"chat.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        payload.extend_from_slice(&png_header(1588, 400));
        payload.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/export/snapshot")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(payload))
            .unwrap();

        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["placements"].as_array().unwrap().len(), 1);
        assert_eq!(body["placements"][0]["y_offset_pt"], 0.0);
    }
}
