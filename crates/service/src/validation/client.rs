use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::error;

use crate::errors::ServiceError;
use crate::validation::{HtmlValidator, ValidationResult};

pub const SERVICE_UNAVAILABLE_MSG: &str =
    "HTML validation service is currently unavailable. Please try again later.";

/// Validator backed by an HTTP endpoint speaking the Nu validator protocol:
/// POST raw HTML with `?out=json` and read back a `messages` array.
/// One outbound call per invocation, no retries.
pub struct HttpHtmlValidator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHtmlValidator {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().user_agent("banner-api").build()?;
        Ok(Self { client, base_url: base_url.into() })
    }
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    messages: Vec<ValidationMessage>,
}

#[derive(Debug, Deserialize)]
struct ValidationMessage {
    message: String,
    #[serde(rename = "type")]
    kind: String,
}

#[async_trait]
impl HtmlValidator for HttpHtmlValidator {
    async fn validate(&self, html: &str) -> Result<ValidationResult, ServiceError> {
        let resp = self
            .client
            .post(&self.base_url)
            .query(&[("out", "json")])
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html.to_owned())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "validator request failed");
                ServiceError::Unavailable(SERVICE_UNAVAILABLE_MSG.into())
            })?;

        if !resp.status().is_success() {
            error!(status = %resp.status(), "validator returned failure status");
            return Err(ServiceError::Unavailable(SERVICE_UNAVAILABLE_MSG.into()));
        }

        // An unparseable body is a collaborator failure, not invalid content.
        let parsed: ValidationResponse = resp.json().await.map_err(|e| {
            error!(error = %e, "validator response unreadable");
            ServiceError::Unavailable(SERVICE_UNAVAILABLE_MSG.into())
        })?;

        let errors = parsed
            .messages
            .into_iter()
            .filter(|m| m.kind == "error")
            .map(|m| m.message)
            .collect();

        Ok(ValidationResult { errors })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub serve");
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn keeps_only_error_messages() {
        let router = Router::new().route(
            "/",
            post(|| async {
                Json(json!({
                    "messages": [
                        {"message": "bad tag", "type": "error"},
                        {"message": "consider a lang attribute", "type": "info"},
                        {"message": "obsolete attribute", "type": "warning"},
                        {"message": "unclosed element", "type": "error"},
                    ]
                }))
            }),
        );
        let base = spawn_stub(router).await;

        let validator = HttpHtmlValidator::new(base).expect("client");
        let result = validator.validate("<p>x</p>").await.expect("validate");
        assert_eq!(result.errors, vec!["bad tag".to_string(), "unclosed element".to_string()]);
        assert!(!result.is_valid());
    }

    #[tokio::test]
    async fn sends_html_body_with_json_output_requested() {
        let router = Router::new().route(
            "/",
            post(
                |headers: HeaderMap, Query(q): Query<HashMap<String, String>>, body: String| async move {
                    let content_type = headers
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();
                    if content_type != "text/html; charset=utf-8"
                        || q.get("out").map(String::as_str) != Some("json")
                        || body != "<p>x</p>"
                    {
                        return (StatusCode::BAD_REQUEST, Json(json!({})));
                    }
                    (StatusCode::OK, Json(json!({"messages": []})))
                },
            ),
        );
        let base = spawn_stub(router).await;

        let validator = HttpHtmlValidator::new(base).expect("client");
        let result = validator.validate("<p>x</p>").await.expect("validate");
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn failure_status_is_unavailable() {
        let router = Router::new()
            .route("/", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base = spawn_stub(router).await;

        let validator = HttpHtmlValidator::new(base).expect("client");
        let err = validator.validate("<p>x</p>").await.expect_err("should fail");
        assert!(matches!(err, ServiceError::Unavailable(msg) if msg == SERVICE_UNAVAILABLE_MSG));
    }

    #[tokio::test]
    async fn malformed_body_is_unavailable() {
        let router = Router::new().route("/", post(|| async { "not json at all" }));
        let base = spawn_stub(router).await;

        let validator = HttpHtmlValidator::new(base).expect("client");
        let err = validator.validate("<p>x</p>").await.expect_err("should fail");
        assert!(matches!(err, ServiceError::Unavailable(_)));
    }
}
