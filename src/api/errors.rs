use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured API error that serializes to JSON.
///
/// Provider failures never reach this type; they are turned into a fallback
/// answer by the chat service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidBody(rejection) => {
                (rejection.status(), "INVALID_BODY", rejection.body_text())
            }
        };

        tracing::debug!(%status, code, %message, "rejecting request");

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;

    use crate::api::models::ChatRequest;

    async fn error_to_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    async fn reject(content_type: &str, body: &'static str) -> ApiError {
        let req = Request::post("/chat")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        let rejection = Json::<ChatRequest>::from_request(req, &())
            .await
            .expect_err("body should be rejected");
        ApiError::from(rejection)
    }

    #[tokio::test]
    async fn schema_mismatch_returns_422() {
        let err = reject("application/json", r#"{"messages":[{"role":"bot","content":"x"}]}"#).await;
        let (status, json) = error_to_json(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "INVALID_BODY");
        assert!(json["error"]["message"].as_str().unwrap().contains("role"));
    }

    #[tokio::test]
    async fn syntax_error_returns_400() {
        let err = reject("application/json", "{not json").await;
        let (status, json) = error_to_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn wrong_content_type_returns_415() {
        let err = reject("text/plain", r#"{"messages":[]}"#).await;
        let (status, _) = error_to_json(err).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
