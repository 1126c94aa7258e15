use axum::Json;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::middleware::RateLimitDecision;

/// 会返回给调用方的请求级错误
///
/// 存储层故障不在此列，见 [`crate::cache::StoreError`]。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 服务端缺少必要配置（例如表格 API 密钥）
    #[error("{0}")]
    Configuration(&'static str),
    /// 上游表格 API 返回失败
    #[error("Failed to fetch {resource} data: {details}")]
    Upstream {
        resource: &'static str,
        details: String,
    },
    #[error("Rate limit exceeded")]
    RateLimited(RateLimitDecision),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Configuration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: message.to_string(),
                    details: None,
                    retry_after: None,
                }),
            )
                .into_response(),
            AppError::Upstream { resource, details } => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Failed to fetch {} data", resource),
                    details: Some(details),
                    retry_after: None,
                }),
            )
                .into_response(),
            AppError::RateLimited(decision) => {
                let retry_after = decision.retry_after_secs();
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(ErrorResponse {
                        error: "Rate limit exceeded".to_string(),
                        details: Some("Too many requests. Please try again later.".to_string()),
                        retry_after: Some(retry_after),
                    }),
                )
                    .into_response();

                let headers = response.headers_mut();
                decision.write_headers(headers);
                headers.insert(
                    axum::http::header::RETRY_AFTER,
                    HeaderValue::from(retry_after),
                );
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn upstream_error_maps_to_bad_gateway_with_details() {
        let response = AppError::Upstream {
            resource: "breach",
            details: "403 Forbidden - API key not valid".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to fetch breach data");
        assert_eq!(json["details"], "403 Forbidden - API key not valid");
        assert!(json.get("retryAfter").is_none());
    }

    #[tokio::test]
    async fn configuration_error_has_no_details() {
        let response =
            AppError::Configuration("Google Sheets API key not configured").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Google Sheets API key not configured");
        assert!(json.get("details").is_none());
    }
}
