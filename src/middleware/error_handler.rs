use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

/// 日志中最多记录的响应体字符数，响应本身不截断
const MAX_LOGGED_CHARS: usize = 4096;

/// 记录所有 5xx 响应，包括上游失败和配置缺失
pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    // 读取完整响应体，日志截断不能影响返回给客户端的内容
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to read error response body for {} {}: {}", method, path, e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let logged: String = text.chars().take(MAX_LOGGED_CHARS).collect();
    error!(
        "{} {} failed - Status: {}, Body: {}{}",
        method,
        path,
        parts.status,
        logged,
        if logged.len() < text.len() { "…" } else { "" }
    );

    // 重置body以便重新构建响应
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
