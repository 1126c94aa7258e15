pub mod breach;
pub mod conference;

use axum::{
    Json,
    http::HeaderValue,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::gateway::Fetched;

pub const X_CACHE: &str = "x-cache";

/// 完整记录列表作为响应体，不加外层包装
pub(crate) fn records_response<T: Serialize>(fetched: Fetched<T>) -> Response {
    let mut response = Json(fetched.records).into_response();
    response
        .headers_mut()
        .insert(X_CACHE, HeaderValue::from_static(fetched.cache.as_str()));
    response
}
