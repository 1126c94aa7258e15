use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    middleware::{RateLimitPolicy, RateLimiter, log_errors, no_content_preflight, rate_limit},
    routes,
};

/// 浏览器端可读取的响应头
const EXPOSED_HEADERS: [&str; 4] = [
    routes::X_CACHE,
    "x-ratelimit-limit",
    "x-ratelimit-remaining",
    "x-ratelimit-reset",
];

// 每类资源使用各自的限流器，被拒绝的请求不会进入处理函数
fn limited(router: Router<AppState>, state: &AppState, policy: RateLimitPolicy) -> Router<AppState> {
    let limiter = Arc::new(RateLimiter::new(state.store.clone(), policy));
    router.route_layer(from_fn_with_state(limiter, rate_limit))
}

fn cors() -> CorsLayer {
    let mut exposed: Vec<HeaderName> = EXPOSED_HEADERS
        .iter()
        .map(|&name| HeaderName::from_static(name))
        .collect();
    exposed.push(header::RETRY_AFTER);

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(exposed)
}

// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let breaches = limited(
        Router::new().route("/breaches", get(routes::breach::list_breaches)),
        &state,
        config.breaches.policy,
    );
    let conferences = limited(
        Router::new().route("/conferences", get(routes::conference::list_conferences)),
        &state,
        config.conferences.policy,
    );

    let api = Router::new().merge(breaches).merge(conferences);

    let base = config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router
        .layer(from_fn(log_errors))
        .layer(cors())
        .layer(from_fn(no_content_preflight))
        .with_state(state)
}
