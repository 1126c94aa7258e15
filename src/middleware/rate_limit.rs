use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    cache::{KeyValueStore, operations::RateLimitCacheOperations},
    error::AppError,
};

/// 限流策略：窗口长度与窗口内最大请求数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window_ms: i64,
    pub max_requests: u32,
}

impl RateLimitPolicy {
    /// 每分钟 100 次
    pub const STANDARD: Self = Self::new(60 * 1000, 100);
    /// 每分钟 10 次
    pub const STRICT: Self = Self::new(60 * 1000, 10);
    /// 每小时 10 次
    pub const BULK: Self = Self::new(60 * 60 * 1000, 10);

    pub const fn new(window_ms: i64, max_requests: u32) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::STANDARD),
            "strict" => Some(Self::STRICT),
            "bulk" => Some(Self::BULK),
            _ => None,
        }
    }
}

/// 单次准入判定结果，附带响应头所需的限流元数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// 窗口结束时间，Unix 毫秒
    pub reset_at_ms: i64,
    /// 判定时刻，Unix 毫秒
    pub now_ms: i64,
}

impl RateLimitDecision {
    /// 距窗口重置的秒数，向上取整，至少 1 秒
    pub fn retry_after_secs(&self) -> u64 {
        let remaining_ms = (self.reset_at_ms - self.now_ms).max(0) as u64;
        remaining_ms.div_ceil(1000).max(1)
    }

    pub fn write_headers(&self, headers: &mut HeaderMap) {
        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        // 与 Retry-After 一致，以秒为单位向上取整
        let reset_secs = (self.reset_at_ms as u64).div_ceil(1000);
        headers.insert("x-ratelimit-reset", HeaderValue::from(reset_secs));
    }
}

/// 固定窗口限流器
///
/// 窗口起点为 `now / window_ms * window_ms`，同一窗口内的请求共享一个计数。
/// 跨越窗口边界的短时间内最多可放行 `2 * max_requests` 次，这是固定窗口算法
/// 可以接受的代价。存储不可用时放行请求。
#[derive(Clone)]
pub struct RateLimiter {
    store: Option<Arc<dyn KeyValueStore>>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(store: Option<Arc<dyn KeyValueStore>>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn admit(&self, client: &str) -> RateLimitDecision {
        self.admit_at(client, chrono::Utc::now().timestamp_millis())
            .await
    }

    pub async fn admit_at(&self, client: &str, now_ms: i64) -> RateLimitDecision {
        let window_ms = self.policy.window_ms;
        let max_requests = self.policy.max_requests;
        let window_start = now_ms.div_euclid(window_ms) * window_ms;
        let reset_at_ms = window_start + window_ms;

        let decision = |allowed, remaining| RateLimitDecision {
            allowed,
            limit: max_requests,
            remaining,
            reset_at_ms,
            now_ms,
        };
        let fail_open = decision(true, max_requests.saturating_sub(1));

        let Some(store) = self.store.as_deref() else {
            return fail_open;
        };

        let count = match RateLimitCacheOperations::get_count(store, client, window_start).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Rate limiter store read failed, admitting request: {}", e);
                return fail_open;
            }
        };

        if count >= max_requests {
            return decision(false, 0);
        }

        let new_count = count + 1;
        // 过期时间设为窗口剩余时长，旧窗口的计数会被存储自动清理
        let ttl_secs = ((reset_at_ms - now_ms) as u64).div_ceil(1000);
        if let Err(e) = RateLimitCacheOperations::set_count(
            store,
            client,
            window_start,
            new_count,
            reset_at_ms,
            ttl_secs,
        )
        .await
        {
            tracing::warn!("Rate limiter store write failed, admitting request: {}", e);
            return fail_open;
        }

        decision(true, max_requests - new_count)
    }
}

/// 从代理头中取客户端地址，取不到时所有客户端共用 "unknown" 计数
pub fn client_identity(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header("cf-connecting-ip")
        .or_else(|| header("x-real-ip"))
        .or_else(|| {
            header("x-forwarded-for")
                .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()))
        })
        .unwrap_or("unknown")
        .to_string()
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let client = client_identity(req.headers());
    let decision = limiter.admit(&client).await;

    if !decision.allowed {
        tracing::info!(
            "Rate limit exceeded for {} on {}, resets in {}s",
            client,
            req.uri().path(),
            decision.retry_after_secs()
        );
        return AppError::RateLimited(decision).into_response();
    }

    let mut response = next.run(req).await;
    decision.write_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, StoreError};
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(serde_json::from_str::<u32>("x").unwrap_err().into())
        }

        async fn put(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), StoreError> {
            Err(serde_json::from_str::<u32>("x").unwrap_err().into())
        }
    }

    fn limiter(policy: RateLimitPolicy) -> RateLimiter {
        RateLimiter::new(Some(Arc::new(MemoryStore::new())), policy)
    }

    // 窗口起点之后 1 秒，保证整个测试都落在同一窗口
    const NOW: i64 = 1_760_000_000_000 / 3_600_000 * 3_600_000 + 1_000;

    #[tokio::test]
    async fn every_policy_admits_exactly_max_requests() {
        for policy in [
            RateLimitPolicy::STANDARD,
            RateLimitPolicy::STRICT,
            RateLimitPolicy::BULK,
        ] {
            let limiter = limiter(policy);
            for i in 0..policy.max_requests {
                let decision = limiter.admit_at("10.0.0.1", NOW + i as i64).await;
                assert!(decision.allowed);
                assert_eq!(decision.remaining, policy.max_requests - i - 1);
            }

            let rejected = limiter.admit_at("10.0.0.1", NOW + 500).await;
            assert!(!rejected.allowed);
            assert_eq!(rejected.remaining, 0);
            assert_eq!(rejected.reset_at_ms, NOW - 1_000 + policy.window_ms);
        }
    }

    #[tokio::test]
    async fn clients_have_separate_counters() {
        let limiter = limiter(RateLimitPolicy::new(60_000, 1));
        assert!(limiter.admit_at("a", NOW).await.allowed);
        assert!(!limiter.admit_at("a", NOW).await.allowed);
        assert!(limiter.admit_at("b", NOW).await.allowed);
    }

    #[tokio::test]
    async fn next_window_starts_a_fresh_count() {
        let policy = RateLimitPolicy::new(60_000, 2);
        let limiter = limiter(policy);
        let window_start = NOW - 1_000;

        assert!(limiter.admit_at("a", window_start + 59_000).await.allowed);
        assert!(limiter.admit_at("a", window_start + 59_500).await.allowed);
        assert!(!limiter.admit_at("a", window_start + 59_900).await.allowed);

        // 边界后立即恢复，固定窗口允许短时间内 2 倍请求
        let decision = limiter.admit_at("a", window_start + 60_000).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
    }

    #[tokio::test]
    async fn broken_store_fails_open() {
        let limiter = RateLimiter::new(Some(Arc::new(BrokenStore)), RateLimitPolicy::STRICT);
        for _ in 0..20 {
            let decision = limiter.admit_at("a", NOW).await;
            assert!(decision.allowed);
            assert_eq!(decision.remaining, 9);
        }
    }

    #[tokio::test]
    async fn missing_store_fails_open() {
        let limiter = RateLimiter::new(None, RateLimitPolicy::STANDARD);
        let decision = limiter.admit_at("a", NOW).await;
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 99);
    }

    #[test]
    fn retry_after_rounds_up() {
        let decision = RateLimitDecision {
            allowed: false,
            limit: 10,
            remaining: 0,
            reset_at_ms: 60_000,
            now_ms: 58_500,
        };
        assert_eq!(decision.retry_after_secs(), 2);
    }

    #[test]
    fn client_identity_prefers_proxy_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_identity(&headers), "unknown");

        headers.insert("x-forwarded-for", " 198.51.100.4, 10.0.0.1".parse().unwrap());
        assert_eq!(client_identity(&headers), "198.51.100.4");

        headers.insert("cf-connecting-ip", "203.0.113.9".parse().unwrap());
        assert_eq!(client_identity(&headers), "203.0.113.9");
    }
}
