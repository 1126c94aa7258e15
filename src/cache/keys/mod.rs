// 缓存键模块
// 每类资源只有一个固定缓存键，限流键按客户端和窗口划分

/// 泄露事件数据缓存键
pub const BREACHES_CACHE_KEY: &str = "breaches_data";

/// 会议数据缓存键
pub const CONFERENCES_CACHE_KEY: &str = "conferences_data";

/// 限流键前缀
const RATE_LIMIT_PREFIX: &str = "rate_limit:";

/// 生成限流窗口键
pub fn rate_limit_key(client: &str, window_start_ms: i64) -> String {
    format!("{}{}:{}", RATE_LIMIT_PREFIX, client, window_start_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_key_includes_window() {
        assert_eq!(
            rate_limit_key("203.0.113.7", 1_760_000_040_000),
            "rate_limit:203.0.113.7:1760000040000"
        );
    }
}
