/// 缓存操作
/// 在键值存储之上读写限流计数和资源缓存
pub mod rate_limit;
pub mod records;

pub use rate_limit::RateLimitCacheOperations;
pub use records::RecordCacheOperations;
