/// 缓存数据模型
/// 定义写入存储的 JSON 结构
pub mod rate_limit;
pub mod records;

pub use rate_limit::CachedRateLimit;
pub use records::CachedRecords;
