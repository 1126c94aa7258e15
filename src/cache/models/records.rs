use serde::{Deserialize, Serialize};

/// 资源列表缓存条目
///
/// 写入时借用切片，读出时为 `Vec`。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedRecords<R> {
    pub records: R,
    pub stored_at: i64, // Unix 秒
}
