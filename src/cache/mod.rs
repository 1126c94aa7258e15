// 缓存模块
// 包含存储后端、缓存键、缓存数据结构和读写操作

pub mod keys;
pub mod models;
pub mod operations;
pub mod store;

pub use store::{KeyValueStore, MemoryStore, RedisStore, StoreError};
