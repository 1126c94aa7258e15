//! 带缓存的表格网关
//!
//! 查缓存，未命中时读上游表格，清洗、排序后写回缓存。每类资源只有一个固定的
//! 缓存键，整张表一次性读取和缓存。

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};

use crate::cache::{KeyValueStore, operations::RecordCacheOperations};
use crate::config::SheetResource;
use crate::error::AppError;
use crate::sheets::SheetSource;

/// 可以从表格行构造的记录类型
pub trait SheetRecord: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 列位置映射
    type Columns: Send + Sync;

    /// 资源名称，用于日志和错误信息
    const RESOURCE: &'static str;
    const CACHE_KEY: &'static str;

    /// 清洗一行数据，主字段为空的行返回 `None`
    fn sanitize(row: &[String], columns: &Self::Columns) -> Option<Self>;

    /// 已归一化的日期，未知时为空字符串
    fn date(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug)]
pub struct Fetched<T> {
    pub records: Vec<T>,
    pub cache: CacheStatus,
}

/// 缓存有效期，空结果使用较短的有效期
#[derive(Debug, Clone, Copy)]
pub struct CacheTtl {
    pub populated: Duration,
    pub empty: Duration,
}

impl CacheTtl {
    fn for_len(&self, len: usize) -> Duration {
        if len == 0 { self.empty } else { self.populated }
    }
}

pub struct CachedGateway {
    store: Option<Arc<dyn KeyValueStore>>,
    source: Arc<dyn SheetSource>,
    ttl: CacheTtl,
}

impl CachedGateway {
    pub fn new(
        store: Option<Arc<dyn KeyValueStore>>,
        source: Arc<dyn SheetSource>,
        ttl: CacheTtl,
    ) -> Self {
        Self { store, source, ttl }
    }

    pub async fn fetch<R: SheetRecord>(
        &self,
        resource: &SheetResource<R::Columns>,
    ) -> Result<Fetched<R>, AppError> {
        if let Some(records) = self.read_cache::<R>().await {
            return Ok(Fetched {
                records,
                cache: CacheStatus::Hit,
            });
        }

        let rows = self.source.fetch_rows(R::RESOURCE, &resource.sheet).await?;
        let records = sanitize_rows::<R>(&rows, resource.sheet.header_rows, &resource.columns);

        self.write_cache(&records).await;

        Ok(Fetched {
            records,
            cache: CacheStatus::Miss,
        })
    }

    async fn read_cache<R: SheetRecord>(&self) -> Option<Vec<R>> {
        let store = self.store.as_deref()?;
        match RecordCacheOperations::get_records::<R>(store, R::CACHE_KEY).await {
            Ok(cached) => cached.map(|c| c.records),
            Err(e) => {
                // 按未命中处理
                tracing::warn!("Cache read for {} failed: {}", R::CACHE_KEY, e);
                None
            }
        }
    }

    async fn write_cache<R: SheetRecord>(&self, records: &[R]) {
        let Some(store) = self.store.as_deref() else {
            return;
        };
        let ttl = self.ttl.for_len(records.len());
        if let Err(e) = RecordCacheOperations::set_records(store, R::CACHE_KEY, records, ttl).await
        {
            tracing::warn!("Cache write for {} failed: {}", R::CACHE_KEY, e);
        }
    }
}

/// 跳过表头，清洗每一行并按日期排序
pub fn sanitize_rows<R: SheetRecord>(
    rows: &[Vec<String>],
    header_rows: usize,
    columns: &R::Columns,
) -> Vec<R> {
    let data = rows.get(header_rows..).unwrap_or_default();
    let mut records: Vec<R> = data
        .iter()
        .filter_map(|row| R::sanitize(row, columns))
        .collect();

    let dropped = data.len() - records.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} {} rows without a name", dropped, R::RESOURCE);
    }

    sort_by_date_desc(&mut records);
    records
}

/// 最新的在前，日期未知的排在最后并保持原有顺序
pub fn sort_by_date_desc<R: SheetRecord>(records: &mut [R]) {
    records.sort_by(|a, b| match (a.date().is_empty(), b.date().is_empty()) {
        (false, false) => b.date().cmp(a.date()),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    });
}
