//! 表格数据源

mod google;

use async_trait::async_trait;

pub use google::GoogleSheetsClient;

use crate::error::AppError;

/// 表格 ID、单元格范围，以及数据前需要跳过的表头行数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    pub spreadsheet_id: String,
    pub range: String,
    pub header_rows: usize,
}

impl SheetRange {
    pub fn new(spreadsheet_id: &str, range: &str, header_rows: usize) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            range: range.to_string(),
            header_rows,
        }
    }
}

/// 上游表格读取接口
///
/// 返回完整的行数据（含表头），每次调用对应一次网络请求，不做重试。
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_rows(
        &self,
        resource: &'static str,
        sheet: &SheetRange,
    ) -> Result<Vec<Vec<String>>, AppError>;
}
