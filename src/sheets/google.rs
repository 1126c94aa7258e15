use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{SheetRange, SheetSource};
use crate::error::AppError;

/// Google Sheets `values.get` 响应
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct GoogleSheetsClient {
    http: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl GoogleSheetsClient {
    pub fn new(http: reqwest::Client, api_base: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn values_url(&self, sheet: &SheetRange) -> String {
        format!(
            "{}/{}/values/{}",
            self.api_base,
            urlencoding::encode(&sheet.spreadsheet_id),
            urlencoding::encode(&sheet.range)
        )
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    async fn fetch_rows(
        &self,
        resource: &'static str,
        sheet: &SheetRange,
    ) -> Result<Vec<Vec<String>>, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::Configuration("Google Sheets API key not configured"))?;

        let upstream = |details: String| AppError::Upstream { resource, details };

        tracing::debug!(
            "Fetching {} rows from sheet {} range {}",
            resource,
            sheet.spreadsheet_id,
            sheet.range
        );

        let response = self
            .http
            .get(self.values_url(sheet))
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(|e| upstream(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Sheets API error for {}: {} - {}", resource, status, body);
            return Err(upstream(format!(
                "Google Sheets API error: {} {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                body
            )));
        }

        let data: ValueRange = response
            .json()
            .await
            .map_err(|e| upstream(format!("invalid response body: {}", e.without_url())))?;

        Ok(data
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

/// 默认渲染方式下单元格都是字符串，其他类型转为文本
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
