//! 日期归一化
//!
//! 表格里的日期是人工录入的，格式五花八门。所有能识别的日期都转为
//! `YYYY-MM-DD`，识别不了的返回空字符串，绝不返回错误的日期。
//!
//! 数字三段式（`.`、`/`、`-` 分隔）一律按日-月-年解析，与数据来源地区的
//! 书写习惯一致。`03/04/2025` 是 4 月 3 日，`12/25/2025` 无法解析。

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").unwrap());
static SLASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").unwrap());
static DASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})-(\d{1,2})-(\d{4})$").unwrap());
static ISO_DATETIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})[T ]").unwrap());
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})$").unwrap());
static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\.?,?\s+(\d{4})$").unwrap()
});
static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?\.?\s+([A-Za-z]+)\.?,?\s+(\d{4})$").unwrap()
});
static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\.?,?\s+(\d{4})$").unwrap());

/// 将任意日期字符串转为 `YYYY-MM-DD`，无法解析时返回空字符串
///
/// 只有年份的输入得到当年 1 月 1 日，调用方如需区分精度，只能检查月日是否为 1。
pub fn normalize_date(raw: &str) -> String {
    parse_date(raw)
        .map(|date| date.format(CANONICAL_FORMAT).to_string())
        .unwrap_or_default()
}

/// 按固定优先级尝试各格式，第一个匹配的格式决定结果
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(c) = CANONICAL.captures(raw) {
        return ymd(&c[1], &c[2], &c[3]);
    }
    if let Some(c) = DOTTED.captures(raw) {
        return ymd(&c[3], &c[2], &c[1]);
    }
    if let Some(c) = SLASHED.captures(raw) {
        return ymd(&c[3], &c[2], &c[1]);
    }
    if let Some(c) = DASHED.captures(raw) {
        return ymd(&c[3], &c[2], &c[1]);
    }
    if let Some(c) = ISO_DATETIME.captures(raw) {
        return ymd(&c[1], &c[2], &c[3]);
    }
    if let Some(c) = YEAR.captures(raw) {
        return ymd(&c[1], "1", "1");
    }
    if let Some(c) = MONTH_DAY_YEAR.captures(raw) {
        return named(&c[3], &c[1], &c[2]);
    }
    if let Some(c) = DAY_MONTH_YEAR.captures(raw) {
        return named(&c[3], &c[2], &c[1]);
    }
    if let Some(c) = MONTH_YEAR.captures(raw) {
        return named(&c[2], &c[1], "1");
    }

    fallback(raw)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn named(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let month = month_number(month)?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

/// 英文和挪威文的月份全称及缩写
fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "january" | "januar" | "jan" => 1,
        "february" | "februar" | "feb" => 2,
        "march" | "mars" | "mar" => 3,
        "april" | "apr" => 4,
        "may" | "mai" => 5,
        "june" | "juni" | "jun" => 6,
        "july" | "juli" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oktober" | "oct" | "okt" => 10,
        "november" | "nov" => 11,
        "december" | "desember" | "dec" | "des" => 12,
        _ => return None,
    };
    Some(month)
}

fn fallback(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    ["%Y/%m/%d", "%Y.%m.%d", "%Y-%m-%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
