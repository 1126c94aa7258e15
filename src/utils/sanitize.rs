//! 表格行清洗工具

use url::{ParseError, Url};

/// 多列描述拼接时使用的分隔符
pub const DESCRIPTION_SEPARATOR: &str = " | ";

/// 取指定列并去掉首尾空白，缺失的列视为空字符串
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|v| v.trim()).unwrap_or("")
}

/// 可选列，未配置时为空字符串
pub fn optional_cell(row: &[String], index: Option<usize>) -> &str {
    index.map_or("", |i| cell(row, i))
}

/// 规范化链接
///
/// 没有协议的地址补 `https://`；非 http(s) 协议的地址原样保留；无法构造合法 URL 时保留原始文本，
/// 有一个格式不对的来源总比没有强。
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => return url.to_string(),
        // 没有协议的相对地址才补 https://，其他协议或解析失败都保留原文
        Err(ParseError::RelativeUrlWithoutBase) => {
            if let Ok(url) = Url::parse(&format!("https://{}", raw)) {
                if url.host_str().is_some_and(|host| host.contains('.') || host == "localhost") {
                    return url.to_string();
                }
            }
        }
        _ => {}
    }

    raw.to_string()
}

/// 按列顺序拼接非空描述
pub fn join_descriptions<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(DESCRIPTION_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn cells_are_trimmed_and_missing_is_empty() {
        let r = row(&["  Telenor ", "", "x"]);
        assert_eq!(cell(&r, 0), "Telenor");
        assert_eq!(cell(&r, 1), "");
        assert_eq!(cell(&r, 9), "");
        assert_eq!(optional_cell(&r, None), "");
        assert_eq!(optional_cell(&r, Some(2)), "x");
    }

    #[test]
    fn urls_get_a_default_scheme() {
        assert_eq!(normalize_url("www.nrk.no/nyheter"), "https://www.nrk.no/nyheter");
        assert_eq!(normalize_url("https://vg.no"), "https://vg.no/");
        assert_eq!(normalize_url(" http://example.com/a?b=1 "), "http://example.com/a?b=1");
        assert_eq!(normalize_url("nsm.no"), "https://nsm.no/");
        assert_eq!(normalize_url(""), "");
    }

    #[test]
    fn malformed_urls_keep_the_raw_text() {
        assert_eq!(normalize_url("Source: NRK"), "Source: NRK");
        assert_eq!(normalize_url("see press release"), "see press release");
        assert_eq!(normalize_url("http://"), "http://");
        assert_eq!(normalize_url("mailto:security@nsm.no"), "mailto:security@nsm.no");
        assert_eq!(normalize_url("ftp://files.example.com/x"), "ftp://files.example.com/x");
        assert_eq!(normalize_url("localhost:8080"), "localhost:8080");
    }

    #[test]
    fn descriptions_join_non_empty_parts_in_order() {
        assert_eq!(join_descriptions(["3 days", "", " June "]), "3 days | June");
        assert_eq!(join_descriptions(["", "June"]), "June");
        assert_eq!(join_descriptions(["", " "]), "");
    }
}
