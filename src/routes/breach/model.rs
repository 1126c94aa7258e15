use serde::{Deserialize, Serialize};

use crate::cache::keys::BREACHES_CACHE_KEY;
use crate::gateway::SheetRecord;
use crate::utils::{cell, join_descriptions, normalize_date, normalize_url, optional_cell};

/// 数据泄露事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breach {
    pub organization: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    pub description: String,
    pub source: String,
}

/// 泄露事件表的列位置
///
/// 表格前两行是表头。A 列公司名，C 列事件类型，E 列日期（多数只有年份），J 列来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreachColumns {
    pub organization: usize,
    pub kind: usize,
    pub date: usize,
    pub source: usize,
    pub impact: Option<usize>,
    pub description: Vec<usize>,
}

impl Default for BreachColumns {
    fn default() -> Self {
        Self {
            organization: 0,
            kind: 2,
            date: 4,
            source: 9,
            impact: None,
            description: Vec::new(),
        }
    }
}

impl SheetRecord for Breach {
    type Columns = BreachColumns;

    const RESOURCE: &'static str = "breach";
    const CACHE_KEY: &'static str = BREACHES_CACHE_KEY;

    fn sanitize(row: &[String], columns: &BreachColumns) -> Option<Self> {
        let organization = cell(row, columns.organization);
        if organization.is_empty() {
            return None;
        }

        let impact = optional_cell(row, columns.impact);

        Some(Breach {
            organization: organization.to_string(),
            date: normalize_date(cell(row, columns.date)),
            kind: cell(row, columns.kind).to_string(),
            impact: (!impact.is_empty()).then(|| impact.to_string()),
            description: join_descriptions(columns.description.iter().map(|&i| cell(row, i))),
            source: normalize_url(cell(row, columns.source)),
        })
    }

    fn date(&self) -> &str {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn maps_the_default_columns() {
        let r = row(&[
            " Helse Sør-Øst ",
            "",
            "Ransomware",
            "",
            "2023",
            "",
            "",
            "",
            "",
            "www.nrk.no/artikkel",
        ]);
        let breach = Breach::sanitize(&r, &BreachColumns::default()).unwrap();
        assert_eq!(
            breach,
            Breach {
                organization: "Helse Sør-Øst".into(),
                date: "2023-01-01".into(),
                kind: "Ransomware".into(),
                impact: None,
                description: String::new(),
                source: "https://www.nrk.no/artikkel".into(),
            }
        );
    }

    #[test]
    fn short_rows_and_blank_names() {
        let columns = BreachColumns::default();
        assert!(Breach::sanitize(&row(&["", "", "Phishing"]), &columns).is_none());
        assert!(Breach::sanitize(&[], &columns).is_none());

        let breach = Breach::sanitize(&row(&["Telenor"]), &columns).unwrap();
        assert_eq!(breach.date, "");
        assert_eq!(breach.source, "");
    }

    #[test]
    fn optional_impact_and_description_columns() {
        let columns = BreachColumns {
            impact: Some(1),
            description: vec![3, 5],
            ..BreachColumns::default()
        };
        let r = row(&["Telenor", "40 000 kunder", "Lekkasje", "Feilkonfigurert API", "", "", "", "", "", ""]);
        let breach = Breach::sanitize(&r, &columns).unwrap();
        assert_eq!(breach.impact.as_deref(), Some("40 000 kunder"));
        assert_eq!(breach.description, "Feilkonfigurert API");

        let json = serde_json::to_value(&breach).unwrap();
        assert_eq!(json["type"], "Lekkasje");
        assert_eq!(json["impact"], "40 000 kunder");
    }

    #[test]
    fn absent_impact_is_omitted_from_json() {
        let breach = Breach::sanitize(&row(&["Telenor"]), &BreachColumns::default()).unwrap();
        let json = serde_json::to_value(&breach).unwrap();
        assert!(json.get("impact").is_none());
        assert_eq!(json["description"], "");
    }
}
