use serde::{Deserialize, Serialize};

use crate::cache::keys::CONFERENCES_CACHE_KEY;
use crate::gateway::SheetRecord;
use crate::utils::{cell, join_descriptions, normalize_date, normalize_url};

const CONFERENCE_TYPE: &str = "Conference";

/// 安全会议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    pub name: String,
    pub date: String,
    pub location: String,
    pub website: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 会议表的列位置
///
/// 列顺序：名称、链接、通常举办时间、开始日期、天数、国家。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceColumns {
    pub name: usize,
    pub website: usize,
    pub usual_time: usize,
    pub date: usize,
    pub days: usize,
    pub location: usize,
}

impl Default for ConferenceColumns {
    fn default() -> Self {
        Self {
            name: 0,
            website: 1,
            usual_time: 2,
            date: 3,
            days: 4,
            location: 5,
        }
    }
}

impl SheetRecord for Conference {
    type Columns = ConferenceColumns;

    const RESOURCE: &'static str = "conference";
    const CACHE_KEY: &'static str = CONFERENCES_CACHE_KEY;

    fn sanitize(row: &[String], columns: &ConferenceColumns) -> Option<Self> {
        let name = cell(row, columns.name);
        if name.is_empty() {
            return None;
        }

        let days = cell(row, columns.days);
        let days = if days.is_empty() {
            String::new()
        } else {
            format!("{} days", days)
        };

        Some(Conference {
            name: name.to_string(),
            date: normalize_date(cell(row, columns.date)),
            location: cell(row, columns.location).to_string(),
            website: normalize_url(cell(row, columns.website)),
            description: join_descriptions([days.as_str(), cell(row, columns.usual_time)]),
            kind: CONFERENCE_TYPE.to_string(),
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
    fn maps_a_full_row() {
        let r = row(&["Paranoia", "paranoia.watchcom.no", "May", "22.05.2025", "2", "Norway"]);
        let conference = Conference::sanitize(&r, &ConferenceColumns::default()).unwrap();
        assert_eq!(
            conference,
            Conference {
                name: "Paranoia".into(),
                date: "2025-05-22".into(),
                location: "Norway".into(),
                website: "https://paranoia.watchcom.no/".into(),
                description: "2 days | May".into(),
                kind: "Conference".into(),
            }
        );
    }

    #[test]
    fn description_uses_whatever_is_present() {
        let columns = ConferenceColumns::default();
        let only_time = Conference::sanitize(&row(&["Sikkerhetsfestivalen", "", "August"]), &columns).unwrap();
        assert_eq!(only_time.description, "August");

        let only_days = Conference::sanitize(&row(&["RomHack", "", "", "", "3"]), &columns).unwrap();
        assert_eq!(only_days.description, "3 days");

        let neither = Conference::sanitize(&row(&["BSides Oslo"]), &columns).unwrap();
        assert_eq!(neither.description, "");
        assert_eq!(neither.kind, "Conference");
    }

    #[test]
    fn blank_name_is_dropped() {
        let r = row(&["   ", "https://example.com", "", "2025"]);
        assert!(Conference::sanitize(&r, &ConferenceColumns::default()).is_none());
    }
}
