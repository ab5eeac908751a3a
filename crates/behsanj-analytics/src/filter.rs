use serde::{Deserialize, Serialize};
use ts_rs::TS;

use behsanj_core::jalali::JalaliDate;
use behsanj_core::models::{Feedback, Source, Status};

/// Dashboard pagination operates over patient groups, not raw records.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "kind")]
#[ts(export)]
pub enum TimeRange {
    /// Same Persian calendar day as "now".
    Today,
    /// Created within the last 7 days.
    Weekly,
    /// Created within the last 30 days.
    Monthly,
    /// Inclusive Persian date range, compared on `y*10000 + m*100 + d` keys.
    Custom { start: JalaliDate, end: JalaliDate },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "kind", content = "username")]
#[ts(export)]
pub enum SourceFilter {
    All,
    Public,
    /// Records entered by one specific staff member.
    Registrar(String),
}

/// The admin dashboard's filter bar. Filters apply in order: time range,
/// source, then free-text search. Draft records are never shown.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardFilter {
    pub time_range: Option<TimeRange>,
    pub source: SourceFilter,
    pub search: String,
}

impl Default for DashboardFilter {
    fn default() -> Self {
        Self {
            time_range: Some(TimeRange::Weekly),
            source: SourceFilter::All,
            search: String::new(),
        }
    }
}

impl DashboardFilter {
    pub fn apply<'a>(&self, records: &'a [Feedback], now: jiff::Timestamp) -> Vec<&'a Feedback> {
        records
            .iter()
            .filter(|r| r.status == Status::Final)
            .filter(|r| self.matches_time(r, now))
            .filter(|r| self.matches_source(r))
            .filter(|r| self.matches_search(r))
            .collect()
    }

    fn matches_time(&self, record: &Feedback, now: jiff::Timestamp) -> bool {
        let Some(range) = self.time_range else {
            return true;
        };
        match range {
            TimeRange::Today => {
                JalaliDate::from_timestamp(record.created_at) == JalaliDate::from_timestamp(now)
            }
            TimeRange::Weekly => record.created_at >= now - days(7),
            TimeRange::Monthly => record.created_at >= now - days(30),
            TimeRange::Custom { start, end } => {
                let key = JalaliDate::from_timestamp(record.created_at).date_key();
                key >= start.date_key() && key <= end.date_key()
            }
        }
    }

    fn matches_source(&self, record: &Feedback) -> bool {
        match &self.source {
            SourceFilter::All => true,
            SourceFilter::Public => record.source == Source::Public,
            SourceFilter::Registrar(username) => {
                record.registrar_username.as_deref() == Some(username.as_str())
            }
        }
    }

    fn matches_search(&self, record: &Feedback) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [
            &record.patient_info.name,
            &record.patient_info.national_id,
            &record.ward,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

fn days(n: i64) -> jiff::SignedDuration {
    jiff::SignedDuration::from_hours(24 * n)
}

/// One patient's records: the first occurrence is the main entry, later
/// records sharing its national id nest under it as repeat visits.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FeedbackGroup<'a> {
    pub main: &'a Feedback,
    pub children: Vec<&'a Feedback>,
}

/// Group filtered records by national id, preserving first-occurrence order.
/// Records without a national id never merge with each other.
pub fn group_by_national_id<'a>(records: &[&'a Feedback]) -> Vec<FeedbackGroup<'a>> {
    let mut groups: Vec<FeedbackGroup<'a>> = Vec::new();
    for record in records {
        let nid = &record.patient_info.national_id;
        let existing = (!nid.is_empty())
            .then(|| {
                groups
                    .iter_mut()
                    .find(|g| &g.main.patient_info.national_id == nid)
            })
            .flatten();
        match existing {
            Some(group) => group.children.push(record),
            None => groups.push(FeedbackGroup { main: record, children: Vec::new() }),
        }
    }
    groups
}

/// The groups shown on a 1-based page; empty past the end.
pub fn paginate<'g, 'a>(groups: &'g [FeedbackGroup<'a>], page: usize) -> &'g [FeedbackGroup<'a>] {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(groups.len());
    if start >= groups.len() {
        return &[];
    }
    &groups[start..end]
}

/// Total page count for a group list.
pub fn page_count(groups: &[FeedbackGroup<'_>]) -> usize {
    groups.len().div_ceil(PAGE_SIZE)
}
