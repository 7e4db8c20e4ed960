use crate::aggregate::available_years;
use crate::query::YearBounds;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type BucketLabel = String;

pub type AlignedSeries = Vec<Option<f64>>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStat {
    pub total: f64,
    pub count_of_non_empty_buckets: usize,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeslot {
    pub date_slot: NaiveDateTime,
    pub status: String,
    #[serde(default)]
    pub cam: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
}

impl Timeslot {
    pub fn is_found(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("F")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub cats: BTreeMap<String, Vec<Timeslot>>,
}

impl AppData {
    pub fn all_slots(&self) -> impl Iterator<Item = &Timeslot> {
        self.cats.values().flatten()
    }

    pub fn slots_for(&self, cat: &str) -> &[Timeslot] {
        self.cats.get(cat).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn years(&self) -> Vec<i32> {
        available_years(self.all_slots())
    }

    pub fn year_bounds(&self) -> Option<YearBounds> {
        YearBounds::from_years(&self.years())
    }
}

#[derive(Debug, Deserialize)]
pub struct TimeslotUpload {
    pub cat: String,
    pub slots: Vec<Timeslot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeslotUploadResponse {
    pub cat: String,
    pub stored: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountSeries {
    pub eat_count: Vec<u64>,
    pub excrete_count: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTotals {
    pub total_eat_count: u64,
    pub total_excrete_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub labels: Vec<BucketLabel>,
    pub series: CountSeries,
    pub summary: CountTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedCounts {
    pub eat_count: AlignedSeries,
    pub excrete_count: AlignedSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedSummary {
    pub eat_count: SummaryStat,
    pub excrete_count: SummaryStat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryText {
    pub eat: String,
    pub excrete: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedStatisticsResponse {
    pub period: String,
    pub unit: String,
    pub labels: Vec<BucketLabel>,
    pub series: AlignedCounts,
    pub summary: AlignedSummary,
    pub text: SummaryText,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTimelineResponse {
    pub date: Option<String>,
    pub hours: Vec<BucketLabel>,
    pub rooms: Vec<String>,
}
