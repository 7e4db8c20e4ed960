use crate::models::BucketLabel;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const SLOT_SECONDS: u32 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
    Slot,
}

impl Granularity {
    pub fn label(self, at: NaiveDateTime) -> BucketLabel {
        match self {
            Granularity::Daily => date_label(at.date()),
            Granularity::Monthly => month_label(at.year(), at.month()),
            Granularity::Yearly => year_label(at.year()),
            Granularity::Slot => slot_label(at.time()),
        }
    }
}

pub fn date_label(date: NaiveDate) -> BucketLabel {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(label.trim(), DATE_FORMAT).ok()
}

fn month_label(year: i32, month: u32) -> BucketLabel {
    format!("{year:04}-{month:02}")
}

fn year_label(year: i32) -> BucketLabel {
    format!("{year:04}")
}

fn slot_label(time: NaiveTime) -> BucketLabel {
    let second = time.second() - time.second() % SLOT_SECONDS;
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), second)
}

/// Every calendar day of `year`-`month`. Empty for a month outside 1..=12.
pub fn build_dense_daily_axis(year: i32, month: u32) -> Vec<BucketLabel> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| day.month() == month)
        .map(date_label)
        .collect()
}

/// Every calendar day from `start` to `end` inclusive.
///
/// Unparsable bounds or `start > end` produce an empty axis; rejecting an
/// inverted range is left to the caller.
pub fn build_dense_range_axis(start: &str, end: &str) -> Vec<BucketLabel> {
    let (Some(start), Some(end)) = (parse_date_label(start), parse_date_label(end)) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(date_label)
        .collect()
}

pub fn build_dense_monthly_axis(year: i32) -> Vec<BucketLabel> {
    (1..=12).map(|month| month_label(year, month)).collect()
}

pub fn build_dense_yearly_axis(start_year: i32, end_year: i32) -> Vec<BucketLabel> {
    let (low, high) = if start_year <= end_year {
        (start_year, end_year)
    } else {
        (end_year, start_year)
    };
    (low..=high).map(year_label).collect()
}

pub fn build_dense_hourly_axis() -> Vec<BucketLabel> {
    (0..24).map(|hour| format!("{hour:02}:00")).collect()
}

/// 10-second slot labels from the slot holding `start` to the slot holding `end`.
pub fn build_dense_slot_axis(start: NaiveTime, end: NaiveTime) -> Vec<BucketLabel> {
    let first = truncate_to_slot(start);
    let last = truncate_to_slot(end);
    if first > last {
        return Vec::new();
    }

    let step = Duration::seconds(i64::from(SLOT_SECONDS));
    let count = (last - first).num_seconds() / i64::from(SLOT_SECONDS) + 1;
    (0..count)
        .map(|i| slot_label(first + step * i as i32))
        .collect()
}

fn truncate_to_slot(time: NaiveTime) -> NaiveTime {
    let seconds = time.num_seconds_from_midnight();
    NaiveTime::from_num_seconds_from_midnight_opt(seconds - seconds % SLOT_SECONDS, 0)
        .unwrap_or(time)
}
