use crate::axis::{
    Granularity, build_dense_daily_axis, build_dense_monthly_axis, build_dense_range_axis,
    build_dense_yearly_axis, date_label, parse_date_label,
};
use crate::errors::AppError;
use crate::models::BucketLabel;
use chrono::{Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::str::FromStr;

pub const MAX_YEAR_SPAN: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Daily,
    Monthly,
    Yearly,
    Range,
}

impl Period {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(Period::Daily);
        };
        match raw.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            "range" => Ok(Period::Range),
            other => Err(AppError::bad_request(format!(
                "period must be daily, monthly, yearly or range (got '{other}')"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
            Period::Range => "range",
        }
    }

    pub fn granularity(self) -> Granularity {
        match self {
            Period::Daily | Period::Range => Granularity::Daily,
            Period::Monthly => Granularity::Monthly,
            Period::Yearly => Granularity::Yearly,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Period::Monthly => "month",
            Period::Yearly => "year",
            Period::Daily | Period::Range => "day",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub cat: Option<String>,
    pub period: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// `dd/mm/yyyy - dd/mm/yyyy`, used when the ISO bounds are absent.
    pub range: Option<String>,
}

impl StatsQuery {
    pub fn cat(&self) -> Result<&str, AppError> {
        present(&self.cat).ok_or_else(|| AppError::bad_request("missing cat"))
    }

    pub fn period(&self) -> Result<Period, AppError> {
        Period::parse(self.period.as_deref())
    }
}

/// Years covered by the stored data, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    pub fn from_years(years: &[i32]) -> Option<Self> {
        Some(Self {
            min: *years.iter().min()?,
            max: *years.iter().max()?,
        })
    }
}

/// A resolved statistics request: the slot window to read and the axis to chart on.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub period: Period,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub axis: Vec<BucketLabel>,
}

impl Window {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

/// Resolves `query` into a window.
///
/// `Ok(None)` means there is nothing to show: no year was given and no data
/// exists to default from.
pub fn resolve_window(query: &StatsQuery, bounds: Option<YearBounds>) -> Result<Option<Window>, AppError> {
    let period = query.period()?;
    match period {
        Period::Daily => {
            let Some(year) = year_or_latest(&query.year, bounds)? else {
                return Ok(None);
            };
            let month = parse_number::<u32>("month", &query.month)?.unwrap_or(1);
            if !(1..=12).contains(&month) {
                return Err(AppError::bad_request("month must be between 1 and 12"));
            }
            let first = first_of(year, month)?;
            let next = first
                .checked_add_months(Months::new(1))
                .ok_or_else(|| AppError::bad_request("year out of range"))?;
            Ok(Some(Window {
                period,
                start: midnight(first),
                end: midnight(next),
                axis: build_dense_daily_axis(year, month),
            }))
        }
        Period::Monthly => {
            let Some(year) = year_or_latest(&query.year, bounds)? else {
                return Ok(None);
            };
            let first = first_of(year, 1)?;
            let next = year
                .checked_add(1)
                .ok_or_else(|| AppError::bad_request("year out of range"))
                .and_then(|next| first_of(next, 1))?;
            Ok(Some(Window {
                period,
                start: midnight(first),
                end: midnight(next),
                axis: build_dense_monthly_axis(year),
            }))
        }
        Period::Yearly => {
            let end_year = match parse_number::<i32>("end_year", &query.end_year)? {
                Some(year) => Some(year),
                None => year_or_latest(&query.year, bounds)?,
            };
            let start_year = parse_number::<i32>("start_year", &query.start_year)?
                .or(bounds.map(|b| b.min));
            let (Some(start_year), Some(end_year)) = (start_year, end_year) else {
                return Ok(None);
            };
            let (low, high) = (start_year.min(end_year), start_year.max(end_year));
            if i64::from(high) - i64::from(low) >= MAX_YEAR_SPAN {
                return Err(AppError::bad_request(format!(
                    "yearly statistics cover at most {MAX_YEAR_SPAN} years"
                )));
            }
            let next = high
                .checked_add(1)
                .ok_or_else(|| AppError::bad_request("year out of range"))?;
            Ok(Some(Window {
                period,
                start: midnight(first_of(low, 1)?),
                end: midnight(first_of(next, 1)?),
                axis: build_dense_yearly_axis(start_year, end_year),
            }))
        }
        Period::Range => {
            let (start, end) = range_bounds(query)?;
            if start > end {
                return Err(AppError::bad_request("start_date must not be after end_date"));
            }
            let next = end
                .succ_opt()
                .ok_or_else(|| AppError::bad_request("end_date out of range"))?;
            Ok(Some(Window {
                period,
                start: midnight(start),
                end: midnight(next),
                axis: build_dense_range_axis(&date_label(start), &date_label(end)),
            }))
        }
    }
}

fn range_bounds(query: &StatsQuery) -> Result<(NaiveDate, NaiveDate), AppError> {
    if let (Some(start), Some(end)) = (present(&query.start_date), present(&query.end_date)) {
        let start = parse_date_label(start)
            .ok_or_else(|| AppError::bad_request("start_date must be YYYY-MM-DD"))?;
        let end = parse_date_label(end)
            .ok_or_else(|| AppError::bad_request("end_date must be YYYY-MM-DD"))?;
        return Ok((start, end));
    }

    if let Some(raw) = present(&query.range) {
        let (start, end) = parse_range_input(raw)
            .ok_or_else(|| AppError::bad_request("range must be dd/mm/yyyy - dd/mm/yyyy"))?;
        let start = parse_date_label(&start).ok_or_else(|| AppError::bad_request("invalid range start"))?;
        let end = parse_date_label(&end).ok_or_else(|| AppError::bad_request("invalid range end"))?;
        return Ok((start, end));
    }

    Err(AppError::bad_request("start_date and end_date are required for range"))
}

/// Parses `dd/mm/yyyy - dd/mm/yyyy` into ISO `YYYY-MM-DD` bounds.
pub fn parse_range_input(raw: &str) -> Option<(String, String)> {
    let (start, end) = raw.trim().split_once('-')?;
    let start = parse_dmy(start.trim())?;
    let end = parse_dmy(end.trim())?;
    Some((date_label(start), date_label(end)))
}

fn parse_dmy(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('/');
    let day = parts.next()?.trim();
    let month = parts.next()?.trim();
    let year = parts.next()?.trim();
    if parts.next().is_some()
        || !(1..=2).contains(&day.len())
        || !(1..=2).contains(&month.len())
        || year.len() != 4
    {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn year_or_latest(raw: &Option<String>, bounds: Option<YearBounds>) -> Result<Option<i32>, AppError> {
    Ok(parse_number::<i32>("year", raw)?.or(bounds.map(|b| b.max)))
}

fn parse_number<T: FromStr>(field: &str, raw: &Option<String>) -> Result<Option<T>, AppError> {
    present(raw)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| AppError::bad_request(format!("{field} must be a number")))
        })
        .transpose()
}

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn first_of(year: i32, month: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| AppError::bad_request("year out of range"))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
