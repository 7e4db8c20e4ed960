use crate::axis::{Granularity, build_dense_hourly_axis};
use crate::models::{CountSeries, CountTotals, RoomTimelineResponse, StatisticsResponse, Timeslot};
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::{BTreeMap, BTreeSet};

pub const EAT: &str = "eat";
pub const EXCRETE: &str = "excrete";

const CAMERA_ROOMS: &[(&str, &str)] = &[
    ("C1", "hall"),
    ("C2", "kitchen"),
    ("C3", "garage"),
    ("C4", "garden"),
];

const NO_ROOM: &str = "-";

pub fn room_for_camera(cam: &str) -> Option<&'static str> {
    let cam = cam.trim();
    CAMERA_ROOMS
        .iter()
        .find(|(code, _)| *code == cam)
        .map(|(_, room)| *room)
}

/// Number of times the cat entered `activity`.
///
/// Only slots where the cat was found take part; a run of consecutive found
/// slots with the same activity counts once.
pub fn count_activity_transitions<'a, I>(slots: I, activity: &str) -> u64
where
    I: IntoIterator<Item = &'a Timeslot>,
{
    let mut count = 0;
    let mut previous: Option<String> = None;
    for slot in slots.into_iter().filter(|slot| slot.is_found()) {
        let current = slot
            .activity
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if current == activity && previous.as_deref() != Some(activity) {
            count += 1;
        }
        previous = Some(current);
    }
    count
}

/// Buckets slots by `granularity` and counts eat/excrete transitions per bucket.
///
/// Buckets without any slot are left out, so the result is sparse.
pub fn aggregate_by_period<'a, I>(slots: I, granularity: Granularity) -> StatisticsResponse
where
    I: IntoIterator<Item = &'a Timeslot>,
{
    let mut ordered: Vec<&Timeslot> = slots.into_iter().collect();
    ordered.sort_by_key(|slot| slot.date_slot);

    let mut buckets: BTreeMap<String, Vec<&Timeslot>> = BTreeMap::new();
    for slot in ordered {
        buckets
            .entry(granularity.label(slot.date_slot))
            .or_default()
            .push(slot);
    }

    let mut response = StatisticsResponse {
        labels: Vec::with_capacity(buckets.len()),
        series: CountSeries::default(),
        summary: CountTotals::default(),
    };

    for (label, bucket) in buckets {
        let eat = count_activity_transitions(bucket.iter().copied(), EAT);
        let excrete = count_activity_transitions(bucket.iter().copied(), EXCRETE);
        response.labels.push(label);
        response.series.eat_count.push(eat);
        response.series.excrete_count.push(excrete);
        response.summary.total_eat_count += eat;
        response.summary.total_excrete_count += excrete;
    }

    response
}

pub fn available_years<'a, I>(slots: I) -> Vec<i32>
where
    I: IntoIterator<Item = &'a Timeslot>,
{
    slots
        .into_iter()
        .map(|slot| slot.date_slot.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn latest_day<'a, I>(slots: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = &'a Timeslot>,
{
    slots.into_iter().map(|slot| slot.date_slot.date()).max()
}

/// Room per hour of `day`, from the last found slot with a camera code in that hour.
pub fn room_timeline(slots: &[Timeslot], day: NaiveDate) -> RoomTimelineResponse {
    let mut last_camera: [Option<&str>; 24] = [None; 24];

    let mut ordered: Vec<&Timeslot> = slots
        .iter()
        .filter(|slot| slot.date_slot.date() == day && slot.is_found())
        .collect();
    ordered.sort_by_key(|slot| slot.date_slot);

    for slot in ordered {
        if let Some(cam) = slot.cam.as_deref().map(str::trim).filter(|cam| !cam.is_empty()) {
            last_camera[slot.date_slot.hour() as usize] = Some(cam);
        }
    }

    let rooms = last_camera
        .iter()
        .map(|cam| {
            cam.and_then(room_for_camera)
                .unwrap_or(NO_ROOM)
                .to_string()
        })
        .collect();

    RoomTimelineResponse {
        date: Some(day.format("%Y-%m-%d").to_string()),
        hours: build_dense_hourly_axis(),
        rooms,
    }
}
