use chrono::{DateTime, Utc};

use crate::models::Deadline;

/// Urgency category of a deadline, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeScale {
    Finished,
    Day,
    ThreeDays,
    Week,
    Month,
    Year,
    LongerThanYear,
}

pub const DAY_MS: i64 = 86_400_000;
pub const THREE_DAYS_MS: i64 = 259_200_000;
pub const WEEK_MS: i64 = 604_800_000;
/// Average Gregorian month.
pub const MONTH_MS: i64 = 2_629_746_000;
/// Average Gregorian year.
pub const YEAR_MS: i64 = 31_556_952_000;

/// Upper bounds checked in order by [`calculate_time_scale`].
///
/// `Day` is absent, so nothing is ever classified as `Day`; a deadline due
/// tomorrow lands in `ThreeDays`.
const LADDER: [(TimeScale, i64); 4] = [
    (TimeScale::ThreeDays, THREE_DAYS_MS),
    (TimeScale::Week, WEEK_MS),
    (TimeScale::Month, MONTH_MS),
    (TimeScale::Year, YEAR_MS),
];

impl TimeScale {
    /// Every category in display order.
    pub const ALL: [TimeScale; 7] = [
        TimeScale::Finished,
        TimeScale::Day,
        TimeScale::ThreeDays,
        TimeScale::Week,
        TimeScale::Month,
        TimeScale::Year,
        TimeScale::LongerThanYear,
    ];

    /// Heading shown above the group of deadlines in this category.
    pub fn label(self) -> &'static str {
        match self {
            TimeScale::Finished => "Finished deadlines",
            TimeScale::Day => "Day until completion",
            TimeScale::ThreeDays => "3 days until completion",
            TimeScale::Week => "Week until completion",
            TimeScale::Month => "Month until completion",
            TimeScale::Year => "Year until completion",
            TimeScale::LongerThanYear => "More than one year to completion",
        }
    }

    /// Classifies `end_date` against the current clock.
    pub fn of(end_date: DateTime<Utc>) -> TimeScale {
        calculate_time_scale(end_date, Utc::now())
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Maps a due moment to its urgency category relative to `now`.
///
/// Anything due at or before `now` is `Finished`. Otherwise the first
/// threshold strictly greater than the remaining time wins, so a remaining
/// time exactly equal to a threshold falls into the next wider category.
pub fn calculate_time_scale(end_date: DateTime<Utc>, now: DateTime<Utc>) -> TimeScale {
    let remaining = (end_date - now).num_milliseconds();
    if remaining <= 0 {
        return TimeScale::Finished;
    }
    LADDER
        .iter()
        .find(|(_, threshold)| remaining < *threshold)
        .map(|(scale, _)| *scale)
        .unwrap_or(TimeScale::LongerThanYear)
}

/// Deadlines partitioned by [`TimeScale`]. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeScaleMapping<'a> {
    buckets: [Vec<&'a Deadline>; 7],
}

impl<'a> TimeScaleMapping<'a> {
    fn empty() -> Self {
        TimeScaleMapping {
            buckets: Default::default(),
        }
    }

    /// Deadlines in `scale`, in the order they had in the input.
    pub fn get(&self, scale: TimeScale) -> &[&'a Deadline] {
        &self.buckets[scale.index()]
    }

    /// Buckets in [`TimeScale::ALL`] order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (TimeScale, &[&'a Deadline])> + '_ {
        TimeScale::ALL
            .into_iter()
            .map(move |scale| (scale, self.get(scale)))
    }

    /// Total number of deadlines across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups `deadlines` by urgency relative to `now`, keeping input order
/// inside each group.
pub fn generate_time_scale_mapping(deadlines: &[Deadline], now: DateTime<Utc>) -> TimeScaleMapping<'_> {
    let mut mapping = TimeScaleMapping::empty();
    for deadline in deadlines {
        let scale = calculate_time_scale(deadline.end_date, now);
        mapping.buckets[scale.index()].push(deadline);
    }
    mapping
}
