//! Week-grid arithmetic for heatmap periods.
//!
//! Weeks run Monday through Sunday.  In the monthly and yearly layouts each
//! grid column is one calendar week and each row one weekday, so the first
//! week of the period is padded with placeholder cells up to its first day and
//! the last week is padded after its last day.
use super::util::{
    end_of_month, end_of_year, iter_days_back_from, iter_days_from, start_of_month,
    start_of_year, WeekdayExt, DAYS_IN_WEEK,
};
use crate::model::{CalendarType, HeatmapDay};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, Duration};

/// Width & height of a cell when the options don't give one
pub const DEFAULT_CELL_SIZE: u16 = 15;

/// Placeholder cells to render before the first day of a period.
///
/// Cell `i` is dated `i` days before `start`; the run is empty when `start` is
/// a Monday and six cells long when it is a Sunday.
pub fn first_week_offset(start: Date) -> Vec<HeatmapDay> {
    let qty = start.weekday().iso_number() - 1;
    iter_days_back_from(start)
        .take(qty)
        .enumerate()
        .map(|(i, date)| HeatmapDay::placeholder(date, i))
        .collect()
}

/// Placeholder cells to render after the last day of a period.
///
/// Cell `i` is dated `i` days after `end`; the run is empty when `end` is a
/// Sunday and six cells long when it is a Monday.
pub fn last_week_offset(end: Date) -> Vec<HeatmapDay> {
    let qty = DAYS_IN_WEEK - end.weekday().iso_number();
    iter_days_from(end)
        .take(qty)
        .enumerate()
        .map(|(i, date)| HeatmapDay::placeholder(date, i))
        .collect()
}

/// Returns the last day of the period of the given type beginning at `start`
pub fn period_end(calendar_type: CalendarType, start: Date) -> Date {
    match calendar_type {
        CalendarType::Weekly => start.checked_add(Duration::days(6)).unwrap_or(Date::MAX),
        CalendarType::Monthly => end_of_month(start),
        CalendarType::Yearly => end_of_year(start),
    }
}

/// Returns every date in the period beginning at `start`, in order
pub fn period_dates(calendar_type: CalendarType, start: Date) -> Vec<Date> {
    let end = period_end(calendar_type, start);
    iter_days_from(start).take_while(|&d| d <= end).collect()
}

/// Returns the start of the period following the one that contains `start`.
///
/// Monthly and yearly periods snap to the first of the month or year.
pub fn next_period_start(calendar_type: CalendarType, start: Date) -> Option<Date> {
    match calendar_type {
        CalendarType::Weekly => start.checked_add(Duration::days(7)),
        CalendarType::Monthly => end_of_month(start).next_day(),
        CalendarType::Yearly => end_of_year(start).next_day(),
    }
}

/// Returns the start of the period preceding the one that contains `start`
pub fn previous_period_start(calendar_type: CalendarType, start: Date) -> Option<Date> {
    match calendar_type {
        CalendarType::Weekly => start.checked_sub(Duration::days(7)),
        CalendarType::Monthly => start_of_month(start).previous_day().map(start_of_month),
        CalendarType::Yearly => start_of_year(start).previous_day().map(start_of_year),
    }
}

/// Snaps `date` to the beginning of the period of the given type containing
/// it.  Weekly periods may start on any day and are left alone.
pub fn period_start(calendar_type: CalendarType, date: Date) -> Date {
    match calendar_type {
        CalendarType::Weekly => date,
        CalendarType::Monthly => start_of_month(date),
        CalendarType::Yearly => start_of_year(date),
    }
}

/// The leading and trailing placeholder runs for a period
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Padding {
    pub leading: Vec<HeatmapDay>,
    pub trailing: Vec<HeatmapDay>,
}

impl Padding {
    /// Weekly periods are always exactly seven contiguous days and are never
    /// padded.
    pub fn for_period(calendar_type: CalendarType, start: Date) -> Padding {
        if !calendar_type.is_week_grid() {
            return Padding::default();
        }
        Padding {
            leading: first_week_offset(start),
            trailing: last_week_offset(period_end(calendar_type, start)),
        }
    }
}

/// Caller-supplied overrides applied on top of every computed cell style
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct DayStyleOverride {
    pub width: Option<u16>,
    pub height: Option<u16>,
    /// Renderer-specific properties, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Where a cell goes in the grid.  `row` and `column` are 1-based.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
    pub width: u16,
    pub height: u16,
    pub extra: BTreeMap<String, String>,
}

/// Computes the grid position of the data cell at `index`, given the number of
/// leading placeholder cells.
///
/// Weekly periods are a single row, one column per day, and ignore
/// `first_offset`.
pub fn grid_position(
    index: usize,
    first_offset: usize,
    calendar_type: CalendarType,
    cell_size: u16,
    style: &DayStyleOverride,
) -> GridPosition {
    let (row, column) = if calendar_type.is_week_grid() {
        let slot = index + first_offset;
        (slot % DAYS_IN_WEEK + 1, slot / DAYS_IN_WEEK + 1)
    } else {
        (1, index + 1)
    };
    GridPosition {
        row,
        column,
        width: style.width.unwrap_or(cell_size),
        height: style.height.unwrap_or(cell_size),
        extra: style.extra.clone(),
    }
}
