use std::iter::successors;
use time::{Date, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) const WEEKDAYS: [Weekday; DAYS_IN_WEEK] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

pub(crate) const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub(crate) trait WeekdayExt {
    /// Monday = 1 … Sunday = 7
    fn iso_number(&self) -> usize;
}

impl WeekdayExt for Weekday {
    fn iso_number(&self) -> usize {
        self.number_from_monday().into()
    }
}

pub(crate) trait MonthExt {
    fn index0(&self) -> usize;
}

impl MonthExt for Month {
    fn index0(&self) -> usize {
        usize::from(u8::from(*self)) - 1
    }
}

/// Yields `date` itself followed by the days after it.  Stops at the end of
/// time.
pub(crate) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

/// Yields `date` itself followed by the days before it.  Stops at the
/// beginning of time.
pub(crate) fn iter_days_back_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day())
}

pub(crate) fn start_of_year(date: Date) -> Date {
    Date::from_ordinal_date(date.year(), 1).unwrap_or(date)
}

pub(crate) fn end_of_year(date: Date) -> Date {
    Date::from_calendar_date(date.year(), Month::December, 31).unwrap_or(date)
}

pub(crate) fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub(crate) fn end_of_month(date: Date) -> Date {
    if date.month() == Month::December {
        return end_of_year(date);
    }
    Date::from_calendar_date(date.year(), date.month().next(), 1)
        .ok()
        .and_then(Date::previous_day)
        .unwrap_or(date)
}
