use heatcal::calendar::layout::period_dates;
use heatcal::model::{CalendarType, HeatmapDay};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use time::Date;

/// Where the displayed days come from
#[derive(Clone, Debug)]
pub(crate) enum DataSource {
    /// Random counts in `0..=100`, drawn once per date so that revisiting a
    /// period shows the same values
    Demo {
        rng: StdRng,
        counts: HashMap<Date, u32>,
    },
    /// Days read from a file
    Loaded(HashMap<Date, HeatmapDay>),
}

impl DataSource {
    pub(crate) fn demo() -> DataSource {
        DataSource::demo_with_rng(StdRng::from_entropy())
    }

    pub(crate) fn demo_with_rng(rng: StdRng) -> DataSource {
        DataSource::Demo {
            rng,
            counts: HashMap::new(),
        }
    }

    /// When a date occurs more than once, the last occurrence wins
    pub(crate) fn loaded(days: Vec<HeatmapDay>) -> DataSource {
        DataSource::Loaded(days.into_iter().map(|d| (d.date, d)).collect())
    }

    /// Returns one day per date of the period, in order.  Dates missing from
    /// loaded data are empty days.
    pub(crate) fn days(&mut self, calendar_type: CalendarType, start: Date) -> Vec<HeatmapDay> {
        let dates = period_dates(calendar_type, start);
        match self {
            DataSource::Demo { rng, counts } => dates
                .into_iter()
                .map(|date| {
                    let count = *counts.entry(date).or_insert_with(|| rng.gen_range(0..=100));
                    HeatmapDay::new(date, f64::from(count))
                })
                .collect(),
            DataSource::Loaded(days) => dates
                .into_iter()
                .map(|date| {
                    days.get(&date)
                        .cloned()
                        .unwrap_or_else(|| HeatmapDay::empty(date))
                })
                .collect(),
        }
    }
}
