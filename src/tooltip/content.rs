use crate::calendar::util::MonthExt;
use crate::model::{HeatmapColor, HeatmapDay};
use crate::options::{CalendarOptions, DayFormatter, LevelFormatter};
use std::fmt;
use time::format_description::OwnedFormatItem;
use time::Date;
use tracing::debug;

/// Snapshot of the settings that determine tooltip text
#[derive(Clone)]
pub struct TooltipContent {
    display: bool,
    unit: String,
    on: String,
    no_data: String,
    min_label: String,
    max_label: String,
    date_format: Option<OwnedFormatItem>,
    months: Vec<String>,
    day_formatter: Option<DayFormatter>,
    level_formatter: Option<LevelFormatter>,
}

impl TooltipContent {
    /// `months` are the (possibly overridden) month labels, January first,
    /// used by the default date format.
    pub fn new(options: &CalendarOptions, months: Vec<String>) -> TooltipContent {
        TooltipContent {
            display: options.tooltip.display,
            unit: options.tooltip.unit.clone(),
            on: options.i18n.on.clone(),
            no_data: options.i18n.no_data.clone(),
            min_label: options.i18n.min.clone(),
            max_label: options.i18n.max.clone(),
            date_format: options.tooltip.date_format.clone(),
            months,
            day_formatter: options.tooltip.formatter.clone(),
            level_formatter: options.legend.formatter.clone(),
        }
    }

    pub fn display(&self) -> bool {
        self.display
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Tooltip text for a day cell, or `None` if it gets no tooltip
    pub fn for_day(&self, day: &HeatmapDay) -> Option<String> {
        if !self.display {
            return None;
        }
        if let Some(count) = day.count {
            if let Some(formatter) = &self.day_formatter {
                return Some(formatter(day, &self.unit));
            }
            Some(format!(
                "{count} {} {} {}",
                self.unit,
                self.on,
                self.format_date(day.date)
            ))
        } else if !self.no_data.is_empty() {
            Some(format!(
                "{} {} {} {}",
                self.no_data,
                self.unit,
                self.on,
                self.format_date(day.date)
            ))
        } else {
            None
        }
    }

    /// Tooltip text for a legend level
    pub fn for_level(&self, color: &HeatmapColor) -> Option<String> {
        if !self.display {
            return None;
        }
        if let Some(formatter) = &self.level_formatter {
            return Some(formatter(color));
        }
        match (color.min, color.max) {
            (Some(min), Some(max)) if min.total_cmp(&max).is_eq() => {
                Some(format!("{}: {min} {}", self.min_label, self.unit))
            }
            (min, max) => Some(format!(
                "{}: {} - {}: {}",
                self.min_label,
                min.map_or_else(|| String::from("-∞"), |v| v.to_string()),
                self.max_label,
                max.map_or_else(|| String::from("∞"), |v| v.to_string()),
            )),
        }
    }

    fn format_date(&self, date: Date) -> String {
        if let Some(fmt) = &self.date_format {
            match date.format(fmt) {
                Ok(s) => return s,
                Err(e) => debug!(%date, error = %e, "tooltip date format failed; using default"),
            }
        }
        let month = self
            .months
            .get(date.month().index0())
            .cloned()
            .unwrap_or_else(|| date.month().to_string());
        format!("{month} {}", date.day())
    }
}

impl fmt::Debug for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipContent")
            .field("display", &self.display)
            .field("unit", &self.unit)
            .field("on", &self.on)
            .field("no_data", &self.no_data)
            .field("min_label", &self.min_label)
            .field("max_label", &self.max_label)
            .field("date_format", &self.date_format)
            .field("months", &self.months)
            .field("day_formatter", &self.day_formatter.as_ref().map(|_| "<fn>"))
            .field(
                "level_formatter",
                &self.level_formatter.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

/// Something that can be hovered to show a tooltip
pub trait TooltipSubject {
    fn tooltip_text(&self, content: &TooltipContent) -> Option<String>;
}

impl TooltipSubject for HeatmapDay {
    fn tooltip_text(&self, content: &TooltipContent) -> Option<String> {
        content.for_day(self)
    }
}

impl TooltipSubject for HeatmapColor {
    fn tooltip_text(&self, content: &TooltipContent) -> Option<String> {
        content.for_level(self)
    }
}
