use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::Date;

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

/// A single day of heatmap input.
///
/// A day without a `count` is a "no data" cell; the padding cells produced by
/// the layout engine are always of this kind.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HeatmapDay {
    #[serde(with = "ymd")]
    pub date: Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HeatmapDay {
    pub fn new(date: Date, count: f64) -> HeatmapDay {
        HeatmapDay {
            date,
            count: Some(count),
            data: None,
        }
    }

    pub fn empty(date: Date) -> HeatmapDay {
        HeatmapDay {
            date,
            count: None,
            data: None,
        }
    }

    /// A non-data cell used to align the grid to whole weeks.  The payload is
    /// the cell's index within its run of padding.
    pub fn placeholder(date: Date, index: usize) -> HeatmapDay {
        HeatmapDay {
            date,
            count: None,
            data: Some(Value::from(index)),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> HeatmapDay {
        self.data = Some(data);
        self
    }

    pub fn has_count(&self) -> bool {
        self.count.is_some()
    }
}

/// One level of a color table.
///
/// `min` and `max` are inclusive; `None` means the range is unbounded in that
/// direction.  Note that the classifier only matches an entry whose bounds are
/// both present *and* nonzero.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapColor {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub is_default: bool,
    pub class_name: String,
}

impl HeatmapColor {
    pub fn new<S: Into<String>>(min: Option<f64>, max: Option<f64>, class_name: S) -> HeatmapColor {
        HeatmapColor {
            min,
            max,
            is_default: false,
            class_name: class_name.into(),
        }
    }

    pub fn range<S: Into<String>>(min: f64, max: f64, class_name: S) -> HeatmapColor {
        HeatmapColor::new(Some(min), Some(max), class_name)
    }

    #[must_use]
    pub fn as_default(mut self) -> HeatmapColor {
        self.is_default = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarType {
    Weekly,
    Monthly,
    #[default]
    Yearly,
}

impl CalendarType {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarType::Weekly => "weekly",
            CalendarType::Monthly => "monthly",
            CalendarType::Yearly => "yearly",
        }
    }

    /// Padding cells are only laid out for the week-grid types
    pub fn is_week_grid(self) -> bool {
        self != CalendarType::Weekly
    }
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarType {
    type Err = ParseCalendarTypeError;

    fn from_str(s: &str) -> Result<CalendarType, ParseCalendarTypeError> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" | "week" | "w" => Ok(CalendarType::Weekly),
            "monthly" | "month" | "m" => Ok(CalendarType::Monthly),
            "yearly" | "year" | "y" => Ok(CalendarType::Yearly),
            _ => Err(ParseCalendarTypeError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid calendar type {0:?}; expected \"weekly\", \"monthly\", or \"yearly\"")]
pub struct ParseCalendarTypeError(String);

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendDirection {
    Left,
    #[default]
    Right,
}
