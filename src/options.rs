//! Heatmap configuration.
//!
//! [`CalendarConfig`] is the caller-facing, all-optional form (as read from a
//! JSON file).  [`CalendarOptions::from_config()`] resolves it into a complete
//! [`CalendarOptions`] by applying exactly one default per field:
//!
//! | field                 | default                        |
//! | --------------------- | ------------------------------ |
//! | `type`                | yearly                         |
//! | `startDate`           | January 1 of the current year  |
//! | `cellSize`            | 15                             |
//! | `colors`              | none (quantile levels)         |
//! | `hideEmptyDays`       | false                          |
//! | `locale`              | `"en"`                         |
//! | `tooltip.display`     | true                           |
//! | `tooltip.unit`        | `"contribution"`               |
//! | `tooltip.dateFormat`  | localized `"<month> <day>"`    |
//! | `legend.display`      | true                           |
//! | `legend.direction`    | right                          |
//! | `i18n.*`              | English labels                 |
use crate::calendar::layout::{period_end, DayStyleOverride, DEFAULT_CELL_SIZE};
use crate::calendar::util::start_of_year;
use crate::model::{CalendarType, HeatmapColor, HeatmapDay, LegendDirection};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use time::format_description::OwnedFormatItem;
use time::Date;
use tracing::warn;

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_TOOLTIP_UNIT: &str = "contribution";

/// Custom tooltip text for a day; receives the day and the tooltip unit
pub type DayFormatter = Rc<dyn Fn(&HeatmapDay, &str) -> String>;

/// Custom tooltip text for a legend level
pub type LevelFormatter = Rc<dyn Fn(&HeatmapColor) -> String>;

pub type ClickHandler = Rc<dyn Fn(&HeatmapDay)>;

/// Properties handed to the tooltip engine untouched
pub type TooltipProps = BTreeMap<String, Value>;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarConfig {
    #[serde(rename = "type")]
    pub calendar_type: Option<CalendarType>,
    #[serde(with = "ymd::option")]
    pub start_date: Option<Date>,
    pub cell_size: Option<u16>,
    pub colors: Option<Vec<HeatmapColor>>,
    pub hide_empty_days: Option<bool>,
    pub locale: Option<String>,
    pub i18n: I18nConfig,
    pub tooltip: TooltipConfig,
    #[serde(alias = "heatmapLegend")]
    pub legend: LegendConfig,
    #[serde(alias = "tippyProps")]
    pub tooltip_props: TooltipProps,
    #[serde(alias = "overWritedDayStyle")]
    pub day_style: Option<DayStyleOverride>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct I18nConfig {
    pub months: Option<Vec<String>>,
    pub weekdays: Option<Vec<String>>,
    pub on: Option<String>,
    pub less: Option<String>,
    pub more: Option<String>,
    pub no_data: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipConfig {
    pub display: Option<bool>,
    pub unit: Option<String>,
    /// A `time` format description, e.g. `"[month repr:short] [day]"`
    pub date_format: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendConfig {
    pub display: Option<bool>,
    pub direction: Option<LegendDirection>,
}

/// Text labels.  `months` and `weekdays` are caller overrides; when absent
/// they are filled in from the localization provider.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Labels {
    pub months: Option<Vec<String>>,
    pub weekdays: Option<Vec<String>>,
    pub on: String,
    pub less: String,
    pub more: String,
    /// Empty means "no label", in which case no-data cells get no tooltip
    pub no_data: String,
    pub min: String,
    pub max: String,
}

impl Labels {
    fn from_config(config: I18nConfig) -> Labels {
        let defaults = Labels::default();
        Labels {
            months: config.months,
            weekdays: config.weekdays,
            on: config.on.unwrap_or(defaults.on),
            less: config.less.unwrap_or(defaults.less),
            more: config.more.unwrap_or(defaults.more),
            no_data: config.no_data.unwrap_or(defaults.no_data),
            min: config.min.unwrap_or(defaults.min),
            max: config.max.unwrap_or(defaults.max),
        }
    }
}

impl Default for Labels {
    fn default() -> Labels {
        Labels {
            months: None,
            weekdays: None,
            on: String::from("on"),
            less: String::from("less"),
            more: String::from("more"),
            no_data: String::from("No"),
            min: String::from("min"),
            max: String::from("max"),
        }
    }
}

#[derive(Clone)]
pub struct TooltipOptions {
    pub display: bool,
    pub unit: String,
    /// `None` means "localized full month name, then day of month"
    pub date_format: Option<OwnedFormatItem>,
    pub formatter: Option<DayFormatter>,
    pub props: TooltipProps,
}

impl Default for TooltipOptions {
    fn default() -> TooltipOptions {
        TooltipOptions {
            display: true,
            unit: String::from(DEFAULT_TOOLTIP_UNIT),
            date_format: None,
            formatter: None,
            props: TooltipProps::new(),
        }
    }
}

impl fmt::Debug for TooltipOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipOptions")
            .field("display", &self.display)
            .field("unit", &self.unit)
            .field("date_format", &self.date_format)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .field("props", &self.props)
            .finish()
    }
}

#[derive(Clone)]
pub struct LegendOptions {
    pub display: bool,
    pub direction: LegendDirection,
    pub formatter: Option<LevelFormatter>,
}

impl fmt::Debug for LegendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegendOptions")
            .field("display", &self.display)
            .field("direction", &self.direction)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Fully-resolved heatmap options.  Rebuild these whenever the caller's
/// inputs change.
#[derive(Clone)]
pub struct CalendarOptions {
    pub calendar_type: CalendarType,
    pub start_date: Date,
    pub cell_size: u16,
    pub colors: Option<Vec<HeatmapColor>>,
    pub hide_empty_days: bool,
    pub locale: String,
    pub i18n: Labels,
    pub tooltip: TooltipOptions,
    pub legend: LegendOptions,
    pub day_style: DayStyleOverride,
    pub on_click: Option<ClickHandler>,
}

impl CalendarOptions {
    /// All defaults, anchored on the year containing `today`
    pub fn new(today: Date) -> CalendarOptions {
        CalendarOptions::from_config(CalendarConfig::default(), today)
    }

    pub fn from_config(config: CalendarConfig, today: Date) -> CalendarOptions {
        let date_format = config.tooltip.date_format.and_then(|s| {
            time::format_description::parse_owned::<2>(&s)
                .inspect_err(|e| {
                    warn!(format = %s, error = %e, "invalid tooltip date format; using default");
                })
                .ok()
        });
        CalendarOptions {
            calendar_type: config.calendar_type.unwrap_or_default(),
            start_date: config.start_date.unwrap_or_else(|| start_of_year(today)),
            cell_size: config.cell_size.unwrap_or(DEFAULT_CELL_SIZE),
            colors: config.colors,
            hide_empty_days: config.hide_empty_days.unwrap_or(false),
            locale: config.locale.unwrap_or_else(|| String::from(DEFAULT_LOCALE)),
            i18n: Labels::from_config(config.i18n),
            tooltip: TooltipOptions {
                display: config.tooltip.display.unwrap_or(true),
                unit: config
                    .tooltip
                    .unit
                    .unwrap_or_else(|| String::from(DEFAULT_TOOLTIP_UNIT)),
                date_format,
                formatter: None,
                props: config.tooltip_props,
            },
            legend: LegendOptions {
                display: config.legend.display.unwrap_or(true),
                direction: config.legend.direction.unwrap_or_default(),
                formatter: None,
            },
            day_style: config.day_style.unwrap_or_default(),
            on_click: None,
        }
    }

    /// Last day of the configured period
    pub fn end_date(&self) -> Date {
        period_end(self.calendar_type, self.start_date)
    }

    #[must_use]
    pub fn start_date(mut self, date: Date) -> Self {
        self.start_date = date;
        self
    }

    #[must_use]
    pub fn calendar_type(mut self, calendar_type: CalendarType) -> Self {
        self.calendar_type = calendar_type;
        self
    }

    #[must_use]
    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HeatmapDay) + 'static,
    {
        self.on_click = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn tooltip_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&HeatmapDay, &str) -> String + 'static,
    {
        self.tooltip.formatter = Some(Rc::new(formatter));
        self
    }

    #[must_use]
    pub fn legend_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&HeatmapColor) -> String + 'static,
    {
        self.legend.formatter = Some(Rc::new(formatter));
        self
    }
}

impl fmt::Debug for CalendarOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarOptions")
            .field("calendar_type", &self.calendar_type)
            .field("start_date", &self.start_date)
            .field("cell_size", &self.cell_size)
            .field("colors", &self.colors)
            .field("hide_empty_days", &self.hide_empty_days)
            .field("locale", &self.locale)
            .field("i18n", &self.i18n)
            .field("tooltip", &self.tooltip)
            .field("legend", &self.legend)
            .field("day_style", &self.day_style)
            .field("on_click", &self.on_click.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
