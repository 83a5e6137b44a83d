//! Mapping of day values to visual levels.
//!
//! With a color table, a value takes the class of the first entry whose
//! `[min, max]` range contains it.  Without one, the fixed range `[0, 100]` is
//! split evenly into quantile buckets named `level-1` … `level-N`, with
//! `level-0` reserved for empty days.
use crate::model::HeatmapColor;
use std::borrow::Cow;
use tracing::trace;

/// Class of empty days in quantile mode, and the last-resort class in table
/// mode
pub const NO_LEVEL: &str = "level-0";

/// Number of quantile buckets used when no color table is given
pub const DEFAULT_LEVELS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantileScale {
    pub levels: u32,
    pub min: f64,
    pub max: f64,
}

impl QuantileScale {
    pub fn new(levels: u32) -> QuantileScale {
        QuantileScale {
            levels,
            min: 0.0,
            max: 100.0,
        }
    }

    /// A table with `N` entries yields `N` buckets; an absent or empty table
    /// yields the default five.
    pub fn for_table(colors: &[HeatmapColor]) -> QuantileScale {
        if colors.is_empty() {
            QuantileScale::default()
        } else {
            QuantileScale::new(u32::try_from(colors.len()).unwrap_or(u32::MAX))
        }
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    pub fn step(&self) -> f64 {
        self.range() / f64::from(self.levels)
    }

    /// Returns the 1-based bucket containing `value`, or 0 for empty days.
    ///
    /// A value exactly on a boundary lands in the lower bucket.  A value above
    /// the top bucket also yields 0.
    pub fn bucket(&self, value: Option<f64>) -> u32 {
        let Some(value) = value else {
            return 0;
        };
        if value == 0.0 {
            return 0;
        }
        let step = self.step();
        (0..self.levels)
            .find(|&i| value <= step.mul_add(f64::from(i + 1), self.min))
            .map_or(0, |i| i + 1)
    }
}

impl Default for QuantileScale {
    fn default() -> QuantileScale {
        QuantileScale::new(DEFAULT_LEVELS)
    }
}

/// Classifies day values against an optional color table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelClassifier {
    colors: Vec<HeatmapColor>,
    scale: QuantileScale,
}

impl LevelClassifier {
    pub fn new(colors: Option<&[HeatmapColor]>) -> LevelClassifier {
        let colors = colors.map(<[HeatmapColor]>::to_vec).unwrap_or_default();
        let scale = QuantileScale::for_table(&colors);
        LevelClassifier { colors, scale }
    }

    pub fn quantile(levels: u32) -> LevelClassifier {
        LevelClassifier {
            colors: Vec::new(),
            scale: QuantileScale::new(levels),
        }
    }

    pub fn colors(&self) -> &[HeatmapColor] {
        &self.colors
    }

    pub fn scale(&self) -> QuantileScale {
        self.scale
    }

    pub fn is_quantile(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the class for a day with the given value.
    ///
    /// In table mode an entry only matches if both of its bounds are set and
    /// nonzero; entries with a zero bound are never matched by range.  When
    /// nothing matches, the result is the entry flagged as default, else the
    /// first entry.
    pub fn classify(&self, value: Option<f64>) -> Cow<'_, str> {
        if self.is_quantile() {
            return match self.scale.bucket(value) {
                0 => Cow::Borrowed(NO_LEVEL),
                n => Cow::Owned(format!("level-{n}")),
            };
        }
        if let Some(value) = value {
            let hit = self.colors.iter().find(|c| match (truthy(c.min), truthy(c.max)) {
                (Some(lo), Some(hi)) => lo <= value && value <= hi,
                _ => false,
            });
            if let Some(color) = hit {
                return Cow::Borrowed(&color.class_name);
            }
        }
        trace!(?value, "no color range matched; using fallback level");
        self.default_color()
            .or_else(|| self.colors.first())
            .map_or(Cow::Borrowed(NO_LEVEL), |c| Cow::Borrowed(&c.class_name))
    }

    /// Returns the class for a placeholder or otherwise empty cell
    pub fn classify_empty(&self) -> &str {
        self.default_color()
            .map_or(NO_LEVEL, |c| c.class_name.as_str())
    }

    /// Returns the levels shown in the legend: the color table itself, or one
    /// generated entry per quantile bucket starting from `level-0`.
    pub fn legend_levels(&self) -> Vec<HeatmapColor> {
        if !self.is_quantile() {
            return self.colors.clone();
        }
        let step = self.scale.step();
        (0..self.scale.levels)
            .map(|i| {
                let bound = step * f64::from(i);
                HeatmapColor::range(bound, bound, format!("level-{i}"))
            })
            .collect()
    }

    fn default_color(&self) -> Option<&HeatmapColor> {
        self.colors.iter().find(|c| c.is_default)
    }
}

/// A bound counts as set only when present, nonzero, and not NaN
fn truthy(bound: Option<f64>) -> Option<f64> {
    bound.filter(|&b| b != 0.0 && !b.is_nan())
}
