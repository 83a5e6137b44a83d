use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;

pub const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub const WEEKDAY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub const LEGEND_LABEL_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub const TOOLTIP_STYLE: Style = Style::new().fg(Color::Black).bg(Color::White);

pub const STATUS_STYLE: Style = BASE_STYLE.fg(Color::Gray);

/// Added to the style of the cell under the cursor
pub const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

/// Colors of the quantile classes `level-0` through `level-5`.  Higher levels
/// reuse the last color.
pub const LEVEL_COLORS: [Color; 6] = [
    Color::DarkGray,
    Color::Rgb(14, 68, 41),
    Color::Rgb(0, 109, 50),
    Color::Rgb(38, 166, 65),
    Color::Rgb(57, 211, 83),
    Color::Rgb(125, 240, 140),
];

/// Maps a level class to a color.
///
/// `level-N` classes take their color from [`LEVEL_COLORS`].  Any other class
/// (e.g., from a caller-supplied color table) is parsed as a color name or
/// `#rrggbb` hex code; unparseable classes are drawn gray.
pub fn level_color(class: &str) -> Color {
    if let Some(n) = class
        .strip_prefix("level-")
        .and_then(|n| n.parse::<usize>().ok())
    {
        return LEVEL_COLORS
            .get(n)
            .or(LEVEL_COLORS.last())
            .copied()
            .unwrap_or(Color::Gray);
    }
    Color::from_str(class).unwrap_or(Color::Gray)
}

pub fn cell_style(class: &str) -> Style {
    BASE_STYLE.fg(level_color(class))
}
