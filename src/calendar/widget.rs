use super::layout::GridPosition;
use crate::heatmap::HeatmapView;
use crate::model::LegendDirection;
use crate::theme::{
    cell_style, CURSOR_MODIFIER, LEGEND_LABEL_STYLE, MONTH_STYLE, TITLE_STYLE, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Paragraph, Widget},
};

/// Number of lines above the grid, holding the month labels or the title
const HEADER_LINES: u16 = 1;

/// Number of blank lines between the grid and the legend
const LEGEND_GAP: u16 = 1;

/// Number of columns per cell (the cell itself plus a space)
const CELL_WIDTH: u16 = 2;

/// Number of columns per cell when the grid doesn't fit at [`CELL_WIDTH`]
const NARROW_CELL_WIDTH: u16 = 1;

/// Columns between the longest weekday label and the grid
const WEEKDAY_GUTTER: u16 = 1;

const CELL_CHAR: char = '■';

/// What the cursor is on
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Cursor {
    /// Index into [`HeatmapView::cells()`]
    Cell(usize),
    /// Index into the legend's entries
    Legend(usize),
}

/// Where everything in a [`HeatmapCalendar`] goes on the screen
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridGeometry {
    /// The area actually drawn in, centered horizontally in the area given
    pub area: Rect,
    /// Width of the weekday label column, gutter included
    pub left_margin: u16,
    pub cell_width: u16,
    pub columns: u16,
    pub rows: u16,
    legend: Option<LegendGeometry>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct LegendGeometry {
    x: u16,
    less_width: u16,
}

impl GridGeometry {
    pub fn new<B>(view: &HeatmapView<B>, area: Rect) -> GridGeometry {
        let rows = u16::try_from(view.rows()).unwrap_or(u16::MAX);
        let columns = u16::try_from(view.columns()).unwrap_or(u16::MAX);
        let left_margin = if view.calendar_type().is_week_grid() {
            view.labels()
                .weekdays
                .iter()
                .map(|s| text_width(s))
                .max()
                .unwrap_or(0)
                .saturating_add(WEEKDAY_GUTTER)
        } else {
            0
        };
        let grid_width = |cell_width: u16| left_margin.saturating_add(columns.saturating_mul(cell_width));
        let cell_width = if grid_width(CELL_WIDTH) <= area.width {
            CELL_WIDTH
        } else {
            NARROW_CELL_WIDTH
        };
        let legend_size = view.legend().map(|legend| {
            let less_width = text_width(&legend.less);
            let swatches = u16::try_from(legend.entries.len())
                .unwrap_or(u16::MAX)
                .saturating_mul(CELL_WIDTH);
            let width = less_width
                .saturating_add(1)
                .saturating_add(swatches)
                .saturating_add(text_width(&legend.more));
            (legend.direction, less_width, width)
        });
        let legend_width = legend_size.map_or(0, |(_, _, w)| w);
        let width = grid_width(cell_width).max(legend_width).min(area.width);
        let legend = legend_size.map(|(direction, less_width, legend_width)| LegendGeometry {
            x: match direction {
                LegendDirection::Left => 0,
                LegendDirection::Right => width.saturating_sub(legend_width),
            },
            less_width,
        });
        let legend_lines = if legend.is_some() { LEGEND_GAP + 1 } else { 0 };
        let height = HEADER_LINES
            .saturating_add(rows)
            .saturating_add(legend_lines)
            .min(area.height);
        GridGeometry {
            area: Rect {
                x: area.x + (area.width - width) / 2,
                y: area.y,
                width,
                height,
            },
            left_margin,
            cell_width,
            columns,
            rows,
            legend,
        }
    }

    /// Position of a cell relative to the top-left of `area`
    pub fn cell_offset(&self, position: &GridPosition) -> (u16, u16) {
        let column = u16::try_from(position.column.saturating_sub(1)).unwrap_or(u16::MAX);
        let row = u16::try_from(position.row.saturating_sub(1)).unwrap_or(u16::MAX);
        (
            self.left_margin
                .saturating_add(column.saturating_mul(self.cell_width)),
            HEADER_LINES.saturating_add(row),
        )
    }

    /// Screen position of a cell
    pub fn cell_anchor(&self, position: &GridPosition) -> Position {
        let (x, y) = self.cell_offset(position);
        self.absolute(x, y)
    }

    /// Position of legend entry `index` relative to the top-left of `area`.
    /// Passing the number of entries gives the position of the "more" label.
    pub fn legend_offset(&self, index: usize) -> Option<(u16, u16)> {
        let legend = self.legend?;
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        let x = legend
            .x
            .saturating_add(legend.less_width)
            .saturating_add(1)
            .saturating_add(index.saturating_mul(CELL_WIDTH));
        Some((x, self.legend_line()))
    }

    /// Screen position of legend entry `index`
    pub fn legend_anchor(&self, index: usize) -> Option<Position> {
        self.legend_offset(index).map(|(x, y)| self.absolute(x, y))
    }

    fn legend_line(&self) -> u16 {
        HEADER_LINES
            .saturating_add(self.rows)
            .saturating_add(LEGEND_GAP)
    }

    fn absolute(&self, x: u16, y: u16) -> Position {
        Position::new(
            self.area.x.saturating_add(x),
            self.area.y.saturating_add(y),
        )
    }
}

/// Draws a [`HeatmapView`]: month labels or title, weekday labels, the grid
/// of cells, and the legend
#[derive(Debug)]
pub struct HeatmapCalendar<'a, B> {
    view: &'a HeatmapView<B>,
    cursor: Option<Cursor>,
}

impl<'a, B> HeatmapCalendar<'a, B> {
    pub fn new(view: &'a HeatmapView<B>) -> Self {
        HeatmapCalendar { view, cursor: None }
    }

    #[must_use]
    pub fn cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl<B> Widget for HeatmapCalendar<'_, B> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let geom = GridGeometry::new(self.view, area);
        let labels = self.view.labels();
        let mut canvas = BufferCanvas::new(geom.area, buf);
        if let Some(title) = &labels.title {
            let grid_width = geom.columns.saturating_mul(geom.cell_width);
            let x = geom.left_margin + grid_width.saturating_sub(text_width(title)) / 2;
            canvas.mvprint(0, x, title, TITLE_STYLE, u16::MAX);
        }
        let months = self.view.month_columns();
        let month_x = |column: usize| {
            geom.cell_offset(&GridPosition {
                row: 1,
                column,
                ..GridPosition::default()
            })
            .0
        };
        for (i, &(column, label)) in months.iter().enumerate() {
            let x = month_x(column);
            // Leave at least one blank column before the next label
            let room = months
                .get(i + 1)
                .map_or(u16::MAX, |&(next, _)| month_x(next).saturating_sub(x + 1));
            canvas.mvprint(0, x, label, MONTH_STYLE, room);
        }
        if self.view.calendar_type().is_week_grid() {
            for (row, weekday) in std::iter::zip(0u16.., &labels.weekdays) {
                canvas.mvprint(HEADER_LINES + row, 0, weekday, WEEKDAY_STYLE, u16::MAX);
            }
        }
        for (i, cell) in self.view.cells().iter().enumerate() {
            let (x, y) = geom.cell_offset(&cell.position);
            let mut style = cell_style(&cell.class);
            if self.cursor == Some(Cursor::Cell(i)) {
                style = style.add_modifier(CURSOR_MODIFIER);
            }
            canvas.mvaddch(y, x, CELL_CHAR, style);
        }
        if let Some(legend) = self.view.legend() {
            let y = geom.legend_line();
            if let Some(lg) = geom.legend {
                canvas.mvprint(y, lg.x, &legend.less, LEGEND_LABEL_STYLE, u16::MAX);
            }
            for (i, entry) in legend.entries.iter().enumerate() {
                if let Some((x, _)) = geom.legend_offset(i) {
                    let mut style = cell_style(&entry.class);
                    if self.cursor == Some(Cursor::Legend(i)) {
                        style = style.add_modifier(CURSOR_MODIFIER);
                    }
                    canvas.mvaddch(y, x, CELL_CHAR, style);
                }
            }
            if let Some((x, _)) = geom.legend_offset(legend.entries.len()) {
                canvas.mvprint(y, x, &legend.more, LEGEND_LABEL_STYLE, u16::MAX);
            }
        }
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Line::raw(s).width()).unwrap_or(u16::MAX)
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn mvaddch(&mut self, y: u16, x: u16, ch: char, style: Style) {
        if y < self.area.height && x < self.area.width {
            if let Some(cell) = self.buf.cell_mut((x + self.area.x, y + self.area.y)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }

    /// Prints `s` at the given coordinates, truncated to at most `max_width`
    /// columns and to the canvas area
    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style, max_width: u16) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // The Rect handed to the Paragraph must lie entirely within the
            // buffer lest a panic result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width).min(max_width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::layout::period_dates;
    use crate::model::{CalendarType, HeatmapDay};
    use crate::options::CalendarOptions;
    use ratatui::buffer::Cell;
    use ratatui::style::{Color, Modifier};
    use time::macros::date;
    use time::Date;

    fn view(calendar_type: CalendarType, start: Date) -> HeatmapView {
        let data = period_dates(calendar_type, start)
            .into_iter()
            .enumerate()
            .map(|(i, d)| HeatmapDay::new(d, f64::from(u32::try_from(i).unwrap())))
            .collect();
        let options = CalendarOptions::new(start)
            .calendar_type(calendar_type)
            .start_date(start);
        HeatmapView::new(options, data)
    }

    fn symbols(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf.cell((x, y)).map_or(" ", Cell::symbol))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_monthly() {
        let view = view(CalendarType::Monthly, date!(2024 - 02 - 01));
        let area = Rect::new(0, 0, 19, 10);
        let mut buffer = Buffer::empty(area);
        HeatmapCalendar::new(&view)
            .cursor(Some(Cursor::Cell(3)))
            .render(area, &mut buffer);
        assert_eq!(
            symbols(&buffer),
            [
                "     February      ",
                "Mon ■ ■ ■ ■ ■      ",
                "Tue ■ ■ ■ ■ ■      ",
                "Wed ■ ■ ■ ■ ■      ",
                "Thu ■ ■ ■ ■ ■      ",
                "Fri ■ ■ ■ ■ ■      ",
                "Sat ■ ■ ■ ■ ■      ",
                "Sun ■ ■ ■ ■ ■      ",
                "                   ",
                "less ■ ■ ■ ■ ■ more",
            ]
        );
        // February 1 is under the cursor
        let first = buffer.cell((4, 4)).unwrap();
        assert!(
            first.modifier.contains(Modifier::REVERSED),
            "cursor cell should be reversed"
        );
        // February 2 has a count of 1
        assert_eq!(buffer.cell((4, 5)).unwrap().fg, Color::Rgb(14, 68, 41));
        assert!(
            !buffer.cell((4, 5)).unwrap().modifier.contains(Modifier::REVERSED),
            "only the cursor cell is reversed"
        );
        // Padding
        assert_eq!(buffer.cell((4, 1)).unwrap().fg, Color::DarkGray);
    }

    #[test]
    fn test_weekly() {
        let view = view(CalendarType::Weekly, date!(2025 - 06 - 18));
        let area = Rect::new(0, 0, 23, 4);
        let mut buffer = Buffer::empty(area);
        HeatmapCalendar::new(&view)
            .cursor(Some(Cursor::Legend(4)))
            .render(area, &mut buffer);
        assert_eq!(
            symbols(&buffer),
            [
                "                       ",
                "  ■ ■ ■ ■ ■ ■ ■        ",
                "                       ",
                "  less ■ ■ ■ ■ ■ more  ",
            ]
        );
        assert!(
            buffer.cell((15, 3)).unwrap().modifier.contains(Modifier::REVERSED),
            "legend cursor should be reversed"
        );
    }

    #[test]
    fn test_geometry_wide() {
        let view = view(CalendarType::Yearly, date!(2025 - 01 - 01));
        let geom = GridGeometry::new(&view, Rect::new(0, 0, 120, 30));
        assert_eq!(geom.cell_width, 2);
        assert_eq!(geom.left_margin, 4);
        assert_eq!((geom.columns, geom.rows), (53, 7));
        assert_eq!(geom.area, Rect::new(5, 0, 110, 10));
        // First data cell: Wednesday of the first week
        assert_eq!(geom.cell_anchor(&view.cells()[2].position), Position::new(9, 3));
        // Legend is right-aligned
        assert_eq!(geom.legend_anchor(0), Some(Position::new(5 + 91 + 5, 9)));
    }

    #[test]
    fn test_geometry_narrow() {
        let view = view(CalendarType::Yearly, date!(2025 - 01 - 01));
        let geom = GridGeometry::new(&view, Rect::new(0, 0, 80, 24));
        assert_eq!(geom.cell_width, 1);
        assert_eq!(geom.area, Rect::new(11, 0, 57, 10));
    }

    #[test]
    fn test_geometry_left_legend() {
        let start = date!(2025 - 01 - 01);
        let mut options = CalendarOptions::new(start);
        options.legend.direction = LegendDirection::Left;
        let view = HeatmapView::new(options, vec![HeatmapDay::new(start, 1.0)]);
        let geom = GridGeometry::new(&view, Rect::new(0, 0, 40, 12));
        assert_eq!(geom.area.width, 19);
        assert_eq!(geom.legend_offset(0), Some((5, 9)));
        assert_eq!(geom.legend_offset(5), Some((15, 9)));
    }

    #[test]
    fn test_geometry_without_legend() {
        let start = date!(2025 - 01 - 01);
        let mut options = CalendarOptions::new(start);
        options.legend.display = false;
        let view = HeatmapView::new(options, vec![HeatmapDay::new(start, 1.0)]);
        let geom = GridGeometry::new(&view, Rect::new(0, 0, 40, 12));
        assert_eq!(geom.area.height, 8);
        assert_eq!(geom.legend_anchor(0), None);
    }

    #[test]
    fn test_yearly_month_labels() {
        let view = view(CalendarType::Yearly, date!(2025 - 01 - 01));
        let area = Rect::new(0, 0, 110, 10);
        let mut buffer = Buffer::empty(area);
        HeatmapCalendar::new(&view).render(area, &mut buffer);
        let header = &symbols(&buffer)[0];
        // January at column 1, February at column 5, March at column 9;
        // "February" is cut short to keep a space before "March"
        assert!(
            header.starts_with("    January Februar March"),
            "header: {header:?}"
        );
    }
}
