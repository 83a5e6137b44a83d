use crate::demo::DataSource;
use crate::help::Help;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use heatcal::calendar::layout::{next_period_start, previous_period_start};
use heatcal::calendar::{Cursor, GridGeometry, HeatmapCalendar};
use heatcal::heatmap::HeatmapView;
use heatcal::model::HeatmapDay;
use heatcal::options::CalendarOptions;
use heatcal::theme::{BASE_STYLE, STATUS_STYLE, TOOLTIP_STYLE};
use heatcal::tooltip::{TerminalTooltips, TooltipGuard, TooltipLifecycleManager, TooltipPopup};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::Widget,
    Terminal,
};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use thiserror::Error;
use time::Date;
use tracing::debug;

static STATUS_HINT: &str = "Press ? for help";

#[derive(Debug)]
pub(crate) struct App {
    /// Options for the period on display; only the start date changes
    options: CalendarOptions,
    initial_start: Date,
    source: DataSource,
    view: HeatmapView,
    grid_tips: TooltipGuard<TerminalTooltips>,
    legend_tips: TooltipGuard<TerminalTooltips>,
    focus: Focus,
    cell: usize,
    legend_entry: usize,
    /// Written by the click handler
    clicked: Rc<RefCell<Option<String>>>,
    state: AppState,
}

impl App {
    pub(crate) fn new(options: CalendarOptions, mut source: DataSource) -> App {
        let clicked = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&clicked);
        let options = options.on_click(move |day| {
            *sink.borrow_mut() = Some(describe_click(day));
        });
        let initial_start = options.start_date;
        let days = source.days(options.calendar_type, initial_start);
        let view = HeatmapView::new(options.clone(), days);
        let grid_tips = tooltips(&view);
        let legend_tips = tooltips(&view);
        let cell = view.first_day_index().unwrap_or(0);
        let mut app = App {
            options,
            initial_start,
            source,
            view,
            grid_tips,
            legend_tips,
            focus: Focus::Grid,
            cell,
            legend_entry: 0,
            clicked,
            state: AppState::Calendar,
        };
        app.hover();
        app
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(Step::Left),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(Step::Right),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(Step::Up),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(Step::Down),
                KeyCode::Enter | KeyCode::Char(' ') => self.click(),
                KeyCode::Tab => self.toggle_focus(),
                KeyCode::Char('n') | KeyCode::PageDown => self.next_period().is_ok(),
                KeyCode::Char('p') | KeyCode::PageUp => self.previous_period().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reset();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_cursor(&mut self, step: Step) -> bool {
        let target = match self.focus {
            Focus::Grid => {
                let Some(cell) = self.view.cell(self.cell) else {
                    return false;
                };
                let (row, column) = (cell.position.row, cell.position.column);
                match step {
                    Step::Left => column
                        .checked_sub(1)
                        .and_then(|c| self.view.cell_at(row, c)),
                    Step::Right => self.view.cell_at(row, column + 1),
                    Step::Up => row.checked_sub(1).and_then(|r| self.view.cell_at(r, column)),
                    Step::Down => self.view.cell_at(row + 1, column),
                }
            }
            Focus::Legend => {
                let entries = self.view.legend().map_or(0, |l| l.entries.len());
                match step {
                    Step::Left => self.legend_entry.checked_sub(1),
                    Step::Right => Some(self.legend_entry + 1).filter(|&i| i < entries),
                    Step::Up | Step::Down => None,
                }
            }
        };
        let Some(target) = target else {
            return false;
        };
        match self.focus {
            Focus::Grid => self.cell = target,
            Focus::Legend => self.legend_entry = target,
        }
        self.hover();
        true
    }

    fn click(&self) -> bool {
        self.focus == Focus::Grid && self.view.click(self.cell)
    }

    fn toggle_focus(&mut self) -> bool {
        if self.view.legend().is_none() {
            return false;
        }
        self.focus = match self.focus {
            Focus::Grid => Focus::Legend,
            Focus::Legend => Focus::Grid,
        };
        self.hover();
        true
    }

    fn next_period(&mut self) -> Result<(), OutOfTimeError> {
        let start = next_period_start(self.options.calendar_type, self.options.start_date)
            .ok_or(OutOfTimeError)?;
        self.show_period(start);
        Ok(())
    }

    fn previous_period(&mut self) -> Result<(), OutOfTimeError> {
        let start = previous_period_start(self.options.calendar_type, self.options.start_date)
            .ok_or(OutOfTimeError)?;
        self.show_period(start);
        Ok(())
    }

    fn reset(&mut self) {
        self.show_period(self.initial_start);
    }

    fn show_period(&mut self, start: Date) {
        debug!(%start, "switching period");
        self.options.start_date = start;
        let days = self.source.days(self.options.calendar_type, start);
        self.view = HeatmapView::new(self.options.clone(), days);
        let content = self.view.tooltip_content();
        for tips in [&mut self.grid_tips, &mut self.legend_tips] {
            tips.reset();
            tips.set_content(content.clone());
        }
        self.cell = self.view.first_day_index().unwrap_or(0);
        self.hover();
    }

    /// Points the tooltips at whatever the cursor is on.  Whatever was shown
    /// before is hidden first, as targets without tooltip text show nothing.
    fn hover(&mut self) {
        self.grid_tips.on_leave();
        self.legend_tips.on_leave();
        match self.focus {
            Focus::Grid => self.view.on_hover(&mut self.grid_tips, self.cell),
            Focus::Legend => self
                .view
                .on_legend_hover(&mut self.legend_tips, self.legend_entry),
        }
    }

    fn cursor(&self) -> Cursor {
        match self.focus {
            Focus::Grid => Cursor::Cell(self.cell),
            Focus::Legend => Cursor::Legend(self.legend_entry),
        }
    }

    fn status(&self) -> String {
        self.clicked
            .borrow()
            .clone()
            .unwrap_or_else(|| String::from(STATUS_HINT))
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [calendar_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        HeatmapCalendar::new(&self.view)
            .cursor(Some(self.cursor()))
            .render(calendar_area, buf);
        let geom = GridGeometry::new(&self.view, calendar_area);
        let tooltip = match self.focus {
            Focus::Grid => self.grid_tips.engine().visible().and_then(|(i, text)| {
                let cell = self.view.cell(i)?;
                Some((geom.cell_anchor(&cell.position), text))
            }),
            Focus::Legend => self
                .legend_tips
                .engine()
                .visible()
                .and_then(|(i, text)| Some((geom.legend_anchor(i)?, text))),
        };
        if let Some((anchor, text)) = tooltip {
            TooltipPopup::new(text, anchor, TOOLTIP_STYLE).render(calendar_area, buf);
        }
        Line::styled(self.status(), STATUS_STYLE).render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

fn tooltips(view: &HeatmapView) -> TooltipGuard<TerminalTooltips> {
    TooltipGuard::new(TooltipLifecycleManager::new(
        TerminalTooltips::new(),
        view.tooltip_content(),
        view.tooltip_props().clone(),
    ))
}

fn describe_click(day: &HeatmapDay) -> String {
    match day.count {
        Some(count) => format!("Clicked {}: {count}", day.date),
        None => format!("Clicked {}: no data", day.date),
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
struct OutOfTimeError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Quitting,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Focus {
    Grid,
    Legend,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Step {
    Left,
    Right,
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatcal::model::CalendarType;
    use ratatui::buffer::Cell;
    use time::macros::date;

    fn weekly_app() -> App {
        let options = CalendarOptions::new(date!(2025 - 06 - 16))
            .calendar_type(CalendarType::Weekly)
            .start_date(date!(2025 - 06 - 16));
        let source = DataSource::loaded(vec![
            HeatmapDay::new(date!(2025 - 06 - 16), 4.0),
            HeatmapDay::new(date!(2025 - 06 - 23), 9.0),
        ]);
        App::new(options, source)
    }

    fn lines(buf: &Buffer) -> Vec<String> {
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
    fn test_initial_tooltip() {
        let app = weekly_app();
        assert_eq!(
            app.grid_tips.engine().visible(),
            Some((0, "4 contribution on June 16"))
        );
        assert_eq!(app.legend_tips.engine().visible(), None);
    }

    #[test]
    fn test_move_along_week() {
        let mut app = weekly_app();
        assert!(!app.handle_key(KeyCode::Left), "no column before the first");
        assert!(!app.handle_key(KeyCode::Up), "weekly grids have one row");
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.cell, 1);
        assert_eq!(
            app.grid_tips.engine().visible(),
            Some((1, "No contribution on June 17"))
        );
        for _ in 0..5 {
            assert!(app.handle_key(KeyCode::Right));
        }
        assert_eq!(app.cell, 6);
        assert!(!app.handle_key(KeyCode::Right), "no column after the last");
    }

    #[test]
    fn test_period_navigation() {
        let mut app = weekly_app();
        app.handle_key(KeyCode::Char('l'));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.options.start_date, date!(2025 - 06 - 23));
        assert_eq!(app.cell, 0);
        assert_eq!(
            app.grid_tips.engine().visible(),
            Some((0, "9 contribution on June 23"))
        );
        assert!(app.handle_key(KeyCode::PageUp));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.options.start_date, date!(2025 - 06 - 09));
        assert_eq!(app.view.cells()[0].day, HeatmapDay::empty(date!(2025 - 06 - 09)));
        assert!(app.handle_key(KeyCode::Char('0')));
        assert_eq!(app.options.start_date, date!(2025 - 06 - 16));
    }

    #[test]
    fn test_period_navigation_frees_tooltips() {
        let mut app = weekly_app();
        for _ in 0..3 {
            app.handle_key(KeyCode::Right);
        }
        assert_eq!(app.grid_tips.pool_size(), 4);
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.grid_tips.pool_size(), 1);
        assert_eq!(app.grid_tips.engine().live_tooltips(), 1);
    }

    #[test]
    fn test_click() {
        let mut app = weekly_app();
        assert_eq!(app.status(), STATUS_HINT);
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.status(), "Clicked 2025-06-16: 4");
        app.handle_key(KeyCode::Right);
        assert!(app.handle_key(KeyCode::Char(' ')));
        assert_eq!(app.status(), "Clicked 2025-06-17: no data");
    }

    #[test]
    fn test_monthly_movement() {
        // February 2024 begins on a Thursday
        let options = CalendarOptions::new(date!(2024 - 02 - 01))
            .calendar_type(CalendarType::Monthly)
            .start_date(date!(2024 - 02 - 01));
        let mut app = App::new(options, DataSource::loaded(Vec::new()));
        let first = app.cell;
        assert_eq!(app.view.cells()[first].day.date, date!(2024 - 02 - 01));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.view.cells()[app.cell].day.date, date!(2024 - 02 - 02));
        assert!(app.handle_key(KeyCode::Char('l')));
        assert_eq!(app.view.cells()[app.cell].day.date, date!(2024 - 02 - 09));
        assert!(app.handle_key(KeyCode::Char('h')));
        assert!(app.handle_key(KeyCode::Char('k')));
        assert_eq!(app.cell, first);
        // The leading padding is selectable but not clickable
        assert!(app.handle_key(KeyCode::Up));
        assert!(app.view.cells()[app.cell].kind.is_padding());
        assert!(!app.handle_key(KeyCode::Enter), "padding is not clickable");
        assert_eq!(app.status(), STATUS_HINT);
    }

    #[test]
    fn test_legend_focus() {
        let mut app = weekly_app();
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.grid_tips.engine().visible(), None);
        assert!(
            app.legend_tips.engine().visible().is_some(),
            "legend tooltip should be shown"
        );
        assert!(!app.handle_key(KeyCode::Left), "no entry before the first");
        assert!(!app.handle_key(KeyCode::Down), "legend has one row");
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.legend_tips.engine().visible().map(|(i, _)| i), Some(1));
        assert!(!app.handle_key(KeyCode::Enter), "legend is not clickable");
        assert!(app.handle_key(KeyCode::Tab));
        assert_eq!(app.legend_tips.engine().visible(), None);
        assert_eq!(
            app.grid_tips.engine().visible(),
            Some((0, "4 contribution on June 16"))
        );
    }

    #[test]
    fn test_hover_without_text_hides_tooltip() {
        let mut options = CalendarOptions::new(date!(2025 - 06 - 16))
            .calendar_type(CalendarType::Weekly)
            .start_date(date!(2025 - 06 - 16));
        options.i18n.no_data = String::new();
        let source = DataSource::loaded(vec![HeatmapDay::new(date!(2025 - 06 - 16), 4.0)]);
        let mut app = App::new(options, source);
        assert!(
            app.grid_tips.engine().visible().is_some(),
            "day with a count has a tooltip"
        );
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.grid_tips.engine().visible(), None);
    }

    #[test]
    fn test_no_legend_no_focus_switch() {
        let mut options = CalendarOptions::new(date!(2025 - 06 - 16))
            .calendar_type(CalendarType::Weekly)
            .start_date(date!(2025 - 06 - 16));
        options.legend.display = false;
        let mut app = App::new(options, DataSource::loaded(Vec::new()));
        assert!(!app.handle_key(KeyCode::Tab), "there is no legend to focus");
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = weekly_app();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(!app.handle_key(KeyCode::Char('x')), "unbound key");
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting(), "Esc should quit");
    }

    #[test]
    fn test_render() {
        let mut app = weekly_app();
        let area = Rect::new(0, 0, 40, 8);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = lines(&buffer);
        assert!(
            lines[3].contains("│4 contribution on June 16│"),
            "tooltip should be drawn below the first cell: {lines:?}"
        );
        assert_eq!(lines[7].trim_end(), STATUS_HINT);
        let cursor = buffer.cell((10, 1)).unwrap();
        assert_eq!(cursor.symbol(), "■");
        assert!(
            cursor.modifier.contains(heatcal::theme::CURSOR_MODIFIER),
            "cursor cell should be highlighted"
        );
    }

    #[test]
    fn test_render_click_status() {
        let mut app = weekly_app();
        app.handle_key(KeyCode::Enter);
        let area = Rect::new(0, 0, 40, 8);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(lines(&buffer)[7].trim_end(), "Clicked 2025-06-16: 4");
    }
}
