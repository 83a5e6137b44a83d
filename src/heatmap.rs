//! The render model of a heatmap: every cell with its class & grid position,
//! the legend, and the localized labels.
use crate::calendar::layout::{grid_position, GridPosition, Padding};
use crate::calendar::util::{MonthExt, DAYS_IN_WEEK};
use crate::level::LevelClassifier;
use crate::locale::{BuiltinLocales, LocaleBackend, LocalizationProvider};
use crate::model::{CalendarType, HeatmapColor, HeatmapDay, LegendDirection};
use crate::options::{CalendarOptions, TooltipProps};
use crate::tooltip::{TooltipContent, TooltipEngine, TooltipLifecycleManager};
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellKind {
    LeadingPadding,
    Day,
    TrailingPadding,
}

impl CellKind {
    pub fn is_padding(self) -> bool {
        self != CellKind::Day
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedCell {
    pub kind: CellKind,
    pub day: HeatmapDay,
    /// Visual level class
    pub class: String,
    pub position: GridPosition,
    /// Set on data cells when a click handler is configured
    pub clickable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub color: HeatmapColor,
    pub class: String,
    /// Width & height of the legend swatch
    pub size: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub direction: LegendDirection,
    pub less: String,
    pub more: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CalendarLabels {
    /// Month names, January first
    pub months: Vec<String>,
    /// Weekday names, Monday first
    pub weekdays: Vec<String>,
    /// Name of the displayed month; only set for monthly calendars
    pub title: Option<String>,
}

#[derive(Debug)]
pub struct HeatmapView<B = BuiltinLocales> {
    options: CalendarOptions,
    provider: LocalizationProvider<B>,
    classifier: LevelClassifier,
    cells: Vec<RenderedCell>,
    labels: CalendarLabels,
    legend: Option<Legend>,
}

impl HeatmapView<BuiltinLocales> {
    pub fn new(options: CalendarOptions, data: Vec<HeatmapDay>) -> Self {
        HeatmapView::with_backend(options, data, BuiltinLocales)
    }
}

impl<B: LocaleBackend> HeatmapView<B> {
    /// Builds the render model for `data`, which is displayed in order, one
    /// cell per element, starting at the period's first day.
    pub fn with_backend(options: CalendarOptions, data: Vec<HeatmapDay>, backend: B) -> Self {
        let provider = LocalizationProvider::new(backend, options.start_date.year());
        let classifier = LevelClassifier::new(options.colors.as_deref());
        let labels = build_labels(&options, &provider);
        let cells = build_cells(&options, &classifier, data);
        let legend = options.legend.display.then(|| build_legend(&options, &classifier));
        debug!(
            calendar_type = %options.calendar_type,
            start = %options.start_date,
            cells = cells.len(),
            "built heatmap view"
        );
        HeatmapView {
            options,
            provider,
            classifier,
            cells,
            labels,
            legend,
        }
    }
}

impl<B> HeatmapView<B> {
    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn calendar_type(&self) -> CalendarType {
        self.options.calendar_type
    }

    pub fn provider(&self) -> &LocalizationProvider<B> {
        &self.provider
    }

    pub fn classifier(&self) -> &LevelClassifier {
        &self.classifier
    }

    pub fn cells(&self) -> &[RenderedCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&RenderedCell> {
        self.cells.get(index)
    }

    pub fn labels(&self) -> &CalendarLabels {
        &self.labels
    }

    /// `None` when the legend is hidden
    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Number of grid rows: seven for the week grids, one for weekly periods
    pub fn rows(&self) -> usize {
        if self.calendar_type().is_week_grid() {
            DAYS_IN_WEEK
        } else {
            1
        }
    }

    /// Number of grid columns actually occupied
    pub fn columns(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.position.column)
            .max()
            .unwrap_or(0)
    }

    /// The grid column in which each month of a yearly calendar begins,
    /// paired with the month's label
    pub fn month_columns(&self) -> Vec<(usize, &str)> {
        if self.calendar_type() != CalendarType::Yearly {
            return Vec::new();
        }
        self.cells
            .iter()
            .filter(|c| c.kind == CellKind::Day && c.day.date.day() == 1)
            .filter_map(|c| {
                let label = self.labels.months.get(c.day.date.month().index0())?;
                Some((c.position.column, label.as_str()))
            })
            .collect()
    }

    /// Index of the first data cell, if any
    pub fn first_day_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.kind == CellKind::Day)
    }

    /// Index of the cell at the given 1-based grid coordinates
    pub fn cell_at(&self, row: usize, column: usize) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| c.position.row == row && c.position.column == column)
    }

    /// Settings for the text of this heatmap's tooltips
    pub fn tooltip_content(&self) -> TooltipContent {
        TooltipContent::new(&self.options, self.labels.months.clone())
    }

    pub fn tooltip_props(&self) -> &TooltipProps {
        &self.options.tooltip.props
    }

    /// Invokes the click handler on `day`.  Returns `false` if there is no
    /// handler.
    pub fn on_click(&self, day: &HeatmapDay) -> bool {
        match &self.options.on_click {
            Some(handler) => {
                handler(day);
                true
            }
            None => false,
        }
    }

    /// Clicks the cell at `index`; padding cells are not clickable
    pub fn click(&self, index: usize) -> bool {
        match self.cells.get(index) {
            Some(cell) if cell.clickable => self.on_click(&cell.day),
            _ => false,
        }
    }

    /// Routes a hover over the cell at `index` to `tooltips`
    pub fn on_hover<E>(&self, tooltips: &mut TooltipLifecycleManager<E>, index: usize)
    where
        E: TooltipEngine<Target = usize>,
    {
        match self.cells.get(index) {
            Some(cell) => tooltips.on_hover(index, &cell.day),
            None => tooltips.on_leave(),
        }
    }

    /// Routes a hover over legend entry `index` to `tooltips`
    pub fn on_legend_hover<E>(&self, tooltips: &mut TooltipLifecycleManager<E>, index: usize)
    where
        E: TooltipEngine<Target = usize>,
    {
        match self.legend.as_ref().and_then(|l| l.entries.get(index)) {
            Some(entry) => tooltips.on_hover(index, &entry.color),
            None => tooltips.on_leave(),
        }
    }
}

fn build_labels<B: LocaleBackend>(
    options: &CalendarOptions,
    provider: &LocalizationProvider<B>,
) -> CalendarLabels {
    let months = options
        .i18n
        .months
        .clone()
        .unwrap_or_else(|| provider.month_names(&options.locale).to_vec());
    let weekdays = options
        .i18n
        .weekdays
        .clone()
        .unwrap_or_else(|| provider.weekday_names(&options.locale).to_vec());
    let title = (options.calendar_type == CalendarType::Monthly).then(|| {
        months
            .get(options.start_date.month().index0())
            .cloned()
            .unwrap_or_else(|| provider.month_name(options.start_date, &options.locale))
    });
    CalendarLabels {
        months,
        weekdays,
        title,
    }
}

fn build_cells(
    options: &CalendarOptions,
    classifier: &LevelClassifier,
    data: Vec<HeatmapDay>,
) -> Vec<RenderedCell> {
    let calendar_type = options.calendar_type;
    let padding = Padding::for_period(calendar_type, options.start_date);
    // Data cells are positioned after the leading padding even when the
    // padding itself is not shown
    let offset = padding.leading.len();
    let data_len = data.len();
    let position = |slot: usize, first_offset: usize| {
        grid_position(
            slot,
            first_offset,
            calendar_type,
            options.cell_size,
            &options.day_style,
        )
    };
    let empty_class = classifier.classify_empty();
    let mut cells = Vec::with_capacity(data_len + 2 * DAYS_IN_WEEK);
    if !options.hide_empty_days {
        cells.extend(padding.leading.into_iter().enumerate().map(|(j, day)| {
            RenderedCell {
                kind: CellKind::LeadingPadding,
                day,
                class: empty_class.to_owned(),
                position: position(j, 0),
                clickable: false,
            }
        }));
    }
    let clickable = options.on_click.is_some();
    cells.extend(data.into_iter().enumerate().map(|(i, day)| RenderedCell {
        kind: CellKind::Day,
        class: classifier.classify(day.count).into_owned(),
        day,
        position: position(i, offset),
        clickable,
    }));
    if !options.hide_empty_days {
        cells.extend(padding.trailing.into_iter().enumerate().map(|(j, day)| {
            RenderedCell {
                kind: CellKind::TrailingPadding,
                day,
                class: empty_class.to_owned(),
                position: position(data_len + j, offset),
                clickable: false,
            }
        }));
    }
    cells
}

fn build_legend(options: &CalendarOptions, classifier: &LevelClassifier) -> Legend {
    let size = options.cell_size.saturating_sub(2);
    let entries = classifier
        .legend_levels()
        .into_iter()
        .map(|color| LegendEntry {
            class: classifier.classify(color.min).into_owned(),
            color,
            size,
        })
        .collect();
    Legend {
        direction: options.legend.direction,
        less: options.i18n.less.clone(),
        more: options.i18n.more.clone(),
        entries,
    }
}
