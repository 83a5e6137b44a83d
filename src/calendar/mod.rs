pub mod layout;
pub(crate) mod util;
mod widget;
pub use self::layout::{
    first_week_offset, grid_position, last_week_offset, period_end, DayStyleOverride,
    GridPosition, Padding, DEFAULT_CELL_SIZE,
};
pub use self::widget::{Cursor, GridGeometry, HeatmapCalendar};
