use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Key names & what they do, in display order
static BINDINGS: &[(&str, &str)] = &[
    ("h, LEFT", "Move to the previous column"),
    ("l, RIGHT", "Move to the next column"),
    ("k, UP", "Move to the previous row"),
    ("j, DOWN", "Move to the next row"),
    ("ENTER, SPACE", "Click the selected day"),
    ("TAB", "Switch between grid & legend"),
    ("n, PAGE DOWN", "Show the next period"),
    ("p, PAGE UP", "Show the previous period"),
    ("0, HOME", "Return to the starting period"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static DISMISS: &str = "Press the Any Key to dismiss.";

/// Width of the key column, including the gap before the description
const KEY_COLUMN: usize = 16;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text(self) -> Text<'static> {
        let keys_style = self.0.add_modifier(Modifier::BOLD);
        let mut lines = BINDINGS
            .iter()
            .map(|&(keys, action)| {
                Line::from(vec![
                    Span::styled(format!("{keys:<KEY_COLUMN$}"), keys_style),
                    Span::raw(action),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        let size = |n: usize, limit: u16| {
            u16::try_from(n)
                .unwrap_or(u16::MAX)
                .min(limit)
                .saturating_add(2)
        };
        let width = size(text.width(), area.width);
        let height = size(text.height(), area.height);
        let [column] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(column);
        // Blank one extra column on either side so the box doesn't butt up
        // against the calendar
        let margin = Rect {
            x: popup.x.saturating_sub(1),
            width: popup.width.saturating_add(2),
            ..popup
        }
        .intersection(area);
        Clear.render(margin, buf);
        Block::new().style(self.0).render(margin, buf);
        Paragraph::new(text)
            .style(self.0)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .render(popup, buf);
    }
}
