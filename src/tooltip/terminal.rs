use super::TooltipEngine;
use crate::options::TooltipProps;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Clear, Paragraph, Widget},
};
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TooltipId(usize);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SingletonId(usize);

#[derive(Clone, Debug, Eq, PartialEq)]
struct Tooltip {
    target: usize,
    content: String,
}

/// Tooltip engine for the terminal.  Targets are indices chosen by the
/// renderer (e.g., cell indices).  At most one tooltip is visible: the one
/// most recently created or updated, as long as it belongs to the singleton.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TerminalTooltips {
    tooltips: BTreeMap<TooltipId, Tooltip>,
    /// Members of the live singleton; `None` when there is no singleton
    members: Option<Vec<TooltipId>>,
    active: Option<TooltipId>,
    next_id: usize,
    next_singleton: usize,
}

impl TerminalTooltips {
    pub fn new() -> TerminalTooltips {
        TerminalTooltips::default()
    }

    /// The target & text of the tooltip currently on display
    pub fn visible(&self) -> Option<(usize, &str)> {
        let id = self.active?;
        if !self.members.as_ref()?.contains(&id) {
            return None;
        }
        self.tooltips
            .get(&id)
            .map(|t| (t.target, t.content.as_str()))
    }

    /// Number of tooltips that have not been destroyed
    pub fn live_tooltips(&self) -> usize {
        self.tooltips.len()
    }
}

impl TooltipEngine for TerminalTooltips {
    type Target = usize;
    type Instance = TooltipId;
    type Singleton = SingletonId;

    fn create_instance(&mut self, target: &usize, content: &str, _props: &TooltipProps) -> TooltipId {
        let id = TooltipId(self.next_id);
        self.next_id += 1;
        self.tooltips.insert(
            id,
            Tooltip {
                target: *target,
                content: content.to_owned(),
            },
        );
        self.active = Some(id);
        id
    }

    fn set_content(&mut self, instance: &TooltipId, content: &str) {
        if let Some(t) = self.tooltips.get_mut(instance) {
            content.clone_into(&mut t.content);
            self.active = Some(*instance);
        }
    }

    fn create_singleton(&mut self, instances: &[TooltipId], props: &TooltipProps) -> SingletonId {
        trace!(?props, "creating terminal tooltip singleton");
        let id = SingletonId(self.next_singleton);
        self.next_singleton += 1;
        self.members = Some(instances.to_vec());
        id
    }

    fn set_instances(&mut self, _singleton: &mut SingletonId, instances: &[TooltipId]) {
        self.members = Some(instances.to_vec());
    }

    fn hide(&mut self, _singleton: &mut SingletonId) {
        self.active = None;
    }

    fn destroy_instance(&mut self, instance: TooltipId) {
        self.tooltips.remove(&instance);
        if self.active == Some(instance) {
            self.active = None;
        }
    }

    fn destroy_singleton(&mut self, _singleton: SingletonId) {
        self.members = None;
        self.active = None;
    }
}

/// A one-line bordered box showing tooltip text next to a cell.
///
/// The box goes above the anchor when there is room and below it otherwise,
/// horizontally centered on the anchor but kept inside the render area.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TooltipPopup<'a> {
    text: &'a str,
    anchor: Position,
    style: Style,
}

impl<'a> TooltipPopup<'a> {
    pub fn new(text: &'a str, anchor: Position, style: Style) -> Self {
        TooltipPopup {
            text,
            anchor,
            style,
        }
    }
}

impl Widget for TooltipPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = u16::try_from(Line::raw(self.text).width())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.width);
        let height = 3.min(area.height);
        let y = if self.anchor.y >= area.y.saturating_add(height) {
            self.anchor.y - height
        } else {
            self.anchor
                .y
                .saturating_add(1)
                .min(area.bottom().saturating_sub(height))
        };
        let x = self
            .anchor
            .x
            .saturating_sub(width / 2)
            .max(area.x)
            .min(area.right().saturating_sub(width));
        let popup = Rect {
            x,
            y,
            width,
            height,
        }
        .intersection(area);
        Clear.render(popup, buf);
        Paragraph::new(self.text)
            .block(Block::bordered())
            .style(self.style)
            .render(popup, buf);
    }
}
