//! Terminal front end: scenes, text hit regions and block rendering.

use std::collections::HashMap;

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::input::{HeldKeys, PointerState};
use crate::session::Session;

pub mod play;
pub mod render;
pub mod settings;
pub mod title;

pub use play::GameScene;
pub use settings::SettingsScene;
pub use title::TitleScene;

// ============================================================================
// Scenes
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SceneId {
    Title,
    Game,
    Settings,
}

/// Everything a scene may read or mutate during one frame.
pub struct FrameContext<'a> {
    pub keys: &'a HeldKeys,
    pub pointer: PointerState,
    pub dt: f32,
    pub session: &'a mut Session,
}

pub trait Scene {
    /// Updates and draws one frame. Returns the scene to switch to, if any.
    fn tick(&mut self, ctx: &mut FrameContext<'_>, frame: &mut Frame) -> Option<SceneId>;
}

pub fn build_scene(id: SceneId, session: &Session) -> Box<dyn Scene> {
    match id {
        SceneId::Title => Box::new(TitleScene::new()),
        SceneId::Game => Box::new(GameScene::new(session)),
        SceneId::Settings => Box::new(SettingsScene::new()),
    }
}

// ============================================================================
// Edge Detection
// ============================================================================

/// Rising-edge detector. Starts as if the input were already down, so a key
/// or button still held from the previous scene does not fire.
#[derive(Clone, Copy, Debug)]
pub struct Edge {
    was_down: bool,
}

impl Default for Edge {
    fn default() -> Self {
        Self { was_down: true }
    }
}

impl Edge {
    pub fn rising(&mut self, down: bool) -> bool {
        let fired = down && !self.was_down;
        self.was_down = down;
        fired
    }
}

// ============================================================================
// Hit Regions
// ============================================================================

/// Named rectangles registered from rendered text, queried against the pointer.
#[derive(Debug, Default)]
pub struct HitRegions {
    regions: HashMap<String, Rect>,
}

impl HitRegions {
    pub fn define(&mut self, name: &str, area: Rect) {
        self.regions.insert(name.to_owned(), area);
    }

    pub fn hovered(&self, name: &str, pointer: PointerState) -> bool {
        self.regions.get(name).is_some_and(|area| {
            pointer.column >= area.x
                && pointer.column < area.x.saturating_add(area.width)
                && pointer.row >= area.y
                && pointer.row < area.y.saturating_add(area.height)
        })
    }

    pub fn clicked(&self, name: &str, pointer: PointerState, just_clicked: bool) -> bool {
        just_clicked && self.hovered(name, pointer)
    }
}

/// Draws one line of text at `(x, y)`, clipped to the frame, and registers
/// its footprint under `name`.
pub fn draw_text(
    frame: &mut Frame,
    regions: &mut HitRegions,
    name: &str,
    line: Line<'_>,
    x: u16,
    y: u16,
) -> Rect {
    let area = draw_label(frame, line, x, y);
    regions.define(name, area);
    area
}

/// Draws one line of text at `(x, y)`, clipped to the frame.
pub fn draw_label(frame: &mut Frame, line: Line<'_>, x: u16, y: u16) -> Rect {
    let area = text_area(frame.size(), line.width() as u16, x, y);
    frame.render_widget(Paragraph::new(line), area);
    area
}

/// Draws one line of text horizontally centred at row `y`.
pub fn draw_centered(frame: &mut Frame, line: Line<'_>, y: u16, style: Style) -> Rect {
    let bounds = frame.size();
    let width = line.width() as u16;
    let area = text_area(bounds, width, centered_x(bounds, width), y);
    frame.render_widget(Paragraph::new(line).style(style), area);
    area
}

pub fn centered_x(bounds: Rect, width: u16) -> u16 {
    bounds.x + bounds.width.saturating_sub(width) / 2
}

/// Row at fraction `t` of the way down `bounds`.
pub fn row_at(bounds: Rect, t: f32) -> u16 {
    bounds.y + (bounds.height.saturating_sub(1) as f32 * t.clamp(0.0, 1.0)).round() as u16
}

fn text_area(bounds: Rect, width: u16, x: u16, y: u16) -> Rect {
    Rect::new(x, y, width, 1).intersection(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(column: u16, row: u16) -> PointerState {
        PointerState {
            column,
            row,
            left_down: false,
        }
    }

    #[test]
    fn hover_is_inside_the_region_only() {
        let mut regions = HitRegions::default();
        regions.define("play", Rect::new(10, 5, 4, 1));

        assert!(regions.hovered("play", pointer(10, 5)));
        assert!(regions.hovered("play", pointer(13, 5)));
        assert!(!regions.hovered("play", pointer(14, 5)));
        assert!(!regions.hovered("play", pointer(10, 6)));
        assert!(!regions.hovered("missing", pointer(10, 5)));
    }

    #[test]
    fn click_needs_a_fresh_press() {
        let mut regions = HitRegions::default();
        regions.define("back", Rect::new(0, 0, 4, 1));

        assert!(regions.clicked("back", pointer(1, 0), true));
        assert!(!regions.clicked("back", pointer(1, 0), false));
    }

    #[test]
    fn edge_ignores_input_held_on_entry() {
        let mut edge = Edge::default();
        assert!(!edge.rising(true));
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
        assert!(!edge.rising(true));
    }
}
