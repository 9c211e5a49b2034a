use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::Frame;

use super::{centered_x, draw_centered, draw_text, row_at, Edge, FrameContext, HitRegions, Scene, SceneId};
use crate::input::{Key, KeySource};
use crate::shapes::PieceId;

const ROWS: usize = 5;
const BACK: &str = "BACK";
/// Cursor slot of the BACK button, after every piece.
const BACK_SLOT: usize = PieceId::COUNT;

/// Two-column list of pieces, each toggled on or off for spawning.
pub struct SettingsScene {
    regions: HitRegions,
    cursor: usize,
    click: Edge,
    confirm: Edge,
    up: Edge,
    down: Edge,
    left: Edge,
    right: Edge,
}

impl SettingsScene {
    pub fn new() -> Self {
        Self {
            regions: HitRegions::default(),
            cursor: 0,
            click: Edge::default(),
            confirm: Edge::default(),
            up: Edge::default(),
            down: Edge::default(),
            left: Edge::default(),
            right: Edge::default(),
        }
    }

    /// Moves the keyboard cursor. Pieces run down the left column then the
    /// right one; BACK sits below both.
    fn navigate(&mut self, up: bool, down: bool, sideways: bool) {
        if self.cursor == BACK_SLOT {
            if up {
                self.cursor = ROWS - 1;
            }
            return;
        }
        let (row, column) = (self.cursor % ROWS, self.cursor / ROWS);
        if up && row > 0 {
            self.cursor -= 1;
        }
        if down {
            self.cursor = if row + 1 < ROWS { self.cursor + 1 } else { BACK_SLOT };
        }
        if sideways && self.cursor != BACK_SLOT {
            self.cursor = (1 - column) * ROWS + self.cursor % ROWS;
        }
    }
}

impl Default for SettingsScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for SettingsScene {
    fn tick(&mut self, ctx: &mut FrameContext<'_>, frame: &mut Frame) -> Option<SceneId> {
        let area = frame.size();
        let just_clicked = self.click.rising(ctx.pointer.left_down);

        let up = self.up.rising(ctx.keys.is_pressed(Key::Up));
        let down = self.down.rising(ctx.keys.is_pressed(Key::Down));
        let left = self.left.rising(ctx.keys.is_pressed(Key::Left));
        let right = self.right.rising(ctx.keys.is_pressed(Key::Right));
        self.navigate(up, down, left || right);
        let confirmed = self.confirm.rising(ctx.keys.is_pressed(Key::Confirm));

        draw_centered(
            frame,
            Line::from("PIECE SETTINGS"),
            row_at(area, 0.15),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        );

        let column_x = [
            area.x + area.width / 4,
            area.x + area.width / 2 + area.width / 10,
        ];
        let settings = &mut ctx.session.settings;
        for (slot, piece) in PieceId::ALL.into_iter().enumerate() {
            let enabled = settings.is_enabled(piece);
            let mark = if enabled { "[X]" } else { "[ ]" };
            let mut style = if enabled {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if slot == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            let (row, column) = (slot % ROWS, slot / ROWS);
            let y = row_at(area, 0.3) + row as u16 * 2;
            let line = Line::styled(format!("{mark} {}", piece.name()), style);
            draw_text(frame, &mut self.regions, piece.name(), line, column_x[column], y);

            let clicked = self.regions.clicked(piece.name(), ctx.pointer, just_clicked);
            if clicked || (confirmed && slot == self.cursor) {
                settings.toggle(piece);
            }
        }

        let mut back_style = Style::default().fg(Color::White);
        if self.cursor == BACK_SLOT {
            back_style = back_style.add_modifier(Modifier::REVERSED);
        }
        let back = Line::styled(BACK, back_style);
        let back_x = centered_x(area, back.width() as u16);
        draw_text(frame, &mut self.regions, BACK, back, back_x, row_at(area, 0.82));

        let back_pressed = self.regions.clicked(BACK, ctx.pointer, just_clicked)
            || (confirmed && self.cursor == BACK_SLOT);
        if back_pressed || ctx.keys.is_pressed(Key::Cancel) {
            return Some(SceneId::Title);
        }
        None
    }
}
