use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::Frame;

use super::{centered_x, draw_centered, draw_text, render, row_at, Edge, FrameContext, HitRegions, Scene, SceneId};
use crate::input::{Key, KeySource};
use crate::shapes::{self, Block, PieceId, MINI_BLOCK_SIZE};
use crate::store::BlockStore;

const DECORATION_CAPACITY: usize = 32;

/// Mini pieces scattered around the menu.
const DECORATIONS: [(PieceId, f32, f32); 8] = [
    (PieceId::Larry, -0.80, -0.65),
    (PieceId::Terry, -0.55, -0.50),
    (PieceId::Ivan, -0.70, -0.20),
    (PieceId::Griffin, -0.40, -0.80),
    (PieceId::Larry, 0.60, -0.60),
    (PieceId::Terry, 0.75, -0.30),
    (PieceId::Ivan, 0.40, -0.75),
    (PieceId::Griffin, 0.55, -0.45),
];

const MENU: [(&str, SceneId); 2] = [("PLAY", SceneId::Game), ("SETTINGS", SceneId::Settings)];

pub struct TitleScene {
    decorations: BlockStore<Block>,
    regions: HitRegions,
    selected: usize,
    up: Edge,
    down: Edge,
    confirm: Edge,
    click: Edge,
    anim_time: f32,
}

impl TitleScene {
    pub fn new() -> Self {
        let mut decorations = BlockStore::with_capacity(DECORATION_CAPACITY);
        for &(piece, x, y) in &DECORATIONS {
            for block in shapes::shape_sized(piece, x, y, MINI_BLOCK_SIZE) {
                decorations.store(block);
            }
        }
        Self {
            decorations,
            regions: HitRegions::default(),
            selected: 0,
            up: Edge::default(),
            down: Edge::default(),
            confirm: Edge::default(),
            click: Edge::default(),
            anim_time: 0.0,
        }
    }

    pub fn selected(&self) -> SceneId {
        MENU[self.selected].1
    }
}

impl Default for TitleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for TitleScene {
    fn tick(&mut self, ctx: &mut FrameContext<'_>, frame: &mut Frame) -> Option<SceneId> {
        self.anim_time += ctx.dt;
        let area = frame.size();

        render::draw_blocks(frame, area, self.decorations.iter().map(|(_, block)| block));

        draw_centered(frame, Line::from("B L O C K F A L L"), row_at(area, 0.25), Style::default().fg(Color::White));
        draw_centered(frame, Line::from("tetris"), row_at(area, 0.32), Style::default().fg(Color::Rgb(184, 158, 255)));
        draw_centered(frame, Line::from("────────────────────"), row_at(area, 0.38), Style::default().fg(Color::Gray));

        let up = self.up.rising(ctx.keys.is_pressed(Key::Up));
        let down = self.down.rising(ctx.keys.is_pressed(Key::Down));
        if up || down {
            self.selected = (self.selected + 1) % MENU.len();
        }

        // Mouse hover overrides the keyboard selection.
        for (i, (label, _)) in MENU.iter().enumerate() {
            if self.regions.hovered(label, ctx.pointer) {
                self.selected = i;
            }
        }

        let just_clicked = self.click.rising(ctx.pointer.left_down);
        let mut next = None;
        for (i, &(label, target)) in MENU.iter().enumerate() {
            let (text, style) = if i == self.selected {
                (format!("[ {label} ]"), Style::default().fg(Color::Gray))
            } else {
                (label.to_owned(), Style::default().fg(Color::White))
            };
            let line = Line::styled(text, style);
            let x = centered_x(area, line.width() as u16);
            draw_text(frame, &mut self.regions, label, line, x, row_at(area, 0.5) + i as u16 * 2);
            if self.regions.clicked(label, ctx.pointer, just_clicked) {
                next = Some(target);
            }
        }

        let action = match self.selected() {
            SceneId::Game => "play",
            _ => "go to settings",
        };
        let pulse = 0.55 + 0.3 * (self.anim_time * 2.5).sin();
        let grey = (pulse.clamp(0.0, 1.0) * 255.0) as u8;
        draw_centered(
            frame,
            Line::from(format!("press ENTER to {action}   ·   q to quit")),
            row_at(area, 0.86),
            Style::default().fg(Color::Rgb(grey, grey, grey)),
        );

        if self.confirm.rising(ctx.keys.is_pressed(Key::Confirm)) {
            next = Some(self.selected());
        }
        next
    }
}
