use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::Frame;

use super::{draw_label, draw_text, render, Edge, FrameContext, HitRegions, Scene, SceneId};
use crate::game::{Game, GameEvent, TickOutcome};
use crate::input::FrameInput;
use crate::session::Session;

const SETTINGS: &str = "settings";
const SETTINGS_LABEL: &str = "⚙ Settings";

pub struct GameScene {
    game: Game,
    regions: HitRegions,
    click: Edge,
}

impl GameScene {
    pub fn new(session: &Session) -> Self {
        Self {
            game: Game::new(session),
            regions: HitRegions::default(),
            click: Edge::default(),
        }
    }
}

impl Scene for GameScene {
    fn tick(&mut self, ctx: &mut FrameContext<'_>, frame: &mut Frame) -> Option<SceneId> {
        let input = FrameInput::poll(ctx.keys);
        if self.game.tick(input, ctx.dt, ctx.session) == TickOutcome::Exit {
            return Some(SceneId::Title);
        }
        for event in self.game.take_events() {
            if let GameEvent::GameReset = event {
                info!(score = ctx.session.score, "game over");
            }
        }

        let area = frame.size();
        render::draw_blocks(frame, area, self.game.render_blocks());

        let hovered = self.regions.hovered(SETTINGS, ctx.pointer);
        let label_style = if hovered {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let label = Line::styled(SETTINGS_LABEL, label_style);
        let label_x = (area.x + area.width).saturating_sub(label.width() as u16 + 1);
        draw_text(frame, &mut self.regions, SETTINGS, label, label_x, area.y);

        draw_label(
            frame,
            Line::styled("ESC: menu", Style::default().fg(Color::DarkGray)),
            area.x + 1,
            area.y,
        );
        draw_label(
            frame,
            Line::styled(
                ctx.session.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            area.x + 1,
            area.y + 2,
        );

        let just_clicked = self.click.rising(ctx.pointer.left_down);
        if self.regions.clicked(SETTINGS, ctx.pointer, just_clicked) {
            return Some(SceneId::Settings);
        }
        None
    }
}
