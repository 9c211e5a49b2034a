use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Painter, Shape};
use ratatui::Frame;

use crate::shapes::{Block, BlockKind, Rgb};

const HIGHLIGHT: f32 = 1.4;
const SHADOW: f32 = 0.45;

/// Maps world space onto a terminal area: y spans `[-1, 1]`, x spans
/// `[-aspect, aspect]` so blocks stay square on cells twice as tall as wide.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    pub aspect: f64,
}

impl Viewport {
    pub fn for_area(area: Rect) -> Self {
        let height = (area.height as f64 * 2.0).max(1.0);
        Self {
            aspect: area.width as f64 / height,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [-self.aspect, self.aspect]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [-1.0, 1.0]
    }
}

pub fn to_color(rgb: Rgb) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(rgb.r), channel(rgb.g), channel(rgb.b))
}

/// Canvas shape for one block: a bevelled cube for piece cells, a flat quad
/// for walls, nothing for ghosts.
pub struct BlockShape<'a> {
    pub block: &'a Block,
    pub viewport: Viewport,
}

impl Shape for BlockShape<'_> {
    fn draw(&self, painter: &mut Painter) {
        let block = self.block;
        let Some((x0, x1, y0, y1)) = pixel_span(painter, self.viewport, block.bounds()) else {
            return;
        };

        match block.kind {
            BlockKind::Ghost => {}
            BlockKind::Boundary => {
                let color = to_color(block.color);
                for y in y0..y1 {
                    for x in x0..x1 {
                        painter.paint(x, y, color);
                    }
                }
            }
            BlockKind::Cell => {
                let face = to_color(block.color);
                let bevelled = x1 - x0 >= 3 && y1 - y0 >= 3;
                let highlight = to_color(block.color.scaled(HIGHLIGHT));
                let shadow = to_color(block.color.scaled(SHADOW));
                for y in y0..y1 {
                    for x in x0..x1 {
                        let color = if !bevelled {
                            face
                        } else if y == y0 || x == x0 {
                            highlight
                        } else if y == y1 - 1 || x == x1 - 1 {
                            shadow
                        } else {
                            face
                        };
                        painter.paint(x, y, color);
                    }
                }
            }
        }
    }
}

/// Half-open pixel span `(x0, x1, y0, y1)` covered by world bounds
/// `(left, bottom, right, top)`, or `None` when entirely off screen.
fn pixel_span(
    painter: &Painter,
    viewport: Viewport,
    (left, bottom, right, top): (f32, f32, f32, f32),
) -> Option<(usize, usize, usize, usize)> {
    let [min_x, max_x] = viewport.x_bounds();
    let [min_y, max_y] = viewport.y_bounds();
    let (left, right) = (left as f64, right as f64);
    let (bottom, top) = (bottom as f64, top as f64);
    if right < min_x || left > max_x || top < min_y || bottom > max_y {
        return None;
    }

    let (x0, y0) = painter.get_point(left.clamp(min_x, max_x), top.clamp(min_y, max_y))?;
    let (x1, y1) = painter.get_point(right.clamp(min_x, max_x), bottom.clamp(min_y, max_y))?;
    Some((x0, x1.max(x0 + 1), y0, y1.max(y0 + 1)))
}

/// Draws `blocks` in order onto `area` of the frame.
pub fn draw_blocks<'a>(frame: &mut Frame, area: Rect, blocks: impl IntoIterator<Item = &'a Block>) {
    let blocks: Vec<&Block> = blocks.into_iter().collect();
    let viewport = Viewport::for_area(area);
    let canvas = Canvas::default()
        .marker(Marker::HalfBlock)
        .x_bounds(viewport.x_bounds())
        .y_bounds(viewport.y_bounds())
        .paint(|ctx| {
            for &block in &blocks {
                ctx.draw(&BlockShape { block, viewport });
            }
        });
    frame.render_widget(canvas, area);
}
