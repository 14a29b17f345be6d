//! Per-frame drawing over an abstract 2D surface.

use crate::context::GameState;
use crate::geometry::{Point, ScoreTier};

/// Drawing capability the game renders through. The browser implementation
/// wraps a `CanvasRenderingContext2d`; tests record calls.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Fills a full circle. May reset the fill style.
    fn draw_circle(&mut self, center: Point, radius: f64, fill: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_stroke_color(&mut self, color: &str);
    fn set_fill_color(&mut self, color: &str);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
}

pub const INDICATOR_RADIUS: f64 = 25.0;
pub const INDICATOR_PAD: f64 = 10.0;
const INDICATOR_STRIDE: f64 = 2.0 * INDICATOR_RADIUS + INDICATOR_PAD;
const INDICATOR_ROW_Y: f64 = INDICATOR_RADIUS + INDICATOR_PAD;
const SCORE_FONT: &str = "15px consolas";
const SCORE_COLOR: &str = "white";

/// Stock style: 3px black strokes, large centred text.
pub fn default_setup(surface: &mut dyn Surface) {
    surface.set_line_width(3.0);
    surface.set_stroke_color("#000000");
    surface.set_fill_color("#000000");
    surface.set_font("50px consolas");
    surface.set_text_align("center");
}

/// Snapshot of what one frame shows.
pub struct Frame<'a> {
    pub state: GameState,
    pub remaining_ms: u32,
    pub message: &'a str,
    pub drag: Option<(Point, Point)>,
    pub scores: &'a [f64],
    pub max_rounds: usize,
}

pub fn draw_frame(
    surface: &mut dyn Surface,
    setup: Option<&dyn Fn(&mut dyn Surface)>,
    frame: &Frame<'_>,
) {
    let (w, h) = (surface.width(), surface.height());
    surface.clear(0.0, 0.0, w, h);
    draw_scene(surface, frame);
    draw_progress(surface, setup, frame);
}

fn draw_scene(surface: &mut dyn Surface, frame: &Frame<'_>) {
    let cx = surface.width() / 2.0;
    let cy = surface.height() / 2.0;
    match frame.state {
        GameState::Init => surface.fill_text("START", cx, cy),
        GameState::Play => {
            surface.fill_text(&(frame.remaining_ms / 10).to_string(), cx, cy);
            if let Some((start, end)) = frame.drag {
                surface.stroke_rect(start.x, start.y, end.x - start.x, end.y - start.y);
            }
        }
        GameState::Stop => surface.fill_text("STOP", cx, cy),
        GameState::Alert => surface.fill_text(frame.message, cx, cy),
        GameState::Reject | GameState::Pause => {}
    }
}

/// Centre of the indicator for score `index`. The last slot sits furthest
/// right; earlier slots step leftwards.
pub fn indicator_center(surface_width: f64, max_rounds: usize, index: usize) -> Point {
    let x0 = surface_width - max_rounds as f64 * INDICATOR_STRIDE;
    let steps_left = (max_rounds - 1 - index) as f64;
    Point::new(x0 - steps_left * INDICATOR_STRIDE, INDICATOR_ROW_Y)
}

fn draw_progress(
    surface: &mut dyn Surface,
    setup: Option<&dyn Fn(&mut dyn Surface)>,
    frame: &Frame<'_>,
) {
    let width = surface.width();
    for index in (0..frame.max_rounds).rev() {
        let score = frame.scores.get(index).copied();
        let tier = ScoreTier::classify(score);
        let center = indicator_center(width, frame.max_rounds, index);

        surface.draw_circle(center, INDICATOR_RADIUS, tier.color());
        reapply(surface, setup);

        if let (true, Some(score)) = (tier.has_label(), score) {
            surface.set_fill_color(SCORE_COLOR);
            surface.set_font(SCORE_FONT);
            surface.fill_text(&format!("{score:.2}"), center.x, center.y);
            reapply(surface, setup);
        }
    }
}

fn reapply(surface: &mut dyn Surface, setup: Option<&dyn Fn(&mut dyn Surface)>) {
    if let Some(setup) = setup {
        setup(surface);
    }
}
