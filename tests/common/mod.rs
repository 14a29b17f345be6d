// Recording fakes for driving `Game` without a browser.
#![allow(dead_code)]

use square_drag::api::ScoresPayload;
use square_drag::geometry::{distance_rule, squareness_score};
use square_drag::render::default_setup;
use square_drag::{Game, GameBuilder, Host, Point, Surface, Ticket};

#[derive(Default)]
pub struct RecordingSurface {
    pub ops: Vec<String>,
    pub font: String,
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        600.0
    }
    fn height(&self) -> f64 {
        400.0
    }
    fn clear(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
        self.ops.push("clear".into());
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(format!("rect {x} {y} {w} {h}"));
    }
    fn fill_text(&mut self, text: &str, _x: f64, _y: f64) {
        self.ops.push(format!("text {text}"));
    }
    fn draw_circle(&mut self, _center: Point, _radius: f64, fill: &str) {
        self.ops.push(format!("circle {fill}"));
    }
    fn set_line_width(&mut self, _width: f64) {}
    fn set_stroke_color(&mut self, _color: &str) {}
    fn set_fill_color(&mut self, _color: &str) {}
    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }
    fn set_text_align(&mut self, _align: &str) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Navigate(String),
    Alert(String),
    Notify(String, String),
    Achievement(Ticket, String, Vec<f64>),
    Submit(Ticket, String, Vec<f64>),
}

pub struct RecordingHost {
    pub user: String,
    pub calls: Vec<HostCall>,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self {
            user: "alice".into(),
            calls: Vec::new(),
        }
    }
}

impl RecordingHost {
    pub fn achievement_tickets(&self) -> Vec<Ticket> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Achievement(ticket, _, _) => Some(*ticket),
                _ => None,
            })
            .collect()
    }

    pub fn submissions(&self) -> Vec<(Ticket, String, Vec<f64>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Submit(ticket, url, scores) => Some((*ticket, url.clone(), scores.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn current_user(&self) -> String {
        self.user.clone()
    }
    fn navigate(&mut self, url: &str) {
        self.calls.push(HostCall::Navigate(url.into()));
    }
    fn alert(&mut self, text: &str) {
        self.calls.push(HostCall::Alert(text.into()));
    }
    fn notify(&mut self, title: &str, body: &str) {
        self.calls.push(HostCall::Notify(title.into(), body.into()));
    }
    fn check_achievement(&mut self, ticket: Ticket, url: String, payload: ScoresPayload) {
        self.calls.push(HostCall::Achievement(ticket, url, payload.scores));
    }
    fn submit_result(&mut self, ticket: Ticket, url: String, payload: ScoresPayload) {
        self.calls.push(HostCall::Submit(ticket, url, payload.scores));
    }
}

pub type TestGame = Game<RecordingSurface, RecordingHost>;

/// Stock rule and scoring, three rounds.
pub fn stock_game() -> TestGame {
    GameBuilder::new(RecordingHost::default())
        .rule(distance_rule)
        .calc(squareness_score)
        .surface(RecordingSurface::default())
        .setup(default_setup)
        .max_rounds(3)
        .build()
        .expect("stock game builds")
}

pub fn drag(game: &mut TestGame, from: (f64, f64), to: (f64, f64)) {
    game.pointer_down(from.into());
    game.pointer_move(to.into());
    game.pointer_up(to.into());
}
