//! Session orchestration: turns pointer input into round operations on the
//! live [`GameContext`], drives its clock, and talks to the result server
//! through the injected [`Host`].

use crate::api::{AchievementResponse, ScoresPayload};
use crate::config::GameConfig;
use crate::context::{ContextEvent, Cue, GameContext, GameState, RoundOutcome, RuleFn, ScoreFn};
use crate::error::GameError;
use crate::geometry::Point;
use crate::render::{self, Frame, Surface};

pub type Rule = Box<RuleFn>;
pub type Calc = Box<ScoreFn>;
/// Style setup applied to the surface once at build time and again after
/// every shape the progress row draws.
pub type Setup = Box<dyn Fn(&mut dyn Surface)>;

/// Bumped by every restart; responses tagged with an older id are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub session: SessionId,
    /// Rounds recorded when the request was issued.
    pub round: usize,
}

/// Everything outside the canvas the game needs from its page.
///
/// The two request methods are fire-and-forget; implementations report back
/// through [`Game::achievement_checked`] and [`Game::result_submitted`].
pub trait Host {
    fn current_user(&self) -> String;
    fn navigate(&mut self, url: &str);
    fn alert(&mut self, text: &str);
    fn notify(&mut self, title: &str, body: &str);
    fn check_achievement(&mut self, ticket: Ticket, url: String, payload: ScoresPayload);
    fn submit_result(&mut self, ticket: Ticket, url: String, payload: ScoresPayload);
}

pub struct GameBuilder<S: Surface, H: Host> {
    config: GameConfig,
    rule: Option<Rule>,
    calc: Option<Calc>,
    surface: Option<S>,
    setup: Option<Setup>,
    max_rounds: Option<usize>,
    host: H,
}

impl<S: Surface, H: Host> GameBuilder<S, H> {
    pub fn new(host: H) -> Self {
        Self {
            config: GameConfig::default(),
            rule: None,
            calc: None,
            surface: None,
            setup: None,
            max_rounds: None,
            host,
        }
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rule(mut self, rule: impl Fn(Point, Point) -> bool + 'static) -> Self {
        self.rule = Some(Box::new(rule));
        self
    }

    pub fn calc(mut self, calc: impl Fn(Point, Point) -> f64 + 'static) -> Self {
        self.calc = Some(Box::new(calc));
        self
    }

    pub fn surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Takes the result of a surface lookup; `None` makes `build` fail.
    pub fn try_surface(mut self, surface: Option<S>) -> Self {
        self.surface = surface;
        self
    }

    pub fn setup(mut self, setup: impl Fn(&mut dyn Surface) + 'static) -> Self {
        self.setup = Some(Box::new(setup));
        self
    }

    /// Overrides `GameConfig::max_rounds`.
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    pub fn build(self) -> Result<Game<S, H>, GameError> {
        let mut config = self.config;
        if let Some(rounds) = self.max_rounds {
            config.max_rounds = rounds;
        }
        config.validate()?;

        let mut surface = self
            .surface
            .ok_or_else(|| GameError::Init("drawing surface unavailable".into()))?;
        if let Some(setup) = self.setup.as_deref() {
            setup(&mut surface);
        }

        Ok(Game {
            context: GameContext::new(config.round_settings()),
            config,
            rule: self.rule,
            calc: self.calc,
            drag_start: None,
            drag_end: None,
            dragging: false,
            session: SessionId::default(),
            carry_ms: 0.0,
            surface,
            setup: self.setup,
            host: self.host,
        })
    }
}

pub struct Game<S: Surface, H: Host> {
    config: GameConfig,
    context: GameContext,
    rule: Option<Rule>,
    calc: Option<Calc>,
    drag_start: Option<Point>,
    drag_end: Option<Point>,
    dragging: bool,
    session: SessionId,
    carry_ms: f64,
    surface: S,
    setup: Option<Setup>,
    host: H,
}

impl<S: Surface, H: Host> Game<S, H> {
    pub fn context(&self) -> &GameContext {
        &self.context
    }

    pub fn state(&self) -> GameState {
        self.context.state()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn max_rounds(&self) -> usize {
        self.config.max_rounds
    }

    pub fn drag_start(&self) -> Option<Point> {
        self.drag_start
    }

    pub fn drag_end(&self) -> Option<Point> {
        self.drag_end
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pointer_down(&mut self, at: Point) {
        let state = self.context.state();
        if !state.accepts_round_start() {
            log::warn!("pointer down ignored while {state}");
            return;
        }
        self.drag_start = Some(at);
        self.context.start();
        self.dragging = true;
    }

    pub fn pointer_move(&mut self, at: Point) {
        if !self.dragging {
            return;
        }
        if self.context.state() == GameState::Play {
            self.drag_end = Some(at);
        } else {
            log::trace!("pointer move ignored while {}", self.context.state());
        }
    }

    pub fn pointer_up(&mut self, _at: Point) {
        self.dragging = false;
        let state = self.context.state();
        if state != GameState::Play {
            log::warn!("pointer up ignored while {state}");
            return;
        }

        let (Some(start), Some(end)) = (self.drag_start, self.drag_end) else {
            self.context.stop();
            self.show(Cue::DragRequired, self.config.notice_ms);
            return;
        };

        let outcome = self
            .context
            .end(self.calc.as_deref(), self.rule.as_deref(), start, end);
        if outcome != RoundOutcome::Success {
            log::debug!("round rejected: {outcome:?}");
        }

        let scores = self.context.scores();
        let user = self.host.current_user();
        let ticket = self.ticket();
        self.host.check_achievement(
            ticket,
            self.config.endpoints.achievement_url(&user),
            ScoresPayload {
                scores: scores.clone(),
            },
        );

        if scores.len() >= self.config.max_rounds {
            self.context.stop();
            log::info!("session finished with {} rounds", scores.len());
            self.host.submit_result(
                ticket,
                self.config.endpoints.result_url(&user),
                ScoresPayload { scores },
            );
            return;
        }

        self.drag_start = None;
        self.drag_end = None;
    }

    pub fn pointer_out(&mut self) {
        log::debug!("pointer out");
    }

    pub fn pause(&mut self) {
        self.context.pause();
    }

    /// Drops the live context and every pending timer with it.
    pub fn restart(&mut self) {
        self.drag_start = None;
        self.drag_end = None;
        self.dragging = false;
        self.context = GameContext::new(self.config.round_settings());
        self.session = SessionId(self.session.0 + 1);
        log::debug!("restart, session {}", self.session.0);
    }

    /// Feeds wall-clock time into the context, one countdown step at a time.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if elapsed_ms.is_nan() || elapsed_ms <= 0.0 {
            return;
        }
        let step = f64::from(self.config.tick_ms);
        self.carry_ms += elapsed_ms;
        while self.carry_ms >= step {
            self.carry_ms -= step;
            for event in self.context.tick() {
                self.on_context_event(event);
            }
            self.context.resume_queue();
        }
    }

    pub fn achievement_checked(&mut self, ticket: Ticket, response: Option<AchievementResponse>) {
        if self.is_stale(ticket) {
            return;
        }
        if let Some((title, body)) = response.as_ref().and_then(|r| r.notification()) {
            self.host.notify(title, body);
        }
    }

    pub fn result_submitted(&mut self, ticket: Ticket, ok: bool) {
        if self.is_stale(ticket) {
            return;
        }
        let user = self.host.current_user();
        if ok {
            log::info!("result sent for {user}");
            self.host.navigate(&self.config.endpoints.ranking_url(&user));
        } else {
            log::error!("result submission failed for {user}");
            self.host.alert(&self.config.messages.submit_failed);
            self.host.navigate(&self.config.endpoints.home);
        }
    }

    pub fn render_frame(&mut self) {
        let scores = self.context.scores();
        let drag = match (self.drag_start, self.drag_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };
        let frame = Frame {
            state: self.context.state(),
            remaining_ms: self.context.remaining_ms(),
            message: self.context.message(),
            drag,
            scores: &scores,
            max_rounds: self.config.max_rounds,
        };
        render::draw_frame(&mut self.surface, self.setup.as_deref(), &frame);
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            session: self.session,
            round: self.context.rounds_played(),
        }
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        if ticket.session != self.session {
            log::debug!(
                "dropping response for session {} (live {})",
                ticket.session.0,
                self.session.0
            );
            return true;
        }
        false
    }

    fn show(&mut self, cue: Cue, duration_ms: u32) {
        let text = self.config.messages.for_cue(cue).to_owned();
        self.context.show_message(cue, text, duration_ms);
    }

    fn on_context_event(&mut self, event: ContextEvent) {
        match event {
            ContextEvent::Expired => self.show(Cue::TimeOut, self.config.time_out_ms),
            ContextEvent::MessageFinished(Cue::Retry) => {}
            ContextEvent::MessageFinished(Cue::DragRequired) => {
                self.show(Cue::Restarting, self.config.notice_ms)
            }
            ContextEvent::MessageFinished(Cue::TimeOut | Cue::Restarting) => self.restart(),
        }
    }
}
