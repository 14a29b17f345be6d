//! Round state machine.
//!
//! `GameContext` owns the authoritative [`GameState`], the countdown of the
//! running round, the score log and the queue of timed messages. Time only
//! moves through [`GameContext::tick`], one countdown step per call, so the
//! browser timer and the tests drive it the same way.

use std::collections::VecDeque;
use std::fmt;

use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Ready for a new round.
    Init,
    /// Round running, countdown active.
    Play,
    /// Round could not be evaluated; a new round may start.
    Reject,
    /// Countdown halted. Nothing leaves this state.
    Pause,
    /// Session over.
    Stop,
    /// A timed message is on screen.
    Alert,
}

impl GameState {
    pub fn accepts_round_start(self) -> bool {
        matches!(self, GameState::Init | GameState::Reject)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Init => "init",
            GameState::Play => "play",
            GameState::Reject => "reject",
            GameState::Pause => "pause",
            GameState::Stop => "stop",
            GameState::Alert => "alert",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundOutcome {
    Success,
    Failure,
    Error,
}

/// Identifies a timed message so its follow-up can run once it elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Rule failed; the context returns to `Init` by itself.
    Retry,
    TimeOut,
    DragRequired,
    Restarting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextEvent {
    /// Countdown hit zero while the round was still in `Play`.
    Expired,
    /// A message elapsed and the state captured before it was restored.
    MessageFinished(Cue),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundSettings {
    pub round_ms: u32,
    pub tick_ms: u32,
    pub retry_ms: u32,
    pub retry_message: String,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            round_ms: 3000,
            tick_ms: 10,
            retry_ms: 1000,
            retry_message: "Please try again.".into(),
        }
    }
}

#[derive(Debug)]
struct TimedMessage {
    cue: Cue,
    text: String,
    duration_ms: u32,
}

#[derive(Debug)]
struct ActiveMessage {
    cue: Cue,
    remaining_ms: u32,
    restore: GameState,
}

pub type ScoreFn = dyn Fn(Point, Point) -> f64;
pub type RuleFn = dyn Fn(Point, Point) -> bool;

#[derive(Debug)]
pub struct GameContext {
    settings: RoundSettings,
    state: GameState,
    scores: Vec<f64>,
    remaining_ms: u32,
    countdown_armed: bool,
    message: String,
    active: Option<ActiveMessage>,
    queued: VecDeque<TimedMessage>,
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(RoundSettings::default())
    }
}

impl GameContext {
    pub fn new(settings: RoundSettings) -> Self {
        Self {
            remaining_ms: settings.round_ms,
            settings,
            state: GameState::Init,
            scores: Vec::new(),
            countdown_armed: false,
            message: String::new(),
            active: None,
            queued: VecDeque::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Copy of the score log; later appends never show up in it.
    pub fn scores(&self) -> Vec<f64> {
        self.scores.clone()
    }

    pub fn rounds_played(&self) -> usize {
        self.scores.len()
    }

    pub fn tick_ms(&self) -> u32 {
        self.settings.tick_ms
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown_armed
    }

    /// Messages waiting behind the one on screen.
    pub fn queued_messages(&self) -> usize {
        self.queued.len()
    }

    /// Begins a round. Returns `false` without touching anything unless the
    /// state is `Init` or `Reject`.
    pub fn start(&mut self) -> bool {
        if !self.state.accepts_round_start() {
            return false;
        }
        self.state = GameState::Play;
        self.remaining_ms = self.settings.round_ms;
        self.countdown_armed = true;
        true
    }

    pub fn pause(&mut self) {
        self.state = GameState::Pause;
    }

    pub fn stop(&mut self) {
        self.state = GameState::Stop;
    }

    /// Evaluates a finished drag.
    pub fn end(
        &mut self,
        calc: Option<&ScoreFn>,
        rule: Option<&RuleFn>,
        p1: Point,
        p2: Point,
    ) -> RoundOutcome {
        let (Some(calc), Some(rule)) = (calc, rule) else {
            log::error!(
                "round end without {}",
                if rule.is_none() { "a rule" } else { "a scoring function" }
            );
            self.state = GameState::Reject;
            return RoundOutcome::Error;
        };

        if rule(p1, p2) {
            self.scores.push(calc(p1, p2));
            self.state = GameState::Init;
            self.remaining_ms = self.settings.round_ms;
            log::debug!("scores: {:?}", self.scores);
            RoundOutcome::Success
        } else {
            let text = self.settings.retry_message.clone();
            self.show_message(Cue::Retry, text, self.settings.retry_ms);
            RoundOutcome::Failure
        }
    }

    /// Queues a message. It goes on screen immediately when nothing else is
    /// showing, otherwise after the messages ahead of it have elapsed.
    pub fn show_message(&mut self, cue: Cue, text: impl Into<String>, duration_ms: u32) {
        self.queued.push_back(TimedMessage {
            cue,
            text: text.into(),
            duration_ms,
        });
        if self.active.is_none() {
            self.activate_next();
        }
    }

    /// Advances both clocks by one countdown step.
    pub fn tick(&mut self) -> Vec<ContextEvent> {
        let mut events = Vec::new();
        let step = self.settings.tick_ms;

        if self.countdown_armed {
            if self.state != GameState::Play {
                self.countdown_armed = false;
            } else {
                self.remaining_ms = self.remaining_ms.saturating_sub(step);
                if self.remaining_ms == 0 {
                    self.countdown_armed = false;
                    events.push(ContextEvent::Expired);
                }
            }
        }

        if let Some(active) = self.active.as_mut() {
            active.remaining_ms = active.remaining_ms.saturating_sub(step);
            if active.remaining_ms == 0 {
                if let Some(done) = self.active.take() {
                    self.state = done.restore;
                    if done.cue == Cue::Retry {
                        self.state = GameState::Init;
                    }
                    events.push(ContextEvent::MessageFinished(done.cue));
                }
            }
        }

        events
    }

    /// Starts the next queued message once the owner has handled the
    /// follow-up of the previous one.
    pub fn resume_queue(&mut self) {
        if self.active.is_none() {
            self.activate_next();
        }
    }

    fn activate_next(&mut self) {
        let Some(next) = self.queued.pop_front() else {
            return;
        };
        let restore = self.state;
        self.state = GameState::Alert;
        self.message = next.text;
        self.active = Some(ActiveMessage {
            cue: next.cue,
            remaining_ms: next.duration_ms.max(1),
            restore,
        });
    }
}
