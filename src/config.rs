//! Runtime configuration. Every field has a default so a page can pass a
//! partial JSON object (or nothing at all) to `start_game_with_config`.

use log::LevelFilter;
use serde::Deserialize;

use crate::context::{Cue, RoundSettings};
use crate::error::GameError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// DOM id of the canvas the game draws on.
    pub canvas_id: String,
    pub max_rounds: usize,
    pub round_ms: u32,
    pub tick_ms: u32,
    pub retry_ms: u32,
    pub time_out_ms: u32,
    /// Duration of each of the two notices shown after a degenerate drag.
    pub notice_ms: u32,
    pub toast_ms: u32,
    pub endpoints: Endpoints,
    pub messages: Messages,
    pub log_level: LevelFilter,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_id: "canvas".into(),
            max_rounds: 3,
            round_ms: 3000,
            tick_ms: 10,
            retry_ms: 1000,
            time_out_ms: 1500,
            notice_ms: 1500,
            toast_ms: 3000,
            endpoints: Endpoints::default(),
            messages: Messages::default(),
            log_level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.max_rounds == 0 {
            return Err(GameError::InvalidConfig("max_rounds must be at least 1".into()));
        }
        if self.tick_ms == 0 {
            return Err(GameError::InvalidConfig("tick_ms must be positive".into()));
        }
        if self.round_ms == 0 || self.round_ms % self.tick_ms != 0 {
            return Err(GameError::InvalidConfig(format!(
                "round_ms ({}) must be a positive multiple of tick_ms ({})",
                self.round_ms, self.tick_ms
            )));
        }
        Ok(())
    }

    pub fn round_settings(&self) -> RoundSettings {
        RoundSettings {
            round_ms: self.round_ms,
            tick_ms: self.tick_ms,
            retry_ms: self.retry_ms,
            retry_message: self.messages.retry.clone(),
        }
    }
}

/// Path prefixes of the result server.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub achievement: String,
    pub result: String,
    pub ranking: String,
    pub home: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            achievement: "/arch".into(),
            result: "/send_result".into(),
            ranking: "/ranking".into(),
            home: "/".into(),
        }
    }
}

/// User-facing texts.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Messages {
    pub retry: String,
    pub time_out: String,
    pub drag_required: String,
    pub restarting: String,
    pub submit_failed: String,
    pub achievement_heading: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            retry: "Please try again.".into(),
            time_out: "Time out!".into(),
            drag_required: "Please drag the mouse.".into(),
            restarting: "Restarting the game.".into(),
            submit_failed: "Failed to send the result to the server.".into(),
            achievement_heading: "Achievement unlocked".into(),
        }
    }
}

impl Messages {
    pub fn for_cue(&self, cue: Cue) -> &str {
        match cue {
            Cue::Retry => &self.retry,
            Cue::TimeOut => &self.time_out,
            Cue::DragRequired => &self.drag_required,
            Cue::Restarting => &self.restarting,
        }
    }
}
