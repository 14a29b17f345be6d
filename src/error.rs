use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Failed to initialize the game: {0}")]
    Init(String),
    #[error("Malformed configuration: {source}")]
    Config {
        #[from]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),
    #[error("Browser call failed: {0}")]
    Js(String),
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
