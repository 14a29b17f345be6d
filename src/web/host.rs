use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Request, RequestInit, Response, Window};

use crate::api::{AchievementResponse, ScoresPayload, user_from_path};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{Host, Ticket};

use super::with_game;

const TOAST_STYLE: &str = "position:fixed; top:16px; right:16px; white-space:pre-line; font-family:'Fira Code', monospace; font-size:15px; padding:10px 14px; color:#fff; background:linear-gradient(to right, #00b09b, #96c93d); border-radius:6px; box-shadow:0 0 16px 0 rgba(0,0,0,0.18); z-index:50;";

/// [`Host`] backed by the page the game runs in.
pub struct BrowserHost {
    window: Window,
    toast_ms: u32,
    achievement_heading: String,
}

impl BrowserHost {
    pub fn new(window: Window, config: &GameConfig) -> Self {
        Self {
            window,
            toast_ms: config.toast_ms,
            achievement_heading: config.messages.achievement_heading.clone(),
        }
    }
}

impl Host for BrowserHost {
    fn current_user(&self) -> String {
        self.window
            .location()
            .pathname()
            .ok()
            .and_then(|path| user_from_path(&path).map(str::to_owned))
            .unwrap_or_default()
    }

    fn navigate(&mut self, url: &str) {
        if let Err(err) = self.window.location().set_href(url) {
            log::error!("navigation to {url} failed: {}", GameError::from(err));
        }
    }

    fn alert(&mut self, text: &str) {
        self.window.alert_with_message(text).ok();
    }

    fn notify(&mut self, title: &str, body: &str) {
        let text = format!("{}\n{title}\n{body}", self.achievement_heading);
        if let Err(err) = show_toast(&self.window, &text, self.toast_ms) {
            log::warn!("achievement toast failed: {}", GameError::from(err));
        }
    }

    fn check_achievement(&mut self, ticket: Ticket, url: String, payload: ScoresPayload) {
        let window = self.window.clone();
        spawn_local(async move {
            let response = match post_scores(&window, &url, &payload).await {
                Ok(resp) => read_text(&resp).await.and_then(|raw| AchievementResponse::parse(&raw)),
                Err(err) => {
                    log::debug!("achievement check failed: {err}");
                    None
                }
            };
            with_game(|game| game.achievement_checked(ticket, response));
        });
    }

    fn submit_result(&mut self, ticket: Ticket, url: String, payload: ScoresPayload) {
        let window = self.window.clone();
        spawn_local(async move {
            let ok = match post_scores(&window, &url, &payload).await {
                Ok(resp) => resp.ok(),
                Err(err) => {
                    log::error!("result submission failed: {err}");
                    false
                }
            };
            with_game(|game| game.result_submitted(ticket, ok));
        });
    }
}

async fn post_scores(
    window: &Window,
    url: &str,
    payload: &ScoresPayload,
) -> Result<Response, GameError> {
    let body = serde_json::to_string(payload).map_err(GameError::Encode)?;
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(url, &opts)?;
    request
        .headers()
        .set("Accept", "application/json, text/plain")?;
    request
        .headers()
        .set("Content-Type", "application/json;charset=UTF-8")?;
    let value = JsFuture::from(window.fetch_with_request(&request)).await?;
    Ok(value.dyn_into::<Response>()?)
}

async fn read_text(response: &Response) -> Option<String> {
    let promise = response.text().ok()?;
    JsFuture::from(promise).await.ok()?.as_string()
}

fn show_toast(window: &Window, text: &str, duration_ms: u32) -> Result<(), JsValue> {
    let doc = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    let toast = doc.create_element("div")?;
    toast.set_class_name("sd-toast");
    toast.set_text_content(Some(text));
    toast.set_attribute("style", TOAST_STYLE)?;
    body.append_child(&toast)?;

    let dismiss = Closure::once_into_js(move || toast.remove());
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        dismiss.unchecked_ref(),
        duration_ms as i32,
    )?;
    Ok(())
}
