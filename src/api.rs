//! Wire format of the two result-server calls and URL building.

use serde::{Deserialize, Serialize};

use crate::config::Endpoints;

/// Body of both `POST` requests.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoresPayload {
    pub scores: Vec<f64>,
}

/// Achievement check reply. A notification is due only when both fields are
/// present and non-empty.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct AchievementResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl AchievementResponse {
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn notification(&self) -> Option<(&str, &str)> {
        match (self.title.as_deref(), self.body.as_deref()) {
            (Some(title), Some(body)) if !title.is_empty() && !body.is_empty() => {
                Some((title, body))
            }
            _ => None,
        }
    }
}

impl Endpoints {
    pub fn achievement_url(&self, user: &str) -> String {
        join(&self.achievement, user)
    }

    pub fn result_url(&self, user: &str) -> String {
        join(&self.result, user)
    }

    pub fn ranking_url(&self, user: &str) -> String {
        join(&self.ranking, user)
    }
}

fn join(prefix: &str, user: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), user)
}

/// Last non-empty `/`-separated segment of a page path.
pub fn user_from_path(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).next_back()
}
