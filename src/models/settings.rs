//! Application settings document.

use crate::models::game::DEFAULT_POINTS_LIMIT;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Points limit used when a game is started without one (11 or 21).
    #[serde(default = "default_game_type")]
    pub default_game_type: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_game_type() -> u32 {
    DEFAULT_POINTS_LIMIT
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_game_type: default_game_type(),
            theme: default_theme(),
        }
    }
}

/// Partial settings change; absent fields keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub default_game_type: Option<u32>,
    pub theme: Option<String>,
}

impl Settings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(points) = update.default_game_type.filter(|p| *p > 0) {
            self.default_game_type = points;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
    }
}
