//! Session configuration read from the hosting page.
//!
//! The game page embeds a global `initialGameState` object before the wasm module
//! runs. Older pages only expose `lives` and `score`; those sessions use the
//! fixed ten-life / ten-point rules.

use serde::Deserialize;

use crate::error::{ControllerError, Result};
use crate::protocol::{GameState, WordInfo};

pub const DEFAULT_TOTAL_LIVES: u32 = 10;
pub const DEFAULT_TARGET_SCORE: u32 = 10;
pub const DEFAULT_SUBMIT_URL: &str = "/submit_answer";
pub const DEFAULT_SKIP_URL: &str = "/skip_word";
pub const DEFAULT_RESULT_URL: &str = "/result";

/// Immutable for the lifetime of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub total_lives: u32,
    pub target_score: u32,
    pub skip_enabled: bool,
    pub submit_url: String,
    pub skip_url: String,
    pub result_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_lives: DEFAULT_TOTAL_LIVES,
            target_score: DEFAULT_TARGET_SCORE,
            skip_enabled: false,
            submit_url: DEFAULT_SUBMIT_URL.to_string(),
            skip_url: DEFAULT_SKIP_URL.to_string(),
            result_url: DEFAULT_RESULT_URL.to_string(),
        }
    }
}

/// Raw shape of `window.initialGameState`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialPage {
    #[serde(default)]
    pub lives: Option<i32>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub total_lives: Option<u32>,
    #[serde(default)]
    pub target_score: Option<u32>,
    #[serde(default)]
    pub skip_enabled: Option<bool>,
    #[serde(default)]
    pub submit_url: Option<String>,
    #[serde(default)]
    pub skip_url: Option<String>,
    #[serde(default)]
    pub result_url: Option<String>,
    #[serde(default, alias = "word_info")]
    pub word_info: Option<WordInfo>,
}

impl InitialPage {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ControllerError::InvalidConfig(e.to_string()))
    }

    /// Split into the session config and the first state snapshot.
    pub fn into_parts(self) -> Result<(Config, GameState)> {
        let defaults = Config::default();
        let config = Config {
            total_lives: self.total_lives.unwrap_or(defaults.total_lives),
            target_score: self.target_score.unwrap_or(defaults.target_score),
            skip_enabled: self.skip_enabled.unwrap_or(defaults.skip_enabled),
            submit_url: self.submit_url.unwrap_or(defaults.submit_url),
            skip_url: self.skip_url.unwrap_or(defaults.skip_url),
            result_url: self.result_url.unwrap_or(defaults.result_url),
        };
        if config.total_lives == 0 {
            return Err(ControllerError::InvalidConfig(
                "totalLives must be positive".into(),
            ));
        }
        if config.target_score == 0 {
            return Err(ControllerError::InvalidConfig(
                "targetScore must be positive".into(),
            ));
        }
        let state = GameState {
            lives: Some(self.lives.unwrap_or(config.total_lives as i32)),
            score: Some(self.score.unwrap_or(0)),
            word_info: self.word_info,
            deducted_points: None,
        };
        Ok((config, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_page_uses_fixed_rules() {
        let (config, state) = InitialPage::from_json(r#"{"lives":10,"score":0}"#)
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(state.lives, Some(10));
        assert_eq!(state.score, Some(0));
    }

    #[test]
    fn parameterized_page() {
        let page = InitialPage::from_json(
            r#"{"lives":4,"score":2,"totalLives":5,"targetScore":20,"skipEnabled":true,
                "wordInfo":{"word":["你","好"]}}"#,
        )
        .unwrap();
        let (config, state) = page.into_parts().unwrap();
        assert_eq!(config.total_lives, 5);
        assert_eq!(config.target_score, 20);
        assert!(config.skip_enabled);
        assert_eq!(state.word_info, Some(WordInfo::new("你", "好")));
    }

    #[test]
    fn zero_lives_config_is_rejected() {
        let page = InitialPage::from_json(r#"{"totalLives":0}"#).unwrap();
        assert!(matches!(
            page.into_parts(),
            Err(ControllerError::InvalidConfig(_))
        ));
    }
}
