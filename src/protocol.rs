//! Wire types exchanged with the quiz server.
//!
//! The server sends partial snapshots: a `correct_char` reply may carry only the
//! word, an `incorrect` reply only lives and the deduction. Every field of
//! [`GameState`] is therefore optional and absent means "unchanged".

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ControllerError, Result};

/// Outcome of a submitted answer or skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    CorrectChar,
    WordCompleted,
    Incorrect,
    Skipped,
    Win,
    Lose,
    /// Anything else the server may answer (it uses `"error"` for invalid state).
    Unknown(String),
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Win | Status::Lose)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::CorrectChar => "correct_char",
            Status::WordCompleted => "word_completed",
            Status::Incorrect => "incorrect",
            Status::Skipped => "skipped",
            Status::Win => "win",
            Status::Lose => "lose",
            Status::Unknown(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "correct_char" => Status::CorrectChar,
            "word_completed" => Status::WordCompleted,
            "incorrect" => Status::Incorrect,
            "skipped" => Status::Skipped,
            "win" => Status::Win,
            "lose" => Status::Lose,
            _ => Status::Unknown(s),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

/// The two characters shown to the player, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWordInfo")]
pub struct WordInfo {
    pub word: [String; 2],
}

impl WordInfo {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            word: [first.into(), second.into()],
        }
    }
}

// The server serialises the word as a plain string ("你好") alongside its own
// bookkeeping fields; clients and fixtures may also send an array of characters.
#[derive(Deserialize)]
struct RawWordInfo {
    word: RawWord,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWord {
    Text(String),
    Chars(Vec<String>),
}

impl TryFrom<RawWordInfo> for WordInfo {
    type Error = String;

    fn try_from(raw: RawWordInfo) -> std::result::Result<Self, Self::Error> {
        let chars: Vec<String> = match raw.word {
            RawWord::Text(text) => text.chars().map(|c| c.to_string()).collect(),
            RawWord::Chars(chars) => chars,
        };
        let count = chars.len();
        let word: [String; 2] = chars
            .try_into()
            .map_err(|_| format!("word must have exactly 2 characters, got {count}"))?;
        Ok(WordInfo { word })
    }
}

fn lenient_word<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<WordInfo>, D::Error> {
    let raw = Option::<RawWordInfo>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| {
        WordInfo::try_from(raw)
            .map_err(|e| warn!("dropping word_info: {e}"))
            .ok()
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lives: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// A word of the wrong length is dropped here so the rest of the reply
    /// (status, score, lives) still applies.
    #[serde(
        default,
        deserialize_with = "lenient_word",
        skip_serializing_if = "Option::is_none"
    )]
    pub word_info: Option<WordInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deducted_points: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deducted_points: Option<u32>,
}

impl ServerResponse {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            game_state: None,
            deducted_points: None,
        }
    }

    /// Parse a response body. Any JSON that is not a `ServerResponse` is malformed.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(ControllerError::from)
    }

    /// Points deducted by this answer; top-level field wins over the nested one.
    pub fn deducted_points(&self) -> u32 {
        self.deducted_points
            .or_else(|| self.game_state.as_ref().and_then(|s| s.deducted_points))
            .unwrap_or(0)
    }

    pub fn lives(&self) -> Option<i32> {
        self.game_state.as_ref().and_then(|s| s.lives)
    }

    pub fn score(&self) -> Option<u32> {
        self.game_state.as_ref().and_then(|s| s.score)
    }

    pub fn word_info(&self) -> Option<&WordInfo> {
        self.game_state.as_ref().and_then(|s| s.word_info.as_ref())
    }
}

/// Body of `POST /submit_answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitAnswer<'a> {
    pub pinyin: &'a str,
}

impl SubmitAnswer<'_> {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(ControllerError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_word_info_with_bookkeeping_fields() {
        let body = r#"{"status":"word_completed","game_state":{"score":3,
            "word_info":{"word":"木头","pinyin":["mu","tou"],"char_index":0,
            "mistake_made_on_char":[false,false]}}}"#;
        let resp = ServerResponse::parse(body).unwrap();
        assert_eq!(resp.status, Status::WordCompleted);
        assert_eq!(resp.score(), Some(3));
        assert_eq!(resp.word_info(), Some(&WordInfo::new("木", "头")));
    }

    #[test]
    fn three_character_word_is_dropped_but_reply_kept() {
        let body = r#"{"status":"word_completed","game_state":{"score":1,"word_info":{"word":"电风扇"}}}"#;
        let resp = ServerResponse::parse(body).unwrap();
        assert_eq!(resp.status, Status::WordCompleted);
        assert_eq!(resp.score(), Some(1));
        assert_eq!(resp.word_info(), None);
    }

    #[test]
    fn non_object_word_info_is_malformed() {
        let body = r#"{"status":"skipped","game_state":{"word_info":42}}"#;
        assert!(matches!(
            ServerResponse::parse(body),
            Err(ControllerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn nested_deduction_is_read() {
        let resp = ServerResponse::parse(
            r#"{"status":"incorrect","game_state":{"lives":8,"deducted_points":2}}"#,
        )
        .unwrap();
        assert_eq!(resp.deducted_points(), 2);
        assert_eq!(resp.lives(), Some(8));
    }

    #[test]
    fn unknown_status_is_kept() {
        let resp = ServerResponse::parse(r#"{"status":"error","message":"Invalid state"}"#).unwrap();
        assert_eq!(resp.status, Status::Unknown("error".into()));
        assert!(!resp.status.is_terminal());
    }
}
