//! Error taxonomy for the quiz controller.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A required element id is not present in the hosting page.
    #[error("missing element #{0}")]
    MissingElement(&'static str),
    /// `fetch` rejected (offline, CORS, aborted).
    #[error("network failure: {0}")]
    Network(String),
    #[error("server answered with HTTP {0}")]
    HttpStatus(u16),
    /// The server payload is not a well-formed `ServerResponse`.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),
    #[error("invalid page configuration: {0}")]
    InvalidConfig(String),
    #[error("dom error: {0}")]
    Dom(String),
}

impl ControllerError {
    /// Transport-level failures the player can recover from by retrying.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ControllerError::Network(_) | ControllerError::HttpStatus(_)
        )
    }
}

impl From<ControllerError> for JsValue {
    fn from(err: ControllerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for ControllerError {
    fn from(value: JsValue) -> Self {
        ControllerError::Dom(
            value
                .as_string()
                .unwrap_or_else(|| format!("{value:?}")),
        )
    }
}

impl From<serde_json::Error> for ControllerError {
    fn from(err: serde_json::Error) -> Self {
        ControllerError::MalformedResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ControllerError>;
