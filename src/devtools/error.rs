use std::fmt;

use tokio_tungstenite::tungstenite;

#[derive(Debug)]
pub enum DevtoolsError {
    Http(reqwest::Error),
    WebSocket(tungstenite::Error),
    Decode(serde_json::Error),
    Timeout(&'static str),
    Protocol { method: String, message: String },
    Closed,
}

impl fmt::Display for DevtoolsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevtoolsError::Http(e) => write!(f, "target list request failed: {e}"),
            DevtoolsError::WebSocket(e) => write!(f, "debugger session failed: {e}"),
            DevtoolsError::Decode(e) => write!(f, "malformed devtools payload: {e}"),
            DevtoolsError::Timeout(stage) => write!(f, "timed out during {stage}"),
            DevtoolsError::Protocol { method, message } => {
                write!(f, "{method} returned an error: {message}")
            }
            DevtoolsError::Closed => f.write_str("debugger session closed unexpectedly"),
        }
    }
}

impl std::error::Error for DevtoolsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DevtoolsError::Http(e) => Some(e),
            DevtoolsError::WebSocket(e) => Some(e),
            DevtoolsError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DevtoolsError {
    fn from(e: reqwest::Error) -> Self {
        DevtoolsError::Http(e)
    }
}

impl From<tungstenite::Error> for DevtoolsError {
    fn from(e: tungstenite::Error) -> Self {
        DevtoolsError::WebSocket(e)
    }
}

impl From<serde_json::Error> for DevtoolsError {
    fn from(e: serde_json::Error) -> Self {
        DevtoolsError::Decode(e)
    }
}
