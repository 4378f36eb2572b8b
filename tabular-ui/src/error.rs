// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while talking to the backend or touching the page.
///
/// None of these escape an event listener: the controller logs them and
/// either routes them into conflict resolution or drops the edit.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum TabularError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse JSON: {0}")]
    Decode(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for TabularError {
    fn from(e: serde_json::Error) -> Self {
        TabularError::Decode(e.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<reqwest::Error> for TabularError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TabularError::Decode(e.to_string())
        } else {
            TabularError::Transport(e.to_string())
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<gloo_net::Error> for TabularError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => TabularError::Decode(e.to_string()),
            other => TabularError::Transport(other.to_string()),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for TabularError {
    fn from(e: wasm_bindgen::JsValue) -> Self {
        TabularError::Dom(format!("{e:?}"))
    }
}
