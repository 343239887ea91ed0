//! HTMX client events and toast notifications.
//!
//! Handlers answer async actions with an `HX-Trigger` header. The page script
//! listens for `showToast` and the named events (e.g. `cart-updated`).
//!
//! Header values must be visible ASCII, so the JSON payload is written with
//! every non-ASCII character escaped as `\uXXXX`.

use axum::http::HeaderValue;
use axum::response::{IntoResponseParts, ResponseParts};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The HTMX response header for client-side events.
pub const HX_TRIGGER: &str = "hx-trigger";

/// Toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Events to raise on the client after a response.
#[derive(Debug, Clone, Default)]
pub struct HxTrigger {
    events: Map<String, Value>,
}

impl HxTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise a bare event.
    #[must_use]
    pub fn event(mut self, name: &str) -> Self {
        self.events.insert(name.to_owned(), Value::Null);
        self
    }

    /// Show a toast.
    #[must_use]
    pub fn toast(mut self, kind: ToastKind, message: impl Into<String>) -> Self {
        self.events.insert(
            "showToast".to_owned(),
            json!({ "type": kind, "message": message.into() }),
        );
        self
    }

    /// Shorthand for a success toast.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new().toast(ToastKind::Success, message)
    }

    /// Shorthand for an error toast.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new().toast(ToastKind::Error, message)
    }

    /// Header value, or `None` when no events were added.
    #[must_use]
    pub fn header_value(&self) -> Option<HeaderValue> {
        if self.events.is_empty() {
            return None;
        }
        let json = Value::Object(self.events.clone()).to_string();
        HeaderValue::from_str(&escape_non_ascii(&json)).ok()
    }
}

impl IntoResponseParts for HxTrigger {
    type Error = std::convert::Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(value) = self.header_value() {
            res.headers_mut().insert(HX_TRIGGER, value);
        }
        Ok(res)
    }
}

/// Escape every non-ASCII character as a JSON `\uXXXX` sequence.
fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
        } else {
            for unit in ch.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    escaped
}
