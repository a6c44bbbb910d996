//! Decoding of the error bodies the service can return.
//!
//! Known shapes are tried in order: a validation list
//! (`{"detail": [{"msg", "loc", "type"}]}`), a plain detail string, then a
//! `message` string. Anything else falls back to the raw body text (when the
//! body is not JSON) or the HTTP status reason.

use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct ValidationDetail {
    msg: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Detail {
    List(Vec<ValidationDetail>),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    detail: Option<Detail>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// First non-blank candidate; a blank or mistyped shape falls through.
    fn message(&self) -> Option<&str> {
        let from_detail = match &self.detail {
            Some(Detail::List(items)) => items.first().map(|d| d.msg.as_str()),
            Some(Detail::Text(text)) => Some(text.as_str()),
            Some(Detail::Other(_)) | None => None,
        };
        let from_message = self.message.as_ref().and_then(|m| m.as_str());
        [from_detail, from_message]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

/// Produces the single human-readable message for a failed response.
pub fn normalize_error(body: &str, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| "Request failed".to_string())
    };

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return Some(value)
            .filter(serde_json::Value::is_object)
            .and_then(|value| serde_json::from_value::<ErrorEnvelope>(value).ok())
            .and_then(|envelope| envelope.message().map(str::to_string))
            .unwrap_or_else(fallback);
    }

    let text = body.trim();
    if text.is_empty() {
        fallback()
    } else {
        text.to_string()
    }
}
