// src/notifications.rs

use axum::http::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::{Value, json};

pub const PRODUCT_ADDED_MESSAGE: &str = "Product added successfully!";
pub const PRODUCT_FAILED_MESSAGE: &str = "Failed to add product";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Krótkotrwały komunikat (toast) wysyłany do przeglądarki przez `HX-Trigger`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn product_added() -> Self {
        Self::success(PRODUCT_ADDED_MESSAGE)
    }

    pub fn product_failed() -> Self {
        Self::error(PRODUCT_FAILED_MESSAGE)
    }

    pub fn trigger_payload(&self) -> Value {
        json!({ "showMessage": self })
    }

    pub fn into_headers(self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let payload = self.trigger_payload();
        match HeaderValue::from_str(&payload.to_string()) {
            Ok(val) => {
                headers.insert("HX-Trigger", val);
            }
            Err(e) => {
                tracing::warn!("Nie można zbudować nagłówka HX-Trigger: {}", e);
            }
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_payload_uses_show_message_event() {
        let payload = Notification::product_added().trigger_payload();
        assert_eq!(
            payload,
            json!({
                "showMessage": {
                    "message": "Product added successfully!",
                    "type": "success"
                }
            })
        );
    }

    #[test]
    fn failure_notification_lands_in_hx_trigger_header() {
        let headers = Notification::product_failed().into_headers();
        let raw = headers
            .get("HX-Trigger")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        let parsed: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed["showMessage"]["message"], "Failed to add product");
        assert_eq!(parsed["showMessage"]["type"], "error");
    }
}
