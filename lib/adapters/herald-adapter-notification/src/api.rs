//! Bot API request and response bodies.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use herald_domain::InlineKeyboard;

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditMessageRequest {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: String,
    pub parse_mode: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerCallbackRequest {
    pub callback_query_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetWebhookRequest {
    pub url: String,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<u16>,
}

impl ApiResponse {
    pub fn into_result(self, method: &str) -> Result<serde_json::Value> {
        if !self.ok {
            bail!(
                "telegram {method} rejected (code {}): {}",
                self.error_code.map_or_else(|| "?".to_string(), |c| c.to_string()),
                self.description.unwrap_or_else(|| "no description".to_string())
            );
        }
        Ok(self.result.unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_is_surfaced() {
        let response: ApiResponse = serde_json::from_value(serde_json::json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        }))
        .unwrap();

        let err = response.into_result("sendMessage").unwrap_err();
        assert_eq!(
            err.to_string(),
            "telegram sendMessage rejected (code 400): Bad Request: chat not found"
        );
    }

    #[test]
    fn test_api_success_returns_result() {
        let response: ApiResponse = serde_json::from_value(serde_json::json!({
            "ok": true,
            "result": { "message_id": 12 }
        }))
        .unwrap();

        assert_eq!(
            response.into_result("sendMessage").unwrap()["message_id"],
            12
        );
    }
}
