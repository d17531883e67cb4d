//! Chat-side types: inbound bot updates and outbound messages.

use serde::{Deserialize, Serialize};

/// Bot update pushed to the chat webhook. Only the parts the bot reacts to
/// are modelled; everything else is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUpdate {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<ChatUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

impl ChatUser {
    /// `@username` when set, otherwise the first name.
    pub fn mention(&self) -> String {
        match (&self.username, &self.first_name) {
            (Some(username), _) => format!("@{username}"),
            (None, Some(first_name)) => first_name.clone(),
            (None, None) => format!("user {}", self.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: ChatUser,
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl InlineButton {
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: Some(url.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn single_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            inline_keyboard: vec![buttons],
        }
    }
}

/// HTML-formatted text bound for the configured destination chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_update() {
        let payload = serde_json::json!({
            "update_id": 10,
            "callback_query": {
                "id": "cb-1",
                "from": { "id": 5, "is_bot": false, "first_name": "Ada", "username": "ada" },
                "message": {
                    "message_id": 99,
                    "chat": { "id": -100, "type": "group" },
                    "text": "🔥 Alert firing: HighLoad"
                },
                "data": "accept_alert"
            }
        });

        let update: ChatUpdate = serde_json::from_value(payload).unwrap();
        let callback = update.callback_query.unwrap();
        assert_eq!(callback.data.as_deref(), Some("accept_alert"));
        assert_eq!(callback.from.mention(), "@ada");
        let message = callback.message.unwrap();
        assert_eq!(message.chat.id, -100);
        assert_eq!(message.message_id, 99);
    }

    #[test]
    fn test_keyboard_skips_absent_fields() {
        let keyboard = InlineKeyboard::single_row(vec![InlineButton::link("Open", "https://x")]);
        assert_eq!(
            serde_json::to_value(&keyboard).unwrap(),
            serde_json::json!({ "inline_keyboard": [[{ "text": "Open", "url": "https://x" }]] })
        );
    }
}
