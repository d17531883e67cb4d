//! Telegram Bot API notification adapter.

mod api;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use herald_domain::{OutboundMessage, TelegramConfig};
use herald_ports::NotificationPort;

pub use api::{
    AnswerCallbackRequest, ApiResponse, EditMessageRequest, SendMessageRequest, SetWebhookRequest,
};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const PARSE_MODE: &str = "HTML";

/// Sends to one fixed chat. Every call is a single HTTPS request; there are
/// no retries.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: i64,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Self::with_api_base(DEFAULT_API_BASE, &config.bot_token, config.chat_id)
    }

    pub fn with_api_base(api_base: &str, bot_token: &str, chat_id: i64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build telegram http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{}", api_base.trim_end_matches('/'), bot_token),
            chat_id,
        })
    }

    pub fn send_message_request(&self, message: &OutboundMessage) -> SendMessageRequest {
        SendMessageRequest {
            chat_id: self.chat_id,
            text: message.text.clone(),
            parse_mode: PARSE_MODE,
            reply_markup: message.keyboard.clone(),
        }
    }

    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        self.call(
            "setWebhook",
            &SetWebhookRequest {
                url: url.to_string(),
            },
        )
        .await?;
        tracing::info!("bot webhook registered");
        Ok(())
    }

    pub async fn delete_webhook(&self) -> Result<()> {
        self.call("deleteWebhook", &serde_json::json!({})).await?;
        Ok(())
    }

    async fn call<T: Serialize + ?Sized>(&self, method: &str, payload: &T) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(format!("{}/{}", self.endpoint, method))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("telegram {method} request failed"))?;
        let status = response.status();
        let body: ApiResponse = response
            .json()
            .await
            .with_context(|| format!("telegram {method} returned unreadable body ({status})"))?;
        body.into_result(method)
    }
}

#[async_trait]
impl NotificationPort for TelegramNotifier {
    async fn send_message(&self, message: OutboundMessage) -> Result<()> {
        self.call("sendMessage", &self.send_message_request(&message))
            .await?;
        Ok(())
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: String) -> Result<()> {
        self.call(
            "editMessageText",
            &EditMessageRequest {
                chat_id,
                message_id,
                text,
                parse_mode: PARSE_MODE,
            },
        )
        .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.call(
            "answerCallbackQuery",
            &AnswerCallbackRequest {
                callback_query_id: callback_id.to_string(),
            },
        )
        .await?;
        Ok(())
    }
}
