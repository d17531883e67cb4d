//! Bot command and callback handling.

use std::sync::Arc;

use anyhow::{Context, Result};

use herald_domain::{CallbackQuery, ChatMessage, ChatUpdate, OutboundMessage};
use herald_ports::NotificationPort;

use crate::availability::AvailabilityReporter;
use crate::messages;

pub const HELP_COMMAND: &str = "/help";
pub const ACCEPT_ALERT: &str = "accept_alert";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    AvailabilityReported,
    AlertAccepted,
    Ignored,
}

pub struct ChatCommands {
    notifier: Arc<dyn NotificationPort>,
    availability: AvailabilityReporter,
}

impl ChatCommands {
    pub fn new(notifier: Arc<dyn NotificationPort>, availability: AvailabilityReporter) -> Self {
        Self {
            notifier,
            availability,
        }
    }

    pub async fn handle(&self, update: &ChatUpdate) -> Result<CommandOutcome> {
        if let Some(callback) = &update.callback_query {
            return self.handle_callback(callback).await;
        }
        if let Some(message) = &update.message {
            return self.handle_message(message).await;
        }
        Ok(CommandOutcome::Ignored)
    }

    async fn handle_message(&self, message: &ChatMessage) -> Result<CommandOutcome> {
        let Some(command) = message.text.as_deref().and_then(command_name) else {
            return Ok(CommandOutcome::Ignored);
        };
        if command != HELP_COMMAND {
            return Ok(CommandOutcome::Ignored);
        }

        let report = self.availability.report().await;
        self.notifier
            .send_message(OutboundMessage::text(report))
            .await
            .context("failed to send availability report")?;
        Ok(CommandOutcome::AvailabilityReported)
    }

    async fn handle_callback(&self, callback: &CallbackQuery) -> Result<CommandOutcome> {
        if callback.data.as_deref() != Some(ACCEPT_ALERT) {
            return Ok(CommandOutcome::Ignored);
        }
        let message = callback
            .message
            .as_ref()
            .context("accept_alert callback carries no message")?;
        let original = message.text.as_deref().unwrap_or_default();

        self.notifier
            .edit_message(
                message.chat.id,
                message.message_id,
                messages::alert_accepted(original, &callback.from.mention()),
            )
            .await
            .context("failed to edit alert message")?;
        self.notifier
            .answer_callback(&callback.id)
            .await
            .context("failed to answer callback")?;

        tracing::info!(user = %callback.from.mention(), "alert accepted");
        Ok(CommandOutcome::AlertAccepted)
    }
}

/// `/help@herald_bot args` → `/help`.
fn command_name(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    first.split('@').next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_domain::{Chat, ChatUser, ServiceEndpoint, ServiceStatus};
    use herald_ports::{InMemoryNotifier, ManualClock, NotifierCall, StaticAvailability};

    fn commands(notifier: &InMemoryNotifier) -> ChatCommands {
        let availability = AvailabilityReporter::new(
            Arc::new(StaticAvailability::new().with("https://grafana.example", ServiceStatus::Available)),
            Arc::new(ManualClock::at_epoch(1_700_000_000)),
            vec![ServiceEndpoint::new("Grafana", "https://grafana.example")],
        );
        ChatCommands::new(Arc::new(notifier.clone()), availability)
    }

    fn text_update(text: &str) -> ChatUpdate {
        ChatUpdate {
            update_id: 1,
            message: Some(ChatMessage {
                message_id: 10,
                chat: Chat { id: -100 },
                from: None,
                text: Some(text.to_string()),
            }),
            callback_query: None,
        }
    }

    #[tokio::test]
    async fn test_help_sends_availability_report() {
        let notifier = InMemoryNotifier::new();
        let outcome = commands(&notifier)
            .handle(&text_update("/help@herald_bot"))
            .await
            .unwrap();

        assert_eq!(outcome, CommandOutcome::AvailabilityReported);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("Grafana 🟢\nhttps://grafana.example\n"));
    }

    #[tokio::test]
    async fn test_other_text_is_ignored() {
        let notifier = InMemoryNotifier::new();
        let commands = commands(&notifier);

        assert_eq!(
            commands.handle(&text_update("hello")).await.unwrap(),
            CommandOutcome::Ignored
        );
        assert_eq!(
            commands.handle(&text_update("/start")).await.unwrap(),
            CommandOutcome::Ignored
        );
        assert_eq!(
            commands.handle(&ChatUpdate::default()).await.unwrap(),
            CommandOutcome::Ignored
        );
        assert!(notifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_accept_alert_edits_and_answers() {
        let notifier = InMemoryNotifier::new();
        let update = ChatUpdate {
            update_id: 2,
            message: None,
            callback_query: Some(CallbackQuery {
                id: "cb-1".into(),
                from: ChatUser {
                    id: 5,
                    username: Some("ada".into()),
                    first_name: Some("Ada".into()),
                },
                message: Some(ChatMessage {
                    message_id: 99,
                    chat: Chat { id: -100 },
                    from: None,
                    text: Some("🔥 Alert firing: HighLoad".into()),
                }),
                data: Some(ACCEPT_ALERT.into()),
            }),
        };

        let outcome = commands(&notifier).handle(&update).await.unwrap();

        assert_eq!(outcome, CommandOutcome::AlertAccepted);
        assert_eq!(
            notifier.calls(),
            vec![
                NotifierCall::Edit {
                    chat_id: -100,
                    message_id: 99,
                    text: "🔥 Alert firing: HighLoad\n\n@ada не прошёл мимо и сейчас разберется с этим алертом!"
                        .into(),
                },
                NotifierCall::AnswerCallback("cb-1".into()),
            ]
        );
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("/help"), Some("/help"));
        assert_eq!(command_name("  /help@bot now"), Some("/help"));
        assert_eq!(command_name("help"), None);
        assert_eq!(command_name(""), None);
    }
}
