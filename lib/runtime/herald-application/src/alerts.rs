//! Monitoring alert relay.

use std::sync::Arc;

use herald_domain::{Alert, InlineButton, InlineKeyboard, OutboundMessage};
use herald_ports::NotificationPort;

use crate::error::RelayError;
use crate::messages;

pub const SILENCE_BUTTON: &str = "🔕 Silence!";

pub struct AlertRelay {
    notifier: Arc<dyn NotificationPort>,
}

impl AlertRelay {
    pub fn new(notifier: Arc<dyn NotificationPort>) -> Self {
        Self { notifier }
    }

    /// Sends one message per alert, in order. Every alert is rendered first,
    /// so a malformed alert anywhere in the batch sends nothing.
    pub async fn relay(&self, alerts: &[Alert]) -> Result<usize, RelayError> {
        let outbound = alerts
            .iter()
            .map(Self::render)
            .collect::<Result<Vec<_>, _>>()?;

        for message in &outbound {
            self.notifier
                .send_message(message.clone())
                .await
                .map_err(|err| {
                    tracing::error!(error = %err, "failed to relay alert");
                    RelayError::Dispatch(err)
                })?;
        }
        tracing::info!(count = outbound.len(), "alerts relayed");
        Ok(outbound.len())
    }

    fn render(alert: &Alert) -> Result<OutboundMessage, RelayError> {
        let message = OutboundMessage::text(messages::alert_firing(alert)?);
        Ok(match &alert.silence_url {
            Some(url) => message.with_keyboard(InlineKeyboard::single_row(vec![
                InlineButton::link(SILENCE_BUTTON, url),
            ])),
            None => message,
        })
    }
}
