//! Deployment lifecycle tracking.
//!
//! Correlates `running` and `success` events for one deployment id through
//! the duration store and emits exactly one chat notification per event.
//!
//! | status   | store                     | notification                 |
//! |----------|---------------------------|------------------------------|
//! | running  | put(id, now)              | build started                |
//! | success  | get(id), then delete(id)  | build succeeded with elapsed |
//! | failed   | untouched                 | build failed                 |
//! | canceled | delete(id), best effort   | build canceled               |

use std::sync::Arc;

use herald_domain::{BuildDuration, DeploymentEvent, DeploymentId, DeploymentStatus, OutboundMessage};
use herald_ports::{Clock, DurationStore, NotificationPort};

use crate::error::{StoreResultExt, TrackerError};
use crate::keyed_lock::KeyedLock;
use crate::messages;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackOutcome {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    /// Only set for `success`.
    pub elapsed: Option<BuildDuration>,
    /// False when the chat transport rejected the message. The store change
    /// stands either way.
    pub dispatched: bool,
}

pub struct LifecycleTracker {
    store: Arc<dyn DurationStore>,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn Clock>,
    locks: KeyedLock,
}

impl LifecycleTracker {
    pub fn new(
        store: Arc<dyn DurationStore>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            clock,
            locks: KeyedLock::new(),
        }
    }

    /// Applies one deployment event.
    ///
    /// Message text is rendered before the store is touched, so a payload
    /// missing a referenced field leaves the store unchanged.
    pub async fn handle(&self, event: &DeploymentEvent) -> Result<TrackOutcome, TrackerError> {
        let id = &event.deployment_id;
        let _guard = self.locks.lock(id.as_str()).await;

        let mut elapsed = None;
        let text = match event.status {
            DeploymentStatus::Running => {
                let text = messages::start_deployment(event)?;
                match self.store.get(id).await {
                    Ok(Some(previous)) => tracing::warn!(
                        deployment_id = %id,
                        previous_start = previous,
                        "deployment restarted, overwriting start time"
                    ),
                    Ok(None) => {}
                    Err(err) => tracing::warn!(
                        deployment_id = %id,
                        error = %err,
                        "unreadable start record, overwriting"
                    ),
                }
                self.store
                    .put(id, self.clock.now_epoch_seconds())
                    .await
                    .for_deployment(id)?;
                text
            }
            DeploymentStatus::Success => {
                let started_at = self
                    .store
                    .get(id)
                    .await
                    .for_deployment(id)?
                    .ok_or_else(|| TrackerError::MissingCorrelation(id.clone()))?;
                let duration = BuildDuration::between(started_at, self.clock.now_epoch_seconds());
                let text = messages::success_deployment(event, duration)?;
                self.store.delete(id).await.for_deployment(id)?;
                elapsed = Some(duration);
                text
            }
            DeploymentStatus::Failed => messages::failed_deployment(event)?,
            DeploymentStatus::Canceled => {
                let text = messages::canceled_deployment(event)?;
                self.store.delete(id).await.for_deployment(id)?;
                text
            }
        };

        let dispatched = self.dispatch(id, event.status, text).await;
        tracing::info!(
            deployment_id = %id,
            status = %event.status,
            elapsed = elapsed.map(|d| d.as_secs()),
            dispatched,
            "deployment event processed"
        );

        Ok(TrackOutcome {
            deployment_id: id.clone(),
            status: event.status,
            elapsed,
            dispatched,
        })
    }

    async fn dispatch(&self, id: &DeploymentId, status: DeploymentStatus, text: String) -> bool {
        match self.notifier.send_message(OutboundMessage::text(text)).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    deployment_id = %id,
                    status = %status,
                    error = %err,
                    "failed to send deployment notification"
                );
                false
            }
        }
    }
}
