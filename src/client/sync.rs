use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::api::ApiClient;
use super::error::ClientResult;
use super::store::Effect;
use crate::models::Collection;

/// A user-visible, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    /// The collection whose request failed, if any.
    pub collection: Option<Collection>,
}

impl Notification {
    pub fn error(message: impl Into<String>, collection: Option<Collection>) -> Self {
        Self {
            message: message.into(),
            collection,
        }
    }
}

/// Runs persistence effects in the background, one task per effect.
///
/// Requests are unordered and never retried. A failure is logged and
/// reported on the notification channel; nothing is fed back into the state.
pub struct SyncRunner {
    api: ApiClient,
    notifier: UnboundedSender<Notification>,
    in_flight: Vec<JoinHandle<()>>,
}

impl SyncRunner {
    pub fn new(api: ApiClient, notifier: UnboundedSender<Notification>) -> Self {
        Self {
            api,
            notifier,
            in_flight: Vec::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Number of requests that have not finished yet.
    pub fn pending(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    pub fn spawn(&mut self, effect: Effect) {
        self.in_flight.retain(|h| !h.is_finished());

        let api = self.api.clone();
        let notifier = self.notifier.clone();
        self.in_flight.push(tokio::spawn(async move {
            let collection = effect.collection();
            match persist(&api, &effect).await {
                Ok(()) => tracing::debug!(collection = %collection, "Synced {:?}", effect),
                Err(e) => {
                    let message = effect.failure_message();
                    tracing::error!(collection = %collection, "{}: {}", message, e);
                    let _ = notifier.send(Notification::error(message, Some(collection)));
                }
            }
        }));
    }

    /// Wait for every spawned request to finish.
    pub async fn settle(&mut self) {
        for handle in self.in_flight.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!("Sync task failed: {}", e);
            }
        }
    }
}

async fn persist(api: &ApiClient, effect: &Effect) -> ClientResult<()> {
    match effect {
        Effect::Create(record) => api.create(record).await,
        Effect::Update(record) => api.update(record).await,
        Effect::Delete { collection, id } => api.remove(*collection, id).await,
    }
}
