use crate::core::detector::MatchDetector;
use crate::core::pass::run_pass;
use crate::models::Profile;
use crate::services::ports::{MatchRecordStore, Notifier, ProfileDirectory};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Capacity of the snapshot channel between a feed and its session.
const FEED_BUFFER: usize = 16;

/// Handle to one subject's active profile subscription.
///
/// Created when the subject becomes known (login) and dropped when they go
/// away (logout); dropping aborts the background task so no further passes
/// start for the subject. Passes already in flight run to completion.
pub struct MatchSession {
    subject_id: String,
    task: JoinHandle<()>,
    feed_task: Option<JoinHandle<()>>,
}

impl MatchSession {
    /// Spawn a session over an explicit snapshot channel.
    ///
    /// One detection-and-record pass runs per received snapshot. Each pass is
    /// spawned independently: rapid successive edits may overlap, which is
    /// safe because recording is idempotent. A failed pass never ends the
    /// session; it keeps watching for the next snapshot.
    pub fn spawn(
        subject_id: String,
        mut feed: mpsc::Receiver<Profile>,
        detector: MatchDetector,
        directory: Arc<dyn ProfileDirectory>,
        store: Arc<dyn MatchRecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let id = subject_id.clone();

        let task = tokio::spawn(async move {
            while let Some(snapshot) = feed.recv().await {
                let detector = detector.clone();
                let directory = Arc::clone(&directory);
                let store = Arc::clone(&store);
                let notifier = Arc::clone(&notifier);

                tokio::spawn(async move {
                    if let Err(e) = run_pass(
                        &snapshot,
                        &detector,
                        directory.as_ref(),
                        store.as_ref(),
                        notifier.as_ref(),
                    )
                    .await
                    {
                        tracing::error!("Detection pass failed for {}: {}", snapshot.id, e);
                    }
                });
            }

            tracing::debug!("Profile feed closed for {}", id);
        });

        Self {
            subject_id,
            task,
            feed_task: None,
        }
    }

    /// Spawn a session fed by polling the directory for the subject's own
    /// profile. This is the production wiring; tests feed a channel directly.
    pub fn watch(
        subject_id: String,
        poll_interval: Duration,
        detector: MatchDetector,
        directory: Arc<dyn ProfileDirectory>,
        store: Arc<dyn MatchRecordStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (feed, feed_task) =
            spawn_profile_poller(subject_id.clone(), Arc::clone(&directory), poll_interval);

        let mut session = Self::spawn(subject_id, feed, detector, directory, store, notifier);
        session.feed_task = Some(feed_task);
        session
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Release the subscription. Equivalent to dropping the session.
    pub fn close(self) {}
}

impl Drop for MatchSession {
    fn drop(&mut self) {
        self.task.abort();
        if let Some(feed_task) = self.feed_task.take() {
            feed_task.abort();
        }
    }
}

/// Poll the directory for a subject's profile and emit a snapshot on creation
/// and on every observed change.
///
/// Poll failures are logged and retried on the next tick; they never end the
/// feed. The feed ends when the receiving session goes away.
pub fn spawn_profile_poller(
    subject_id: String,
    directory: Arc<dyn ProfileDirectory>,
    interval: Duration,
) -> (mpsc::Receiver<Profile>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(FEED_BUFFER);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last_seen: Option<String> = None;

        loop {
            ticker.tick().await;

            match directory.get_profile(&subject_id).await {
                Ok(Some(profile)) => {
                    let stamp = fingerprint(&profile);
                    if last_seen.as_deref() != Some(stamp.as_str()) {
                        last_seen = Some(stamp);
                        if tx.send(profile).await.is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {
                    // Profile not created yet; keep polling.
                }
                Err(e) => {
                    tracing::warn!("Profile poll failed for {}: {}", subject_id, e);
                }
            }
        }
    });

    (rx, task)
}

/// Change stamp for a snapshot: the server timestamp when present, otherwise
/// the serialized document.
fn fingerprint(profile: &Profile) -> String {
    match profile.updated_at {
        Some(ts) => ts.to_rfc3339(),
        None => serde_json::to_string(profile).unwrap_or_default(),
    }
}
