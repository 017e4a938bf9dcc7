//! Fire-and-forget activity recording
//!
//! Play-history and play-count writes are handed to a background worker
//! after an operation commits. Failures are logged and dropped; they never
//! reach the caller.

use encore_core::{ActivitySink, Context, TrackId, UserId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
enum Activity {
    PlayHistory { user_id: UserId, context: Context },
    PlayCount { track_id: TrackId },
    Flush(oneshot::Sender<()>),
}

/// Handle to the activity worker
///
/// Cloning shares the same worker. Must be created inside a Tokio runtime.
#[derive(Clone)]
pub struct ActivityDispatcher {
    tx: mpsc::UnboundedSender<Activity>,
}

impl ActivityDispatcher {
    /// Spawn the worker draining into `sink`
    pub fn spawn(sink: Arc<dyn ActivitySink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(activity) = rx.recv().await {
                match activity {
                    Activity::PlayHistory { user_id, context } => {
                        if let Err(e) = sink.record_play_history(&user_id, &context).await {
                            tracing::warn!(
                                "Failed to record play history for {} ({}): {}",
                                user_id,
                                context,
                                e
                            );
                        }
                    }
                    Activity::PlayCount { track_id } => {
                        if let Err(e) = sink.increment_play_count(&track_id).await {
                            tracing::warn!("Failed to increment play count for {}: {}", track_id, e);
                        }
                    }
                    Activity::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("Activity worker stopped");
        });

        Self { tx }
    }

    /// Queue a play-history record
    pub fn record_play_history(&self, user_id: UserId, context: Context) {
        self.send(Activity::PlayHistory { user_id, context });
    }

    /// Queue a play-count increment
    pub fn increment_play_count(&self, track_id: TrackId) {
        self.send(Activity::PlayCount { track_id });
    }

    /// Wait until everything queued so far has been processed
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        self.send(Activity::Flush(done));
        let _ = wait.await;
    }

    fn send(&self, activity: Activity) {
        if self.tx.send(activity).is_err() {
            tracing::warn!("Activity worker is gone; dropping activity");
        }
    }
}
