//! Checkpoint and restore of the feed snapshot.
//! 快照的保存与恢复。
//!
//! Storage failures are classified as `storage`, reported and returned. They
//! are never retried.

use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use rf_core::error::{classify, ClassifiedError, ErrorOrigin, RawError};
use rf_core::persistence::{AppSnapshot, APP_STATE_KEY};
use rf_core::ports::{ClockPort, ErrorReporterPort, KeyValueStorePort};

use super::store::FeedStore;
use crate::usecases::internal::report::report_error;

pub struct PersistFeedState {
    storage: Arc<dyn KeyValueStorePort>,
    store: Arc<FeedStore>,
    reporter: Arc<dyn ErrorReporterPort>,
    clock: Arc<dyn ClockPort>,
}

impl PersistFeedState {
    pub fn new(
        storage: Arc<dyn KeyValueStorePort>,
        store: Arc<FeedStore>,
        reporter: Arc<dyn ErrorReporterPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            storage,
            store,
            reporter,
            clock,
        }
    }

    /// Save the current snapshot, stamped with the current time.
    pub async fn save(&self) -> Result<(), ClassifiedError> {
        self.save_at(self.clock.now_ms()).await
    }

    /// Save the current snapshot with an explicit `last_active_time_ms`.
    pub async fn save_at(&self, last_active_time_ms: i64) -> Result<(), ClassifiedError> {
        let span = info_span!("usecase.persist_feed_state.save");

        async {
            let snapshot = self
                .store
                .read(|state| AppSnapshot {
                    video_state: state.video_state.clone(),
                    user_preferences: state.preferences,
                    last_active_time_ms,
                })
                .await;

            let result = match snapshot.to_json() {
                Ok(json) => self.storage.set(APP_STATE_KEY, &json).await,
                Err(err) => Err(RawError::from(err)),
            };

            match result {
                Ok(()) => {
                    debug!(
                        current_index = snapshot.video_state.current_index,
                        liked = snapshot.video_state.liked_videos.len(),
                        "feed snapshot saved"
                    );
                    Ok(())
                }
                Err(raw) => Err(self.fail("feed.persist.save", &raw)),
            }
        }
        .instrument(span)
        .await
    }

    /// Load the stored snapshot into the store.
    ///
    /// Returns the snapshot that was applied, or `None` when nothing was
    /// stored.
    pub async fn restore(&self) -> Result<Option<AppSnapshot>, ClassifiedError> {
        let span = info_span!("usecase.persist_feed_state.restore");

        async {
            let raw = match self.storage.get(APP_STATE_KEY).await {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    debug!("no stored feed snapshot");
                    return Ok(None);
                }
                Err(err) => return Err(self.fail("feed.persist.restore", &err)),
            };

            let snapshot = AppSnapshot::from_json(&raw)
                .map_err(|err| self.fail("feed.persist.restore", &RawError::from(err)))?;

            self.store
                .update(|state| {
                    state.video_state = snapshot.video_state.clone();
                    state.preferences = snapshot.user_preferences;
                })
                .await;

            info!(
                current_index = snapshot.video_state.current_index,
                liked = snapshot.video_state.liked_videos.len(),
                history = snapshot.video_state.watch_history.len(),
                "feed snapshot restored"
            );
            Ok(Some(snapshot))
        }
        .instrument(span)
        .await
    }

    /// Drop the stored snapshot.
    pub async fn clear(&self) -> Result<(), ClassifiedError> {
        self.storage
            .remove(APP_STATE_KEY)
            .await
            .map_err(|err| self.fail("feed.persist.clear", &err))
    }

    fn fail(&self, context: &str, raw: &RawError) -> ClassifiedError {
        let classified = classify(raw, ErrorOrigin::Storage);
        report_error(self.reporter.as_ref(), self.clock.as_ref(), context, &classified);
        classified
    }
}
