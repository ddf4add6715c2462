//! Feed session facade.
//! 信息流会话：一个信息流视图对应一个实例。
//!
//! Explicitly constructed and injected; several sessions can coexist (one per
//! feed view, or one per test).

use std::sync::Arc;

use tracing::{debug, info};

use rf_core::config::{AppConfig, ConfigError};
use rf_core::error::{ClassifiedError, RawError};
use rf_core::feed::{
    ActivationPolicy, PlaybackCommand, ViewportConfig, ViewportEvent, ViewportInput,
};
use rf_core::ids::VideoId;
use rf_core::persistence::{AppSnapshot, UserPreferences};
use rf_core::retry::RetryPolicy;

use super::load_videos::{LoadOutcome, LoadVideos};
use super::persistence::PersistFeedState;
use super::share_video::{ShareOutcome, ShareVideo};
use super::store::{FeedState, FeedStore};
use super::toggle_like::{ToggleLike, ToggleLikeOutcome};
use super::viewability::ApplyViewability;
use crate::deps::AppDeps;
use crate::usecases::resilient_executor::ResilientExecutor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedSessionConfig {
    pub viewport: ViewportConfig,
    pub catalog_policy: RetryPolicy,
    pub engagement_policy: RetryPolicy,
    pub max_manual_reload_retries: u32,
}

impl Default for FeedSessionConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            catalog_policy: RetryPolicy::CATALOG,
            engagement_policy: RetryPolicy::ENGAGEMENT,
            max_manual_reload_retries: 3,
        }
    }
}

impl FeedSessionConfig {
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            viewport: config.feed.viewport()?,
            catalog_policy: config.retry.catalog.policy()?,
            engagement_policy: config.retry.engagement.policy()?,
            max_manual_reload_retries: config.feed.max_manual_reload_retries,
        })
    }
}

pub struct FeedSession {
    store: Arc<FeedStore>,
    persistence: Arc<PersistFeedState>,
    viewability: Arc<ApplyViewability>,
    load: LoadVideos,
    toggle_like: ToggleLike,
    share: ShareVideo,
}

impl FeedSession {
    pub fn new(deps: &AppDeps, config: FeedSessionConfig) -> Self {
        let store = Arc::new(FeedStore::new());
        let executor = Arc::new(ResilientExecutor::new(
            deps.connectivity.clone(),
            deps.sleeper.clone(),
        ));
        let persistence = Arc::new(PersistFeedState::new(
            deps.storage.clone(),
            store.clone(),
            deps.reporter.clone(),
            deps.clock.clone(),
        ));
        let viewability = Arc::new(ApplyViewability::new(
            ActivationPolicy::new(config.viewport),
            store.clone(),
            deps.player.clone(),
            persistence.clone(),
            deps.reporter.clone(),
            deps.clock.clone(),
        ));
        let load = LoadVideos::new(
            deps.catalog.clone(),
            executor.clone(),
            store.clone(),
            viewability.clone(),
            deps.reporter.clone(),
            deps.clock.clone(),
            config.catalog_policy,
            config.max_manual_reload_retries,
        );
        let toggle_like = ToggleLike::new(
            deps.engagement.clone(),
            executor.clone(),
            store.clone(),
            persistence.clone(),
            deps.reporter.clone(),
            deps.clock.clone(),
            config.engagement_policy,
        );
        let share = ShareVideo::new(
            deps.engagement.clone(),
            executor,
            store.clone(),
            deps.reporter.clone(),
            deps.clock.clone(),
            config.engagement_policy,
        );

        Self {
            store,
            persistence,
            viewability,
            load,
            toggle_like,
            share,
        }
    }

    pub async fn state(&self) -> FeedState {
        self.store.snapshot().await
    }

    pub fn persistence(&self) -> Arc<PersistFeedState> {
        self.persistence.clone()
    }

    /// Restore the persisted snapshot (current index, liked set, history).
    pub async fn restore(&self) -> Result<Option<AppSnapshot>, ClassifiedError> {
        self.persistence.restore().await
    }

    pub async fn load(&self) -> Result<LoadOutcome, ClassifiedError> {
        self.load.execute().await
    }

    pub async fn retry_load(&self) -> Result<LoadOutcome, ClassifiedError> {
        self.load.retry().await
    }

    /// Visibility batch from the list host.
    pub async fn on_viewability_changed(
        &self,
        events: Vec<ViewportEvent>,
    ) -> Vec<PlaybackCommand> {
        self.viewability
            .execute(ViewportInput::Batch(events))
            .await
    }

    /// Time passed without a new batch.
    pub async fn tick(&self, now_ms: i64) -> Vec<PlaybackCommand> {
        self.viewability
            .execute(ViewportInput::Tick { now_ms })
            .await
    }

    pub async fn toggle_like(&self, id: &VideoId) -> Result<ToggleLikeOutcome, ClassifiedError> {
        self.toggle_like.execute(id).await
    }

    pub async fn share(&self, id: &VideoId) -> Result<ShareOutcome, ClassifiedError> {
        self.share.execute(id).await
    }

    /// Player failure reported by the host (decode error, stalled stream...).
    pub async fn report_media_error(&self, id: &VideoId, raw: RawError) -> ClassifiedError {
        self.viewability.report_media_error(id, &raw).await
    }

    pub async fn persist(&self) -> Result<(), ClassifiedError> {
        self.persistence.save().await
    }

    pub async fn set_preferences(
        &self,
        preferences: UserPreferences,
    ) -> Result<(), ClassifiedError> {
        let previous = self
            .store
            .update(|state| std::mem::replace(&mut state.preferences, preferences))
            .await;

        if let Err(err) = self.persistence.save().await {
            self.store
                .update(|state| state.preferences = previous)
                .await;
            return Err(err);
        }
        Ok(())
    }

    pub async fn clear_error(&self) {
        self.store.update(|state| state.error = None).await;
    }

    /// Drop a stored `network` error once connectivity is back.
    pub async fn on_connectivity_restored(&self) -> bool {
        let cleared = self
            .store
            .update(|state| {
                if state.error.as_ref().is_some_and(ClassifiedError::is_network) {
                    state.error = None;
                    true
                } else {
                    false
                }
            })
            .await;
        if cleared {
            debug!("network error cleared after reconnect");
        }
        cleared
    }

    /// Tear down the view. Results that arrive afterwards are discarded.
    pub async fn unmount(&self) {
        self.viewability.release().await;
        info!("feed session unmounted");
    }
}
