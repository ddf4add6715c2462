//! Application runtime: the use-case facades built from one `AppDeps`.

use std::sync::Arc;

use tracing::{info, warn};

use rf_app::{AppDeps, AppLifecycle, AuthSession, FeedSession, FeedSessionConfig};
use rf_core::config::AppConfig;

use super::wiring::{wire_dependencies, WiringResult};

pub struct FeedRuntime {
    deps: AppDeps,
    pub feed: Arc<FeedSession>,
    pub auth: Arc<AuthSession>,
    pub lifecycle: Arc<AppLifecycle>,
}

impl FeedRuntime {
    pub fn new(deps: AppDeps, config: &AppConfig) -> WiringResult<Self> {
        let feed_config = FeedSessionConfig::from_app_config(config)?;
        let policies = config.retry.policies()?;

        let feed = Arc::new(FeedSession::new(&deps, feed_config));
        let auth = Arc::new(AuthSession::new(&deps, policies));
        let lifecycle = Arc::new(AppLifecycle::new(deps.clock.clone(), feed.persistence()));

        Ok(Self {
            deps,
            feed,
            auth,
            lifecycle,
        })
    }

    pub fn deps(&self) -> &AppDeps {
        &self.deps
    }

    /// Clear stored network errors in every session.
    pub async fn on_connectivity_restored(&self) {
        let feed = self.feed.on_connectivity_restored().await;
        let auth = self.auth.on_connectivity_restored().await;
        if feed || auth {
            info!(feed, auth, "connectivity restored, cleared network errors");
        }
    }
}

/// Wire, restore persisted state and load the first page of the feed.
///
/// Restore and load failures are stored on the session state and reported;
/// they do not stop startup.
pub async fn start(config: &AppConfig) -> WiringResult<FeedRuntime> {
    let deps = wire_dependencies(config)?;
    let runtime = FeedRuntime::new(deps, config)?;

    runtime.auth.initialize().await;
    if let Err(err) = runtime.feed.restore().await {
        warn!(code = %err.code, "starting without persisted state");
    }
    if let Err(err) = runtime.feed.load().await {
        warn!(code = %err.code, "initial feed load failed");
    }

    Ok(runtime)
}
