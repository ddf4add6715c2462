//! Applies app lifecycle changes reported by the host.
//! 处理宿主报告的前后台切换。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, Instrument};

use rf_core::lifecycle::{AppPhase, LifecycleAction, LifecycleTracker};
use rf_core::ports::ClockPort;

use super::feed::PersistFeedState;

pub struct AppLifecycle {
    tracker: Mutex<LifecycleTracker>,
    clock: Arc<dyn ClockPort>,
    persistence: Arc<PersistFeedState>,
}

impl AppLifecycle {
    pub fn new(clock: Arc<dyn ClockPort>, persistence: Arc<PersistFeedState>) -> Self {
        let tracker = LifecycleTracker::new(clock.now_ms());
        Self {
            tracker: Mutex::new(tracker),
            clock,
            persistence,
        }
    }

    /// Continue from a persisted `last_active_time_ms`.
    pub fn restored(
        clock: Arc<dyn ClockPort>,
        persistence: Arc<PersistFeedState>,
        last_active_time_ms: i64,
    ) -> Self {
        let tracker = LifecycleTracker::restored(last_active_time_ms, clock.now_ms());
        Self {
            tracker: Mutex::new(tracker),
            clock,
            persistence,
        }
    }

    pub async fn tracker(&self) -> LifecycleTracker {
        *self.tracker.lock().await
    }

    pub async fn execute(&self, phase: AppPhase) -> Vec<LifecycleAction> {
        let span = info_span!("usecase.app_lifecycle.execute", phase = ?phase);

        async {
            let now_ms = self.clock.now_ms();
            let actions = {
                let mut tracker = self.tracker.lock().await;
                let (next, actions) = tracker.transition(phase, now_ms);
                *tracker = next;
                actions
            };

            for action in &actions {
                match *action {
                    LifecycleAction::PersistSnapshot {
                        last_active_time_ms,
                    } => {
                        debug!("entering background, saving snapshot");
                        // Reported inside; a failed checkpoint must not block the transition.
                        let _ = self.persistence.save_at(last_active_time_ms).await;
                    }
                    LifecycleAction::Resumed { background_ms } => {
                        info!(background_ms, "app resumed");
                    }
                }
            }
            actions
        }
        .instrument(span)
        .await
    }
}
