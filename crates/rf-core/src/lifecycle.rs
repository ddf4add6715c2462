//! App lifecycle tracking.
//!
//! Pure transition function over foreground/background changes reported by
//! the host platform.

use serde::{Deserialize, Serialize};

/// Foreground status reported by the host.
///
/// 宿主平台报告的前后台状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppPhase {
    /// In the foreground and receiving input.
    ///
    /// 前台，可交互。
    #[default]
    Active,
    /// Visible but not receiving input (e.g. a system dialog on top).
    ///
    /// 可见但不可交互。
    Inactive,
    /// Not visible.
    ///
    /// 后台。
    Background,
}

/// Side effects requested by a lifecycle change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Checkpoint the app snapshot (entering background).
    PersistSnapshot { last_active_time_ms: i64 },
    /// Returned to the foreground after `background_ms` in the background.
    Resumed { background_ms: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleTracker {
    phase: AppPhase,
    last_active_time_ms: i64,
    background_since_ms: Option<i64>,
    time_in_background_ms: i64,
}

impl LifecycleTracker {
    pub fn new(now_ms: i64) -> Self {
        Self {
            phase: AppPhase::Active,
            last_active_time_ms: now_ms,
            background_since_ms: None,
            time_in_background_ms: 0,
        }
    }

    /// Start from a previously persisted `last_active_time_ms`; the gap up to
    /// `now_ms` counts as time spent in the background.
    pub fn restored(last_active_time_ms: i64, now_ms: i64) -> Self {
        Self {
            phase: AppPhase::Active,
            last_active_time_ms,
            background_since_ms: None,
            time_in_background_ms: now_ms.saturating_sub(last_active_time_ms).max(0),
        }
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == AppPhase::Active
    }

    pub fn is_background(&self) -> bool {
        self.phase == AppPhase::Background
    }

    pub fn last_active_time_ms(&self) -> i64 {
        self.last_active_time_ms
    }

    /// Length of the most recent background stay.
    pub fn time_in_background_ms(&self) -> i64 {
        self.time_in_background_ms
    }

    pub fn transition(self, next: AppPhase, now_ms: i64) -> (Self, Vec<LifecycleAction>) {
        if next == self.phase {
            return (self, Vec::new());
        }

        let mut state = self;
        let mut actions = Vec::new();

        match next {
            AppPhase::Background => {
                state.background_since_ms = Some(now_ms);
                actions.push(LifecycleAction::PersistSnapshot {
                    last_active_time_ms: now_ms,
                });
            }
            AppPhase::Active => {
                if let Some(since) = state.background_since_ms.take() {
                    state.time_in_background_ms = now_ms.saturating_sub(since).max(0);
                    actions.push(LifecycleAction::Resumed {
                        background_ms: state.time_in_background_ms,
                    });
                }
                state.last_active_time_ms = now_ms;
            }
            AppPhase::Inactive => {}
        }

        state.phase = next;
        (state, actions)
    }
}
