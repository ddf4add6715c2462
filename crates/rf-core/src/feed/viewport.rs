//! Viewport activation policy.
//!
//! Decides, from the visibility batches reported by the scrolling list host,
//! which single feed item is "active" (the one that should be playing).
//!
//! 视口激活策略：根据可见性事件决定当前唯一处于激活（播放）状态的条目。
//!
//! Rules:
//! - among visible events the highest `visible_fraction` wins; ties prefer the
//!   currently active item, then the pending candidate, then delivery order
//! - the winner must reach `visibility_threshold` and stay the winner for at
//!   least `min_dwell_ms` before it becomes active
//! - batches with no qualifying item leave `active_index` untouched (sticky)
//! - replacing the item collection resets everything to `None`

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MIN_DWELL_MS: u64 = 300;

/// One visibility observation reported by the list host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportEvent {
    pub item_index: usize,
    pub is_visible: bool,
    pub visible_fraction: f32,
    pub observed_at_ms: i64,
}

impl ViewportEvent {
    pub fn visible(item_index: usize, visible_fraction: f32, observed_at_ms: i64) -> Self {
        Self {
            item_index,
            is_visible: true,
            visible_fraction,
            observed_at_ms,
        }
    }

    pub fn hidden(item_index: usize, observed_at_ms: i64) -> Self {
        Self {
            item_index,
            is_visible: false,
            visible_fraction: 0.0,
            observed_at_ms,
        }
    }

    /// Fraction clamped to `[0, 1]`; NaN counts as not visible at all.
    fn effective_fraction(&self) -> f32 {
        if self.visible_fraction.is_nan() {
            0.0
        } else {
            self.visible_fraction.clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewportConfigError {
    #[error("visibility_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f32),
}

/// Activation tuning. Only constructible with a threshold in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportConfig {
    visibility_threshold: f32,
    min_dwell_ms: u64,
}

impl ViewportConfig {
    pub fn new(
        visibility_threshold: f32,
        min_dwell_ms: u64,
    ) -> Result<Self, ViewportConfigError> {
        // NaN fails the range check too.
        if !(0.0..=1.0).contains(&visibility_threshold) {
            return Err(ViewportConfigError::ThresholdOutOfRange(visibility_threshold));
        }
        Ok(Self {
            visibility_threshold,
            min_dwell_ms,
        })
    }

    pub fn visibility_threshold(&self) -> f32 {
        self.visibility_threshold
    }

    pub fn min_dwell_ms(&self) -> u64 {
        self.min_dwell_ms
    }

    pub fn with_min_dwell_ms(self, min_dwell_ms: u64) -> Self {
        Self {
            min_dwell_ms,
            ..self
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            min_dwell_ms: DEFAULT_MIN_DWELL_MS,
        }
    }
}

/// Activation bookkeeping for one feed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivationState {
    pub active_index: Option<usize>,
    pub candidate_index: Option<usize>,
    pub candidate_since_ms: Option<i64>,
}

impl ActivationState {
    pub fn initial() -> Self {
        Self::default()
    }

    fn without_candidate(self) -> Self {
        Self {
            candidate_index: None,
            candidate_since_ms: None,
            ..self
        }
    }
}

/// Inputs that drive the policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportInput {
    /// Items currently reported as visible (may be empty during a fling).
    Batch(Vec<ViewportEvent>),
    /// Time passed without a new batch.
    Tick { now_ms: i64 },
    /// The feed's item collection was replaced (e.g. full reload).
    CollectionReplaced,
}

/// Side-effects produced by transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationAction {
    /// `index` became active; `previous` is the item that stopped being active.
    Activated {
        index: usize,
        previous: Option<usize>,
    },
    /// The collection was replaced while `previous` was active.
    Cleared { previous: usize },
}

/// Pure activation state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivationPolicy {
    config: ViewportConfig,
}

impl ActivationPolicy {
    pub fn new(config: ViewportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ViewportConfig {
        self.config
    }

    pub fn transition(
        &self,
        state: ActivationState,
        input: ViewportInput,
    ) -> (ActivationState, Vec<ActivationAction>) {
        match input {
            ViewportInput::Batch(events) => self.on_batch(state, &events),
            ViewportInput::Tick { now_ms } => self.promote_if_dwelled(state, now_ms),
            ViewportInput::CollectionReplaced => {
                let actions = state
                    .active_index
                    .map(|previous| vec![ActivationAction::Cleared { previous }])
                    .unwrap_or_default();
                (ActivationState::initial(), actions)
            }
        }
    }

    fn on_batch(
        &self,
        state: ActivationState,
        events: &[ViewportEvent],
    ) -> (ActivationState, Vec<ActivationAction>) {
        let Some(best) = select_best(&state, events) else {
            return (state.without_candidate(), Vec::new());
        };

        if best.effective_fraction() < self.config.visibility_threshold()
            || state.active_index == Some(best.item_index)
        {
            return (state.without_candidate(), Vec::new());
        }

        let next = if state.candidate_index == Some(best.item_index) {
            state
        } else {
            ActivationState {
                candidate_index: Some(best.item_index),
                candidate_since_ms: Some(best.observed_at_ms),
                ..state
            }
        };

        // Bursty delivery can carry stale timestamps; use the newest one seen.
        let now_ms = events
            .iter()
            .map(|event| event.observed_at_ms)
            .max()
            .unwrap_or(best.observed_at_ms);

        self.promote_if_dwelled(next, now_ms)
    }

    fn promote_if_dwelled(
        &self,
        state: ActivationState,
        now_ms: i64,
    ) -> (ActivationState, Vec<ActivationAction>) {
        let (Some(candidate), Some(since)) = (state.candidate_index, state.candidate_since_ms)
        else {
            return (state, Vec::new());
        };

        let dwelled = now_ms.saturating_sub(since);
        if dwelled < 0 || (dwelled as u64) < self.config.min_dwell_ms() {
            return (state, Vec::new());
        }

        let previous = state.active_index;
        #[cfg(feature = "tracing")]
        tracing::debug!(index = candidate, ?previous, dwelled_ms = dwelled, "viewport item activated");

        (
            ActivationState {
                active_index: Some(candidate),
                candidate_index: None,
                candidate_since_ms: None,
            },
            vec![ActivationAction::Activated {
                index: candidate,
                previous,
            }],
        )
    }
}

fn select_best<'a>(
    state: &ActivationState,
    events: &'a [ViewportEvent],
) -> Option<&'a ViewportEvent> {
    let rank = |event: &ViewportEvent| -> u8 {
        if state.active_index == Some(event.item_index) {
            2
        } else if state.candidate_index == Some(event.item_index) {
            1
        } else {
            0
        }
    };

    let mut best: Option<&ViewportEvent> = None;
    for event in events.iter().filter(|event| event.is_visible) {
        best = match best {
            None => Some(event),
            Some(current) => {
                let (a, b) = (event.effective_fraction(), current.effective_fraction());
                if a > b || (a == b && rank(event) > rank(current)) {
                    Some(event)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ActivationPolicy {
        ActivationPolicy::new(ViewportConfig::default())
    }

    fn batch(events: &[ViewportEvent]) -> ViewportInput {
        ViewportInput::Batch(events.to_vec())
    }

    fn run(
        policy: &ActivationPolicy,
        state: ActivationState,
        inputs: Vec<ViewportInput>,
    ) -> (ActivationState, Vec<ActivationAction>) {
        inputs
            .into_iter()
            .fold((state, Vec::new()), |(state, mut all), input| {
                let (next, actions) = policy.transition(state, input);
                all.extend(actions);
                (next, all)
            })
    }

    #[test]
    fn sustained_item_becomes_active_after_dwell() {
        let policy = policy();
        let (state, actions) = run(
            &policy,
            ActivationState::initial(),
            vec![
                batch(&[ViewportEvent::visible(0, 0.9, 0)]),
                batch(&[ViewportEvent::visible(0, 0.9, 300)]),
            ],
        );

        assert_eq!(state.active_index, Some(0));
        assert_eq!(
            actions,
            vec![ActivationAction::Activated {
                index: 0,
                previous: None
            }]
        );
    }

    #[test]
    fn switching_items_reports_previous() {
        let policy = policy();
        let (state, actions) = run(
            &policy,
            ActivationState::initial(),
            vec![
                batch(&[ViewportEvent::visible(0, 0.9, 0)]),
                batch(&[ViewportEvent::visible(0, 0.9, 300)]),
                batch(&[ViewportEvent::visible(1, 0.6, 1000)]),
                batch(&[ViewportEvent::visible(1, 0.6, 1300)]),
            ],
        );

        assert_eq!(state.active_index, Some(1));
        assert_eq!(
            actions.last(),
            Some(&ActivationAction::Activated {
                index: 1,
                previous: Some(0)
            })
        );
    }

    #[test]
    fn empty_batch_keeps_active_index() {
        let policy = policy();
        let active = ActivationState {
            active_index: Some(3),
            ..ActivationState::initial()
        };

        let (state, actions) = policy.transition(active, batch(&[]));

        assert_eq!(state.active_index, Some(3));
        assert!(actions.is_empty());
    }

    #[test]
    fn brief_crossing_never_activates() {
        let policy = policy();
        let (state, actions) = run(
            &policy,
            ActivationState::initial(),
            vec![
                batch(&[ViewportEvent::visible(2, 0.7, 0)]),
                batch(&[ViewportEvent::visible(2, 0.3, 120)]),
                batch(&[ViewportEvent::visible(2, 0.3, 500)]),
                ViewportInput::Tick { now_ms: 1000 },
            ],
        );

        assert_eq!(state.active_index, None);
        assert!(actions.is_empty());
    }

    #[test]
    fn below_threshold_item_is_never_a_candidate() {
        let policy = policy();
        let (state, _) = policy.transition(
            ActivationState::initial(),
            batch(&[ViewportEvent::visible(0, 0.49, 0)]),
        );
        assert_eq!(state.candidate_index, None);
    }

    #[test]
    fn hidden_events_are_ignored() {
        let policy = policy();
        let (state, _) = policy.transition(
            ActivationState::initial(),
            batch(&[ViewportEvent {
                item_index: 4,
                is_visible: false,
                visible_fraction: 1.0,
                observed_at_ms: 0,
            }]),
        );
        assert_eq!(state.candidate_index, None);
    }

    #[test]
    fn tick_promotes_candidate_once_dwell_elapsed() {
        let policy = policy();
        let (state, _) = policy.transition(
            ActivationState::initial(),
            batch(&[ViewportEvent::visible(5, 1.0, 10)]),
        );
        assert_eq!(state.candidate_index, Some(5));

        let (state, actions) = policy.transition(state, ViewportInput::Tick { now_ms: 200 });
        assert_eq!(state.active_index, None);
        assert!(actions.is_empty());

        let (state, actions) = policy.transition(state, ViewportInput::Tick { now_ms: 310 });
        assert_eq!(state.active_index, Some(5));
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn collection_replacement_resets_state() {
        let policy = policy();
        let state = ActivationState {
            active_index: Some(1),
            candidate_index: Some(2),
            candidate_since_ms: Some(50),
        };

        let (state, actions) = policy.transition(state, ViewportInput::CollectionReplaced);

        assert_eq!(state, ActivationState::initial());
        assert_eq!(actions, vec![ActivationAction::Cleared { previous: 1 }]);
    }

    #[test]
    fn highest_fraction_wins_among_partial_items() {
        let policy = ActivationPolicy::new(ViewportConfig::default().with_min_dwell_ms(0));

        let (state, _) = policy.transition(
            ActivationState::initial(),
            batch(&[
                ViewportEvent::visible(0, 0.35, 0),
                ViewportEvent::visible(1, 0.65, 0),
            ]),
        );

        assert_eq!(state.active_index, Some(1));
    }

    #[test]
    fn tie_prefers_active_item() {
        let policy = ActivationPolicy::new(ViewportConfig::default().with_min_dwell_ms(0));
        let state = ActivationState {
            active_index: Some(1),
            ..ActivationState::initial()
        };

        let (state, actions) = policy.transition(
            state,
            batch(&[
                ViewportEvent::visible(0, 0.5, 0),
                ViewportEvent::visible(1, 0.5, 0),
            ]),
        );

        assert_eq!(state.active_index, Some(1));
        assert!(actions.is_empty());
    }

    #[test]
    fn stale_timestamps_do_not_shortcut_dwell() {
        let policy = policy();
        let (state, actions) = run(
            &policy,
            ActivationState::initial(),
            vec![
                batch(&[ViewportEvent::visible(0, 0.9, 1000)]),
                batch(&[ViewportEvent::visible(0, 0.9, 900)]),
            ],
        );

        assert_eq!(state.active_index, None);
        assert!(actions.is_empty());
    }

    #[test]
    fn threshold_outside_unit_range_is_rejected() {
        for bad in [f32::NAN, f32::INFINITY, -0.1, 1.5] {
            assert!(matches!(
                ViewportConfig::new(bad, 0),
                Err(ViewportConfigError::ThresholdOutOfRange(_))
            ));
        }

        let config = ViewportConfig::new(1.0, 0).unwrap();
        assert_eq!(config.visibility_threshold(), 1.0);
        let config = ViewportConfig::new(0.0, 120).unwrap();
        assert_eq!(config.min_dwell_ms(), 120);
    }

    #[test]
    fn nan_fraction_counts_as_invisible() {
        let policy = policy();
        let (state, _) = policy.transition(
            ActivationState::initial(),
            batch(&[ViewportEvent::visible(0, f32::NAN, 0)]),
        );
        assert_eq!(state.candidate_index, None);
    }

    #[test]
    fn activation_only_targets_items_last_seen_above_threshold() {
        // Deterministic pseudo-random scroll trace.
        let policy = policy();
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            seed >> 33
        };

        let mut state = ActivationState::initial();
        let mut last_fraction = std::collections::HashMap::new();
        let mut now = 0i64;

        for _ in 0..2000 {
            now += (next() % 200) as i64;
            let count = (next() % 3) as usize;
            let events: Vec<_> = (0..count)
                .map(|_| {
                    let index = (next() % 6) as usize;
                    let fraction = (next() % 101) as f32 / 100.0;
                    ViewportEvent::visible(index, fraction, now)
                })
                .collect();
            // A tick drops the generated batch; only delivered fractions count.
            let input = if next() % 5 == 0 {
                ViewportInput::Tick { now_ms: now }
            } else {
                for event in &events {
                    last_fraction.insert(event.item_index, event.visible_fraction);
                }
                ViewportInput::Batch(events)
            };

            let (next_state, actions) = policy.transition(state, input);
            for action in actions {
                if let ActivationAction::Activated { index, .. } = action {
                    let fraction = last_fraction.get(&index).copied().unwrap_or(0.0);
                    assert!(
                        fraction >= DEFAULT_VISIBILITY_THRESHOLD,
                        "activated {index} with last fraction {fraction}"
                    );
                }
            }
            state = next_state;
        }
    }
}
