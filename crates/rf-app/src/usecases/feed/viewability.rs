//! Drives the activation policy and keeps exactly one item playing.
//! 根据可见性事件切换激活条目，并同步播放器状态。

use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use rf_core::error::{classify, ClassifiedError, ErrorOrigin, RawError};
use rf_core::feed::{
    playback_commands, ActivationAction, ActivationPolicy, PlaybackCommand, Video, ViewportInput,
};
use rf_core::ids::VideoId;
use rf_core::ports::{ClockPort, ErrorReporterPort, MediaPlayerPort};

use super::persistence::PersistFeedState;
use super::store::FeedStore;
use crate::usecases::internal::report::report_error;

pub struct ApplyViewability {
    policy: ActivationPolicy,
    store: Arc<FeedStore>,
    player: Arc<dyn MediaPlayerPort>,
    persistence: Arc<PersistFeedState>,
    reporter: Arc<dyn ErrorReporterPort>,
    clock: Arc<dyn ClockPort>,
}

impl ApplyViewability {
    pub fn new(
        policy: ActivationPolicy,
        store: Arc<FeedStore>,
        player: Arc<dyn MediaPlayerPort>,
        persistence: Arc<PersistFeedState>,
        reporter: Arc<dyn ErrorReporterPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            policy,
            store,
            player,
            persistence,
            reporter,
            clock,
        }
    }

    /// Feed one input to the policy and carry out the resulting actions.
    ///
    /// Returns the playback commands that were issued, in order.
    pub async fn execute(&self, input: ViewportInput) -> Vec<PlaybackCommand> {
        let span = info_span!("usecase.apply_viewability.execute");

        async {
            let transition = self
                .store
                .update(|state| {
                    if state.detached {
                        return None;
                    }
                    let (next, actions) = self.policy.transition(state.activation, input);
                    state.activation = next;

                    let mut switches = Vec::new();
                    for action in actions {
                        match action {
                            ActivationAction::Activated { index, previous } => {
                                let next_id = state.video_id_at(index).cloned();
                                let previous_id =
                                    previous.and_then(|p| state.video_id_at(p).cloned());
                                if let Some(id) = &next_id {
                                    state.video_state.current_index = index;
                                    state.video_state.record_watch(id);
                                }
                                switches.push((previous_id, next_id));
                            }
                            ActivationAction::Cleared { previous } => {
                                switches.push((state.video_id_at(previous).cloned(), None));
                            }
                        }
                    }
                    Some(switches)
                })
                .await;

            let Some(switches) = transition else {
                return Vec::new();
            };
            if switches.is_empty() {
                return Vec::new();
            }

            let mut issued = Vec::new();
            for (previous, next) in switches {
                info!(previous = ?previous, next = ?next, "active item changed");
                let commands = playback_commands(previous.as_ref(), next.as_ref());
                self.issue(&commands).await;
                issued.extend(commands);
            }

            // Failures are reported inside; activation does not depend on them.
            let _ = self.persistence.save().await;
            issued
        }
        .instrument(span)
        .await
    }

    /// Swap in a new item collection and reset activation.
    ///
    /// The previously active item (if any) is paused.
    pub async fn replace_collection(&self, videos: Vec<Video>) -> u64 {
        let (previous, generation) = self
            .store
            .update(|state| {
                let previous = state.active_video().map(|video| video.id.clone());
                let (next, _) = self
                    .policy
                    .transition(state.activation, ViewportInput::CollectionReplaced);
                state.activation = next;
                state.videos = videos;
                state.generation += 1;
                state.media_errors.clear();
                (previous, state.generation)
            })
            .await;

        if let Some(previous) = previous {
            self.issue(&[PlaybackCommand::Pause(previous)]).await;
        }
        debug!(generation, "feed collection replaced");
        generation
    }

    /// Detach the store and pause whatever is playing.
    pub async fn release(&self) {
        let active = self
            .store
            .update(|state| {
                state.detached = true;
                state.active_video().map(|video| video.id.clone())
            })
            .await;

        if let Some(active) = active {
            self.issue(&[PlaybackCommand::Pause(active)]).await;
        }
    }

    /// Record a player failure reported by the host for `id`.
    pub async fn report_media_error(&self, id: &VideoId, raw: &RawError) -> ClassifiedError {
        let classified = classify(raw, ErrorOrigin::Media);
        report_error(
            self.reporter.as_ref(),
            self.clock.as_ref(),
            "feed.media",
            &classified,
        );
        self.store
            .update(|state| {
                state.media_errors.insert(id.clone(), classified.clone());
            })
            .await;
        classified
    }

    async fn issue(&self, commands: &[PlaybackCommand]) {
        for command in commands {
            let (id, result) = match command {
                PlaybackCommand::Pause(id) => (id, self.player.pause(id).await),
                PlaybackCommand::Play(id) => (id, self.player.play(id).await),
            };

            match result {
                Ok(()) => {
                    if matches!(command, PlaybackCommand::Play(_)) {
                        self.store
                            .update(|state| {
                                state.media_errors.remove(id);
                            })
                            .await;
                    }
                }
                Err(raw) => {
                    self.report_media_error(id, &raw).await;
                }
            }
        }
    }
}
