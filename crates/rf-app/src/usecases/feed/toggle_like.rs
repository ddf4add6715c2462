//! Optimistic like / unlike.
//! 乐观点赞：先更新本地状态，失败后回滚。
//!
//! 1. snapshot the current liked flag and count, apply the toggled value
//! 2. run the backend call through the resilient executor
//! 3. success keeps the optimistic value; terminal failure restores the
//!    snapshot exactly and surfaces a classified error
//!
//! A second toggle on the same video while one is in flight is rejected with
//! [`ToggleLikeOutcome::AlreadyPending`].

use std::sync::Arc;

use tracing::{info, info_span, warn, Instrument};

use rf_core::error::{ClassifiedError, ErrorCategory, ErrorOrigin};
use rf_core::feed::LikeSnapshot;
use rf_core::ids::VideoId;
use rf_core::optimistic::OptimisticEdit;
use rf_core::ports::{ClockPort, EngagementPort, ErrorReporterPort};
use rf_core::retry::RetryPolicy;

use super::persistence::PersistFeedState;
use super::store::FeedStore;
use crate::usecases::internal::report::report_error;
use crate::usecases::resilient_executor::ResilientExecutor;

pub const VIDEO_NOT_FOUND: &str = "VIDEO_NOT_FOUND";
pub const MUTATION_REJECTED: &str = "MUTATION_REJECTED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLikeOutcome {
    Liked { like_count: u64 },
    Unliked { like_count: u64 },
    /// A toggle for this video is still in flight; nothing was changed.
    AlreadyPending,
    /// The session was unmounted before the backend answered.
    Discarded,
}

pub struct ToggleLike {
    engagement: Arc<dyn EngagementPort>,
    executor: Arc<ResilientExecutor>,
    store: Arc<FeedStore>,
    persistence: Arc<PersistFeedState>,
    reporter: Arc<dyn ErrorReporterPort>,
    clock: Arc<dyn ClockPort>,
    policy: RetryPolicy,
}

enum Begin {
    Started {
        edit: OptimisticEdit<LikeSnapshot>,
        generation: u64,
    },
    Pending,
    Detached,
    Missing,
}

impl ToggleLike {
    pub fn new(
        engagement: Arc<dyn EngagementPort>,
        executor: Arc<ResilientExecutor>,
        store: Arc<FeedStore>,
        persistence: Arc<PersistFeedState>,
        reporter: Arc<dyn ErrorReporterPort>,
        clock: Arc<dyn ClockPort>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            engagement,
            executor,
            store,
            persistence,
            reporter,
            clock,
            policy,
        }
    }

    pub async fn execute(&self, id: &VideoId) -> Result<ToggleLikeOutcome, ClassifiedError> {
        let span = info_span!("usecase.toggle_like.execute", video_id = %id);

        async {
            let begin = self
                .store
                .update(|state| {
                    if state.detached {
                        return Begin::Detached;
                    }
                    if state.pending_likes.contains(id) {
                        return Begin::Pending;
                    }
                    let Some(mut current) = state.like_snapshot(id) else {
                        return Begin::Missing;
                    };
                    let next = current.toggled();
                    let edit = OptimisticEdit::apply(&mut current, next);
                    state.set_like_snapshot(id, current);
                    state.pending_likes.insert(id.clone());
                    Begin::Started {
                        edit,
                        generation: state.generation,
                    }
                })
                .await;

            let (mut edit, generation) = match begin {
                Begin::Started { edit, generation } => (edit, generation),
                Begin::Pending => {
                    info!("like toggle already in flight, ignoring");
                    return Ok(ToggleLikeOutcome::AlreadyPending);
                }
                Begin::Detached => return Ok(ToggleLikeOutcome::Discarded),
                Begin::Missing => {
                    let err = ClassifiedError::validation(
                        VIDEO_NOT_FOUND,
                        format!("Video {id} is not in the feed"),
                    );
                    report_error(
                        self.reporter.as_ref(),
                        self.clock.as_ref(),
                        "feed.toggle_like",
                        &err,
                    );
                    return Err(err);
                }
            };

            let target_liked = edit.applied_value().liked;
            let engagement = self.engagement.clone();
            let owned_id = id.clone();
            let result = self
                .executor
                .execute(
                    if target_liked { "engagement.like" } else { "engagement.unlike" },
                    self.policy,
                    ErrorOrigin::Engagement,
                    || {
                        let engagement = engagement.clone();
                        let id = owned_id.clone();
                        async move {
                            if target_liked {
                                engagement.like(&id).await
                            } else {
                                engagement.unlike(&id).await
                            }
                        }
                    },
                )
                .await;

            let failure = match result {
                Ok(true) => None,
                Ok(false) => Some(ClassifiedError::new(
                    MUTATION_REJECTED,
                    ErrorCategory::Unknown,
                    false,
                    "The action could not be completed.",
                )),
                Err(failure) => Some(failure.into_classified()),
            };

            let detached = self
                .store
                .update(|state| {
                    state.pending_likes.remove(id);
                    if state.detached {
                        return true;
                    }
                    if failure.is_some() {
                        let mut current = state.like_snapshot(id).unwrap_or(*edit.applied_value());
                        let previous_liked = edit.previous_value().liked;
                        // A reload brought fresh counts; only the liked flag is ours to undo.
                        let rolled_back = if state.generation == generation {
                            edit.clone().rollback(&mut current)
                        } else {
                            current.liked = previous_liked;
                            true
                        };
                        if rolled_back {
                            state.set_like_snapshot(id, current);
                        }
                    }
                    false
                })
                .await;

            if detached {
                return Ok(ToggleLikeOutcome::Discarded);
            }

            if let Some(err) = failure {
                warn!(code = %err.code, "like toggle rolled back");
                report_error(
                    self.reporter.as_ref(),
                    self.clock.as_ref(),
                    "feed.toggle_like",
                    &err,
                );
                return Err(err);
            }

            let committed = *edit.commit();
            // Failures are reported inside; the toggle itself already succeeded.
            let _ = self.persistence.save().await;

            Ok(if committed.liked {
                ToggleLikeOutcome::Liked {
                    like_count: committed.like_count,
                }
            } else {
                ToggleLikeOutcome::Unliked {
                    like_count: committed.like_count,
                }
            })
        }
        .instrument(span)
        .await
    }
}
