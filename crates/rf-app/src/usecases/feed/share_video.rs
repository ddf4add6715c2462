//! Use case for sharing a video
//! 分享视频的用例
//!
//! Not optimistic: the share count moves only after the backend confirms.

use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use rf_core::error::{ClassifiedError, ErrorCategory, ErrorOrigin};
use rf_core::ids::VideoId;
use rf_core::ports::{ClockPort, EngagementPort, ErrorReporterPort};
use rf_core::retry::RetryPolicy;

use super::store::FeedStore;
use super::toggle_like::{MUTATION_REJECTED, VIDEO_NOT_FOUND};
use crate::usecases::internal::report::report_error;
use crate::usecases::resilient_executor::ResilientExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared { share_count: u64 },
    Discarded,
}

pub struct ShareVideo {
    engagement: Arc<dyn EngagementPort>,
    executor: Arc<ResilientExecutor>,
    store: Arc<FeedStore>,
    reporter: Arc<dyn ErrorReporterPort>,
    clock: Arc<dyn ClockPort>,
    policy: RetryPolicy,
}

impl ShareVideo {
    pub fn new(
        engagement: Arc<dyn EngagementPort>,
        executor: Arc<ResilientExecutor>,
        store: Arc<FeedStore>,
        reporter: Arc<dyn ErrorReporterPort>,
        clock: Arc<dyn ClockPort>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            engagement,
            executor,
            store,
            reporter,
            clock,
            policy,
        }
    }

    pub async fn execute(&self, id: &VideoId) -> Result<ShareOutcome, ClassifiedError> {
        let span = info_span!("usecase.share_video.execute", video_id = %id);

        async {
            let known = self.store.read(|state| state.index_of(id).is_some()).await;
            if !known {
                return Err(self.fail(ClassifiedError::validation(
                    VIDEO_NOT_FOUND,
                    format!("Video {id} is not in the feed"),
                )));
            }

            let engagement = self.engagement.clone();
            let owned_id = id.clone();
            let result = self
                .executor
                .execute("engagement.share", self.policy, ErrorOrigin::Engagement, || {
                    let engagement = engagement.clone();
                    let id = owned_id.clone();
                    async move { engagement.share(&id).await }
                })
                .await;

            match result {
                Ok(true) => {}
                Ok(false) => {
                    return Err(self.fail(ClassifiedError::new(
                        MUTATION_REJECTED,
                        ErrorCategory::Unknown,
                        false,
                        "The action could not be completed.",
                    )))
                }
                Err(failure) => return Err(self.fail(failure.into_classified())),
            }

            let share_count = self
                .store
                .update(|state| {
                    if state.detached {
                        return None;
                    }
                    let index = state.index_of(id)?;
                    let stats = &mut state.videos[index].stats;
                    stats.shares = stats.shares.saturating_add(1);
                    Some(stats.shares)
                })
                .await;

            match share_count {
                Some(share_count) => {
                    info!(share_count, "video shared");
                    Ok(ShareOutcome::Shared { share_count })
                }
                None => Ok(ShareOutcome::Discarded),
            }
        }
        .instrument(span)
        .await
    }

    fn fail(&self, err: ClassifiedError) -> ClassifiedError {
        report_error(
            self.reporter.as_ref(),
            self.clock.as_ref(),
            "feed.share",
            &err,
        );
        err
    }
}
