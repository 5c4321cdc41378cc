//! # View Recorder
//!
//! Best-effort counting of public article reads. Bumps the lifetime counter
//! on the article, then the (article, day) counter. Neither step is allowed
//! to fail the read that triggered it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::ViewStatsRepository;
use tracing::{debug, warn};
use uuid::Uuid;

/// What happened to a single tracking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingOutcome {
    Recorded,
    Failed,
}

#[derive(Clone)]
pub struct ViewRecorder {
    stats: Arc<dyn ViewStatsRepository>,
}

impl ViewRecorder {
    pub fn new(stats: Arc<dyn ViewStatsRepository>) -> Self {
        Self { stats }
    }

    /// Records one view of `article_id` on the UTC day of `now`.
    ///
    /// Errors are logged and swallowed. The two counters are not updated
    /// atomically, so a failure between them leaves them drifting apart.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn record_view(
        &self,
        owner_id: Uuid,
        article_id: Uuid,
        now: DateTime<Utc>,
    ) -> TrackingOutcome {
        let day = now.date_naive();

        if let Err(e) = self.stats.increment_article_views(article_id).await {
            warn!(%article_id, error = %e, "failed to track view");
            return TrackingOutcome::Failed;
        }

        if let Err(e) = self
            .stats
            .increment_daily_views(owner_id, article_id, day)
            .await
        {
            warn!(%article_id, %day, error = %e, "failed to track daily view");
            return TrackingOutcome::Failed;
        }

        debug!(%article_id, %day, "view recorded");
        TrackingOutcome::Recorded
    }
}
