//! Prometheus counters for the view recorder.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;
use services::TrackingOutcome;

pub struct Metrics {
    registry: Registry,
    views_recorded: Counter,
    view_tracking_failures: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let views_recorded = Counter::default();
        let view_tracking_failures = Counter::default();

        registry.register(
            "views_recorded",
            "Article views counted by the view recorder",
            views_recorded.clone(),
        );
        registry.register(
            "view_tracking_failures",
            "View tracking attempts that failed and were dropped",
            view_tracking_failures.clone(),
        );

        Self {
            registry,
            views_recorded,
            view_tracking_failures,
        }
    }

    pub fn observe(&self, outcome: TrackingOutcome) {
        match outcome {
            TrackingOutcome::Recorded => self.views_recorded.inc(),
            TrackingOutcome::Failed => self.view_tracking_failures.inc(),
        };
    }

    /// OpenMetrics text exposition of every registered metric.
    pub fn render(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_land_in_their_counters() {
        let metrics = Metrics::new();
        metrics.observe(TrackingOutcome::Recorded);
        metrics.observe(TrackingOutcome::Recorded);
        metrics.observe(TrackingOutcome::Failed);

        let text = metrics.render().unwrap();
        assert!(text.contains("views_recorded_total 2"));
        assert!(text.contains("view_tracking_failures_total 1"));
        assert!(text.ends_with("# EOF\n"));
    }
}
