//! Position analysis provider and request bookkeeping.
//!
//! A request is single-shot: one position in, one [`Analysis`] or error out.
//! Requests may overlap; [`RequestTracker`] hands each one a token and only
//! the most recent token's result is accepted.

use async_trait::async_trait;
use chess::{Analysis, CandidateLine};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis failed: {0}")]
    Failed(String),
}

/// Source of position evaluations.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, fen: &str) -> Result<Analysis, AnalysisError>;
}

/// Stand-in provider that answers every position with the same evaluation
/// after a fixed delay.
#[derive(Debug, Clone)]
pub struct CannedAnalysis {
    delay: Duration,
}

impl CannedAnalysis {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The evaluation every request receives.
    pub fn result() -> Analysis {
        Analysis {
            evaluation: "+0.5".to_string(),
            best_move: "e2-e4".to_string(),
            top_moves: vec![
                CandidateLine::new("e2-e4", "+0.5", "e2-e4 e7-e5 Nf3 Nc6"),
                CandidateLine::new("d2-d4", "+0.3", "d2-d4 d7-d5 c4 e6"),
                CandidateLine::new("Nf3", "+0.2", "Nf3 Nf6 c4 e6"),
            ],
        }
    }
}

#[async_trait]
impl AnalysisProvider for CannedAnalysis {
    async fn analyze(&self, fen: &str) -> Result<Analysis, AnalysisError> {
        let delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX);
        tracing::debug!(fen, delay_ms, "Simulating analysis");
        tokio::time::sleep(self.delay).await;
        Ok(Self::result())
    }
}

/// Identifies one background request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Hands out request tokens and decides which results are still wanted.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    in_flight: bool,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request. Any older request becomes stale.
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.in_flight = true;
        RequestToken(self.latest)
    }

    /// True while the most recent request has not resolved.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Mark `token` resolved. Returns whether its result should be applied;
    /// stale tokens return `false` and leave the busy flag alone.
    pub fn finish(&mut self, token: RequestToken) -> bool {
        if !self.is_current(token) {
            tracing::debug!(?token, latest = self.latest, "Discarding stale result");
            return false;
        }
        self.in_flight = false;
        true
    }

    /// Make every outstanding request stale.
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::STARTING_FEN;

    #[tokio::test]
    async fn test_canned_provider_returns_fixed_result() {
        let provider = CannedAnalysis::new(Duration::ZERO);
        let analysis = provider.analyze(STARTING_FEN).await.unwrap();
        assert_eq!(analysis.evaluation, "+0.5");
        assert_eq!(analysis.best_move, "e2-e4");
        let moves: Vec<&str> = analysis.top_moves.iter().map(|l| l.mv.as_str()).collect();
        assert_eq!(moves, ["e2-e4", "d2-d4", "Nf3"]);
        assert!(analysis.is_complete());
    }

    #[test]
    fn test_latest_request_wins() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(tracker.is_busy());

        assert!(tracker.finish(second));
        assert!(!tracker.is_busy());
        assert!(!tracker.finish(first));
    }

    #[test]
    fn test_stale_result_keeps_busy() {
        let mut tracker = RequestTracker::new();
        let first = tracker.begin();
        let _second = tracker.begin();
        assert!(!tracker.finish(first));
        assert!(tracker.is_busy());
    }

    #[test]
    fn test_cancel_invalidates_outstanding() {
        let mut tracker = RequestTracker::new();
        let token = tracker.begin();
        tracker.cancel();
        assert!(!tracker.is_busy());
        assert!(!tracker.finish(token));
    }
}
