use crate::selector::Selector;
use crate::types::{AnalysisQuery, StoreCandidate};

/// Stores by risk score, optionally cut to the top N.
#[derive(Default)]
pub struct RiskScoreSelector {
    pub top: Option<usize>,
}

impl Selector<AnalysisQuery, StoreCandidate> for RiskScoreSelector {
    fn score(&self, candidate: &StoreCandidate) -> f64 {
        candidate.risk_score.map(f64::from).unwrap_or(f64::NEG_INFINITY)
    }

    fn size(&self) -> Option<usize> {
        self.top
    }
}
