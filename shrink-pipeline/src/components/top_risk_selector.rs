use crate::selector::Selector;
use crate::types::{AnalysisQuery, ProductCandidate};

/// Keeps products with positive risk points, highest first.
pub struct TopRiskSelector {
    pub k: usize,
}

impl Default for TopRiskSelector {
    fn default() -> Self {
        Self { k: 20 }
    }
}

impl Selector<AnalysisQuery, ProductCandidate> for TopRiskSelector {
    fn select(&self, _query: &AnalysisQuery, candidates: Vec<ProductCandidate>) -> Vec<ProductCandidate> {
        let risky = candidates
            .into_iter()
            .filter(|c| c.risk_points.unwrap_or(0) > 0)
            .collect();
        let mut sorted = self.sort(risky);
        sorted.truncate(self.k);
        sorted
    }

    fn score(&self, candidate: &ProductCandidate) -> f64 {
        candidate.risk_points.map(f64::from).unwrap_or(f64::NEG_INFINITY)
    }

    fn size(&self) -> Option<usize> {
        Some(self.k)
    }
}
