use async_trait::async_trait;

use crate::config::RiskConfig;
use crate::region::score_store;
use crate::scorer::Scorer;
use crate::types::{AnalysisQuery, StoreCandidate};

/// Scores stores against the configured risk bands.
pub struct WeightedRiskScorer {
    config: RiskConfig,
}

impl WeightedRiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Scorer<AnalysisQuery, StoreCandidate> for WeightedRiskScorer {
    async fn score(
        &self,
        _query: &AnalysisQuery,
        candidates: &[StoreCandidate],
    ) -> Result<Vec<StoreCandidate>, String> {
        Ok(candidates
            .iter()
            .map(|c| {
                let (score, level, reasons) = score_store(c, &self.config);
                StoreCandidate {
                    risk_score: Some(score),
                    risk_level: Some(level),
                    risk_reasons: reasons,
                    ..Default::default()
                }
            })
            .collect())
    }

    fn update(&self, candidate: &mut StoreCandidate, scored: StoreCandidate) {
        candidate.risk_score = scored.risk_score;
        candidate.risk_level = scored.risk_level;
        candidate.risk_reasons = scored.risk_reasons;
    }
}
