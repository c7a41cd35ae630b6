use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use shrink_ledger::LedgerRow;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::latest_period_query_hydrator::LatestPeriodQueryHydrator;
use crate::components::risk_score_selector::RiskScoreSelector;
use crate::components::selection_log_side_effect::SelectionLogSideEffect;
use crate::components::store_metrics_source::StoreMetricsSource;
use crate::components::weighted_risk_scorer::WeightedRiskScorer;
use crate::config::RiskConfig;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{AnalysisQuery, StoreCandidate};

/// Ranks the stores of a region by weighted risk score.
///
/// 1. LatestPeriodQueryHydrator picks the newest period when none is given
/// 2. StoreMetricsSource builds one candidate per store
/// 3. WeightedRiskScorer applies the configured bands
/// 4. RiskScoreSelector orders by score, optionally top N
pub struct RegionDigestPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<AnalysisQuery>>>,
    sources: Vec<Box<dyn Source<AnalysisQuery, StoreCandidate>>>,
    hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, StoreCandidate>>>,
    filters: Vec<Box<dyn Filter<AnalysisQuery, StoreCandidate>>>,
    scorers: Vec<Box<dyn Scorer<AnalysisQuery, StoreCandidate>>>,
    selector: RiskScoreSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, StoreCandidate>>>,
    post_selection_filters: Vec<Box<dyn Filter<AnalysisQuery, StoreCandidate>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<AnalysisQuery, StoreCandidate>>>>,
    result_size: usize,
}

impl RegionDigestPipeline {
    pub fn new(
        rows: Vec<LedgerRow>,
        cash_codes: HashSet<String>,
        config: RiskConfig,
        top: Option<usize>,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<AnalysisQuery>>> =
            vec![Box::new(LatestPeriodQueryHydrator::new(&rows))];

        let sources: Vec<Box<dyn Source<AnalysisQuery, StoreCandidate>>> = vec![Box::new(
            StoreMetricsSource::new(Arc::new(rows), Arc::new(cash_codes)),
        )];

        let scorers: Vec<Box<dyn Scorer<AnalysisQuery, StoreCandidate>>> =
            vec![Box::new(WeightedRiskScorer::new(config))];

        let side_effects: Arc<Vec<Box<dyn SideEffect<AnalysisQuery, StoreCandidate>>>> =
            Arc::new(vec![Box::new(SelectionLogSideEffect {
                label: "region digest",
            })]);

        Self {
            query_hydrators,
            sources,
            hydrators: Vec::new(),
            filters: Vec::new(),
            scorers,
            selector: RiskScoreSelector { top },
            post_selection_hydrators: Vec::new(),
            post_selection_filters: Vec::new(),
            side_effects,
            result_size: top.unwrap_or(usize::MAX),
        }
    }
}

#[async_trait]
impl CandidatePipeline<AnalysisQuery, StoreCandidate> for RegionDigestPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<AnalysisQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<AnalysisQuery, StoreCandidate>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<AnalysisQuery, StoreCandidate>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<AnalysisQuery, StoreCandidate>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<AnalysisQuery, StoreCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<AnalysisQuery, StoreCandidate> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<AnalysisQuery, StoreCandidate>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<AnalysisQuery, StoreCandidate>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<AnalysisQuery, StoreCandidate>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
