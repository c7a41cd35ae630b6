use async_trait::async_trait;
use std::sync::Arc;

use shrink_ledger::LedgerRow;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::detector_flag_hydrator::DetectorFlagHydrator;
use crate::components::ledger_product_source::LedgerProductSource;
use crate::components::missing_code_filter::MissingCodeFilter;
use crate::components::risk_point_scorer::RiskPointScorer;
use crate::components::selection_log_side_effect::SelectionLogSideEffect;
use crate::components::top_risk_selector::TopRiskSelector;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{AnalysisQuery, ProductCandidate};

/// The 20 riskiest products of a store.
///
/// 1. LedgerProductSource emits one candidate per row in scope
/// 2. MissingCodeFilter drops rows without a product code
/// 3. DetectorFlagHydrator marks internal theft, chronic and mixed-up family members
/// 4. RiskPointScorer adds up points and reasons
/// 5. TopRiskSelector keeps positive scores, highest 20
pub struct RiskyProductsPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<AnalysisQuery>>>,
    sources: Vec<Box<dyn Source<AnalysisQuery, ProductCandidate>>>,
    hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, ProductCandidate>>>,
    filters: Vec<Box<dyn Filter<AnalysisQuery, ProductCandidate>>>,
    scorers: Vec<Box<dyn Scorer<AnalysisQuery, ProductCandidate>>>,
    selector: TopRiskSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, ProductCandidate>>>,
    post_selection_filters: Vec<Box<dyn Filter<AnalysisQuery, ProductCandidate>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<AnalysisQuery, ProductCandidate>>>>,
    result_size: usize,
}

impl RiskyProductsPipeline {
    pub fn new(rows: Vec<LedgerRow>) -> Self {
        let selector = TopRiskSelector::default();
        let result_size = selector.k;

        let side_effects: Arc<Vec<Box<dyn SideEffect<AnalysisQuery, ProductCandidate>>>> =
            Arc::new(vec![Box::new(SelectionLogSideEffect {
                label: "risky products",
            })]);

        Self {
            query_hydrators: Vec::new(),
            sources: vec![Box::new(LedgerProductSource::new(rows))],
            hydrators: vec![Box::new(DetectorFlagHydrator)],
            filters: vec![Box::new(MissingCodeFilter)],
            scorers: vec![Box::new(RiskPointScorer)],
            selector,
            post_selection_hydrators: Vec::new(),
            post_selection_filters: Vec::new(),
            side_effects,
            result_size,
        }
    }
}

#[async_trait]
impl CandidatePipeline<AnalysisQuery, ProductCandidate> for RiskyProductsPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<AnalysisQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<AnalysisQuery, ProductCandidate>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<AnalysisQuery, ProductCandidate>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<AnalysisQuery, ProductCandidate>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<AnalysisQuery, ProductCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<AnalysisQuery, ProductCandidate> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<AnalysisQuery, ProductCandidate>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<AnalysisQuery, ProductCandidate>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<AnalysisQuery, ProductCandidate>>>> {
        Arc::clone(&self.side_effects)
    }

    fn result_size(&self) -> usize {
        self.result_size
    }
}
