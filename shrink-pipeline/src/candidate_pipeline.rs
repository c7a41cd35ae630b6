use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry a request id so every log line of one run can be tied
/// together.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a pipeline run produced, stage by stage.
pub struct PipelineResult<Q, C> {
    /// Candidates returned by all sources, before filtering.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by filters (pre- and post-selection).
    pub filtered_candidates: Vec<C>,
    /// Final, ordered output.
    pub selected_candidates: Vec<C>,
    /// The query after query hydration.
    pub query: Arc<Q>,
}

/// A candidate pipeline: query hydration, retrieval, hydration, filtering,
/// scoring, selection, post-selection passes and side effects.
///
/// Implementors only wire components; `execute` drives the stages. A failing
/// component is logged and its stage skipped, never fatal to the run.
#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: HasRequestId + Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;
    fn result_size(&self) -> usize;

    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let hydrated_query = self.hydrate_query(query).await;

        let retrieved_candidates = self.fetch_candidates(&hydrated_query).await;
        let hydrated = self
            .hydrate(&hydrated_query, retrieved_candidates.clone(), self.hydrators())
            .await;
        let (kept, mut filtered_candidates) =
            self.filter(&hydrated_query, hydrated, self.filters()).await;
        let scored = self.score(&hydrated_query, kept).await;

        let selected = self.select(&hydrated_query, scored);
        let post_hydrated = self
            .hydrate(&hydrated_query, selected, self.post_selection_hydrators())
            .await;
        let (mut final_candidates, post_removed) = self
            .filter(&hydrated_query, post_hydrated, self.post_selection_filters())
            .await;
        filtered_candidates.extend(post_removed);
        final_candidates.truncate(self.result_size());

        let query = Arc::new(hydrated_query);
        self.run_side_effects(Arc::new(SideEffectInput {
            query: Arc::clone(&query),
            selected_candidates: final_candidates.clone(),
        }))
        .await;

        PipelineResult {
            retrieved_candidates,
            filtered_candidates,
            selected_candidates: final_candidates,
            query,
        }
    }

    /// Run all enabled query hydrators in parallel and merge their fields.
    async fn hydrate_query(&self, query: Q) -> Q {
        let request_id = query.request_id().to_string();
        let hydrators: Vec<_> = self
            .query_hydrators()
            .iter()
            .filter(|h| h.enable(&query))
            .collect();
        let results = join_all(hydrators.iter().map(|h| h.hydrate(&query))).await;

        let mut hydrated_query = query.clone();
        for (hydrator, result) in hydrators.iter().zip(results) {
            match result {
                Ok(hydrated) => hydrator.update(&mut hydrated_query, hydrated),
                Err(err) => log::warn!(
                    "request_id={} stage=QueryHydrator component={} failed: {}",
                    request_id,
                    hydrator.name(),
                    err
                ),
            }
        }
        hydrated_query
    }

    /// Run all enabled sources in parallel and concatenate their candidates.
    async fn fetch_candidates(&self, query: &Q) -> Vec<C> {
        let sources: Vec<_> = self.sources().iter().filter(|s| s.enable(query)).collect();
        let results = join_all(sources.iter().map(|s| s.get_candidates(query))).await;

        let mut collected = Vec::new();
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(mut candidates) => {
                    log::info!(
                        "request_id={} stage=Source component={} fetched {} candidates",
                        query.request_id(),
                        source.name(),
                        candidates.len()
                    );
                    collected.append(&mut candidates);
                }
                Err(err) => log::warn!(
                    "request_id={} stage=Source component={} failed: {}",
                    query.request_id(),
                    source.name(),
                    err
                ),
            }
        }
        collected
    }

    /// Run hydrators in parallel; each copies its own fields onto the
    /// candidates. A hydrator returning the wrong count is skipped.
    async fn hydrate(
        &self,
        query: &Q,
        mut candidates: Vec<C>,
        hydrators: &[Box<dyn Hydrator<Q, C>>],
    ) -> Vec<C> {
        let enabled: Vec<_> = hydrators.iter().filter(|h| h.enable(query)).collect();
        let results = join_all(enabled.iter().map(|h| h.hydrate(query, &candidates))).await;

        for (hydrator, result) in enabled.iter().zip(results) {
            match result {
                Ok(hydrated) if hydrated.len() == candidates.len() => {
                    hydrator.update_all(&mut candidates, hydrated);
                }
                Ok(hydrated) => log::warn!(
                    "request_id={} stage=Hydrator component={} returned {} candidates, expected {}",
                    query.request_id(),
                    hydrator.name(),
                    hydrated.len(),
                    candidates.len()
                ),
                Err(err) => log::warn!(
                    "request_id={} stage=Hydrator component={} failed: {}",
                    query.request_id(),
                    hydrator.name(),
                    err
                ),
            }
        }
        candidates
    }

    /// Run filters sequentially. Returns (kept, removed).
    async fn filter(
        &self,
        query: &Q,
        candidates: Vec<C>,
        filters: &[Box<dyn Filter<Q, C>>],
    ) -> (Vec<C>, Vec<C>) {
        let mut kept = candidates;
        let mut removed = Vec::new();
        for filter in filters.iter().filter(|f| f.enable(query)) {
            let backup = kept.clone();
            match filter.filter(query, kept).await {
                Ok(result) => {
                    kept = result.kept;
                    removed.extend(result.removed);
                }
                Err(err) => {
                    log::warn!(
                        "request_id={} stage=Filter component={} failed: {}",
                        query.request_id(),
                        filter.name(),
                        err
                    );
                    kept = backup;
                }
            }
        }
        (kept, removed)
    }

    /// Run scorers sequentially; later scorers see earlier scores.
    async fn score(&self, query: &Q, mut candidates: Vec<C>) -> Vec<C> {
        for scorer in self.scorers().iter().filter(|s| s.enable(query)) {
            match scorer.score(query, &candidates).await {
                Ok(scored) if scored.len() == candidates.len() => {
                    scorer.update_all(&mut candidates, scored);
                }
                Ok(scored) => log::warn!(
                    "request_id={} stage=Scorer component={} returned {} candidates, expected {}",
                    query.request_id(),
                    scorer.name(),
                    scored.len(),
                    candidates.len()
                ),
                Err(err) => log::warn!(
                    "request_id={} stage=Scorer component={} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    err
                ),
            }
        }
        candidates
    }

    fn select(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let selector = self.selector();
        if selector.enable(query) {
            selector.select(query, candidates)
        } else {
            candidates
        }
    }

    /// Side effects run in parallel and are awaited; failures are logged.
    async fn run_side_effects(&self, input: Arc<SideEffectInput<Q, C>>) {
        let side_effects = self.side_effects();
        let enabled: Vec<_> = side_effects
            .iter()
            .filter(|s| s.enable(Arc::clone(&input.query)))
            .collect();
        let results = join_all(enabled.iter().map(|s| s.run(Arc::clone(&input)))).await;
        for (side_effect, result) in enabled.iter().zip(results) {
            if let Err(err) = result {
                log::warn!(
                    "request_id={} stage=SideEffect component={} failed: {}",
                    input.query.request_id(),
                    side_effect.name(),
                    err
                );
            }
        }
    }
}
