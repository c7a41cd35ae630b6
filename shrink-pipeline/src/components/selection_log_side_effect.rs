use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::AnalysisQuery;

/// Logs how many candidates a run selected and for which scope.
pub struct SelectionLogSideEffect {
    pub label: &'static str,
}

#[async_trait]
impl<C> SideEffect<AnalysisQuery, C> for SelectionLogSideEffect
where
    C: Clone + Send + Sync + 'static,
{
    async fn run(&self, input: Arc<SideEffectInput<AnalysisQuery, C>>) -> Result<(), String> {
        log::info!(
            "request_id={} {}: selected {} (periods: {})",
            input.query.request_id,
            self.label,
            input.selected_candidates.len(),
            if input.query.scope.periods.is_empty() {
                "all".to_string()
            } else {
                input.query.scope.periods.join(", ")
            }
        );
        Ok(())
    }
}
