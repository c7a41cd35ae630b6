use std::collections::HashSet;

use async_trait::async_trait;
use shrink_ledger::LedgerRow;

use crate::detectors::{detect_chronic_shortage, detect_internal_theft};
use crate::hydrator::Hydrator;
use crate::types::{AnalysisQuery, ProductCandidate};

/// Marks candidates the detectors flagged.
///
/// The detectors run over the candidates' own rows, so the flags reflect
/// exactly the slice being ranked.
pub struct DetectorFlagHydrator;

#[async_trait]
impl Hydrator<AnalysisQuery, ProductCandidate> for DetectorFlagHydrator {
    async fn hydrate(
        &self,
        _query: &AnalysisQuery,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        let rows: Vec<LedgerRow> = candidates.iter().map(|c| c.row.clone()).collect();

        let internal: HashSet<String> = detect_internal_theft(&rows)
            .into_iter()
            .map(|f| f.product_code)
            .collect();
        let chronic: HashSet<String> = detect_chronic_shortage(&rows)
            .into_iter()
            .map(|f| f.product_code)
            .collect();

        Ok(candidates
            .iter()
            .map(|c| ProductCandidate {
                internal_theft: internal.contains(&c.product_code),
                chronic: chronic.contains(&c.product_code),
                ..Default::default()
            })
            .collect())
    }

    fn update(&self, candidate: &mut ProductCandidate, hydrated: ProductCandidate) {
        candidate.internal_theft = hydrated.internal_theft;
        candidate.chronic = hydrated.chronic;
    }
}
