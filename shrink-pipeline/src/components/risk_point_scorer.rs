use async_trait::async_trait;

use crate::scorer::Scorer;
use crate::types::{AnalysisQuery, ProductCandidate};
use crate::util::format_thousands;

const INTERNAL_THEFT_POINTS: i32 = 40;
const CHRONIC_POINTS: i32 = 25;
const LARGE_SHORTAGE: f64 = -500.0;
const SMALL_SHORTAGE: f64 = -100.0;

/// Adds up risk points from the detector flags and the shortage amount.
pub struct RiskPointScorer;

fn points_for(candidate: &ProductCandidate) -> (i32, Vec<String>) {
    let mut points = 0;
    let mut reasons = Vec::new();

    if candidate.internal_theft {
        points += INTERNAL_THEFT_POINTS;
        reasons.push("internal theft".to_string());
    }
    if candidate.chronic {
        points += CHRONIC_POINTS;
        reasons.push("chronic".to_string());
    }
    if candidate.diff_amount < LARGE_SHORTAGE {
        points += 20;
        reasons.push(format!("shortage {}", format_thousands(candidate.diff_amount)));
    } else if candidate.diff_amount < SMALL_SHORTAGE {
        points += 10;
    }
    (points, reasons)
}

#[async_trait]
impl Scorer<AnalysisQuery, ProductCandidate> for RiskPointScorer {
    async fn score(
        &self,
        _query: &AnalysisQuery,
        candidates: &[ProductCandidate],
    ) -> Result<Vec<ProductCandidate>, String> {
        Ok(candidates
            .iter()
            .map(|c| {
                let (points, reasons) = points_for(c);
                ProductCandidate {
                    risk_points: Some(points),
                    risk_reasons: reasons,
                    ..Default::default()
                }
            })
            .collect())
    }

    fn update(&self, candidate: &mut ProductCandidate, scored: ProductCandidate) {
        candidate.risk_points = scored.risk_points;
        candidate.risk_reasons = scored.risk_reasons;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_amounts_add_up() {
        let candidate = ProductCandidate {
            internal_theft: true,
            chronic: true,
            diff_amount: -1500.0,
            ..Default::default()
        };
        let (points, reasons) = points_for(&candidate);
        assert_eq!(points, 85);
        assert_eq!(reasons, vec!["internal theft", "chronic", "shortage -1.500"]);
    }

    #[test]
    fn moderate_shortage_scores_without_reason() {
        let candidate = ProductCandidate {
            diff_amount: -150.0,
            ..Default::default()
        };
        let (points, reasons) = points_for(&candidate);
        assert_eq!(points, 10);
        assert!(reasons.is_empty());

        let small = ProductCandidate {
            diff_amount: -100.0,
            ..Default::default()
        };
        assert_eq!(points_for(&small).0, 0);
    }
}
