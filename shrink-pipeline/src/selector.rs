use std::cmp::Ordering;

use crate::util;

/// Orders scored candidates and cuts the list down.
pub trait Selector<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Sort by score, then truncate to `size()` when set.
    fn select(&self, _query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Decide if this selector should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// The value candidates are ranked on, such as risk points or the
    /// weighted store score.
    fn score(&self, candidate: &C) -> f64;

    /// Highest score first. The sort is stable, so equal scores keep their
    /// source order; NaN scores go last.
    fn sort(&self, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let (sa, sb) = (self.score(a), self.score(b));
            match (sa.is_nan(), sb.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => sb.total_cmp(&sa),
            }
        });
        sorted
    }

    /// How many candidates to keep after sorting. `None` keeps them all.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Returns a stable name for log lines.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
