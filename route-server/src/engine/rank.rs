//! Candidate ranking.

use crate::domain::{Criterion, EvaluatedRoute};

/// Rank evaluated routes best-first under `criterion`.
///
/// Returns a new list; the input is left as is. The sort is stable, so
/// routes with equal keys keep their fetch order.
pub fn rank_routes(routes: &[EvaluatedRoute], criterion: Criterion) -> Vec<EvaluatedRoute> {
    let key = criterion.sort_key();
    let mut ranked = routes.to_vec();
    ranked.sort_by(|a, b| key(&a.metrics).total_cmp(&key(&b.metrics)));
    ranked
}
