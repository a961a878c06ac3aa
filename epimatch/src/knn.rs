use space::{Knn, LinearKnn, Metric, Neighbor};

/// For every query descriptor, finds its two nearest neighbors among the
/// target descriptors, ascending by distance.
///
/// The outer vector is indexed like `queries`; each inner list holds at
/// most two candidates and may hold fewer when the target set is too small
/// to provide them. The ratio filter treats such lists as unratable and
/// clears them.
pub fn two_nearest<D, M>(queries: &[D], targets: &[D], metric: M) -> Vec<Vec<Neighbor<M::Unit>>>
where
    M: Metric<D>,
{
    let search = LinearKnn {
        metric,
        iter: targets.iter(),
    };
    queries
        .iter()
        .map(|query| search.knn(query, 2).into_iter().collect())
        .collect()
}
