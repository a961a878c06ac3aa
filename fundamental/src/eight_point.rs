use crate::FundamentalMatrix;
use epimatch_core::{
    nalgebra::{self, Matrix3, OMatrix, OVector, Point2, Vector2, U9},
    sample_consensus::Estimator,
    FeatureMatch,
};
use float_ord::FloatOrd;
use num_traits::Float;

/// Performs the
/// [eight-point algorithm](https://en.wikipedia.org/wiki/Eight-point_algorithm)
/// by Richard Hartley and Andrew Zisserman on pixel correspondences.
///
/// Isotropic conditioning is applied to each image's points before solving,
/// since raw pixel magnitudes make the linear system poorly conditioned.
/// The solve is least-squares over however many matches are provided, so the
/// same estimator serves both minimal eight-match samples inside a consensus
/// process and the non-minimal refit over an inlier set.
#[derive(Copy, Clone, Debug)]
pub struct EightPoint {
    pub epsilon: f64,
    pub iterations: usize,
}

impl EightPoint {
    pub fn new() -> Self {
        Default::default()
    }

    /// Estimates the fundamental matrix from all provided matches.
    ///
    /// Returns `None` when fewer than eight matches are provided, when the
    /// points of either image coincide (conditioning is impossible), or when
    /// the eigen/singular value decompositions fail to converge.
    pub fn from_matches<I>(&self, data: I) -> Option<FundamentalMatrix>
    where
        I: Iterator<Item = FeatureMatch> + Clone,
    {
        let conditioner_a = isotropic_conditioner(data.clone().map(|FeatureMatch(a, _)| a))?;
        let conditioner_b = isotropic_conditioner(data.clone().map(|FeatureMatch(_, b)| b))?;
        // Accumulating transpose(A) * A row by row keeps the system a fixed
        // 9x9 regardless of how many matches contribute.
        let mut ata: OMatrix<f64, U9, U9> = nalgebra::zero();
        let mut rows = 0usize;
        for FeatureMatch(a, b) in data {
            let ap = conditioner_a * a.to_homogeneous();
            let bp = conditioner_b * b.to_homogeneous();
            let mut row = OVector::<f64, U9>::zeros();
            for j in 0..3 {
                let v = ap[j] * bp;
                row.fixed_rows_mut::<3>(3 * j).copy_from(&v);
            }
            ata += row * row.transpose();
            rows += 1;
        }
        if rows < 8 {
            return None;
        }
        let eigens = ata.try_symmetric_eigen(self.epsilon, self.iterations)?;
        let eigenvector = eigens
            .eigenvalues
            .iter()
            .enumerate()
            .min_by_key(|&(_, &n)| FloatOrd(n))
            .map(|(ix, _)| eigens.eigenvectors.column(ix).into_owned())?;
        // The column-major fill pairs entry 3j + i with F[(i, j)], matching
        // the constraint row layout above.
        let conditioned = Matrix3::from_iterator(eigenvector.iter().copied());
        let conditioned =
            FundamentalMatrix(conditioned).recondition(self.epsilon, self.iterations)?;
        // transpose(x') * F̂ * x on conditioned coordinates expands to
        // transpose(x') * (transpose(Tb) * F̂ * Ta) * x on pixels.
        Some(FundamentalMatrix(
            conditioner_b.transpose() * conditioned.0 * conditioner_a,
        ))
    }
}

impl Default for EightPoint {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            iterations: 1000,
        }
    }
}

impl Estimator<FeatureMatch> for EightPoint {
    type Model = FundamentalMatrix;
    type ModelIter = Option<FundamentalMatrix>;
    const MIN_SAMPLES: usize = 8;

    fn estimate<I>(&self, data: I) -> Self::ModelIter
    where
        I: Iterator<Item = FeatureMatch> + Clone,
    {
        self.from_matches(data)
    }
}

/// Builds the similarity transform that translates the centroid of the
/// points to the origin and scales them so their mean distance from it is
/// `sqrt(2)`, as prescribed by Hartley's defense of the eight-point
/// algorithm.
fn isotropic_conditioner<I>(points: I) -> Option<Matrix3<f64>>
where
    I: Iterator<Item = Point2<f64>> + Clone,
{
    let mut count = 0usize;
    let mut centroid = Vector2::zeros();
    for point in points.clone() {
        centroid += point.coords;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let centroid = centroid / count as f64;
    let mut mean_distance = 0.0;
    for point in points {
        mean_distance += (point.coords - centroid).norm();
    }
    mean_distance /= count as f64;
    if mean_distance == 0.0 {
        return None;
    }
    let scale = Float::sqrt(2.0) / mean_distance;
    Some(Matrix3::new(
        scale,
        0.0,
        -scale * centroid.x,
        0.0,
        scale,
        -scale * centroid.y,
        0.0,
        0.0,
        1.0,
    ))
}
