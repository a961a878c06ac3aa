//! Robust feature matching between two views of a scene.
//!
//! Raw nearest-neighbor matching between two images is riddled with false
//! correspondences, and a single bad match is enough to wreck whatever
//! geometric estimation runs downstream. This crate chains three
//! increasingly strict filters behind a pluggable feature extractor to
//! produce a match set worth handing to stereo calibration, structure from
//! motion, or panorama stitching:
//!
//! 1. **Ratio test**: a candidate whose nearest and second-nearest
//!    neighbors are nearly equidistant is ambiguous and gets dropped, in
//!    each matching direction independently.
//! 2. **Symmetry test**: a pair is kept only when each keypoint is the
//!    other's best surviving candidate. Nearest-neighbor relations are not
//!    reciprocal in general, and one-sided matches are a rich source of
//!    false positives.
//! 3. **Geometric verification**: a fundamental matrix is estimated by
//!    adaptive random sample consensus over the surviving pairs, and only
//!    the matches consistent with its epipolar geometry are kept.
//!
//! ```no_run
//! use epimatch::RobustMatcher;
//!
//! # fn main() -> Result<(), epimatch::MatchError> {
//! let image_a = image::open("a.png").expect("failed to open image");
//! let image_b = image::open("b.png").expect("failed to open image");
//! let matcher = RobustMatcher::akaze();
//! let outcome = matcher.match_images(&image_a, &image_b)?;
//! println!(
//!     "{} matches, F = {}",
//!     outcome.matches.len(),
//!     outcome.fundamental.0
//! );
//! # Ok(())
//! # }
//! ```

mod error;
mod extract;
pub mod knn;
pub mod ratio;
pub mod symmetry;
pub mod verify;

pub use error::MatchError;
pub use extract::FeatureExtractor;

pub use epimatch_core::{FeatureMatch, ImagePoint, KeyPoint};
pub use fundamental::FundamentalMatrix;
pub use space;

use image::DynamicImage;
use log::{debug, info};
use space::Metric;

/// Configuration of the robust matching pipeline.
///
/// The defaults match the common robust-matching recipe; each builder
/// method validates its invariant and panics on violation, so a constructed
/// configuration is always usable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Maximum acceptable ratio between the nearest and second-nearest
    /// neighbor distances of a candidate match.
    pub ratio: f32,
    /// Whether to re-estimate the fundamental matrix over the inliers only
    /// after consensus.
    pub refine: bool,
    /// Maximum distance in pixels to the epipolar line for a match to count
    /// as an inlier.
    pub distance: f64,
    /// Desired probability that the accepted fundamental matrix was fit to
    /// an outlier-free sample.
    pub confidence: f64,
    /// Hard cap on consensus sampling trials; bounds the worst-case latency
    /// of verification.
    pub max_iterations: usize,
    /// Seed of the consensus sampler. Runs with identical inputs and seeds
    /// produce identical results.
    pub seed: u64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            ratio: 0.65,
            refine: true,
            distance: 3.0,
            confidence: 0.99,
            max_iterations: 2048,
            seed: 0,
        }
    }
}

impl MatcherConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the nearest-neighbor ratio. Must satisfy `0 < ratio <= 1`; a
    /// ratio of `1.0` disables the ratio test for every candidate that has
    /// a second neighbor.
    pub fn ratio(self, ratio: f32) -> Self {
        assert!(
            ratio > 0.0 && ratio <= 1.0,
            "epimatch: ratio must lie in (0, 1]"
        );
        Self { ratio, ..self }
    }

    /// Sets whether the fundamental matrix is recalculated from the inlier
    /// set after consensus.
    pub fn refine(self, refine: bool) -> Self {
        Self { refine, ..self }
    }

    /// Sets the maximum distance to the epipolar line. Must be finite and
    /// non-negative.
    pub fn distance(self, distance: f64) -> Self {
        assert!(
            distance.is_finite() && distance >= 0.0,
            "epimatch: distance must be finite and non-negative"
        );
        Self { distance, ..self }
    }

    /// Sets the consensus confidence level. Must lie strictly between `0`
    /// and `1`.
    pub fn confidence(self, confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "epimatch: confidence must lie strictly between 0 and 1"
        );
        Self { confidence, ..self }
    }

    /// Sets the hard cap on consensus sampling trials.
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Sets the consensus sampler seed.
    pub fn seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

/// Everything a successful match run produces.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The estimated fundamental matrix relating the two images.
    pub fundamental: FundamentalMatrix,
    /// Geometrically consistent matches as index pairs into the keypoint
    /// vectors, ordered as the symmetry filter emitted them.
    pub matches: Vec<[usize; 2]>,
    /// Keypoints detected in the first image.
    pub keypoints_a: Vec<KeyPoint>,
    /// Keypoints detected in the second image.
    pub keypoints_b: Vec<KeyPoint>,
}

/// The robust matching pipeline.
///
/// Owns the injected extractor capability, the descriptor metric, and the
/// configuration; every [`match_images`](Self::match_images) call works on
/// call-local state only, so a matcher can be shared freely across threads
/// matching different image pairs.
#[derive(Debug, Clone)]
pub struct RobustMatcher<F, M> {
    extractor: F,
    metric: M,
    config: MatcherConfig,
}

#[cfg(feature = "akaze")]
impl RobustMatcher<akaze::Akaze, bitarray::Hamming> {
    /// A matcher backed by AKAZE binary features compared under the Hamming
    /// metric, with default configuration.
    pub fn akaze() -> Self {
        Self::new(akaze::Akaze::default(), bitarray::Hamming)
    }
}

impl<F, M> RobustMatcher<F, M> {
    /// Builds the pipeline around an extractor capability and the metric
    /// used to compare its descriptors.
    pub fn new(extractor: F, metric: M) -> Self {
        Self {
            extractor,
            metric,
            config: MatcherConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn config(self, config: MatcherConfig) -> Self {
        Self { config, ..self }
    }

    /// The active configuration.
    pub fn configuration(&self) -> &MatcherConfig {
        &self.config
    }
}

impl<F, M> RobustMatcher<F, M>
where
    F: FeatureExtractor,
    M: Metric<F::Descriptor> + Clone,
    M::Unit: Into<u64>,
{
    /// Matches two images, returning the fundamental matrix together with
    /// the matches that survived every filter.
    ///
    /// The returned match list is the inlier set of the geometric
    /// verification, not the raw symmetric set; an empty list alongside
    /// `Ok` means the images share no epipolar-consistent features.
    pub fn match_images(
        &self,
        first: &DynamicImage,
        second: &DynamicImage,
    ) -> Result<MatchOutcome, MatchError> {
        let (keypoints_a, descriptors_a) = self.extractor.extract(first);
        if descriptors_a.is_empty() {
            return Err(MatchError::EmptyDetection { image: 1 });
        }
        let (keypoints_b, descriptors_b) = self.extractor.extract(second);
        if descriptors_b.is_empty() {
            return Err(MatchError::EmptyDetection { image: 2 });
        }
        info!(
            "extracted {} and {} features",
            descriptors_a.len(),
            descriptors_b.len()
        );

        let mut forward = knn::two_nearest(&descriptors_a, &descriptors_b, self.metric.clone());
        let mut reverse = knn::two_nearest(&descriptors_b, &descriptors_a, self.metric.clone());
        let cleared_forward = ratio::filter(&mut forward, self.config.ratio);
        let cleared_reverse = ratio::filter(&mut reverse, self.config.ratio);
        debug!(
            "ratio test cleared {} forward and {} reverse candidate lists",
            cleared_forward, cleared_reverse
        );

        let symmetric = symmetry::filter(&forward, &reverse);
        debug!("{} symmetric matches", symmetric.len());

        let (fundamental, matches) =
            verify::epipolar_inliers(&symmetric, &keypoints_a, &keypoints_b, &self.config)?;
        info!(
            "kept {} of {} symmetric matches",
            matches.len(),
            symmetric.len()
        );

        Ok(MatchOutcome {
            fundamental,
            matches,
            keypoints_a,
            keypoints_b,
        })
    }
}
