use thiserror::Error;

/// All of the errors the matching pipeline can produce.
///
/// Filter stages never fail: an empty candidate or match list is a valid,
/// if uninteresting, result and flows downstream. Only feature extraction
/// and geometric verification produce user-visible errors, which is what
/// lets a caller tell "the images genuinely do not overlap" apart from "no
/// geometry could be estimated".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The detector or extractor returned zero keypoints for an image, so
    /// no matching can be attempted at all. `image` is `1` or `2`.
    #[error("no keypoints were detected in image {image}")]
    EmptyDetection { image: usize },
    /// Geometric verification needs at least eight symmetric matches to
    /// estimate a fundamental matrix; sampling is never attempted below
    /// that.
    #[error("geometric verification needs at least 8 symmetric matches, got {found}")]
    InsufficientCorrespondences { found: usize },
    /// No sampled subset produced a numerically valid fundamental matrix
    /// within the trial budget. Distinct from a valid model that simply has
    /// few inliers, which is reported as a short match list.
    #[error("no sampled subset produced a valid fundamental matrix")]
    DegenerateGeometry,
}
