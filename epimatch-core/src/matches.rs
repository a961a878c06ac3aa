use crate::ImagePoint;
use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Pixel-space keypoint match between two images.
///
/// The first point lies on the first image and the second point on the
/// second image. Both are raw pixel coordinates; no camera model has been
/// applied, which is what makes the pair suitable for fundamental matrix
/// estimation rather than essential matrix estimation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct FeatureMatch(pub Point2<f64>, pub Point2<f64>);

impl FeatureMatch {
    /// Forms the match from the keypoints it pairs up.
    pub fn from_image_points(a: &impl ImagePoint, b: &impl ImagePoint) -> Self {
        Self(a.image_point(), b.image_point())
    }
}
