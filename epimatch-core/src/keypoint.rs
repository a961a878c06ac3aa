use nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Allows the retrieval of the point on the image the feature came from.
pub trait ImagePoint {
    /// Retrieves the point on the image
    fn image_point(&self) -> Point2<f64>;
}

/// A point of interest in an image, along with the metadata the detector
/// attached to it. This pretty much follows from OpenCV conventions.
///
/// Keypoints are immutable once detected. The location is on the image frame
/// in pixel coordinates, so it is neither undistorted nor normalized: the
/// `+x` axis faces right and the `+y` axis faces the bottom of the image,
/// both starting from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KeyPoint {
    /// The pixel location the feature was detected at.
    pub point: (f32, f32),
    /// The magnitude of response from the detector.
    pub response: f32,
    /// The radius defining the extent of the keypoint, in pixel units.
    pub size: f32,
    /// The level of scale space in which the keypoint was detected.
    pub octave: usize,
    /// The orientation angle.
    pub angle: f32,
}

impl ImagePoint for KeyPoint {
    fn image_point(&self) -> Point2<f64> {
        Point2::new(self.point.0 as f64, self.point.1 as f64)
    }
}
