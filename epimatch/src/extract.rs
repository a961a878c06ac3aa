use epimatch_core::KeyPoint;
use image::DynamicImage;

/// Capability that turns an image into keypoints and descriptors.
///
/// The pipeline never detects features itself; it is written against this
/// trait so that corner detectors, blob detectors, or anything else can be
/// injected at construction without touching the matching logic.
/// Implementations must be deterministic: identical input and configuration
/// must produce identical keypoints and descriptors.
pub trait FeatureExtractor {
    /// The descriptor attached 1:1 to each keypoint. The pipeline only ever
    /// compares descriptors through a [`space::Metric`], so any fixed-length
    /// representation works.
    type Descriptor;

    /// Detects keypoints in `image` and computes one descriptor per
    /// keypoint, in the same order.
    fn extract(&self, image: &DynamicImage) -> (Vec<KeyPoint>, Vec<Self::Descriptor>);

    /// Detects keypoints only.
    fn detect(&self, image: &DynamicImage) -> Vec<KeyPoint> {
        self.extract(image).0
    }
}

#[cfg(feature = "akaze")]
mod akaze_support {
    use super::FeatureExtractor;
    use akaze::Akaze;
    use bitarray::BitArray;
    use epimatch_core::KeyPoint;
    use image::DynamicImage;

    /// AKAZE binary features with their keypoints translated into the
    /// pipeline's vocabulary.
    impl FeatureExtractor for Akaze {
        type Descriptor = BitArray<64>;

        fn extract(&self, image: &DynamicImage) -> (Vec<KeyPoint>, Vec<BitArray<64>>) {
            let (keypoints, descriptors) = Akaze::extract(self, image);
            let keypoints = keypoints
                .into_iter()
                .map(|keypoint| KeyPoint {
                    point: keypoint.point,
                    response: keypoint.response,
                    size: keypoint.size,
                    octave: keypoint.octave,
                    angle: keypoint.angle,
                })
                .collect();
            (keypoints, descriptors)
        }
    }
}
