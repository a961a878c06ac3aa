//! This crate stores the fundamental matrix type and estimates it from pixel
//! correspondences with the normalized eight-point algorithm.
//!
//! The fundamental matrix is the uncalibrated sibling of the essential
//! matrix: it encodes the epipolar geometry between two views without any
//! knowledge of the camera intrinsics, and therefore operates directly on
//! pixel coordinates rather than on bearings. It plugs into the
//! [`sample_consensus`](epimatch_core::sample_consensus) traits so that any
//! consensus process can robustly estimate it from contaminated match sets.

#![no_std]

mod eight_point;

pub use eight_point::*;

use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use epimatch_core::{
    nalgebra::{Matrix3, Vector3},
    sample_consensus::Model,
    FeatureMatch,
};
use num_traits::Float;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This stores a fundamental matrix, which is satisfied by the following
/// constraint:
///
/// transpose(x') * F * x = 0
///
/// Where `x` and `x'` are homogeneous pixel coordinates of corresponding
/// points in the first and second image respectively. A pixel coordinate is
/// made homogeneous by appending `1.0` to it.
///
/// Multiplying `F * x` produces the epipolar line in the second image on
/// which the counterpart of `x` must lie, and `transpose(F) * x'` produces
/// the epipolar line in the first image on which the counterpart of `x'`
/// must lie. The matrix is only meaningful up to scale and has rank 2; its
/// left and right null spaces are the epipoles of the two images.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct FundamentalMatrix(pub Matrix3<f64>);

impl FundamentalMatrix {
    /// Can be used to enforce the rank-2 constraint of a fundamental matrix
    /// to fix it.
    ///
    /// This finds the closest rank-2 matrix in frobenius form by forcing the
    /// smallest singular value to zero.
    ///
    /// `epsilon` and `max_iterations` bound the singular value decomposition
    /// the same way they do in
    /// [`try_svd`](epimatch_core::nalgebra::Matrix3::try_svd).
    pub fn recondition(self, epsilon: f64, max_iterations: usize) -> Option<Self> {
        let mut svd = self.try_svd(true, true, epsilon, max_iterations)?;
        // The singular values come out sorted, so the null singular value of
        // a proper fundamental matrix is the last one.
        svd.singular_values[2] = 0.0;
        let mat = svd.recompose().ok()?;
        Some(Self(mat))
    }

    /// Computes the distance in pixels from each point of the match to the
    /// epipolar line its counterpart induces, and returns the larger of the
    /// two distances.
    ///
    /// A perfect correspondence under noiseless geometry produces `0.0`.
    /// Returns infinity if either epipolar line is degenerate, so such a
    /// match can never be counted as an inlier.
    pub fn epipolar_distance(&self, m: &FeatureMatch) -> f64 {
        let Self(mat) = *self;
        let &FeatureMatch(a, b) = m;
        let a = a.to_homogeneous();
        let b = b.to_homogeneous();
        let line_in_second = mat * a;
        let line_in_first = mat.transpose() * b;
        point_line_distance(&b, &line_in_second).max(point_line_distance(&a, &line_in_first))
    }
}

/// Distance from a homogeneous point with unit weight to the line
/// `(l.x, l.y, l.z)` given as `l.x * x + l.y * y + l.z = 0`.
fn point_line_distance(point: &Vector3<f64>, line: &Vector3<f64>) -> f64 {
    let norm = Float::sqrt(line.x * line.x + line.y * line.y);
    if norm == 0.0 {
        return f64::INFINITY;
    }
    Float::abs(point.dot(line)) / norm
}

impl Model<FeatureMatch> for FundamentalMatrix {
    fn residual(&self, data: &FeatureMatch) -> f64 {
        self.epipolar_distance(data)
    }
}
