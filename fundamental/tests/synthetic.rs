use epimatch_core::{
    nalgebra::{Matrix3, Point2, Point3, Rotation3, Vector3},
    sample_consensus::{Estimator, Model},
    FeatureMatch,
};
use fundamental::EightPoint;

const RESIDUAL_THRESHOLD: f64 = 1e-6;

fn intrinsics() -> Matrix3<f64> {
    Matrix3::new(800.0, 0.0, 640.0, 0.0, 780.0, 360.0, 0.0, 0.0, 1.0)
}

fn project(
    k: &Matrix3<f64>,
    rotation: &Rotation3<f64>,
    translation: &Vector3<f64>,
    point: &Point3<f64>,
) -> Point2<f64> {
    let camera = rotation * point + translation;
    let uvw = k * camera.coords;
    Point2::new(uvw.x / uvw.z, uvw.y / uvw.z)
}

/// Exact projections of a non-planar point grid into two views related by a
/// small rotation and a baseline.
fn stereo_matches() -> Vec<FeatureMatch> {
    let k = intrinsics();
    let rotation = Rotation3::from_euler_angles(0.02, -0.015, 0.01);
    let translation = Vector3::new(0.12, 0.03, 0.02);
    let identity = Rotation3::identity();
    let origin = Vector3::zeros();
    let mut matches = Vec::new();
    for depth in 0..3 {
        for y in 0..3 {
            for x in 0..4 {
                let point = Point3::new(
                    x as f64 * 0.25 - 0.4,
                    y as f64 * 0.2 - 0.25,
                    1.2 + depth as f64 * 0.6,
                );
                let a = project(&k, &identity, &origin, &point);
                let b = project(&k, &rotation, &translation, &point);
                matches.push(FeatureMatch(a, b));
            }
        }
    }
    matches
}

#[test]
fn residuals_vanish_on_exact_projections() {
    let matches = stereo_matches();
    let f = EightPoint::new()
        .from_matches(matches.iter().copied())
        .expect("didn't get any fundamental matrix");
    for m in &matches {
        assert!(
            f.residual(m) < RESIDUAL_THRESHOLD,
            "failed residual check: {}",
            f.residual(m)
        );
    }
}

#[test]
fn estimated_matrix_has_rank_two() {
    let matches = stereo_matches();
    let f = EightPoint::new()
        .from_matches(matches.iter().copied())
        .expect("didn't get any fundamental matrix");
    let svd = f.0.svd(false, false);
    assert!(svd.singular_values[2] / svd.singular_values[0] < 1e-9);
}

#[test]
fn fewer_than_eight_matches_is_rejected() {
    let matches = stereo_matches();
    let eight_point = EightPoint::new();
    assert!(eight_point.from_matches(matches[..7].iter().copied()).is_none());
    assert!(eight_point.estimate(matches[..7].iter().copied()).is_none());
}

#[test]
fn coincident_points_are_rejected() {
    let m = FeatureMatch(Point2::new(100.0, 100.0), Point2::new(120.0, 100.0));
    let matches = vec![m; 10];
    assert!(EightPoint::new().from_matches(matches.iter().copied()).is_none());
}

#[test]
fn off_line_point_is_flagged() {
    let matches = stereo_matches();
    let f = EightPoint::new()
        .from_matches(matches.iter().copied())
        .expect("didn't get any fundamental matrix");
    let FeatureMatch(a, b) = matches[5];
    let perturbed = FeatureMatch(a, Point2::new(b.x, b.y + 12.0));
    assert!(f.residual(&perturbed) > 5.0);
}
