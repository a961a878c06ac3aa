use adasac::Adasac;
use nalgebra::{Point2, Vector2};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sample_consensus::{Consensus, Estimator, Model};

#[derive(Debug, Clone, Copy)]
struct Line {
    normal: Vector2<f64>,
    c: f64,
}

impl Model<Point2<f64>> for Line {
    fn residual(&self, point: &Point2<f64>) -> f64 {
        (self.normal.dot(&point.coords) + self.c).abs()
    }
}

struct LineEstimator;

impl Estimator<Point2<f64>> for LineEstimator {
    type Model = Line;
    type ModelIter = Option<Line>;
    const MIN_SAMPLES: usize = 2;

    fn estimate<I>(&self, mut data: I) -> Self::ModelIter
    where
        I: Iterator<Item = Point2<f64>> + Clone,
    {
        let a = data.next()?;
        let b = data.next()?;
        let direction = b - a;
        let length = direction.norm();
        if length == 0.0 {
            return None;
        }
        let normal = Vector2::new(-direction.y, direction.x) / length;
        Some(Line {
            normal,
            c: -normal.dot(&a.coords),
        })
    }
}

/// Thirty exact points on `y = 0.5 x + 1`.
fn line_points() -> Vec<Point2<f64>> {
    (0..30)
        .map(|i| {
            let x = i as f64 * 0.3 - 4.5;
            Point2::new(x, 0.5 * x + 1.0)
        })
        .collect()
}

fn gross_outliers() -> Vec<Point2<f64>> {
    vec![
        Point2::new(3.0, 20.0),
        Point2::new(-2.0, -15.0),
        Point2::new(5.5, -9.0),
        Point2::new(-4.0, 12.0),
        Point2::new(0.0, -22.0),
        Point2::new(1.5, 17.0),
        Point2::new(-3.5, -11.0),
        Point2::new(4.5, 14.0),
    ]
}

#[test]
fn finds_line_among_outliers() {
    let mut points = line_points();
    let clean = points.len();
    points.extend(gross_outliers());

    let mut consensus = Adasac::new(0.05, Xoshiro256PlusPlus::seed_from_u64(0));
    let (line, inliers) = consensus
        .model_inliers(&LineEstimator, points.iter().copied())
        .expect("expected a line");

    assert_eq!(inliers.len(), clean);
    assert!(inliers.iter().all(|&ix| ix < clean));
    for point in &points[..clean] {
        assert!(line.residual(point) < 0.05);
    }
}

#[test]
fn too_few_data_yields_no_model() {
    let points = [Point2::new(0.0, 1.0)];
    let mut consensus = Adasac::new(0.05, Xoshiro256PlusPlus::seed_from_u64(0));
    assert!(consensus
        .model_inliers(&LineEstimator, points.iter().copied())
        .is_none());
}

#[test]
fn runs_are_reproducible_under_a_fixed_seed() {
    let mut points = line_points();
    points.extend(gross_outliers());

    let run = || {
        let mut consensus = Adasac::new(0.05, Xoshiro256PlusPlus::seed_from_u64(7));
        consensus
            .model_inliers(&LineEstimator, points.iter().copied())
            .expect("expected a line")
            .1
    };

    assert_eq!(run(), run());
}

#[test]
fn looser_threshold_never_loses_inliers() {
    let mut points = line_points();
    points.extend(gross_outliers());

    let mut previous = 0;
    for threshold in [0.01, 0.5, 30.0] {
        let mut consensus = Adasac::new(threshold, Xoshiro256PlusPlus::seed_from_u64(3));
        let (_, inliers) = consensus
            .model_inliers(&LineEstimator, points.iter().copied())
            .expect("expected a line");
        assert!(inliers.len() >= previous);
        previous = inliers.len();
    }
}
