//! Adaptive sample consensus.
//!
//! This crate implements the classic random sample consensus loop with an
//! adaptively shrinking trial budget. Minimal subsets of the data are drawn
//! at random and fed to an [`Estimator`]; every produced hypothesis is scored
//! by counting the data whose [`Model::residual`] falls below the inlier
//! threshold, and the best-scoring hypothesis is kept. Whenever the best
//! inlier ratio `w` improves, the number of trials still worth running is
//! recomputed so that the probability of having drawn at least one
//! all-inlier sample reaches the configured confidence, which lets the loop
//! terminate long before the worst-case budget on friendly data.
//!
//! The process is entirely driven by the provided [`Rng`]; seeding it makes
//! every run reproducible, which the tests rely on.

use log::debug;
use rand::Rng;
use sample_consensus::{Consensus, Estimator, Model};

/// An adaptive random sample consensus process.
///
/// Construct it with the inlier threshold and an RNG, then adjust the
/// defaults as needed:
///
/// ```
/// use adasac::Adasac;
/// use rand_xoshiro::{rand_core::SeedableRng, Xoshiro256PlusPlus};
///
/// let consensus = Adasac::new(3.0, Xoshiro256PlusPlus::seed_from_u64(0))
///     .confidence(0.999)
///     .max_iterations(512);
/// # let _ = consensus;
/// ```
///
/// Ties between hypotheses are broken first-found: a new hypothesis replaces
/// the incumbent only with a strictly greater inlier count, so a run is
/// fully determined by the RNG seed and the data order.
pub struct Adasac<R> {
    max_iterations: usize,
    confidence: f64,
    inlier_threshold: f64,
    rng: R,
}

impl<R> Adasac<R> {
    /// `inlier_threshold` is the maximum residual a datum may have against a
    /// hypothesis to be counted as an inlier of that hypothesis. It must be
    /// finite and non-negative.
    pub fn new(inlier_threshold: f64, rng: R) -> Self {
        assert!(
            inlier_threshold.is_finite() && inlier_threshold >= 0.0,
            "adasac: inlier threshold must be finite and non-negative"
        );
        Self {
            max_iterations: 2048,
            confidence: 0.99,
            inlier_threshold,
            rng,
        }
    }

    /// Sets the desired probability that the accepted hypothesis was fit to
    /// an all-inlier sample. Must lie strictly between `0` and `1`.
    ///
    /// Default: `0.99`.
    pub fn confidence(self, confidence: f64) -> Self {
        assert!(
            confidence > 0.0 && confidence < 1.0,
            "adasac: confidence must lie strictly between 0 and 1"
        );
        Self { confidence, ..self }
    }

    /// Sets the hard cap on sampling trials. The adaptive budget never
    /// exceeds this, so it bounds the worst-case latency of a run.
    ///
    /// Default: `2048`.
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    /// Number of trials needed so that, with the configured confidence, at
    /// least one of them samples only inliers.
    ///
    /// This solves `(1 - w^k)^n <= 1 - confidence` for the smallest `n`.
    /// The logarithms involved vanish or blow up when `w` reaches `0` or
    /// `1`, so those cases are pinned to the worst-case budget and to a
    /// single trial respectively.
    fn required_trials(&self, inlier_ratio: f64, min_samples: usize) -> usize {
        if inlier_ratio <= 0.0 {
            return self.max_iterations;
        }
        if inlier_ratio >= 1.0 {
            return 1;
        }
        let failure = 1.0 - inlier_ratio.powi(min_samples as i32);
        if failure <= 0.0 {
            return 1;
        }
        let trials = ((1.0 - self.confidence).ln() / failure.ln()).ceil();
        if !trials.is_finite() || trials >= self.max_iterations as f64 {
            self.max_iterations
        } else if trials < 1.0 {
            1
        } else {
            trials as usize
        }
    }
}

impl<E, R, Data> Consensus<E, Data> for Adasac<R>
where
    E: Estimator<Data>,
    R: Rng,
    Data: Clone,
{
    type Inliers = Vec<usize>;

    fn model<I>(&mut self, estimator: &E, data: I) -> Option<E::Model>
    where
        I: Iterator<Item = Data> + Clone,
    {
        self.model_inliers(estimator, data).map(|(model, _)| model)
    }

    fn model_inliers<I>(&mut self, estimator: &E, data: I) -> Option<(E::Model, Self::Inliers)>
    where
        I: Iterator<Item = Data> + Clone,
    {
        let data: Vec<Data> = data.collect();
        if data.len() < E::MIN_SAMPLES {
            return None;
        }
        let mut indices: Vec<usize> = (0..data.len()).collect();
        let mut best: Option<(E::Model, Vec<usize>)> = None;
        let mut required = self.max_iterations;
        let mut trial = 0;
        while trial < required {
            trial += 1;
            // Partial Fisher-Yates shuffle; the first MIN_SAMPLES entries
            // become a uniform distinct sample.
            for i in 0..E::MIN_SAMPLES {
                let j = self.rng.gen_range(i..indices.len());
                indices.swap(i, j);
            }
            let sample = indices[..E::MIN_SAMPLES].iter().map(|&ix| data[ix].clone());
            for model in estimator.estimate(sample) {
                let inliers: Vec<usize> = data
                    .iter()
                    .enumerate()
                    .filter(|&(_, datum)| model.residual(datum) < self.inlier_threshold)
                    .map(|(ix, _)| ix)
                    .collect();
                let improved = best
                    .as_ref()
                    .map_or(true, |(_, incumbent)| inliers.len() > incumbent.len());
                if improved {
                    let inlier_ratio = inliers.len() as f64 / data.len() as f64;
                    required = required.min(self.required_trials(inlier_ratio, E::MIN_SAMPLES));
                    debug!(
                        "trial {}: {} of {} inliers, {} trials required",
                        trial,
                        inliers.len(),
                        data.len(),
                        required
                    );
                    best = Some((model, inliers));
                }
            }
        }
        best
    }
}
