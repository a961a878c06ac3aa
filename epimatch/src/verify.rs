use crate::{MatchError, MatcherConfig};
use adasac::Adasac;
use epimatch_core::{sample_consensus::Consensus, FeatureMatch, KeyPoint};
use fundamental::{EightPoint, FundamentalMatrix};
use log::debug;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Minimum number of matches the eight-point solve needs.
pub const MIN_MATCHES: usize = 8;

/// Estimates the fundamental matrix consistent with the largest subset of
/// the given matches and returns it together with the index pairs that
/// satisfy it.
///
/// This is the strictest filter of the pipeline: even a match that survived
/// the ratio and symmetry tests is dropped when its epipolar distance under
/// the final matrix reaches `config.distance`. With `config.refine` set the
/// matrix is re-estimated by a least-squares solve over the consensus
/// inliers only, and the surviving set is then recomputed under that final
/// matrix.
///
/// Fails with [`MatchError::InsufficientCorrespondences`] before any
/// sampling when fewer than [`MIN_MATCHES`] matches come in, and with
/// [`MatchError::DegenerateGeometry`] when no sampled subset yields a
/// numerically valid matrix. Zero surviving matches with a valid matrix is
/// not an error.
pub fn epipolar_inliers(
    matches: &[[usize; 2]],
    keypoints_a: &[KeyPoint],
    keypoints_b: &[KeyPoint],
    config: &MatcherConfig,
) -> Result<(FundamentalMatrix, Vec<[usize; 2]>), MatchError> {
    if matches.len() < MIN_MATCHES {
        return Err(MatchError::InsufficientCorrespondences {
            found: matches.len(),
        });
    }
    let correspondences: Vec<FeatureMatch> = matches
        .iter()
        .map(|&[a, b]| FeatureMatch::from_image_points(&keypoints_a[a], &keypoints_b[b]))
        .collect();

    let estimator = EightPoint::new();
    let mut consensus = Adasac::new(
        config.distance,
        Xoshiro256PlusPlus::seed_from_u64(config.seed),
    )
    .confidence(config.confidence)
    .max_iterations(config.max_iterations);

    let (mut matrix, mut inliers) = consensus
        .model_inliers(&estimator, correspondences.iter().copied())
        .ok_or(MatchError::DegenerateGeometry)?;
    debug!(
        "consensus kept {} of {} symmetric matches",
        inliers.len(),
        matches.len()
    );

    if config.refine && inliers.len() >= MIN_MATCHES {
        // A least-squares fit over an uncontaminated inlier set beats any
        // minimal-sample hypothesis. Should the refit itself degenerate,
        // the consensus matrix stands.
        let survivors = inliers.iter().map(|&ix| correspondences[ix]);
        if let Some(refined) = estimator.from_matches(survivors) {
            inliers = correspondences
                .iter()
                .enumerate()
                .filter(|&(_, m)| refined.epipolar_distance(m) < config.distance)
                .map(|(ix, _)| ix)
                .collect();
            matrix = refined;
            debug!("refit over inliers kept {} matches", inliers.len());
        }
    }

    let surviving = inliers.iter().map(|&ix| matches[ix]).collect();
    Ok((matrix, surviving))
}
