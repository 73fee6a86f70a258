use crate::core::Point2f;
use std::cmp::Ordering;

/// A detected feature point.
///
/// While the pyramid is being processed `pt` is an extended-part position
/// and `part_id` names the storage part; after mapping, `pt` is an
/// equirectangular position in the input frame and `part_id` is -1.
#[derive(Debug, Clone)]
pub struct KeyPoint {
    pub pt: Point2f,
    pub size: f32,
    pub angle: f32,
    pub response: f32,
    pub octave: i32,
    pub part_id: i32,
}

impl KeyPoint {
    #[must_use]
    pub fn new(pt: Point2f, size: f32) -> Self {
        Self {
            pt,
            size,
            angle: -1.0,
            response: 0.0,
            octave: 0,
            part_id: -1,
        }
    }
}

/// Split a total feature budget geometrically across pyramid levels.
///
/// Each level is expected to yield `2^(-1/3)` times the features of the one
/// before it; the last level takes whatever remains so the counts sum to
/// exactly `n_features`.
#[must_use]
pub fn features_per_level(n_features: usize, n_levels: usize) -> Vec<usize> {
    assert!(n_levels > 0, "at least one pyramid level is required");

    let factor = 1.0 / 2.0f64.powf(1.0 / 3.0);
    let mut desired =
        n_features as f64 * (1.0 - factor) / (1.0 - factor.powi(n_levels as i32));

    let mut counts = vec![0usize; n_levels];
    let mut sum = 0usize;
    for count in counts.iter_mut().take(n_levels - 1) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            *count = desired.round() as usize;
        }
        sum += *count;
        desired *= factor;
    }
    counts[n_levels - 1] = n_features.saturating_sub(sum);

    counts
}

/// Keep the `n` highest-response keypoints.
///
/// Ties are broken positionally so the surviving set is the same on every
/// run and under any parallel schedule.
pub fn retain_best(keypoints: &mut Vec<KeyPoint>, n: usize) {
    if keypoints.len() <= n {
        return;
    }

    keypoints.sort_unstable_by(|a, b| {
        b.response
            .partial_cmp(&a.response)
            .unwrap_or(Ordering::Equal)
            .then(a.part_id.cmp(&b.part_id))
            .then(a.pt.y.partial_cmp(&b.pt.y).unwrap_or(Ordering::Equal))
            .then(a.pt.x.partial_cmp(&b.pt.x).unwrap_or(Ordering::Equal))
    });
    keypoints.truncate(n);
}
