use std::collections::HashMap;

use rand::Rng;

use crate::TokenId;

/// Estimate returned by model queries.
///
/// `confidence` expresses how much of the estimate is backed by observed
/// counts, from 0.0 (nothing seen) to 1.0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Prediction {
	pub probability: f64,
	pub confidence: f64,
}

impl Prediction {
	/// Creates a prediction from its two components.
	pub fn new(probability: f64, confidence: f64) -> Self {
		Self { probability, confidence }
	}
}

/// Returns the most probable candidate of a distribution.
///
/// Ties are broken in favor of the lower id. Returns `None` if the
/// distribution is empty.
pub fn best(distribution: &HashMap<TokenId, Prediction>) -> Option<(TokenId, Prediction)> {
	distribution
		.iter()
		.max_by(|(a_id, a), (b_id, b)| {
			a.probability
				.total_cmp(&b.probability)
				.then_with(|| b_id.cmp(a_id))
		})
		.map(|(id, prediction)| (*id, *prediction))
}

/// Draws a candidate with probability proportional to its estimate.
///
/// Returns `None` if no candidate has a positive probability.
pub fn sample(distribution: &HashMap<TokenId, Prediction>) -> Option<TokenId> {
	sample_with(distribution, &mut rand::rng())
}

/// Same as [`sample`], drawing from the given random source.
///
/// This performs:
/// - an O(n) scan to compute the total mass
/// - a cumulative subtraction to select a bucket
pub fn sample_with<R: Rng>(
	distribution: &HashMap<TokenId, Prediction>,
	rng: &mut R,
) -> Option<TokenId> {
	let total: f64 = distribution
		.values()
		.map(|prediction| prediction.probability)
		.filter(|probability| *probability > 0.0)
		.sum();
	if total <= 0.0 || !total.is_finite() {
		return None;
	}

	let mut r = rng.random_range(0.0..total);

	let mut fallback = None;
	for (id, prediction) in distribution {
		if prediction.probability <= 0.0 {
			continue;
		}
		if r < prediction.probability {
			return Some(*id);
		}
		r -= prediction.probability;
		fallback = Some(*id);
	}

	// Floating point rounding can leave a sliver of mass past the last bucket.
	fallback
}
