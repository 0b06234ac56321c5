use std::collections::HashMap;

use super::prediction::Prediction;
use crate::TokenId;

/// Mutable multiset of n-grams driven by `NGramCache`.
///
/// The cache only relies on the add/remove contract: `add_aggressive(s)`
/// followed by `remove_aggressive(s)` must leave every observable count as it
/// was. How probabilities are estimated from the counts is up to the
/// implementation.
pub trait Counter {
	/// Increments every count implied by `sequence` and its prefixes.
	fn add_aggressive(&mut self, sequence: &[TokenId]);

	/// Exact inverse of `add_aggressive`.
	fn remove_aggressive(&mut self, sequence: &[TokenId]);

	/// Number of held n-grams having `sequence` as a prefix.
	fn count(&self, sequence: &[TokenId]) -> u64;

	/// Estimates the last token of `sequence` given the preceding tokens.
	fn model_token(&self, sequence: &[TokenId]) -> Prediction;

	/// Estimates every candidate for the token following `context`.
	fn predict_token(&self, context: &[TokenId]) -> HashMap<TokenId, Prediction>;
}
