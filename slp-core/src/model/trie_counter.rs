use std::collections::HashMap;

use super::counter::Counter;
use super::prediction::Prediction;
use crate::TokenId;

/// A node of the prefix trie.
///
/// A node corresponds to a fixed prefix and counts how many held n-grams
/// start with it. Its successors are the observed continuations of that
/// prefix, in the same way a Markov chain state holds weighted outgoing edges.
///
/// ## Invariants
/// - `count >= sum of successor counts`
/// - Every stored successor has a strictly positive count
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Node {
	count: u64,
	successors: HashMap<TokenId, Node>,
}

impl Node {
	fn add(&mut self, sequence: &[TokenId]) {
		self.count += 1;
		if let Some((first, rest)) = sequence.split_first() {
			self.successors.entry(*first).or_default().add(rest);
		}
	}

	/// Undoes one `add(sequence)`.
	///
	/// Returns `false` and leaves the subtree untouched if no held n-gram
	/// matches `sequence` exactly.
	fn remove(&mut self, sequence: &[TokenId]) -> bool {
		match sequence.split_first() {
			None => {
				// Some n-gram must end here rather than merely pass through.
				if self.count <= self.context_count() {
					return false;
				}
			}
			Some((first, rest)) => {
				let Some(child) = self.successors.get_mut(first) else {
					return false;
				};
				if !child.remove(rest) {
					return false;
				}
				if child.count == 0 {
					self.successors.remove(first);
				}
			}
		}
		self.count -= 1;
		true
	}

	fn find(&self, sequence: &[TokenId]) -> Option<&Node> {
		sequence
			.iter()
			.try_fold(self, |node, token| node.successors.get(token))
	}

	/// Number of times this prefix was followed by another token.
	fn context_count(&self) -> u64 {
		self.successors.values().map(|successor| successor.count).sum()
	}
}

/// Prefix-trie n-gram counter.
///
/// Adding `[a, b, c]` increments the counts of `[]`, `[a]`, `[a, b]` and
/// `[a, b, c]`. Removal decrements the same path and prunes emptied nodes, so
/// a trie returns to an equal value once everything added has been removed.
///
/// Estimation interpolates every suffix of the context from shortest to
/// longest, weighting each by `c / (c + d)` where `c` is how often the context
/// was continued and `d` its number of distinct continuations. The confidence
/// is the total interpolation mass collected along the way.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrieCounter {
	root: Node,
}

impl TrieCounter {
	/// Creates an empty counter.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of n-grams currently held.
	pub fn total(&self) -> u64 {
		self.root.count
	}

	/// Whether no n-gram is held.
	pub fn is_empty(&self) -> bool {
		self.root.count == 0
	}
}

impl Counter for TrieCounter {
	fn add_aggressive(&mut self, sequence: &[TokenId]) {
		self.root.add(sequence);
	}

	fn remove_aggressive(&mut self, sequence: &[TokenId]) {
		self.root.remove(sequence);
	}

	fn count(&self, sequence: &[TokenId]) -> u64 {
		self.root.find(sequence).map_or(0, |node| node.count)
	}

	fn model_token(&self, sequence: &[TokenId]) -> Prediction {
		let Some((token, context)) = sequence.split_last() else {
			return Prediction::default();
		};

		let mut probability = 0.0;
		let mut unexplained = 1.0;
		for start in (0..=context.len()).rev() {
			let Some(node) = self.root.find(&context[start..]) else {
				continue;
			};
			let total = node.context_count();
			if total == 0 {
				continue;
			}

			let total = total as f64;
			let distinct = node.successors.len() as f64;
			let lambda = total / (total + distinct);
			let observed = node.successors.get(token).map_or(0, |successor| successor.count) as f64;

			probability = lambda * (observed / total) + (1.0 - lambda) * probability;
			unexplained *= 1.0 - lambda;
		}

		Prediction::new(probability, 1.0 - unexplained)
	}

	fn predict_token(&self, context: &[TokenId]) -> HashMap<TokenId, Prediction> {
		let mut candidates: Vec<TokenId> = (0..=context.len())
			.filter_map(|start| self.root.find(&context[start..]))
			.flat_map(|node| node.successors.keys().copied())
			.collect();
		candidates.sort_unstable();
		candidates.dedup();

		let mut sequence = context.to_vec();
		let mut distribution = HashMap::with_capacity(candidates.len());
		for candidate in candidates {
			sequence.push(candidate);
			distribution.insert(candidate, self.model_token(&sequence));
			sequence.pop();
		}
		distribution
	}
}
