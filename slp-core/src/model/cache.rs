use std::collections::{HashMap, VecDeque};
use std::path::Path;

use log::{debug, trace};

use super::counter::Counter;
use super::prediction::Prediction;
use super::sequencer::{NGramSequencer, Sequencer};
use super::trie_counter::TrieCounter;
use crate::TokenId;
use crate::config::{DEFAULT_CAPACITY, ModelConfig};
use crate::error::Result;

/// Whether a cache learns at all. Fixed for the lifetime of the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
	/// `capacity > 0`: the window holds up to `capacity` n-grams.
	Active,
	/// `capacity == 0`: the window stays empty and learning is a no-op.
	Disabled,
}

/// Bounded-memory online n-gram learner.
///
/// The cache owns a counter (the model) and a FIFO window of the n-grams it
/// has fed to it. Learning appends to the back of the window; once the window
/// exceeds its capacity the oldest n-gram is popped and removed from the
/// model. Queries are forwarded to the model untouched.
///
/// # Responsibilities
/// - Decide which n-grams are worth learning
/// - Keep the model counts in sync with the window
/// - Drop all statistics at a boundary (`notify`)
///
/// # Invariants
/// - `window.len() <= capacity` between calls
/// - Every n-gram in the window has been added to the model exactly once and
///   not removed yet
#[derive(Debug)]
pub struct NGramCache<C = TrieCounter, S = NGramSequencer> {
	capacity: usize,
	sequencer: S,
	model: C,
	window: VecDeque<Vec<TokenId>>,
}

impl NGramCache {
	/// Creates a trie-backed cache from a configuration.
	///
	/// # Errors
	/// Returns an error if the configuration is invalid.
	pub fn new(config: &ModelConfig) -> Result<Self> {
		let sequencer = NGramSequencer::from_config(config)?;
		Ok(Self::with_sequencer(config.cache_capacity, sequencer))
	}
}

impl Default for NGramCache {
	fn default() -> Self {
		Self::with_sequencer(DEFAULT_CAPACITY, NGramSequencer::default())
	}
}

impl<C: Counter + Default, S: Sequencer> NGramCache<C, S> {
	/// Creates a cache with a fresh model, using `sequencer` to slice inputs.
	pub fn with_sequencer(capacity: usize, sequencer: S) -> Self {
		debug!("New n-gram cache (capacity {capacity}, order {})", sequencer.order());
		Self {
			capacity,
			sequencer,
			model: C::default(),
			// One extra slot: the window briefly holds capacity + 1 before eviction.
			window: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
		}
	}

	/// Maximum number of n-grams held by the window.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// `Disabled` when the capacity is 0, `Active` otherwise.
	pub fn state(&self) -> CacheState {
		if self.capacity == 0 { CacheState::Disabled } else { CacheState::Active }
	}

	/// Number of n-grams currently in the window.
	pub fn len(&self) -> usize {
		self.window.len()
	}

	/// Whether the window holds no n-gram.
	pub fn is_empty(&self) -> bool {
		self.window.is_empty()
	}

	/// The window, oldest n-gram first.
	pub fn window(&self) -> impl Iterator<Item = &[TokenId]> {
		self.window.iter().map(Vec::as_slice)
	}

	/// The model currently fed by this cache.
	pub fn counter(&self) -> &C {
		&self.model
	}

	/// The sequencer slicing inputs into n-grams.
	pub fn sequencer(&self) -> &S {
		&self.sequencer
	}

	/// Discards the model and the window at a boundary such as the start of
	/// `next`, so statistics do not leak across it.
	pub fn notify<P: AsRef<Path>>(&mut self, next: P) {
		self.model = C::default();
		self.window.clear();
		debug!("N-gram cache cleared before {}", next.as_ref().display());
	}

	/// Learns the n-gram ending at `index` of `input`.
	///
	/// The n-gram is only learned if it has the full order, or if `index` is
	/// the last position of `input` so trailing tokens still get counted.
	/// Learning may evict the oldest n-gram of the window.
	///
	/// Does nothing when the cache is disabled.
	///
	/// # Errors
	/// Returns `Error::IndexOutOfRange` if `index >= input.len()`; nothing is
	/// modified in that case.
	pub fn learn_token(&mut self, input: &[TokenId], index: usize) -> Result<()> {
		if self.capacity == 0 {
			return Ok(());
		}

		let sequence = self.sequencer.sequence_at(input, index)?;
		if sequence.len() == self.sequencer.order() || index + 1 == input.len() {
			self.window.push_back(sequence.to_vec());
			self.model.add_aggressive(sequence);
			trace!("Cached {sequence:?}");
		}

		if self.window.len() > self.capacity
			&& let Some(evicted) = self.window.pop_front()
		{
			self.model.remove_aggressive(&evicted);
			trace!("Evicted {evicted:?}");
		}
		Ok(())
	}

	/// Does nothing: n-grams only leave the cache through FIFO eviction or
	/// `notify`.
	pub fn forget_token(&mut self, _input: &[TokenId], _index: usize) {}

	/// Estimates the token at `index` given the tokens before it.
	///
	/// # Errors
	/// Returns `Error::IndexOutOfRange` if `index >= input.len()`.
	pub fn model_at_index(&self, input: &[TokenId], index: usize) -> Result<Prediction> {
		let sequence = self.sequencer.sequence_at(input, index)?;
		Ok(self.model.model_token(sequence))
	}

	/// Estimates every candidate for the token at `index` given the tokens
	/// before it. `index == input.len()` predicts the token following `input`.
	///
	/// # Errors
	/// Returns `Error::IndexOutOfRange` if `index > input.len()`.
	pub fn predict_at_index(&self, input: &[TokenId], index: usize) -> Result<HashMap<TokenId, Prediction>> {
		let context = self.sequencer.context_at(input, index)?;
		Ok(self.model.predict_token(context))
	}
}
