use crate::TokenId;
use crate::config::{DEFAULT_ORDER, ModelConfig};
use crate::error::{Error, Result};

/// Slices token id sequences into n-grams.
///
/// Implementations are pure: the same input always yields the same slice.
pub trait Sequencer {
	/// Maximum n-gram length produced by `sequence_at`.
	fn order(&self) -> usize;

	/// Returns the n-gram ending at `index` (inclusive), at most `order()` long.
	///
	/// # Errors
	/// Returns `Error::IndexOutOfRange` if `index >= input.len()`.
	fn sequence_at<'a>(&self, input: &'a [TokenId], index: usize) -> Result<&'a [TokenId]>;

	/// Returns the context used to predict the token at `index`: up to
	/// `order() - 1` tokens strictly before it.
	///
	/// `index == input.len()` is accepted and yields the context for the token
	/// following the input.
	///
	/// # Errors
	/// Returns `Error::IndexOutOfRange` if `index > input.len()`.
	fn context_at<'a>(&self, input: &'a [TokenId], index: usize) -> Result<&'a [TokenId]> {
		if index > input.len() {
			return Err(Error::IndexOutOfRange { index, len: input.len() });
		}
		let start = index.saturating_sub(self.order().saturating_sub(1));
		Ok(&input[start..index])
	}
}

/// Fixed-order sequencer returning contiguous windows of the input.
///
/// # Invariants
/// - `order` is always >= 1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NGramSequencer {
	order: usize,
}

impl NGramSequencer {
	/// Creates a sequencer of the given order.
	///
	/// # Errors
	/// Returns an error if `order == 0`.
	pub fn new(order: usize) -> Result<Self> {
		if order == 0 {
			return Err(Error::InvalidConfig("order must be >= 1".to_owned()));
		}
		Ok(Self { order })
	}

	/// Creates a sequencer using the order of `config`.
	///
	/// # Errors
	/// Returns an error if the configuration is invalid.
	pub fn from_config(config: &ModelConfig) -> Result<Self> {
		config.validate()?;
		Self::new(config.order)
	}
}

impl Default for NGramSequencer {
	fn default() -> Self {
		Self { order: DEFAULT_ORDER }
	}
}

impl Sequencer for NGramSequencer {
	fn order(&self) -> usize {
		self.order
	}

	fn sequence_at<'a>(&self, input: &'a [TokenId], index: usize) -> Result<&'a [TokenId]> {
		if index >= input.len() {
			return Err(Error::IndexOutOfRange { index, len: input.len() });
		}
		let start = (index + 1).saturating_sub(self.order);
		Ok(&input[start..=index])
	}
}
