use thiserror::Error;

use crate::TokenId;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the vocabulary and the n-gram cache.
///
/// Every variant signals a caller contract violation or a rejected
/// configuration. Operations check their inputs before mutating anything, so
/// receiving an error means no state was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A token id outside `[0, len)` of the vocabulary.
	#[error("token id {id} out of range for vocabulary of length {len}")]
	IdOutOfRange { id: TokenId, len: usize },

	/// A position outside the input token sequence.
	#[error("index {index} out of range for input of length {len}")]
	IndexOutOfRange { index: usize, len: usize },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),
}
