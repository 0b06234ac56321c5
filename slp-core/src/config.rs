use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default maximum n-gram length.
pub const DEFAULT_ORDER: usize = 6;

/// Default number of n-grams held by an `NGramCache` window.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Configuration shared by the sequencer and the cache.
///
/// # Invariants
/// - `order` is always >= 1
/// - `cache_capacity == 0` is valid and disables caching
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
	/// Maximum n-gram length produced by the sequencer.
	pub order: usize,

	/// Maximum number of n-grams held in the cache window.
	pub cache_capacity: usize,
}

impl ModelConfig {
	/// Creates a new configuration.
	///
	/// # Errors
	/// Returns an error if `order == 0`.
	pub fn new(order: usize, cache_capacity: usize) -> Result<Self> {
		let config = Self { order, cache_capacity };
		config.validate()?;
		Ok(config)
	}

	/// Checks the invariants of a configuration built by hand or deserialized.
	///
	/// # Errors
	/// Returns an error if `order == 0`.
	pub fn validate(&self) -> Result<()> {
		if self.order == 0 {
			return Err(Error::InvalidConfig("order must be >= 1".to_owned()));
		}
		Ok(())
	}
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { order: DEFAULT_ORDER, cache_capacity: DEFAULT_CAPACITY }
	}
}
