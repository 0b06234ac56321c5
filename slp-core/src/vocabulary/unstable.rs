//! Provisional vocabulary operations.
//!
//! These bypass the allocation rules of [`Vocabulary::to_index`] and may be
//! removed. They are only reachable after importing [`UnstableVocabulary`].

use log::warn;

use super::Vocabulary;
use crate::TokenId;

/// Escape hatches used by vocabulary loaders and by callers correcting for
/// double counting.
pub trait UnstableVocabulary {
	/// Adds `offset` to the reported size without touching any mapping.
	///
	/// The size never drops below 1 (the unknown sentinel).
	fn adjust_size(&mut self, offset: isize);

	/// Registers `token` with an explicit informational count.
	///
	/// New tokens get the next sequential id, even if the vocabulary is
	/// closed. Known tokens keep their id; only the count is overwritten.
	fn store(&mut self, token: &str, count: u64) -> TokenId;
}

impl UnstableVocabulary for Vocabulary {
	fn adjust_size(&mut self, offset: isize) {
		let adjusted = self.size.saturating_add_signed(offset);
		if adjusted < 1 {
			warn!("Vocabulary size adjustment by {offset} clamped at 1 (was {})", self.size);
		}
		self.size = adjusted.max(1);
	}

	fn store(&mut self, token: &str, count: u64) -> TokenId {
		match self.word_indices.get(token) {
			Some(&id) => {
				if let Some(slot) = self.counts.get_mut(id) {
					*slot = count;
				}
				id
			}
			None => self.allocate(token, count),
		}
	}
}
