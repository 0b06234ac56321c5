//! Token <-> id registry.
//!
//! Translation to integers is the step between lexing and modeling. The
//! vocabulary is open by default: unseen tokens receive the next free id. Once
//! closed, unseen tokens resolve to [`UNK_ID`] without touching any state.
//!
//! Counts stored here are informational only. No model reads them and they are
//! not updated by training.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;

use crate::TokenId;
use crate::error::{Error, Result};

/// Operations kept apart from the primary contract; see [`unstable::UnstableVocabulary`].
pub mod unstable;

/// Unknown-token sentinel, always registered at [`UNK_ID`].
pub const UNK: &str = "<UNK>";
/// Begin-of-sequence marker. Receives an ordinary id on first use.
pub const BOS: &str = "<s>";
/// End-of-sequence marker. Receives an ordinary id on first use.
pub const EOS: &str = "</s>";

/// Id permanently reserved for [`UNK`].
pub const UNK_ID: TokenId = 0;

/// A vocabulary behind a single mutex, for callers sharing one across threads.
pub type SharedVocabulary = Arc<Mutex<Vocabulary>>;

/// Registry mapping token strings to dense, monotonically assigned ids.
///
/// ## Responsibilities:
/// - Allocate ids in order of first appearance while open
/// - Translate ids back to their token
/// - Roll back allocations made since the last checkpoint
///
/// ## Invariants
/// - `word_indices`, `words` and `counts` always have the same length and
///   `words[id] == token` iff `word_indices[token] == id`
/// - Ids are never reused or renumbered, except by `restore_checkpoint`
///   which drops the ids allocated after the mark
/// - `UNK` is always present at id 0 and `size >= 1`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
	/// Token -> id.
	word_indices: HashMap<String, TokenId>,
	/// Id -> token.
	words: Vec<String>,
	/// Id -> informational occurrence count.
	counts: Vec<u64>,
	/// Number of registered ids, adjustable through `UnstableVocabulary`.
	size: usize,
	/// When set, unseen tokens map to `UNK_ID`.
	closed: bool,
	/// Length of `words` recorded by the last `set_checkpoint`.
	checkpoint: usize,
}

impl Vocabulary {
	/// Creates an open vocabulary holding only the unknown sentinel.
	pub fn new() -> Self {
		let mut vocabulary = Self {
			word_indices: HashMap::new(),
			words: Vec::new(),
			counts: Vec::new(),
			size: 0,
			closed: false,
			checkpoint: 0,
		};
		vocabulary.add_unk();
		vocabulary
	}

	/// Wraps this vocabulary for shared, mutex-guarded access.
	pub fn into_shared(self) -> SharedVocabulary {
		Arc::new(Mutex::new(self))
	}

	fn add_unk(&mut self) {
		self.word_indices.insert(UNK.to_owned(), UNK_ID);
		self.words.push(UNK.to_owned());
		self.counts.push(0);
		self.size += 1;
	}

	/// Registers `token` under the next free id.
	///
	/// The caller guarantees that `token` is not registered yet.
	fn allocate(&mut self, token: &str, count: u64) -> TokenId {
		let id = self.words.len();
		self.word_indices.insert(token.to_owned(), id);
		self.words.push(token.to_owned());
		self.counts.push(count);
		self.size += 1;
		id
	}

	/// Clears every mapping and re-registers the unknown sentinel.
	///
	/// The vocabulary is reopened and the checkpoint mark is cleared.
	pub fn reset(&mut self) {
		self.word_indices.clear();
		self.words.clear();
		self.counts.clear();
		self.size = 0;
		self.closed = false;
		self.checkpoint = 0;
		self.add_unk();
		debug!("Vocabulary reset");
	}

	/// Number of registered ids (including `UNK`), as adjusted by the caller.
	pub fn size(&self) -> usize {
		self.size
	}

	/// Tokens positioned by id.
	pub fn words(&self) -> &[String] {
		&self.words
	}

	/// Informational counts positioned by id.
	pub fn counts(&self) -> &[u64] {
		&self.counts
	}

	/// Token -> id mapping.
	pub fn word_indices(&self) -> &HashMap<String, TokenId> {
		&self.word_indices
	}

	/// Stops allocating ids: unseen tokens now resolve to `UNK_ID`.
	pub fn close(&mut self) {
		self.closed = true;
	}

	/// Allows `to_index` to allocate ids again.
	pub fn open(&mut self) {
		self.closed = false;
	}

	/// Whether unseen tokens currently resolve to `UNK_ID`.
	pub fn is_closed(&self) -> bool {
		self.closed
	}

	/// Returns the id of `token`, allocating one if needed.
	///
	/// - Known tokens return their id; counts are left untouched.
	/// - Unknown tokens on a closed vocabulary return `UNK_ID` and change nothing.
	/// - Unknown tokens on an open vocabulary get the next sequential id with a
	///   count of 1.
	pub fn to_index(&mut self, token: &str) -> TokenId {
		if let Some(&id) = self.word_indices.get(token) {
			return id;
		}
		if self.closed {
			return UNK_ID;
		}
		self.allocate(token, 1)
	}

	/// Lazily translates a sequence of tokens, in order.
	///
	/// Works over collections and streams alike; ids are allocated as the
	/// returned iterator is consumed.
	pub fn to_indices<I>(&mut self, tokens: I) -> impl Iterator<Item = TokenId>
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		tokens.into_iter().map(move |token| self.to_index(token.as_ref()))
	}

	/// Returns the token registered under `id`.
	///
	/// # Errors
	/// Returns `Error::IdOutOfRange` if `id` is not a registered id.
	pub fn to_word(&self, id: TokenId) -> Result<&str> {
		self.words
			.get(id)
			.map(String::as_str)
			.ok_or(Error::IdOutOfRange { id, len: self.words.len() })
	}

	/// Lazily translates a sequence of ids back to tokens, in order.
	///
	/// Each item fails independently with `Error::IdOutOfRange`; collect into a
	/// `Result<Vec<_>>` to stop at the first bad id.
	pub fn to_words<I>(&self, ids: I) -> impl Iterator<Item = Result<&str>>
	where
		I: IntoIterator<Item = TokenId>,
	{
		ids.into_iter().map(move |id| self.to_word(id))
	}

	/// Returns the informational count of `token`, or 0 if it is not registered.
	///
	/// Lookup only: never allocates.
	pub fn count(&self, token: &str) -> u64 {
		self.word_indices
			.get(token)
			.and_then(|&id| self.counts.get(id))
			.copied()
			.unwrap_or(0)
	}

	/// Returns the informational count of `id`.
	///
	/// # Errors
	/// Returns `Error::IdOutOfRange` if `id` is not a registered id.
	pub fn count_at(&self, id: TokenId) -> Result<u64> {
		self.counts
			.get(id)
			.copied()
			.ok_or(Error::IdOutOfRange { id, len: self.counts.len() })
	}

	/// Mark recorded by the last `set_checkpoint` (0 if none).
	pub fn checkpoint(&self) -> usize {
		self.checkpoint
	}

	/// Records the current number of ids. A second call overwrites the mark.
	pub fn set_checkpoint(&mut self) {
		self.checkpoint = self.words.len();
		debug!("Vocabulary checkpoint set at {}", self.checkpoint);
	}

	/// Drops every id allocated at or after the checkpoint mark.
	///
	/// Ids are removed from the highest down so the three parallel structures
	/// stay in lock-step after every step. Without a prior `set_checkpoint`
	/// this wipes every learned token; `UNK` is never removed.
	pub fn restore_checkpoint(&mut self) {
		let mark = self.checkpoint.max(UNK_ID + 1);
		let mut removed = 0;
		while self.words.len() > mark {
			let Some(word) = self.words.pop() else {
				break;
			};
			self.counts.pop();
			self.word_indices.remove(&word);
			self.size = self.size.saturating_sub(1).max(1);
			removed += 1;
		}
		debug!("Vocabulary restored to checkpoint {mark}, {removed} ids removed");
	}
}

impl Default for Vocabulary {
	fn default() -> Self {
		Self::new()
	}
}
