//! Streaming-learning substrate for statistical code completion.
//!
//! This crate provides the machinery that sits between a token stream and a
//! count-based language model:
//! - A token <-> id vocabulary with checkpoint/restore
//! - A bounded FIFO n-gram cache that keeps a counter in sync with its window
//! - A default prefix-trie counter and n-gram sequencer
//! - Model configuration and the crate error type
//!
//! Tokenizing raw source text and persisting trained models are left to the
//! caller.

/// Crate-wide error type.
pub mod error;

/// Model configuration (n-gram order, cache capacity).
pub mod config;

/// Token <-> id translation.
///
/// Exposes the `Vocabulary` registry along with its reserved sentinels and
/// the explicitly-imported `unstable` operations.
pub mod vocabulary;

/// N-gram cache and the collaborators it drives.
///
/// Exposes the cache, the `Counter` and `Sequencer` capabilities, their
/// default implementations, and prediction helpers.
pub mod model;

pub use error::{Error, Result};

/// Dense integer identifier of a token in a `Vocabulary`.
pub type TokenId = usize;
