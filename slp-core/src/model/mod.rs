//! Top-level module for the n-gram caching system.
//!
//! This module provides a bounded, incrementally learning n-gram cache, including:
//! - The count store capability driven by the cache (`Counter`)
//! - A default prefix-trie count store (`TrieCounter`)
//! - N-gram extraction from token id sequences (`Sequencer`, `NGramSequencer`)
//! - Prediction values and distribution helpers (`Prediction`)
//! - The FIFO window cache itself (`NGramCache`)

/// Bounded FIFO n-gram cache.
///
/// Keeps a counter's counts equal to the multiset of n-grams in its window,
/// evicting the oldest n-gram once the capacity is exceeded.
pub mod cache;

/// Count store capability consumed by the cache.
///
/// Supports exact add/remove of n-grams and point queries.
pub mod counter;

/// Prefix-trie implementation of `Counter`.
///
/// Default model held by `NGramCache`.
pub mod trie_counter;

/// Extraction of the n-gram ending at a position of a token id sequence.
pub mod sequencer;

/// `(probability, confidence)` pairs and helpers over predicted distributions.
pub mod prediction;
