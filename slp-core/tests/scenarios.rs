use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slp_core::TokenId;
use slp_core::config::ModelConfig;
use slp_core::model::cache::{CacheState, NGramCache};
use slp_core::model::counter::Counter;
use slp_core::model::trie_counter::TrieCounter;
use slp_core::vocabulary::unstable::UnstableVocabulary;
use slp_core::vocabulary::{BOS, EOS, UNK_ID, Vocabulary};

fn cache(order: usize, capacity: usize) -> NGramCache {
	NGramCache::new(&ModelConfig::new(order, capacity).unwrap()).unwrap()
}

/// Counter holding exactly the n-grams currently in the window.
fn rebuilt(cache: &NGramCache) -> TrieCounter {
	let mut counter = TrieCounter::new();
	for sequence in cache.window() {
		counter.add_aggressive(sequence);
	}
	counter
}

/// Feeds `stream` one token at a time, learning the last position of the
/// growing input, the way a completion engine observes a file being typed.
fn feed(cache: &mut NGramCache, stream: &[TokenId], mut check: impl FnMut(&NGramCache)) {
	let mut input = Vec::with_capacity(stream.len());
	for &token in stream {
		input.push(token);
		cache.learn_token(&input, input.len() - 1).unwrap();
		check(&*cache);
	}
}

/// Deterministic pseudo-random token stream over a small alphabet.
fn token_stream(len: usize, alphabet: usize) -> Vec<TokenId> {
	let mut rng = StdRng::seed_from_u64(0x2545_f491);
	(0..len).map(|_| rng.random_range(1..=alphabet)).collect()
}

#[test]
fn growing_input_evicts_the_oldest_ngram() {
	let mut cache = cache(2, 3);
	feed(&mut cache, &[1, 2, 3, 4], |_| ());

	let window: Vec<Vec<TokenId>> = cache.window().map(<[TokenId]>::to_vec).collect();
	assert_eq!(window, vec![vec![1, 2], vec![2, 3], vec![3, 4]]);

	// The unigram [1] learned at the first position left no trace.
	assert_eq!(cache.counter(), &rebuilt(&cache));
	assert_eq!(cache.counter().count(&[1]), 1);
	assert_eq!(cache.counter().total(), 3);
}

#[test]
fn model_counts_mirror_the_window() {
	let mut cache = cache(3, 10);
	let stream = token_stream(300, 6);
	feed(&mut cache, &stream, |cache| {
		assert!(cache.len() <= cache.capacity());
		assert_eq!(cache.counter(), &rebuilt(cache));
	});
	assert_eq!(cache.len(), 10);
}

#[test]
fn seeded_stream_stays_in_the_alphabet() {
	let stream = token_stream(200, 4);
	assert_eq!(stream, token_stream(200, 4));
	assert!(stream.iter().all(|&token| (1..=4).contains(&token)));
}

#[test]
fn full_window_then_notify_starts_over() {
	let mut cache = cache(4, 5);
	feed(&mut cache, &token_stream(40, 3), |_| ());
	assert_eq!(cache.len(), 5);

	cache.notify("src/lib.rs");
	assert!(cache.is_empty());
	assert!(cache.counter().is_empty());
	assert_eq!(cache.state(), CacheState::Active);

	feed(&mut cache, &[9, 9], |_| ());
	assert_eq!(cache.counter().count(&[9]), 2);
}

#[test]
fn zero_capacity_never_learns() {
	let mut cache = cache(3, 0);
	feed(&mut cache, &token_stream(50, 4), |cache| {
		assert!(cache.is_empty());
		assert!(cache.counter().is_empty());
	});
	assert_eq!(cache.state(), CacheState::Disabled);

	cache.notify("src/main.rs");
	assert_eq!(cache.state(), CacheState::Disabled);
}

#[test]
fn ids_are_allocated_on_first_sight() {
	let mut vocabulary = Vocabulary::new();
	assert_eq!(vocabulary.to_index("foo"), 1);
	assert_eq!(vocabulary.to_index("bar"), 2);
	assert_eq!(vocabulary.to_index("foo"), 1);
	assert_eq!(vocabulary.size(), 3);
}

#[test]
fn closed_vocabulary_maps_unseen_tokens_to_unk() {
	let mut vocabulary = Vocabulary::new();
	vocabulary.to_indices(["foo", "bar"]).for_each(|_| ());
	vocabulary.close();

	assert_eq!(vocabulary.to_index("baz"), UNK_ID);
	assert_eq!(vocabulary.size(), 3);
	assert_eq!(vocabulary.count("baz"), 0);
}

#[test]
fn restored_tokens_are_reallocated() {
	let mut vocabulary = Vocabulary::new();
	vocabulary.to_indices(["foo", "bar"]).for_each(|_| ());
	vocabulary.set_checkpoint();

	assert_eq!(vocabulary.to_index("baz"), 3);
	assert_eq!(vocabulary.size(), 4);

	vocabulary.restore_checkpoint();
	assert_eq!(vocabulary.size(), 3);
	assert!(vocabulary.to_word(3).is_err());
	assert_eq!(vocabulary.to_index("baz"), 3);
}

#[test]
fn checkpoint_rolls_back_stored_and_learned_tokens() {
	let mut vocabulary = Vocabulary::new();
	vocabulary.to_indices("fn main ( ) { }".split_whitespace()).for_each(|_| ());
	vocabulary.set_checkpoint();
	let words = vocabulary.words().to_vec();
	let counts = vocabulary.counts().to_vec();
	let indices = vocabulary.word_indices().clone();

	vocabulary.to_indices("let x = 1 ;".split_whitespace()).for_each(|_| ());
	vocabulary.store("loaded", 12);
	vocabulary.restore_checkpoint();

	assert_eq!(vocabulary.words(), words.as_slice());
	assert_eq!(vocabulary.counts(), counts.as_slice());
	assert_eq!(vocabulary.word_indices(), &indices);
	assert_eq!(vocabulary.size(), words.len());
}

#[test]
fn token_stream_flows_through_vocabulary_and_cache() {
	let source = "for i in 0 .. n { sum += i ; } for j in 0 .. n { sum += j ; }";
	let mut vocabulary = Vocabulary::new();
	let tokens: Vec<TokenId> = vocabulary
		.to_indices(std::iter::once(BOS).chain(source.split_whitespace()).chain(std::iter::once(EOS)))
		.collect();

	let mut cache = cache(3, 100);
	feed(&mut cache, &tokens, |_| ());

	// Only "i" and "j" ever followed "sum +=".
	let plus = vocabulary.to_index("+=");
	let sum = vocabulary.to_index("sum");
	let candidates = cache.predict_at_index(&[sum, plus], 2).unwrap();
	let mut words: Vec<&str> = vocabulary
		.to_words(candidates.keys().copied())
		.collect::<Result<_, _>>()
		.unwrap();
	words.sort_unstable();
	assert!(words.contains(&"i"));
	assert!(words.contains(&"j"));

	let i = vocabulary.to_index("i");
	let after_plus = cache.model_at_index(&[sum, plus, i], 2).unwrap();
	let after_plus_unk = cache.model_at_index(&[sum, plus, UNK_ID], 2).unwrap();
	assert!(after_plus.probability > after_plus_unk.probability);
}
