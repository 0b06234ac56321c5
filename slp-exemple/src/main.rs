use std::collections::HashMap;
use std::fs;

use log::info;
use slp_core::TokenId;
use slp_core::config::ModelConfig;
use slp_core::model::cache::NGramCache;
use slp_core::model::prediction::{self, Prediction};
use slp_core::vocabulary::{BOS, EOS, UNK_ID, Vocabulary};

/// Two small "files", already split on whitespace.
const FILES: [(&str, &str); 2] = [
    (
        "src/sum.rs",
        "fn sum ( v : & [ i32 ] ) -> i32 { let mut total = 0 ; for x in v { total += x ; } total }",
    ),
    (
        "src/max.rs",
        "fn max ( v : & [ i32 ] ) -> i32 { let mut best = v [ 0 ] ; for x in v { if x > best { best = x ; } } best }",
    ),
];

fn show(vocabulary: &Vocabulary, label: &str, candidates: &HashMap<TokenId, Prediction>) {
    match prediction::best(candidates) {
        Some((id, p)) => println!(
            "  {label}: best '{}' (p={:.3}, confidence={:.3}), sampled '{}'",
            vocabulary.to_word(id).unwrap_or("?"),
            p.probability,
            p.confidence,
            prediction::sample(candidates)
                .and_then(|id| vocabulary.to_word(id).ok())
                .unwrap_or("-"),
        ),
        None => println!("  {label}: no suggestion"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Optional JSON configuration, e.g. { "order": 3, "cache_capacity": 200 }
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config: ModelConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
            config.validate()?;
            config
        }
        None => ModelConfig::new(3, 200)?,
    };
    info!("Using {config:?}");

    let mut vocabulary = Vocabulary::new();
    let mut cache = NGramCache::new(&config)?;

    for (name, source) in FILES {
        // Statistics never leak from one file into the next
        cache.notify(name);

        let tokens = std::iter::once(BOS)
            .chain(source.split_whitespace())
            .chain(std::iter::once(EOS));
        let ids: Vec<TokenId> = vocabulary.to_indices(tokens).collect();

        // Learn as if the file was being typed, one token at a time
        let mut input = Vec::with_capacity(ids.len());
        for id in ids {
            input.push(id);
            cache.learn_token(&input, input.len() - 1)?;
        }
        println!("{name}: {} tokens, {} n-grams cached, vocabulary size {}", input.len(), cache.len(), vocabulary.size());

        // Suggest what follows "for x in"
        let prefix: Vec<TokenId> = ["for", "x", "in"].into_iter().map(|t| vocabulary.to_index(t)).collect();
        show(&vocabulary, "after 'for x in'", &cache.predict_at_index(&prefix, prefix.len())?);
    }

    // Tentatively learn a few tokens, then roll them back
    vocabulary.set_checkpoint();
    let before = vocabulary.size();
    let scratch: Vec<TokenId> = vocabulary.to_indices(["while", "loop", "break"]).collect();
    println!("checkpoint: {before} -> {} after {:?}", vocabulary.size(), scratch);
    vocabulary.restore_checkpoint();
    println!("restored: {}", vocabulary.size());

    // A closed vocabulary maps anything new to the unknown token
    vocabulary.close();
    let id = vocabulary.to_index("unseen_identifier");
    println!("closed: 'unseen_identifier' -> {id} (unknown: {})", id == UNK_ID);

    Ok(())
}
