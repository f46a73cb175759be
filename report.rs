use std::io::{self, Write};

use itertools::Itertools;

use crate::tally::TallyStore;

/// A word that occurs exactly once in a file's tally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Hapax {
    pub length: usize,
    pub word: String,
}

/// Every hapax legomenon in `store`, by ascending length then word.
///
/// With `Some(length)` only that bucket is scanned. The store is not modified.
pub fn find_hapax(store: &TallyStore, length: Option<usize>) -> Vec<Hapax> {
    let lengths: Vec<usize> = match length {
        Some(len) => vec![len],
        None => (1..=store.max_len()).collect(),
    };
    let mut found = Vec::new();
    for len in lengths {
        let mut words = Vec::new();
        store.for_each_in_bucket(len, |word, count| {
            if count == 1 {
                words.push(word.to_string());
            }
        });
        words.sort_unstable();
        found.extend(words.into_iter().map(|word| Hapax { length: len, word }));
    }
    found
}

/// Print the hapax report for one file.
///
/// When a length was requested and nothing matched, a single "no hapax" line is
/// printed instead. Returns the number of hapax legomena reported.
pub fn write_hapax<W: Write>(
    out: &mut W,
    filename: &str,
    store: &TallyStore,
    length: Option<usize>,
) -> io::Result<usize> {
    let found = find_hapax(store, length);
    for hapax in &found {
        writeln!(
            out,
            "Hapax legomenon (length {}) from {}: '{}'",
            hapax.length, filename, hapax.word
        )?;
    }
    if let Some(len) = length {
        if found.is_empty() {
            writeln!(out, "No hapax legomena of length {} found in file '{}'.", len, filename)?;
        }
    }
    Ok(found.len())
}

/// Print every tallied word, grouped by length.
pub fn write_dump<W: Write>(out: &mut W, filename: &str, store: &TallyStore) -> io::Result<()> {
    writeln!(out, "All word count data from file '{}':", filename)?;
    for (len, bucket) in store.non_empty_buckets() {
        writeln!(out, "Length {}:", len)?;
        for (word, count) in bucket.iter().sorted_unstable_by(|a, b| a.0.cmp(b.0)) {
            writeln!(out, "    '{}' {}", word, count)?;
        }
    }
    Ok(())
}
