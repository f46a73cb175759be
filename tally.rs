use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::config::TallyConfig;
use crate::error::TallyError;
use crate::extractor::WordExtractor;

/// Outcome of [`TallyStore::record_word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// First sighting; the word now has count 1.
    Inserted,
    /// Seen before; carries the new count.
    Incremented(u32),
    /// Length was 0 or above `max_len`; nothing changed.
    Rejected,
}

/// Word counts grouped into one bucket per word length.
///
/// Bucket `L` only ever holds words of exactly `L` characters, and each word
/// appears in at most one entry. Iteration order inside a bucket is unspecified.
#[derive(Debug)]
pub struct TallyStore {
    buckets: Vec<HashMap<String, u32>>, // index 0 unused
}

impl TallyStore {
    pub fn new(max_len: usize) -> Result<Self, TallyError> {
        if max_len == 0 {
            return Err(TallyError::InvalidMaxLen(max_len.to_string()));
        }
        let slots = max_len
            .checked_add(1)
            .ok_or_else(|| TallyError::InvalidMaxLen(max_len.to_string()))?;
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(slots)?;
        buckets.resize_with(slots, HashMap::new);
        Ok(TallyStore { buckets })
    }

    pub fn max_len(&self) -> usize {
        self.buckets.len() - 1
    }

    /// Drop every entry from every bucket.
    pub fn reset(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    pub fn record_word(&mut self, word: &str) -> Result<Recorded, TallyError> {
        let len = word.chars().count();
        if len == 0 || len > self.max_len() {
            return Ok(Recorded::Rejected);
        }
        let bucket = &mut self.buckets[len];
        if let Some(count) = bucket.get_mut(word) {
            *count += 1;
            return Ok(Recorded::Incremented(*count));
        }
        bucket.try_reserve(1)?;
        bucket.insert(word.to_owned(), 1);
        Ok(Recorded::Inserted)
    }

    /// Count for `word`, or `None` if it was never recorded.
    pub fn count(&self, word: &str) -> Option<u32> {
        self.bucket(word.chars().count())
            .and_then(|bucket| bucket.get(word).copied())
    }

    pub fn bucket(&self, length: usize) -> Option<&HashMap<String, u32>> {
        if length == 0 {
            return None;
        }
        self.buckets.get(length)
    }

    pub fn bucket_len(&self, length: usize) -> usize {
        self.bucket(length).map_or(0, HashMap::len)
    }

    /// Visit every (word, count) in one bucket. Out of range lengths visit nothing.
    pub fn for_each_in_bucket<F>(&self, length: usize, mut visitor: F)
    where
        F: FnMut(&str, u32),
    {
        if let Some(bucket) = self.bucket(length) {
            for (word, &count) in bucket {
                visitor(word, count);
            }
        }
    }

    /// Number of entries in bucket `length` whose count equals `target`.
    pub fn count_with_value(&self, length: usize, target: u32) -> usize {
        let mut n = 0;
        self.for_each_in_bucket(length, |_, count| {
            if count == target {
                n += 1;
            }
        });
        n
    }

    /// Non-empty buckets in ascending length order.
    pub fn non_empty_buckets(&self) -> impl Iterator<Item = (usize, &HashMap<String, u32>)> {
        self.buckets
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, bucket)| !bucket.is_empty())
    }

    /// Sum of all counts.
    pub fn total_words(&self) -> u64 {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.values())
            .map(|&c| u64::from(c))
            .sum()
    }

    pub fn distinct_words(&self) -> usize {
        self.buckets.iter().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(HashMap::is_empty)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TallySummary {
    /// Words produced by the extractor.
    pub tokens: u64,
    pub recorded: u64,
    pub rejected: u64,
}

/// Reset `store` and fill it with the words of the file at `path`.
pub fn tally_words_in_file(
    path: impl AsRef<Path>,
    store: &mut TallyStore,
    config: &TallyConfig,
) -> Result<TallySummary, TallyError> {
    let extractor = WordExtractor::open(path, config)?;
    tally_words(extractor, store)
}

/// Reset `store` and fill it from an already opened extractor.
pub fn tally_words<R: Read>(
    extractor: WordExtractor<R>,
    store: &mut TallyStore,
) -> Result<TallySummary, TallyError> {
    store.reset();
    let path = extractor.path().to_path_buf();
    let mut summary = TallySummary::default();
    for word in extractor {
        let word = word?;
        summary.tokens += 1;
        match store.record_word(&word)? {
            Recorded::Rejected => summary.rejected += 1,
            _ => summary.recorded += 1,
        }
    }
    // stdout carries only the report, so the per-file total is a log line
    debug!(
        "total word count {} in {} ({} distinct, {} rejected)",
        summary.tokens,
        path.display(),
        store.distinct_words(),
        summary.rejected
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverflowPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn store_from(text: &str, config: &TallyConfig) -> (TallyStore, TallySummary) {
        let mut store = TallyStore::new(config.max_len).unwrap();
        let extractor = WordExtractor::from_reader("t", text.as_bytes(), config);
        let summary = tally_words(extractor, &mut store).unwrap();
        (store, summary)
    }

    #[test]
    fn rejects_zero_max_len() {
        assert!(matches!(TallyStore::new(0), Err(TallyError::InvalidMaxLen(_))));
    }

    #[test]
    fn rejects_max_len_without_room_for_index_zero() {
        assert!(matches!(
            TallyStore::new(usize::MAX),
            Err(TallyError::InvalidMaxLen(_))
        ));
    }

    #[test]
    fn record_inserts_then_increments() {
        let mut store = TallyStore::new(24).unwrap();
        assert_eq!(store.record_word("cat").unwrap(), Recorded::Inserted);
        assert_eq!(store.record_word("cat").unwrap(), Recorded::Incremented(2));
        assert_eq!(store.record_word("cat").unwrap(), Recorded::Incremented(3));
        assert_eq!(store.bucket_len(3), 1);
        assert_eq!(store.count("cat"), Some(3));
    }

    #[test]
    fn record_rejects_empty_and_overlong() {
        let mut store = TallyStore::new(5).unwrap();
        assert_eq!(store.record_word("").unwrap(), Recorded::Rejected);
        assert_eq!(store.record_word("toolong").unwrap(), Recorded::Rejected);
        assert!(store.is_empty());
        assert_eq!(store.record_word("fives").unwrap(), Recorded::Inserted);
    }

    #[test]
    fn words_land_in_bucket_of_their_length() {
        let mut store = TallyStore::new(24).unwrap();
        for w in ["a", "to", "the", "word", "don't"] {
            store.record_word(w).unwrap();
        }
        for len in 1..=5 {
            let mut seen = Vec::new();
            store.for_each_in_bucket(len, |word, _| seen.push(word.to_string()));
            assert_eq!(seen.len(), 1);
            assert_eq!(seen[0].chars().count(), len);
        }
        assert_eq!(store.bucket_len(6), 0);
    }

    #[test]
    fn reset_empties_every_bucket() {
        let mut store = TallyStore::new(24).unwrap();
        store.record_word("one").unwrap();
        store.record_word("three").unwrap();
        store.reset();
        assert!(store.is_empty());
        assert_eq!(store.count("one"), None);
        assert_eq!(store.count("three"), None);
        assert_eq!(store.total_words(), 0);
    }

    #[test]
    fn out_of_range_buckets_are_empty() {
        let store = TallyStore::new(3).unwrap();
        assert!(store.bucket(0).is_none());
        assert!(store.bucket(4).is_none());
        let mut visited = 0;
        store.for_each_in_bucket(99, |_, _| visited += 1);
        assert_eq!(visited, 0);
    }

    #[test]
    fn the_cat_sat_on_the_mat() {
        let (store, summary) = store_from("the cat sat on the mat", &TallyConfig::default());
        assert_eq!(summary.tokens, 6);
        assert_eq!(store.count("the"), Some(2));
        assert_eq!(store.count("cat"), Some(1));
        assert_eq!(store.count("sat"), Some(1));
        assert_eq!(store.count("mat"), Some(1));
        assert_eq!(store.count("on"), Some(1));
        assert_eq!(store.bucket_len(3), 4);
        assert_eq!(store.bucket_len(2), 1);
        assert_eq!(store.count_with_value(3, 1), 3);
        assert_eq!(store.count_with_value(3, 2), 1);
        assert_eq!(store.count_with_value(2, 1), 1);
    }

    #[test]
    fn total_matches_in_range_token_count() {
        let text = "It was the best of times, it was the worst of times; \
                    it was the age of wisdom, it was the age of foolishness.";
        let (store, summary) = store_from(text, &TallyConfig::default());
        assert_eq!(store.total_words(), summary.recorded);
        assert_eq!(summary.recorded, 24);
        assert_eq!(summary.rejected, 0);
        assert_eq!(store.count("it"), Some(4));
        assert_eq!(store.count("foolishness"), Some(1));
    }

    #[test]
    fn small_max_len_drops_longer_words() {
        let config = TallyConfig::with_max_len(3).unwrap();
        let (store, summary) = store_from("a bb ccc dddd eeeee ccc", &config);
        assert_eq!(summary.tokens, 4);
        assert_eq!(store.total_words(), 4);
        assert_eq!(store.count("dddd"), None);
        assert_eq!(store.count("ccc"), Some(2));
    }

    #[test]
    fn truncated_words_merge_with_their_prefix() {
        let config = TallyConfig {
            max_len: 3,
            overflow: OverflowPolicy::Truncate,
        };
        let (store, _) = store_from("catalog cat", &config);
        assert_eq!(store.count("cat"), Some(2));
    }

    #[test]
    fn tally_resets_between_files() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "apple apple pear").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "plum").unwrap();

        let config = TallyConfig::default();
        let mut store = TallyStore::new(config.max_len).unwrap();
        tally_words_in_file(first.path(), &mut store, &config).unwrap();
        assert_eq!(store.count("apple"), Some(2));

        tally_words_in_file(second.path(), &mut store, &config).unwrap();
        assert_eq!(store.count("apple"), None);
        assert_eq!(store.count("pear"), None);
        assert_eq!(store.count("plum"), Some(1));
    }

    struct FailsAfterFirstLine {
        sent: bool,
    }

    impl Read for FailsAfterFirstLine {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
            }
            self.sent = true;
            let line = b"word\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn read_failure_aborts_the_tally() {
        let config = TallyConfig::default();
        let mut store = TallyStore::new(config.max_len).unwrap();
        let extractor =
            WordExtractor::from_reader("broken.txt", FailsAfterFirstLine { sent: false }, &config);
        let err = tally_words(extractor, &mut store).unwrap_err();
        assert!(matches!(err, TallyError::Read { .. }));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = TallyConfig::default();
        let mut store = TallyStore::new(config.max_len).unwrap();
        let err = tally_words_in_file(dir.path().join("nope.txt"), &mut store, &config).unwrap_err();
        assert!(matches!(err, TallyError::Open { .. }));
    }
}
