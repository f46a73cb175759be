//! Word tallies per word length, and the hapax legomena (words seen exactly once)
//! found in them.

pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod tally;

pub use config::{OverflowPolicy, TallyConfig, MAX_WORD_LEN};
pub use error::{HapaxError, TallyError, UsageError};
pub use extractor::WordExtractor;
pub use report::{find_hapax, write_dump, write_hapax, Hapax};
pub use tally::{tally_words, tally_words_in_file, Recorded, TallySummary, TallyStore};
