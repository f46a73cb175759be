use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{OverflowPolicy, TallyConfig};
use crate::error::TallyError;

// Letters, with apostrophes only between letters ("don't", not "'tis'")
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)*").unwrap());

/// Pull-based word tokens from one open file.
///
/// Lines are read on demand, so only the current line is buffered. Words never
/// span a line break. Each token is lowercased and bounded by `max_len` according
/// to the configured [`OverflowPolicy`]. The file handle is released when the
/// extractor is dropped, whether or not it was read to the end.
pub struct WordExtractor<R = File> {
    path: PathBuf,
    reader: BufReader<R>,
    line: Vec<u8>,
    pending: VecDeque<String>,
    max_len: usize,
    overflow: OverflowPolicy,
    done: bool,
}

impl WordExtractor<File> {
    pub fn open(path: impl AsRef<Path>, config: &TallyConfig) -> Result<Self, TallyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TallyError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(path, file, config))
    }
}

impl<R: Read> WordExtractor<R> {
    pub fn from_reader(path: impl Into<PathBuf>, inner: R, config: &TallyConfig) -> Self {
        WordExtractor {
            path: path.into(),
            reader: BufReader::new(inner),
            line: Vec::new(),
            pending: VecDeque::new(),
            max_len: config.max_len,
            overflow: config.overflow,
            done: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True while another word can be produced. Reads ahead as needed.
    pub fn has_more(&mut self) -> Result<bool, TallyError> {
        while self.pending.is_empty() && !self.done {
            self.fill()?;
        }
        Ok(!self.pending.is_empty())
    }

    /// The next word, or `None` at end of input.
    pub fn next_word(&mut self) -> Result<Option<String>, TallyError> {
        if self.has_more()? {
            Ok(self.pending.pop_front())
        } else {
            Ok(None)
        }
    }

    fn fill(&mut self) -> Result<(), TallyError> {
        self.line.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.line)
            .map_err(|source| TallyError::Read {
                path: self.path.clone(),
                source,
            })?;
        if n == 0 {
            self.done = true;
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.line);
        for m in WORD_REGEX.find_iter(&text) {
            if let Some(word) = bound_word(m.as_str(), self.max_len, self.overflow) {
                self.pending.push_back(word);
            }
        }
        Ok(())
    }
}

impl<R: Read> Iterator for WordExtractor<R> {
    type Item = Result<String, TallyError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_word() {
            Ok(Some(word)) => Some(Ok(word)),
            Ok(None) => None,
            Err(e) => {
                // a failed read ends the sequence
                self.done = true;
                self.pending.clear();
                Some(Err(e))
            }
        }
    }
}

/// Lowercase `raw` and apply the length bound. Matches are ASCII, so bytes are characters.
fn bound_word(raw: &str, max_len: usize, overflow: OverflowPolicy) -> Option<String> {
    if raw.len() <= max_len {
        return Some(raw.to_ascii_lowercase());
    }
    match overflow {
        OverflowPolicy::Skip => None,
        OverflowPolicy::Truncate => {
            // never end on a dangling apostrophe
            let cut = raw[..max_len].trim_end_matches('\'');
            Some(cut.to_ascii_lowercase())
        }
    }
}
