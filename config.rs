use std::env::{self, VarError};

use crate::error::TallyError;

pub const MAX_WORD_LEN: usize = 24; // longest word that gets a bucket
pub const MAX_LEN_ENV: &str = "HAPAX_MAX_LEN";

/// What the extractor does with a run of letters longer than `max_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the whole word.
    #[default]
    Skip,
    /// Keep the first `max_len` characters.
    Truncate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyConfig {
    pub max_len: usize,
    pub overflow: OverflowPolicy,
}

impl Default for TallyConfig {
    fn default() -> Self {
        TallyConfig {
            max_len: MAX_WORD_LEN,
            overflow: OverflowPolicy::Skip,
        }
    }
}

impl TallyConfig {
    pub fn with_max_len(max_len: usize) -> Result<Self, TallyError> {
        if max_len == 0 {
            return Err(TallyError::InvalidMaxLen(max_len.to_string()));
        }
        Ok(TallyConfig {
            max_len,
            ..Default::default()
        })
    }

    /// Defaults, with `HAPAX_MAX_LEN` overriding the word length limit when set.
    pub fn from_env() -> Result<Self, TallyError> {
        Self::from_var(env::var(MAX_LEN_ENV))
    }

    fn from_var(var: Result<String, VarError>) -> Result<Self, TallyError> {
        match var {
            Ok(raw) => Self::with_max_len(parse_max_len(&raw)?),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => {
                Err(TallyError::InvalidMaxLen(raw.to_string_lossy().into_owned()))
            }
        }
    }
}

pub fn parse_max_len(raw: &str) -> Result<usize, TallyError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TallyError::InvalidMaxLen(raw.to_string())),
    }
}
