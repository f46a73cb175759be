use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

/// Failures while building a tally for one file.
#[derive(Debug, thiserror::Error)]
pub enum TallyError {
    #[error("cannot open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("read error in '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("memory allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("invalid maximum word length '{0}'")]
    InvalidMaxLen(String),
}

/// Command line problems. Every variant ends in the usage text and exit status 1.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("help requested")]
    Help,

    #[error("missing argument for -l")]
    MissingLength,

    #[error("invalid argument for -l")]
    InvalidLength(String),

    #[error("No data processed -- provide the name of a file on the command line")]
    NoFiles,
}

/// Failures from tallying a file or writing its report.
#[derive(Debug, thiserror::Error)]
pub enum HapaxError {
    #[error(transparent)]
    Tally(#[from] TallyError),

    #[error("output error: {0}")]
    Output(#[from] io::Error),
}
