use std::io::Write;

use tracing::warn;

use crate::config::TallyConfig;
use crate::error::{HapaxError, TallyError, UsageError};
use crate::report::{write_dump, write_hapax};
use crate::tally::{tally_words_in_file, TallyStore};

pub const USAGE: &str = "
Find and print the hapax legomena in one or more files.
A \"hapax legomenon\" is a word that occurs only once in the file

Usage:
    hapax [<options>] <datafile> [ <datafile> ...]

Options:
-d     : print out all data loaded instead of hapax legomena.
-h     : this help.  You are looking at it.
-l <N> : only print hapax legomena of length <N>.
       : If no -l option is given, all hapax legomena are printed.

Sample command line:
    hapax -l5 smalldata.txt

This example would print all words of length 5 that exist in the
file \"smalldata.txt\".
";

/// One file to process, with the options in effect when it was named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub path: String,
    pub dump: bool,
    pub hapax_length: Option<usize>,
}

/// Walks the arguments left to right. Options apply to the files named after them,
/// so jobs are handed out one at a time and an error stops the walk where it occurs.
pub struct ArgScanner<I> {
    args: I,
    dump: bool,
    hapax_length: Option<usize>,
    failed: bool,
}

impl<I: Iterator<Item = String>> ArgScanner<I> {
    pub fn new(args: impl IntoIterator<Item = String, IntoIter = I>) -> Self {
        ArgScanner {
            args: args.into_iter(),
            dump: false,
            hapax_length: None,
            failed: false,
        }
    }

    fn set_length(&mut self, raw: &str) -> Result<(), UsageError> {
        self.hapax_length = Some(parse_length(raw)?);
        Ok(())
    }
}

impl<I: Iterator<Item = String>> Iterator for ArgScanner<I> {
    type Item = Result<Job, UsageError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        while let Some(arg) = self.args.next() {
            let step = match arg.as_str() {
                "-d" => {
                    self.dump = true;
                    Ok(())
                }
                "-h" => Err(UsageError::Help),
                "-l" => match self.args.next() {
                    Some(raw) => self.set_length(&raw),
                    None => Err(UsageError::MissingLength),
                },
                attached if attached.starts_with("-l") => self.set_length(&attached[2..]),
                _ => {
                    return Some(Ok(Job {
                        path: arg,
                        dump: self.dump,
                        hapax_length: self.hapax_length,
                    }));
                }
            };
            if let Err(e) = step {
                self.failed = true;
                return Some(Err(e));
            }
        }
        None
    }
}

fn parse_length(raw: &str) -> Result<usize, UsageError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => {
            usize::try_from(n).map_err(|_| UsageError::InvalidLength(raw.to_string()))
        }
        _ => Err(UsageError::InvalidLength(raw.to_string())),
    }
}

/// Tally one file and print its report.
pub fn process_job<W: Write>(
    out: &mut W,
    job: &Job,
    store: &mut TallyStore,
    config: &TallyConfig,
) -> Result<(), HapaxError> {
    tally_words_in_file(&job.path, store, config)?;
    writeln!(out, "Tally loaded")?;
    if job.dump {
        write_dump(out, &job.path, store)?;
    } else {
        write_hapax(out, &job.path, store, job.hapax_length)?;
    }
    Ok(())
}

/// Run the whole command line. Returns the process exit status.
///
/// A file that cannot be tallied is reported on `err` and skipped; the
/// remaining files are still processed and the status becomes 1.
pub fn run<W, E>(
    args: impl IntoIterator<Item = String>,
    config: &TallyConfig,
    out: &mut W,
    err: &mut E,
) -> Result<i32, HapaxError>
where
    W: Write,
    E: Write,
{
    let mut store = TallyStore::new(config.max_len)?;
    let mut processed = 0usize;
    let mut failures = 0usize;

    for job in ArgScanner::new(args) {
        let job = match job {
            Ok(job) => job,
            Err(usage) => {
                out.flush()?;
                print_usage(err, &usage)?;
                return Ok(1);
            }
        };
        match process_job(out, &job, &mut store, config) {
            Ok(()) => processed += 1,
            Err(HapaxError::Tally(e)) if !matches!(e, TallyError::Allocation(_)) => {
                warn!(path = %job.path, error = %e, "skipping file");
                out.flush()?;
                writeln!(err, "processing '{}' failed: {}", job.path, e)?;
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if processed == 0 && failures == 0 {
        out.flush()?;
        print_usage(err, &UsageError::NoFiles)?;
        return Ok(1);
    }
    Ok(if failures == 0 { 0 } else { 1 })
}

fn print_usage<E: Write>(err: &mut E, cause: &UsageError) -> std::io::Result<()> {
    if *cause != UsageError::Help {
        writeln!(err, "{}", cause)?;
    }
    write!(err, "{}", USAGE)
}
