use corvus_core::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads one asset category's version and hash ledger from an unpacked
/// asset tree.
#[derive(Debug, Clone)]
pub struct Ledger {
    root: PathBuf,
}

impl Ledger {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The asset tree root this ledger reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Verbatim content of the category's version file.
    ///
    /// The content is not trimmed; any trailing whitespace the client
    /// shipped is preserved.
    pub fn version(&self, category: AssetCategory) -> Result<String, LedgerError> {
        let path = self.root.join(category.version_filename());
        if !path.exists() {
            return Err(LedgerError::MissingFile(path));
        }

        debug!(category = %category, path = %path.display(), "reading version file");
        Ok(std::fs::read_to_string(&path)?)
    }

    /// Lazy iterator over the category's hash ledger.
    ///
    /// Records are materialized one line at a time. The iterator is
    /// single-pass and forward-only; the first error ends it permanently.
    pub fn hashes(&self, category: AssetCategory) -> Result<HashRecords, LedgerError> {
        let path = self.root.join(category.hashes_filename());
        if !path.exists() {
            return Err(LedgerError::MissingFile(path));
        }

        debug!(category = %category, path = %path.display(), "opening hash ledger");
        let file = File::open(&path)?;
        Ok(HashRecords {
            reader: BufReader::new(file),
            path,
            line: 0,
            done: false,
        })
    }
}

/// Forward-only stream of [`HashRecord`]s from one hash ledger file.
///
/// Blank lines are skipped; a malformed line yields a fatal
/// [`LedgerError::Format`] naming the file and line number.
#[derive(Debug)]
pub struct HashRecords {
    reader: BufReader<File>,
    path: PathBuf,
    line: usize,
    done: bool,
}

impl Iterator for HashRecords {
    type Item = Result<HashRecord, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = String::new();
        loop {
            buf.clear();
            self.line += 1;
            match self.reader.read_line(&mut buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            }

            let line = buf.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }

            return Some(HashRecord::from_line(line).map_err(|source| {
                self.done = true;
                LedgerError::Format {
                    path: self.path.clone(),
                    line: self.line,
                    source,
                }
            }));
        }
    }
}
