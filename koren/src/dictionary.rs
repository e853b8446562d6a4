//! Morpheme dictionary loaded from per-type word lists.
//!
//! The dictionary maps exact morpheme strings to the set of type labels they
//! are known under. It is built once at startup from one plain-text file per
//! morpheme type and never mutated afterwards, so workers share it without
//! locking.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use hashbrown::{HashMap, HashSet};

use crate::errors::Result;

/// Maps morpheme strings to the set of morpheme-type labels they carry.
///
/// A morpheme listed in several files accumulates all of their types; the
/// type set of a stored entry is therefore never empty.
#[derive(Default, Debug)]
pub struct MorphemeDict {
    entries: HashMap<String, HashSet<String>>,
}

impl MorphemeDict {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads morphemes of type `kind` from the file at `path`.
    ///
    /// # Errors
    ///
    /// An unreadable file is reported as an I/O error; dictionary files are
    /// required inputs, so callers treat this as fatal to startup.
    pub fn load_file<P>(&mut self, kind: &str, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.load_reader(kind, File::open(path)?)
    }

    /// Loads morphemes of type `kind` from a reader, one morpheme per line.
    ///
    /// Lines starting with `#` are comments. Blank lines are skipped.
    /// Duplicate morpheme strings accumulate types rather than overwrite.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading fails.
    pub fn load_reader<R>(&mut self, kind: &str, rdr: R) -> Result<()>
    where
        R: Read,
    {
        let buf = BufReader::new(rdr);
        for line in buf.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.entries
                .entry(line.to_string())
                .or_default()
                .insert(kind.to_string());
        }
        Ok(())
    }

    /// Returns the set of types the exact string `morpheme` is known under,
    /// or `None` if it is unknown.
    #[inline]
    pub fn types_of(&self, morpheme: &str) -> Option<&HashSet<String>> {
        self.entries.get(morpheme)
    }

    /// Returns the number of distinct morpheme strings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
