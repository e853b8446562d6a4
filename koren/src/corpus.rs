//! Records and sentences of the tabular dependency corpus.

use std::io::{BufRead, Lines};

use crate::errors::{KorenError, Result};

/// Number of tab-separated fields in an input record.
pub const NUM_FIELDS: usize = 10;

/// The four morpheme columns, in output order.
pub const MORPHEME_COLUMNS: [&str; 4] = ["прист", "корень", "суфф", "оконч"];

/// Placeholder of an absent column value.
pub const EMPTY_VALUE: &str = "_";

/// Fine-grained POS tags for which segmentation is meaningless
/// (closed-class parts of speech).
pub const IGNORED_POS: [&str; 7] = ["PR", "COM", "CONJ", "PART", "P", "INTJ", "NID"];

/// One input line of the corpus: exactly ten tab-separated fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub form: String,
    pub lemma: String,
    pub cpostag: String,
    pub postag: String,
    pub feats: String,
    pub head: String,
    pub deprel: String,
    pub phead: String,
    pub pdeprel: String,
}

impl Record {
    /// Parses one corpus line.
    ///
    /// # Errors
    ///
    /// A field count other than ten is a structural error carrying the
    /// offending line; continuing would silently corrupt column alignment
    /// for every downstream consumer.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != NUM_FIELDS {
            return Err(KorenError::invalid_format(
                "line",
                format!(
                    "expected {NUM_FIELDS} fields but got {} on line:\n{line}",
                    fields.len()
                ),
            ));
        }
        Ok(Self {
            id: fields[0].to_string(),
            form: fields[1].to_string(),
            lemma: fields[2].to_string(),
            cpostag: fields[3].to_string(),
            postag: fields[4].to_string(),
            feats: fields[5].to_string(),
            head: fields[6].to_string(),
            deprel: fields[7].to_string(),
            phead: fields[8].to_string(),
            pdeprel: fields[9].to_string(),
        })
    }

    /// Serializes the record with the four morpheme columns inserted between
    /// the FEATS and HEAD fields, preserving the merge point downstream
    /// tools rely on.
    pub fn to_output_line(&self, columns: &[String; 4]) -> String {
        [
            self.id.as_str(),
            self.form.as_str(),
            self.lemma.as_str(),
            self.cpostag.as_str(),
            self.postag.as_str(),
            self.feats.as_str(),
            columns[0].as_str(),
            columns[1].as_str(),
            columns[2].as_str(),
            columns[3].as_str(),
            self.head.as_str(),
            self.deprel.as_str(),
            self.phead.as_str(),
            self.pdeprel.as_str(),
        ]
        .join("\t")
    }
}

/// Iterator over blank-line-delimited sentences.
///
/// Yields each sentence as the vector of its raw lines. Consecutive blank
/// lines yield empty sentences, so the blank-line structure of the corpus
/// survives a round trip. A trailing sentence without a terminating blank
/// line is yielded as well.
pub struct Sentences<R> {
    lines: Lines<R>,
    done: bool,
}

impl<R: BufRead> Iterator for Sentences<R> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut sentence = Vec::new();
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        return Some(Ok(sentence));
                    }
                    sentence.push(line);
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                None => {
                    self.done = true;
                    if sentence.is_empty() {
                        return None;
                    }
                    return Some(Ok(sentence));
                }
            }
        }
    }
}

/// Reads blank-line-delimited sentences from `input`.
pub fn sentences<R: BufRead>(input: R) -> Sentences<R> {
    Sentences {
        lines: input.lines(),
        done: false,
    }
}
