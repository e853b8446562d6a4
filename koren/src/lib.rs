//! # Koren
//!
//! Koren segments Russian word forms inside a tabular dependency-tree corpus
//! into morphemes (prefix, root, suffix, ending) and writes the segmentation
//! back as four extra columns.
//!
//! ## Overview
//!
//! The crate has two load-bearing halves. The first turns a word's
//! characters, a focus position, and a curated morpheme dictionary into
//! symbolic features for an external per-character sequence labeler, and
//! rebuilds typed morpheme spans from the labeler's flat tag output. The
//! second is a concurrent batch pipeline that fans a corpus out to that
//! labeler sentence by sentence and streams rewritten sentences back to a
//! single writer in submission order.
//!
//! ## Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use koren::{char_tokens, Clique, FeatureGenerator, MorphemeDict};
//!
//! let mut dict = MorphemeDict::new();
//! dict.load_reader("корень", "ас\n".as_bytes())?;
//!
//! let features = FeatureGenerator::new(Arc::new(dict));
//! let tokens = char_tokens("маска");
//!
//! // "ас" starts at position 1, so the pairwise context reports a
//! // dictionary-known morpheme boundary there.
//! let feats = features.clique_features(&tokens, 1, Clique::Pair);
//! assert!(feats.contains("START-OF-корень-TYPE-MORPHEME|CpC"));
//! assert!(feats.contains("START-OF-ас-MORPHEME|CpC"));
//! # Ok(())
//! # }
//! ```

/// Records and sentences of the dependency corpus.
pub mod corpus;

/// The morpheme dictionary.
pub mod dictionary;

/// Error type definitions.
pub mod errors;

/// Symbolic feature generation.
pub mod features;

/// The external labeler seam.
pub mod labeler;

/// The concurrent segmentation pipeline.
pub mod pipeline;

/// Morpheme span reconstruction.
pub mod reconstruct;

/// Per-character tokens of a word part.
pub mod token;

// Re-exports
pub use dictionary::MorphemeDict;
pub use errors::{KorenError, ReconstructionError, Result};
pub use features::{Clique, FeatureGenerator};
pub use labeler::{CrfLabeler, SequenceLabeler};
pub use pipeline::{PipelineConfig, PipelineStats};
pub use reconstruct::{reconstruct, MorphemeSpan};
pub use token::{char_tokens, CharToken, LabeledToken, BOUNDARY_SUFFIX};

/// The version number of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
