//! The seam to the external sequence labeler.
//!
//! The labeler assigns one tag per character of a word part; how it decodes
//! is its own concern. This module defines the consuming contract as a trait
//! and provides an implementation backed by a serialized CRFsuite model.

use std::fs;
use std::path::Path;

use crfs::{Attribute, Model};

use crate::errors::{KorenError, Result};
use crate::features::{Clique, FeatureGenerator};
use crate::token::{CharToken, LabeledToken};

/// An opaque per-character sequence tagger.
///
/// Implementations must return exactly one labeled token per input token, in
/// input order. Any failure is fatal to the pipeline run, unlike the
/// recoverable reconstruction errors downstream.
pub trait SequenceLabeler: Sync {
    /// Assigns a tag to every token of one word part.
    fn label(&self, tokens: &[CharToken]) -> Result<Vec<LabeledToken>>;
}

/// [`SequenceLabeler`] backed by a serialized CRFsuite model.
///
/// For every character, the features of both labeling contexts are generated
/// through the owned [`FeatureGenerator`] and submitted to the model as
/// binary attributes.
pub struct CrfLabeler {
    data: Vec<u8>,
    features: FeatureGenerator,
}

impl CrfLabeler {
    /// Loads the serialized model at `path`.
    ///
    /// The model is validated eagerly so a broken file is reported at
    /// startup rather than in the middle of a corpus.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or an invalid-state
    /// error if the bytes do not parse as a CRFsuite model.
    pub fn from_path<P>(path: P, features: FeatureGenerator) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        Self::from_bytes(fs::read(path)?, features)
    }

    /// Builds a labeler from in-memory model bytes.
    ///
    /// # Errors
    ///
    /// Returns an invalid-state error if the bytes do not parse as a
    /// CRFsuite model.
    pub fn from_bytes(data: Vec<u8>, features: FeatureGenerator) -> Result<Self> {
        Model::new(&data)
            .map_err(|e| KorenError::invalid_state("failed to load the CRF model", e.to_string()))?;
        Ok(Self { data, features })
    }
}

impl SequenceLabeler for CrfLabeler {
    fn label(&self, tokens: &[CharToken]) -> Result<Vec<LabeledToken>> {
        let xseq: Vec<Vec<Attribute>> = (0..tokens.len())
            .map(|loc| {
                let mut feats = self
                    .features
                    .clique_features(tokens, loc, Clique::Single);
                feats.extend(self.features.clique_features(tokens, loc, Clique::Pair));
                feats
                    .into_iter()
                    .map(|name| Attribute::new(name.as_str(), 1.0))
                    .collect()
            })
            .collect();

        // The model borrows the raw bytes, so it is rebuilt per call; the
        // header parse is cheap next to decoding.
        let model = Model::new(&self.data)
            .map_err(|e| KorenError::invalid_state("failed to load the CRF model", e.to_string()))?;
        let mut tagger = model
            .tagger()
            .map_err(|e| KorenError::invalid_state("failed to create a tagger", e.to_string()))?;
        let tags = tagger
            .tag(&xseq)
            .map_err(|e| KorenError::invalid_state("failed to tag a word", e.to_string()))?;

        if tags.len() != tokens.len() {
            return Err(KorenError::invalid_state(
                "labeler broke the one-tag-per-character contract",
                format!("{} characters, {} tags", tokens.len(), tags.len()),
            ));
        }

        Ok(tokens
            .iter()
            .zip(tags)
            .map(|(&token, tag)| LabeledToken {
                token,
                tag: tag.to_string(),
            })
            .collect())
    }
}
