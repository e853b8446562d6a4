//! Rebuilds typed morpheme spans from per-character tag output.

use crate::errors::ReconstructionError;
use crate::token::{LabeledToken, BOUNDARY_SUFFIX};

/// A contiguous run of same-type characters reconstructed from tagged output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorphemeSpan {
    /// The morpheme type shared by all characters of the span.
    pub kind: String,

    /// The literal substring the span covers.
    pub text: String,
}

/// Converts a flat per-character tag sequence back into typed, contiguous
/// morpheme spans.
///
/// The first tag must carry [`BOUNDARY_SUFFIX`]. Any later tag that differs
/// from the current type must carry it too; the accumulated buffer is then
/// flushed and a new span starts. A marked tag of the same type also starts
/// a new span, so adjacent same-type morphemes stay separate. The final
/// buffer is flushed unconditionally at end of input.
///
/// Concatenating the `text` of the returned spans in order reproduces the
/// input character sequence exactly.
///
/// # Errors
///
/// Returns a [`ReconstructionError`] naming the offending tag when the
/// sequence does not start with a marked tag, or when the type changes
/// without a marker.
pub fn reconstruct(tagged: &[LabeledToken]) -> Result<Vec<MorphemeSpan>, ReconstructionError> {
    let mut spans = Vec::new();
    let mut kind: Option<String> = None;
    let mut text = String::new();

    for labeled in tagged {
        match kind.as_deref() {
            None => {
                let started = labeled.tag.strip_suffix(BOUNDARY_SUFFIX).ok_or_else(|| {
                    ReconstructionError::MissingStartMarker {
                        tag: labeled.tag.clone(),
                    }
                })?;
                kind = Some(started.to_string());
            }
            Some(current) if current != labeled.tag => {
                let started = labeled.tag.strip_suffix(BOUNDARY_SUFFIX).ok_or_else(|| {
                    ReconstructionError::UnmarkedTypeChange {
                        tag: labeled.tag.clone(),
                    }
                })?;
                spans.push(MorphemeSpan {
                    kind: current.to_string(),
                    text: std::mem::take(&mut text),
                });
                kind = Some(started.to_string());
            }
            _ => {}
        }
        text.push(labeled.token.ch);
    }

    if let Some(kind) = kind {
        spans.push(MorphemeSpan { kind, text });
    }
    Ok(spans)
}
