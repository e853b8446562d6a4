//! Symbolic feature generation for the external sequence labeler.
//!
//! Two feature families are produced, one per labeling context: features over
//! a single character position and features over an adjacent pair of
//! positions. The pairwise family consults the morpheme dictionary for every
//! substring starting or ending at the focus position, so the labeler can
//! learn that a position coincides with the boundary of a known morpheme
//! without bounding morpheme length in advance.

use std::sync::Arc;

use hashbrown::HashSet;

use crate::dictionary::MorphemeDict;
use crate::token::CharToken;

/// Sentinel standing in for positions outside the word.
const PAD: &str = "<PAD>";

/// The labeling context a feature call reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clique {
    /// A single character position.
    Single,

    /// An adjacent pair of positions.
    Pair,
}

impl Clique {
    /// Context suffix composed into every feature so features from different
    /// contexts never collide.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Single => "C",
            Self::Pair => "CpC",
        }
    }
}

/// Generates the symbolic features of one character position of a word part.
///
/// Holds a shared reference to the [`MorphemeDict`]; reads are unsynchronized
/// because the dictionary is immutable after load.
pub struct FeatureGenerator {
    dict: Arc<MorphemeDict>,
}

impl FeatureGenerator {
    /// Creates a generator over the given dictionary.
    pub fn new(dict: Arc<MorphemeDict>) -> Self {
        Self { dict }
    }

    /// Returns the dictionary the generator consults.
    pub fn dictionary(&self) -> &MorphemeDict {
        &self.dict
    }

    /// Returns the feature set of `clique` at position `loc` of the word
    /// formed by `tokens`.
    ///
    /// The set is deduplicated and every feature carries the clique's context
    /// suffix. Identical input always yields the identical set.
    pub fn clique_features(
        &self,
        tokens: &[CharToken],
        loc: usize,
        clique: Clique,
    ) -> HashSet<String> {
        let mut raw = Vec::new();
        match clique {
            Clique::Single => self.features_c(tokens, loc, &mut raw),
            Clique::Pair => self.features_cpc(tokens, loc, &mut raw),
        }
        raw.into_iter()
            .map(|f| format!("{f}|{}", clique.suffix()))
            .collect()
    }

    /// Single-position features: the joined previous/current and current/next
    /// characters, the current character alone, and the focus position
    /// measured from both ends of the word.
    fn features_c(&self, tokens: &[CharToken], loc: usize, out: &mut Vec<String>) {
        let loc = loc as isize;
        let p = char_at(tokens, loc - 1);
        let c = char_at(tokens, loc);
        let n = char_at(tokens, loc + 1);

        out.push(format!("{p}-{c}-PWORD-WORD"));
        out.push(format!("{c}-WORD"));
        out.push(format!("{c}-{n}-WORD-NWORD"));
        out.push(format!("{loc}-POSITION"));
        out.push(format!("{}-BACK-POSITION", tokens.len() as isize - loc));
    }

    /// Pairwise features: the two joined character features, then boundary
    /// features for every dictionary-known substring starting or ending
    /// exactly at `loc`.
    fn features_cpc(&self, tokens: &[CharToken], loc: usize, out: &mut Vec<String>) {
        let p = char_at(tokens, loc as isize - 1);
        let c = char_at(tokens, loc as isize);
        let n = char_at(tokens, loc as isize + 1);

        out.push(format!("{p}-{c}-PWORD-WORD"));
        out.push(format!("{c}-{n}-WORD-NWORD"));

        let chars: Vec<char> = tokens.iter().map(|t| t.ch).collect();

        for to in (loc + 1)..=chars.len() {
            let morpheme: String = chars[loc..to].iter().collect();
            if let Some(types) = self.dict.types_of(&morpheme) {
                for ty in types {
                    out.push(format!("START-OF-{ty}-TYPE-MORPHEME"));
                }
                out.push(format!("START-OF-{morpheme}-MORPHEME"));
            }
        }
        for from in 0..=loc {
            let morpheme: String = chars[from..loc].iter().collect();
            if let Some(types) = self.dict.types_of(&morpheme) {
                for ty in types {
                    out.push(format!("END-OF-{ty}-TYPE-MORPHEME"));
                }
                out.push(format!("END-OF-{morpheme}-MORPHEME"));
            }
        }
    }
}

/// The character at `loc` as a string, or the padding sentinel when `loc`
/// falls outside the word.
fn char_at(tokens: &[CharToken], loc: isize) -> String {
    usize::try_from(loc)
        .ok()
        .and_then(|i| tokens.get(i))
        .map_or_else(|| PAD.to_string(), |t| t.ch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::char_tokens;

    fn generator(entries: &[(&str, &str)]) -> FeatureGenerator {
        let mut dict = MorphemeDict::new();
        for (kind, morphemes) in entries {
            dict.load_reader(kind, morphemes.as_bytes()).unwrap();
        }
        FeatureGenerator::new(Arc::new(dict))
    }

    #[test]
    fn test_single_features_inside_word() {
        let gen = generator(&[]);
        let tokens = char_tokens("маска");
        let feats = gen.clique_features(&tokens, 2, Clique::Single);

        assert!(feats.contains("а-с-PWORD-WORD|C"));
        assert!(feats.contains("с-WORD|C"));
        assert!(feats.contains("с-к-WORD-NWORD|C"));
        assert!(feats.contains("2-POSITION|C"));
        assert!(feats.contains("3-BACK-POSITION|C"));
        assert_eq!(feats.len(), 5);
    }

    #[test]
    fn test_single_features_pad_at_boundaries() {
        let gen = generator(&[]);
        let tokens = char_tokens("да");

        let first = gen.clique_features(&tokens, 0, Clique::Single);
        assert!(first.contains("<PAD>-д-PWORD-WORD|C"));
        assert!(first.contains("д-а-WORD-NWORD|C"));

        let last = gen.clique_features(&tokens, 1, Clique::Single);
        assert!(last.contains("д-а-PWORD-WORD|C"));
        assert!(last.contains("а-<PAD>-WORD-NWORD|C"));
    }

    #[test]
    fn test_pairwise_start_of_morpheme() {
        // "ас" occupies positions 1..3 of "маска".
        let gen = generator(&[("корень", "ас\n")]);
        let tokens = char_tokens("маска");

        let feats = gen.clique_features(&tokens, 1, Clique::Pair);
        assert!(feats.contains("START-OF-корень-TYPE-MORPHEME|CpC"));
        assert!(feats.contains("START-OF-ас-MORPHEME|CpC"));

        // Nothing ends at position 1.
        assert!(!feats.iter().any(|f| f.starts_with("END-OF-")));
    }

    #[test]
    fn test_pairwise_end_of_morpheme() {
        let gen = generator(&[("корень", "ас\n")]);
        let tokens = char_tokens("маска");

        let feats = gen.clique_features(&tokens, 3, Clique::Pair);
        assert!(feats.contains("END-OF-корень-TYPE-MORPHEME|CpC"));
        assert!(feats.contains("END-OF-ас-MORPHEME|CpC"));
        assert!(!feats.iter().any(|f| f.starts_with("START-OF-")));
    }

    #[test]
    fn test_pairwise_emits_every_registered_type() {
        let gen = generator(&[("корень", "под\n"), ("прист", "под\n")]);
        let tokens = char_tokens("подвал");

        let feats = gen.clique_features(&tokens, 0, Clique::Pair);
        assert!(feats.contains("START-OF-корень-TYPE-MORPHEME|CpC"));
        assert!(feats.contains("START-OF-прист-TYPE-MORPHEME|CpC"));
        assert!(feats.contains("START-OF-под-MORPHEME|CpC"));
    }

    #[test]
    fn test_contexts_never_collide() {
        let gen = generator(&[("корень", "ас\n")]);
        let tokens = char_tokens("маска");

        let single = gen.clique_features(&tokens, 1, Clique::Single);
        let pair = gen.clique_features(&tokens, 1, Clique::Pair);
        assert!(single.is_disjoint(&pair));
        assert!(single.iter().all(|f| f.ends_with("|C")));
        assert!(pair.iter().all(|f| f.ends_with("|CpC")));
    }

    #[test]
    fn test_determinism() {
        let gen = generator(&[("корень", "ас\nмаск\n"), ("оконч", "а\n")]);
        let tokens = char_tokens("маска");

        for loc in 0..tokens.len() {
            let a = gen.clique_features(&tokens, loc, Clique::Pair);
            let b = gen.clique_features(&tokens, loc, Clique::Pair);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_single_char_word() {
        let gen = generator(&[("оконч", "а\n")]);
        let tokens = char_tokens("а");

        let single = gen.clique_features(&tokens, 0, Clique::Single);
        assert!(single.contains("<PAD>-а-PWORD-WORD|C"));
        assert!(single.contains("а-<PAD>-WORD-NWORD|C"));

        let pair = gen.clique_features(&tokens, 0, Clique::Pair);
        assert!(pair.contains("START-OF-оконч-TYPE-MORPHEME|CpC"));
        assert!(pair.contains("START-OF-а-MORPHEME|CpC"));
    }
}
