//! Segments the FORM column of a dependency corpus into morphemes.
//!
//! This binary loads the morpheme dictionaries and a serialized CRF model,
//! runs the segmentation pipeline over the input corpus, and writes the
//! result next to the input unless an output path is given. Each fatal
//! condition terminates with its own exit code so callers can tell them
//! apart.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;

use clap::Parser;

use koren::{pipeline, CrfLabeler, FeatureGenerator, KorenError, MorphemeDict, PipelineConfig};

/// The CRF model cannot be read or parsed.
const EXIT_MODEL: i32 = 2;
/// The input corpus cannot be opened.
const EXIT_INPUT: i32 = 3;
/// A corpus line does not have exactly ten fields.
const EXIT_CORPUS: i32 = 4;
/// The output cannot be created or written.
const EXIT_OUTPUT: i32 = 5;
/// A morpheme dictionary cannot be read.
const EXIT_DICT: i32 = 6;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[clap(name = "segment", about = "Segments word forms into morphemes")]
struct Args {
    /// Serialized CRF model.
    #[clap(short = 'm', long)]
    model: PathBuf,

    /// Input corpus (10 tab-separated columns, blank-line sentence breaks).
    #[clap(short = 'i', long)]
    input: PathBuf,

    /// Output file. Defaults to the input with a `.segmented` suffix.
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,

    /// Morpheme dictionary as TYPE=PATH. May be repeated.
    #[clap(short = 'd', long = "dict", value_parser = parse_dict_entry)]
    dicts: Vec<(String, PathBuf)>,

    /// Number of worker threads.
    #[clap(short = 't', long, default_value = "1")]
    threads: usize,

    /// Capacity of the pipeline channels.
    #[clap(long, default_value = "256")]
    queue_capacity: usize,
}

/// Parses one `TYPE=PATH` dictionary entry.
fn parse_dict_entry(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((kind, path)) if !kind.is_empty() && !path.is_empty() => {
            Ok((kind.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected TYPE=PATH but got '{s}'")),
    }
}

/// Derives the output path: `x.conll` becomes `x.segmented.conll`, anything
/// else gets `.segmented` appended.
fn derive_output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(".conll") {
        Some(stem) => input.with_file_name(format!("{stem}.segmented.conll")),
        None => input.with_file_name(format!("{name}.segmented")),
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut dict = MorphemeDict::new();
    for (kind, path) in &args.dicts {
        if let Err(e) = dict.load_file(kind, path) {
            eprintln!(
                "Failed to load the '{kind}' morpheme list from {}: {e}",
                path.display()
            );
            exit(EXIT_DICT);
        }
    }

    eprintln!("Loading the model...");
    let features = FeatureGenerator::new(Arc::new(dict));
    let labeler = match CrfLabeler::from_path(&args.model, features) {
        Ok(labeler) => labeler,
        Err(e) => {
            eprintln!("Failed to load the CRF model from {}: {e}", args.model.display());
            exit(EXIT_MODEL);
        }
    };

    let input = match File::open(&args.input) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open the input corpus {}: {e}", args.input.display());
            exit(EXIT_INPUT);
        }
    };

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&args.input));
    let output = match File::create(&output_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to create {}: {e}", output_path.display());
            exit(EXIT_OUTPUT);
        }
    };

    let config = PipelineConfig {
        num_workers: args.threads.max(1),
        queue_capacity: args.queue_capacity,
        ..Default::default()
    };

    eprintln!("Segmenting...");
    match pipeline::run(&labeler, BufReader::new(input), output, &config) {
        Ok(stats) => {
            eprintln!(
                "Processed {} of {} sentences ({} word parts failed reconstruction)",
                stats.processed, stats.submitted, stats.failed_parts
            );
        }
        Err(e @ KorenError::InvalidFormat(_)) => {
            eprintln!("Corpus structure error: {e}");
            exit(EXIT_CORPUS);
        }
        Err(e @ KorenError::Io(_)) => {
            eprintln!("I/O error while segmenting: {e}");
            exit(EXIT_OUTPUT);
        }
        Err(e) => {
            eprintln!("Segmentation failed: {e}");
            exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_output_path_replaces_conll_suffix() {
        assert_eq!(
            derive_output_path(Path::new("corpus.conll")),
            PathBuf::from("corpus.segmented.conll")
        );
        assert_eq!(
            derive_output_path(Path::new("data/corpus.txt")),
            PathBuf::from("data/corpus.txt.segmented")
        );
    }

    #[test]
    fn test_parse_dict_entry() {
        let (kind, path) = parse_dict_entry("корень=roots.txt").unwrap();
        assert_eq!(kind, "корень");
        assert_eq!(path, PathBuf::from("roots.txt"));

        assert!(parse_dict_entry("no-separator").is_err());
        assert!(parse_dict_entry("=path").is_err());
    }
}
