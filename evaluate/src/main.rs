//! Evaluates segmentation accuracy.
//!
//! Compares a system-segmented corpus against a reference segmentation and
//! reports precision, recall, and F1 over the filled morpheme cells.

use std::collections::HashSet;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;

use koren::corpus::{EMPTY_VALUE, MORPHEME_COLUMNS, NUM_FIELDS};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[clap(name = "evaluate", about = "Evaluate segmentation accuracy")]
struct Args {
    /// Reference corpus with gold morpheme columns.
    #[clap(short = 'r', long)]
    reference: PathBuf,

    /// System output to be scored.
    #[clap(short = 's', long)]
    system: PathBuf,
}

/// Collects the filled morpheme cells of a segmented corpus as
/// `(record index, column index, value)` triples.
///
/// Blank sentence separators are skipped; record indices count every
/// non-blank line, so the two corpora line up record by record.
fn morpheme_cells<R>(rdr: R) -> Result<HashSet<(usize, usize, String)>, Box<dyn Error>>
where
    R: BufRead,
{
    let num_output_fields = NUM_FIELDS + MORPHEME_COLUMNS.len();
    let mut cells = HashSet::new();
    let mut row = 0;
    for line in rdr.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != num_output_fields {
            return Err(format!(
                "expected {num_output_fields} fields but got {} on line:\n{line}",
                fields.len()
            )
            .into());
        }
        for (col, field) in fields[6..10].iter().enumerate() {
            if *field != EMPTY_VALUE {
                cells.insert((row, col, field.to_string()));
            }
        }
        row += 1;
    }
    Ok(cells)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let refs = morpheme_cells(BufReader::new(File::open(args.reference)?))?;
    let syss = morpheme_cells(BufReader::new(File::open(args.system)?))?;

    let num_ref = refs.len();
    let num_sys = syss.len();
    let num_cor = refs.intersection(&syss).count();

    let precision = num_cor as f64 / num_sys as f64;
    let recall = num_cor as f64 / num_ref as f64;
    let f1 = 2.0 * precision * recall / (precision + recall);
    println!("Precision = {precision}");
    println!("Recall = {recall}");
    println!("F1 = {f1}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmented_line(form: &str, cols: [&str; 4]) -> String {
        [
            "1", form, form, "S", "S", "_", cols[0], cols[1], cols[2], cols[3], "0", "ROOT", "_",
            "_",
        ]
        .join("\t")
    }

    #[test]
    fn test_cells_skip_placeholders_and_blank_lines() {
        let text = format!(
            "{}\n\n{}\n\n",
            segmented_line("дом", ["_", "дом", "_", "_"]),
            segmented_line("окно", ["_", "окн", "_", "о"])
        );
        let cells = morpheme_cells(text.as_bytes()).unwrap();

        assert_eq!(cells.len(), 3);
        assert!(cells.contains(&(0, 1, "дом".to_string())));
        assert!(cells.contains(&(1, 1, "окн".to_string())));
        assert!(cells.contains(&(1, 3, "о".to_string())));
    }

    #[test]
    fn test_cells_reject_unsegmented_input() {
        let ten_fields = ["1", "дом", "дом", "S", "S", "_", "0", "ROOT", "_", "_"].join("\t");
        assert!(morpheme_cells(ten_fields.as_bytes()).is_err());
    }

    #[test]
    fn test_scores_on_a_small_pair() {
        let reference = format!(
            "{}\n{}\n\n",
            segmented_line("дом", ["_", "дом", "_", "_"]),
            segmented_line("окно", ["_", "окн", "_", "о"])
        );
        let system = format!(
            "{}\n{}\n\n",
            segmented_line("дом", ["_", "дом", "_", "_"]),
            segmented_line("окно", ["_", "ок", "н", "о"])
        );

        let refs = morpheme_cells(reference.as_bytes()).unwrap();
        let syss = morpheme_cells(system.as_bytes()).unwrap();
        let num_cor = refs.intersection(&syss).count();

        // "дом" and the ending "о" agree; the root of "окно" does not and
        // the spurious suffix counts against precision.
        assert_eq!(num_cor, 2);
        assert_eq!(refs.len(), 3);
        assert_eq!(syss.len(), 4);
    }
}
