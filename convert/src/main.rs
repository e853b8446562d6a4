//! Converts segmentation listings into per-character training data.
//!
//! Input files hold one word per line as whitespace-separated `type_text`
//! parts, e.g. `прист_под корень_вод суфф_н оконч_ый`. Each input file
//! becomes `<input>.conll` with one `letter tag` pair per line, the first
//! letter of every part tagged with the boundary marker, and a blank line
//! after every word.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use koren::BOUNDARY_SUFFIX;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[clap(
    name = "convert",
    about = "Converts segmentation listings to per-character training data"
)]
struct Args {
    /// Segmentation listing files to convert.
    #[clap(required = true)]
    inputs: Vec<PathBuf>,
}

/// Rewrites one listing into the per-character format.
fn transform<R, W>(input: R, output: W) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut out = BufWriter::new(output);
    for line in input.lines() {
        let line = line?;
        for part in line.split_whitespace() {
            let Some((kind, text)) = part.split_once('_') else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            let mut chars = text.chars();
            if let Some(first) = chars.next() {
                writeln!(out, "{first} {kind}{BOUNDARY_SUFFIX}")?;
            }
            for ch in chars {
                writeln!(out, "{ch} {kind}")?;
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    for input in &args.inputs {
        let output_path = PathBuf::from(format!("{}.conll", input.display()));
        let rdr = BufReader::new(File::open(input)?);
        let wtr = File::create(&output_path)?;
        transform(rdr, wtr)?;
        eprintln!("Wrote {}", output_path.display());
    }

    Ok(())
}
