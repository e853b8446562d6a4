//! The concurrent read → label → reconstruct → write pipeline.
//!
//! One ingestion thread (the caller's) groups corpus lines into sentences and
//! dispatches them over a bounded channel to a pool of worker threads. Each
//! worker labels and rewrites whole sentences; a dedicated writer thread
//! re-emits them in submission order. Bounded channels give backpressure in
//! both directions, and channel disconnection doubles as completion
//! detection, so no global state is involved: all counters belong to the
//! invocation.

use std::collections::BTreeMap;
use std::io::{BufRead, BufWriter, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use hashbrown::HashSet;
use log::{info, warn};

use crate::corpus::{self, Record, EMPTY_VALUE, IGNORED_POS, MORPHEME_COLUMNS};
use crate::errors::{KorenError, Result};
use crate::labeler::SequenceLabeler;
use crate::reconstruct::{reconstruct, MorphemeSpan};
use crate::token::char_tokens;

/// Shortest word part still worth segmenting, in characters.
const MIN_PART_CHARS: usize = 2;

/// Interval of progress reports, in sentences.
const PROGRESS_EVERY: usize = 1000;

/// Tuning knobs of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of worker threads labeling sentences.
    pub num_workers: usize,

    /// Capacity of the bounded job and output channels.
    pub queue_capacity: usize,

    /// Fine-grained POS tags excluded from segmentation.
    pub ignored_pos: HashSet<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_workers: 1,
            queue_capacity: 256,
            ignored_pos: IGNORED_POS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Counters of one finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Sentences read and dispatched.
    pub submitted: usize,

    /// Sentences labeled, merged, and written.
    pub processed: usize,

    /// Word parts whose tag stream failed reconstruction.
    pub failed_parts: usize,
}

/// Runs the pipeline over `input`, writing segmented sentences to `output`.
///
/// Sentence order is preserved: the writer buffers out-of-order completions
/// and emits strictly by submission sequence.
///
/// # Errors
///
/// Structural corpus errors and labeler failures abort the run and the first
/// error encountered is returned; reconstruction failures are logged and
/// recovered per word part.
pub fn run<L, R, W>(
    labeler: &L,
    input: R,
    output: W,
    config: &PipelineConfig,
) -> Result<PipelineStats>
where
    L: SequenceLabeler,
    R: BufRead,
    W: Write + Send,
{
    if config.num_workers == 0 {
        return Err(KorenError::invalid_argument(
            "config",
            "num_workers must be at least 1",
        ));
    }

    let (job_tx, job_rx) = bounded::<(usize, Vec<String>)>(config.queue_capacity);
    let (done_tx, done_rx) = bounded::<(usize, String)>(config.queue_capacity);

    let submitted = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);
    let failed_parts = AtomicUsize::new(0);

    let outcome: Result<()> = thread::scope(|scope| {
        let writer = scope.spawn(move || write_loop(done_rx, output));

        let mut workers = Vec::with_capacity(config.num_workers);
        for _ in 0..config.num_workers {
            let jobs = job_rx.clone();
            let done = done_tx.clone();
            let processed = &processed;
            let failed_parts = &failed_parts;
            workers.push(scope.spawn(move || {
                worker_loop(jobs, done, labeler, config, processed, failed_parts)
            }));
        }
        // Only the workers hold these ends now; their exit closes the
        // channels and thereby the writer.
        drop(job_rx);
        drop(done_tx);

        let ingested = ingest(input, &job_tx, &submitted);
        drop(job_tx);

        let mut first_err: Option<KorenError> = None;
        let mut record = |r: Result<()>| {
            if let Err(e) = r {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        };
        for worker in workers {
            record(join_thread(worker));
        }
        record(join_thread(writer));
        record(ingested);

        first_err.map_or(Ok(()), Err)
    });
    outcome?;

    Ok(PipelineStats {
        submitted: submitted.load(Ordering::Relaxed),
        processed: processed.load(Ordering::Relaxed),
        failed_parts: failed_parts.load(Ordering::Relaxed),
    })
}

/// Flattens a join handle's panic and its payload into the crate error.
fn join_thread(handle: thread::ScopedJoinHandle<'_, Result<()>>) -> Result<()> {
    match handle.join() {
        Ok(result) => result,
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
                (*s).to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(KorenError::ThreadPanic(msg))
        }
    }
}

/// Reads sentences and dispatches them in submission order.
fn ingest<R: BufRead>(
    input: R,
    jobs: &Sender<(usize, Vec<String>)>,
    submitted: &AtomicUsize,
) -> Result<()> {
    for (seq, sentence) in corpus::sentences(input).enumerate() {
        let sentence = sentence?;
        if jobs.send((seq, sentence)).is_err() {
            // Every worker is gone; their join reports the cause.
            break;
        }
        let n = submitted.fetch_add(1, Ordering::Relaxed) + 1;
        if n % PROGRESS_EVERY == 0 {
            info!("submitted {n} sentences");
        }
    }
    Ok(())
}

/// Processes whole sentences until the job channel closes.
fn worker_loop<L: SequenceLabeler>(
    jobs: Receiver<(usize, Vec<String>)>,
    done: Sender<(usize, String)>,
    labeler: &L,
    config: &PipelineConfig,
    processed: &AtomicUsize,
    failed_parts: &AtomicUsize,
) -> Result<()> {
    while let Ok((seq, lines)) = jobs.recv() {
        let mut text = String::new();
        for line in &lines {
            let rewritten = process_record(line, labeler, &config.ignored_pos, failed_parts)?;
            text.push_str(&rewritten);
            text.push('\n');
        }
        if done.send((seq, text)).is_err() {
            // The writer is gone; its join reports the cause.
            break;
        }
        let n = processed.fetch_add(1, Ordering::Relaxed) + 1;
        if n % PROGRESS_EVERY == 0 {
            info!("processed {n} sentences");
        }
    }
    Ok(())
}

/// Rewrites one record, filling the four morpheme columns where applicable.
fn process_record<L: SequenceLabeler>(
    line: &str,
    labeler: &L,
    ignored_pos: &HashSet<String>,
    failed_parts: &AtomicUsize,
) -> Result<String> {
    let record = Record::parse(line)?;
    let mut columns: [String; 4] = std::array::from_fn(|_| EMPTY_VALUE.to_string());

    if !ignored_pos.contains(record.postag.as_str()) {
        for part in record.form.split([' ', '-']) {
            if part.chars().count() < MIN_PART_CHARS {
                continue;
            }
            let tokens = char_tokens(part);
            let tagged = labeler.label(&tokens)?;
            match reconstruct(&tagged) {
                Ok(spans) => merge_spans(&mut columns, spans),
                Err(e) => {
                    // Recoverable: the part stays unsegmented, the tag
                    // sequence is kept for diagnosis.
                    failed_parts.fetch_add(1, Ordering::Relaxed);
                    let tags: Vec<&str> = tagged.iter().map(|t| t.tag.as_str()).collect();
                    warn!(
                        "failed to reconstruct '{part}': {e}; tags were [{}]",
                        tags.join(", ")
                    );
                }
            }
        }
    }

    Ok(record.to_output_line(&columns))
}

/// Merges reconstructed spans into the morpheme columns.
///
/// Spans whose type has no output column are discarded; a column still at
/// the placeholder is replaced, a filled one is appended to with `|`,
/// preserving discovery order across a word's parts.
fn merge_spans(columns: &mut [String; 4], spans: Vec<MorphemeSpan>) {
    for span in spans {
        let Some(idx) = MORPHEME_COLUMNS.iter().position(|&c| c == span.kind) else {
            continue;
        };
        if columns[idx] == EMPTY_VALUE {
            columns[idx] = span.text;
        } else {
            columns[idx].push('|');
            columns[idx].push_str(&span.text);
        }
    }
}

/// Drains completed sentences, restoring submission order.
///
/// Each sentence already ends every record line with `\n`; the extra
/// newline written after it reproduces the blank-line sentence separator.
fn write_loop<W: Write>(done: Receiver<(usize, String)>, output: W) -> Result<()> {
    let mut out = BufWriter::new(output);
    let mut next_seq = 0usize;
    let mut pending: BTreeMap<usize, String> = BTreeMap::new();

    while let Ok((seq, text)) = done.recv() {
        pending.insert(seq, text);
        while let Some(text) = pending.remove(&next_seq) {
            out.write_all(text.as_bytes())?;
            out.write_all(b"\n")?;
            next_seq += 1;
        }
    }
    // An aborted worker can leave gaps; flush whatever arrived, in order.
    for (_, text) in pending {
        out.write_all(text.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
