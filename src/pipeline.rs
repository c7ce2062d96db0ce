//! End-to-end extraction run.
//!
//! Reads the whole input into memory, reduces its lines in order, then hands
//! the finished entry list to the configured sink. Nothing is written if
//! the input cannot be read.

use crate::assembler::{EntryAssembler, PairingPolicy};
use crate::classifier::LineClassifier;
use crate::config::{ExtractorConfig, SinkKind};
use crate::emitter::{StorageSink, write_json};
use crate::error::{DtcError, Result};
use crate::models::{DtcEntry, EmitReport, ExtractionStats, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Read the source file, mapping a missing file to [`DtcError::InputNotFound`]
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DtcError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DtcError::InputRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Classify and assemble every line of `source`
pub fn extract_entries(
    source: &str,
    policy: PairingPolicy,
    progress: Option<&ProgressBar>,
) -> Result<(Vec<DtcEntry>, ExtractionStats)> {
    let classifier = LineClassifier::new()?;
    let mut assembler = EntryAssembler::new(policy);

    for (line_number, line) in source.lines().enumerate() {
        assembler.push(line_number, classifier.classify(line));
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let (entries, stats) = assembler.finish();
    log_stats(&stats);
    Ok((entries, stats))
}

/// Run a full extraction with `config`
pub async fn run(config: &ExtractorConfig) -> Result<RunSummary> {
    config.validate()?;
    let start_time = Instant::now();

    info!("Reading {}", config.input_path.display());
    let source = read_source(&config.input_path)?;

    let progress = config
        .show_progress
        .then(|| create_progress_bar(source.lines().count() as u64, "Classifying lines"));

    let (entries, stats) = extract_entries(&source, config.pairing, progress.as_ref())?;
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    info!(
        "Assembled {} entries from {} lines ({:?} pairing)",
        entries.len(),
        stats.lines_read,
        config.pairing
    );

    let report = emit(config, &entries).await?;

    Ok(RunSummary {
        stats,
        report,
        processing_time: start_time.elapsed(),
    })
}

async fn emit(config: &ExtractorConfig, entries: &[DtcEntry]) -> Result<EmitReport> {
    match config.sink {
        SinkKind::File => write_json(entries, &config.output_path),
        SinkKind::Storage => {
            let sink = StorageSink::connect(&config.database_url, config.batch_size).await?;
            let progress = config
                .show_progress
                .then(|| create_progress_bar(entries.len() as u64, "Writing batches"));

            let result = sink.write(entries, progress.as_ref()).await;
            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }
            sink.pool().close().await;
            result
        }
    }
}

fn log_stats(stats: &ExtractionStats) {
    debug!(
        "Lines: {} read, {} ignored; {} codes, {} annotations",
        stats.lines_read, stats.lines_ignored, stats.code_declarations, stats.annotations
    );

    let dropped = stats.codes_overwritten + stats.codes_outside_window + stats.codes_unpaired_at_end;
    if dropped > 0 {
        info!(
            "{} codes dropped without a description ({} overwritten, {} outside window, {} at end of input)",
            dropped,
            stats.codes_overwritten,
            stats.codes_outside_window,
            stats.codes_unpaired_at_end
        );
    }
}

/// Create a progress bar for line and batch processing
fn create_progress_bar(total: u64, operation: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(operation.to_string());
    pb
}
