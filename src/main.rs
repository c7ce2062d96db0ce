use anyhow::Context;
use clap::Parser;
use colored::*;
use dtc_extractor::cli::Args;
use dtc_extractor::config::{ExtractorConfig, SinkKind};
use dtc_extractor::models::RunSummary;
use dtc_extractor::pipeline;
use std::process;
use tracing::debug;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(run(&args));

    match result {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
            process::exit(1);
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = args.to_config().context("Invalid configuration")?;
    debug!("Effective configuration: {:?}", config);

    let summary = pipeline::run(&config)
        .await
        .with_context(|| format!("Extraction from {} failed", config.input_path.display()))?;

    if !args.quiet {
        print_report(&config, &summary);
    }
    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dtc_extractor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn print_report(config: &ExtractorConfig, summary: &RunSummary) {
    let stats = &summary.stats;
    let report = &summary.report;

    println!("{}", "DTC extraction complete".bright_green().bold());
    println!(
        "  {} {}",
        "Input:".bright_cyan(),
        config.input_path.display()
    );
    println!(
        "  {} {} lines, {} codes, {} annotations",
        "Read:".bright_cyan(),
        stats.lines_read,
        stats.code_declarations,
        stats.annotations
    );
    println!(
        "  {} {}",
        "Entries:".bright_cyan(),
        stats.entries_assembled.to_string().bright_white().bold()
    );

    match config.sink {
        SinkKind::File => println!(
            "  {} {} entries to {}",
            "Wrote:".bright_cyan(),
            report.written,
            config.output_path.display()
        ),
        SinkKind::Storage => println!(
            "  {} {} rows in {} batches ({} existing skipped)",
            "Inserted:".bright_cyan(),
            report.written,
            report.batches,
            report.skipped
        ),
    }

    println!(
        "  {} {:.2}s",
        "Time:".bright_cyan(),
        summary.processing_time.as_secs_f64()
    );
}
