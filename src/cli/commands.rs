//! Command implementations for the spelltrie CLI.

use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset;
use crate::error::Result;
use crate::spelling::config::SpellConfig;
use crate::spelling::corrector::SpellingCorrector;

/// Execute a CLI command.
pub fn execute_command(args: SpellArgs) -> Result<()> {
    match &args.command {
        Command::Correct(correct_args) => correct_words(correct_args.clone(), &args),
        Command::Batch(batch_args) => correct_batch(batch_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

/// Load the configuration file if one was given, defaults otherwise.
pub fn load_config(args: &SpellArgs) -> Result<SpellConfig> {
    match &args.config {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            SpellConfig::from_json_file(path)
        }
        None => Ok(SpellConfig::default()),
    }
}

/// Load the data files and train a corrector.
pub fn build_corrector(data: &TrainingArgs, config: SpellConfig) -> Result<SpellingCorrector> {
    let start_time = Instant::now();
    let dictionary = dataset::load_dictionary(&data.words)?;
    let corrections = dataset::load_corrections(&data.train, &dictionary)?;
    let corrector = SpellingCorrector::build(&dictionary, &corrections, config)?;
    log::info!(
        "trained in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(corrector)
}

/// Correct words given on the command line.
fn correct_words(args: CorrectArgs, cli_args: &SpellArgs) -> Result<()> {
    let config = load_config(cli_args)?;
    let corrector = build_corrector(&args.data, config)?;

    let start_time = Instant::now();
    let corrections = args.queries.iter().map(|q| corrector.correct(q)).collect();
    let duration = start_time.elapsed();

    output_result(
        "Corrections:",
        &CorrectionReport {
            corrections,
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )
}

/// Correct every query of a CSV file and write the predictions.
fn correct_batch(args: BatchArgs, cli_args: &SpellArgs) -> Result<()> {
    let mut config = load_config(cli_args)?;
    if args.threads.is_some() {
        config.corrector.threads = args.threads;
    }
    if args.precision {
        config.corrector.precision_mode = true;
    }
    let corrector = build_corrector(&args.data, config)?;

    let queries = dataset::load_queries(&args.input)?;
    let start_time = Instant::now();
    let results = corrector.correct_batch(&queries);
    let duration = start_time.elapsed();

    dataset::write_predictions(&args.output, &results)?;

    let changed = results.iter().filter(|r| r.is_changed()).count();
    let seconds = duration.as_secs_f64();
    output_result(
        "Batch correction finished",
        &BatchReport {
            output: args.output.display().to_string(),
            total_queries: results.len(),
            changed,
            duration_ms: duration.as_millis() as u64,
            queries_per_second: if seconds > 0.0 {
                results.len() as f64 / seconds
            } else {
                0.0
            },
        },
        cli_args,
    )
}

/// Show statistics of the trained corrector.
fn show_stats(args: StatsArgs, cli_args: &SpellArgs) -> Result<()> {
    let config = load_config(cli_args)?;
    let corrector = build_corrector(&args.data, config)?;
    output_result("Corrector statistics", &corrector.stats(), cli_args)
}
