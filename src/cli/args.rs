//! Command line argument parsing for the spelltrie CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// spelltrie - noisy-channel spelling correction over a frequency trie
#[derive(Parser, Debug, Clone)]
#[command(name = "spelltrie")]
#[command(about = "Correct misspelled words using a learned error model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SpellArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", env = "SPELLTRIE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SpellArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Correct words given on the command line
    Correct(CorrectArgs),

    /// Correct every query of a CSV file
    Batch(BatchArgs),

    /// Show statistics of the trained corrector
    Stats(StatsArgs),
}

/// Data files every command trains from
#[derive(Parser, Debug, Clone)]
pub struct TrainingArgs {
    /// Dictionary CSV with `Id,Freq` rows
    #[arg(short, long, value_name = "WORDS_CSV")]
    pub words: PathBuf,

    /// Training CSV with `Id,Expected` rows
    #[arg(short, long, value_name = "TRAIN_CSV")]
    pub train: PathBuf,
}

/// Arguments for correcting single words
#[derive(Parser, Debug, Clone)]
pub struct CorrectArgs {
    #[command(flatten)]
    pub data: TrainingArgs,

    /// Words to correct
    #[arg(value_name = "WORD", required = true)]
    pub queries: Vec<String>,
}

/// Arguments for batch correction
#[derive(Parser, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub data: TrainingArgs,

    /// CSV whose first column holds the queries
    #[arg(short, long, value_name = "INPUT_CSV")]
    pub input: PathBuf,

    /// Where to write `Id,Predicted` rows
    #[arg(short, long, value_name = "OUTPUT_CSV")]
    pub output: PathBuf,

    /// Number of threads to use
    #[arg(long)]
    pub threads: Option<usize>,

    /// Try splitting long words in two when nothing else fits
    #[arg(long)]
    pub precision: bool,
}

/// Arguments for corrector statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub data: TrainingArgs,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_command() {
        let args = SpellArgs::try_parse_from([
            "spelltrie",
            "correct",
            "--words",
            "words.csv",
            "--train",
            "train.csv",
            "КАРОВА",
            "МАЛИТВЫ",
        ])
        .unwrap();

        match args.command {
            Command::Correct(correct) => {
                assert_eq!(correct.queries, vec!["КАРОВА", "МАЛИТВЫ"]);
                assert_eq!(correct.data.words, PathBuf::from("words.csv"));
                assert_eq!(correct.data.train, PathBuf::from("train.csv"));
            }
            _ => panic!("Expected correct command"),
        }
    }

    #[test]
    fn test_correct_requires_words() {
        let result = SpellArgs::try_parse_from([
            "spelltrie",
            "correct",
            "--words",
            "words.csv",
            "--train",
            "train.csv",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_batch_command_with_globals() {
        let args = SpellArgs::try_parse_from([
            "spelltrie",
            "batch",
            "-w",
            "words.csv",
            "-t",
            "train.csv",
            "-i",
            "queries.csv",
            "-o",
            "out.csv",
            "--threads",
            "4",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.verbosity(), 2);
        match args.command {
            Command::Batch(batch) => {
                assert_eq!(batch.threads, Some(4));
                assert_eq!(batch.output, PathBuf::from("out.csv"));
                assert!(!batch.precision);
            }
            _ => panic!("Expected batch command"),
        }
    }

    #[test]
    fn test_verbosity_levels() {
        let args =
            SpellArgs::try_parse_from(["spelltrie", "-q", "stats", "-w", "a.csv", "-t", "b.csv"])
                .unwrap();
        assert_eq!(args.verbosity(), 0);

        let args =
            SpellArgs::try_parse_from(["spelltrie", "stats", "-w", "a.csv", "-t", "b.csv"])
                .unwrap();
        assert_eq!(args.verbosity(), 1);
    }
}
