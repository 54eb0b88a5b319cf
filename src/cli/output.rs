//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SpellArgs};
use crate::error::Result;
use crate::spelling::corrector::{CorrectionResult, CorrectorStats};

/// Result structure for the correct command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrectionReport {
    pub corrections: Vec<CorrectionResult>,
    pub duration_ms: u64,
}

/// Result structure for batch correction.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub output: String,
    pub total_queries: usize,
    pub changed: usize,
    pub duration_ms: u64,
    pub queries_per_second: f64,
}

/// Anything the CLI can print in either format.
pub trait Render: Serialize {
    fn render_human(&self) -> String;
}

impl Render for CorrectionReport {
    fn render_human(&self) -> String {
        let mut out = String::new();
        for result in &self.corrections {
            let score = result
                .score
                .map(|s| format!(" (score: {s:.3})"))
                .unwrap_or_default();
            out.push_str(&format!(
                "{} -> {}  [{:?}]{}\n",
                result.original, result.corrected, result.outcome, score
            ));
        }
        out
    }
}

impl Render for BatchReport {
    fn render_human(&self) -> String {
        format!(
            "Corrected {} of {} queries in {} ms ({:.1} queries/s)\nPredictions written to {}\n",
            self.changed, self.total_queries, self.duration_ms, self.queries_per_second, self.output
        )
    }
}

impl Render for CorrectorStats {
    fn render_human(&self) -> String {
        let mut out = String::new();
        out.push_str("Corrector Statistics:\n");
        out.push_str("═════════════════════\n");
        out.push_str(&format!("Lexicon words:          {}\n", self.lexicon_words));
        out.push_str(&format!("Known words:            {}\n", self.known_words));
        out.push_str(&format!("Training pairs:         {}\n", self.training_pairs));
        out.push_str(&format!("Trie nodes:             {}\n", self.trie_nodes));
        out.push_str(&format!("Prior entries:          {}\n", self.prior_entries));
        out.push_str(&format!("Average prior:          {:.3e}\n", self.average_prior));
        out.push_str(&format!(
            "Average training score: {:.3}\n",
            self.average_training_score
        ));
        out.push_str(&format!("Threshold:              {:.3}\n", self.threshold));
        out.push_str(&format!("Learned endings:        {}\n", self.endings));
        out.push_str(&format!(
            "Edit totals:            {:.1} / {:.1} / {:.1}\n",
            self.edit_totals[0], self.edit_totals[1], self.edit_totals[2]
        ));
        out
    }
}

/// Format a result according to the selected output format.
pub fn format_result<T: Render>(result: &T, args: &SpellArgs) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => Ok(result.render_human()),
        OutputFormat::Json if args.pretty => Ok(serde_json::to_string_pretty(result)? + "\n"),
        OutputFormat::Json => Ok(serde_json::to_string(result)? + "\n"),
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Render>(message: &str, result: &T, args: &SpellArgs) -> Result<()> {
    if args.output_format == OutputFormat::Human && args.verbosity() > 1 {
        println!("{message}");
        println!();
    }
    print!("{}", format_result(result, args)?);
    Ok(())
}
