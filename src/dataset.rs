//! CSV input and output for dictionaries, training pairs and predictions.
//!
//! The expected layouts are:
//! ```csv
//! Id,Freq
//! МОЛИТВЫ,40
//! ```
//! for dictionaries,
//! ```csv
//! Id,Expected
//! МАЛИТВЫ,МОЛИТВЫ
//! ```
//! for training pairs, and any file whose first column holds the query for
//! batch input. Predictions are written as `Id,Predicted`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::{Result, SpellError};
use crate::spelling::corrector::CorrectionResult;
use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::error_model::Correction;

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

fn field<'r>(record: &'r StringRecord, index: usize, line: u64) -> Result<&'r str> {
    record
        .get(index)
        .ok_or_else(|| SpellError::other(format!("line {line}: missing column {}", index + 1)))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

/// Read `Id,Freq` rows into a dictionary.
pub fn read_dictionary<R: Read>(input: R) -> Result<SpellingDictionary> {
    let mut dictionary = SpellingDictionary::new();
    for record in reader(input).records() {
        let record = record?;
        let line = line_of(&record);
        let word = field(&record, 0, line)?;
        let frequency = field(&record, 1, line)?;
        let frequency: f64 = frequency.parse().map_err(|_| {
            SpellError::dictionary(format!(
                "line {line}: invalid frequency '{frequency}' for '{word}'"
            ))
        })?;
        dictionary.add_word(word, frequency);
    }
    Ok(dictionary)
}

pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<SpellingDictionary> {
    let dictionary = read_dictionary(File::open(path.as_ref())?)?;
    log::info!(
        "loaded {} dictionary words from {}",
        dictionary.word_count(),
        path.as_ref().display()
    );
    Ok(dictionary)
}

/// Read `Id,Expected` rows. Each pair is weighted by the dictionary
/// frequency of the misspelling, or 1 when it is not in the dictionary.
pub fn read_corrections<R: Read>(
    input: R,
    dictionary: &SpellingDictionary,
) -> Result<Vec<Correction>> {
    let mut corrections = Vec::new();
    for record in reader(input).records() {
        let record = record?;
        let line = line_of(&record);
        let source = field(&record, 0, line)?;
        let target = field(&record, 1, line)?;
        let weight = if dictionary.contains(source) {
            dictionary.frequency(source)
        } else {
            1.0
        };
        corrections.push(Correction::new(source, target, weight));
    }
    Ok(corrections)
}

pub fn load_corrections<P: AsRef<Path>>(
    path: P,
    dictionary: &SpellingDictionary,
) -> Result<Vec<Correction>> {
    let corrections = read_corrections(File::open(path.as_ref())?, dictionary)?;
    log::info!(
        "loaded {} training pairs from {}",
        corrections.len(),
        path.as_ref().display()
    );
    Ok(corrections)
}

/// Read the first column of every row.
pub fn read_queries<R: Read>(input: R) -> Result<Vec<String>> {
    let mut queries = Vec::new();
    for record in reader(input).records() {
        let record = record?;
        let line = line_of(&record);
        queries.push(field(&record, 0, line)?.to_string());
    }
    Ok(queries)
}

pub fn load_queries<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    read_queries(File::open(path)?)
}

/// Write `Id,Predicted` rows.
pub fn write_predictions_to<W: Write>(output: W, results: &[CorrectionResult]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(output);
    writer.write_record(["Id", "Predicted"])?;
    for result in results {
        writer.write_record([result.original.as_str(), result.corrected.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_predictions<P: AsRef<Path>>(path: P, results: &[CorrectionResult]) -> Result<()> {
    write_predictions_to(File::create(path)?, results)
}
