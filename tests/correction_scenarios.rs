use spelltrie::error::Result;
use spelltrie::spelling::alphabet::Alphabet;
use spelltrie::spelling::{
    Correction, CorrectionOutcome, SpellConfig, SpellingCorrector, SpellingDictionary,
};

const RARE_WORDS: [&str; 26] = [
    "BICYCLE", "CABINET", "DOLPHIN", "ECLIPSE", "GRAVITY", "HARVEST", "JOURNEY", "KINGDOM",
    "MONSTER", "NOTEBOOK", "OCTOPUS", "PYRAMID", "QUARTET", "RAINBOW", "TEXTBOOK", "UNICORN",
    "VOLCANO", "WHISPER", "XYLOPHONE", "YOGHURT", "ZEPPELIN", "BLANKET", "CRYSTAL", "DIAMOND",
    "EMERALD", "GLACIER",
];

const TRAINING: [(&str, &str); 5] = [
    ("HOVSE", "HOUSE"),
    ("MVSIC", "MUSIC"),
    ("GVITAR", "GUITAR"),
    ("TVLIP", "TULIP"),
    ("BVTTER", "BUTTER"),
];

fn latin_config() -> SpellConfig {
    let mut config = SpellConfig::default();
    config.corrector.alphabet = Alphabet::latin_uppercase();
    config
}

fn dictionary(frequent: &[(&str, f64)]) -> SpellingDictionary {
    let mut dictionary = SpellingDictionary::new();
    for word in RARE_WORDS {
        dictionary.add_word(word, 1.0);
    }
    for (_, target) in TRAINING {
        dictionary.add_word(target, 1.0);
    }
    for (word, frequency) in frequent {
        dictionary.add_word(*word, *frequency);
    }
    dictionary
}

fn training() -> Vec<Correction> {
    TRAINING
        .iter()
        .map(|(source, target)| Correction::new(*source, *target, 1.0))
        .collect()
}

fn language_corrector(config: SpellConfig) -> Result<SpellingCorrector> {
    SpellingCorrector::build(
        &dictionary(&[("LANGUAGE", 1000.0)]),
        &training(),
        config,
    )
}

#[test]
fn training_lookup_returns_recorded_correction() -> Result<()> {
    let mut dictionary = SpellingDictionary::new();
    dictionary.add_word("XYZ", 5.0);
    let training = vec![Correction::new("XZY", "XYZ", 1.0)];

    let corrector = SpellingCorrector::build(&dictionary, &training, SpellConfig::default())?;
    assert_eq!(corrector.fix("XZY"), "XYZ");
    assert_eq!(
        corrector.correct("XZY").outcome,
        CorrectionOutcome::TrainingLookup
    );
    assert_eq!(corrector.fix("XYZ"), "XYZ");
    Ok(())
}

#[test]
fn beam_search_repairs_learned_substitution() -> Result<()> {
    let corrector = language_corrector(latin_config())?;

    let result = corrector.correct("LANGVAGE");
    assert_eq!(result.corrected, "LANGUAGE");
    assert_eq!(result.outcome, CorrectionOutcome::BeamSearch);
    assert!(result.score.is_some_and(f64::is_finite));
    Ok(())
}

#[test]
fn known_and_short_words_are_left_alone() -> Result<()> {
    let corrector = language_corrector(latin_config())?;

    let result = corrector.correct("LANGUAGE");
    assert_eq!(result.outcome, CorrectionOutcome::KnownWord);
    assert!(!result.is_changed());

    assert_eq!(corrector.correct("HOVS").outcome, CorrectionOutcome::TooShort);
    assert_eq!(corrector.fix("12345"), "12345");
    assert_eq!(corrector.fix("LANGVAGЕ"), "LANGVAGЕ");
    Ok(())
}

#[test]
fn rare_candidates_are_rejected() -> Result<()> {
    let corrector = language_corrector(latin_config())?;

    // MUSIC is reachable but its prior is far below the acceptance bar.
    let result = corrector.correct("MUSIK");
    assert_eq!(result.outcome, CorrectionOutcome::NoCandidate);
    assert_eq!(result.corrected, "MUSIK");
    Ok(())
}

#[test]
fn correction_is_deterministic() -> Result<()> {
    let corrector = language_corrector(latin_config())?;
    let queries = ["LANGVAGE", "MUSIK", "LANGUAGE", "HOVSE", "LANGUAGF"];

    let first: Vec<String> = queries.iter().map(|q| corrector.fix(q)).collect();
    for _ in 0..3 {
        let again: Vec<String> = queries.iter().map(|q| corrector.fix(q)).collect();
        assert_eq!(first, again);
    }

    let batch = corrector.correct_batch(&queries);
    let batch: Vec<String> = batch.into_iter().map(|r| r.corrected).collect();
    assert_eq!(first, batch);
    Ok(())
}

#[test]
fn threshold_scales_with_ratio() -> Result<()> {
    let mut config = latin_config();
    config.corrector.threshold_ratio = 2.0;
    let half = language_corrector(config)?;

    let mut config = latin_config();
    config.corrector.threshold_ratio = 4.0;
    let full = language_corrector(config)?;

    assert!((full.average_training_score() - half.average_training_score()).abs() < 1e-9);
    assert!((full.threshold() - 2.0 * half.threshold()).abs() < 1e-9);
    if half.average_training_score() > 0.0 {
        assert!(full.threshold() > half.threshold());
    }
    Ok(())
}

#[test]
fn parallel_training_matches_sequential() -> Result<()> {
    let sequential = language_corrector(latin_config())?;

    let mut config = latin_config();
    config.corrector.parallel_training = true;
    let parallel = language_corrector(config)?;

    let a = sequential.stats();
    let b = parallel.stats();
    for level in 0..3 {
        assert!((a.edit_totals[level] - b.edit_totals[level]).abs() < 1e-9);
    }
    assert_eq!(a.endings, b.endings);
    assert!((a.threshold - b.threshold).abs() < 1e-6);
    assert_eq!(parallel.fix("LANGVAGE"), "LANGUAGE");
    Ok(())
}

#[test]
fn ending_table_stays_capped() -> Result<()> {
    let mut training = training();
    for word in RARE_WORDS {
        training.push(Correction::new(word, word, 1.0));
    }
    let corrector = SpellingCorrector::build(
        &dictionary(&[("LANGUAGE", 1000.0)]),
        &training,
        latin_config(),
    )?;

    let endings = corrector.model().endings();
    assert_eq!(endings.len(), 20);
    assert!(endings.contains(""));
    assert_eq!(corrector.stats().endings, 20);
    Ok(())
}

#[test]
fn glued_words_are_split_in_precision_mode() -> Result<()> {
    let frequent = [("SUN", 1000.0), ("FLOWER", 1000.0), ("SUNAFLOWER", 1000.0)];

    let mut config = latin_config();
    // Leave the search no room so only the split heuristic can help.
    config.search.queue_limit = 1;
    let baseline = SpellingCorrector::build(&dictionary(&frequent), &training(), config.clone())?;
    assert_eq!(
        baseline.correct("SUNAFLOWEP").outcome,
        CorrectionOutcome::NoCandidate
    );

    // A lenient threshold lets every half-word correction through.
    config.corrector.precision_mode = true;
    config.corrector.threshold_ratio = -1e9 * baseline.average_training_score().signum();
    let corrector = SpellingCorrector::build(&dictionary(&frequent), &training(), config)?;
    assert!(corrector.threshold() < -1e6);

    let result = corrector.correct("SUNAFLOWEP");
    assert_eq!(result.outcome, CorrectionOutcome::SplitWord);
    assert_eq!(result.corrected, "SUNAFLOWER");
    Ok(())
}
