use criterion::{Criterion, black_box, criterion_group, criterion_main};
use spelltrie::spelling::alphabet::{Alphabet, with_bounds};
use spelltrie::spelling::{
    BeamSearch, Correction, SpellConfig, SpellingCorrector, SpellingDictionary, align,
};

const SYLLABLES: [&str; 12] = [
    "KA", "RO", "MI", "TE", "LU", "SA", "NO", "VE", "DI", "PA", "GO", "RE",
];

fn generate_words(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let mut word = String::new();
            let mut n = i + 1;
            while n > 0 || word.len() < 6 {
                word.push_str(SYLLABLES[n % SYLLABLES.len()]);
                n /= SYLLABLES.len();
            }
            word
        })
        .collect()
}

fn misspell(word: &str, seed: usize) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    let i = 1 + seed % (chars.len() - 2);
    chars[i] = if chars[i] == 'O' { 'A' } else { 'O' };
    chars.into_iter().collect()
}

fn build_corrector(words: &[String]) -> SpellingCorrector {
    let dictionary: SpellingDictionary = words
        .iter()
        .enumerate()
        .map(|(i, w)| (w.clone(), (words.len() - i) as f64))
        .collect();
    let training: Vec<Correction> = words
        .iter()
        .step_by(7)
        .enumerate()
        .map(|(i, w)| Correction::new(misspell(w, i), w.clone(), 1.0))
        .collect();

    let mut config = SpellConfig::default();
    config.corrector.alphabet = Alphabet::latin_uppercase();
    SpellingCorrector::build(&dictionary, &training, config).unwrap()
}

fn bench_alignment(c: &mut Criterion) {
    let words = generate_words(100);
    let pairs: Vec<(String, String)> = words
        .iter()
        .enumerate()
        .map(|(i, w)| (with_bounds(&misspell(w, i)), with_bounds(w)))
        .collect();

    c.bench_function("align_100_pairs", |b| {
        b.iter(|| {
            for (source, target) in &pairs {
                let _ = black_box(align(black_box(source), black_box(target)));
            }
        })
    });
}

fn bench_correction(c: &mut Criterion) {
    let words = generate_words(2000);
    let corrector = build_corrector(&words);
    let queries: Vec<String> = words
        .iter()
        .skip(3)
        .step_by(20)
        .enumerate()
        .map(|(i, w)| misspell(w, i + 1))
        .collect();

    let mut group = c.benchmark_group("correction");

    group.bench_function("beam_search", |b| {
        let search = BeamSearch::new(
            corrector.trie(),
            corrector.model(),
            &corrector.config().search,
        );
        b.iter(|| {
            for query in &queries {
                let _ = black_box(search.candidates(black_box(&with_bounds(query)), 10));
            }
        })
    });

    group.bench_function("correct_sequential", |b| {
        b.iter(|| {
            for query in &queries {
                let _ = black_box(corrector.fix(black_box(query)));
            }
        })
    });

    group.bench_function("correct_batch", |b| {
        b.iter(|| black_box(corrector.correct_batch(black_box(&queries))))
    });

    group.finish();
}

criterion_group!(benches, bench_alignment, bench_correction);
criterion_main!(benches);
