use criterion::{black_box, criterion_group, criterion_main, Criterion};
use postag_core::crf::{CrfConfig, CrfTrainer};
use postag_core::features::{FeatureExtractor, LatinFeatureExtractor};

fn words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn bench_feature_extraction(c: &mut Criterion) {
    let extractor = LatinFeatureExtractor::new().unwrap();

    let sentences = vec![
        words("The quick brown fox jumps over the lazy dog ."),
        words("El Gobierno aprobó ayer el real decreto-ley de 2019 ."),
        words("State-of-the-art taggers reach 97 % accuracy on WSJ text ."),
    ];

    c.bench_function("latin_features_sentence", |b| {
        b.iter(|| extractor.sentence_features(black_box(&sentences[0])));
    });

    c.bench_function("latin_features_batch_3", |b| {
        b.iter(|| {
            for sentence in &sentences {
                let _ = extractor.sentence_features(black_box(sentence));
            }
        });
    });
}

fn bench_crf_tagging(c: &mut Criterion) {
    let extractor = LatinFeatureExtractor::new().unwrap();
    let sentences = [
        ("The dog runs .", "DET NOUN VERB PUNCT"),
        ("A cat sleeps .", "DET NOUN VERB PUNCT"),
        ("The old cat runs fast .", "DET ADJ NOUN VERB ADV PUNCT"),
    ];
    let x: Vec<_> = sentences
        .iter()
        .map(|(s, _)| extractor.sentence_features(&words(s)))
        .collect();
    let y: Vec<_> = sentences.iter().map(|(_, t)| words(t)).collect();
    let model = CrfTrainer::new(CrfConfig::default().with_max_iterations(20))
        .fit(&x, &y)
        .unwrap();

    let sentence = extractor.sentence_features(&words("The quick brown fox jumps over the lazy dog ."));
    c.bench_function("crf_tag_sentence", |b| {
        b.iter(|| model.predict_single(black_box(&sentence)).unwrap());
    });
}

criterion_group!(benches, bench_feature_extraction, bench_crf_tagging);
criterion_main!(benches);
