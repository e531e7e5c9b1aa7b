//! Benchmarks pour le filigranage

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use filigrane_core::cipher::{generate_noise_fragment, AlphabetCipher, AuthenticatedCipher};
use filigrane_core::codec::{decode_fragment, encode_text};
use filigrane_core::watermark::resynchronize;
use filigrane_core::{
    AnnotatedRecord, ExtractRequest, Feature, InsertRequest, Interval, PositionStrategy,
    WatermarkConfig, WatermarkExtractor, WatermarkInserter,
};
use std::time::Duration;

const PAYLOAD: &str = "COPYRIGHT 2024 ACME BIOTECH, ALL RIGHTS RESERVED.";

fn host() -> AnnotatedRecord {
    let sequence: String = "GATTACA".chars().cycle().take(5_000).collect();
    let mut record = AnnotatedRecord::new("BENCH", sequence);
    for i in 0..50 {
        record
            .features
            .push(Feature::new("misc_feature", Interval::new(i * 100, i * 100 + 80).unwrap()));
    }
    record
}

fn benchmark_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("Codec");
    let fragment = encode_text(PAYLOAD).unwrap();

    group.bench_function("encode_text", |b| b.iter(|| encode_text(black_box(PAYLOAD))));
    group.bench_function("decode_fragment", |b| b.iter(|| decode_fragment(black_box(&fragment))));

    group.finish();
}

fn benchmark_insert_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("Watermark");
    let config = WatermarkConfig::fast();
    let inserter = WatermarkInserter::new(config.clone());
    let extractor = WatermarkExtractor::new(config);
    let record = host();
    let request = InsertRequest::plaintext(PAYLOAD, PositionStrategy::BeforeRegion, Interval::new(2_000, 3_000).unwrap());

    group.bench_function("insert_plaintext", |b| {
        b.iter(|| inserter.insert(black_box(&record), black_box(&request)))
    });

    let marked = inserter.insert(&record, &request).unwrap().record;
    group.bench_function("extract_plaintext", |b| {
        b.iter(|| extractor.extract(black_box(&marked), &ExtractRequest::default()))
    });

    group.finish();
}

fn benchmark_resync(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resynchronization");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    let cipher = AuthenticatedCipher::legacy("bench", 16).unwrap();
    let body = encode_text(&cipher.encrypt(PAYLOAD).unwrap()).unwrap();
    let fragment = format!("{}{}{}", generate_noise_fragment(30), body, generate_noise_fragment(30));

    group.bench_function("resynchronize_noise_30", |b| {
        b.iter(|| resynchronize(black_box(&fragment), &cipher))
    });

    group.finish();
}

criterion_group!(benches, benchmark_codec, benchmark_insert_extract, benchmark_resync);
criterion_main!(benches);
