//! Benchmarks for signed-URL verification
//!
//! This benchmark measures:
//! - Query string parsing into the canonical parameter set
//! - Canonical message construction
//! - HMAC-SHA256 verification for short and long texts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use webtts::signing::{QueryParams, SignatureVerifier};

fn sample_params(text_len: usize) -> QueryParams {
    let text: String = "lorem ipsum dolor sit amet ".chars().cycle().take(text_len).collect();
    QueryParams::from_pairs([
        ("text", text),
        ("lang", "en-US".to_string()),
        ("voice", "en-US-Wavenet-D".to_string()),
        ("provider", "google".to_string()),
        ("valid-to", "2030-01-01T00:00:00Z".to_string()),
    ])
}

fn bench_parse(c: &mut Criterion) {
    let verifier = SignatureVerifier::new("benchmark-secret").unwrap();
    let query = verifier.signed_query(&sample_params(200));

    let mut group = c.benchmark_group("query_parsing");
    group.throughput(Throughput::Bytes(query.len() as u64));
    group.bench_function("parse", |b| b.iter(|| QueryParams::parse(black_box(&query))));
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let verifier = SignatureVerifier::new("benchmark-secret").unwrap();

    let mut group = c.benchmark_group("signature_verification");
    for text_len in [32usize, 1_000, 5_000] {
        let params = sample_params(text_len);
        let signature = verifier.sign(&params);
        group.throughput(Throughput::Bytes(text_len as u64));
        group.bench_with_input(
            BenchmarkId::new("canonical_message", text_len),
            &params,
            |b, params| b.iter(|| SignatureVerifier::canonical_message(black_box(params))),
        );
        group.bench_with_input(
            BenchmarkId::new("verify", text_len),
            &(params, signature),
            |b, (params, signature)| {
                b.iter(|| verifier.verify(black_box(params), black_box(signature)).unwrap())
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_verify);
criterion_main!(benches);
