use criterion::{Criterion, criterion_group, criterion_main};
use open_record::{MapCoder, OpenRecord, Value};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// `key_0 => 0` .. `key_100 => 100`, the large creation payload.
fn large_pairs() -> Vec<(String, Value)> {
    (0..=100).map(|i| (format!("key_{i}"), Value::from(i as i64))).collect()
}

/// A record with nested values for the serialization groups.
fn make_profile() -> OpenRecord {
    let settings = OpenRecord::from_pairs([
        ("theme", Value::from("dark")),
        ("notifications", Value::from(true)),
    ]);
    OpenRecord::from_pairs([
        ("id", Value::from("user:abc123")),
        ("name", Value::from("Alice")),
        ("age", Value::from(28i64)),
        ("score", Value::from(99.5f64)),
        ("metadata", Value::Null),
        (
            "tags",
            Value::from(vec![Value::from("developer"), Value::from("rust")]),
        ),
        ("settings", Value::from(settings)),
    ])
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Creation
// ═══════════════════════════════════════════════════════════════════════════

fn bench_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation");

    group.bench_function("creation,   0 fields", |b| b.iter(OpenRecord::new));

    group.bench_function("creation,   1 field ", |b| {
        b.iter(|| OpenRecord::from_pairs(black_box([("k0", 0i64)])))
    });

    group.bench_function("creation,   2 fields", |b| {
        b.iter(|| OpenRecord::from_pairs(black_box([("k0", 0i64), ("k1", 1)])))
    });

    group.bench_function("creation,   3 fields", |b| {
        b.iter(|| OpenRecord::from_pairs(black_box([("k0", 0i64), ("k1", 1), ("k2", 2)])))
    });

    let large = large_pairs();
    group.bench_function("creation, 101 fields", |b| {
        b.iter(|| OpenRecord::from_pairs(black_box(&large).iter().cloned()))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Access
// ═══════════════════════════════════════════════════════════════════════════

fn bench_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("access");

    let record = OpenRecord::from_pairs([("k", 123i64)]);
    let symbol_key = Value::from("k");

    // black_box on BOTH inputs and return values keeps the lookups alive.

    group.bench_function("attribute access", |b| {
        b.iter(|| black_box(record.get(black_box("k"))))
    });

    group.bench_function("key lookup by string", |b| {
        b.iter(|| black_box(&record[black_box("k")]))
    });

    group.bench_function("key lookup by symbol", |b| {
        b.iter(|| black_box(record.try_get(black_box(&symbol_key))))
    });

    group.bench_function("set (existing field)", |b| {
        let mut rec = record.clone();
        b.iter(|| {
            rec.set(black_box("k"), black_box(456i64));
        })
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Serialization
// ═══════════════════════════════════════════════════════════════════════════

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialization");

    let record = make_profile();
    let json = record.to_json().unwrap();
    let cbor = record.to_cbor().unwrap();

    group.bench_function("to_json", |b| b.iter(|| black_box(&record).to_json().unwrap()));

    group.bench_function("from_json", |b| {
        b.iter(|| OpenRecord::from_json(black_box(&json)).unwrap())
    });

    group.bench_function("to_cbor", |b| b.iter(|| black_box(&record).to_cbor().unwrap()));

    group.bench_function("from_cbor", |b| {
        b.iter(|| OpenRecord::from_cbor(black_box(&cbor)).unwrap())
    });

    group.bench_function("encode_with (MapCoder)", |b| {
        b.iter(|| {
            let mut coder = MapCoder::new();
            black_box(&record).encode_with(&mut coder);
            coder
        })
    });

    group.bench_function("inspect", |b| b.iter(|| black_box(&record).inspect()));

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(benches, bench_creation, bench_access, bench_serialization);
criterion_main!(benches);
