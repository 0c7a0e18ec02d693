#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names,
    clippy::pedantic
)]
use std::collections::HashMap;

use chainmap::ChainedMap;
use criterion::{Criterion, criterion_group, criterion_main};
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const SAMPLE_SIZE: usize = 10;

fn chained_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items =
        any::<[(u64, String); ITEMS_AMOUNT]>().new_tree(&mut runner).unwrap().current();

    let mut group = c.benchmark_group("Separate chaining vs std hash map");
    group.sample_size(SAMPLE_SIZE);

    let mut chained = ChainedMap::with_buckets(2048);
    let mut std_map = HashMap::new();

    group.bench_function("chainmap insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                chained.insert(key, value);
            }
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            for (key, value) in items.clone() {
                std_map.insert(key, value);
            }
        });
    });
    group.bench_function("chainmap get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = chained.get(key);
            }
        });
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| {
            for (key, _) in &items {
                let _ = std_map.get(key);
            }
        });
    });
    group.bench_function("chainmap rehash", |b| {
        b.iter(|| {
            chained.rehash(4096).unwrap();
            chained.rehash(2048).unwrap();
        });
    });
    group.finish();
}

criterion_group!(benches, chained_map_benches);

criterion_main!(benches);
