//! # Merkle Rewards Benchmarks
//!
//! | Subsystem | Operation | Target |
//! |-----------|-----------|--------|
//! | rw-03 Reward Tree | build tree, 5k operators | < 50ms |
//! | rw-03 Reward Tree | verify one proof | < 10µs |
//! | rw-03 Reward Tree | content identifier, 1 MiB artifact | < 100ms |

use std::collections::BTreeMap;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rw_03_reward_tree::config::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS};
use rw_03_reward_tree::{
    build_tree, compute_content_identifier, leaf_hash, verify_proof, NodeRewardInfo,
    UnixFsAddresser, ZstdCompressor,
};
use shared_types::{Address, U256};

fn operators(count: u32) -> BTreeMap<Address, NodeRewardInfo> {
    (0..count)
        .map(|i| {
            let mut raw = [0u8; 20];
            raw[16..].copy_from_slice(&i.to_be_bytes());
            let n = i as u64 + 1;
            (
                Address(raw),
                NodeRewardInfo::new(U256::from(n * 31), U256::from(n % 3), U256::from(n * 17)),
            )
        })
        .collect()
}

fn bench_tree_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("rw-03-tree-construction");
    group.measurement_time(Duration::from_secs(10));

    for size in [100u32, 1_000, 5_000] {
        let nodes = operators(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("build_tree", size), &nodes, |b, nodes| {
            b.iter(|| black_box(build_tree(nodes)))
        });
    }

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("rw-03-proof-verification");

    let nodes = operators(5_000);
    let tree = build_tree(&nodes);
    let (address, info) = nodes.iter().nth(2_500).map(|(a, i)| (*a, i.clone())).unwrap_or_default();
    let leaf = leaf_hash(&address, &info);
    let proof = tree.proofs.get(&address).cloned().unwrap_or_default();

    group.bench_function("verify_proof", |b| {
        b.iter(|| black_box(verify_proof(&leaf, &proof, &tree.root)))
    });

    group.finish();
}

fn bench_content_identifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("rw-03-content-identifier");
    group.sample_size(20);

    let compressor = ZstdCompressor::new(3);
    let addresser = UnixFsAddresser::new(DEFAULT_CHUNK_SIZE, DEFAULT_MAX_LINKS);
    for size in [64 * 1024usize, 1024 * 1024] {
        let artifact: Vec<u8> = (0..size).map(|i| b"0123456789abcdef\"{},:"[i % 21]).collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("compress_and_address", size),
            &artifact,
            |b, data| {
                b.iter(|| black_box(compute_content_identifier(data, &compressor, &addresser)))
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tree_construction,
    bench_proof_verification,
    bench_content_identifier,
);

criterion_main!(benches);
