//! Criterion benchmarks comparing the leafset `Set` against the standard
//! library collections.
//!
//! This benchmark suite compares:
//! - `leafset::Set` - ordered set on an order-4 leaf tree
//! - `std::collections::BTreeSet` - standard library B-tree set
//! - `std::collections::HashSet` - standard library hash set (unordered
//!   baseline for point operations)
//!
//! Ordered iteration is only meaningful for the two tree-backed sets.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use leafset::Set;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::hint::black_box;

const SEED: u64 = 42;
const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

// ============================================================================
// Helper Functions
// ============================================================================

/// Generate sequential keys from 0 to count-1.
fn sequential_keys(count: usize) -> Vec<i64> {
	(0..count as i64).collect()
}

/// Generate random keys using a seeded RNG.
fn random_keys(count: usize) -> Vec<i64> {
	let mut rng = StdRng::seed_from_u64(SEED);
	(0..count).map(|_| rng.random()).collect()
}

/// Generate keys guaranteed absent from a sequential 0..count key set.
fn missing_keys(count: usize) -> Vec<i64> {
	(0..count as i64).map(|i| -(i + 1)).collect()
}

// ============================================================================
// Insert Benchmarks
// ============================================================================

fn bench_insert_sequential(c: &mut Criterion) {
	let mut group = c.benchmark_group("insert_sequential");
	for size in SIZES {
		let keys = sequential_keys(size);
		group.throughput(Throughput::Elements(size as u64));

		group.bench_with_input(BenchmarkId::new("leafset", size), &keys, |b, keys| {
			b.iter(|| {
				let mut set = Set::new();
				for &k in keys {
					set.insert(black_box(k));
				}
				set
			})
		});

		group.bench_with_input(BenchmarkId::new("btreeset", size), &keys, |b, keys| {
			b.iter(|| {
				let mut set = BTreeSet::new();
				for &k in keys {
					set.insert(black_box(k));
				}
				set
			})
		});

		group.bench_with_input(BenchmarkId::new("hashset", size), &keys, |b, keys| {
			b.iter(|| {
				let mut set = HashSet::new();
				for &k in keys {
					set.insert(black_box(k));
				}
				set
			})
		});
	}
	group.finish();
}

fn bench_insert_random(c: &mut Criterion) {
	let mut group = c.benchmark_group("insert_random");
	for size in SIZES {
		let keys = random_keys(size);
		group.throughput(Throughput::Elements(size as u64));

		group.bench_with_input(BenchmarkId::new("leafset", size), &keys, |b, keys| {
			b.iter(|| {
				let mut set = Set::new();
				for &k in keys {
					set.insert(black_box(k));
				}
				set
			})
		});

		group.bench_with_input(BenchmarkId::new("btreeset", size), &keys, |b, keys| {
			b.iter(|| {
				let mut set = BTreeSet::new();
				for &k in keys {
					set.insert(black_box(k));
				}
				set
			})
		});
	}
	group.finish();
}

// ============================================================================
// Lookup Benchmarks
// ============================================================================

fn bench_lookup(c: &mut Criterion) {
	let mut group = c.benchmark_group("lookup_hit");
	for size in SIZES {
		let keys = sequential_keys(size);
		group.throughput(Throughput::Elements(size as u64));

		let set: Set<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("leafset", size), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(set.contains(black_box(k)));
				}
			})
		});

		let btree: BTreeSet<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("btreeset", size), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(btree.contains(black_box(k)));
				}
			})
		});

		let hash: HashSet<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("hashset", size), &keys, |b, keys| {
			b.iter(|| {
				for k in keys {
					black_box(hash.contains(black_box(k)));
				}
			})
		});
	}
	group.finish();
}

fn bench_lookup_miss(c: &mut Criterion) {
	let mut group = c.benchmark_group("lookup_miss");
	for size in SIZES {
		let keys = sequential_keys(size);
		let probes = missing_keys(size);
		group.throughput(Throughput::Elements(size as u64));

		let set: Set<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("leafset", size), &probes, |b, probes| {
			b.iter(|| {
				for k in probes {
					black_box(set.contains(black_box(k)));
				}
			})
		});

		let btree: BTreeSet<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("btreeset", size), &probes, |b, probes| {
			b.iter(|| {
				for k in probes {
					black_box(btree.contains(black_box(k)));
				}
			})
		});
	}
	group.finish();
}

// ============================================================================
// Remove Benchmarks
// ============================================================================

fn bench_remove(c: &mut Criterion) {
	let mut group = c.benchmark_group("remove_all");
	for size in SIZES {
		let keys = random_keys(size);
		group.throughput(Throughput::Elements(size as u64));

		let full: Set<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("leafset", size), &keys, |b, keys| {
			b.iter_batched(
				|| full.clone(),
				|mut set| {
					for k in keys {
						set.remove(black_box(k));
					}
					set
				},
				BatchSize::LargeInput,
			)
		});

		let full: BTreeSet<i64> = keys.iter().copied().collect();
		group.bench_with_input(BenchmarkId::new("btreeset", size), &keys, |b, keys| {
			b.iter_batched(
				|| full.clone(),
				|mut set| {
					for k in keys {
						set.remove(black_box(k));
					}
					set
				},
				BatchSize::LargeInput,
			)
		});
	}
	group.finish();
}

// ============================================================================
// Iteration Benchmarks
// ============================================================================

fn bench_iterate(c: &mut Criterion) {
	let mut group = c.benchmark_group("iterate_in_order");
	for size in SIZES {
		let keys = random_keys(size);
		group.throughput(Throughput::Elements(size as u64));

		let set: Set<i64> = keys.iter().copied().collect();
		group.bench_function(BenchmarkId::new("leafset", size), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for &k in set.iter() {
					sum = sum.wrapping_add(k);
				}
				black_box(sum)
			})
		});

		let btree: BTreeSet<i64> = keys.iter().copied().collect();
		group.bench_function(BenchmarkId::new("btreeset", size), |b| {
			b.iter(|| {
				let mut sum = 0i64;
				for &k in btree.iter() {
					sum = sum.wrapping_add(k);
				}
				black_box(sum)
			})
		});
	}
	group.finish();
}

criterion_group!(
	benches,
	bench_insert_sequential,
	bench_insert_random,
	bench_lookup,
	bench_lookup_miss,
	bench_remove,
	bench_iterate
);
criterion_main!(benches);
