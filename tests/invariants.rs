//! # Invariant Testing for the Leafset Ordered Set
//!
//! This suite validates the structural invariants of the tree across the
//! transitions that exercise the rebalancing primitives:
//!
//! - Root transitions (lone leaf <-> internal root) in both directions
//! - Split cascades under sequential, reverse and random insertion
//! - Merge cascades while draining the set
//! - Height bounds implied by the 2..=4 branching factor
//! - Node accounting (no orphan arena slots after churn)
//!
//! `Set::assert_invariants` checks child counts, child ordering, cached
//! subtree maxima, parent links, uniform leaf depth and arena occupancy.

use leafset::Set;
use rand::prelude::*;

// ===========================================================================
// Root Transition Tests
// ===========================================================================

/// The root changes shape at the smallest sizes: empty, lone leaf,
/// internal node over two leaves, and back down.
#[test]
fn root_transitions_up_and_down() {
	let mut set: Set<i32> = Set::new();
	set.assert_invariants();
	assert_eq!(set.height(), 0);

	set.insert(10);
	set.assert_invariants();
	assert_eq!(set.height(), 1, "a lone leaf is a valid root");

	set.insert(20);
	set.assert_invariants();
	assert_eq!(set.height(), 2, "second key grows an internal root");

	set.remove(&10);
	set.assert_invariants();
	assert_eq!(set.height(), 1, "root with one child collapses");

	set.remove(&20);
	set.assert_invariants();
	assert_eq!(set.height(), 0);
	assert!(set.is_empty());
}

// ===========================================================================
// Split Cascade Tests
// ===========================================================================

/// Sequential insertion keeps appending at the rightmost leaf, the worst
/// case for repeated splits along one spine.
#[test]
fn sequential_insert_holds_invariants_each_step() {
	let mut set: Set<i32> = Set::new();
	for i in 0..500 {
		set.insert(i);
		set.assert_invariants();
	}
	assert_eq!(set.len(), 500);
}

/// Reverse insertion stresses the symmetric split path.
#[test]
fn reverse_insert_holds_invariants_each_step() {
	let mut set: Set<i32> = Set::new();
	for i in (0..500).rev() {
		set.insert(i);
		set.assert_invariants();
	}
	assert_eq!(set.iter().copied().collect::<Vec<_>>(), (0..500).collect::<Vec<_>>());
}

/// Enough keys to force several levels of cascading splits.
#[test]
fn cascading_splits() {
	let mut set: Set<i32> = Set::new();
	for i in 0..10_000 {
		set.insert(i);
	}
	set.assert_invariants();
	assert!(set.height() >= 7, "expected height >= 7 for 10k keys, got {}", set.height());

	for i in 0..10_000 {
		assert!(set.contains(&i), "key {} lost after splits", i);
	}
}

// ===========================================================================
// Merge Cascade Tests
// ===========================================================================

/// Draining in ascending order repeatedly underflows the leftmost spine.
#[test]
fn ascending_drain_holds_invariants_each_step() {
	let mut set: Set<i32> = (0..300).collect();
	for i in 0..300 {
		assert!(set.remove(&i));
		set.assert_invariants();
	}
	assert!(set.is_empty());
	assert_eq!(set.height(), 0);
}

/// Draining in descending order repeatedly underflows the rightmost
/// spine, which also exercises max-key cache propagation to the root.
#[test]
fn descending_drain_holds_invariants_each_step() {
	let mut set: Set<i32> = (0..300).collect();
	for i in (0..300).rev() {
		assert!(set.remove(&i));
		set.assert_invariants();
		if let Some(&max) = set.last() {
			assert_eq!(max, i - 1, "stale maximum after removing {}", i);
		}
	}
	assert!(set.is_empty());
}

/// A merge can overflow the absorbing sibling, re-triggering a split;
/// removing from the middle of a larger set hits that path.
#[test]
fn merge_then_split_cascades() {
	let mut set: Set<i32> = (0..1000).collect();
	// Remove every third key, scattering underflows across the tree.
	for i in (0..1000).step_by(3) {
		assert!(set.remove(&i));
		set.assert_invariants();
	}
	assert_eq!(set.len(), 1000 - 334);
}

// ===========================================================================
// Height Bound Tests
// ===========================================================================

/// With branching factor in [2, 4], a tree of n keys has height at most
/// log2(n) + 1 and at least log4(n) + 1 (leaves sit one level below an
/// internal path of the measured height).
#[test]
fn height_stays_within_branching_bounds() {
	let mut set: Set<u32> = Set::new();
	for n in [2u32, 16, 100, 1000, 4096, 10_000] {
		while (set.len() as u32) < n {
			set.insert(set.len() as u32);
		}
		let height = set.height() as u32;
		let upper = n.ilog2() + 2;
		let lower = n.ilog(4) + 1;
		assert!(
			height <= upper,
			"height {} exceeds upper bound {} at n={}",
			height,
			upper,
			n
		);
		assert!(
			height >= lower,
			"height {} below lower bound {} at n={}",
			height,
			lower,
			n
		);
	}
}

// ===========================================================================
// Randomized Invariant Tests
// ===========================================================================

/// Random inserts and removes with the invariants checked at every
/// intermediate state.
#[test]
fn random_operations_hold_invariants_each_step() {
	let mut rng = StdRng::seed_from_u64(42);
	let mut set: Set<i32> = Set::new();
	let mut oracle = std::collections::BTreeSet::new();

	for _ in 0..2000 {
		let key = rng.random_range(0..500);
		if rng.random_bool(0.6) {
			assert_eq!(set.insert(key), oracle.insert(key));
		} else {
			assert_eq!(set.remove(&key), oracle.remove(&key));
		}
		set.assert_invariants();
		assert_eq!(set.len(), oracle.len());
	}

	let keys: Vec<i32> = set.iter().copied().collect();
	let expected: Vec<i32> = oracle.iter().copied().collect();
	assert_eq!(keys, expected);
}

/// Insert n random distinct keys, then erase them all in a different
/// random order; every intermediate state must satisfy the invariants
/// and the set must end empty.
#[test]
fn random_fill_then_random_drain() {
	let mut rng = StdRng::seed_from_u64(7);
	let mut keys: Vec<i64> = (0..800).map(|_| rng.random()).collect();
	keys.sort_unstable();
	keys.dedup();

	let mut set: Set<i64> = Set::new();
	let mut order = keys.clone();
	order.shuffle(&mut rng);
	for &key in &order {
		assert!(set.insert(key));
		set.assert_invariants();
	}
	assert_eq!(set.len(), keys.len());

	order.shuffle(&mut rng);
	for &key in &order {
		assert!(set.remove(&key));
		set.assert_invariants();
	}
	assert_eq!(set.len(), 0);
	assert!(set.is_empty());
}

/// Long alternating churn must not strand nodes in the arena; the
/// occupancy check inside `assert_invariants` would catch any orphan.
#[test]
fn no_orphan_nodes_after_churn() {
	let mut rng = StdRng::seed_from_u64(99);
	let mut set: Set<i32> = Set::new();

	for round in 0..50 {
		for _ in 0..40 {
			set.insert(rng.random_range(0..200));
		}
		for _ in 0..40 {
			set.remove(&rng.random_range(0..200));
		}
		set.assert_invariants();
		// Duplicate inserts along the way must not allocate.
		let before = set.len();
		for key in 0..10 {
			if set.contains(&key) {
				set.insert(key);
			}
		}
		assert_eq!(set.len(), before, "duplicate inserts changed size in round {}", round);
		set.assert_invariants();
	}

	set.clear();
	set.assert_invariants();
}
