//! # Node Arena
//!
//! Index-addressed storage for tree nodes.
//!
//! Every node of a [`Set`](crate::Set) lives in one slot of an [`Arena`],
//! and all structural links between nodes (parent back-references, child
//! lists, the cached maximum-leaf reference) are [`NodeId`] indices into
//! that arena rather than pointers. The arena is the single owner of all
//! node memory:
//!
//! - allocating a node hands out a `NodeId`;
//! - freeing a node returns its slot to a free list for reuse;
//! - dropping the arena drops every remaining node, so whole-tree teardown
//!   is just dropping the `Set`.
//!
//! Because links are plain indices, a reference held past the node's
//! removal can never dangle in the pointer sense; at worst it names a
//! vacant (or recycled) slot, which [`Arena::get`] surfaces as `None`
//! instead of undefined behavior.

use std::fmt;

/// An index naming one node slot in an [`Arena`].
///
/// `NodeId`s are plain values; they confer no ownership and are only
/// meaningful to the arena that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl fmt::Debug for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "n{}", self.0)
	}
}

/// One storage slot: either a live node or a vacant entry awaiting reuse.
#[derive(Clone)]
enum Slot<T> {
	Occupied(T),
	Vacant,
}

/// A growable slab of node slots with a free list.
///
/// Slots freed by erase/merge operations are recycled before the backing
/// vector grows, so a long-lived set that churns does not grow its
/// footprint unboundedly.
#[derive(Clone)]
pub(crate) struct Arena<T> {
	slots: Vec<Slot<T>>,
	free: Vec<u32>,
}

impl<T> Arena<T> {
	pub(crate) fn new() -> Self {
		Arena {
			slots: Vec::new(),
			free: Vec::new(),
		}
	}

	/// Number of live (occupied) slots.
	pub(crate) fn live(&self) -> usize {
		self.slots.len() - self.free.len()
	}

	/// Stores `value` in a fresh or recycled slot and returns its id.
	pub(crate) fn alloc(&mut self, value: T) -> NodeId {
		match self.free.pop() {
			Some(index) => {
				self.slots[index as usize] = Slot::Occupied(value);
				NodeId(index)
			}
			None => {
				let index = u32::try_from(self.slots.len()).expect("arena exceeded u32 slots");
				self.slots.push(Slot::Occupied(value));
				NodeId(index)
			}
		}
	}

	/// Vacates the slot named by `id` and returns the node it held.
	///
	/// Panics if the slot is already vacant; freeing the same id twice is
	/// a bug in the tree logic, never a caller-visible state.
	pub(crate) fn free(&mut self, id: NodeId) -> T {
		let slot = std::mem::replace(&mut self.slots[id.0 as usize], Slot::Vacant);
		match slot {
			Slot::Occupied(value) => {
				self.free.push(id.0);
				value
			}
			Slot::Vacant => panic!("freed vacant arena slot {id:?}"),
		}
	}

	/// Borrow the node at `id`, or `None` if the slot is vacant or out of
	/// range. Cursor validation paths use this to turn dangling ids into
	/// reportable errors instead of panics.
	pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
		match self.slots.get(id.0 as usize) {
			Some(Slot::Occupied(value)) => Some(value),
			_ => None,
		}
	}

	/// Drops every node and recycles all slots.
	pub(crate) fn clear(&mut self) {
		self.slots.clear();
		self.free.clear();
	}
}

impl<T> std::ops::Index<NodeId> for Arena<T> {
	type Output = T;

	fn index(&self, id: NodeId) -> &T {
		match &self.slots[id.0 as usize] {
			Slot::Occupied(value) => value,
			Slot::Vacant => panic!("indexed vacant arena slot {id:?}"),
		}
	}
}

impl<T> std::ops::IndexMut<NodeId> for Arena<T> {
	fn index_mut(&mut self, id: NodeId) -> &mut T {
		match &mut self.slots[id.0 as usize] {
			Slot::Occupied(value) => value,
			Slot::Vacant => panic!("indexed vacant arena slot {id:?}"),
		}
	}
}
