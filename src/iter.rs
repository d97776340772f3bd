//! Cursors and iterators for the [`Set`] data structure.
//!
//! Two traversal surfaces exist, with different invalidation stories:
//!
//! - [`Cursor`]: a detached, copyable token holding a position, the
//!   version of the set it was issued under, and the issuing set's
//!   identity. Every access re-validates both and fails with
//!   [`Error::StaleCursor`] once the set has been structurally mutated.
//!   This is the dynamic, whole-structure invalidation contract.
//! - [`Iter`] / [`IntoIter`]: ordinary Rust iterators. `Iter` borrows the
//!   set, so staleness is impossible by construction; `IntoIter` consumes
//!   it.

use crate::arena::{Arena, NodeId};
use crate::error::{Error, Result};
use crate::{Node, NodeKind, Set};

use std::fmt;
use std::iter::FusedIterator;

/// A cursor position: a specific leaf, or the distinguished end position
/// one past the largest key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pos {
	Leaf(NodeId),
	End,
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A versioned position within a [`Set`].
///
/// Cursors are cheap `Copy` tokens. They hold no borrow, so the set can
/// be mutated while cursors are outstanding; doing so permanently
/// invalidates them, and the next access reports
/// [`Error::StaleCursor`](crate::Error::StaleCursor).
///
/// Stepping is bidirectional with deliberate wrap-around edges:
/// `next` at the end position stays at end, `prev` at the first key
/// yields the end position, and `prev` at end yields the largest key.
///
/// # Example
///
/// ```
/// use leafset::Set;
///
/// let set = Set::from([2, 1, 3]);
/// let mut cur = set.begin();
/// let mut keys = Vec::new();
/// while let Some(&key) = cur.key(&set)? {
/// 	keys.push(key);
/// 	cur = cur.next(&set)?;
/// }
/// assert_eq!(keys, [1, 2, 3]);
/// # Ok::<(), leafset::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
	/// Identity of the issuing set.
	set: u64,
	/// Set version captured at creation.
	version: u64,
	pos: Pos,
}

impl Cursor {
	pub(crate) fn new(set: u64, version: u64, pos: Pos) -> Cursor {
		Cursor {
			set,
			version,
			pos,
		}
	}

	/// Validates that this cursor was issued by `set` and that no
	/// structural mutation happened since.
	fn check<T>(&self, set: &Set<T>) -> Result<()> {
		if self.set != set.id {
			return Err(Error::ForeignCursor);
		}
		if self.version != set.version {
			return Err(Error::StaleCursor {
				captured: self.version,
				current: set.version,
			});
		}
		Ok(())
	}

	/// The position must still name a live leaf; anything else means the
	/// tree was restructured without a version bump, which the invariants
	/// rule out.
	fn expect_leaf<T>(&self, set: &Set<T>, id: NodeId) -> Result<()> {
		match set.arena.get(id) {
			Some(node) if matches!(node.kind, NodeKind::Leaf(_)) => Ok(()),
			_ => Err(Error::Corrupted("cursor position is not a live leaf")),
		}
	}

	/// The key under the cursor, or `Ok(None)` at the end position.
	pub fn key<'s, T>(&self, set: &'s Set<T>) -> Result<Option<&'s T>> {
		self.check(set)?;
		match self.pos {
			Pos::End => Ok(None),
			Pos::Leaf(id) => match set.arena.get(id).map(|node| &node.kind) {
				Some(NodeKind::Leaf(key)) => Ok(Some(key)),
				_ => Err(Error::Corrupted("cursor position is not a live leaf")),
			},
		}
	}

	/// Whether the cursor sits at the end position.
	pub fn is_end<T>(&self, set: &Set<T>) -> Result<bool> {
		self.check(set)?;
		Ok(self.pos == Pos::End)
	}

	/// The cursor one key forward. At the end position, stays at end.
	pub fn next<T>(&self, set: &Set<T>) -> Result<Cursor> {
		self.check(set)?;
		let pos = match self.pos {
			Pos::End => Pos::End,
			Pos::Leaf(id) => {
				self.expect_leaf(set, id)?;
				match set.successor(id) {
					Some(next) => Pos::Leaf(next),
					None => Pos::End,
				}
			}
		};
		Ok(Cursor {
			pos,
			..*self
		})
	}

	/// The cursor one key backward.
	///
	/// At the end position this yields the largest key (or stays at end
	/// for an empty set); at the first key it wraps to the end position.
	pub fn prev<T>(&self, set: &Set<T>) -> Result<Cursor> {
		self.check(set)?;
		let pos = match self.pos {
			Pos::End => match set.root {
				Some(root) => Pos::Leaf(set.last_leaf(root)),
				None => Pos::End,
			},
			Pos::Leaf(id) => {
				self.expect_leaf(set, id)?;
				match set.predecessor(id) {
					Some(prev) => Pos::Leaf(prev),
					None => Pos::End,
				}
			}
		};
		Ok(Cursor {
			pos,
			..*self
		})
	}
}

// ---------------------------------------------------------------------------
// Borrowing Iterator
// ---------------------------------------------------------------------------

/// A double-ended iterator over the keys of a [`Set`] in ascending
/// order.
///
/// Created by [`Set::iter`]. The shared borrow it holds makes mutation,
/// and therefore staleness, impossible for its lifetime.
pub struct Iter<'a, T> {
	set: &'a Set<T>,
	/// Next leaf to yield from the front; `None` once exhausted or empty.
	front: Option<NodeId>,
	/// Next leaf to yield from the back.
	back: Option<NodeId>,
	/// Keys not yet yielded from either end; guards front/back crossing.
	remaining: usize,
}

impl<T> Clone for Iter<'_, T> {
	fn clone(&self) -> Self {
		Iter {
			set: self.set,
			front: self.front,
			back: self.back,
			remaining: self.remaining,
		}
	}
}

impl<'a, T> Iter<'a, T> {
	pub(crate) fn new(set: &'a Set<T>) -> Iter<'a, T> {
		Iter {
			set,
			front: set.root.map(|root| set.first_leaf(root)),
			back: set.root.map(|root| set.last_leaf(root)),
			remaining: set.len,
		}
	}
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		if self.remaining == 0 {
			return None;
		}
		let id = self.front.expect("iterator count out of sync with positions");
		self.remaining -= 1;
		self.front = self.set.successor(id);
		Some(self.set.leaf_key(id))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
	fn next_back(&mut self) -> Option<&'a T> {
		if self.remaining == 0 {
			return None;
		}
		let id = self.back.expect("iterator count out of sync with positions");
		self.remaining -= 1;
		self.back = self.set.predecessor(id);
		Some(self.set.leaf_key(id))
	}
}

impl<T> ExactSizeIterator for Iter<'_, T> {
	fn len(&self) -> usize {
		self.remaining
	}
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Iter").field("remaining", &self.remaining).finish()
	}
}

// ---------------------------------------------------------------------------
// Owning Iterator
// ---------------------------------------------------------------------------

/// An owning iterator over the keys of a [`Set`] in ascending order.
///
/// Created by the [`IntoIterator`] impl for [`Set`].
/// The in-order leaf sequence is snapshotted up front; keys are then
/// moved out of the arena one at a time, and any keys never yielded are
/// dropped with the arena.
pub struct IntoIter<T> {
	arena: Arena<Node<T>>,
	order: std::vec::IntoIter<NodeId>,
}

impl<T> IntoIter<T> {
	pub(crate) fn new(set: Set<T>) -> IntoIter<T> {
		let order = set.leaf_ids_in_order();
		let Set {
			arena, ..
		} = set;
		IntoIter {
			arena,
			order: order.into_iter(),
		}
	}

	fn take_key(&mut self, id: NodeId) -> T {
		match self.arena.free(id).kind {
			NodeKind::Leaf(key) => key,
			NodeKind::Internal {
				..
			} => unreachable!("in-order walk yielded an internal node"),
		}
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		let id = self.order.next()?;
		Some(self.take_key(id))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.order.size_hint()
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	fn next_back(&mut self) -> Option<T> {
		let id = self.order.next_back()?;
		Some(self.take_key(id))
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {
	fn len(&self) -> usize {
		self.order.len()
	}
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> fmt::Debug for IntoIter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IntoIter").field("remaining", &self.order.len()).finish()
	}
}
