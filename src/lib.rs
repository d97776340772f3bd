//! # Leafset: An Ordered Set on an Order-4 Leaf Tree
//!
//! This crate provides [`Set`], a sorted collection of unique keys with
//! logarithmic-time insertion, removal and lookup, and bidirectional
//! in-order traversal.
//!
//! ## Design Overview
//!
//! Unlike a classical B-tree, keys live **only at the leaves**. Internal
//! nodes hold 2 to 4 ordered children plus a cached reference to the
//! maximum key in their subtree, which is all the information descent
//! needs: to find the first key not less than a needle, step into the
//! leftmost child whose subtree maximum is not less than the needle.
//!
//! ### Tree Structure
//!
//! ```text
//!                  ┌──────────────┐
//!                  │   internal   │  <- 2..=4 children, cached subtree max
//!                  └──────┬───────┘
//!           ┌─────────────┼─────────────┐
//!           ▼             ▼             ▼
//!     ┌──────────┐  ┌──────────┐  ┌──────────┐
//!     │ internal │  │ internal │  │ internal │
//!     └────┬─────┘  └────┬─────┘  └────┬─────┘
//!         ...           ...           ...
//!           ▼             ▼             ▼
//!       ┌──────┐      ┌──────┐      ┌──────┐
//!       │ leaf │      │ leaf │      │ leaf │  <- one owned key each
//!       └──────┘      └──────┘      └──────┘
//! ```
//!
//! Two corrective primitives keep the shape balanced:
//!
//! - **split on overflow**: a node that reaches five children sheds its
//!   two rightmost children into a fresh sibling and the correction
//!   propagates upward; splitting the root grows the tree by one level.
//! - **merge on underflow**: a node reduced to a single child hands that
//!   child to an adjacent sibling and disappears; a merge can overflow
//!   the sibling, which the split primitive then repairs. The two
//!   primitives compose, so invariant restoration stays small.
//!
//! Every internal node therefore carries 2 to 4 children outside of a
//! single transient rebalancing step, all leaves sit at the same depth,
//! and the height stays logarithmic in the number of keys.
//!
//! ### Node Storage
//!
//! Nodes live in an index-addressed arena; parent links and the cached
//! maximum are non-owning slot indices, never pointers. The arena owns
//! all node memory, so teardown is simply
//! dropping the set, and a reference that outlives its node degrades to a
//! detectable vacant-slot lookup instead of a dangling pointer.
//!
//! ### Versioned Cursors
//!
//! The set carries a mutation version, incremented once per structural
//! change. A [`Cursor`] captures the version at creation and re-validates
//! it before every access: any later `insert` or `remove` invalidates
//! **all** outstanding cursors, which then fail with
//! [`Error::StaleCursor`]. The policy is deliberately whole-structure,
//! since rebalancing can touch nodes arbitrarily far from the mutated
//! key.
//! The borrowing [`Iter`] returned by [`Set::iter`] is exempt: its shared
//! borrow statically excludes mutation for as long as it lives.
//!
//! ## Basic Usage
//!
//! ```
//! use leafset::Set;
//!
//! let mut set = Set::new();
//! set.insert(5);
//! set.insert(1);
//! set.insert(3);
//!
//! assert!(set.contains(&3));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 5]);
//!
//! // Cursors survive only until the next mutation.
//! let cur = set.begin();
//! assert_eq!(cur.key(&set).unwrap(), Some(&1));
//! set.insert(2);
//! assert!(cur.key(&set).is_err());
//! ```
//!
//! ## Thread Safety
//!
//! The set is a plain single-threaded container with no internal
//! synchronization. `Set<T>` is `Send`/`Sync` exactly when `T` is, and
//! concurrent mutation must be prevented by the caller (for example with
//! an external lock).

use smallvec::{smallvec, SmallVec};

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

mod arena;
pub mod error;
pub mod iter;

use arena::{Arena, NodeId};
use iter::Pos;

pub use error::{Error, Result};
pub use iter::{Cursor, IntoIter, Iter};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// Maximum number of children an internal node may keep between
/// operations. A node reaching `MAX_CHILDREN + 1` children is split
/// before the mutating call returns.
const MAX_CHILDREN: usize = 4;

/// Child lists are bounded by the transient overflow count, so they stay
/// inline and never spill to the heap.
type ChildList = SmallVec<[NodeId; MAX_CHILDREN + 1]>;

/// Source of per-set identities, used to reject cursors presented to a
/// set that did not issue them.
static NEXT_SET_ID: AtomicU64 = AtomicU64::new(0);

fn next_set_id() -> u64 {
	NEXT_SET_ID.fetch_add(1, Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Node Representation
// ---------------------------------------------------------------------------

/// A tree vertex: either a leaf owning one key, or an internal routing
/// node owning an ordered list of children.
#[derive(Clone)]
pub(crate) struct Node<T> {
	/// Non-owning back-reference; `None` for the root.
	pub(crate) parent: Option<NodeId>,
	pub(crate) kind: NodeKind<T>,
}

#[derive(Clone)]
pub(crate) enum NodeKind<T> {
	/// A leaf exclusively owns its key.
	Leaf(T),
	/// An internal node owns its children (by arena slot) and caches the
	/// id of the leaf holding the largest key in its subtree. The cache
	/// is a non-owning reference used purely for routing comparisons.
	Internal {
		children: ChildList,
		max_leaf: NodeId,
	},
}

// ---------------------------------------------------------------------------
// Set
// ---------------------------------------------------------------------------

/// An ordered set of unique keys backed by an order-4 leaf tree.
///
/// Keys are ordered by their natural [`Ord`] ordering. `insert` of a
/// present key and `remove` of an absent key are no-ops that leave
/// outstanding cursors valid; every effective mutation invalidates them.
///
/// It is a logic error for a key to be mutated in a way that changes its
/// ordering while it is in the set (only possible through interior
/// mutability). The resulting behavior is unspecified but memory-safe.
///
/// # Example
///
/// ```
/// use leafset::Set;
///
/// let set = Set::from([5, 1, 3, 2, 4]);
/// assert_eq!(set.len(), 5);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
/// ```
pub struct Set<T> {
	pub(crate) arena: Arena<Node<T>>,
	/// `None` only when the set is empty. A lone leaf is a valid root.
	pub(crate) root: Option<NodeId>,
	pub(crate) len: usize,
	/// Bumped exactly once per structural mutation; cursors snapshot it.
	pub(crate) version: u64,
	/// Identity token issued to cursors.
	pub(crate) id: u64,
}

impl<T> Set<T> {
	/// Creates a new, empty set. Does not allocate.
	pub fn new() -> Self {
		Set {
			arena: Arena::new(),
			root: None,
			len: 0,
			version: 0,
			id: next_set_id(),
		}
	}

	/// Returns the number of keys in the set. O(1).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the set holds no keys. O(1).
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Removes all keys.
	///
	/// Counts as a single structural mutation: outstanding cursors become
	/// stale unless the set was already empty.
	pub fn clear(&mut self) {
		if self.root.is_none() {
			return;
		}
		self.arena.clear();
		self.root = None;
		self.len = 0;
		self.version += 1;
	}

	/// Number of levels in the tree: 0 when empty, 1 for a lone root
	/// leaf. All leaves sit at the same depth, so the leftmost path
	/// measures every path.
	pub fn height(&self) -> usize {
		let mut height = 0;
		let mut node = self.root;
		while let Some(id) = node {
			height += 1;
			node = self.children(id).first().copied();
		}
		height
	}

	/// Returns the smallest key, or `None` if the set is empty.
	pub fn first(&self) -> Option<&T> {
		self.root.map(|root| self.leaf_key(self.first_leaf(root)))
	}

	/// Returns the largest key, or `None` if the set is empty.
	pub fn last(&self) -> Option<&T> {
		self.root.map(|root| self.leaf_key(self.last_leaf(root)))
	}

	/// A borrowing double-ended iterator over the keys in ascending
	/// order. Takes worst-case logarithmic and amortized constant time
	/// per step. Cannot go stale: its borrow excludes mutation.
	pub fn iter(&self) -> Iter<'_, T> {
		Iter::new(self)
	}

	/// Cursor at the smallest key, or at the end position if the set is
	/// empty.
	pub fn begin(&self) -> Cursor {
		let pos = match self.root {
			Some(root) => Pos::Leaf(self.first_leaf(root)),
			None => Pos::End,
		};
		Cursor::new(self.id, self.version, pos)
	}

	/// Cursor at the end position, one past the largest key.
	///
	/// Stepping it backward lands on the largest key; stepping it forward
	/// keeps it at end.
	pub fn end(&self) -> Cursor {
		Cursor::new(self.id, self.version, Pos::End)
	}

	// -----------------------------------------------------------------------
	// Structural Navigation
	// -----------------------------------------------------------------------

	/// Child slots of `id`; empty for leaves.
	pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
		match &self.arena[id].kind {
			NodeKind::Leaf(_) => &[],
			NodeKind::Internal {
				children, ..
			} => children,
		}
	}

	fn children_mut(&mut self, id: NodeId) -> &mut ChildList {
		match &mut self.arena[id].kind {
			NodeKind::Internal {
				children, ..
			} => children,
			NodeKind::Leaf(_) => unreachable!("leaves have no child list"),
		}
	}

	/// Position of `child` within its parent's child list.
	fn child_index(&self, parent: NodeId, child: NodeId) -> usize {
		self.children(parent)
			.iter()
			.position(|&c| c == child)
			.expect("node is not a child of its parent link")
	}

	/// The key owned by leaf `id`.
	pub(crate) fn leaf_key(&self, id: NodeId) -> &T {
		match &self.arena[id].kind {
			NodeKind::Leaf(key) => key,
			NodeKind::Internal {
				..
			} => unreachable!("expected a leaf"),
		}
	}

	/// The maximum key in the subtree rooted at `id`, read through the
	/// cached max-leaf reference in O(1).
	fn subtree_max_key(&self, id: NodeId) -> &T {
		match &self.arena[id].kind {
			NodeKind::Leaf(key) => key,
			NodeKind::Internal {
				max_leaf, ..
			} => self.leaf_key(*max_leaf),
		}
	}

	/// Leftmost leaf under `id`.
	pub(crate) fn first_leaf(&self, mut id: NodeId) -> NodeId {
		while let Some(&child) = self.children(id).first() {
			id = child;
		}
		id
	}

	/// Rightmost leaf under `id`.
	pub(crate) fn last_leaf(&self, mut id: NodeId) -> NodeId {
		while let Some(&child) = self.children(id).last() {
			id = child;
		}
		id
	}

	/// In-order successor of leaf `id`, or `None` past the last leaf.
	///
	/// Ascends while the current node is its parent's last child, then
	/// descends to the leftmost leaf of the next sibling. Amortized O(1)
	/// over a full traversal.
	pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
		let mut child = id;
		while let Some(parent) = self.arena[child].parent {
			let pos = self.child_index(parent, child);
			let siblings = self.children(parent);
			if pos + 1 < siblings.len() {
				return Some(self.first_leaf(siblings[pos + 1]));
			}
			child = parent;
		}
		None
	}

	/// In-order predecessor of leaf `id`, or `None` before the first
	/// leaf. Mirror image of [`Set::successor`].
	pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
		let mut child = id;
		while let Some(parent) = self.arena[child].parent {
			let pos = self.child_index(parent, child);
			if pos > 0 {
				return Some(self.last_leaf(self.children(parent)[pos - 1]));
			}
			child = parent;
		}
		None
	}

	/// All leaf ids in ascending key order, via a single depth-first
	/// walk. Used by the owning iterator.
	pub(crate) fn leaf_ids_in_order(&self) -> Vec<NodeId> {
		let mut out = Vec::with_capacity(self.len);
		let mut stack: Vec<NodeId> = self.root.into_iter().collect();
		while let Some(id) = stack.pop() {
			match &self.arena[id].kind {
				NodeKind::Leaf(_) => out.push(id),
				NodeKind::Internal {
					children, ..
				} => stack.extend(children.iter().rev().copied()),
			}
		}
		out
	}
}

impl<T: Ord> Set<T> {
	// -----------------------------------------------------------------------
	// Lookup
	// -----------------------------------------------------------------------

	/// Descends to the leaf where `key` lives or would live.
	///
	/// At each internal node, steps into the leftmost child whose subtree
	/// maximum is not less than `key`; if every child maximum is smaller,
	/// clamps to the last (largest) child so insertion still finds the
	/// rightmost leaf. Returns `None` only on an empty set. O(log n).
	fn locate_leaf<Q>(&self, key: &Q) -> Option<NodeId>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let mut node = self.root?;
		loop {
			match &self.arena[node].kind {
				NodeKind::Leaf(_) => return Some(node),
				NodeKind::Internal {
					children, ..
				} => {
					node = children
						.iter()
						.copied()
						.find(|&child| {
							let max: &Q = self.subtree_max_key(child).borrow();
							max >= key
						})
						.unwrap_or_else(|| {
							*children.last().expect("internal node has children")
						});
				}
			}
		}
	}

	/// Leaf holding the first key not less than `key`, or `None` if every
	/// key is smaller (or the set is empty).
	fn lower_bound_leaf<Q>(&self, key: &Q) -> Option<NodeId>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let leaf = self.locate_leaf(key)?;
		if self.leaf_key(leaf).borrow() < key {
			// The descent clamped to the overall maximum: no key >= `key`.
			None
		} else {
			Some(leaf)
		}
	}

	/// Returns a reference to the stored key equal to `key`, if any.
	pub fn get<Q>(&self, key: &Q) -> Option<&T>
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let leaf = self.lower_bound_leaf(key)?;
		let found = self.leaf_key(leaf);
		if found.borrow() == key {
			Some(found)
		} else {
			None
		}
	}

	/// Returns `true` if the set holds a key equal to `key`. O(log n).
	///
	/// ```
	/// use leafset::Set;
	///
	/// let set = Set::from(["ash", "fern", "oak"]);
	/// assert!(set.contains("fern"));
	/// assert!(!set.contains("moss"));
	/// ```
	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		self.get(key).is_some()
	}

	/// Cursor at the key equal to `key`, or at end if absent. O(log n).
	pub fn find<Q>(&self, key: &Q) -> Cursor
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let pos = match self.lower_bound_leaf(key) {
			Some(leaf) if self.leaf_key(leaf).borrow() == key => Pos::Leaf(leaf),
			_ => Pos::End,
		};
		Cursor::new(self.id, self.version, pos)
	}

	/// Cursor at the first key not less than `key`, or at end if every
	/// key is smaller. O(log n).
	///
	/// ```
	/// use leafset::Set;
	///
	/// let set = Set::from([10, 20, 30]);
	/// let cur = set.lower_bound(&15);
	/// assert_eq!(cur.key(&set).unwrap(), Some(&20));
	/// assert!(set.lower_bound(&31).is_end(&set).unwrap());
	/// ```
	pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let pos = match self.lower_bound_leaf(key) {
			Some(leaf) => Pos::Leaf(leaf),
			None => Pos::End,
		};
		Cursor::new(self.id, self.version, pos)
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts `key`, returning `true` if it was not already present.
	///
	/// Inserting a duplicate is a no-op: no structural change, no cursor
	/// invalidation. An effective insert invalidates every outstanding
	/// cursor. O(log n).
	pub fn insert(&mut self, key: T) -> bool {
		let target = match self.root {
			None => {
				let leaf = self.arena.alloc(Node {
					parent: None,
					kind: NodeKind::Leaf(key),
				});
				self.root = Some(leaf);
				self.len = 1;
				self.version += 1;
				return true;
			}
			Some(_) => self.locate_leaf(&key).expect("set is non-empty"),
		};
		if *self.leaf_key(target) == key {
			return false;
		}
		let leaf = self.arena.alloc(Node {
			parent: None,
			kind: NodeKind::Leaf(key),
		});
		match self.arena[target].parent {
			None => {
				// The root is a lone leaf: grow an internal root over the
				// old root and the new leaf.
				let new_root = self.new_internal(smallvec![target, leaf]);
				self.root = Some(new_root);
			}
			Some(parent) => {
				// Join the target leaf's sibling set; the parent may
				// transiently reach five children.
				self.children_mut(parent).push(leaf);
				self.refresh(parent);
				self.fix_overflow(parent);
				// The new key may be a new subtree maximum; refresh every
				// ancestor up to the root, including levels the split
				// never reached.
				let mut cur = leaf;
				while let Some(ancestor) = self.arena[cur].parent {
					self.refresh(ancestor);
					cur = ancestor;
				}
			}
		}
		self.len += 1;
		self.version += 1;
		true
	}

	// -----------------------------------------------------------------------
	// Removal
	// -----------------------------------------------------------------------

	/// Removes the key equal to `key`, returning `true` if it was
	/// present.
	///
	/// Removing an absent key is a no-op: no structural change, no cursor
	/// invalidation. An effective remove invalidates every outstanding
	/// cursor. O(log n).
	pub fn remove<Q>(&mut self, key: &Q) -> bool
	where
		T: Borrow<Q>,
		Q: Ord + ?Sized,
	{
		let leaf = match self.locate_leaf(key) {
			Some(leaf) => leaf,
			None => return false,
		};
		if self.leaf_key(leaf).borrow() != key {
			return false;
		}
		match self.arena[leaf].parent {
			None => {
				// The root itself is the only leaf.
				self.arena.free(leaf);
				self.root = None;
			}
			Some(parent) => {
				let pos = self.child_index(parent, leaf);
				self.children_mut(parent).remove(pos);
				self.arena.free(leaf);
				self.refresh(parent);
				self.fix_underflow(parent);
			}
		}
		self.len -= 1;
		self.version += 1;
		true
	}

	// -----------------------------------------------------------------------
	// Rebalancing Primitives
	// -----------------------------------------------------------------------

	/// Restores `id`'s bookkeeping after its child list changed: sorts
	/// the children ascending by subtree maximum, points their parent
	/// links back at `id`, and recomputes the cached max leaf. No-op on
	/// leaves.
	fn refresh(&mut self, id: NodeId) {
		let mut children = match &mut self.arena[id].kind {
			NodeKind::Internal {
				children, ..
			} => std::mem::take(children),
			NodeKind::Leaf(_) => return,
		};
		// Insertion sort: at most one entry is out of place after an
		// append, and lists never exceed five entries.
		for i in 1..children.len() {
			let mut j = i;
			while j > 0
				&& self.subtree_max_key(children[j]) < self.subtree_max_key(children[j - 1])
			{
				children.swap(j, j - 1);
				j -= 1;
			}
		}
		for &child in &children {
			self.arena[child].parent = Some(id);
		}
		let last = *children.last().expect("refreshed node must have children");
		let max_leaf = match &self.arena[last].kind {
			NodeKind::Leaf(_) => last,
			NodeKind::Internal {
				max_leaf, ..
			} => *max_leaf,
		};
		match &mut self.arena[id].kind {
			NodeKind::Internal {
				children: slot,
				max_leaf: cached,
			} => {
				*slot = children;
				*cached = max_leaf;
			}
			NodeKind::Leaf(_) => unreachable!(),
		}
	}

	/// Allocates an internal node over `children` and refreshes it, which
	/// sorts the children, adopts them, and seeds the max-leaf cache.
	fn new_internal(&mut self, children: ChildList) -> NodeId {
		let seed = *children.last().expect("internal node requires children");
		let id = self.arena.alloc(Node {
			parent: None,
			kind: NodeKind::Internal {
				children,
				max_leaf: seed,
			},
		});
		self.refresh(id);
		id
	}

	/// Split-on-overflow, as an upward loop.
	///
	/// While the current node holds five children, its two rightmost
	/// children move into a fresh sibling, which is then inserted into
	/// the parent's child list, possibly overflowing the parent in turn.
	/// Splitting the root creates a new two-child root and increases the
	/// height by one.
	fn fix_overflow(&mut self, mut id: NodeId) {
		loop {
			let count = self.children(id).len();
			if count <= MAX_CHILDREN {
				return;
			}
			let spill: ChildList = self.children_mut(id).drain(count - 2..).collect();
			self.refresh(id);
			let sibling = self.new_internal(spill);
			match self.arena[id].parent {
				None => {
					let new_root = self.new_internal(smallvec![id, sibling]);
					self.root = Some(new_root);
					return;
				}
				Some(parent) => {
					self.children_mut(parent).push(sibling);
					self.refresh(parent);
					id = parent;
				}
			}
		}
	}

	/// Merge-on-underflow, as an upward loop.
	///
	/// A node reduced to a single child hands that child to an adjacent
	/// sibling and is destroyed; the sibling may overflow, which
	/// [`Set::fix_overflow`] repairs before the pass continues upward. At
	/// levels with no underflow the pass still refreshes the max-key
	/// caches, so a removed maximum propagates all the way to the root.
	/// A root left with one child is collapsed, shrinking the height.
	fn fix_underflow(&mut self, start: NodeId) {
		let mut cur = Some(start);
		while let Some(id) = cur {
			if self.children(id).len() != 1 {
				self.refresh(id);
				cur = self.arena[id].parent;
				continue;
			}
			let only = self.children(id)[0];
			let parent = match self.arena[id].parent {
				None => {
					// The root is down to one child; promote it.
					self.arena[only].parent = None;
					self.root = Some(only);
					self.arena.free(id);
					return;
				}
				Some(parent) => parent,
			};
			// The parent held at least two children before this pass
			// touched it, so an adjacent sibling exists.
			let pos = self.child_index(parent, id);
			let siblings = self.children(parent);
			let sibling = if pos == 0 {
				siblings[1]
			} else {
				siblings[pos - 1]
			};
			self.children_mut(sibling).push(only);
			self.children_mut(parent).remove(pos);
			self.arena.free(id);
			self.refresh(sibling);
			self.fix_overflow(sibling);
			// A split may have re-parented the sibling; re-read the link.
			let next = self.arena[sibling].parent;
			if let Some(above) = next {
				self.refresh(above);
			}
			cur = next;
		}
	}

	// -----------------------------------------------------------------------
	// Structural Validation (white-box, for tests)
	// -----------------------------------------------------------------------

	/// Validates every structural invariant of the tree, panicking with a
	/// description on the first violation.
	///
	/// Checked invariants:
	///
	/// 1. Internal nodes hold 2..=4 children.
	/// 2. Children are sorted strictly ascending by subtree maximum.
	/// 3. Every cached max-leaf reference names the actual maximum leaf.
	/// 4. Parent back-links match the ownership structure.
	/// 5. All leaves sit at the same depth.
	/// 6. The leaf count equals `len`, and the arena holds no orphan
	///    nodes beyond the reachable tree.
	pub fn assert_invariants(&self) {
		let root = match self.root {
			None => {
				assert_eq!(self.len, 0, "empty set must have len 0");
				assert_eq!(self.arena.live(), 0, "empty set must not retain nodes");
				return;
			}
			Some(root) => root,
		};
		assert!(self.arena[root].parent.is_none(), "root must not have a parent link");
		let mut leaf_depth = None;
		let (nodes, leaves) = self.validate_node(root, 0, &mut leaf_depth);
		assert_eq!(leaves, self.len, "leaf count {} != len {}", leaves, self.len);
		assert_eq!(
			nodes,
			self.arena.live(),
			"arena holds {} nodes but only {} are reachable",
			self.arena.live(),
			nodes
		);
	}

	/// Recursively validates the subtree under `id`, returning the number
	/// of (nodes, leaves) it contains.
	fn validate_node(
		&self,
		id: NodeId,
		depth: usize,
		leaf_depth: &mut Option<usize>,
	) -> (usize, usize) {
		match &self.arena[id].kind {
			NodeKind::Leaf(_) => {
				match *leaf_depth {
					None => *leaf_depth = Some(depth),
					Some(expected) => {
						assert_eq!(depth, expected, "leaves must share a common depth")
					}
				}
				(1, 1)
			}
			NodeKind::Internal {
				children,
				max_leaf,
			} => {
				assert!(
					(2..=MAX_CHILDREN).contains(&children.len()),
					"internal node holds {} children",
					children.len()
				);
				for pair in children.windows(2) {
					assert!(
						self.subtree_max_key(pair[0]) < self.subtree_max_key(pair[1]),
						"children not sorted by subtree maximum"
					);
				}
				let last = *children.last().expect("bounds checked above");
				let expected_max = match &self.arena[last].kind {
					NodeKind::Leaf(_) => last,
					NodeKind::Internal {
						max_leaf, ..
					} => *max_leaf,
				};
				assert_eq!(*max_leaf, expected_max, "cached max leaf is stale");
				assert!(
					matches!(self.arena[*max_leaf].kind, NodeKind::Leaf(_)),
					"cached max must reference a leaf"
				);
				let mut nodes = 1;
				let mut leaves = 0;
				for &child in children.iter() {
					assert_eq!(
						self.arena[child].parent,
						Some(id),
						"child carries a wrong parent link"
					);
					let (n, l) = self.validate_node(child, depth + 1, leaf_depth);
					nodes += n;
					leaves += l;
				}
				(nodes, leaves)
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Standard Trait Implementations
// ---------------------------------------------------------------------------

impl<T> Default for Set<T> {
	fn default() -> Self {
		Set::new()
	}
}

impl<T: Clone> Clone for Set<T> {
	/// Structural O(n) clone. The copy shares no storage with the
	/// original and receives a fresh identity, so cursors issued by one
	/// set are rejected by the other.
	fn clone(&self) -> Self {
		Set {
			arena: self.arena.clone(),
			root: self.root,
			len: self.len,
			version: self.version,
			id: next_set_id(),
		}
	}
}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<T: PartialEq> PartialEq for Set<T> {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len && self.iter().eq(other.iter())
	}
}

impl<T: Eq> Eq for Set<T> {}

impl<T: Ord> FromIterator<T> for Set<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut set = Set::new();
		set.extend(iter);
		set
	}
}

impl<T: Ord> Extend<T> for Set<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for key in iter {
			self.insert(key);
		}
	}
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
	fn from(keys: [T; N]) -> Self {
		keys.into_iter().collect()
	}
}

impl<T> IntoIterator for Set<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	/// Consumes the set, yielding its keys in ascending order.
	fn into_iter(self) -> IntoIter<T> {
		IntoIter::new(self)
	}
}

impl<'a, T> IntoIterator for &'a Set<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Iter<'a, T> {
		self.iter()
	}
}
