//! # Error Types for the Ordered Set
//!
//! This module defines the error taxonomy for cursor operations on
//! [`Set`](crate::Set).
//!
//! ## Error Handling Strategy
//!
//! The set itself is infallible: `insert`, `remove`, `find` and
//! `lower_bound` always succeed on well-formed keys. Only *cursor*
//! accesses can fail, and they fail for exactly one of two reasons:
//!
//! - The set was structurally mutated after the cursor was created. Every
//!   successful `insert` or `remove` bumps the set's version counter, and
//!   a cursor carries the version it was issued under. A mismatch is
//!   reported as [`Error::StaleCursor`] and is terminal for that cursor;
//!   the caller must obtain a fresh one.
//! - Traversal reached a state the tree invariants rule out (for example
//!   a cursor position that no longer names a leaf). This is
//!   [`Error::Corrupted`] and signals a defect in the tree itself, not a
//!   usage error; it is not meant to be handled.
//!
//! Because cursors are detached tokens rather than borrowing iterators,
//! it is also possible to present a cursor to a set that never issued it.
//! That misuse is caught by an identity check and reported as
//! [`Error::ForeignCursor`].

use thiserror::Error;

/// Errors surfaced by cursor operations on a [`Set`](crate::Set).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// The set was mutated after this cursor was created.
	///
	/// Any successful `insert` or `remove` invalidates **every**
	/// outstanding cursor of the set, regardless of which key changed.
	/// Rebalancing can restructure arbitrarily distant parts of the tree,
	/// so the invalidation is deliberately whole-structure rather than
	/// per-position.
	///
	/// # Response
	///
	/// Discard the cursor and obtain a new one via `begin`, `end`, `find`
	/// or `lower_bound`. A stale cursor can never become valid again.
	#[error("cursor invalidated by mutation (captured version {captured}, set is at {current})")]
	StaleCursor {
		/// The set version captured when the cursor was created.
		captured: u64,
		/// The set version at the time of the failed access.
		current: u64,
	},

	/// The cursor was issued by a different set.
	///
	/// Cursors are plain tokens and carry the identity of the set that
	/// produced them; using one against any other set is rejected rather
	/// than silently reading unrelated data.
	#[error("cursor was issued by a different set")]
	ForeignCursor,

	/// Traversal reached a structurally impossible state.
	///
	/// This indicates a broken tree invariant (a defect in this crate),
	/// not a caller error. It should be treated as unrecoverable.
	#[error("set structure corrupted: {0}")]
	Corrupted(&'static str),
}

/// A `Result` alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
