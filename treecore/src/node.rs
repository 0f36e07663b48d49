/*
 * This file is part of dirtree.
 *
 * dirtree is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
*/

//! The directory node: a name→child map plus the [`NodeSync`] monitor that
//! gates every access to it.
//!
//! The map sits behind an [`UnsafeCell`] rather than a second lock: per
//! spec §3/§4.C, the node's reader/writer protocol *is* the lock on the
//! map, and wrapping the map in its own `Mutex` or `RwLock` on top of that
//! would be redundant bookkeeping the design deliberately avoids. The two
//! guard types below ([`ReadGuard`], [`WriteGuard`]) are the only code
//! allowed to dereference the cell, and they do so with a lifetime tied to
//! the node itself (not to the guard) so that hand-over-hand descent can
//! drop the parent guard right after borrowing the child, as spec.md's
//! traversal discipline requires. This mirrors the documented-unsafe style
//! used for `Atomic`/`TMCell` in `engine::sync::cell`.

use crate::map::ChildMap;
use crate::sync::NodeSync;
use std::cell::UnsafeCell;

pub struct Node {
    sync: NodeSync,
    map: UnsafeCell<ChildMap<Box<Node>>>,
}

// SAFETY: `map` is only ever read or written through `ReadGuard`/`WriteGuard`,
// which are only handed out by `NodeSync::enter_reader`/`enter_writer`. That
// protocol enforces the invariant `UnsafeCell` needs from us: at most one
// writer xor any number of readers observe `map` at a time.
unsafe impl Sync for Node {}

impl Node {
    pub fn new_empty() -> Self {
        Self {
            sync: NodeSync::new(),
            map: UnsafeCell::new(ChildMap::new()),
        }
    }

    /// Acquire this node as a reader. Blocks until admitted.
    pub(crate) fn read(&self) -> ReadGuard<'_> {
        self.sync.enter_reader();
        ReadGuard { node: self }
    }

    /// Acquire this node as a writer. Blocks until admitted.
    pub(crate) fn write(&self) -> WriteGuard<'_> {
        self.sync.enter_writer();
        WriteGuard { node: self }
    }

    /// Block until this node has no active or waiting reader/writer.
    ///
    /// Bypasses the entry protocol entirely, per spec §4.E step 4 of
    /// `remove` and the subtree drain in `move`: the caller must already
    /// hold a writer lock on this node's *parent*, which is what prevents
    /// any new traversal from reaching this node while we wait.
    pub(crate) fn await_quiescence(&self) {
        self.sync.await_quiescence();
    }

    /// Direct, protocol-bypassing peek at this node's children.
    ///
    /// # Safety
    /// Only valid once [`Node::await_quiescence`] has returned for this
    /// node, and while the caller still holds a writer lock on an ancestor
    /// that prevents any new traversal from reaching this node — exactly
    /// the condition `remove` and `move`'s subtree drain establish before
    /// calling this.
    pub(crate) unsafe fn peek_children(&self) -> &ChildMap<Box<Node>> {
        &*self.map.get()
    }
}

/// A shared (reader) hold on a node's map.
pub(crate) struct ReadGuard<'a> {
    node: &'a Node,
}

impl<'a> ReadGuard<'a> {
    /// Borrow the map for the lifetime of the node, not of this guard, so a
    /// child reference obtained here can outlive the guard being dropped
    /// (hand-over-hand release of the parent).
    ///
    /// SAFETY: a `ReadGuard` exists only while `NodeSync` counts this
    /// thread as an active reader, and the protocol guarantees no writer is
    /// concurrently active, so a shared view of `map` is sound.
    pub(crate) fn child_map(&self) -> &'a ChildMap<Box<Node>> {
        unsafe { &*self.node.map.get() }
    }
}

impl<'a> Drop for ReadGuard<'a> {
    fn drop(&mut self) {
        self.node.sync.exit_reader();
    }
}

/// An exclusive (writer) hold on a node's map.
pub(crate) struct WriteGuard<'a> {
    node: &'a Node,
}

impl<'a> WriteGuard<'a> {
    /// SAFETY: see [`ReadGuard::child_map`]; a `WriteGuard` additionally
    /// guarantees no reader is concurrently active either.
    pub(crate) fn child_map(&self) -> &'a ChildMap<Box<Node>> {
        unsafe { &*self.node.map.get() }
    }

    /// SAFETY: same as [`Self::child_map`]; exclusivity is what makes a
    /// mutable view sound. Tied to `&mut self`, not to the node's own `'a`:
    /// every call site uses the reference within the same statement, and
    /// detaching the lifetime here would let two guards aliasing the same
    /// node (as `tree.rs`'s `mv` does whenever the LCA coincides with a
    /// parent) each hand out a live `&mut` into the same `UnsafeCell`.
    pub(crate) fn child_map_mut(&mut self) -> &mut ChildMap<Box<Node>> {
        unsafe { &mut *self.node.map.get() }
    }
}

impl<'a> Drop for WriteGuard<'a> {
    fn drop(&mut self) {
        self.node.sync.exit_writer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_node_has_empty_map() {
        let n = Node::new_empty();
        let g = n.read();
        assert_eq!(g.child_map().size(), 0);
    }

    #[test]
    fn writer_can_insert_and_reader_sees_it() {
        let n = Node::new_empty();
        {
            let mut w = n.write();
            w.child_map_mut().insert("a".to_owned(), Box::new(Node::new_empty()));
        }
        let r = n.read();
        assert!(r.child_map().get("a").is_some());
    }
}
