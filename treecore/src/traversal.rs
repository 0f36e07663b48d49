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

//! Hand-over-hand descent: the child's lock is always acquired before the
//! parent's is released, per spec §4.D and §9's correctness note singling
//! this discipline out as the likeliest source of bugs.
//!
//! Rust's ownership model actually makes the discipline easy to get right
//! by construction: [`ReadGuard::child_map`]/[`WriteGuard::child_map`]
//! hand back a reference with the node's own lifetime rather than the
//! guard's, so a child lock can be acquired while the parent guard is
//! still in scope, and the parent guard only needs to be dropped — or, in
//! a plain reassignment, is dropped automatically — once the child lock is
//! already held.

use crate::error::{TreeError, TreeResult};
use crate::map::ChildMap;
use crate::node::{Node, ReadGuard, WriteGuard};
use crate::path::split_path;

/// Reader-descend `path` (e.g. `/a/b/`) from `start`, hand-over-hand,
/// returning a reader hold on the final named node. `path == "/"` returns
/// a reader hold on `start` itself.
pub(crate) fn find_reader<'a>(start: &'a Node, path: &str) -> TreeResult<ReadGuard<'a>> {
    if path == "/" {
        return Ok(start.read());
    }
    let mut current = start.read();
    let mut remaining = path;
    loop {
        let (component, rest) = split_path(remaining).expect("non-root path has a component");
        let child = match current.child_map().get(component) {
            Some(c) => c.as_ref(),
            None => return Err(TreeError::ENoent),
        };
        // `current` (the parent reader) is dropped here only after `child.read()`
        // has already been evaluated and admitted: hand-over-hand by construction.
        current = child.read();
        if rest == "/" {
            return Ok(current);
        }
        remaining = rest;
    }
}

/// Hand-over-hand reader descent through `path`'s components starting from
/// an already-resolved `map` (the caller keeps whatever lock that map's
/// owning node is held under), writer-locking the final named node.
///
/// Used both as the tail of [`find_writer`] (where `map` belongs to a fresh
/// reader hold on `start` that this function takes ownership of and
/// releases hand-over-hand) and directly from `move`'s LCA-relative
/// descents (where `map` belongs to a node the caller is managing the
/// lifetime of itself).
pub(crate) fn descend_to_writer<'a>(
    map: &'a ChildMap<Box<Node>>,
    path: &str,
    held: Option<ReadGuard<'a>>,
) -> TreeResult<WriteGuard<'a>> {
    let mut map = map;
    let mut held = held;
    let mut remaining = path;
    loop {
        let (component, rest) = split_path(remaining).expect("non-root path has a component");
        let child = match map.get(component) {
            Some(c) => c.as_ref(),
            None => return Err(TreeError::ENoent),
        };
        if rest == "/" {
            let writer = child.write();
            // `held`, if any, is dropped here, after the child writer lock
            // is already admitted.
            drop(held);
            return Ok(writer);
        }
        let next = child.read();
        held = Some(next);
        map = held.as_ref().unwrap().child_map();
        remaining = rest;
    }
}

/// Descend `path` from `start`, hand-over-hand, writer-locking the final
/// named node. `path == "/"` writer-locks `start` itself (the `k == 0`
/// case of spec §4.D's `find_node`).
pub(crate) fn find_writer<'a>(start: &'a Node, path: &str) -> TreeResult<WriteGuard<'a>> {
    if path == "/" {
        return Ok(start.write());
    }
    let reader = start.read();
    let map = reader.child_map();
    descend_to_writer(map, path, Some(reader))
}
