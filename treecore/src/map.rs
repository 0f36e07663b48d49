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

//! Name→child associative container.
//!
//! spec.md lists this as an external collaborator ("an associative container
//! mapping folder-name to child-node"). There's no ready-made crate in the
//! corpus shaped exactly like this, so it's a thin, deliberately dumb wrapper
//! over [`std::collections::HashMap`] — all the interesting synchronization
//! lives one layer up, in [`crate::node`], which is the only code allowed to
//! reach through a node's writer lock to mutate one of these.

use std::collections::HashMap;

/// A mapping from folder name to an owned value (a child [`crate::node::Node`],
/// in every use in this crate).
#[derive(Debug, Default)]
pub struct ChildMap<V> {
    inner: HashMap<String, V>,
}

impl<V> ChildMap<V> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.inner.get(key)
    }

    /// Insert-or-overwrite. The core only ever calls this with a key it has
    /// just checked is absent (`create`) or that it owns the sole parent
    /// edge for (`move`'s splice), so the overwrite case never actually
    /// fires in this crate — kept because the external contract names it.
    ///
    /// Reserves capacity for the new entry up front and aborts the process
    /// if the allocator can't grow the table, per spec §7's fatal-outcome
    /// tier: every node assumes its map has room, and there's no sensible
    /// error code to hand a caller if it doesn't.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        if self.inner.try_reserve(1).is_err() {
            crate::error::abort("child map allocation failed");
        }
        self.inner.insert(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.inner.remove(key)
    }

    pub fn size(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Comma-joined key list in (unspecified but, absent concurrent mutation,
/// stable) iteration order; the empty string for an empty map.
pub fn make_map_contents_string<V>(map: &ChildMap<V>) -> String {
    map.keys().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_renders_empty_string() {
        let map: ChildMap<u8> = ChildMap::new();
        assert_eq!(make_map_contents_string(&map), "");
    }

    #[test]
    fn renders_comma_joined_keys() {
        let mut map = ChildMap::new();
        map.insert("a".to_owned(), 1);
        map.insert("b".to_owned(), 2);
        let rendered = make_map_contents_string(&map);
        let mut parts: Vec<&str> = rendered.split(',').collect();
        parts.sort_unstable();
        assert_eq!(parts, vec!["a", "b"]);
    }

    #[test]
    fn insert_get_remove_roundtrip() {
        let mut map = ChildMap::new();
        assert_eq!(map.size(), 0);
        map.insert("x".to_owned(), 42);
        assert_eq!(map.get("x"), Some(&42));
        assert_eq!(map.size(), 1);
        assert_eq!(map.remove("x"), Some(42));
        assert_eq!(map.get("x"), None);
        assert!(map.is_empty());
    }
}
