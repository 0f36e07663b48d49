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

use crate::{Tree, TreeError};

#[test]
fn fresh_root_lists_empty() {
    let tree = Tree::new();
    assert_eq!(tree.list("/"), Some(String::new()));
}

#[test]
fn root_rejects_create_remove_move() {
    let tree = Tree::new();
    assert_eq!(tree.create("/"), Err(TreeError::EExist));
    assert_eq!(tree.remove("/"), Err(TreeError::EBusy));
    assert_eq!(tree.mv("/", "/anywhere/"), Err(TreeError::EBusy));
    tree.create("/anywhere/").unwrap();
    assert_eq!(tree.mv("/anywhere/", "/"), Err(TreeError::EExist));
}

#[test]
fn oversized_and_malformed_segments_are_einval() {
    let tree = Tree::new();
    let too_long = "a".repeat(crate::MAX_FOLDER_NAME_LENGTH + 1);
    assert_eq!(tree.create(&format!("/{too_long}/")), Err(TreeError::EInval));
    assert_eq!(tree.create("/no-trailing-slash"), Err(TreeError::EInval));
    assert_eq!(tree.create("/a//b/"), Err(TreeError::EInval));
    assert_eq!(tree.create("/UPPER/"), Err(TreeError::EInval));
    assert_eq!(tree.create(""), Err(TreeError::EInval));
}

#[test]
fn remove_on_nonempty_leaves_tree_unchanged() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    tree.create("/a/b/").unwrap();
    assert_eq!(tree.remove("/a/"), Err(TreeError::ENotEmpty));
    assert_eq!(tree.list("/a/"), Some("b".to_owned()));
}

#[test]
fn move_source_missing_is_enoent() {
    let tree = Tree::new();
    tree.create("/dst/").unwrap();
    assert_eq!(tree.mv("/ghost/", "/dst/ghost/"), Err(TreeError::ENoent));
}

#[test]
fn move_missing_intermediate_is_enoent() {
    let tree = Tree::new();
    tree.create("/a/").unwrap();
    assert_eq!(tree.mv("/a/", "/nope/a/"), Err(TreeError::ENoent));
}
