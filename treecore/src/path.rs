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

//! Path string parsing and validation.
//!
//! spec.md treats this as an external collaborator ("path-string parsing
//! and validation") rather than part of the core's budget; there's no
//! standalone crate in the corpus that does exactly this, so it's kept as
//! its own small internal module with a narrow, explicit contract the rest
//! of the crate depends on.
//!
//! A valid path is `/` (the root) or `/name1/name2/.../nameK/`: it always
//! starts and ends with `/`, and every component is 1..=MAX_FOLDER_NAME_LENGTH
//! bytes drawn from [`is_permitted_char`].

/// Maximum length, in bytes, of a single folder name.
pub const MAX_FOLDER_NAME_LENGTH: usize = 64;

/// The character set a folder name may use: lowercase ASCII letters, digits,
/// `-` and `_`.
fn is_permitted_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_'
}

fn is_valid_component(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_FOLDER_NAME_LENGTH
        && name.bytes().all(is_permitted_char)
}

/// `/` matches trivially; otherwise every `/`-delimited component between
/// the leading and trailing slash must be non-empty and well-formed.
pub fn is_path_valid(p: &str) -> bool {
    if p == "/" {
        return true;
    }
    if !p.starts_with('/') || !p.ends_with('/') {
        return false;
    }
    let body = &p[1..p.len() - 1];
    !body.is_empty() && body.split('/').all(is_valid_component)
}

/// Consume the first component after the leading `/`.
///
/// Returns `(component, rest)` where `rest` still begins with `/`, or
/// `None` when `p` is `/` (nothing left to consume). Assumes `p` is valid.
pub fn split_path(p: &str) -> Option<(&str, &str)> {
    if p == "/" {
        return None;
    }
    let body = &p[1..];
    let slash = body.find('/').expect("well-formed path has a trailing slash");
    Some((&body[..slash], &body[slash..]))
}

/// Split a path into its parent path and its final component.
///
/// `/` has no parent and returns `None`. `/a/b/c/` returns
/// `(Some("/a/b/"), "c")`.
pub fn make_path_to_parent(p: &str) -> Option<(&str, &str)> {
    if p == "/" {
        return None;
    }
    let trimmed = &p[..p.len() - 1]; // drop the trailing slash
    let last_slash = trimmed.rfind('/').expect("well-formed path starts with /");
    Some((&p[..last_slash + 1], &trimmed[last_slash + 1..]))
}

/// Number of `/` characters in `p`.
pub fn count_slashes(p: &str) -> usize {
    p.bytes().filter(|&b| b == b'/').count()
}

/// Number of leading path components `p` and `q` share, plus one.
///
/// `common_files("/", "/") == 1`. Used by `move` to locate the depth of the
/// lowest common ancestor of two paths.
pub fn common_files(p: &str, q: &str) -> usize {
    let pc: Vec<&str> = p.split('/').filter(|s| !s.is_empty()).collect();
    let qc: Vec<&str> = q.split('/').filter(|s| !s.is_empty()).collect();
    let shared = pc.iter().zip(qc.iter()).take_while(|(a, b)| a == b).count();
    shared + 1
}

/// `true` if `ancestor` names a *strict* ancestor directory of
/// `descendant` (equal paths don't count — a self-move falls through to
/// `move`'s ordinary "target already exists" check instead). Used by
/// `move` to reject relocating a folder into its own subtree.
pub fn is_prefix_path(ancestor: &str, descendant: &str) -> bool {
    ancestor != descendant && descendant.starts_with(ancestor)
}

/// Split `path` into the prefix made of its first `depth` components and
/// the suffix made of the rest (suffix always starts and ends with `/`,
/// and is `/` when `depth` reaches the end of `path`).
///
/// Used by `move` to walk from the root to the lowest common ancestor of
/// two paths, then from the LCA onward to each parent.
pub fn path_prefix_and_suffix(path: &str, depth: usize) -> (String, String) {
    let components: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let render = |parts: &[&str]| {
        let mut s = String::from("/");
        for c in parts {
            s.push_str(c);
            s.push('/');
        }
        s
    };
    let depth = depth.min(components.len());
    (render(&components[..depth]), render(&components[depth..]))
}
