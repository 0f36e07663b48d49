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

use core::fmt;

/// Expected, synchronously reported outcomes of a tree operation.
///
/// These are never panics: every operation that can fail returns one of
/// these by value. Distinct from the fatal path in [`abort`], which is for
/// conditions the design assumes cannot happen (a poisoned primitive, an
/// allocator that can't grow the child map).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum TreeError {
    /// the path string is not well-formed
    EInval,
    /// the target of `create`/`move` already exists, or is the root
    EExist,
    /// an intermediate component (or the source of `move`) is missing
    ENoent,
    /// `remove` was asked to remove a non-empty folder
    ENotEmpty,
    /// the root was named as `remove`'s target or `move`'s source
    EBusy,
    /// `move`'s source is a prefix of its target (would move a folder into itself)
    EPrefix,
}

impl TreeError {
    /// The code's POSIX-flavored mnemonic, for logging and CLI rendering.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EInval => "EINVAL",
            Self::EExist => "EEXIST",
            Self::ENoent => "ENOENT",
            Self::ENotEmpty => "ENOTEMPTY",
            Self::EBusy => "EBUSY",
            Self::EPrefix => "EPREFIX",
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for TreeError {}

pub type TreeResult<T> = Result<T, TreeError>;

/// Abort the process on a synchronization-primitive failure.
///
/// Every node assumes its mutex and condition variables work; there is no
/// recovery path if they don't, so we log context and terminate rather than
/// let the caller observe a corrupted tree. `parking_lot`'s primitives don't
/// return `Result`s (no poisoning), so today the only caller of this is the
/// out-of-memory branch of [`crate::map::ChildMap::insert`], but it's kept
/// as a free function so any future fallible primitive has somewhere to
/// report to.
#[cold]
#[inline(never)]
pub fn abort(context: &str) -> ! {
    log::error!("fatal: {context}");
    std::process::abort()
}
