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

//! Whole-tree tests that exercise `Tree`'s public surface only, as opposed
//! to the per-module unit tests colocated with each file. Mirrors a
//! concurrent caller: nothing here reaches into `crate::node` or
//! `crate::sync` directly.

mod boundary;
mod stress;
