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

//! Per-node reader/writer monitor with a "change" baton and a quiescence
//! channel, grounded in the hand-rolled condvar monitor in
//! `coredb::htable::Cvar` and the low-level primitives in `engine::sync`.
//!
//! All four condition variables (`readers`, `writers`, `clear`, plus the
//! mutex that guards the counters) live here; [`crate::node::Node`] only
//! ever calls the four public entry points. `change`'s meaning:
//! `change > 0` → a writer just released and is handing `change`
//! reader-admissions through; `change < 0` → a reader/writer just released
//! and is handing exactly one writer-admission; `change == 0` → no pending
//! baton. See spec §4.C for the full protocol this implements.

use parking_lot::{Condvar, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Counters {
    rcount: u32,
    wcount: u32,
    rwait: u32,
    wwait: u32,
    change: i32,
    cwait: bool,
}

impl Counters {
    fn is_quiescent(&self) -> bool {
        self.rcount == 0 && self.wcount == 0 && self.rwait == 0 && self.wwait == 0
    }
}

/// The synchronization state carried by every node: two mutex-guarded
/// counters, a scheduling baton, and three condition variables.
#[derive(Debug, Default)]
pub(crate) struct NodeSync {
    state: Mutex<Counters>,
    readers: Condvar,
    writers: Condvar,
    clear: Condvar,
}

impl NodeSync {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Block until the calling reader is admitted, then record it as active.
    pub(crate) fn enter_reader(&self) {
        let mut g = self.state.lock();
        while (g.wcount > 0 || g.wwait > 0) && g.change <= 0 {
            g.rwait += 1;
            self.readers.wait(&mut g);
            g.rwait -= 1;
        }
        g.rcount += 1;
        if g.change > 0 {
            g.change -= 1;
            if g.change > 0 {
                // chain-wake: hand the rest of the batch to the next waiting reader
                self.readers.notify_one();
            }
        }
    }

    pub(crate) fn exit_reader(&self) {
        let mut g = self.state.lock();
        g.rcount -= 1;
        if g.rcount == 0 && g.wwait > 0 {
            g.change = -1;
            self.writers.notify_one();
        } else if g.cwait {
            self.clear.notify_all();
        }
    }

    /// Block until the calling writer is admitted, then record it as active.
    pub(crate) fn enter_writer(&self) {
        let mut g = self.state.lock();
        while g.rcount > 0 || g.wcount > 0 || g.change > 0 {
            g.wwait += 1;
            self.writers.wait(&mut g);
            g.wwait -= 1;
        }
        g.wcount += 1;
        g.change = 0;
    }

    pub(crate) fn exit_writer(&self) {
        let mut g = self.state.lock();
        g.wcount -= 1;
        if g.rwait > 0 {
            // admit every reader currently waiting; each one that wakes
            // chain-wakes the next via enter_reader's own notify_one
            g.change = g.rwait as i32;
            self.readers.notify_one();
        } else if g.wwait > 0 {
            g.change = -1;
            self.writers.notify_one();
        } else if g.cwait {
            self.clear.notify_all();
        }
    }

    /// Block until no reader, writer or waiter remains on this node.
    ///
    /// Used directly by `remove` (on the child about to be unlinked) and by
    /// subtree quiescence (on every node of a subtree being moved). Callers
    /// are responsible for ensuring no *new* traffic can reach this node
    /// while waiting (by holding a writer lock on its parent).
    pub(crate) fn await_quiescence(&self) {
        let mut g: MutexGuard<'_, Counters> = self.state.lock();
        while !g.is_quiescent() {
            g.cwait = true;
            self.clear.wait(&mut g);
            g.cwait = false;
        }
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> (u32, u32, u32, u32, i32) {
        let g = self.state.lock();
        (g.rcount, g.wcount, g.rwait, g.wwait, g.change)
    }
}
