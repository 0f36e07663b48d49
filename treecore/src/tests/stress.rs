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

//! A scaled-down version of the mixed-workload stress scenario: several
//! threads hammer `create`/`remove`/`list`/`move` over a small, bounded path
//! universe. `tree-bench` runs the full-size version of this as a separate
//! binary; this copy only needs to run fast enough for a test suite while
//! still giving the hand-over-hand/baton protocol a chance to misbehave
//! under `cargo test`'s parallelism.

use crate::Tree;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::thread;

const DEPTH: usize = 3;
const FANOUT: usize = 4;
const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 2_000;

fn random_path(rng: &mut impl Rng) -> String {
    let depth = rng.gen_range(1..=DEPTH);
    let mut path = String::from("/");
    for _ in 0..depth {
        path.push_str(&format!("n{}/", rng.gen_range(0..FANOUT)));
    }
    path
}

#[test]
fn mixed_concurrent_workload_never_deadlocks_or_aborts() {
    let tree = Arc::new(Tree::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|seed| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed as u64);
                for _ in 0..OPS_PER_THREAD {
                    match rng.gen_range(0..4) {
                        0 => {
                            let _ = tree.create(&random_path(&mut rng));
                        }
                        1 => {
                            let _ = tree.remove(&random_path(&mut rng));
                        }
                        2 => {
                            let _ = tree.list(&random_path(&mut rng));
                        }
                        _ => {
                            let _ = tree.mv(&random_path(&mut rng), &random_path(&mut rng));
                        }
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("worker thread panicked or the tree deadlocked");
    }
    // the tree must still be usable afterward: no primitive was left in a
    // state that blocks forever.
    assert!(tree.list("/").is_some());
}
