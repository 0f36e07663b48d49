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

//! Mixed-workload concurrency stress harness for `dirtree-core`, i.e.
//! spec.md §8's concrete scenario 6: many threads hammering
//! `create`/`remove`/`list`/`move` over a bounded path universe, checked
//! only for absence of deadlock/abort, not for throughput.
//!
//! Deliberately not wired into `cargo test` — this is a separate opt-in
//! binary, the way `stress-test` sits apart from `testsuite` in the corpus.

use crossbeam_channel::unbounded;
use dirtree_core::Tree;
use rand::{Rng, SeedableRng};
use std::env;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

const DEFAULT_OPS_PER_THREAD: usize = 100_000;
const PATH_DEPTH: usize = 4;
const PATH_FANOUT: usize = 8;

#[derive(Debug, Default)]
struct ThreadStats {
    creates: usize,
    removes: usize,
    lists: usize,
    moves: usize,
    ok: usize,
    err: usize,
}

fn random_path(rng: &mut impl Rng) -> String {
    let depth = rng.gen_range(1..=PATH_DEPTH);
    let mut path = String::from("/");
    for _ in 0..depth {
        path.push_str(&format!("p{}/", rng.gen_range(0..PATH_FANOUT)));
    }
    path
}

fn main() {
    env_logger::Builder::new()
        .parse_filters(&env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()))
        .init();

    let threads: usize = env::var("DIRTREE_BENCH_THREADS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(num_cpus::get);
    let ops_per_thread: usize = env::var("DIRTREE_BENCH_OPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_OPS_PER_THREAD);

    log::info!("spawning {threads} workers, {ops_per_thread} ops each");

    let tree = Arc::new(Tree::new());
    let (tx, rx) = unbounded::<ThreadStats>();
    let started = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|seed| {
            let tree = Arc::clone(&tree);
            let tx = tx.clone();
            thread::Builder::new()
                .name(format!("dirtree-bench-{seed}"))
                .spawn(move || {
                    let mut rng = rand::rngs::StdRng::seed_from_u64(seed as u64);
                    let mut stats = ThreadStats::default();
                    for _ in 0..ops_per_thread {
                        match rng.gen_range(0..4) {
                            0 => {
                                stats.creates += 1;
                                tally(&mut stats, tree.create(&random_path(&mut rng)).is_ok());
                            }
                            1 => {
                                stats.removes += 1;
                                tally(&mut stats, tree.remove(&random_path(&mut rng)).is_ok());
                            }
                            2 => {
                                stats.lists += 1;
                                tally(&mut stats, tree.list(&random_path(&mut rng)).is_some());
                            }
                            _ => {
                                stats.moves += 1;
                                let (src, dst) = (random_path(&mut rng), random_path(&mut rng));
                                tally(&mut stats, tree.mv(&src, &dst).is_ok());
                            }
                        }
                    }
                    tx.send(stats).expect("bench report channel closed early");
                })
                .expect("failed to spawn worker thread")
        })
        .collect();

    drop(tx);
    for h in handles {
        h.join().expect("worker thread panicked — deadlock or a fatal abort");
    }

    let elapsed = started.elapsed();
    let total = rx.into_iter().fold(ThreadStats::default(), |mut acc, s| {
        acc.creates += s.creates;
        acc.removes += s.removes;
        acc.lists += s.lists;
        acc.moves += s.moves;
        acc.ok += s.ok;
        acc.err += s.err;
        acc
    });
    let total_ops = total.creates + total.removes + total.lists + total.moves;

    log::info!(
        "done in {:.2}s: {total_ops} ops ({} create, {} remove, {} list, {} move; {} ok, {} rejected)",
        elapsed.as_secs_f64(),
        total.creates,
        total.removes,
        total.lists,
        total.moves,
        total.ok,
        total.err,
    );
    println!(
        "{total_ops} ops across {threads} threads in {:.2}s ({:.0} ops/s)",
        elapsed.as_secs_f64(),
        total_ops as f64 / elapsed.as_secs_f64().max(1e-9)
    );
}

fn tally(stats: &mut ThreadStats, succeeded: bool) {
    if succeeded {
        stats.ok += 1;
    } else {
        stats.err += 1;
    }
}
