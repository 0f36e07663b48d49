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

//! `list <path>` / `create <path>` / `remove <path>` / `move <src> <dst>` /
//! `quit`, one line at a time. Each maps 1:1 onto a [`dirtree_core::Tree`]
//! operation; the result is printed the way `skysh` prints query results.

use crate::HISTORY_FILE;
use dirtree_core::Tree;
use rustyline::error::ReadlineError;
use rustyline::Editor;

pub fn start(tree: &Tree) -> rustyline::Result<()> {
    let mut editor = Editor::<()>::new();
    if editor.load_history(HISTORY_FILE).is_err() {
        println!("dirtreed — list/create/remove/move/quit");
    }

    loop {
        match editor.readline("dirtree> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line);
                if line == "quit" || line == "exit" {
                    break;
                }
                run_line(tree, line);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                log::error!("readline error: {e}");
                break;
            }
        }
    }

    editor.save_history(HISTORY_FILE).ok();
    println!("bye");
    Ok(())
}

/// Parse and execute one command line. Used both by the interactive loop
/// and by the seed-script replay in `main`.
pub fn run_line(tree: &Tree, line: &str) {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("list") => match parts.next() {
            Some(path) => match tree.list(path) {
                Some(listing) => println!("{listing}"),
                None => println!("ENOENT"),
            },
            None => eprintln!("usage: list <path>"),
        },
        Some("create") => match parts.next() {
            Some(path) => print_result(tree.create(path)),
            None => eprintln!("usage: create <path>"),
        },
        Some("remove") => match parts.next() {
            Some(path) => print_result(tree.remove(path)),
            None => eprintln!("usage: remove <path>"),
        },
        Some("move") => match (parts.next(), parts.next()) {
            (Some(src), Some(dst)) => print_result(tree.mv(src, dst)),
            _ => eprintln!("usage: move <source> <target>"),
        },
        Some(other) => eprintln!("unknown command {other:?} (try list/create/remove/move/quit)"),
        None => {}
    }
}

fn print_result(result: dirtree_core::TreeResult<()>) {
    match result {
        Ok(()) => println!("OK"),
        Err(e) => println!("{e}"),
    }
}
