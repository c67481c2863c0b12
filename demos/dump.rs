//! Print the structure of a game-record file.
//!
//! Run with: cargo run --example dump -- game.sgf [--json]
//!
//! Each game tree is printed on its own line, prefixed by one `-` per level of
//! nesting, followed by the identifiers found in each node of its mainline.
//! Skipped trees are reported through `env_logger` (set `RUST_LOG=warn`).

use sgf_tree::{from_reader, Collection, GameTreeRef};
use std::env;
use std::error::Error;
use std::fs::File;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} file.sgf [--json]");
    process::exit(1);
}

fn describe(tree: GameTreeRef<'_>) -> String {
    tree.sequence()
        .iter()
        .map(|node| {
            let idents: Vec<&str> = node.properties().iter().map(|p| p.ident().as_str()).collect();
            format!(";{}", idents.join(" "))
        })
        .collect()
}

fn dump_tree(tree: GameTreeRef<'_>, level: usize) {
    println!("{} {}", "-".repeat(level), describe(tree));
    for child in tree.children() {
        dump_tree(child, level + 1);
    }
}

fn dump(collection: &Collection) {
    for tree in collection.game_trees() {
        dump_tree(tree, 0);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("dump", String::as_str);
    let Some(path) = args.get(1) else {
        usage(program);
    };
    let json = match args.get(2).map(String::as_str) {
        None => false,
        Some("--json") => true,
        Some(_) => usage(program),
    };

    let file = File::open(path).map_err(|e| format!("Failed to open {path}: {e}"))?;
    let collection = from_reader(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&collection)?);
    } else {
        dump(&collection);
    }

    Ok(())
}
