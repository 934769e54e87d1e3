//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `timsrun_core` linkage.
//! - Optionally print the stored roster, one line per person, in the same
//!   shape as the people list.
//!
//! The database is the first argument, or `timsrun.sqlite3` under
//! `TIMSRUN_DATA_DIR` when no argument is given.

use std::path::PathBuf;
use timsrun_core::{usual_line, CoreConfig, PeopleStore, SqliteBlobStore};

fn main() {
    println!("timsrun_core ping={}", timsrun_core::ping());
    println!("timsrun_core version={}", timsrun_core::core_version());

    let db_path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match CoreConfig::from_env() {
            Ok(config) => config.db_path(),
            Err(_) => return,
        },
    };

    match SqliteBlobStore::open(&db_path) {
        Ok(blobs) => {
            let store = PeopleStore::load(blobs);
            println!("people={}", store.len());
            for person in store.all() {
                println!("{}: {}", person.name, usual_line(person));
            }
        }
        Err(err) => {
            eprintln!("failed to open {}: {err}", db_path.display());
            std::process::exit(1);
        }
    }
}
