//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `feedreader_core` linkage without any UI toolkit.
//! - Start core file logging under the system temp directory.
//! - Run the insert/read/update/delete sequence of the entry screen against
//!   a throwaway in-memory store and print each result.

use feedreader_core::{core_version, init_logging, EntryStore, LogLevel, StoreResult};
use std::path::PathBuf;

const LOG_DIR_NAME: &str = "feedreader-logs";

const SAMPLE_TITLE: &str = "Titre Exemple";
const SAMPLE_SUBTITLE: &str = "Sous-titre Exemple";
const RENAMED_TITLE: &str = "Nouveau Titre";

fn main() -> StoreResult<()> {
    println!("feedreader_core version={}", core_version());

    let log_dir = log_dir();
    match init_logging(
        LogLevel::default_for_build().as_str(),
        &log_dir.to_string_lossy(),
    ) {
        Ok(()) => println!("logging dir={}", log_dir.display()),
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let store = EntryStore::new();
    store.open_in_memory()?;

    let id = store.insert(Some(SAMPLE_TITLE), Some(SAMPLE_SUBTITLE))?;
    println!("insert id={id}");
    print_entries(&store)?;

    let updated = store.update_title(SAMPLE_TITLE, RENAMED_TITLE)?;
    println!("update rows={updated}");
    print_entries(&store)?;

    let deleted = store.delete_by_title(RENAMED_TITLE)?;
    println!("delete rows={deleted}");
    print_entries(&store)?;

    store.close()
}

/// Absolute directory for the probe's rolling log files.
fn log_dir() -> PathBuf {
    let temp = std::env::temp_dir();
    let temp = match std::env::current_dir() {
        Ok(cwd) if !temp.is_absolute() => cwd.join(temp),
        _ => temp,
    };
    temp.join(LOG_DIR_NAME)
}

fn print_entries(store: &EntryStore) -> StoreResult<()> {
    for entry in store.query_all("subtitle", true)? {
        println!(
            "  id={} title={} subtitle={}",
            entry.id,
            entry.title_or_empty(),
            entry.subtitle_or_empty()
        );
    }
    Ok(())
}
