//! Store maintenance commands.

use marketplace_store::db::{KeyHealth, StoreHealth};

use super::{CommandError, open_store, output};

/// Print per-key health, then fail if any key is corrupt.
pub fn check(json: bool) -> Result<(), CommandError> {
    let store = open_store()?;
    let health = store.health()?;

    if json {
        output::print_json(&serde_json::json!({
            "dataDir": store.medium().dir().display().to_string(),
            "vendors": describe(&health.vendors),
            "products": describe(&health.products),
            "session": describe(&health.session),
            "healthy": health.is_healthy(),
        }))?;
    } else {
        print_text(&store.medium().dir().display().to_string(), &health);
    }

    store.verify()?;
    Ok(())
}

/// Move corrupt keys aside, then print what was moved.
pub fn repair(json: bool) -> Result<(), CommandError> {
    let mut store = open_store()?;
    let moved = store.set_aside_corrupt()?;

    if json {
        output::print_json(&serde_json::json!({ "movedAside": moved }))?;
    } else if moved.is_empty() {
        println!("Nothing to repair");
    } else {
        for key in &moved {
            println!("Moved corrupt {key} to a backup; it now reads as empty");
        }
    }
    Ok(())
}

fn print_text(dir: &str, health: &StoreHealth) {
    println!("Store at {dir}");
    println!("  vendors:  {}", describe(&health.vendors));
    println!("  products: {}", describe(&health.products));
    println!("  session:  {}", describe(&health.session));
}

fn describe(state: &KeyHealth) -> String {
    match state {
        KeyHealth::Missing => "empty".to_owned(),
        KeyHealth::Ok { records } => format!("ok ({records} records)"),
        KeyHealth::Corrupt(reason) => format!("corrupt: {reason}"),
    }
}
