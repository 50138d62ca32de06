use crate::output::print_json;
use formfill_core::Store;

pub fn run(store: &Store, json: bool) -> anyhow::Result<()> {
    let exists = store.exists();
    if json {
        print_json(&serde_json::json!({ "path": store.path(), "exists": exists }))?;
    } else {
        let state = if exists { "exists" } else { "missing" };
        println!("{} ({state})", store.path().display());
    }
    Ok(())
}
