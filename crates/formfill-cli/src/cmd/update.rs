use crate::output::print_json;
use anyhow::Context;
use formfill_core::store::parse_updates;
use formfill_core::{FieldChange, FieldPath, Store};

fn describe(change: &FieldChange) -> String {
    let previous = change
        .previous
        .as_ref()
        .map_or_else(|| "(unset)".to_string(), ToString::to_string);
    format!(
        "{}.{}: {} -> {}",
        change.member, change.field, previous, change.value
    )
}

pub fn run(store: &Store, member: &str, field: &str, value: &str, json: bool) -> anyhow::Result<()> {
    let path = FieldPath::parse(field)?;
    let change = store.update(member, &path, value)?;

    if json {
        print_json(&serde_json::json!({
            "member": member,
            "field": change.field,
            "previous": change.previous,
            "value": change.value,
            "saved": store.path(),
        }))?;
    } else {
        println!("Updated {}", describe(&change));
        println!("Saved: {}", store.path().display());
    }
    Ok(())
}

pub fn run_batch(store: &Store, member: &str, updates: &str, json: bool) -> anyhow::Result<()> {
    let updates = parse_updates(updates)?;
    let changes = store
        .batch_update(member, &updates)
        .with_context(|| format!("batch update of '{member}' aborted; nothing was saved"))?;

    if json {
        print_json(&serde_json::json!({
            "member": member,
            "changes": changes,
            "saved": store.path(),
        }))?;
    } else {
        for change in &changes {
            println!("  {}", describe(change));
        }
        println!("Updated {} field(s).", changes.len());
        println!("Saved: {}", store.path().display());
    }
    Ok(())
}
