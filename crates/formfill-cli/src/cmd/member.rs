use crate::output::print_json;
use formfill_core::Store;

pub fn add(store: &Store, id: &str, role: &str, json: bool) -> anyhow::Result<()> {
    let record = store.add_member(id, role)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "role": role, "record": record }))?;
    } else {
        println!("Added member '{id}' with role '{role}'.");
    }
    Ok(())
}
