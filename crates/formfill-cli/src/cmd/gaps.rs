use crate::output::print_json;
use formfill_core::{FieldPath, Store};

pub fn run(store: &Store, member: &str, fields: Option<&str>, json: bool) -> anyhow::Result<()> {
    let requested = fields.map(FieldPath::parse_list).transpose()?;
    let gaps = store.find_gaps(member, requested.as_deref())?;

    if json {
        return print_json(&serde_json::json!({ "member": member, "gaps": gaps }));
    }

    if gaps.is_empty() {
        match fields {
            Some(f) => println!("No missing fields for '{member}' (filtered: {f})"),
            None => println!("No missing fields for '{member}'"),
        }
    } else {
        println!("Missing fields for '{member}':");
        for gap in &gaps {
            println!("  - {gap}");
        }
    }
    Ok(())
}
