use crate::output::print_json;
use formfill_core::Store;
use std::path::Path;

pub fn run(store: &Store, template: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let doc = store.init(template)?;

    if json {
        print_json(&serde_json::json!({
            "path": store.path(),
            "template": doc.template,
            "members": doc.members.keys().collect::<Vec<_>>(),
        }))?;
    } else {
        if let Some(t) = &doc.template {
            println!("Seeded from template: {}", t.display());
        }
        println!("Initialized personal data at: {}", store.path().display());
    }
    Ok(())
}
