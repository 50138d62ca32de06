use crate::output::print_json;
use formfill_core::Store;

/// The payload is the record itself, so it is printed as JSON in both modes.
pub fn run(store: &Store, member: Option<&str>) -> anyhow::Result<()> {
    let snapshot = store.show(member)?;
    print_json(&snapshot)
}
