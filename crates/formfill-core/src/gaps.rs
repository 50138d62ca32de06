use crate::error::{Result, StoreError};
use crate::field::{self, Field, FieldPath, Lookup, Record};
use crate::role::Role;
use indexmap::IndexSet;

/// Field paths of `record` that still need a value.
///
/// With `requested`, each path is checked in the given order: a missing path
/// or a placeholder is a gap, and a path naming a group reports the
/// placeholders inside it. Without it, the role's canonical fields are checked
/// first, followed by any other placeholder in the record.
pub fn find_gaps(record: &Record, requested: Option<&[FieldPath]>) -> Result<Vec<String>> {
    let mut gaps = IndexSet::new();
    match requested {
        Some(paths) => {
            for path in paths {
                check(record, path, &mut gaps)?;
            }
        }
        None => {
            for raw in Role::of(record).canonical_fields() {
                let path = FieldPath::parse(raw)?;
                // Canonical paths blocked by a user-set scalar are skipped.
                match check(record, &path, &mut gaps) {
                    Ok(()) | Err(StoreError::InvalidPath { .. }) => {}
                    Err(e) => return Err(e),
                }
            }
            gaps.extend(field::placeholder_leaves(record, ""));
        }
    }
    // A `null` group whose children are already gaps is filled through them.
    let reported: Vec<String> = gaps.iter().cloned().collect();
    Ok(gaps
        .into_iter()
        .filter(|gap| {
            let nested = format!("{gap}.");
            !reported.iter().any(|g| g.starts_with(&nested))
        })
        .collect())
}

fn check(record: &Record, path: &FieldPath, gaps: &mut IndexSet<String>) -> Result<()> {
    match field::lookup(record, path) {
        Lookup::Missing => {
            gaps.insert(path.to_string());
        }
        Lookup::Found(Field::Group(inner)) => {
            gaps.extend(field::placeholder_leaves(inner, &path.to_string()));
        }
        Lookup::Found(value) if value.is_placeholder() => {
            gaps.insert(path.to_string());
        }
        Lookup::Found(_) => {}
        Lookup::Blocked { at, found } => {
            return Err(StoreError::invalid_path(
                path.to_string(),
                format!("'{at}' holds a {found}, not an object"),
            ))
        }
    }
    Ok(())
}
