use crate::field::{Field, Record};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Key that identified a member in the legacy list layout.
pub const LEGACY_ID_KEY: &str = "id";

#[derive(Deserialize)]
#[serde(untagged)]
enum MembersLayout {
    Keyed(IndexMap<String, Record>),
    Legacy(Vec<Record>),
}

/// Deserialize `members` in either layout.
///
/// The current layout is an object keyed by member id. Older files store a
/// list of records each carrying an `id`; those are converted to the keyed
/// layout with the `id` key removed, and the next save writes the new layout.
pub fn deserialize_members<'de, D>(deserializer: D) -> Result<IndexMap<String, Record>, D::Error>
where
    D: Deserializer<'de>,
{
    match MembersLayout::deserialize(deserializer)? {
        MembersLayout::Keyed(members) => Ok(members),
        MembersLayout::Legacy(list) => upgrade_member_list(list).map_err(D::Error::custom),
    }
}

fn upgrade_member_list(list: Vec<Record>) -> Result<IndexMap<String, Record>, String> {
    let mut members = IndexMap::with_capacity(list.len());
    for (index, mut record) in list.into_iter().enumerate() {
        let id = match record.shift_remove(LEGACY_ID_KEY) {
            Some(Field::Text(id)) if !id.trim().is_empty() => id,
            _ => return Err(format!("member #{index} has no '{LEGACY_ID_KEY}'")),
        };
        if members.contains_key(&id) {
            return Err(format!("duplicate member id '{id}'"));
        }
        members.insert(id, record);
    }
    Ok(members)
}
