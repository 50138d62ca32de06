use crate::field::{self, Field, Record};

/// Key holding a member's role tag.
pub const ROLE_KEY: &str = "role";

/// Fields every form asks about, whoever the member is.
const IDENTITY_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "date_of_birth",
    "birth_number",
    "place_of_birth",
    "nationality",
    "address.street",
    "address.city",
    "address.postal_code",
    "address.country",
];

const ADULT_FIELDS: &[&str] = &["phone", "email", "id_card_number", "employer"];

const CHILD_FIELDS: &[&str] = &[
    "health.insurance_company",
    "health.insurance_number",
    "health.allergies",
    "health.medications",
    "health.doctor",
    "school.name",
    "school.class",
    "school.address",
];

/// Family role of a member. Tags match case-insensitively; any other tag is
/// treated as [`Role::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The user filling in the forms.
    User,
    Parent,
    Child,
    Other,
}

impl Role {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "self" => Role::User,
            "parent" => Role::Parent,
            "child" => Role::Child,
            _ => Role::Other,
        }
    }

    /// Role of an existing record, from its `role` key.
    pub fn of(record: &Record) -> Self {
        record
            .get(ROLE_KEY)
            .and_then(Field::as_text)
            .map_or(Role::Other, Role::from_tag)
    }

    /// Canonical field paths for this role, in the order they are asked for.
    pub fn canonical_fields(self) -> Vec<&'static str> {
        let extra: &[&str] = match self {
            Role::User | Role::Parent => ADULT_FIELDS,
            Role::Child => CHILD_FIELDS,
            Role::Other => &[],
        };
        IDENTITY_FIELDS.iter().chain(extra).copied().collect()
    }

    /// A fresh record for this role: the role tag followed by a `null`
    /// placeholder for every canonical field.
    pub fn skeleton(self, tag: &str) -> Record {
        let mut record = Record::new();
        record.insert(ROLE_KEY.to_string(), Field::text(tag));
        for path in self.canonical_fields() {
            field::ensure_placeholder(&mut record, path);
        }
        record
    }
}
