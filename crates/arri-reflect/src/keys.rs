//! Serialized key and discriminator tag resolution.

use convert_case::{Case, Casing};
use facet::Field;
use serde::{Deserialize, Serialize};

use crate::facet_ext::field_attr;

/// Casing policy applied to declared identifiers that carry no explicit key.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum KeyCasing {
    #[default]
    #[serde(rename = "camelCase")]
    #[strum(serialize = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    #[strum(serialize = "PascalCase")]
    PascalCase,
    #[serde(rename = "snake_case")]
    #[strum(serialize = "snake_case")]
    SnakeCase,
}

impl KeyCasing {
    pub fn apply(self, ident: &str) -> String {
        match self {
            Self::CamelCase => ident.to_case(Case::Camel),
            Self::PascalCase if is_pascal(ident) => ident.to_string(),
            Self::PascalCase => ident.to_case(Case::Pascal),
            Self::SnakeCase => ident.to_case(Case::Snake),
        }
    }
}

fn is_pascal(ident: &str) -> bool {
    ident.starts_with(|c: char| c.is_ascii_uppercase()) && !ident.contains('_')
}

/// Serialized key of a field.
///
/// An explicit key (`#[arri(key)]`, or a facet/serde rename) always wins over
/// the casing policy.
pub fn resolve_key(field: &Field, casing: KeyCasing) -> String {
    let explicit = match field_attr(field, "key") {
        Some(key) => Some(key),
        None if field.effective_name() != field.name => Some(field.effective_name()),
        None => None,
    };
    key_for(field.name, explicit, casing)
}

pub fn key_for(ident: &str, explicit: Option<&str>, casing: KeyCasing) -> String {
    match explicit {
        Some(key) => key.to_string(),
        None => casing.apply(ident.trim_start_matches("r#")),
    }
}

/// Discriminator value of a union alternative or enum value.
pub fn tag_for(ident: &str, tag: Option<&str>) -> String {
    match tag {
        Some(tag) => tag.to_string(),
        None => ident.to_case(Case::UpperSnake),
    }
}
