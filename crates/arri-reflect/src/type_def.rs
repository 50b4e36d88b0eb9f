//! Type definitions produced by the reflector and their Arri JSON form.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Boolean,
    Timestamp,
    Float32,
    Float64,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeDef {
    Primitive(PrimitiveKind),
    /// String enum; values in declaration order.
    Enum(Vec<String>),
    Object(ObjectDef),
    Array(Box<TypeDef>),
    /// String-keyed map of values.
    Record(Box<TypeDef>),
    Union(UnionDef),
    /// Back-reference to a composite already being expanded.
    Ref(String),
}

impl TypeDef {
    /// Model name of an object or union.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Object(object) => Some(object.id.as_str()),
            Self::Union(union) => Some(union.id.as_str()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectDef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionDef> {
        match self {
            Self::Union(union) => Some(union),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDef {
    pub id: String,
    pub description: Option<String>,
    /// Fields keyed by serialized key, in declaration order.
    pub fields: IndexMap<String, FieldDef>,
}

impl ObjectDef {
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.get(key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    /// Declared identifier.
    pub name: String,
    pub key: String,
    pub type_def: TypeDef,
    pub description: Option<String>,
    pub is_optional: bool,
    pub is_nullable: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnionDef {
    pub id: String,
    pub description: Option<String>,
    pub discriminator_key: String,
    /// Alternatives keyed by discriminator value.
    pub alternatives: IndexMap<String, ObjectDef>,
}

// ============================================================================
// Arri JSON
// ============================================================================

impl Serialize for TypeDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Node {
            def: self,
            nullable: false,
            description: None,
        }
        .serialize(serializer)
    }
}

impl Serialize for ObjectDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        object_entries(&mut map, self)?;
        let metadata = Metadata::new(Some(self.id.as_str()), self.description.as_deref());
        map.serialize_entry("metadata", &metadata)?;
        map.end()
    }
}

/// A type definition in field position, carrying the field-level flags.
struct Node<'a> {
    def: &'a TypeDef,
    nullable: bool,
    description: Option<&'a str>,
}

impl Serialize for Node<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let metadata = match self.def {
            TypeDef::Primitive(kind) => {
                map.serialize_entry("type", kind.as_str())?;
                Metadata::new(None, self.description)
            }
            TypeDef::Enum(values) => {
                map.serialize_entry("enum", values)?;
                Metadata::new(None, self.description)
            }
            TypeDef::Object(object) => {
                object_entries(&mut map, object)?;
                let description = self.description.or(object.description.as_deref());
                Metadata::new(Some(object.id.as_str()), description)
            }
            TypeDef::Array(element) => {
                map.serialize_entry("elements", element.as_ref())?;
                Metadata::new(None, self.description)
            }
            TypeDef::Record(value) => {
                map.serialize_entry("values", value.as_ref())?;
                Metadata::new(None, self.description)
            }
            TypeDef::Union(union) => {
                map.serialize_entry("discriminator", &union.discriminator_key)?;
                map.serialize_entry("mapping", &union.alternatives)?;
                let description = self.description.or(union.description.as_deref());
                Metadata::new(Some(union.id.as_str()), description)
            }
            TypeDef::Ref(name) => {
                map.serialize_entry("ref", name)?;
                Metadata::new(None, self.description)
            }
        };
        if self.nullable {
            map.serialize_entry("isNullable", &true)?;
        }
        if !metadata.is_empty() {
            map.serialize_entry("metadata", &metadata)?;
        }
        map.end()
    }
}

fn object_entries<M: SerializeMap>(map: &mut M, object: &ObjectDef) -> Result<(), M::Error> {
    map.serialize_entry(
        "properties",
        &Properties {
            object,
            optional: false,
        },
    )?;
    if object.fields.values().any(|field| field.is_optional) {
        map.serialize_entry(
            "optionalProperties",
            &Properties {
                object,
                optional: true,
            },
        )?;
    }
    Ok(())
}

struct Properties<'a> {
    object: &'a ObjectDef,
    optional: bool,
}

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, field) in &self.object.fields {
            if field.is_optional != self.optional {
                continue;
            }
            let node = Node {
                def: &field.type_def,
                nullable: field.is_nullable,
                description: field.description.as_deref(),
            };
            map.serialize_entry(key, &node)?;
        }
        map.end()
    }
}

#[derive(serde::Serialize)]
struct Metadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl<'a> Metadata<'a> {
    fn new(id: Option<&'a str>, description: Option<&'a str>) -> Self {
        Self { id, description }
    }

    fn is_empty(&self) -> bool {
        self.id.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(name: &str, type_def: TypeDef) -> FieldDef {
        FieldDef {
            name: name.to_string(),
            key: name.to_string(),
            type_def,
            description: None,
            is_optional: false,
            is_nullable: false,
        }
    }

    #[test]
    fn primitive_kinds_render_lowercase() {
        assert_eq!(PrimitiveKind::Uint64.to_string(), "uint64");
        assert_eq!(PrimitiveKind::Timestamp.as_str(), "timestamp");
    }

    #[test]
    fn object_splits_optional_properties() {
        let mut note = field("note", TypeDef::Primitive(PrimitiveKind::String));
        note.is_optional = true;
        note.is_nullable = true;
        let strings = TypeDef::Array(Box::new(TypeDef::Primitive(PrimitiveKind::String)));
        let mut tags = field("tags", strings);
        tags.description = Some("free-form labels".to_string());

        let object = TypeDef::Object(ObjectDef {
            id: "Post".to_string(),
            description: Some("A post".to_string()),
            fields: [
                ("id".to_string(), field("id", TypeDef::Primitive(PrimitiveKind::Uint32))),
                ("tags".to_string(), tags),
                ("note".to_string(), note),
            ]
            .into_iter()
            .collect(),
        });

        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({
                "properties": {
                    "id": { "type": "uint32" },
                    "tags": {
                        "elements": { "type": "string" },
                        "metadata": { "description": "free-form labels" }
                    }
                },
                "optionalProperties": {
                    "note": { "type": "string", "isNullable": true }
                },
                "metadata": { "id": "Post", "description": "A post" }
            })
        );
    }

    #[test]
    fn empty_object_keeps_properties() {
        let object = TypeDef::Object(ObjectDef {
            id: "Empty".to_string(),
            description: None,
            fields: IndexMap::new(),
        });
        assert_eq!(
            serde_json::to_value(&object).unwrap(),
            json!({ "properties": {}, "metadata": { "id": "Empty" } })
        );
    }

    #[test]
    fn leaves_and_refs() {
        let record = TypeDef::Record(Box::new(TypeDef::Ref("Node".to_string())));
        assert_eq!(
            serde_json::to_value(record).unwrap(),
            json!({ "values": { "ref": "Node" } })
        );
        assert_eq!(
            serde_json::to_value(TypeDef::Enum(vec!["A".to_string(), "B".to_string()])).unwrap(),
            json!({ "enum": ["A", "B"] })
        );
    }
}
