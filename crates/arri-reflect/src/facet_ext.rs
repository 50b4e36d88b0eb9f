//! Facet extension attributes written by `#[ArriType]`.

use facet::Field;

/// Namespace of the extension attrs below.
pub(crate) const ARRI_NS: &str = "arri";

/// Value of `layout` marking a struct as a union of its optional slots.
pub(crate) const LAYOUT_UNION: &str = "union";

/// Value of `layout` forcing a struct to stay an object.
pub(crate) const LAYOUT_OBJECT: &str = "object";

facet::define_attr_grammar! {
    ns "arri";
    crate_path $crate::facet_ext;

    /// arri-reflect extension attrs consumed by the reflector.
    pub enum Attr {
        /// Field-level explicit serialized key.
        Key(&'static str),
        /// Field-level discriminator value of a union slot.
        Tag(&'static str),
        /// Container-level discriminator key.
        Discriminator(&'static str),
        /// Container-level struct layout: `union` or `object`.
        Layout(&'static str),
        /// Field-level reason the field type has no schema representation.
        Unsupported(&'static str),
    }
}

/// Resolve a string-valued `#[facet(arri::<key> = "...")]` attr.
pub(crate) fn arri_attr(attrs: &'static [facet::Attr], key: &str) -> Option<&'static str> {
    for attr in attrs {
        if attr.ns != Some(ARRI_NS) || attr.key != key {
            continue;
        }

        if let Some(value) = attr.get_as::<&'static str>() {
            return Some(*value);
        }
    }

    None
}

pub(crate) fn field_attr(field: &Field, key: &str) -> Option<&'static str> {
    arri_attr(field.attributes, key)
}

/// Doc comment lines joined with newlines.
pub(crate) fn doc_to_description(doc: &'static [&'static str]) -> Option<String> {
    let description = doc
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");
    let description = description.trim();
    (!description.is_empty()).then(|| description.to_string())
}
