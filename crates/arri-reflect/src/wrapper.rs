//! `Optional` / `Nullable` field wrappers and the classifier that recognizes them.
//!
//! `Optional<T>` marks a key that may be missing from the payload. `Nullable<T>`
//! marks a key that is always present but may carry `null`. The two compose:
//! `Optional<Nullable<T>>` may be missing, null, or set.

use facet::{Def, Facet, Shape, Type, UserType};
use facet_reflect::Peek;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum WrapperKind {
    Optional,
    Nullable,
}

// ============================================================================
// Optional
// ============================================================================

/// A value whose key may be omitted entirely.
///
/// On `#[ArriType]` structs the key is dropped when absent and defaulted when
/// missing. Hand-written serde types need
/// `#[serde(default, skip_serializing_if = "Optional::is_absent")]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, facet::Facet)]
pub struct Optional<T> {
    value: Option<T>,
}

impl<T> Optional<T> {
    pub const fn absent() -> Self {
        Self { value: None }
    }

    pub const fn present(value: T) -> Self {
        Self { value: Some(value) }
    }

    pub const fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub const fn is_absent(&self) -> bool {
        self.value.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn set(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    pub fn into_option(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        Self { value }
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.value {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::present)
    }
}

// ============================================================================
// Nullable
// ============================================================================

/// A value whose key is always written, as `null` when unset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, facet::Facet)]
pub struct Nullable<T> {
    value: Option<T>,
}

impl<T> Nullable<T> {
    pub const fn null() -> Self {
        Self { value: None }
    }

    pub const fn new(value: T) -> Self {
        Self { value: Some(value) }
    }

    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub const fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn replace(&mut self, value: Option<T>) -> Option<T> {
        std::mem::replace(&mut self.value, value)
    }

    pub fn into_option(self) -> Option<T> {
        self.value
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Self { value }
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Wrapper kind of `shape` itself, without looking through indirection.
///
/// Both wrappers are a struct named `Optional`/`Nullable` holding a single
/// `value: Option<T>` slot.
pub(crate) fn wrapper_kind(shape: &'static Shape) -> Option<WrapperKind> {
    let kind = match shape.type_identifier {
        "Optional" => WrapperKind::Optional,
        "Nullable" => WrapperKind::Nullable,
        _ => return None,
    };
    wrapper_slot(shape).map(|_| kind)
}

/// Shape of `T` inside `Optional<T>` / `Nullable<T>`.
fn wrapper_slot(shape: &'static Shape) -> Option<&'static Shape> {
    let Type::User(UserType::Struct(structure)) = &shape.ty else {
        return None;
    };
    let [field] = structure.fields else {
        return None;
    };
    if field.name != "value" {
        return None;
    }
    match field.shape().def {
        Def::Option(def) => Some(def.t()),
        _ => None,
    }
}

/// Inner shape of a wrapper, looking through one level of `Box`/`Rc`/`Arc`
/// or `Option`.
pub fn unwrap_wrapper(shape: &'static Shape) -> Option<(WrapperKind, &'static Shape)> {
    let shape = match shape.def {
        Def::Pointer(def) => def.pointee()?,
        Def::Option(def) => def.t(),
        _ => shape,
    };
    let kind = wrapper_kind(shape)?;
    wrapper_slot(shape).map(|inner| (kind, inner))
}

pub fn classify_optional(shape: &'static Shape) -> bool {
    matches!(unwrap_wrapper(shape), Some((WrapperKind::Optional, _)))
}

pub fn classify_nullable(shape: &'static Shape) -> bool {
    matches!(unwrap_wrapper(shape), Some((WrapperKind::Nullable, _)))
}

/// Whether `value` is, or points at, an `Optional` holding a value.
///
/// Accepts the wrapper itself, a `Box`/`Rc`/`Arc` of it, or an `Option` of it.
pub fn optional_has_value<T: for<'a> Facet<'a>>(value: &T) -> bool {
    holds_value(Peek::new(value), WrapperKind::Optional, true)
}

/// Whether `value` is, or points at, a `Nullable` that is not null.
pub fn nullable_has_value<T: for<'a> Facet<'a>>(value: &T) -> bool {
    holds_value(Peek::new(value), WrapperKind::Nullable, true)
}

fn holds_value(peek: Peek<'_, '_>, kind: WrapperKind, indirection: bool) -> bool {
    match peek.shape().def {
        Def::Pointer(_) if indirection => {
            let Ok(pointer) = peek.into_pointer() else {
                return false;
            };
            pointer
                .borrow_inner()
                .is_some_and(|inner| holds_value(inner, kind, false))
        }
        Def::Option(_) if indirection => {
            let Ok(option) = peek.into_option() else {
                return false;
            };
            option
                .value()
                .is_some_and(|inner| holds_value(inner, kind, false))
        }
        _ => wrapper_kind(peek.shape()) == Some(kind) && slot_is_set(peek),
    }
}

/// Whether the `value` slot of a wrapper peek holds `Some`.
pub(crate) fn slot_is_set(peek: Peek<'_, '_>) -> bool {
    let Ok(structure) = peek.into_struct() else {
        return false;
    };
    let Ok(slot) = structure.field(0) else {
        return false;
    };
    slot.into_option()
        .is_ok_and(|option| option.value().is_some())
}
