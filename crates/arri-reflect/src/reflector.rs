//! Reflector - walks facet shapes to build type definitions.
//!
//! One traversal owns one visiting set. A composite is inserted before its
//! children are built and removed once it is finished, so re-entering it
//! through a cycle yields a `Ref` while sibling uses expand in full.

use std::collections::HashSet;

use facet::{ConstTypeId, Def, EnumType, Facet, Field, ScalarType, Shape, StructType, Type, UserType};
use facet_reflect::{HasFields, Peek};
use indexmap::IndexMap;
use tracing::trace;

use crate::error::{ROOT_PATH, ReflectError, render_path};
use crate::facet_ext::{LAYOUT_OBJECT, LAYOUT_UNION, arri_attr, doc_to_description, field_attr};
use crate::keys::{KeyCasing, resolve_key, tag_for};
use crate::route::is_request_context;
use crate::timestamp::is_timestamp;
use crate::type_def::{FieldDef, ObjectDef, PrimitiveKind, TypeDef, UnionDef};
use crate::wrapper::{WrapperKind, unwrap_wrapper, wrapper_kind};

/// Discriminator key used when a union names none.
pub const DEFAULT_DISCRIMINATOR: &str = "type";

/// Build the type definition of `T`.
pub fn reflect<T: for<'a> Facet<'a>>(casing: KeyCasing) -> Result<TypeDef, ReflectError> {
    reflect_shape(<T as Facet<'static>>::SHAPE, casing)
}

#[tracing::instrument(
    level = "debug",
    name = "arri.reflect",
    skip_all,
    fields(root = shape.type_identifier, casing = %casing)
)]
pub fn reflect_shape(shape: &'static Shape, casing: KeyCasing) -> Result<TypeDef, ReflectError> {
    Reflector::new(casing).build_type_def(shape)
}

/// Build the type definition of a live value.
///
/// Same as [`reflect`], except that every union reachable in `value` must hold
/// exactly one alternative.
#[tracing::instrument(
    level = "debug",
    name = "arri.reflect_value",
    skip_all,
    fields(root = std::any::type_name::<T>(), casing = %casing)
)]
pub fn reflect_value<T: for<'a> Facet<'a>>(
    value: &T,
    casing: KeyCasing,
) -> Result<TypeDef, ReflectError> {
    let mut reflector = Reflector::new(casing);
    let def = reflector.build_type_def(<T as Facet<'static>>::SHAPE)?;
    reflector.check_value(Peek::new(value))?;
    Ok(def)
}

/// Active discriminator of a union value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discriminant {
    pub key: String,
    pub tag: String,
    /// Declared identifier of the populated alternative.
    pub alternative: &'static str,
}

/// Discriminator key and tag of the alternative populated in `value`.
///
/// Looks through `Box`/`Rc`/`Arc` at the root. Returns `None` when the value
/// is not union-shaped.
pub fn discriminate<T: for<'a> Facet<'a>>(
    value: &T,
) -> Result<Option<Discriminant>, ReflectError> {
    discriminate_peek(Peek::new(value))
}

fn discriminate_peek(peek: Peek<'_, '_>) -> Result<Option<Discriminant>, ReflectError> {
    let shape = peek.shape();
    if let Def::Pointer(_) = shape.def {
        let Ok(pointer) = peek.into_pointer() else {
            return Ok(None);
        };
        return match pointer.borrow_inner() {
            Some(inner) => discriminate_peek(inner),
            None => Ok(None),
        };
    }

    let Some(layout) = union_layout(shape).map_err(|issue| issue.into_error(shape, &[]))? else {
        return Ok(None);
    };
    let active = active_alternatives(peek, &layout, &[])?;
    let [position] = active.as_slice() else {
        return Err(ReflectError::AmbiguousUnion {
            path: ROOT_PATH.to_string(),
            type_name: shape.type_identifier,
            populated: active.len(),
        });
    };
    let alternative = &layout.alternatives[*position];

    Ok(Some(Discriminant {
        key: layout.discriminator.to_string(),
        tag: alternative.tag.clone(),
        alternative: alternative.ident,
    }))
}

/// Model name of a composite: its rename, else its type name with generic
/// arguments in brackets (`Page[Message]`).
pub fn model_name(shape: &'static Shape) -> String {
    if shape.rename.is_some() {
        return shape.effective_name().to_string();
    }
    if let Some(name) = shape.get_builtin_attr_value::<&'static str>("rename") {
        return name.to_string();
    }

    shape
        .to_string()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '<' => '[',
            '>' => ']',
            c => c,
        })
        .collect()
}

// ============================================================================
// Union layout
// ============================================================================

#[derive(Clone, Copy)]
enum Selector {
    /// Optional slot of a struct, by field index.
    Slot(usize),
    /// Newtype variant of an enum.
    Variant,
}

struct Alternative {
    ident: &'static str,
    tag: String,
    description: Option<String>,
    selector: Selector,
    /// Alternative payload with any pointer stripped.
    target: &'static Shape,
}

struct UnionLayout {
    discriminator: &'static str,
    alternatives: Vec<Alternative>,
}

enum LayoutIssue {
    NoAlternatives,
    NotASlot(&'static str),
    NotANewtype(&'static str),
}

impl LayoutIssue {
    fn into_error(self, shape: &'static Shape, path: &[String]) -> ReflectError {
        let reason = match self {
            Self::NoAlternatives => {
                return ReflectError::AmbiguousUnion {
                    path: render_path(path),
                    type_name: shape.type_identifier,
                    populated: 0,
                };
            }
            Self::NotASlot(ident) => format!(
                "field `{ident}` of a discriminated struct must be an optional struct; \
                 mark the struct `#[arri(object)]` to keep it an object"
            ),
            Self::NotANewtype(ident) => format!("variant `{ident}` must wrap exactly one struct"),
        };
        ReflectError::UnsupportedType {
            path: render_path(path),
            type_name: shape.type_identifier,
            reason,
        }
    }
}

fn union_layout(shape: &'static Shape) -> Result<Option<UnionLayout>, LayoutIssue> {
    if wrapper_kind(shape).is_some() || is_timestamp(shape) || is_request_context(shape) {
        return Ok(None);
    }
    match &shape.ty {
        Type::User(UserType::Struct(structure)) => struct_layout(shape, structure),
        Type::User(UserType::Enum(enumeration)) if !is_fieldless(enumeration) => {
            enum_layout(shape, enumeration).map(Some)
        }
        _ => Ok(None),
    }
}

/// A struct is a union when it is marked as one, or when it carries no layout
/// marker and every serializable field is an optional slot holding a struct.
fn struct_layout(
    shape: &'static Shape,
    structure: &'static StructType,
) -> Result<Option<UnionLayout>, LayoutIssue> {
    let discriminator = arri_attr(shape.attributes, "discriminator");
    let forced = match arri_attr(shape.attributes, "layout") {
        Some(LAYOUT_OBJECT) => return Ok(None),
        Some(LAYOUT_UNION) => true,
        _ => discriminator.is_some(),
    };

    let mut alternatives = Vec::new();
    for (index, field) in structure.fields.iter().enumerate() {
        if field.should_skip_deserializing() {
            continue;
        }
        match slot_target(field.shape()) {
            Some(target) => alternatives.push(Alternative {
                ident: field.name,
                tag: tag_for(field.name, field_attr(field, "tag")),
                description: doc_to_description(field.doc),
                selector: Selector::Slot(index),
                target,
            }),
            None if forced => return Err(LayoutIssue::NotASlot(field.name)),
            None => return Ok(None),
        }
    }

    match alternatives.is_empty() {
        true if forced => Err(LayoutIssue::NoAlternatives),
        true => Ok(None),
        false => Ok(Some(UnionLayout {
            discriminator: discriminator.unwrap_or(DEFAULT_DISCRIMINATOR),
            alternatives,
        })),
    }
}

fn enum_layout(
    shape: &'static Shape,
    enumeration: &'static EnumType,
) -> Result<UnionLayout, LayoutIssue> {
    if enumeration.variants.is_empty() {
        return Err(LayoutIssue::NoAlternatives);
    }

    let mut alternatives = Vec::with_capacity(enumeration.variants.len());
    for variant in enumeration.variants {
        let [payload] = variant.data.fields else {
            return Err(LayoutIssue::NotANewtype(variant.name));
        };
        alternatives.push(Alternative {
            ident: variant.name,
            tag: variant.effective_name().to_string(),
            description: doc_to_description(variant.doc),
            selector: Selector::Variant,
            target: strip_pointer(payload.shape()),
        });
    }

    let discriminator = arri_attr(shape.attributes, "discriminator")
        .or_else(|| shape.get_tag_attr())
        .unwrap_or(DEFAULT_DISCRIMINATOR);
    Ok(UnionLayout {
        discriminator,
        alternatives,
    })
}

fn is_fieldless(enumeration: &EnumType) -> bool {
    !enumeration.variants.is_empty()
        && enumeration
            .variants
            .iter()
            .all(|variant| variant.data.fields.is_empty())
}

/// Payload struct of an `Option<S>` / `Option<Box<S>>` field.
fn slot_target(shape: &'static Shape) -> Option<&'static Shape> {
    let Def::Option(option) = shape.def else {
        return None;
    };
    let target = strip_pointer(option.t);
    let is_struct = matches!(target.ty, Type::User(UserType::Struct(_)));
    let is_special =
        wrapper_kind(target).is_some() || is_timestamp(target) || is_request_context(target);
    (is_struct && !is_special).then_some(target)
}

fn strip_pointer(shape: &'static Shape) -> &'static Shape {
    match shape.def {
        Def::Pointer(pointer) => pointer.pointee.unwrap_or(shape),
        _ => shape,
    }
}

/// Positions in `layout.alternatives` of the alternatives populated in `peek`.
fn active_alternatives(
    peek: Peek<'_, '_>,
    layout: &UnionLayout,
    path: &[String],
) -> Result<Vec<usize>, ReflectError> {
    let shape = peek.shape();
    let mut active = Vec::new();
    match &shape.ty {
        Type::User(UserType::Struct(_)) => {
            let Ok(value) = peek.into_struct() else {
                return Ok(active);
            };
            for (position, alternative) in layout.alternatives.iter().enumerate() {
                let Selector::Slot(index) = alternative.selector else {
                    continue;
                };
                let populated = value
                    .field(index)
                    .ok()
                    .and_then(|slot| slot.into_option().ok())
                    .is_some_and(|option| option.value().is_some());
                if populated {
                    active.push(position);
                }
            }
        }
        Type::User(UserType::Enum(_)) => {
            let Ok(value) = peek.into_enum() else {
                return Ok(active);
            };
            let variant = value
                .active_variant()
                .map_err(|err| ReflectError::UnsupportedType {
                    path: render_path(path),
                    type_name: shape.type_identifier,
                    reason: format!("cannot read the active variant: {err}"),
                })?;
            active.extend(
                layout
                    .alternatives
                    .iter()
                    .position(|alternative| alternative.ident == variant.name),
            );
        }
        _ => {}
    }
    Ok(active)
}

// ============================================================================
// Reflector
// ============================================================================

pub struct Reflector {
    casing: KeyCasing,
    /// Composites currently being expanded.
    visiting: HashSet<ConstTypeId>,
    /// Field path from the root, for error reporting.
    path: Vec<String>,
}

impl Reflector {
    pub fn new(casing: KeyCasing) -> Self {
        Self {
            casing,
            visiting: HashSet::new(),
            path: Vec::new(),
        }
    }

    pub fn build_type_def(&mut self, shape: &'static Shape) -> Result<TypeDef, ReflectError> {
        if is_timestamp(shape) {
            return Ok(TypeDef::Primitive(PrimitiveKind::Timestamp));
        }
        if let Some(kind) = wrapper_kind(shape) {
            return Err(self.unsupported(
                shape,
                format!("{kind} is only meaningful as a struct field type"),
            ));
        }
        if is_request_context(shape) {
            return Err(self.unsupported(shape, "request context is not a data type"));
        }

        match &shape.def {
            Def::Scalar => self.build_scalar(shape),
            Def::Option(option) => self.build_type_def(option.t),
            Def::List(list) => self.build_array(list.t),
            Def::Array(array) => self.build_array(array.t),
            Def::Slice(slice) => self.build_array(slice.t()),
            Def::Set(set) => self.build_array(set.t),
            Def::Map(map) => {
                if !is_string_shape(map.k) {
                    return Err(self.unsupported(shape, "record keys must be strings"));
                }
                let value = self.build_nested("{}", map.v)?;
                Ok(TypeDef::Record(Box::new(value)))
            }
            Def::Pointer(pointer) => match pointer.pointee {
                Some(pointee) => self.build_type_def(pointee),
                None => Err(self.unsupported(shape, "pointer without a known pointee")),
            },
            Def::Undefined => match shape.inner {
                Some(inner) => self.build_type_def(inner),
                None => self.build_from_type(shape),
            },
            _ => self.build_from_type(shape),
        }
    }

    fn build_array(&mut self, element: &'static Shape) -> Result<TypeDef, ReflectError> {
        let element = self.build_nested("[]", element)?;
        Ok(TypeDef::Array(Box::new(element)))
    }

    fn build_nested(
        &mut self,
        segment: &str,
        shape: &'static Shape,
    ) -> Result<TypeDef, ReflectError> {
        self.path.push(segment.to_string());
        let result = self.build_type_def(shape);
        self.path.pop();
        result
    }

    fn build_scalar(&self, shape: &'static Shape) -> Result<TypeDef, ReflectError> {
        let kind = match shape.scalar_type() {
            Some(ScalarType::Bool) => PrimitiveKind::Boolean,
            Some(ScalarType::Char | ScalarType::Str | ScalarType::String | ScalarType::CowStr) => {
                PrimitiveKind::String
            }
            Some(ScalarType::F32) => PrimitiveKind::Float32,
            Some(ScalarType::F64) => PrimitiveKind::Float64,
            Some(ScalarType::I8) => PrimitiveKind::Int8,
            Some(ScalarType::U8) => PrimitiveKind::Uint8,
            Some(ScalarType::I16) => PrimitiveKind::Int16,
            Some(ScalarType::U16) => PrimitiveKind::Uint16,
            Some(ScalarType::I32) => PrimitiveKind::Int32,
            Some(ScalarType::U32) => PrimitiveKind::Uint32,
            Some(ScalarType::I64 | ScalarType::ISize) => PrimitiveKind::Int64,
            Some(ScalarType::U64 | ScalarType::USize) => PrimitiveKind::Uint64,
            Some(ScalarType::I128 | ScalarType::U128) => {
                return Err(
                    self.unsupported(shape, "128-bit integers have no Arri representation")
                );
            }
            Some(ScalarType::Unit) => return Err(self.unsupported(shape, "unit carries no data")),
            _ if is_string_shape(shape) => PrimitiveKind::String,
            _ => return Err(self.unsupported(shape, "scalar has no Arri representation")),
        };
        Ok(TypeDef::Primitive(kind))
    }

    fn build_from_type(&mut self, shape: &'static Shape) -> Result<TypeDef, ReflectError> {
        match &shape.ty {
            Type::User(UserType::Struct(_)) => self.build_composite(shape),
            Type::User(UserType::Enum(enumeration)) if is_fieldless(enumeration) => {
                Ok(TypeDef::Enum(
                    enumeration
                        .variants
                        .iter()
                        .map(|variant| variant.effective_name().to_string())
                        .collect(),
                ))
            }
            Type::User(UserType::Enum(_)) => self.build_composite(shape),
            _ => Err(self.unsupported(shape, "type has no Arri representation")),
        }
    }

    fn build_composite(&mut self, shape: &'static Shape) -> Result<TypeDef, ReflectError> {
        let name = model_name(shape);
        if !self.visiting.insert(shape.id) {
            trace!(
                ty = %name,
                path = %render_path(&self.path),
                "type re-entered; emitting ref"
            );
            return Ok(TypeDef::Ref(name));
        }
        let result = self.build_composite_uncached(shape, name);
        self.visiting.remove(&shape.id);
        result
    }

    fn build_composite_uncached(
        &mut self,
        shape: &'static Shape,
        name: String,
    ) -> Result<TypeDef, ReflectError> {
        let layout = union_layout(shape).map_err(|issue| issue.into_error(shape, &self.path))?;
        match (layout, &shape.ty) {
            (Some(layout), _) => self.build_union_def(shape, name, layout).map(TypeDef::Union),
            (None, Type::User(UserType::Struct(structure))) => self
                .build_object_def(shape, name, structure, None)
                .map(TypeDef::Object),
            (None, _) => Err(self.unsupported(shape, "expected a struct or union")),
        }
    }

    fn build_object_def(
        &mut self,
        shape: &'static Shape,
        name: String,
        structure: &'static StructType,
        discriminator: Option<&str>,
    ) -> Result<ObjectDef, ReflectError> {
        let mut fields = IndexMap::with_capacity(structure.fields.len());
        for field in structure.fields {
            if field.should_skip_deserializing() {
                continue;
            }

            let key = resolve_key(field, self.casing);
            if discriminator == Some(key.as_str()) {
                return Err(self.unsupported(
                    shape,
                    format!("field `{}` collides with the discriminator key `{key}`", field.name),
                ));
            }
            if fields.contains_key(&key) {
                return Err(self.unsupported(shape, format!("duplicate serialized key `{key}`")));
            }

            self.path.push(field.name.to_string());
            let field_def = self.build_field_def(field, key.clone());
            self.path.pop();
            fields.insert(key, field_def?);
        }

        Ok(ObjectDef {
            id: name,
            description: doc_to_description(shape.doc),
            fields,
        })
    }

    fn build_field_def(&mut self, field: &Field, key: String) -> Result<FieldDef, ReflectError> {
        let mut shape = field.shape();
        if let Some(reason) = field_attr(field, "unsupported") {
            return Err(self.unsupported(shape, reason));
        }

        let mut is_optional = false;
        let mut is_nullable = false;
        while let Some((kind, inner)) = unwrap_wrapper(shape) {
            let seen = match kind {
                WrapperKind::Optional => &mut is_optional,
                WrapperKind::Nullable => &mut is_nullable,
            };
            if *seen {
                return Err(self.unsupported(shape, format!("{kind} is nested inside itself")));
            }
            *seen = true;
            shape = inner;
        }

        Ok(FieldDef {
            name: field.name.to_string(),
            key,
            type_def: self.build_type_def(shape)?,
            description: doc_to_description(field.doc),
            is_optional,
            is_nullable,
        })
    }

    fn build_union_def(
        &mut self,
        shape: &'static Shape,
        name: String,
        layout: UnionLayout,
    ) -> Result<UnionDef, ReflectError> {
        let mut alternatives = IndexMap::with_capacity(layout.alternatives.len());
        for alternative in &layout.alternatives {
            if alternatives.contains_key(&alternative.tag) {
                let reason = format!("duplicate discriminator value `{}`", alternative.tag);
                return Err(self.unsupported(shape, reason));
            }

            self.path.push(alternative.ident.to_string());
            let object = self.build_alternative(alternative, layout.discriminator);
            self.path.pop();
            alternatives.insert(alternative.tag.clone(), object?);
        }

        Ok(UnionDef {
            id: name,
            description: doc_to_description(shape.doc),
            discriminator_key: layout.discriminator.to_string(),
            alternatives,
        })
    }

    /// Alternatives are always expanded as objects, even when the payload
    /// struct is itself made of optional slots.
    fn build_alternative(
        &mut self,
        alternative: &Alternative,
        discriminator: &str,
    ) -> Result<ObjectDef, ReflectError> {
        let target = alternative.target;
        let Type::User(UserType::Struct(structure)) = &target.ty else {
            return Err(self.unsupported(target, "union alternatives must be structs"));
        };
        if wrapper_kind(target).is_some() || is_timestamp(target) {
            return Err(self.unsupported(target, "union alternatives must be structs"));
        }

        let inserted = self.visiting.insert(target.id);
        let object =
            self.build_object_def(target, model_name(target), structure, Some(discriminator));
        if inserted {
            self.visiting.remove(&target.id);
        }

        let mut object = object?;
        if object.description.is_none() {
            object.description = alternative.description.clone();
        }
        Ok(object)
    }

    // ------------------------------------------------------------------------
    // Value checks
    // ------------------------------------------------------------------------

    /// Walk a live value and require every union in it to hold exactly one
    /// alternative.
    pub fn check_value(&mut self, peek: Peek<'_, '_>) -> Result<(), ReflectError> {
        let shape = peek.shape();
        if is_timestamp(shape) || is_request_context(shape) {
            return Ok(());
        }
        if wrapper_kind(shape).is_some() {
            let Ok(wrapper) = peek.into_struct() else {
                return Ok(());
            };
            return match wrapper.field(0) {
                Ok(slot) => self.check_value(slot),
                Err(_) => Ok(()),
            };
        }

        match &shape.def {
            Def::Option(_) => {
                let Ok(option) = peek.into_option() else {
                    return Ok(());
                };
                match option.value() {
                    Some(inner) => self.check_value(inner),
                    None => Ok(()),
                }
            }
            Def::Pointer(_) => {
                let Ok(pointer) = peek.into_pointer() else {
                    return Ok(());
                };
                match pointer.borrow_inner() {
                    Some(inner) => self.check_value(inner),
                    None => Ok(()),
                }
            }
            Def::List(_) | Def::Array(_) | Def::Slice(_) => {
                let Ok(list) = peek.into_list_like() else {
                    return Ok(());
                };
                self.path.push("[]".to_string());
                let result = list.iter().try_for_each(|item| self.check_value(item));
                self.path.pop();
                result
            }
            Def::Map(_) => {
                let Ok(map) = peek.into_map() else {
                    return Ok(());
                };
                self.path.push("{}".to_string());
                let result = map.iter().try_for_each(|(_, value)| self.check_value(value));
                self.path.pop();
                result
            }
            Def::Scalar | Def::Set(_) => Ok(()),
            _ => self.check_composite(peek),
        }
    }

    fn check_composite(&mut self, peek: Peek<'_, '_>) -> Result<(), ReflectError> {
        let shape = peek.shape();
        let layout = union_layout(shape).map_err(|issue| issue.into_error(shape, &self.path))?;
        match (layout, &shape.ty) {
            (Some(layout), _) => self.check_union(peek, &layout),
            (None, Type::User(UserType::Struct(_))) => self.check_object(peek),
            _ => Ok(()),
        }
    }

    fn check_object(&mut self, peek: Peek<'_, '_>) -> Result<(), ReflectError> {
        let Ok(value) = peek.into_struct() else {
            return Ok(());
        };
        for index in 0..value.field_count() {
            let field = &value.ty().fields[index];
            if field.should_skip_deserializing() {
                continue;
            }
            let Ok(child) = value.field(index) else {
                continue;
            };

            self.path.push(field.name.to_string());
            let result = self.check_value(child);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn check_union(
        &mut self,
        peek: Peek<'_, '_>,
        layout: &UnionLayout,
    ) -> Result<(), ReflectError> {
        let shape = peek.shape();
        let active = active_alternatives(peek, layout, &self.path)?;
        let [position] = active.as_slice() else {
            return Err(ReflectError::AmbiguousUnion {
                path: render_path(&self.path),
                type_name: shape.type_identifier,
                populated: active.len(),
            });
        };
        let alternative = &layout.alternatives[*position];

        self.path.push(alternative.ident.to_string());
        let result = match alternative.selector {
            Selector::Slot(index) => self.check_slot_payload(peek, index),
            Selector::Variant => self.check_variant_payload(peek),
        };
        self.path.pop();
        result
    }

    fn check_slot_payload(
        &mut self,
        peek: Peek<'_, '_>,
        index: usize,
    ) -> Result<(), ReflectError> {
        let Ok(value) = peek.into_struct() else {
            return Ok(());
        };
        let Ok(slot) = value.field(index) else {
            return Ok(());
        };
        let Ok(option) = slot.into_option() else {
            return Ok(());
        };
        match option.value() {
            Some(payload) => self.check_payload(payload),
            None => Ok(()),
        }
    }

    fn check_variant_payload(&mut self, peek: Peek<'_, '_>) -> Result<(), ReflectError> {
        let Ok(value) = peek.into_enum() else {
            return Ok(());
        };
        for (_, payload) in value.fields_for_serialize() {
            self.check_payload(payload)?;
        }
        Ok(())
    }

    /// Alternative payloads are objects, whatever their own layout.
    fn check_payload(&mut self, peek: Peek<'_, '_>) -> Result<(), ReflectError> {
        if let Def::Pointer(_) = peek.shape().def {
            let Ok(pointer) = peek.into_pointer() else {
                return Ok(());
            };
            return match pointer.borrow_inner() {
                Some(inner) => self.check_payload(inner),
                None => Ok(()),
            };
        }
        self.check_object(peek)
    }

    fn unsupported(&self, shape: &'static Shape, reason: impl Into<String>) -> ReflectError {
        ReflectError::UnsupportedType {
            path: render_path(&self.path),
            type_name: shape.type_identifier,
            reason: reason.into(),
        }
    }
}

fn is_string_shape(shape: &'static Shape) -> bool {
    matches!(
        shape.scalar_type(),
        Some(ScalarType::Str | ScalarType::String | ScalarType::CowStr | ScalarType::Char)
    ) || matches!(shape.type_identifier, "String" | "str" | "Cow")
}
