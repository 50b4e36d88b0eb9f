use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DataEnum, DataStruct, DeriveInput, Fields, FieldsNamed, Ident, LitStr, Path,
    Type, parse_macro_input, parse_quote,
};

mod attrs;

use attrs::{
    ContainerAttrs, RenameRule, is_arri_attr, is_serde_attr, parse_container_attrs,
    parse_field_attrs, parse_variant_attrs,
};

/// Attribute macro that makes a struct or enum reflectable by `arri_reflect`.
///
/// Normalizes `#[arri(...)]` and the wire-relevant `#[serde(...)]` attributes
/// onto the facet model, then derives `facet::Facet`. Place it above any
/// `#[derive(...)]` so serde derives are seen.
///
/// Supported inputs are structs with named fields, fieldless enums, and enums
/// whose variants each wrap a single struct. A struct whose serializable fields
/// are all `Option<Struct>` slots is a union; `#[arri(object)]` opts out.
#[allow(non_snake_case)]
#[proc_macro_attribute]
pub fn ArriType(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        let err = syn::Error::new(
            Span::call_site(),
            "ArriType takes no arguments; hint: configure it with #[arri(...)]",
        );
        return TokenStream::from(err.into_compile_error());
    }

    let input = parse_macro_input!(item as DeriveInput);
    match expand(input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.into_compile_error()),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let runtime = runtime_crate()?;
    let runtime_ns_ident = format_ident!("__arri_runtime_{}", input.ident);
    let runtime_ns: Path = parse_quote!(#runtime_ns_ident);

    let container = parse_container_attrs(&input.attrs)?;
    let serde = SerdeDerives::of(&input.attrs)?;
    validate_input(&input, &container, serde)?;

    let mut markers: Vec<Attribute> = Vec::new();
    let mut wire = None;
    match &mut input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => {
            let layout = struct_layout(fields, &container, &input.generics)?;
            if layout == Layout::Union && serde.any() {
                if !input.generics.params.is_empty() {
                    return Err(syn::Error::new_spanned(
                        &input.generics,
                        "generic union structs cannot derive serde; hint: write the serde impls by hand or make the struct concrete",
                    ));
                }
                wire = Some(UnionWire::collect(&input.ident, fields, &container, serde)?);
            }

            let context = FieldContext {
                layout,
                keep_serde: serde.any() && wire.is_none(),
                rename_all: container.rename_all,
                runtime: &runtime,
                runtime_ns: &runtime_ns,
            };
            for field in &mut fields.named {
                normalize_field(field, &context)?;
            }

            let layout = LitStr::new(layout.as_str(), Span::call_site());
            markers.push(parse_quote!(#[facet(#runtime_ns::layout = #layout)]));
            if let Some(discriminator) = &container.discriminator {
                let lit = LitStr::new(discriminator, Span::call_site());
                markers.push(parse_quote!(#[facet(#runtime_ns::discriminator = #lit)]));
            }
        }
        Data::Enum(data) => {
            normalize_variants(data, &container, serde.any())?;
            let discriminator = container
                .discriminator
                .as_ref()
                .or(container.serde_tag.as_ref());
            if let Some(discriminator) = discriminator {
                let lit = LitStr::new(discriminator, Span::call_site());
                markers.push(parse_quote!(#[facet(#runtime_ns::discriminator = #lit)]));
            }
        }
        _ => return Err(syn::Error::new_spanned(&input.ident, "unsupported item")),
    }

    normalize_container_attrs(&mut input.attrs, &container, serde.any() && wire.is_none(), markers);
    if wire.is_some() {
        strip_serde_derives(&mut input.attrs)?;
    }

    let is_enum = matches!(input.data, Data::Enum(_));
    let has_repr = input.attrs.iter().any(|attr| attr.path().is_ident("repr"));
    if is_enum && !has_repr {
        input.attrs.insert(0, parse_quote!(#[repr(u8)]));
    }

    let mut reordered_attrs = Vec::with_capacity(input.attrs.len() + 2);
    reordered_attrs.push(parse_quote!(#[derive(#runtime::facet::Facet)]));
    reordered_attrs.push(parse_quote!(#[facet(crate = #runtime::facet)]));
    reordered_attrs.extend(std::mem::take(&mut input.attrs));
    input.attrs = reordered_attrs;

    let wire_impls = wire.map(|wire| wire.impls(&input.ident));

    Ok(quote! {
        #[allow(unused_imports)]
        use #runtime as #runtime_ns_ident;

        #input

        #wire_impls
    })
}

/// Path to the `arri_reflect` crate as seen from the expansion site.
///
/// `arri_reflect` declares `extern crate self as arri_reflect`, so the absolute
/// path also resolves inside the crate and its integration tests.
fn runtime_crate() -> syn::Result<Path> {
    let found = crate_name("arri-reflect").map_err(|err| {
        syn::Error::new(
            Span::call_site(),
            format!("could not resolve the arri-reflect crate ({err}); hint: add `arri-reflect` to [dependencies]"),
        )
    })?;
    let ident = match found {
        FoundCrate::Itself => format_ident!("arri_reflect"),
        FoundCrate::Name(name) => format_ident!("{}", name.replace('-', "_")),
    };
    Ok(parse_quote!(::#ident))
}

// ============================================================================
// Validation
// ============================================================================

fn validate_input(
    input: &DeriveInput,
    container: &ContainerAttrs,
    serde: SerdeDerives,
) -> syn::Result<()> {
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "lifetime parameters are not supported; hint: reflected types must be 'static",
        ));
    }

    match &input.data {
        Data::Struct(data) => validate_struct(input, data, container),
        Data::Enum(data) => validate_enum(input, data, container, serde),
        Data::Union(union) => Err(syn::Error::new_spanned(
            union.union_token,
            "unions are not supported; hint: use an enum whose variants each wrap a struct",
        )),
    }
}

fn validate_struct(
    input: &DeriveInput,
    data: &DataStruct,
    container: &ContainerAttrs,
) -> syn::Result<()> {
    if !matches!(data.fields, Fields::Named(_)) {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "tuple and unit structs are not supported; hint: use named fields",
        ));
    }
    if container.object && container.discriminator.is_some() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`object` and `discriminator` conflict; hint: a discriminated struct is a union",
        ));
    }
    if container.serde_tag.is_some() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "serde(tag) on a struct is not supported; hint: use #[arri(discriminator = \"...\")] for slot unions",
        ));
    }
    Ok(())
}

fn validate_enum(
    input: &DeriveInput,
    data: &DataEnum,
    container: &ContainerAttrs,
    serde: SerdeDerives,
) -> syn::Result<()> {
    if container.object {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "`object` only applies to structs",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "empty enums are not supported; hint: add at least one variant",
        ));
    }

    let fieldless = data
        .variants
        .iter()
        .all(|variant| matches!(variant.fields, Fields::Unit));
    if fieldless {
        if container.discriminator.is_some() || container.serde_tag.is_some() {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "a discriminator needs variants that wrap a struct; hint: remove the discriminator to reflect a string enum",
            ));
        }
        return Ok(());
    }

    for variant in &data.variants {
        if single_payload(&variant.fields).is_none() {
            return Err(syn::Error::new_spanned(
                variant,
                "union variants must wrap exactly one struct; hint: move the variant's fields into a struct and use `Variant(Struct)`",
            ));
        }
    }

    if serde.any() && container.serde_tag.is_none() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "serde data enums need #[serde(tag = \"...\")]; hint: internal tagging writes the discriminator the schema declares",
        ));
    }
    if let (Some(discriminator), Some(tag)) = (&container.discriminator, &container.serde_tag)
        && discriminator != tag
    {
        return Err(syn::Error::new_spanned(
            &input.ident,
            format!("arri discriminator `{discriminator}` disagrees with serde tag `{tag}`"),
        ));
    }
    Ok(())
}

fn single_payload(fields: &Fields) -> Option<&Type> {
    match fields {
        Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
            unnamed.unnamed.first().map(|field| &field.ty)
        }
        _ => None,
    }
}

// ============================================================================
// Struct layout
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Layout {
    Object,
    Union,
}

impl Layout {
    fn as_str(self) -> &'static str {
        match self {
            Layout::Object => "object",
            Layout::Union => "union",
        }
    }
}

/// Type names that are never a slot payload.
const NON_STRUCT_TYPES: &[&str] = &[
    "String", "str", "bool", "char", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize",
    "u8", "u16", "u32", "u64", "u128", "usize", "Vec", "VecDeque", "HashMap", "BTreeMap",
    "IndexMap", "HashSet", "BTreeSet", "IndexSet", "Option", "Optional", "Nullable", "Timestamp",
    "DateTime", "Value", "Cow", "RequestContext",
];

/// A struct is a union when it carries a discriminator, or when every
/// serializable field is `Option<S>` / `Option<Box<S>>` of a named type.
fn struct_layout(
    fields: &FieldsNamed,
    container: &ContainerAttrs,
    generics: &syn::Generics,
) -> syn::Result<Layout> {
    if container.object {
        return Ok(Layout::Object);
    }
    if container.discriminator.is_some() {
        return Ok(Layout::Union);
    }

    let params: Vec<&Ident> = generics.type_params().map(|param| &param.ident).collect();
    let mut slots = 0;
    for field in &fields.named {
        if parse_field_attrs(&field.attrs)?.skip {
            continue;
        }
        match extract_single_arg(&field.ty, "Option") {
            Some(payload) if is_slot_payload(payload, &params) => slots += 1,
            _ => return Ok(Layout::Object),
        }
    }
    Ok(if slots > 0 { Layout::Union } else { Layout::Object })
}

fn is_slot_payload(ty: &Type, params: &[&Ident]) -> bool {
    let ty = extract_single_arg(ty, "Box")
        .or_else(|| extract_single_arg(ty, "Rc"))
        .or_else(|| extract_single_arg(ty, "Arc"))
        .unwrap_or(ty);
    let Some(ident) = type_ident(ty) else {
        return false;
    };
    !params.contains(&ident) && !NON_STRUCT_TYPES.contains(&ident.to_string().as_str())
}

// ============================================================================
// Normalization
// ============================================================================

struct FieldContext<'a> {
    layout: Layout,
    keep_serde: bool,
    rename_all: Option<RenameRule>,
    runtime: &'a Path,
    runtime_ns: &'a Path,
}

fn normalize_field(field: &mut syn::Field, context: &FieldContext<'_>) -> syn::Result<()> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let name = ident.unraw().to_string();
    let parsed = parse_field_attrs(&field.attrs)
        .map_err(|err| syn::Error::new_spanned(&ident, err.to_string()))?;
    let runtime_ns = context.runtime_ns;

    let mut out: Vec<Attribute> = std::mem::take(&mut field.attrs)
        .into_iter()
        .filter(|attr| !is_arri_attr(attr) && (context.keep_serde || !is_serde_attr(attr)))
        .collect();

    if parsed.skip {
        out.push(parse_quote!(#[facet(skip, opaque)]));
        if context.keep_serde && !parsed.serde_skip {
            out.push(parse_quote!(#[serde(skip)]));
        }
        field.attrs = out;
        return Ok(());
    }

    let key = parsed
        .explicit_key()
        .map(str::to_string)
        .or_else(|| context.rename_all.map(|rule| rule.apply(&name)));
    if let Some(key) = &key {
        let lit = LitStr::new(key, Span::call_site());
        out.push(parse_quote!(#[facet(rename = #lit)]));
        out.push(parse_quote!(#[facet(#runtime_ns::key = #lit)]));
        if context.keep_serde && parsed.key.is_some() && parsed.serde_rename.is_none() {
            out.push(parse_quote!(#[serde(rename = #lit)]));
        }
    }

    match context.layout {
        Layout::Union => {
            let tag = parsed
                .tag
                .clone()
                .unwrap_or_else(|| name.to_case(Case::UpperSnake));
            let lit = LitStr::new(&tag, Span::call_site());
            out.push(parse_quote!(#[facet(#runtime_ns::tag = #lit)]));
        }
        Layout::Object if parsed.tag.is_some() => {
            return Err(syn::Error::new_spanned(
                &ident,
                "`tag` only applies to union slots; hint: add #[arri(discriminator = \"...\")] to the struct",
            ));
        }
        Layout::Object => {}
    }

    if let Some(reason) = unsupported_reason(&field.ty) {
        let lit = LitStr::new(reason, Span::call_site());
        out.push(parse_quote!(#[facet(opaque)]));
        out.push(parse_quote!(#[facet(#runtime_ns::unsupported = #lit)]));
    }

    if context.keep_serde
        && context.layout == Layout::Object
        && type_ident(&field.ty).is_some_and(|ty| ty == "Optional")
    {
        if !parsed.serde_default {
            out.push(parse_quote!(#[serde(default)]));
        }
        if !parsed.serde_skip_if {
            let runtime = context.runtime;
            let predicate = LitStr::new(
                &format!("{}::Optional::is_absent", path_to_string(runtime)),
                Span::call_site(),
            );
            out.push(parse_quote!(#[serde(skip_serializing_if = #predicate)]));
        }
    }

    if let Some(description) = &parsed.description {
        replace_doc_attrs(&mut out, description);
    }

    field.attrs = out;
    Ok(())
}

fn normalize_variants(
    data: &mut DataEnum,
    container: &ContainerAttrs,
    has_serde: bool,
) -> syn::Result<()> {
    for variant in &mut data.variants {
        let name = variant.ident.unraw().to_string();
        let parsed = parse_variant_attrs(&variant.attrs)
            .map_err(|err| syn::Error::new_spanned(&variant.ident, err.to_string()))?;

        // serde writes the bare identifier unless told otherwise.
        let tag = match (parsed.explicit_key(), container.rename_all) {
            (Some(key), _) => key.to_string(),
            (None, Some(rule)) => rule.apply(&name),
            (None, None) if has_serde => name.clone(),
            (None, None) => name.to_case(Case::UpperSnake),
        };

        let mut out: Vec<Attribute> = std::mem::take(&mut variant.attrs)
            .into_iter()
            .filter(|attr| !is_arri_attr(attr) && (has_serde || !is_serde_attr(attr)))
            .collect();
        let lit = LitStr::new(&tag, Span::call_site());
        out.push(parse_quote!(#[facet(rename = #lit)]));
        if has_serde && parsed.key.is_some() && parsed.serde_rename.is_none() {
            out.push(parse_quote!(#[serde(rename = #lit)]));
        }
        if let Some(description) = &parsed.description {
            replace_doc_attrs(&mut out, description);
        }
        variant.attrs = out;
    }
    Ok(())
}

fn normalize_container_attrs(
    attrs: &mut Vec<Attribute>,
    container: &ContainerAttrs,
    keep_serde: bool,
    markers: Vec<Attribute>,
) {
    attrs.retain(|attr| !is_arri_attr(attr) && (keep_serde || !is_serde_attr(attr)));
    if let Some(name) = &container.name {
        let lit = LitStr::new(name, Span::call_site());
        attrs.push(parse_quote!(#[facet(rename = #lit)]));
    }
    attrs.extend(markers);
    if let Some(description) = &container.description {
        replace_doc_attrs(attrs, description);
    }
}

fn replace_doc_attrs(attrs: &mut Vec<Attribute>, description: &str) {
    attrs.retain(|attr| !attr.path().is_ident("doc"));
    for line in description.lines() {
        let lit = LitStr::new(line, Span::call_site());
        attrs.push(parse_quote!(#[doc = #lit]));
    }
}

/// Why a field type has no schema, for types that cannot cross the wire.
fn unsupported_reason(ty: &Type) -> Option<&'static str> {
    if find_type_match(ty, &|ty| matches!(ty, Type::BareFn(_))).is_some() {
        return Some("function pointers cannot be serialized");
    }
    if find_type_match(ty, &|ty| matches!(ty, Type::TraitObject(_) | Type::ImplTrait(_))).is_some()
    {
        return Some("trait objects cannot be serialized");
    }
    if find_type_match(ty, &|ty| matches!(ty, Type::Ptr(_))).is_some() {
        return Some("raw pointers cannot be serialized");
    }
    let is_channel = |ty: &Type| {
        type_ident(ty).is_some_and(|ident| ident == "Sender" || ident == "SyncSender" || ident == "Receiver")
    };
    if find_type_match(ty, &is_channel).is_some() {
        return Some("channels cannot be serialized");
    }
    None
}

fn find_type_match<'a, F>(ty: &'a Type, predicate: &F) -> Option<&'a Type>
where
    F: Fn(&Type) -> bool,
{
    if predicate(ty) {
        return Some(ty);
    }

    match ty {
        Type::Array(array) => find_type_match(&array.elem, predicate),
        Type::Group(group) => find_type_match(&group.elem, predicate),
        Type::Paren(paren) => find_type_match(&paren.elem, predicate),
        Type::Reference(reference) => find_type_match(&reference.elem, predicate),
        Type::Slice(slice) => find_type_match(&slice.elem, predicate),
        Type::Tuple(tuple) => tuple
            .elems
            .iter()
            .find_map(|elem| find_type_match(elem, predicate)),
        Type::Path(path) => path.path.segments.iter().find_map(|segment| {
            let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
                return None;
            };
            args.args.iter().find_map(|arg| match arg {
                syn::GenericArgument::Type(inner) => find_type_match(inner, predicate),
                _ => None,
            })
        }),
        _ => None,
    }
}

fn type_ident(ty: &Type) -> Option<&Ident> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last().map(|s| &s.ident),
        _ => None,
    }
}

fn extract_single_arg<'a>(ty: &'a Type, ident: &str) -> Option<&'a Type> {
    if let Type::Path(path) = ty
        && let Some(segment) = path.path.segments.last()
        && segment.ident == ident
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

fn path_to_string(path: &Path) -> String {
    let segments = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    match path.leading_colon {
        Some(_) => format!("::{segments}"),
        None => segments,
    }
}

// ============================================================================
// Serde
// ============================================================================

#[derive(Clone, Copy, Default)]
struct SerdeDerives {
    serialize: bool,
    deserialize: bool,
}

impl SerdeDerives {
    fn of(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for derive in derive_paths(attrs)? {
            out.serialize |= is_derive(&derive, "Serialize");
            out.deserialize |= is_derive(&derive, "Deserialize");
        }
        Ok(out)
    }

    fn any(self) -> bool {
        self.serialize || self.deserialize
    }
}

fn derive_paths(attrs: &[Attribute]) -> syn::Result<Vec<Path>> {
    let mut out = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let derives = attr.parse_args_with(
            syn::punctuated::Punctuated::<Path, syn::Token![,]>::parse_terminated,
        )?;
        out.extend(derives);
    }
    Ok(out)
}

fn is_derive(path: &Path, name: &str) -> bool {
    path.segments.last().is_some_and(|segment| segment.ident == name)
}

/// Drops `Serialize`/`Deserialize` from the derive list; the union wire impls
/// replace them.
fn strip_serde_derives(attrs: &mut Vec<Attribute>) -> syn::Result<()> {
    let mut out = Vec::with_capacity(attrs.len());
    for attr in std::mem::take(attrs) {
        if !attr.path().is_ident("derive") {
            out.push(attr);
            continue;
        }
        let kept: Vec<Path> = derive_paths(std::slice::from_ref(&attr))?
            .into_iter()
            .filter(|path| !is_derive(path, "Serialize") && !is_derive(path, "Deserialize"))
            .collect();
        if !kept.is_empty() {
            out.push(parse_quote!(#[derive(#(#kept),*)]));
        }
    }
    *attrs = out;
    Ok(())
}

struct Slot {
    ident: Ident,
    tag: String,
    payload: Type,
}

/// Discriminated serde for a slot union: `{"<discriminator>": "<TAG>", ...payload}`.
struct UnionWire {
    name: String,
    discriminator: String,
    slots: Vec<Slot>,
    skipped: Vec<Ident>,
    serde: SerdeDerives,
}

impl UnionWire {
    fn collect(
        ident: &Ident,
        fields: &FieldsNamed,
        container: &ContainerAttrs,
        serde: SerdeDerives,
    ) -> syn::Result<Self> {
        let mut slots = Vec::new();
        let mut skipped = Vec::new();
        for field in &fields.named {
            let Some(field_ident) = field.ident.clone() else {
                continue;
            };
            let parsed = parse_field_attrs(&field.attrs)?;
            if parsed.skip {
                skipped.push(field_ident);
                continue;
            }
            let Some(payload) = extract_single_arg(&field.ty, "Option") else {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "union slots must be `Option<Struct>`; hint: mark the struct #[arri(object)] to keep it an object",
                ));
            };
            let tag = parsed
                .tag
                .unwrap_or_else(|| field_ident.unraw().to_string().to_case(Case::UpperSnake));
            slots.push(Slot {
                ident: field_ident,
                tag,
                payload: payload.clone(),
            });
        }
        if slots.is_empty() {
            return Err(syn::Error::new_spanned(
                ident,
                "a union struct needs at least one `Option<Struct>` slot",
            ));
        }

        Ok(Self {
            name: container
                .name
                .clone()
                .unwrap_or_else(|| ident.unraw().to_string()),
            discriminator: container
                .discriminator
                .clone()
                .unwrap_or_else(|| "type".to_string()),
            slots,
            skipped,
            serde,
        })
    }

    fn impls(&self, ident: &Ident) -> TokenStream2 {
        let name = &self.name;
        let discriminator = &self.discriminator;
        let idents: Vec<&Ident> = self.slots.iter().map(|slot| &slot.ident).collect();
        let tags: Vec<&str> = self.slots.iter().map(|slot| slot.tag.as_str()).collect();
        let payloads: Vec<&Type> = self.slots.iter().map(|slot| &slot.payload).collect();
        let skipped = &self.skipped;

        let serialize = self.serde.serialize.then(|| {
            quote! {
                impl ::serde::Serialize for #ident {
                    fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
                    where
                        __S: ::serde::Serializer,
                    {
                        #[derive(::serde::Serialize)]
                        #[serde(tag = #discriminator)]
                        #[allow(non_camel_case_types)]
                        enum __ArriWire<'a> {
                            #( #[serde(rename = #tags)] #idents(&'a #payloads), )*
                        }

                        let mut populated = 0usize;
                        let mut active = ::core::option::Option::None;
                        #(
                            if let ::core::option::Option::Some(value) = &self.#idents {
                                populated += 1;
                                active = ::core::option::Option::Some(__ArriWire::#idents(value));
                            }
                        )*
                        match active {
                            ::core::option::Option::Some(wire) if populated == 1 => {
                                ::serde::Serialize::serialize(&wire, serializer)
                            }
                            _ => ::core::result::Result::Err(<__S::Error as ::serde::ser::Error>::custom(
                                ::std::format!("`{}` must hold exactly one alternative, found {}", #name, populated),
                            )),
                        }
                    }
                }
            }
        });

        let deserialize = self.serde.deserialize.then(|| {
            quote! {
                impl<'de> ::serde::Deserialize<'de> for #ident {
                    fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
                    where
                        __D: ::serde::Deserializer<'de>,
                    {
                        #[derive(::serde::Deserialize)]
                        #[serde(tag = #discriminator)]
                        #[allow(non_camel_case_types)]
                        enum __ArriWire {
                            #( #[serde(rename = #tags)] #idents(#payloads), )*
                        }

                        let mut value = Self {
                            #( #idents: ::core::option::Option::None, )*
                            #( #skipped: ::core::default::Default::default(), )*
                        };
                        match <__ArriWire as ::serde::Deserialize>::deserialize(deserializer)? {
                            #( __ArriWire::#idents(payload) => value.#idents = ::core::option::Option::Some(payload), )*
                        }
                        ::core::result::Result::Ok(value)
                    }
                }
            }
        });

        quote! {
            #serialize
            #deserialize
        }
    }
}
