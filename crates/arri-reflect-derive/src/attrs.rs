//! `#[arri(...)]` and `#[serde(...)]` attribute parsing.
//!
//! `#[arri]` values win; the serde attributes that change the wire format
//! (`rename`, `rename_all`, `tag`, `skip`) fill in whatever `#[arri]` left unset.

use convert_case::{Case, Casing};
use proc_macro2::Span;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, Lit, Meta};

#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub name: Option<String>,
    pub discriminator: Option<String>,
    pub description: Option<String>,
    /// `#[arri(object)]`: never treat the struct as a union of its slots.
    pub object: bool,
    pub rename_all: Option<RenameRule>,
    pub serde_tag: Option<String>,
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub key: Option<String>,
    pub serde_rename: Option<String>,
    pub tag: Option<String>,
    pub description: Option<String>,
    pub skip: bool,
    pub serde_skip: bool,
    pub serde_default: bool,
    pub serde_skip_if: bool,
}

impl FieldAttrs {
    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref().or(self.serde_rename.as_deref())
    }
}

#[derive(Default)]
pub(crate) struct VariantAttrs {
    pub key: Option<String>,
    pub serde_rename: Option<String>,
    pub description: Option<String>,
}

impl VariantAttrs {
    pub fn explicit_key(&self) -> Option<&str> {
        self.key.as_deref().or(self.serde_rename.as_deref())
    }
}

#[derive(Clone, Copy)]
pub(crate) enum RenameRule {
    Camel,
    Snake,
    Pascal,
    Kebab,
    ScreamingSnake,
    Lower,
    Upper,
    ScreamingKebab,
}

impl RenameRule {
    pub fn apply(self, name: &str) -> String {
        let case = match self {
            RenameRule::Camel => Case::Camel,
            RenameRule::Snake => Case::Snake,
            RenameRule::Pascal => Case::Pascal,
            RenameRule::Kebab => Case::Kebab,
            RenameRule::ScreamingSnake => Case::UpperSnake,
            RenameRule::ScreamingKebab => Case::UpperKebab,
            RenameRule::Lower => return name.to_lowercase(),
            RenameRule::Upper => return name.to_uppercase(),
        };
        name.to_case(case)
    }
}

pub(crate) fn is_arri_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("arri")
}

pub(crate) fn is_serde_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("serde")
}

pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs.iter().filter(|attr| is_arri_attr(attr)) {
        parse_arri_container_meta(attr, &mut out)?;
    }
    for attr in attrs.iter().filter(|attr| is_serde_attr(attr)) {
        parse_serde_container_meta(attr, &mut out)?;
    }
    Ok(out)
}

pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if is_arri_attr(attr) {
            parse_arri_field_meta(attr, &mut out)?;
        } else if is_serde_attr(attr) {
            parse_serde_field_meta(attr, &mut out)?;
        }
    }
    if let (Some(key), Some(rename)) = (&out.key, &out.serde_rename)
        && key != rename
    {
        return Err(syn::Error::new(
            Span::call_site(),
            format!(
                "arri key `{key}` disagrees with serde rename `{rename}`; hint: drop one so the schema matches the wire"
            ),
        ));
    }
    Ok(out)
}

pub(crate) fn parse_variant_attrs(attrs: &[Attribute]) -> syn::Result<VariantAttrs> {
    let mut out = VariantAttrs::default();
    for attr in attrs {
        if is_arri_attr(attr) {
            parse_arri_variant_meta(attr, &mut out)?;
        } else if is_serde_attr(attr) {
            parse_serde_variant_meta(attr, &mut out)?;
        }
    }
    if let (Some(key), Some(rename)) = (&out.key, &out.serde_rename)
        && key != rename
    {
        return Err(syn::Error::new(
            Span::call_site(),
            format!(
                "arri key `{key}` disagrees with serde rename `{rename}`; hint: drop one so the schema matches the wire"
            ),
        ));
    }
    Ok(out)
}

fn parse_arri_container_meta(attr: &Attribute, out: &mut ContainerAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("name") => {
                out.name = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::NameValue(meta) if meta.path.is_ident("discriminator") => {
                out.discriminator = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::NameValue(meta) if meta.path.is_ident("description") => {
                out.description = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::Path(path) if path.is_ident("object") => {
                out.object = true;
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown arri container attribute; hint: expected `name`, `discriminator`, `description` or `object`",
                ));
            }
        }
    }
    Ok(())
}

fn parse_arri_field_meta(attr: &Attribute, out: &mut FieldAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("key") => {
                out.key = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::NameValue(meta) if meta.path.is_ident("tag") => {
                out.tag = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::NameValue(meta) if meta.path.is_ident("description") => {
                out.description = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::Path(path) if path.is_ident("skip") => {
                out.skip = true;
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown arri field attribute; hint: expected `key`, `tag`, `description` or `skip`",
                ));
            }
        }
    }
    Ok(())
}

fn parse_arri_variant_meta(attr: &Attribute, out: &mut VariantAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("key") || meta.path.is_ident("tag") => {
                out.key = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::NameValue(meta) if meta.path.is_ident("description") => {
                out.description = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown arri variant attribute; hint: expected `key`, `tag` or `description`",
                ));
            }
        }
    }
    Ok(())
}

fn parse_serde_container_meta(attr: &Attribute, out: &mut ContainerAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("rename") => {
                if out.name.is_none() {
                    out.name = Some(parse_string_expr(&meta.value, meta.span())?);
                }
            }
            Meta::NameValue(meta) if meta.path.is_ident("rename_all") => {
                out.rename_all = Some(parse_rename_rule(&meta.value, meta.span())?);
            }
            Meta::NameValue(meta) if meta.path.is_ident("tag") => {
                out.serde_tag = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::Path(path) if path.is_ident("untagged") => {
                return Err(syn::Error::new_spanned(
                    path,
                    "serde(untagged) is not supported; hint: use #[serde(tag = \"...\")] so the union has a discriminator",
                ));
            }
            Meta::NameValue(meta) if meta.path.is_ident("content") => {
                return Err(syn::Error::new_spanned(
                    meta,
                    "adjacent tagging is not supported; hint: drop `content` so the payload sits next to the tag",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_serde_field_meta(attr: &Attribute, out: &mut FieldAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("rename") => {
                out.serde_rename = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::Path(path) if path.is_ident("skip") || path.is_ident("skip_serializing") => {
                out.skip = true;
                out.serde_skip = true;
            }
            Meta::Path(path) if path.is_ident("default") => {
                out.serde_default = true;
            }
            Meta::NameValue(meta) if meta.path.is_ident("default") => {
                out.serde_default = true;
            }
            Meta::NameValue(meta) if meta.path.is_ident("skip_serializing_if") => {
                out.serde_skip_if = true;
            }
            Meta::Path(path) if path.is_ident("flatten") => {
                return Err(syn::Error::new_spanned(
                    path,
                    "serde(flatten) is not supported; hint: model fields explicitly",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_serde_variant_meta(attr: &Attribute, out: &mut VariantAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("rename") => {
                out.serde_rename = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::Path(path) if path.is_ident("skip") => {
                return Err(syn::Error::new_spanned(
                    path,
                    "serde(skip) is not supported on enum variants; hint: remove the variant or use a separate enum",
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_meta_list(attr: &Attribute) -> syn::Result<Vec<Meta>> {
    let metas = attr
        .parse_args_with(syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated)?;
    Ok(metas.into_iter().collect())
}

fn parse_string_expr(expr: &Expr, span: Span) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.value()),
        _ => Err(syn::Error::new(
            span,
            "expected string literal; hint: wrap the value in quotes",
        )),
    }
}

fn parse_rename_rule(expr: &Expr, span: Span) -> syn::Result<RenameRule> {
    let value = parse_string_expr(expr, span)?;
    match value.as_str() {
        "camelCase" => Ok(RenameRule::Camel),
        "snake_case" => Ok(RenameRule::Snake),
        "PascalCase" => Ok(RenameRule::Pascal),
        "kebab-case" => Ok(RenameRule::Kebab),
        "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnake),
        "lowercase" => Ok(RenameRule::Lower),
        "UPPERCASE" => Ok(RenameRule::Upper),
        "SCREAMING-KEBAB-CASE" => Ok(RenameRule::ScreamingKebab),
        _ => Err(syn::Error::new(span, "unsupported rename_all value")),
    }
}
