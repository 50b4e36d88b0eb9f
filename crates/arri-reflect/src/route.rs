//! RPC route definitions built from handler signatures.
//!
//! A handler is any `Fn(message) -> Result<response, error>` or
//! `Fn(message, context) -> Result<response, error>`. Its message and response
//! types are reflected independently into the route's params and response.

use std::fmt;

use bon::Builder;
use convert_case::{Case, Casing};
use facet::{Facet, Shape};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RouteError, RouteSide};
use crate::keys::KeyCasing;
use crate::reflector::reflect_shape;
use crate::type_def::TypeDef;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// How a handler is exposed.
///
/// ```ignore
/// let options = RouteOptions::builder().path("/my-test-func").method("POST").build();
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    /// Must start with `/`.
    #[builder(into)]
    pub path: String,
    /// One of GET, POST, PUT, PATCH, DELETE, in any case.
    #[builder(into)]
    pub method: String,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub key_casing: KeyCasing,
}

impl RouteOptions {
    fn validate(&self) -> Result<HttpMethod, RouteError> {
        if self.path.is_empty() {
            return Err(RouteError::InvalidRouteOptions(
                "path must not be empty".to_string(),
            ));
        }
        if !self.path.starts_with('/') {
            return Err(RouteError::InvalidRouteOptions(format!(
                "path `{}` must start with `/`",
                self.path
            )));
        }
        self.method.parse().map_err(|_| {
            RouteError::InvalidRouteOptions(format!("unknown HTTP method `{}`", self.method))
        })
    }
}

/// Per-request data handed to a handler next to its message.
///
/// Only its position in the signature matters; it never reaches a schema.
#[derive(Clone, Debug, Default, facet::Facet)]
#[facet(opaque)]
pub struct RequestContext {
    pub procedure: String,
    pub path: String,
    pub headers: IndexMap<String, String>,
}

pub(crate) fn is_request_context(shape: &'static Shape) -> bool {
    shape.id == <RequestContext as Facet<'static>>::SHAPE.id
}

/// One parameter or result position of a handler.
#[derive(Clone, Copy)]
pub enum SignatureItem {
    /// A reflectable type, including [`RequestContext`].
    Data(&'static Shape),
    /// The error half of a handler's `Result`, by type name.
    Error(&'static str),
}

impl SignatureItem {
    pub fn data<T: for<'a> Facet<'a>>() -> Self {
        Self::Data(<T as Facet<'static>>::SHAPE)
    }

    pub fn error<E: 'static>() -> Self {
        Self::Error(std::any::type_name::<E>())
    }

    pub fn type_name(&self) -> &'static str {
        match *self {
            Self::Data(shape) => shape.type_identifier,
            Self::Error(name) => name,
        }
    }

    fn payload(&self) -> Option<&'static Shape> {
        match *self {
            Self::Data(shape) if !is_request_context(shape) => Some(shape),
            _ => None,
        }
    }

    fn is_context(&self) -> bool {
        matches!(*self, Self::Data(shape) if is_request_context(shape))
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Debug for SignatureItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(_) => f.debug_tuple("Data").field(&self.type_name()).finish(),
            Self::Error(name) => f.debug_tuple("Error").field(name).finish(),
        }
    }
}

/// Parameter and result positions of a handler, in declaration order.
///
/// The result of `Result<R, E>` contributes two outputs: `R` and the error `E`.
#[derive(Clone, Debug)]
pub struct HandlerSignature {
    pub inputs: Vec<SignatureItem>,
    pub outputs: Vec<SignatureItem>,
}

impl HandlerSignature {
    fn into_parts(self) -> Result<(&'static Shape, &'static Shape), RouteError> {
        let params = match self.inputs.as_slice() {
            [message] => message.payload(),
            [message, context] if context.is_context() => message.payload(),
            _ => None,
        };
        let Some(params) = params else {
            return Err(RouteError::InvalidHandlerSignature(format!(
                "expected `(message)` or `(message, context)` parameters, got `({})`",
                type_names(&self.inputs)
            )));
        };
        let response = match self.outputs.as_slice() {
            [response, error] if error.is_error() => response.payload(),
            _ => None,
        };
        let Some(response) = response else {
            return Err(RouteError::InvalidHandlerSignature(format!(
                "expected a `(response, error)` result, got `({})`",
                type_names(&self.outputs)
            )));
        };
        Ok((params, response))
    }
}

fn type_names(items: &[SignatureItem]) -> String {
    items
        .iter()
        .map(SignatureItem::type_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Function-shaped values whose signature can be inspected.
pub trait Handler<Args> {
    fn signature(&self) -> HandlerSignature;
}

macro_rules! impl_handler {
    ($($arg:ident),*) => {
        impl<F, $($arg,)* R, E> Handler<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Result<R, E>,
            $($arg: for<'a> Facet<'a>,)*
            R: for<'a> Facet<'a>,
            E: 'static,
        {
            fn signature(&self) -> HandlerSignature {
                HandlerSignature {
                    inputs: vec![$(SignatureItem::data::<$arg>()),*],
                    outputs: vec![SignatureItem::data::<R>(), SignatureItem::error::<E>()],
                }
            }
        }
    };
}

impl_handler!();
impl_handler!(A);
impl_handler!(A, B);
impl_handler!(A, B, C);

/// Route description consumed by documentation and client generators.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteDefinition {
    path: String,
    method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    params: TypeDef,
    response: TypeDef,
}

impl RouteDefinition {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn params(&self) -> &TypeDef {
        &self.params
    }

    pub fn response(&self) -> &TypeDef {
        &self.response
    }
}

pub fn build_route<H, Args>(
    handler: &H,
    options: &RouteOptions,
) -> Result<RouteDefinition, RouteError>
where
    H: Handler<Args>,
{
    build_route_from_signature(handler.signature(), options)
}

#[tracing::instrument(
    level = "debug",
    name = "arri.build_route",
    skip_all,
    fields(path = %options.path, method = %options.method)
)]
pub fn build_route_from_signature(
    signature: HandlerSignature,
    options: &RouteOptions,
) -> Result<RouteDefinition, RouteError> {
    let method = options.validate()?;
    let (params, response) = signature.into_parts()?;

    let params = reflect_shape(params, options.key_casing).map_err(|source| RouteError::Reflect {
        side: RouteSide::Params,
        source,
    })?;
    let response =
        reflect_shape(response, options.key_casing).map_err(|source| RouteError::Reflect {
            side: RouteSide::Response,
            source,
        })?;

    debug!(
        params = params.id().unwrap_or("-"),
        response = response.id().unwrap_or("-"),
        "route built"
    );
    Ok(RouteDefinition {
        path: options.path.clone(),
        method,
        description: options.description.clone(),
        params,
        response,
    })
}

const DISALLOWED_PATH_CHARS: &str = "!@#$%^&*()+=[]{}|\\;:'\"<>,./?";

/// URL path of a dotted procedure name: `posts.getPost` becomes `/posts/get-post`.
pub fn rpc_path(name: &str, prefix: Option<&str>) -> String {
    let path = name
        .split('.')
        .map(|part| {
            part.to_case(Case::Kebab)
                .chars()
                .filter(|c| !DISALLOWED_PATH_CHARS.contains(*c))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/");
    match prefix.map(|prefix| prefix.trim_matches('/')) {
        Some(prefix) if !prefix.is_empty() => format!("/{prefix}/{path}"),
        _ => format!("/{path}"),
    }
}
