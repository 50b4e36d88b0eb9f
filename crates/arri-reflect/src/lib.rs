//! arri-reflect - Arri type definitions and RPC route definitions from Rust types
//!
//! Types describe themselves through [`facet::Facet`], usually via the
//! [`ArriType`] attribute macro. The reflector walks the facet shape into a
//! [`TypeDef`], and the route builder turns a handler function into a
//! [`RouteDefinition`].
//!
//! # Usage
//!
//! ```ignore
//! use arri_reflect::{ArriType, KeyCasing, RouteOptions};
//!
//! #[ArriType]
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Message {
//!     id: String,
//!     /// Body text
//!     text: String,
//! }
//!
//! #[ArriType]
//! struct Receipt {
//!     accepted: bool,
//! }
//!
//! fn send(message: Message) -> Result<Receipt, std::io::Error> {
//!     Ok(Receipt { accepted: !message.text.is_empty() })
//! }
//!
//! let schema = arri_reflect::reflect::<Message>(KeyCasing::CamelCase)?;
//! let route = arri_reflect::build_route(
//!     &send,
//!     &RouteOptions::builder().path("/send").method("POST").build(),
//! )?;
//! ```

extern crate self as arri_reflect;

// Re-export the attribute macro and the reflection crates it expands to
#[cfg(feature = "derive")]
pub use arri_reflect_derive::ArriType;
pub use facet;
pub use facet_reflect;

mod app;
mod error;
#[doc(hidden)]
pub mod facet_ext;
mod keys;
mod reflector;
mod route;
mod timestamp;
mod type_def;
mod wrapper;

pub use app::{ARRI_SCHEMA_VERSION, AppDefinition, AppInfo};
pub use error::{AppDefinitionError, ROOT_PATH, ReflectError, RouteError, RouteSide};
pub use keys::{KeyCasing, key_for, resolve_key, tag_for};
pub use reflector::{
    DEFAULT_DISCRIMINATOR, Discriminant, Reflector, discriminate, model_name, reflect,
    reflect_shape, reflect_value,
};
pub use route::{
    Handler, HandlerSignature, HttpMethod, RequestContext, RouteDefinition, RouteOptions,
    SignatureItem, build_route, build_route_from_signature, rpc_path,
};
pub use timestamp::Timestamp;
pub use type_def::{FieldDef, ObjectDef, PrimitiveKind, TypeDef, UnionDef};
pub use wrapper::{
    Nullable, Optional, WrapperKind, classify_nullable, classify_optional, nullable_has_value,
    optional_has_value, unwrap_wrapper,
};
