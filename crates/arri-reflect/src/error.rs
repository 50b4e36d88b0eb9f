use thiserror::Error;

/// Rendering of an empty field path.
pub const ROOT_PATH: &str = "<root>";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectError {
    #[error("unsupported type `{type_name}` at `{path}`: {reason}")]
    UnsupportedType {
        path: String,
        type_name: &'static str,
        reason: String,
    },
    #[error(
        "union `{type_name}` at `{path}` must hold exactly one alternative, found {populated}"
    )]
    AmbiguousUnion {
        path: String,
        type_name: &'static str,
        populated: usize,
    },
}

impl ReflectError {
    /// Dotted field path to the offending type.
    pub fn path(&self) -> &str {
        match self {
            Self::UnsupportedType { path, .. } | Self::AmbiguousUnion { path, .. } => path,
        }
    }
}

/// Which half of a handler signature failed to reflect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RouteSide {
    Params,
    Response,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid handler signature: {0}")]
    InvalidHandlerSignature(String),
    #[error("invalid route options: {0}")]
    InvalidRouteOptions(String),
    #[error("failed to reflect {side} type")]
    Reflect {
        side: RouteSide,
        #[source]
        source: ReflectError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppDefinitionError {
    #[error("procedure `{0}` is already registered")]
    DuplicateProcedure(String),
    #[error("procedure `{procedure}` uses a non-object {side} type; wrap it in a struct")]
    NonObjectModel { procedure: String, side: RouteSide },
    #[error("model `{0}` is registered with two different definitions")]
    ConflictingModel(String),
}

/// Renders field path segments as `a.b[].c`; map values render as `a{}`.
pub(crate) fn render_path(segments: &[String]) -> String {
    if segments.is_empty() {
        return ROOT_PATH.to_string();
    }
    let mut rendered = String::new();
    for segment in segments {
        if !rendered.is_empty() && !segment.starts_with(['[', '{']) {
            rendered.push('.');
        }
        rendered.push_str(segment);
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_render_dotted() {
        assert_eq!(render_path(&[]), "<root>");
        let segments = ["shape", "[]", "width"].map(String::from);
        assert_eq!(render_path(&segments), "shape[].width");
    }

    #[test]
    fn route_errors_name_the_side() {
        let err = RouteError::Reflect {
            side: RouteSide::Response,
            source: ReflectError::UnsupportedType {
                path: "callback".to_string(),
                type_name: "fn()",
                reason: "functions cannot be serialized".to_string(),
            },
        };
        assert_eq!(err.to_string(), "failed to reflect response type");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string).as_deref(),
            Some("unsupported type `fn()` at `callback`: functions cannot be serialized")
        );
    }
}
