//! Arri app definition document: every registered procedure plus the models
//! its params and responses refer to.

use bon::Builder;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppDefinitionError, RouteSide};
use crate::route::{HttpMethod, RouteDefinition};
use crate::type_def::TypeDef;

pub const ARRI_SCHEMA_VERSION: &str = "0.0.2";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct AppInfo {
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug)]
struct Procedure {
    route: RouteDefinition,
    params: String,
    response: String,
}

#[derive(Clone, Debug, Default)]
pub struct AppDefinition {
    info: Option<AppInfo>,
    procedures: IndexMap<String, Procedure>,
    models: IndexMap<String, TypeDef>,
}

impl AppDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(mut self, info: AppInfo) -> Self {
        self.info = Some(info);
        self
    }

    /// Add a procedure under its dotted name (`posts.getPost`).
    ///
    /// Params and response must be objects or unions; they are stored as
    /// models keyed by their id. Nothing is recorded when registration fails.
    #[tracing::instrument(level = "debug", name = "arri.register_procedure", skip(self, route))]
    pub fn register(
        &mut self,
        name: &str,
        route: RouteDefinition,
    ) -> Result<(), AppDefinitionError> {
        if self.procedures.contains_key(name) {
            return Err(AppDefinitionError::DuplicateProcedure(name.to_string()));
        }
        let params = self.model_name(name, RouteSide::Params, route.params())?;
        let response = self.model_name(name, RouteSide::Response, route.response())?;
        if params == response && route.params() != route.response() {
            return Err(AppDefinitionError::ConflictingModel(params));
        }

        self.models
            .entry(params.clone())
            .or_insert_with(|| route.params().clone());
        self.models
            .entry(response.clone())
            .or_insert_with(|| route.response().clone());
        debug!(%params, %response, models = self.models.len(), "procedure registered");
        self.procedures.insert(
            name.to_string(),
            Procedure {
                route,
                params,
                response,
            },
        );
        Ok(())
    }

    fn model_name(
        &self,
        procedure: &str,
        side: RouteSide,
        def: &TypeDef,
    ) -> Result<String, AppDefinitionError> {
        let Some(id) = def.id() else {
            return Err(AppDefinitionError::NonObjectModel {
                procedure: procedure.to_string(),
                side,
            });
        };
        match self.models.get(id) {
            Some(existing) if existing != def => {
                Err(AppDefinitionError::ConflictingModel(id.to_string()))
            }
            _ => Ok(id.to_string()),
        }
    }

    pub fn procedure(&self, name: &str) -> Option<&RouteDefinition> {
        self.procedures.get(name).map(|procedure| &procedure.route)
    }

    pub fn procedures(&self) -> impl Iterator<Item = (&str, &RouteDefinition)> {
        self.procedures
            .iter()
            .map(|(name, procedure)| (name.as_str(), &procedure.route))
    }

    pub fn models(&self) -> &IndexMap<String, TypeDef> {
        &self.models
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for AppDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("arriSchemaVersion", ARRI_SCHEMA_VERSION)?;
        if let Some(info) = &self.info {
            map.serialize_entry("info", info)?;
        }
        let procedures: IndexMap<&str, ProcedureEntry<'_>> = self
            .procedures
            .iter()
            .map(|(name, procedure)| (name.as_str(), ProcedureEntry::from(procedure)))
            .collect();
        map.serialize_entry("procedures", &procedures)?;
        map.serialize_entry("models", &self.models)?;
        map.end()
    }
}

#[derive(Serialize)]
struct ProcedureEntry<'a> {
    path: &'a str,
    method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    params: &'a str,
    response: &'a str,
}

impl<'a> From<&'a Procedure> for ProcedureEntry<'a> {
    fn from(procedure: &'a Procedure) -> Self {
        Self {
            path: procedure.route.path(),
            method: procedure.route.method(),
            description: procedure.route.description(),
            params: &procedure.params,
            response: &procedure.response,
        }
    }
}
