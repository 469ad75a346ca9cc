//! Route registry types and path normalization.
//!
//! Every exposed route is identified by a lowercased URI plus an HTTP
//! method. The normalized route name (path segments joined by `_`) is the
//! lookup key shared by seeding and permission checks.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use routewarden_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a route row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteId(Uuid);

impl RouteId {
    /// Creates a new random route identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a route identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RouteId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// HTTP methods the registry understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// PATCH request.
    Patch,
    /// DELETE request.
    Delete,
}

impl HttpMethod {
    /// Returns the storage string for this method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown http method '{value}'"
            ))),
        }
    }
}

/// Lowercased route URI as stored in the route ownership table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteUri(String);

impl RouteUri {
    /// Creates a route URI, lowercasing the given path.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "route uri must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the lowercased URI string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RouteUri {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Normalized route name: lowercased path segments joined by `_`.
///
/// `/admin/motorbike/create` becomes `admin_motorbike_create`. Empty
/// segments (leading, trailing, or doubled slashes) are dropped, so the
/// normalization is insensitive to slash placement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteName(String);

impl RouteName {
    /// Normalizes a route path into its name.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let name = path
            .to_lowercase()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        Self(name)
    }

    /// Returns the normalized name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for RouteName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One route exposed by the service, as reported by the route registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredRoute {
    /// Route path template, for example `/admin/motorbike/create`.
    pub path: String,
    /// Methods the path responds to.
    pub methods: Vec<HttpMethod>,
}

/// Manifest of all registered routes, loaded from a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    /// Registered routes in declaration order.
    pub routes: Vec<RegisteredRoute>,
}

impl RouteManifest {
    /// Parses a route manifest from its JSON document.
    pub fn from_json(document: &str) -> AppResult<Self> {
        serde_json::from_str(document).map_err(|error| {
            AppError::Validation(format!("invalid route manifest document: {error}"))
        })
    }
}
