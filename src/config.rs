//! Configuration for the mock API.
//!
//! Declares REST endpoints, the optional GraphQL schema, and server settings.
//! Configuration can be split across several TOML or YAML files in one
//! directory; [`ConfigLoader`] merges them in filename order.

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Service name reported by the health check when none is configured.
pub const DEFAULT_SERVICE_NAME: &str = "blandmockapi";

/// Path the GraphQL endpoint is mounted on when none is configured.
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";

/// Main configuration for the mock API.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MockApiConfig {
    /// Listener and timeout settings
    #[serde(default)]
    pub server: ServerSettings,

    /// REST endpoint declarations, in registration order
    #[serde(default)]
    pub endpoints: Vec<EndpointDescriptor>,

    /// GraphQL schema declaration
    #[serde(default)]
    pub graphql: Option<GraphQLConfig>,
}

impl MockApiConfig {
    /// Load and validate a single configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let mut loader = ConfigLoader::new();
        loader.load_file(path)?;
        let config = loader.into_config();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, endpoint) in self.endpoints.iter().enumerate() {
            endpoint
                .validate()
                .map_err(|e| anyhow::anyhow!("Endpoint {}: {}", i, e))?;
        }
        if let Some(graphql) = &self.graphql {
            graphql.validate()?;
        }
        Ok(())
    }

    /// Whether a GraphQL section is present and enabled.
    pub fn graphql_enabled(&self) -> bool {
        self.graphql.as_ref().is_some_and(|g| g.enabled)
    }
}

/// Server-level settings.
///
/// Zero or empty values mean "use the default"; read them through the
/// accessor methods rather than the raw fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: u16,

    /// Read timeout in seconds
    #[serde(default)]
    pub read_timeout: u64,

    /// Write timeout in seconds
    #[serde(default)]
    pub write_timeout: u64,

    /// Name reported by the health check
    #[serde(default)]
    pub service_name: String,

    /// Largest request body accepted, in bytes
    #[serde(default)]
    pub max_body_bytes: usize,
}

impl ServerSettings {
    pub fn host(&self) -> &str {
        if self.host.is_empty() {
            "0.0.0.0"
        } else {
            &self.host
        }
    }

    pub fn port(&self) -> u16 {
        if self.port == 0 {
            8080
        } else {
            self.port
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(if self.read_timeout == 0 { 15 } else { self.read_timeout })
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(if self.write_timeout == 0 { 15 } else { self.write_timeout })
    }

    pub fn service_name(&self) -> &str {
        if self.service_name.is_empty() {
            DEFAULT_SERVICE_NAME
        } else {
            &self.service_name
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        if self.max_body_bytes == 0 {
            default_max_body_bytes()
        } else {
            self.max_body_bytes
        }
    }

    /// `host:port` listen address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host(), self.port())
    }
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

/// A single REST endpoint: one HTTP method's behavior at one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub path: String,

    /// HTTP method; empty means GET
    #[serde(default)]
    pub method: String,

    /// HTTP status code; zero or negative means 200
    #[serde(default)]
    pub status: i32,

    /// Response body template
    #[serde(default)]
    pub response: String,

    /// Response headers, applied in declaration order
    #[serde(default)]
    pub headers: IndexMap<String, String>,

    /// Delay before responding, in milliseconds; zero or negative means none
    #[serde(default)]
    pub delay: i64,

    #[serde(default)]
    pub description: String,
}

impl EndpointDescriptor {
    /// Shorthand for a descriptor with no headers, delay, or description.
    pub fn new(
        path: impl Into<String>,
        method: impl Into<String>,
        status: i32,
        response: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            status,
            response: response.into(),
            headers: IndexMap::new(),
            delay: 0,
            description: String::new(),
        }
    }

    /// Validate the endpoint declaration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.path.is_empty() {
            anyhow::bail!("endpoint path cannot be empty");
        }
        if self.status > 0 && !(100..=599).contains(&self.status) {
            anyhow::bail!("Invalid status code: {}", self.status);
        }
        Ok(())
    }
}

/// GraphQL endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQLConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Mount path; empty means [`DEFAULT_GRAPHQL_PATH`]
    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub types: Vec<GraphQLTypeConfig>,

    #[serde(default)]
    pub queries: Vec<OperationConfig>,

    #[serde(default)]
    pub mutations: Vec<OperationConfig>,
}

impl GraphQLConfig {
    pub fn path(&self) -> &str {
        if self.path.is_empty() {
            DEFAULT_GRAPHQL_PATH
        } else {
            &self.path
        }
    }

    /// Validate the GraphQL section. Disabled sections are never checked.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.queries.is_empty() {
            anyhow::bail!("GraphQL is enabled but declares no queries");
        }
        for (i, ty) in self.types.iter().enumerate() {
            if ty.name.is_empty() {
                anyhow::bail!("GraphQL type {}: name cannot be empty", i);
            }
        }
        for (i, op) in self.queries.iter().chain(&self.mutations).enumerate() {
            if op.name.is_empty() {
                anyhow::bail!("GraphQL operation {}: name cannot be empty", i);
            }
        }
        Ok(())
    }
}

/// A named GraphQL object type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphQLTypeConfig {
    pub name: String,

    /// Field name to type signature, e.g. `id = "Int!"`
    #[serde(default)]
    pub fields: BTreeMap<String, String>,

    #[serde(default)]
    pub description: String,
}

/// A GraphQL query or mutation with a canned response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationConfig {
    pub name: String,

    /// Return type signature, e.g. `[User]`
    #[serde(default)]
    pub return_type: String,

    /// Argument name to type signature
    #[serde(default)]
    pub args: BTreeMap<String, String>,

    /// Response payload as a JSON document
    #[serde(default)]
    pub response: String,

    #[serde(default)]
    pub description: String,
}

/// Loads and merges configuration files.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: MockApiConfig,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file or every configuration file in a directory.
    pub fn load_from_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("failed to stat path {}", path.display()))?;
        if metadata.is_dir() {
            self.load_directory(path)
        } else {
            self.load_file(path)
        }
    }

    /// Load every `.toml`, `.yaml` and `.yml` file in `dir`, in filename order.
    pub fn load_directory(&mut self, dir: &Path) -> anyhow::Result<()> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read directory {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && ConfigFormat::from_path(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();

        for file in files {
            self.load_file(&file)?;
        }
        Ok(())
    }

    /// Load one file and merge it into the accumulated configuration.
    pub fn load_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let parsed = match ConfigFormat::from_path(path).unwrap_or(ConfigFormat::Toml) {
            ConfigFormat::Toml => MockApiConfig::from_toml_str(&content),
            ConfigFormat::Yaml => MockApiConfig::from_yaml_str(&content),
        }
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

        debug!(
            path = %path.display(),
            endpoints = parsed.endpoints.len(),
            "Loaded configuration file"
        );
        self.merge(parsed);
        Ok(())
    }

    fn merge(&mut self, other: MockApiConfig) {
        let server = &mut self.config.server;
        if !other.server.host.is_empty() {
            server.host = other.server.host;
        }
        if other.server.port > 0 {
            server.port = other.server.port;
        }
        if other.server.read_timeout > 0 {
            server.read_timeout = other.server.read_timeout;
        }
        if other.server.write_timeout > 0 {
            server.write_timeout = other.server.write_timeout;
        }
        if !other.server.service_name.is_empty() {
            server.service_name = other.server.service_name;
        }
        if other.server.max_body_bytes > 0 {
            server.max_body_bytes = other.server.max_body_bytes;
        }

        self.config.endpoints.extend(other.endpoints);

        if let Some(incoming) = other.graphql {
            match &mut self.config.graphql {
                None => self.config.graphql = Some(incoming),
                Some(current) => {
                    if incoming.enabled {
                        current.enabled = true;
                    }
                    if !incoming.path.is_empty() {
                        current.path = incoming.path;
                    }
                    current.types.extend(incoming.types);
                    current.queries.extend(incoming.queries);
                    current.mutations.extend(incoming.mutations);
                }
            }
        }
    }

    pub fn config(&self) -> &MockApiConfig {
        &self.config
    }

    pub fn into_config(self) -> MockApiConfig {
        self.config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Some(Self::Toml),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            _ => None,
        }
    }
}
