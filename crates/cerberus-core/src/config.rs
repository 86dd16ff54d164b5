//! Environment configuration
//!
//! Five settings, four required. `CDF_CLUSTER` falls back to the regional
//! default when unset. Empty values count as missing.

use thiserror::Error;

/// Cluster used when `CDF_CLUSTER` is not set
pub const DEFAULT_CLUSTER: &str = "westeurope-1";

/// Connection settings for the identity provider and the CDF project
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub project: String,
    pub cluster: String,
}

/// One or more required environment variables are absent.
///
/// Each field records whether that variable was present, so the CLI can
/// print a per-variable checklist before bailing out.
#[derive(Debug, Error)]
#[error("missing required environment variables")]
pub struct MissingConfig {
    pub client_id: bool,
    pub client_secret: bool,
    pub tenant_id: bool,
    pub project: bool,
}

impl MissingConfig {
    /// `(variable, present)` rows in report order
    pub fn checklist(&self) -> [(&'static str, bool); 4] {
        [
            ("IDP_CLIENT_ID", self.client_id),
            ("IDP_CLIENT_SECRET", self.client_secret),
            ("IDP_TENANT_ID", self.tenant_id),
            ("CDF_PROJECT", self.project),
        ]
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, MissingConfig> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup.
    ///
    /// Tests inject a map here instead of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, MissingConfig> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let client_id = get("IDP_CLIENT_ID");
        let client_secret = get("IDP_CLIENT_SECRET");
        let tenant_id = get("IDP_TENANT_ID");
        let project = get("CDF_PROJECT");

        match (client_id, client_secret, tenant_id, project) {
            (Some(client_id), Some(client_secret), Some(tenant_id), Some(project)) => Ok(Self {
                client_id,
                client_secret,
                tenant_id,
                project,
                cluster: get("CDF_CLUSTER").unwrap_or_else(|| DEFAULT_CLUSTER.to_string()),
            }),
            (client_id, client_secret, tenant_id, project) => Err(MissingConfig {
                client_id: client_id.is_some(),
                client_secret: client_secret.is_some(),
                tenant_id: tenant_id.is_some(),
                project: project.is_some(),
            }),
        }
    }
}
