//! Thin CDF API client
//!
//! Covers exactly what the checker needs: a client-credentials token
//! exchange against the identity provider and the project-wide group
//! listing. No token caching, no pagination, no retries.

use crate::capability::Capability;
use crate::config::Config;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider rejected credentials ({status}): {body}")]
    TokenRejected { status: u16, body: String },

    #[error("unexpected response from {endpoint} ({status}): {body}")]
    UnexpectedStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
}

/// A permission group as returned by the groups endpoint.
///
/// Unknown fields (id, deletion markers, metadata) are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ItemsEnvelope<T> {
    items: Vec<T>,
}

/// Authenticated handle to a CDF project
pub struct CdfClient {
    http: reqwest::Client,
    base_url: String,
    project: String,
    token: String,
}

impl CdfClient {
    /// Exchange client credentials for a bearer token scoped to the cluster
    pub async fn authenticate(
        http: reqwest::Client,
        config: &Config,
    ) -> Result<Self, ClientError> {
        let token_url = format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            config.tenant_id
        );
        let base_url = format!("https://{}.cognitedata.com", config.cluster);
        let token_scope = format!("{}/.default", base_url);

        tracing::debug!(%token_url, "requesting access token");

        let resp = http
            .post(&token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", config.client_id.as_str()),
                ("client_secret", config.client_secret.as_str()),
                ("scope", token_scope.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::TokenRejected { status, body });
        }

        let token: TokenResponse = resp.json().await?;

        Ok(Self {
            http,
            base_url,
            project: config.project.clone(),
            token: token.access_token,
        })
    }

    /// Fetch every permission group in the project
    pub async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
        let url = format!(
            "{}/api/v1/projects/{}/groups?all=true",
            self.base_url, self.project
        );

        tracing::debug!(%url, "listing groups");

        let resp = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                endpoint: url,
                status,
                body,
            });
        }

        let envelope: ItemsEnvelope<Group> = resp.json().await?;
        Ok(envelope.items)
    }
}

/// First group whose name matches exactly, in fetch order.
///
/// Duplicate names are not warned about; the first occurrence wins.
pub fn find_group<'a>(groups: &'a [Group], name: &str) -> Option<&'a Group> {
    groups.iter().find(|group| group.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn group(name: &str) -> Group {
        Group {
            name: name.to_string(),
            source_id: None,
            capabilities: Vec::new(),
        }
    }

    #[test]
    fn test_find_group_exact_match() {
        let groups = vec![group("admins"), group("icapi_extractors"), group("readers")];
        let found = find_group(&groups, "icapi_extractors").unwrap();
        assert_eq!(found.name, "icapi_extractors");
    }

    #[test]
    fn test_find_group_first_match_wins() {
        let mut first = group("icapi_extractors");
        first.source_id = Some("first".to_string());
        let mut second = group("icapi_extractors");
        second.source_id = Some("second".to_string());

        let groups = vec![group("other"), first, second];
        let found = find_group(&groups, "icapi_extractors").unwrap();
        assert_eq!(found.source_id.as_deref(), Some("first"));
    }

    #[test]
    fn test_find_group_absent() {
        let groups = vec![group("admins"), group("readers")];
        assert!(find_group(&groups, "icapi_extractors").is_none());
    }

    #[test]
    fn test_groups_envelope_deserializes() {
        // camelCase wire form with fields the model does not care about
        let body = json!({
            "items": [{
                "id": 861231,
                "isDeleted": false,
                "name": "icapi_extractors",
                "sourceId": "b7c9-aad-object-id",
                "capabilities": [
                    { "datasetsAcl": { "actions": ["READ", "OWNER"], "scope": { "all": {} } } }
                ]
            }]
        });

        let envelope: ItemsEnvelope<Group> = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.items.len(), 1);

        let group = &envelope.items[0];
        assert_eq!(group.name, "icapi_extractors");
        assert_eq!(group.source_id.as_deref(), Some("b7c9-aad-object-id"));
        assert_eq!(group.capabilities.len(), 1);
        assert_eq!(group.capabilities[0].kind(), Some("datasetsAcl"));
    }

    #[test]
    fn test_group_without_capabilities_deserializes() {
        let group: Group = serde_json::from_value(json!({ "name": "empty" })).unwrap();
        assert!(group.capabilities.is_empty());
        assert!(group.source_id.is_none());
    }

    #[test]
    fn test_token_response_deserializes() {
        let token: TokenResponse = serde_json::from_value(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "eyJ0eXAi"
        }))
        .unwrap();
        assert_eq!(token.access_token, "eyJ0eXAi");
    }
}
