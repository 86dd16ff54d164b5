//! Capability records and scope classification
//!
//! A capability is a one-key JSON object: the key names the ACL kind
//! (e.g. `datasetsAcl`), the value holds an action list and a scope
//! descriptor. The API serves camelCase keys while SDK dumps use
//! snake_case, so every accessor tolerates both spellings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A single capability grant from a group record.
///
/// Kept as raw JSON: the set of ACL kinds grows server-side, and an
/// unrecognized record must still survive into the report untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(pub Value);

impl Capability {
    /// The ACL kind key, or `None` for malformed records
    pub fn kind(&self) -> Option<&str> {
        self.0.as_object()?.keys().next().map(String::as_str)
    }

    fn details(&self) -> Option<&Value> {
        self.0.as_object()?.values().next()
    }

    /// Action names granted by this capability, empty on anything malformed
    pub fn actions(&self) -> Vec<String> {
        self.details()
            .and_then(|details| details.get("actions"))
            .and_then(Value::as_array)
            .map(|actions| {
                actions
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The raw scope descriptor, if the record carries one
    pub fn scope_value(&self) -> Option<&Value> {
        self.details().and_then(|details| details.get("scope"))
    }

    /// Kind match against a snake_case ACL name, tolerant of camelCase
    pub fn is_kind(&self, snake: &str) -> bool {
        self.kind().map(|kind| snake_key(kind) == snake).unwrap_or(false)
    }
}

/// Normalize a camelCase key to snake_case so both spellings compare equal
fn snake_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Scope restriction attached to a capability
#[derive(Debug, Clone, PartialEq)]
pub enum Scope {
    /// Unrestricted: applies to every resource in the project
    All,
    /// Restricted to the given data set ids
    Dataset(Vec<Value>),
    /// Restricted to the given data-model space ids
    Space(Vec<Value>),
    /// Restricted to the given resource ids
    Ids(Vec<Value>),
    /// Restricted to specific RAW tables, keyed by database
    Table(Map<String, Value>),
    /// Applies only to the calling identity
    CurrentUser,
    /// Unrecognized shape, kept verbatim
    Raw(Value),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => write!(f, "ALL"),
            Scope::Dataset(ids) => write!(f, "Dataset - {}", render_ids(ids)),
            Scope::Space(ids) => write!(f, "Spaces - {}", render_ids(ids)),
            Scope::Ids(ids) => write!(f, "IDs - {}", render_ids(ids)),
            Scope::Table(dbs) => {
                let rendered = serde_json::to_string(dbs).map_err(|_| fmt::Error)?;
                write!(f, "Tables - {}", rendered)
            }
            Scope::CurrentUser => write!(f, "Current User"),
            Scope::Raw(value) => write!(f, "{}", value),
        }
    }
}

fn render_ids(ids: &[Value]) -> String {
    let parts: Vec<String> = ids.iter().map(Value::to_string).collect();
    format!("[{}]", parts.join(", "))
}

/// Recognized variant keys in classification priority order, each with its
/// accepted spellings
const VARIANT_KEYS: [&[&str]; 6] = [
    &["all"],
    &["dataset_scope", "datasetScope"],
    &["space_id_scope", "spaceIdScope"],
    &["id_scope", "idScope"],
    &["table_scope", "tableScope"],
    &["currentuserscope", "current_user_scope"],
];

/// Classify a scope descriptor by the fixed priority order.
///
/// A well-formed record populates exactly one variant. When more than one
/// known variant key is present, the first in priority order wins and the
/// remaining keys are returned so callers can flag the ambiguity instead
/// of silently dropping it.
pub fn classify_scope(scope: &Value) -> (Scope, Vec<String>) {
    let obj = match scope.as_object() {
        Some(obj) => obj,
        None => return (Scope::Raw(scope.clone()), Vec::new()),
    };

    let mut winner = None;
    let mut shadowed = Vec::new();

    for (rank, spellings) in VARIANT_KEYS.iter().enumerate() {
        for key in *spellings {
            if let Some(value) = obj.get(*key) {
                if winner.is_none() {
                    winner = Some(build_variant(rank, value));
                } else {
                    shadowed.push((*key).to_string());
                }
                break;
            }
        }
    }

    match winner {
        Some(scope) => (scope, shadowed),
        None => (Scope::Raw(scope.clone()), Vec::new()),
    }
}

fn build_variant(rank: usize, value: &Value) -> Scope {
    match rank {
        0 => Scope::All,
        1 => Scope::Dataset(id_list(value, &["ids"])),
        2 => Scope::Space(id_list(value, &["space_ids", "spaceIds"])),
        3 => Scope::Ids(id_list(value, &["ids"])),
        4 => Scope::Table(table_map(value)),
        _ => Scope::CurrentUser,
    }
}

fn id_list(value: &Value, spellings: &[&str]) -> Vec<Value> {
    spellings
        .iter()
        .find_map(|key| value.get(*key))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn table_map(value: &Value) -> Map<String, Value> {
    ["dbs_to_tables", "dbsToTables"]
        .iter()
        .find_map(|key| value.get(*key))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_and_actions() {
        let cap = Capability(json!({
            "datasetsAcl": { "actions": ["READ", "OWNER"], "scope": { "all": {} } }
        }));
        assert_eq!(cap.kind(), Some("datasetsAcl"));
        assert_eq!(cap.actions(), vec!["READ", "OWNER"]);
        assert!(cap.scope_value().is_some());
    }

    #[test]
    fn test_malformed_record_degrades() {
        let cap = Capability(json!("not an object"));
        assert_eq!(cap.kind(), None);
        assert!(cap.actions().is_empty());
        assert!(cap.scope_value().is_none());

        let empty = Capability(json!({}));
        assert_eq!(empty.kind(), None);
    }

    #[test]
    fn test_kind_match_accepts_both_spellings() {
        let camel = Capability(json!({ "dataModelInstancesAcl": {} }));
        let snake = Capability(json!({ "data_model_instances_acl": {} }));
        assert!(camel.is_kind("data_model_instances_acl"));
        assert!(snake.is_kind("data_model_instances_acl"));
        assert!(!camel.is_kind("datasets_acl"));
    }

    #[test]
    fn test_classify_all() {
        let (scope, shadowed) = classify_scope(&json!({ "all": {} }));
        assert_eq!(scope, Scope::All);
        assert!(shadowed.is_empty());
        assert_eq!(scope.to_string(), "ALL");
    }

    #[test]
    fn test_classify_dataset_scope() {
        let (scope, _) = classify_scope(&json!({ "dataset_scope": { "ids": [1, 2] } }));
        assert_eq!(scope.to_string(), "Dataset - [1, 2]");

        let (camel, _) = classify_scope(&json!({ "datasetScope": { "ids": [1, 2] } }));
        assert_eq!(camel, scope);
    }

    #[test]
    fn test_classify_space_scope() {
        let (scope, _) = classify_scope(&json!({ "spaceIdScope": { "spaceIds": ["sp1"] } }));
        assert_eq!(scope.to_string(), "Spaces - [\"sp1\"]");
    }

    #[test]
    fn test_classify_id_scope() {
        let (scope, _) = classify_scope(&json!({ "idScope": { "ids": [42] } }));
        assert_eq!(scope.to_string(), "IDs - [42]");
    }

    #[test]
    fn test_classify_table_scope() {
        let (scope, _) =
            classify_scope(&json!({ "tableScope": { "dbsToTables": { "db": ["t1"] } } }));
        assert_eq!(scope.to_string(), "Tables - {\"db\":[\"t1\"]}");
    }

    #[test]
    fn test_classify_current_user() {
        let (scope, _) = classify_scope(&json!({ "currentuserscope": {} }));
        assert_eq!(scope, Scope::CurrentUser);
        assert_eq!(scope.to_string(), "Current User");
    }

    #[test]
    fn test_unrecognized_scope_falls_back_to_raw() {
        let raw = json!({ "partitionScope": { "ids": [1] } });
        let (scope, shadowed) = classify_scope(&raw);
        assert_eq!(scope, Scope::Raw(raw.clone()));
        assert!(shadowed.is_empty());
        assert_eq!(scope.to_string(), raw.to_string());
    }

    #[test]
    fn test_non_object_scope_is_raw() {
        let (scope, _) = classify_scope(&json!(null));
        assert_eq!(scope, Scope::Raw(json!(null)));
    }

    #[test]
    fn test_priority_order_and_shadowed_keys() {
        // 'all' beats dataset_scope; the loser is reported, not hidden
        let (scope, shadowed) =
            classify_scope(&json!({ "all": {}, "dataset_scope": { "ids": [7] } }));
        assert_eq!(scope, Scope::All);
        assert_eq!(shadowed, vec!["dataset_scope"]);

        let (scope, shadowed) = classify_scope(&json!({
            "dataset_scope": { "ids": [1] },
            "idScope": { "ids": [2] }
        }));
        assert!(matches!(scope, Scope::Dataset(_)));
        assert_eq!(shadowed, vec!["idScope"]);
    }
}
