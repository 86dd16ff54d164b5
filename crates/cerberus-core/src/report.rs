//! Report rendering
//!
//! Pure formatting: every function returns lines and the CLI prints them.

use crate::capability::{classify_scope, Capability, Scope};
use serde_json::Value;

/// ACL kinds the extractor verdict cares about, snake_case form
pub const DATA_MODEL_INSTANCES_ACL: &str = "data_model_instances_acl";
pub const DATASETS_ACL: &str = "datasets_acl";

/// Render the numbered capability report, one entry per capability in
/// original order with a 1-based index.
pub fn capability_lines(capabilities: &[Capability]) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, capability) in capabilities.iter().enumerate() {
        let kind = capability.kind().unwrap_or("<unknown>");
        lines.push(format!("\n{}. {}", i + 1, kind));
        lines.push(format!("   Actions: {}", capability.actions().join(", ")));

        let scope_value = capability
            .scope_value()
            .cloned()
            .unwrap_or_else(|| Value::Object(Default::default()));
        let (scope, shadowed) = classify_scope(&scope_value);
        lines.push(format!("   Scope: {}", scope));

        if !shadowed.is_empty() {
            tracing::warn!(
                kind,
                shadowed = %shadowed.join(", "),
                "scope populates more than one variant"
            );
            lines.push(format!(
                "   ⚠ Ambiguous scope: also contains {}",
                shadowed.join(", ")
            ));
        }
    }

    lines
}

/// Outcome of the targeted extractor permission checks
#[derive(Debug, Default)]
pub struct ExtractorChecks {
    /// WRITE present on the data-model-instances capability
    pub dm_write: bool,
    /// Raw scope of the data-model-instances capability, when present
    pub dm_scope: Option<Value>,
    /// OWNER present on the datasets capability
    pub datasets_owner: bool,
}

impl ExtractorChecks {
    /// Re-scan the capability list for the two ACLs the extractor needs.
    ///
    /// Independent of the full report: a later duplicate ACL overwrites an
    /// earlier one, matching the scan order.
    pub fn evaluate(capabilities: &[Capability]) -> Self {
        let mut checks = Self::default();

        for capability in capabilities {
            if capability.is_kind(DATA_MODEL_INSTANCES_ACL) {
                checks.dm_write = capability.actions().iter().any(|action| action == "WRITE");
                checks.dm_scope = capability.scope_value().cloned();
            }
            if capability.is_kind(DATASETS_ACL) {
                checks.datasets_owner =
                    capability.actions().iter().any(|action| action == "OWNER");
            }
        }

        checks
    }

    /// Both required permissions present
    pub fn passed(&self) -> bool {
        self.dm_write && self.datasets_owner
    }

    /// Pass/fail line per check plus the combined verdict.
    ///
    /// Informational only: the caller exits 0 either way.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(format!(
            "\n✓ dataModelInstancesAcl with WRITE: {}",
            if self.dm_write { "YES ✓" } else { "NO ✗" }
        ));

        if self.dm_write {
            let scope = self
                .dm_scope
                .clone()
                .unwrap_or_else(|| Value::Object(Default::default()));
            match classify_scope(&scope).0 {
                Scope::All => lines.push("  └─ Scope: ALL ✓".to_string()),
                _ => lines.push(format!("  └─ Scope: {} (may need to be 'all')", scope)),
            }
        }

        lines.push(format!(
            "✓ datasetsAcl with OWNER: {}",
            if self.datasets_owner { "YES ✓" } else { "NO ✗" }
        ));

        if self.passed() {
            lines.push(
                "\n✓ Group has the required permissions for writing data model instances!"
                    .to_string(),
            );
        } else {
            lines.push("\n✗ Group is missing required permissions.".to_string());
        }

        lines
    }
}
