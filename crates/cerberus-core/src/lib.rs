//! Cerberus Core - CDF client, capability model, and report rendering
//!
//! This crate contains the shared logic behind the cerberus CLI: loading
//! connection settings, talking to the CDF IAM endpoints, and turning a
//! group's capability records into the human-readable permission report.

pub mod capability;
pub mod client;
pub mod config;
pub mod report;

pub use capability::{classify_scope, Capability, Scope};
pub use client::{find_group, CdfClient, ClientError, Group};
pub use config::{Config, MissingConfig, DEFAULT_CLUSTER};
pub use report::{capability_lines, ExtractorChecks};
