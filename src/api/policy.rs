//! Response policies for mutations
//!
//! Deployed clients disagree on what replace and delete should answer, so
//! both choices are configuration rather than code.

use serde::{Deserialize, Serialize};

/// Status used for successful replace and delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStatus {
    /// 200 with a JSON body
    #[default]
    Ok,
    /// 204 with an empty body
    NoContent,
}

/// Outcome of deleting an id that does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDelete {
    /// Treat as success (idempotent delete)
    #[default]
    Succeed,
    /// Answer 404
    NotFound,
}

/// Combined response policy, the `[api]` config section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiPolicy {
    /// Status for successful replace and delete
    pub mutation_status: MutationStatus,
    /// Behavior when deleting a missing id
    pub missing_delete: MissingDelete,
}
