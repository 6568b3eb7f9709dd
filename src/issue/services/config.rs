//! Tunables for the issue workflow services.

use crate::issue::domain::Priority;
use serde::{Deserialize, Serialize};

/// Configuration for [`IssueWorkflowService`](super::IssueWorkflowService)
/// and [`StatusLogService`](super::StatusLogService).
///
/// Missing fields fall back to [`WorkflowConfig::default`] when
/// deserializing.
///
/// # Examples
///
/// ```
/// use fixtrack::issue::services::WorkflowConfig;
///
/// let config = WorkflowConfig::default();
/// assert_eq!(config.min_partial_id_length, 4);
///
/// let strict = WorkflowConfig::strict();
/// assert!(strict.min_partial_id_length > config.min_partial_id_length);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Priority given to reports that do not choose one.
    pub default_priority: Priority,
    /// Upper bound applied to recent-activity log queries.
    pub recent_log_limit_cap: usize,
    /// Shortest identifier prefix accepted by partial-id search.
    pub min_partial_id_length: usize,
    /// Whether an assignment created by a composite action is removed again
    /// when the action's status change fails.
    pub compensate_failed_assignments: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_priority: Priority::Medium,
            recent_log_limit_cap: 100,
            min_partial_id_length: 4,
            compensate_failed_assignments: true,
        }
    }
}

impl WorkflowConfig {
    /// Creates a configuration that accepts single-character id prefixes.
    ///
    /// Useful for small deployments where short prefixes are unambiguous.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            min_partial_id_length: 1,
            ..Default::default()
        }
    }

    /// Creates a configuration with tighter query limits.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            default_priority: Priority::Medium,
            recent_log_limit_cap: 25,
            min_partial_id_length: 8,
            compensate_failed_assignments: true,
        }
    }
}
