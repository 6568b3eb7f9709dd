//! User-facing text for workflow outcomes.
//!
//! Messages are rendered from `minijinja` templates so embedders can reword
//! them without touching the workflow.

use super::WorkflowError;
use crate::issue::domain::{IssueId, IssueStatus};
use minijinja::Environment;
use serde_json::{Value, json};
use thiserror::Error;

const INVALID_TRANSITION_TEMPLATE: &str = concat!(
    "Issue {{ issue_id }} is {{ current }} and cannot be moved to {{ requested }}.",
    "{% if allowed %} Allowed next: {{ allowed | join(', ') }}.",
    "{% else %} No further status changes are possible.{% endif %}",
);

const NOT_FOUND_TEMPLATE: &str = "No issue found for \"{{ supplied }}\".";

const PREFIX_TOO_SHORT_TEMPLATE: &str =
    "\"{{ supplied }}\" is too short to identify an issue; use at least {{ minimum }} characters.";

/// Errors raised while rendering a notice.
#[derive(Debug, Error)]
pub enum NoticeError {
    /// The template failed to render.
    #[error("notice template failed to render: {0}")]
    Render(#[from] minijinja::Error),
}

/// Renders workflow outcomes as user-facing text.
#[derive(Debug, Clone)]
pub struct WorkflowNotice {
    invalid_transition: String,
    not_found: String,
    prefix_too_short: String,
}

impl Default for WorkflowNotice {
    fn default() -> Self {
        Self {
            invalid_transition: INVALID_TRANSITION_TEMPLATE.to_owned(),
            not_found: NOT_FOUND_TEMPLATE.to_owned(),
            prefix_too_short: PREFIX_TOO_SHORT_TEMPLATE.to_owned(),
        }
    }
}

impl WorkflowNotice {
    /// Creates a renderer with the built-in wording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the invalid-transition template.
    ///
    /// The template sees `issue_id`, `current`, `requested` and `allowed`
    /// (display names of the permitted next statuses).
    #[must_use]
    pub fn with_invalid_transition_template(mut self, template: impl Into<String>) -> Self {
        self.invalid_transition = template.into();
        self
    }

    /// Replaces the not-found template. The template sees `supplied`.
    #[must_use]
    pub fn with_not_found_template(mut self, template: impl Into<String>) -> Self {
        self.not_found = template.into();
        self
    }

    /// Explains a refused status change in terms of current and requested
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::Render`] when the template is malformed.
    pub fn invalid_transition(
        &self,
        issue_id: IssueId,
        current: IssueStatus,
        requested: IssueStatus,
    ) -> Result<String, NoticeError> {
        let allowed: Vec<&str> = current
            .next_statuses()
            .iter()
            .map(|status| status.display_name())
            .collect();
        render(
            &self.invalid_transition,
            &json!({
                "issue_id": issue_id.to_string(),
                "current": current.display_name(),
                "requested": requested.display_name(),
                "allowed": allowed,
            }),
        )
    }

    /// Reports that no issue matched the identifier the user supplied.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::Render`] when the template is malformed.
    pub fn issue_not_found(&self, supplied: &str) -> Result<String, NoticeError> {
        render(&self.not_found, &json!({ "supplied": supplied }))
    }

    /// Renders the notice for `err`, if it has one.
    ///
    /// `supplied` is the identifier the user typed, echoed back for
    /// not-found and short-prefix failures. Errors without user-facing
    /// wording yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`NoticeError::Render`] when a template is malformed.
    pub fn describe(
        &self,
        err: &WorkflowError,
        supplied: &str,
    ) -> Result<Option<String>, NoticeError> {
        let text = match err {
            WorkflowError::InvalidTransition { issue_id, from, to } => {
                self.invalid_transition(*issue_id, *from, *to)?
            }
            WorkflowError::IssueNotFound(_) => self.issue_not_found(supplied)?,
            WorkflowError::PartialIdTooShort { minimum, .. } => render(
                &self.prefix_too_short,
                &json!({ "supplied": supplied, "minimum": minimum }),
            )?,
            WorkflowError::RollbackFailed { error, .. } => return self.describe(error, supplied),
            _ => return Ok(None),
        };
        Ok(Some(text))
    }
}

fn render(template: &str, context: &Value) -> Result<String, NoticeError> {
    let environment = Environment::new();
    Ok(environment.render_str(template, context)?)
}
