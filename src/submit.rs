//! Prompt submission: validation, status updates and response handling.
//!
//! A submission is split into `begin` (validate, show "Loading...", build the
//! request) and `complete` (apply the backend's answer to the page). The
//! network call sits between the two so callers can run it wherever suits
//! them: inline in `Session::submit`, or on a worker in `async_api`.

use std::fmt;

use crate::backend::{GenerateRequest, Generated};
use crate::history::HistoryRecorder;
use crate::page::Page;
use crate::{Error, Result, StudioConfig};

pub const STATUS_LOADING: &str = "Loading...";
pub const STATUS_UPDATED: &str = "Diagram updated successfully!";
pub const STATUS_REQUEST_FAILED: &str = "Error updating diagram.";
pub const ALERT_EMPTY_PROMPT: &str = "Please enter a prompt.";
pub const REJECT_EMPTY_PROMPT: &str = "empty prompt";

/// A trimmed, non-empty prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText(String);

impl PromptText {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyPrompt);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PromptText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a submission ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The image now shows `diagram_ref` and `prompt` was added to history
    Updated {
        prompt: PromptText,
        diagram_ref: String,
    },
    /// Validation failed; nothing was sent
    Rejected { reason: &'static str },
    /// The request was sent but did not produce a usable artifact
    Failed(Error),
}

impl SubmitOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, SubmitOutcome::Updated { .. })
    }
}

/// A validated submission waiting on the backend
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub prompt: PromptText,
    pub request: GenerateRequest,
}

/// Turns prompts into requests and backend replies into page updates.
#[derive(Debug, Clone)]
pub struct PromptSubmitter {
    artifact_prefix: String,
    follow_session: bool,
    backend_session: Option<String>,
}

impl PromptSubmitter {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            artifact_prefix: config.artifact_prefix.trim_end_matches('/').to_string(),
            follow_session: config.follow_session,
            backend_session: config.session_id.clone(),
        }
    }

    /// Backend session the next request will continue, if any
    pub fn backend_session(&self) -> Option<&str> {
        self.backend_session.as_deref()
    }

    /// Path the image is pointed at for a generated `filename`
    pub fn artifact_path(&self, filename: &str) -> String {
        format!("{}/{}", self.artifact_prefix, filename)
    }

    /// Validate `raw` and mark the page as loading.
    ///
    /// An empty prompt raises the page alert and returns the `Rejected`
    /// outcome; the status line, image, history and input are left alone.
    pub fn begin(
        &self,
        raw: &str,
        page: &Page,
    ) -> std::result::Result<PendingSubmission, SubmitOutcome> {
        let prompt = match PromptText::parse(raw) {
            Ok(p) => p,
            Err(_) => {
                page.alert.alert(ALERT_EMPTY_PROMPT);
                return Err(SubmitOutcome::Rejected {
                    reason: REJECT_EMPTY_PROMPT,
                });
            }
        };

        page.status.set_text(STATUS_LOADING);

        let request = match (&self.backend_session, self.follow_session) {
            (Some(session_id), true) => GenerateRequest::follow_up(prompt.as_str(), session_id),
            _ => GenerateRequest::new(prompt.as_str()),
        };
        Ok(PendingSubmission { prompt, request })
    }

    /// Apply the backend's answer. The input field is cleared on every path.
    pub fn complete(
        &mut self,
        pending: PendingSubmission,
        reply: Result<Generated>,
        page: &Page,
        history: &mut HistoryRecorder,
    ) -> SubmitOutcome {
        let outcome = match reply {
            Ok(generated) => {
                let diagram_ref = self.artifact_path(&generated.filename);
                page.image.set_source(&diagram_ref);
                page.status.set_text(STATUS_UPDATED);
                history.record(pending.prompt.as_str(), page.history.as_ref());

                if self.follow_session {
                    if let Some(id) = generated.session_id {
                        self.backend_session = Some(id);
                    }
                }
                log::info!("diagram updated: {}", diagram_ref);
                SubmitOutcome::Updated {
                    prompt: pending.prompt,
                    diagram_ref,
                }
            }
            Err(err) => {
                match &err {
                    Error::RequestFailed { .. } => page.status.set_text(STATUS_REQUEST_FAILED),
                    other => page.status.set_text(&format!("Error: {}", other)),
                }
                log::warn!("submission of {:?} failed: {}", pending.prompt.as_str(), err);
                SubmitOutcome::Failed(err)
            }
        };

        page.input.clear();
        outcome
    }
}
