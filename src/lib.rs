//! Mermaid Studio
//!
//! A controller for a prompt-driven diagram page: it collects a prompt, posts
//! it to the diagram backend, points the page's image at the generated
//! artifact, keeps an in-memory prompt history and scales the image on demand.
//!
//! # Features
//!
//! - **HTTP backend** (default, `http`): blocking `reqwest` client posting JSON
//! - **Page surface**: the page's elements are traits, so any host can drive
//!   the session; `MemoryPage` keeps them in memory
//! - **Async facade**: `Studio` runs requests on a worker thread so zoom and
//!   history stay responsive while a submission is in flight
//!
//! # Example
//!
//! ```no_run
//! use mermaid_studio::page::{MemoryPage, StatusLine};
//! use mermaid_studio::{Control, EventKind, StudioConfig, UiEvent};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let page = MemoryPage::new();
//! let mut session = mermaid_studio::new_session(StudioConfig::default(), &page)?;
//!
//! let outcome = session.submit("  make the boxes blue  ");
//! println!("{:?} / status: {}", outcome, page.status().text());
//!
//! session.dispatch(UiEvent::new(Control::ZoomInButton, EventKind::Click));
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod async_api;
pub mod backend;
pub mod history;
pub mod page;
pub mod session;
pub mod submit;
pub mod zoom;

pub use async_api::Studio;
pub use backend::{DiagramBackend, GenerateRequest, Generated};
#[cfg(feature = "http")]
pub use backend::HttpBackend;
pub use history::HistoryRecorder;
pub use session::{Action, Control, Dispatched, EventKind, Session, UiEvent};
pub use submit::{PromptText, SubmitOutcome};
pub use zoom::ZoomController;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/iterative-mermaid";
pub const DEFAULT_ARTIFACT_PREFIX: &str = "/output";

/// Configuration for a studio session
///
/// The defaults reproduce the stock page: the local iterative backend,
/// artifacts under `/output`, no client-side timeout, and the history list
/// starting hidden.
///
/// # Examples
///
/// ```
/// let cfg = mermaid_studio::StudioConfig::default();
/// assert!(cfg.endpoint.ends_with("/iterative-mermaid"));
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// URL the prompt is POSTed to
    pub endpoint: String,
    /// Path prefix the backend serves artifacts under
    pub artifact_prefix: String,
    /// Request timeout in milliseconds (0 => none; rely on the transport)
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Extra HTTP headers sent with every request
    pub headers: HashMap<String, String>,
    /// Whether the history list starts hidden
    pub history_hidden: bool,
    /// Continue the backend session returned by the previous success.
    ///
    /// Only replies that also carry a `filename` count as a success, so a
    /// backend answering with `session_id` alone never starts a session here;
    /// seed one with `session_id` instead.
    pub follow_session: bool,
    /// Backend session to resume from the first request on
    pub session_id: Option<String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            timeout_ms: 0,
            user_agent: concat!("mermaid-studio/", env!("CARGO_PKG_VERSION")).to_string(),
            headers: HashMap::new(),
            history_hidden: true,
            follow_session: false,
            session_id: None,
        }
    }
}

impl StudioConfig {
    /// Check the endpoint and artifact prefix before any session is built.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| Error::ConfigError(format!("endpoint {:?}: {}", self.endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "endpoint must be http(s), got {:?}",
                url.scheme()
            )));
        }
        if self.artifact_prefix.trim_matches('/').is_empty() {
            return Err(Error::ConfigError("artifact prefix must not be empty".into()));
        }
        if self.session_id.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(Error::ConfigError("session id must not be blank".into()));
        }
        self.validate_headers()
    }

    /// Every extra header must be sendable; `Content-Type` is always JSON.
    #[cfg(feature = "http")]
    fn validate_headers(&self) -> Result<()> {
        use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};

        for (name, value) in &self.headers {
            let parsed = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::ConfigError(format!("header name {:?}: {}", name, e)))?;
            if parsed == CONTENT_TYPE {
                return Err(Error::ConfigError(
                    "Content-Type is fixed to application/json".into(),
                ));
            }
            HeaderValue::from_str(value)
                .map_err(|e| Error::ConfigError(format!("header {:?} value: {}", name, e)))?;
        }
        Ok(())
    }

    #[cfg(not(feature = "http"))]
    fn validate_headers(&self) -> Result<()> {
        Ok(())
    }
}

/// Create a session against the HTTP backend described by `config`.
#[cfg(feature = "http")]
pub fn new_session(
    config: StudioConfig,
    surface: &dyn page::PageSurface,
) -> Result<Session<HttpBackend>> {
    let backend = HttpBackend::new(config.clone())?;
    Session::new(config, backend, surface)
}
