//! Backend client: one POST per submission to the diagram service.
//!
//! `DiagramBackend` is the seam the session talks to. `HttpBackend` is the
//! blocking `reqwest` implementation; tests substitute scripted backends.

use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;

#[cfg(feature = "http")]
use crate::StudioConfig;
#[cfg(feature = "http")]
use reqwest::blocking::Client;
#[cfg(feature = "http")]
use std::time::Duration;

/// JSON body sent to the backend.
///
/// Only `prompt` is sent unless the session follows a backend session id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_prompt: Option<String>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            session_id: None,
            change_prompt: None,
        }
    }

    /// Continue an existing backend session with `prompt` as the change.
    pub fn follow_up(prompt: impl Into<String>, session_id: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self {
            change_prompt: Some(prompt.clone()),
            prompt,
            session_id: Some(session_id.into()),
        }
    }
}

/// A successful generation, as read from the backend's reply
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Artifact file name to be served under the artifact prefix
    pub filename: String,
    pub session_id: Option<String>,
    pub iterations: Option<u64>,
    pub message: Option<String>,
}

/// Interpret a backend reply.
///
/// Non-2xx statuses are `RequestFailed` and the body is not inspected. A 2xx
/// body must be a JSON object with a string `filename`; a non-null `error`
/// member is the backend reporting its own failure.
pub fn interpret_reply(status: u16, body: &str) -> Result<Generated> {
    if !(200..300).contains(&status) {
        return Err(Error::RequestFailed { status });
    }

    let json: Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("body is not JSON: {}", e)))?;
    let obj = json
        .as_object()
        .ok_or_else(|| Error::MalformedResponse("body is not a JSON object".into()))?;

    if let Some(err) = obj.get("error").filter(|e| !e.is_null()) {
        let msg = err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        return Err(Error::Backend(msg));
    }

    let filename = match obj.get("filename") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::String(_)) => {
            return Err(Error::MalformedResponse("`filename` is empty".into()))
        }
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "`filename` is not a string: {}",
                other
            )))
        }
        None => return Err(Error::MalformedResponse("missing `filename`".into())),
    };

    Ok(Generated {
        filename,
        session_id: obj
            .get("session_id")
            .and_then(Value::as_str)
            .map(str::to_string),
        iterations: obj.get("iterations").and_then(Value::as_u64),
        message: obj.get("message").and_then(Value::as_str).map(str::to_string),
    })
}

/// Something that can turn a prompt into a diagram artifact.
pub trait DiagramBackend: Send + Sync {
    fn generate(&self, request: &GenerateRequest) -> Result<Generated>;
}

impl<B: DiagramBackend + ?Sized> DiagramBackend for std::sync::Arc<B> {
    fn generate(&self, request: &GenerateRequest) -> Result<Generated> {
        (**self).generate(request)
    }
}

impl<B: DiagramBackend + ?Sized> DiagramBackend for Box<B> {
    fn generate(&self, request: &GenerateRequest) -> Result<Generated> {
        (**self).generate(request)
    }
}

/// Blocking HTTP backend posting JSON to the configured endpoint.
///
/// Must not be driven from inside an async runtime; `async_api::Studio` runs
/// it on its own worker thread.
#[cfg(feature = "http")]
pub struct HttpBackend {
    client: Client,
    config: StudioConfig,
}

#[cfg(feature = "http")]
impl HttpBackend {
    pub fn new(config: StudioConfig) -> Result<Self> {
        config.validate()?;

        // 0 => leave the request unbounded and rely on the transport
        let timeout = (config.timeout_ms > 0).then(|| Duration::from_millis(config.timeout_ms));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                Error::InitializationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[cfg(feature = "http")]
impl DiagramBackend for HttpBackend {
    fn generate(&self, request: &GenerateRequest) -> Result<Generated> {
        log::debug!("POST {} prompt={:?}", self.config.endpoint, request.prompt);

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        for (name, value) in &self.config.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let res = builder
            .json(request)
            .send()
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = res.status().as_u16();
        if !res.status().is_success() {
            return Err(Error::RequestFailed { status });
        }

        let text = res
            .text()
            .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?;
        interpret_reply(status, &text)
    }
}
