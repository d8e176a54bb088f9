//! Error model for the dispatch pipeline.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use thiserror::Error;

use crate::{ActionName, FormatId};

pub const ERROR_INVALID_ACTION_REQUEST_NAME: &str = "ERROR_INVALID_ACTION_REQUEST";
pub const ERROR_INVALID_ACTION_REQUEST_MSG: &str = "Invalid action request";
pub const ERROR_INVALID_ACTION_REQUEST_NO: u16 = 400;

pub const ERROR_INVALID_OUTPUT_FORMAT_NAME: &str = "ERROR_INVALID_OUTPUT_FORMAT";
pub const ERROR_INVALID_OUTPUT_FORMAT_MSG: &str = "Invalid output format";
pub const ERROR_INVALID_OUTPUT_FORMAT_NO: u16 = 400;

pub const ERROR_RENDERING_NAME: &str = "ERROR_RENDERING";
pub const ERROR_RENDERING_NO: u16 = 500;

/// Status used when an error code is not a usable HTTP error status.
const FALLBACK_STATUS: u16 = 400;

/// Structured, client-visible error.
///
/// Every failure leaving the dispatcher is expressed as one of these, so it
/// can be rendered through the same output path as a successful result.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("{name}: {message}")]
pub struct ApiError {
    name: Cow<'static, str>,
    message: String,
    code: u16,
    at: Option<String>,
}

impl ApiError {
    pub fn new(name: impl Into<Cow<'static, str>>, message: impl Into<String>, code: u16) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            code,
            at: None,
        }
    }

    /// Attach the offending item (parameter, action, format) to the error.
    pub fn with_at(mut self, at: impl Into<String>) -> Self {
        self.at = Some(at.into());
        self
    }

    pub fn invalid_action_request() -> Self {
        Self::new(
            ERROR_INVALID_ACTION_REQUEST_NAME,
            ERROR_INVALID_ACTION_REQUEST_MSG,
            ERROR_INVALID_ACTION_REQUEST_NO,
        )
    }

    pub fn invalid_output_format(format: &FormatId) -> Self {
        Self::new(
            ERROR_INVALID_OUTPUT_FORMAT_NAME,
            ERROR_INVALID_OUTPUT_FORMAT_MSG,
            ERROR_INVALID_OUTPUT_FORMAT_NO,
        )
        .with_at(format.as_str())
    }

    pub fn rendering(msg: impl Into<String>) -> Self {
        Self::new(ERROR_RENDERING_NAME, msg, ERROR_RENDERING_NO)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn at(&self) -> Option<&str> {
        self.at.as_deref()
    }

    /// HTTP status for this error.
    ///
    /// Codes in the 4xx/5xx range are used verbatim; anything else is a
    /// client error.
    pub fn status(&self) -> u16 {
        if (400..=599).contains(&self.code) {
            self.code
        } else {
            FALLBACK_STATUS
        }
    }

    /// Renderable representation: `{"errors": [{...}]}`.
    pub fn to_error_map(&self) -> JsonValue {
        json!({
            "errors": [{
                "message": self.message,
                "name": self.name,
                "code": self.code,
                "at": self.at,
            }]
        })
    }
}

/// A name handed to a resolver did not resolve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    #[error("unknown action '{0}'")]
    UnknownAction(ActionName),

    #[error("unknown output format '{0}'")]
    UnknownFormat(FormatId),

    /// Output was requested before an action was resolved and bound.
    #[error("no action bound for this request")]
    ActionNotBound,
}

/// Everything that can stop a request on its way to a rendered response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionFailure),

    /// Public/partner check failed without a backend-supplied reason.
    #[error("authorization failed: {0}")]
    Authorization(ApiError),

    /// The partner backend raised its own error; it is passed through as is.
    #[error("partner backend: {0}")]
    Backend(ApiError),

    /// The action raised a structured error while executing.
    #[error("action failed: {0}")]
    Action(ApiError),

    /// The renderer could not produce output for the given data.
    #[error("rendering failed: {0}")]
    Rendering(String),
}
