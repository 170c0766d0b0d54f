//! Error taxonomy for the tag layer
//!
//! Adapters and finders perform exactly one local recovery: translating a
//! backend's well-known "not found" code into [`NotFoundError`]. Every
//! other failure propagates unchanged. Nothing here formats user-facing
//! messages; callers own presentation.

use std::fmt;
use thiserror::Error;

/// Distinguished signal that a resource or tag key is absent.
///
/// Callers use this to tell "is absent" (safe to proceed, e.g. treat as
/// deleted or keep polling) apart from "call failed" (must propagate).
/// The original error and the Debug rendering of the request are kept for
/// diagnostics.
#[derive(Debug, Default)]
pub struct NotFoundError {
    pub last_error: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub last_request: Option<String>,
}

impl NotFoundError {
    pub fn new<E, R>(last_error: E, last_request: &R) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
        R: fmt::Debug + ?Sized,
    {
        Self {
            last_error: Some(Box::new(last_error)),
            last_request: Some(format!("{last_request:?}")),
        }
    }

    /// Classify a structurally empty successful response as absence
    /// rather than success with a null payload.
    pub fn empty_result<R: fmt::Debug + ?Sized>(last_request: &R) -> Self {
        Self {
            last_error: None,
            last_request: Some(format!("{last_request:?}")),
        }
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.last_request {
            Some(request) => write!(f, "couldn't find resource (request: {request})"),
            None => write!(f, "couldn't find resource"),
        }
    }
}

impl std::error::Error for NotFoundError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last_error
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Errors surfaced by adapters, finders, and the reconciler.
#[derive(Error, Debug)]
pub enum CloudError {
    /// Resource or tag key absent; recoverable by the caller.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Structured error reported by the backend API.
    #[error("api error [{code}]: {message}")]
    Api { code: String, message: String },

    /// Connection-level failure before any structured response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived but did not have the documented shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CloudError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

/// Translate a structured API error whose code appears in `codes` into
/// the not-found signal; anything else passes through unchanged.
///
/// Each adapter keeps its own `codes` table next to the calls it covers
/// so the translation rules stay auditable per backend.
pub fn translate_not_found<R>(err: CloudError, codes: &[&str], request: &R) -> CloudError
where
    R: fmt::Debug + ?Sized,
{
    let matched = matches!(&err, CloudError::Api { code, .. } if codes.contains(&code.as_str()));
    if matched {
        CloudError::NotFound(NotFoundError::new(err, request))
    } else {
        err
    }
}
