use crate::domain::models::rbac::K8sStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Kubernetes API error ({}): {}", .0.code, .0.message.as_deref().unwrap_or("no message"))]
    Kubernetes(K8sStatus),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// The Kubernetes `Status` carried by this error, if the API produced one.
    pub fn status(&self) -> Option<&K8sStatus> {
        match self {
            DomainError::Kubernetes(status) => Some(status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            DomainError::NotFound(_) => true,
            DomainError::Kubernetes(status) => status.is_not_found(),
            _ => false,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Extract a human readable message out of an error.
///
/// Prefers the message of a Kubernetes `Status` response, then the error's
/// own text, and finally `fallback` when both are empty.
pub fn extract_error_message(err: Option<&DomainError>, fallback: &str) -> String {
    let Some(err) = err else {
        return String::new();
    };

    let message = match err.status() {
        Some(status) => status.message.clone().unwrap_or_default(),
        None => err.to_string(),
    };

    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
