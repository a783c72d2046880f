//! Error taxonomy for catalog calls
//!
//! Every failure a caller can see is one of four kinds. Local validation
//! failures never leave the process; everything else is classified from the
//! server's answer and handed back unchanged.

use std::fmt;

/// Where an invalid-parameter rejection was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// Raised by the validation gate; no request was sent
    Client,
    /// The catalog server rejected the request
    Server,
}

impl fmt::Display for ParameterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterSource::Client => write!(f, "client"),
            ParameterSource::Server => write!(f, "server"),
        }
    }
}

/// Errors returned by the catalog client
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{operation}: invalid parameter '{parameter}' ({source_side}): {reason}")]
    InvalidParameter {
        operation: String,
        parameter: String,
        reason: String,
        source_side: ParameterSource,
    },

    #[error("{operation}: user '{user_id}' is not authorized: {message}")]
    UserNotAuthorized {
        operation: String,
        user_id: String,
        message: String,
    },

    #[error("{operation}: property server failure{}: {message}", status_suffix(.status))]
    PropertyServer {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{operation}: no {kind} found for '{guid}'")]
    NotFound {
        operation: String,
        kind: String,
        guid: String,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Validation gate rejection
    pub fn invalid(operation: &str, parameter: &str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidParameter {
            operation: operation.to_string(),
            parameter: parameter.to_string(),
            reason: reason.into(),
            source_side: ParameterSource::Client,
        }
    }

    pub fn property_server(operation: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        CatalogError::PropertyServer {
            operation: operation.to_string(),
            status,
            message: message.into(),
        }
    }

    /// Name of the operation that failed
    pub fn operation(&self) -> &str {
        match self {
            CatalogError::InvalidParameter { operation, .. }
            | CatalogError::UserNotAuthorized { operation, .. }
            | CatalogError::PropertyServer { operation, .. }
            | CatalogError::NotFound { operation, .. } => operation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }

    /// True when the request never left the client
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CatalogError::InvalidParameter {
                source_side: ParameterSource::Client,
                ..
            }
        )
    }
}

/// Format a catalog error for display to an end user
///
/// Server messages are cut down to printable characters and a bounded
/// length so that stack traces or internal identifiers do not leak to the
/// terminal.
pub fn format_catalog_error(error: &CatalogError) -> String {
    match error {
        CatalogError::InvalidParameter {
            parameter,
            reason,
            source_side: ParameterSource::Client,
            ..
        } => format!("Invalid value for '{}': {}", parameter, reason),
        CatalogError::InvalidParameter { reason, .. } => {
            format!("The catalog server rejected the request: {}", truncate_message(reason))
        }
        CatalogError::UserNotAuthorized { user_id, .. } => {
            format!("User '{}' is not authorized for this request.", user_id)
        }
        CatalogError::NotFound { kind, guid, .. } => format!("No {} with GUID {}.", kind, guid),
        CatalogError::PropertyServer {
            status: Some(status),
            ..
        } if *status >= 500 => "Catalog server temporarily unavailable. Please try again.".to_string(),
        CatalogError::PropertyServer { message, .. } => {
            format!("Request failed: {}", truncate_message(message))
        }
    }
}

fn truncate_message(message: &str) -> String {
    let sanitized = message
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < message.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
