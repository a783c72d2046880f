//! Platform credentials
//!
//! Identity of the calling platform, sent with every HTTP request. This is
//! separate from the end user's `userId`, which travels in the request path.

use reqwest::RequestBuilder;
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub enum PlatformCredentials {
    /// HTTP basic authentication
    Basic { user_id: String, password: String },
}

impl PlatformCredentials {
    pub fn basic(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        PlatformCredentials::Basic {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    /// Attach the credentials to an outgoing request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            PlatformCredentials::Basic { user_id, password } => {
                request.basic_auth(user_id, Some(password))
            }
        }
    }
}

// Security: never print the password
impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformCredentials::Basic { user_id, .. } => f
                .debug_struct("Basic")
                .field("user_id", user_id)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let creds = PlatformCredentials::basic("npa", "s3cret");
        let shown = format!("{:?}", creds);
        assert!(shown.contains("npa"));
        assert!(!shown.contains("s3cret"));
    }
}
