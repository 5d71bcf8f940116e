use serde::{Deserialize, Serialize};

/// The principal the dashboard acts on behalf of.
///
/// Requests to the Kubernetes API are authenticated with the caller's own
/// credentials; this type only carries them through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedInUser {
    pub auth_scheme: String,
    pub token: String,
}

impl LoggedInUser {
    pub fn new(auth_scheme: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            auth_scheme: auth_scheme.into(),
            token: token.into(),
        }
    }

    /// Parse an `Authorization` header value such as `Bearer abc`.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        if scheme.is_empty() || token.is_empty() {
            return None;
        }

        Some(Self::new(scheme, token))
    }

    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.auth_scheme, self.token)
    }
}
