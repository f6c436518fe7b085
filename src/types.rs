use serde::{Deserialize, Serialize};

/// A role-labelled email/password pair used to authenticate one sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSet {
    pub role: String,
    pub email: String,
    pub password: String,
}

impl CredentialSet {
    pub fn new(role: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A labelled data-listing path checked once per authenticated role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    pub name: String,
    pub path: String,
}

impl EndpointDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Opaque bearer token issued by a successful login.
///
/// Lives only for the duration of one credential set's sweep.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Keep tokens out of debug logs
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.chars().count())
    }
}
