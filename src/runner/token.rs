use serde_json::Value;

use crate::error::LoginFailure;
use crate::executor::shape::is_truthy;
use crate::types::SessionToken;

/// Where a login response may carry its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// `{"data": {"token": ...}}`
    DataToken,
    /// `{"token": ...}`
    TopLevelToken,
}

impl TokenSource {
    /// Tried in this order; first hit wins
    pub const DEFAULT_ORDER: [TokenSource; 2] = [TokenSource::DataToken, TokenSource::TopLevelToken];

    fn pointer(&self) -> &'static str {
        match self {
            TokenSource::DataToken => "/data/token",
            TokenSource::TopLevelToken => "/token",
        }
    }

    pub fn extract(&self, body: &Value) -> Option<SessionToken> {
        body.pointer(self.pointer())
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(SessionToken::new)
    }
}

/// Decide whether a login outcome yields a usable session.
///
/// `None` means the request itself failed and was already reported.
pub fn authenticate(outcome: Option<&Value>, sources: &[TokenSource]) -> Result<SessionToken, LoginFailure> {
    let body = outcome.ok_or(LoginFailure::RequestFailed)?;

    let accepted = body
        .as_object()
        .and_then(|map| map.get("success"))
        .map(is_truthy)
        .unwrap_or(false);
    if !accepted {
        return Err(LoginFailure::Rejected);
    }

    sources
        .iter()
        .find_map(|source| source.extract(body))
        .ok_or(LoginFailure::MissingToken)
}
