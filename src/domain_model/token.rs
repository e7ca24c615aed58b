use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(pub String);

impl AccessToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccessToken {
    fn from(value: &str) -> Self {
        AccessToken(value.to_owned())
    }
}

impl From<&str> for RefreshToken {
    fn from(value: &str) -> Self {
        RefreshToken(value.to_owned())
    }
}

/// Tokens handed out by a successful login.
///
/// The refresh token is absent when the server keeps it in a cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: Option<AccessToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
}

impl Session {
    pub fn new(access_token: AccessToken, refresh_token: Option<RefreshToken>) -> Self {
        Self {
            access_token: Some(access_token),
            refresh_token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Bumped on every access token replacement.
///
/// A request remembers the epoch it was authenticated under so a late 401 can
/// tell whether somebody else already refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenEpoch(pub u64);

/// Bumped whenever a session starts or ends, but not on refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionGeneration(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_value() {
        assert_eq!(AccessToken::from("tok1").bearer(), "Bearer tok1");
    }

    #[test]
    fn session_wire_format_uses_camel_case() {
        let session: Session =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(session.access_token, Some(AccessToken::from("a")));
        assert_eq!(session.refresh_token, Some(RefreshToken::from("r")));

        let cookie_only: Session = serde_json::from_str(r#"{"accessToken":"a"}"#).unwrap();
        assert!(cookie_only.refresh_token.is_none());
        assert!(cookie_only.is_authenticated());
    }
}
