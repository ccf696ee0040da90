use std::fmt::{Debug, Formatter};

use crate::{AppError, AppResult};

/// Bearer token presented to the admin API on authenticated writes.
///
/// The raw value never appears in `Debug` output so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a token from its raw value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Unauthorized(
                "access token must not be empty".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AccessToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::AccessToken;

    #[test]
    fn access_token_rejects_blank_value() {
        assert!(AccessToken::new("  ").is_err());
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-value").unwrap_or_else(|_| panic!("test"));
        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
        assert_eq!(token.bearer_header(), "Bearer secret-value");
    }
}
