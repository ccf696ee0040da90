//! User records exchanged with the admin API.

use std::str::FromStr;

use opsdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Cache tag under which user detail reads are keyed.
pub const USERS_DETAILS_QUERY_TAG: &str = "usersDetails";

/// Numeric identifier of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64")]
pub struct UserId(u64);

impl UserId {
    /// Creates a user identifier from a positive numeric value.
    pub fn new(value: u64) -> AppResult<Self> {
        if value == 0 {
            return Err(AppError::Validation(
                "user id must be greater than zero".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Parses the identifier carried by a navigation route segment.
    pub fn from_route(segment: &str) -> AppResult<Self> {
        segment.parse()
    }
}

impl TryFrom<u64> for UserId {
    type Error = AppError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for UserId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let parsed = trimmed.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid user id '{trimmed}': {error}"))
        })?;

        Self::new(parsed)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Role attached to a user. The API models roles as objects keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Role name, e.g. `admin`.
    pub name: String,
}

impl UserRole {
    /// Creates a role from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Server-authoritative representation of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier, when the API echoes it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Display name.
    pub name: String,
    /// Email address. Not validated client-side.
    pub email: String,
    /// Assigned role.
    pub role: UserRole,
    /// Creation timestamp exactly as the server formatted it.
    pub created_at: String,
}

/// Body of a user update request.
///
/// The creation timestamp is server-owned and never part of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdatePayload {
    /// New display name.
    pub name: String,
    /// New email address.
    pub email: String,
    /// New role, wrapped as an object.
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_segment_is_coerced_to_numeric_id() {
        let user_id = UserId::from_route("7").unwrap_or_else(|_| panic!("test"));
        assert_eq!(Some(user_id), UserId::new(7).ok());
        assert_eq!(user_id.to_string(), "7");
    }

    #[test]
    fn non_numeric_route_segment_is_rejected() {
        assert!(matches!(
            UserId::from_route("seven"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn zero_id_is_rejected() {
        assert!(UserId::from_route("0").is_err());
    }

    #[test]
    fn record_ignores_unknown_fields_and_missing_id() {
        let record = serde_json::from_value::<UserRecord>(serde_json::json!({
            "name": "Ada",
            "email": "a@x.com",
            "role": { "name": "admin", "permissions": [] },
            "created_at": "2024-01-01",
            "last_login": null
        }));

        let record = record.unwrap_or_else(|_| panic!("test"));
        assert_eq!(record.id, None);
        assert_eq!(record.role.name, "admin");
        assert_eq!(record.created_at, "2024-01-01");
    }

    #[test]
    fn record_with_zero_id_is_rejected() {
        let record = serde_json::from_value::<UserRecord>(serde_json::json!({
            "id": 0,
            "name": "Ada",
            "email": "a@x.com",
            "role": { "name": "admin" },
            "created_at": "2024-01-01"
        }));

        assert!(record.is_err());
    }

    #[test]
    fn record_keeps_positive_echoed_id() {
        let record = serde_json::from_value::<UserRecord>(serde_json::json!({
            "id": 7,
            "name": "Ada",
            "email": "a@x.com",
            "role": { "name": "admin" },
            "created_at": "2024-01-01"
        }));

        let record = record.unwrap_or_else(|_| panic!("test"));
        assert_eq!(record.id, UserId::new(7).ok());
    }

    #[test]
    fn update_payload_wraps_role_in_object() {
        let payload = UserUpdatePayload {
            name: "Ada".to_owned(),
            email: "ada@x.com".to_owned(),
            role: UserRole::new("admin"),
        };

        let value = serde_json::to_value(&payload).unwrap_or_default();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Ada",
                "email": "ada@x.com",
                "role": { "name": "admin" }
            })
        );
    }
}
