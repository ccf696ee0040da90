//! Ports consumed by the user detail view.
//!
//! The view owns none of these concerns: reads, writes, token storage and
//! toasts are all provided by adapters chosen at the composition root.

use async_trait::async_trait;
use opsdesk_core::{AccessToken, AppResult};
use opsdesk_domain::{UserId, UserRecord, UserUpdatePayload};
use serde::Serialize;

/// Port for re-triggerable user reads.
#[async_trait]
pub trait UserQueryService: Send + Sync {
    /// Returns the user record, possibly from a cache.
    async fn fetch_user(&self, user_id: UserId) -> AppResult<UserRecord>;

    /// Re-runs the read for a user, bypassing any cached value.
    async fn refetch_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.fetch_user(user_id).await
    }
}

/// HTTP status reported by an accepted update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStatus(u16);

impl UpdateStatus {
    /// Wraps a raw HTTP status code.
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the raw HTTP status code.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.0
    }

    /// Only `200 OK` counts as an acknowledged update.
    #[must_use]
    pub fn is_acknowledged(&self) -> bool {
        self.0 == 200
    }
}

/// Port for authenticated user writes.
#[async_trait]
pub trait UserUpdateService: Send + Sync {
    /// Persists the payload for a user.
    ///
    /// Implementations return an error for transport failures and non-2xx responses.
    async fn update_user(
        &self,
        user_id: UserId,
        payload: &UserUpdatePayload,
        access_token: &AccessToken,
    ) -> AppResult<UpdateStatus>;
}

/// Port for the local persistent store holding the admin access token.
#[async_trait]
pub trait AccessTokenStore: Send + Sync {
    /// Reads the current access token, if one is stored.
    async fn load_access_token(&self) -> AppResult<Option<AccessToken>>;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
}

/// User-facing toast message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message shown to the user.
    pub message: String,
}

impl Notification {
    /// Creates a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Port for showing toasts.
pub trait Notifier: Send + Sync {
    /// Shows one notification.
    fn notify(&self, notification: Notification);
}
