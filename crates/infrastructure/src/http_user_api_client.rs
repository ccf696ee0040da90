use async_trait::async_trait;
use opsdesk_application::{UpdateStatus, UserQueryService, UserUpdateService};
use opsdesk_core::{AccessToken, AppError, AppResult};
use opsdesk_domain::{UserId, UserRecord, UserUpdatePayload};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;
use url::Url;

/// REST adapter for the admin API's `/users/{id}/` resource.
///
/// Reads are unauthenticated at this layer; writes carry the bearer token the
/// caller passes in, so the client itself holds no credentials.
#[derive(Clone)]
pub struct HttpUserApiClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpUserApiClient {
    /// Creates a client rooted at the admin API base URL.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Returns the detail URL for a user, always with a trailing slash.
    pub fn user_url(&self, user_id: UserId) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "api base url '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(&["users", user_id.to_string().as_str(), ""]);

        Ok(url)
    }
}

#[async_trait]
impl UserQueryService for HttpUserApiClient {
    async fn fetch_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        let url = self.user_url(user_id)?;
        debug!(user_id = %user_id, url = %url, "fetching user detail");

        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| {
                AppError::Transport(format!("failed to call user detail endpoint: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(status_error("user detail", status, body));
        }

        response.json::<UserRecord>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse user detail response body: {error}"
            ))
        })
    }
}

#[async_trait]
impl UserUpdateService for HttpUserApiClient {
    async fn update_user(
        &self,
        user_id: UserId,
        payload: &UserUpdatePayload,
        access_token: &AccessToken,
    ) -> AppResult<UpdateStatus> {
        let url = self.user_url(user_id)?;
        debug!(user_id = %user_id, url = %url, "updating user");

        let response = self
            .http_client
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, access_token.bearer_header())
            .json(payload)
            .send()
            .await
            .map_err(|error| {
                AppError::Transport(format!("failed to call user update endpoint: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_owned());
            return Err(status_error("user update", status, body));
        }

        Ok(UpdateStatus::new(status.as_u16()))
    }
}

fn status_error(endpoint: &str, status: StatusCode, body: String) -> AppError {
    let message = format!(
        "{endpoint} endpoint returned status {}: {body}",
        status.as_u16()
    );

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Validation(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Transport(message),
    }
}
