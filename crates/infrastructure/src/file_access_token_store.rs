//! Token store backed by a JSON key/value file, the console's equivalent of
//! browser local storage.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use opsdesk_application::AccessTokenStore;
use opsdesk_core::{AccessToken, AppError, AppResult};
use serde_json::{Map, Value};
use tracing::debug;

/// Storage key the admin console keeps its access token under.
pub const ACCESS_TOKEN_STORAGE_KEY: &str = "access";

/// Reads the access token from a JSON object file on every call.
#[derive(Debug, Clone)]
pub struct FileAccessTokenStore {
    path: PathBuf,
    key: String,
}

impl FileAccessTokenStore {
    /// Creates a store reading [`ACCESS_TOKEN_STORAGE_KEY`] from the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: ACCESS_TOKEN_STORAGE_KEY.to_owned(),
        }
    }

    async fn read_entries(&self) -> AppResult<Option<Map<String, Value>>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read token store '{}': {error}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str::<Map<String, Value>>(&contents)
            .map(Some)
            .map_err(|error| {
                AppError::Validation(format!(
                    "token store '{}' must contain a JSON object: {error}",
                    self.path.display()
                ))
            })
    }
}

#[async_trait]
impl AccessTokenStore for FileAccessTokenStore {
    async fn load_access_token(&self) -> AppResult<Option<AccessToken>> {
        let Some(entries) = self.read_entries().await? else {
            debug!(path = %self.path.display(), "token store file does not exist");
            return Ok(None);
        };

        match entries.get(self.key.as_str()) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) if value.trim().is_empty() => Ok(None),
            Some(Value::String(value)) => AccessToken::new(value.as_str()).map(Some),
            Some(_) => Err(AppError::Validation(format!(
                "token store key '{}' must hold a string",
                self.key
            ))),
        }
    }
}
