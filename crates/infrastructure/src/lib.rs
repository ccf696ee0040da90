//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_access_token_store;
mod http_user_api_client;
mod in_memory_user_query_cache;
mod tracing_notifier;

pub use file_access_token_store::{ACCESS_TOKEN_STORAGE_KEY, FileAccessTokenStore};
pub use http_user_api_client::HttpUserApiClient;
pub use in_memory_user_query_cache::InMemoryUserQueryCache;
pub use tracing_notifier::TracingNotifier;
