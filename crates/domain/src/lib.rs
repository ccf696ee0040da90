//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod form;
mod user;

pub use form::{FieldView, FormField, UserDetailForm};
pub use user::{USERS_DETAILS_QUERY_TAG, UserId, UserRecord, UserRole, UserUpdatePayload};
