//! Application services and ports.

#![forbid(unsafe_code)]

mod user_detail_ports;
mod user_detail_view;

pub use user_detail_ports::{
    AccessTokenStore, Notification, NotificationLevel, Notifier, UpdateStatus, UserQueryService,
    UserUpdateService,
};
pub use user_detail_view::{
    ReadOutcome, SubmitOutcome, UPDATE_FAILURE_MESSAGE, UPDATE_SUCCESS_MESSAGE,
    USER_DETAIL_SUBMIT_LABEL, USER_DETAIL_TITLE, UserDetailSnapshot, UserDetailView, ViewPhase,
};
