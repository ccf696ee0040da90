use opsdesk_core::AccessToken;
use opsdesk_domain::UserUpdatePayload;
use tracing::{info, warn};

use super::*;
use crate::{Notification, UpdateStatus};

impl UserDetailView {
    /// Sends the current field values to the update port.
    ///
    /// Write failures of any kind are reported through the notifier and as
    /// [`SubmitOutcome::Failed`]; the only error returned is submitting before a
    /// user has been loaded. Concurrent submissions are not prevented.
    pub async fn submit(&self) -> AppResult<SubmitOutcome> {
        let (user_id, generation, payload) = {
            let mut state = self.lock_state()?;
            let user_id = state.user_id.ok_or_else(|| {
                AppError::Validation("no user is bound to the detail view".to_owned())
            })?;
            if !state.form.is_loaded() {
                return Err(AppError::Validation(
                    "cannot submit before the user is loaded".to_owned(),
                ));
            }
            state.phase = ViewPhase::Submitting;
            (user_id, state.generation, state.form.to_payload())
        };

        match self.send_update(user_id, &payload).await {
            Ok(status) if status.is_acknowledged() => {
                self.notifier
                    .notify(Notification::success(UPDATE_SUCCESS_MESSAGE));
                info!(user_id = %user_id, "user updated");

                let refreshed = self.reconcile(user_id, generation).await?;
                Ok(SubmitOutcome::Updated { refreshed })
            }
            Ok(status) => {
                warn!(
                    user_id = %user_id,
                    status = status.code(),
                    "user update returned an unexpected success status"
                );
                self.restore_editing(generation)?;
                Ok(SubmitOutcome::Unacknowledged {
                    status: status.code(),
                })
            }
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "user update failed");
                self.notifier
                    .notify(Notification::error(UPDATE_FAILURE_MESSAGE));
                self.restore_editing(generation)?;
                Ok(SubmitOutcome::Failed)
            }
        }
    }

    async fn send_update(
        &self,
        user_id: UserId,
        payload: &UserUpdatePayload,
    ) -> AppResult<UpdateStatus> {
        let access_token = self.load_access_token().await?;
        self.update_service
            .update_user(user_id, payload, &access_token)
            .await
    }

    async fn load_access_token(&self) -> AppResult<AccessToken> {
        self.token_store
            .load_access_token()
            .await?
            .ok_or_else(|| AppError::Unauthorized("no access token is stored".to_owned()))
    }

    /// Re-reads the user after an acknowledged write. Returns whether the form was re-seeded.
    async fn reconcile(&self, user_id: UserId, generation: u64) -> AppResult<bool> {
        let ticket = {
            let mut state = self.lock_state()?;
            if state.generation != generation {
                debug!(
                    user_id = %user_id,
                    "view moved on before the update finished; skipping refetch"
                );
                return Ok(false);
            }
            state.phase = ViewPhase::Loaded;
            state.issue_read(user_id, ReadTrigger::Reconcile)
        };

        match self.run_read(ticket).await {
            Ok(outcome) => Ok(outcome == ReadOutcome::Applied),
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "refetch after update failed");
                Ok(false)
            }
        }
    }

    fn restore_editing(&self, generation: u64) -> AppResult<()> {
        let mut state = self.lock_state()?;
        if state.generation == generation && state.phase == ViewPhase::Submitting {
            state.phase = ViewPhase::Editing;
        }

        Ok(())
    }
}
