use tracing::{info, warn};

use super::*;

impl UserDetailView {
    /// Mounts the view for the identifier carried by the current route.
    pub async fn activate(&self, route_user_id: &str) -> AppResult<ReadOutcome> {
        let user_id = UserId::from_route(route_user_id)?;
        self.activate_user(user_id).await
    }

    /// Mounts the view for a user and issues exactly one read for it.
    ///
    /// Switching to a different user clears the form so the previous user's values
    /// are never shown under the new identifier.
    pub async fn activate_user(&self, user_id: UserId) -> AppResult<ReadOutcome> {
        let ticket = {
            let mut state = self.lock_state()?;
            state.generation = state.generation.saturating_add(1);
            if state.user_id != Some(user_id) {
                state.reset_form();
            }
            state.user_id = Some(user_id);
            state.issue_read(user_id, ReadTrigger::Activation)
        };

        match self.run_read(ticket).await {
            Ok(outcome) => {
                info!(
                    user_id = %user_id,
                    applied = outcome == ReadOutcome::Applied,
                    "user detail read completed"
                );
                Ok(outcome)
            }
            Err(error) => {
                warn!(user_id = %user_id, error = %error, "user detail read failed");
                Err(error)
            }
        }
    }
}
