use opsdesk_application::{USER_DETAIL_SUBMIT_LABEL, USER_DETAIL_TITLE, UserDetailSnapshot};
use opsdesk_core::{AppError, AppResult};
use opsdesk_domain::FieldView;

/// Renders a snapshot as the plain-text form printed by the console.
pub fn render_text(snapshot: &UserDetailSnapshot) -> String {
    let mut lines = vec![USER_DETAIL_TITLE.to_owned()];

    for view in &snapshot.fields {
        let field = view.field();
        let line = match view {
            FieldView::Placeholder { .. } => format!("{}: [loading]", field.label()),
            FieldView::Input {
                value, read_only, ..
            } => {
                let shown = if value.is_empty() {
                    field.placeholder()
                } else {
                    value.as_str()
                };
                if *read_only {
                    format!("{}: {shown} (read-only)", field.label())
                } else {
                    format!("{}: {shown}", field.label())
                }
            }
        };
        lines.push(line);
    }

    lines.push(format!("[{USER_DETAIL_SUBMIT_LABEL}] ({})", snapshot.phase.as_str()));
    lines.join("\n")
}

/// Renders a snapshot as pretty-printed JSON for `--json` runs.
pub fn render_json(snapshot: &UserDetailSnapshot) -> AppResult<String> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|error| AppError::Internal(format!("failed to serialize form snapshot: {error}")))
}
