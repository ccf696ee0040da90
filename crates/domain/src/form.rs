use opsdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::user::{UserRecord, UserRole, UserUpdatePayload};

/// Inputs rendered on the user detail form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    /// Display name.
    Name,
    /// Email address.
    Email,
    /// Role name, flattened from the role object.
    Role,
    /// Creation timestamp. Display only.
    CreatedAt,
}

impl FormField {
    /// All fields in render order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Role, Self::CreatedAt];

    /// Returns stable input identifier.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Role => "role",
            Self::CreatedAt => "created_at",
        }
    }

    /// Returns the label shown above the input.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Role => "Role",
            Self::CreatedAt => "Created At",
        }
    }

    /// Returns the hint shown inside an empty input.
    #[must_use]
    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::Name => "Name here ...",
            Self::Email => "Email here ...",
            Self::Role => "Role here ...",
            Self::CreatedAt => "Created here ...",
        }
    }

    /// Returns whether the input is rendered disabled.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::CreatedAt)
    }
}

/// Rendered state of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldView {
    /// Skeleton shown until the first successful load.
    Placeholder {
        /// Field being rendered.
        field: FormField,
    },
    /// Controlled text input.
    Input {
        /// Field being rendered.
        field: FormField,
        /// Current local value.
        value: String,
        /// Whether the input is disabled.
        read_only: bool,
    },
}

impl FieldView {
    /// Returns the field this view renders.
    #[must_use]
    pub fn field(&self) -> FormField {
        match self {
            Self::Placeholder { field } | Self::Input { field, .. } => *field,
        }
    }

    /// Returns the input value, or `None` for a placeholder.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Placeholder { .. } => None,
            Self::Input { value, .. } => Some(value.as_str()),
        }
    }
}

/// Locally owned, editable copy of a user record.
///
/// Loading is tracked separately from field contents, so a field the user clears after
/// a load still renders as an (empty) input rather than a skeleton.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDetailForm {
    name: String,
    email: String,
    role: String,
    created_at: String,
    loaded: bool,
}

impl UserDetailForm {
    /// Creates an empty, not yet loaded form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites every field from a fetched record and marks the form loaded.
    pub fn seed_from(&mut self, record: &UserRecord) {
        self.name.clone_from(&record.name);
        self.email.clone_from(&record.email);
        self.role.clone_from(&record.role.name);
        self.created_at.clone_from(&record.created_at);
        self.loaded = true;
    }

    /// Replaces one editable field. No validation is applied to the value.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> AppResult<()> {
        if !self.loaded {
            return Err(AppError::Validation(
                "form fields cannot be edited before the user is loaded".to_owned(),
            ));
        }

        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Role => &mut self.role,
            FormField::CreatedAt => {
                return Err(AppError::Validation(format!(
                    "form field '{}' is read-only",
                    field.as_str()
                )));
            }
        };
        *slot = value.into();

        Ok(())
    }

    /// Returns the current value of one field.
    #[must_use]
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => self.name.as_str(),
            FormField::Email => self.email.as_str(),
            FormField::Role => self.role.as_str(),
            FormField::CreatedAt => self.created_at.as_str(),
        }
    }

    /// Returns whether a record has been seeded into the form.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Builds the update body from the current field values.
    #[must_use]
    pub fn to_payload(&self) -> UserUpdatePayload {
        UserUpdatePayload {
            name: self.name.clone(),
            email: self.email.clone(),
            role: UserRole::new(self.role.clone()),
        }
    }

    /// Renders one field.
    #[must_use]
    pub fn field_view(&self, field: FormField) -> FieldView {
        if !self.loaded {
            return FieldView::Placeholder { field };
        }

        FieldView::Input {
            field,
            value: self.value(field).to_owned(),
            read_only: field.is_read_only(),
        }
    }

    /// Renders every field in display order.
    #[must_use]
    pub fn field_views(&self) -> Vec<FieldView> {
        FormField::ALL
            .iter()
            .map(|field| self.field_view(*field))
            .collect()
    }
}
