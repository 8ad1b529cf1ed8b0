//! Payload validators for the admin forms and the delete confirmation page.

use std::collections::BTreeMap;

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub const TITLE_MAX_LENGTH: u64 = 255;

/// Field name to messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    fn merge(&mut self, errors: ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"));
                self.add(field.to_string(), message);
            }
        }
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        fields.merge(errors);
        fields
    }
}

/// Raw post form as submitted; every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFormInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CreatePostPayload {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title is required and must be at most 255 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct UpdatePostPayload {
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title is required and must be at most 255 characters"
    ))]
    pub title: String,
    pub content: String,
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

pub fn validate_create_post(input: &PostFormInput) -> Result<CreatePostPayload, FieldErrors> {
    let payload = CreatePostPayload {
        title: trimmed(input.title.as_deref()),
        content: trimmed(input.content.as_deref()),
    };
    let errors = payload.validate().map(|_| FieldErrors::new());
    errors.unwrap_or_else(FieldErrors::from).into_result(payload)
}

/// The payload id must name the post addressed by the route.
pub fn validate_update_post(
    input: &PostFormInput,
    route_id: Uuid,
) -> Result<UpdatePostPayload, FieldErrors> {
    let payload = UpdatePostPayload {
        id: trimmed(input.id.as_deref()),
        title: trimmed(input.title.as_deref()),
        content: trimmed(input.content.as_deref()),
    };
    let mut errors = payload
        .validate()
        .map(|_| FieldErrors::new())
        .unwrap_or_else(FieldErrors::from);

    if !errors.contains("id") {
        match Uuid::parse_str(&payload.id) {
            Ok(id) if id == route_id => {}
            Ok(_) => errors.add("id", "Id does not match the post being updated"),
            Err(_) => errors.add("id", "Id must be a valid UUID"),
        }
    }

    errors.into_result(payload)
}

/// Query string of the confirmation page. Names follow the wire format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmDeleteInput {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "formAction")]
    pub form_action: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ConfirmDeletePayload {
    #[validate(length(min = 1, message = "Entity is required"))]
    pub entity: String,
    #[validate(length(min = 1, message = "Id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "Form action is required"))]
    pub form_action: String,
    #[validate(length(min = 1, message = "Redirect is required"))]
    pub redirect: String,
}

pub fn validate_confirm_delete(
    input: &ConfirmDeleteInput,
) -> Result<ConfirmDeletePayload, FieldErrors> {
    let payload = ConfirmDeletePayload {
        entity: trimmed(input.entity.as_deref()),
        id: trimmed(input.id.as_deref()),
        form_action: trimmed(input.form_action.as_deref()),
        redirect: trimmed(input.redirect.as_deref()),
    };
    let mut errors = payload
        .validate()
        .map(|_| FieldErrors::new())
        .unwrap_or_else(FieldErrors::from);

    if !errors.contains("form_action") && !is_local_path(&payload.form_action) {
        errors.add("form_action", "Form action must be a local path");
    }
    if !errors.contains("redirect") && !is_local_path(&payload.redirect) {
        errors.add("redirect", "Redirect must be a local path");
    }

    errors.into_result(payload)
}

/// Absolute path on this host: starts with `/` but not `//` or `/\`.
pub fn is_local_path(value: &str) -> bool {
    value.starts_with('/')
        && !value.starts_with("//")
        && !value.starts_with("/\\")
        && !value.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(id: Option<&str>, title: Option<&str>, content: Option<&str>) -> PostFormInput {
        PostFormInput {
            id: id.map(str::to_string),
            title: title.map(str::to_string),
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn create_trims_and_accepts_valid_input() {
        let payload = validate_create_post(&form(None, Some("  Hello "), Some(" Body "))).unwrap();
        assert_eq!(payload.title, "Hello");
        assert_eq!(payload.content, "Body");
    }

    #[test]
    fn create_requires_title_and_content() {
        let errors = validate_create_post(&form(None, Some("   "), None)).unwrap_err();
        assert!(errors.contains("title"));
        assert_eq!(errors.first("content"), Some("Content is required"));
    }

    #[test]
    fn create_rejects_overlong_title() {
        let title = "t".repeat(256);
        let errors = validate_create_post(&form(None, Some(&title), Some("body"))).unwrap_err();
        assert!(errors.contains("title"));
        assert!(!errors.contains("content"));

        let title = "é".repeat(255);
        assert!(validate_create_post(&form(None, Some(&title), Some("body"))).is_ok());
    }

    #[test]
    fn update_defaults_missing_content_to_empty() {
        let id = Uuid::new_v4();
        let payload =
            validate_update_post(&form(Some(&id.to_string()), Some("Title"), None), id).unwrap();
        assert_eq!(payload.content, "");
        assert_eq!(payload.id, id.to_string());
    }

    #[test]
    fn update_checks_id_against_route() {
        let route_id = Uuid::new_v4();

        let errors = validate_update_post(&form(None, Some("Title"), None), route_id).unwrap_err();
        assert_eq!(errors.first("id"), Some("Id is required"));

        let errors =
            validate_update_post(&form(Some("nope"), Some("Title"), None), route_id).unwrap_err();
        assert_eq!(errors.first("id"), Some("Id must be a valid UUID"));

        let other = Uuid::new_v4().to_string();
        let errors =
            validate_update_post(&form(Some(&other), Some("Title"), None), route_id).unwrap_err();
        assert_eq!(
            errors.first("id"),
            Some("Id does not match the post being updated")
        );
    }

    #[test]
    fn confirm_delete_requires_all_fields() {
        let errors = validate_confirm_delete(&ConfirmDeleteInput::default()).unwrap_err();
        for field in ["entity", "id", "form_action", "redirect"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn confirm_delete_rejects_foreign_targets() {
        let input = ConfirmDeleteInput {
            entity: Some("Delete?".into()),
            id: Some("1".into()),
            form_action: Some("https://evil.example/delete".into()),
            redirect: Some("//evil.example".into()),
        };
        let errors = validate_confirm_delete(&input).unwrap_err();
        assert_eq!(
            errors.first("form_action"),
            Some("Form action must be a local path")
        );
        assert_eq!(errors.first("redirect"), Some("Redirect must be a local path"));
    }

    #[test]
    fn local_paths() {
        assert!(is_local_path("/admin/posts"));
        assert!(is_local_path("/admin/posts/1?_method=DELETE"));
        assert!(!is_local_path("admin/posts"));
        assert!(!is_local_path("//example.com"));
        assert!(!is_local_path("/\\example.com"));
        assert!(!is_local_path(""));
    }
}
