use uuid::Uuid;

use crate::application::validation::{FieldErrors, PostFormInput};
use crate::domain::entities::PostRecord;
use crate::presentation::admin::views::AdminPostFormView;

use super::super::POSTS_PATH;

#[derive(Debug, Clone, Copy)]
pub(super) enum EditorMode {
    Create,
    Edit(Uuid),
}

impl EditorMode {
    fn form_action(self) -> String {
        match self {
            EditorMode::Create => POSTS_PATH.to_string(),
            EditorMode::Edit(id) => format!("{POSTS_PATH}/{id}?_method=PUT"),
        }
    }

    fn heading(self) -> &'static str {
        match self {
            EditorMode::Create => "Create post",
            EditorMode::Edit(_) => "Edit post",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            EditorMode::Create => "Create",
            EditorMode::Edit(_) => "Update",
        }
    }
}

pub(super) fn build_editor_view(
    mode: EditorMode,
    id: String,
    title: String,
    content: String,
    errors: Option<&FieldErrors>,
) -> AdminPostFormView {
    let message = |field: &str| errors.and_then(|errors| errors.first(field)).map(str::to_string);

    AdminPostFormView {
        heading: mode.heading().to_string(),
        form_action: mode.form_action(),
        submit_label: mode.submit_label().to_string(),
        cancel_href: POSTS_PATH.to_string(),
        id,
        title,
        content,
        id_error: message("id"),
        title_error: message("title"),
        content_error: message("content"),
    }
}

pub(super) fn build_new_post_editor_view() -> AdminPostFormView {
    build_editor_view(
        EditorMode::Create,
        String::new(),
        String::new(),
        String::new(),
        None,
    )
}

pub(super) fn build_post_editor_view(post: &PostRecord) -> AdminPostFormView {
    build_editor_view(
        EditorMode::Edit(post.id),
        post.id.to_string(),
        post.title.clone(),
        post.content.clone(),
        None,
    )
}

/// Re-renders what the user submitted alongside the validation messages.
pub(super) fn build_rejected_editor_view(
    mode: EditorMode,
    input: &PostFormInput,
    errors: &FieldErrors,
) -> AdminPostFormView {
    build_editor_view(
        mode,
        input.id.clone().unwrap_or_default(),
        input.title.clone().unwrap_or_default(),
        input.content.clone().unwrap_or_default(),
        Some(errors),
    )
}
