use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::{
    application::{
        admin::posts::{CreatePostCommand, UpdatePostCommand},
        error::HttpError,
        pagination::PageRequest,
        validation::{PostFormInput, validate_create_post, validate_update_post},
    },
    infra::http::{
        admin::{AdminState, POSTS_PATH, redirect_with_flash, render_admin_page},
        flash::FlashMessage,
        session::CurrentUser,
    },
    presentation::admin::views as admin_views,
};

use super::editor::{
    EditorMode, build_new_post_editor_view, build_post_editor_view, build_rejected_editor_view,
};
use super::errors::{admin_post_error, post_not_found};
use super::forms::{AdminPostListQuery, parse_post_id};
use super::panel::build_post_list_view;
use super::{POST_CREATED, POST_DELETED, POST_UPDATED};

pub(crate) async fn admin_posts(
    State(state): State<AdminState>,
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
    Query(query): Query<AdminPostListQuery>,
) -> Response {
    let page = match PageRequest::from_query(query.page.as_deref(), state.per_page) {
        Ok(page) => page,
        Err(err) => {
            return HttpError::new(
                "infra::http::admin_posts",
                StatusCode::BAD_REQUEST,
                "Invalid page",
                err.to_string(),
            )
            .into_response();
        }
    };

    let posts = match state.posts.list(&user, page).await {
        Ok(posts) => posts,
        Err(err) => return admin_post_error("infra::http::admin_posts", err).into_response(),
    };

    let content = build_post_list_view(&user, posts);
    render_admin_page(jar, &user, POSTS_PATH, content, StatusCode::OK, |view| {
        admin_views::AdminPostsTemplate { view }
    })
}

pub(crate) async fn admin_post_create(
    State(state): State<AdminState>,
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
) -> Response {
    if let Err(err) = state.posts.authorize_create(&user) {
        return admin_post_error("infra::http::admin_post_create", err).into_response();
    }

    let content = build_new_post_editor_view();
    render_admin_page(jar, &user, POSTS_PATH, content, StatusCode::OK, |view| {
        admin_views::AdminPostFormTemplate { view }
    })
}

pub(crate) async fn admin_post_store(
    State(state): State<AdminState>,
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
    Form(form): Form<PostFormInput>,
) -> Response {
    if let Err(err) = state.posts.authorize_create(&user) {
        return admin_post_error("infra::http::admin_post_store", err).into_response();
    }

    let payload = match validate_create_post(&form) {
        Ok(payload) => payload,
        Err(errors) => {
            let content = build_rejected_editor_view(EditorMode::Create, &form, &errors);
            return render_admin_page(
                jar,
                &user,
                POSTS_PATH,
                content,
                StatusCode::UNPROCESSABLE_ENTITY,
                |view| admin_views::AdminPostFormTemplate { view },
            );
        }
    };

    let command = CreatePostCommand {
        title: payload.title,
        content: payload.content,
    };

    match state.posts.create_post(&user, command).await {
        Ok(_) => redirect_with_flash(jar, POSTS_PATH, FlashMessage::success(POST_CREATED)),
        Err(err) => admin_post_error("infra::http::admin_post_store", err).into_response(),
    }
}

pub(crate) async fn admin_post_edit(
    State(state): State<AdminState>,
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_post_id(&id) else {
        return post_not_found("infra::http::admin_post_edit", format!("invalid post id `{id}`"))
            .into_response();
    };

    let post = match state.posts.load_for_edit(&user, id).await {
        Ok(post) => post,
        Err(err) => return admin_post_error("infra::http::admin_post_edit", err).into_response(),
    };

    let content = build_post_editor_view(&post);
    render_admin_page(jar, &user, POSTS_PATH, content, StatusCode::OK, |view| {
        admin_views::AdminPostFormTemplate { view }
    })
}

pub(crate) async fn admin_post_update(
    State(state): State<AdminState>,
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
    Path(id): Path<String>,
    Form(form): Form<PostFormInput>,
) -> Response {
    let Some(id) = parse_post_id(&id) else {
        return post_not_found(
            "infra::http::admin_post_update",
            format!("invalid post id `{id}`"),
        )
        .into_response();
    };

    let payload = match validate_update_post(&form, id) {
        Ok(payload) => payload,
        Err(errors) => {
            let content = build_rejected_editor_view(EditorMode::Edit(id), &form, &errors);
            return render_admin_page(
                jar,
                &user,
                POSTS_PATH,
                content,
                StatusCode::UNPROCESSABLE_ENTITY,
                |view| admin_views::AdminPostFormTemplate { view },
            );
        }
    };

    let command = UpdatePostCommand {
        id,
        title: payload.title,
        content: payload.content,
    };

    match state.posts.update_post(&user, command).await {
        Ok(_) => redirect_with_flash(jar, POSTS_PATH, FlashMessage::success(POST_UPDATED)),
        Err(err) => admin_post_error("infra::http::admin_post_update", err).into_response(),
    }
}

pub(crate) async fn admin_post_destroy(
    State(state): State<AdminState>,
    CurrentUser(user): CurrentUser,
    jar: SignedCookieJar,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_post_id(&id) else {
        return post_not_found(
            "infra::http::admin_post_destroy",
            format!("invalid post id `{id}`"),
        )
        .into_response();
    };

    match state.posts.delete_post(&user, id).await {
        Ok(()) => redirect_with_flash(jar, POSTS_PATH, FlashMessage::success(POST_DELETED)),
        Err(err) => admin_post_error("infra::http::admin_post_destroy", err).into_response(),
    }
}
