mod editor;
mod errors;
mod forms;
mod handlers;
mod panel;

pub(super) use handlers::{
    admin_post_create, admin_post_destroy, admin_post_edit, admin_post_store, admin_post_update,
    admin_posts,
};

pub(crate) const POST_CREATED: &str = "Post has been created";
pub(crate) const POST_UPDATED: &str = "Post has been updated";
pub(crate) const POST_DELETED: &str = "Post has been deleted";
