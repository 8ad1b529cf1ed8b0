//! Application services for the administrative surface.

pub mod chrome;
pub mod confirm_delete;
pub mod posts;
