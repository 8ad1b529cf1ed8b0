//! Application services layer.

pub mod admin;
pub mod auth;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod repos;
pub mod validation;
