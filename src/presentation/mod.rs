//! Askama view models and rendering helpers.

pub mod admin;
pub mod views;
