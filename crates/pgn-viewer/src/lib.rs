//! Terminal front end for the PGN exercise viewer.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod source;
pub mod text_view;
