//! Utility modules for the site generator.

pub mod command;
pub mod minify;
pub mod slug;
