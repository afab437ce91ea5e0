//! CLI command implementations

pub mod completions;
pub mod config;
pub mod entity;
pub mod find;
pub mod group;
pub mod location;
pub mod path;
