//! Groundwork
//!
//! Standalone helpers for local development and deployment setup: fetching
//! and extracting archives, validating/provisioning directories and files,
//! and installing Debian package dependencies from a flat list.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
