//! Configuration module for Closing Desk
//!
//! This module provides configuration management including:
//! - Backing-store path resolution
//! - Web server bind address defaults

pub mod paths;

pub use paths::StorePaths;

/// Environment variable overriding the web server bind address
pub const BIND_ENV: &str = "CLOSING_DESK_BIND";

/// Default web server bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
