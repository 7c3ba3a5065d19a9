//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Error types
//! - Logging setup
//! - HTTP access to tile servers

pub mod error;
pub mod http;
pub mod logging;
