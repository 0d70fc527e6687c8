//! Shared utilities and common types for the probe dashboard.
//!
//! This crate provides functionality used across the other crates:
//! - Timestamp parsing and local-time display formatting
//! - Offset pagination parameters
//! - Validation helpers for backend responses

pub mod pagination;
pub mod time;
pub mod validation;
