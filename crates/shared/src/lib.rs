//! Shared types, errors, and configuration for Kontu.
//!
//! This crate provides common types used across all other crates:
//! - Money and balance primitives with decimal precision
//! - Typed IDs for type-safe entity references
//! - Pagination types for list queries
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
