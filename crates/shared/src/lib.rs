//! Shared errors and configuration for Folio.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, BindingSettings, StorageSettings};
pub use error::{AppError, AppResult};
