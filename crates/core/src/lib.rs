//! Core domain logic for Folio.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//!
//! # Modules
//!
//! - `storage` - Storage bindings, object store configuration, storage keys
//! - `transfer` - Transfer Broker: picks how a client moves file bytes
//! - `portfolio` - Users, folders and file records
//! - `evaluation` - Instructor feedback on folders

pub mod evaluation;
pub mod portfolio;
pub mod storage;
pub mod transfer;
