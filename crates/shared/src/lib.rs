//! Shared types and configuration for the general-ledger posting engine.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Amount precision rules for ledger lines and posting requests
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
