//! Shared types, error model, and configuration for sitepages.
//!
//! This crate is the foundation depended on by all other sitepages crates.
//! It provides:
//! - [`SiteError`] — the unified error type
//! - Domain types ([`AboutContent`], [`Director`], [`Leader`], [`Faculty`])
//!   and the page shapes handed to rendering ([`AboutPage`], [`FacultyPage`])
//! - Configuration ([`AppConfig`], [`RuntimeMode`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ApiConfig, AppConfig, RuntimeConfig, RuntimeMode, StoreConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{Result, SiteError};
pub use types::{
    AboutContent, AboutPage, AboutRecord, ApiEnvelope, CANONICAL_ROLES, Director, Faculty,
    FacultyPage, Leader,
};
