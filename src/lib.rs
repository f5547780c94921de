//! # Account Service
//!
//! Account lifecycle core: registration, credential verification and
//! rotation, and password-reset issuance/redemption through signed,
//! self-expiring tokens, with best-effort mail notifications.
//!
//! ## Architecture
//!
//! - **domain**: entities and repository interfaces
//! - **application**: account orchestration, password policy, templates, dispatch
//! - **infrastructure**: credential hashing, reset tokens, SeaORM storage, SMTP
//! - **support**: error taxonomy

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod support;

pub use config::{default_config_path, init_tracing, AppConfig};

pub use application::identity::AccountService;
pub use infrastructure::{init_database, DatabaseConfig};
pub use support::{DomainError, DomainResult, ErrorKind};
