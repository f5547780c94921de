//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod mail;
pub mod storage;

pub use database::{init_database, DatabaseConfig, OptionsRepository, UserRepository};
pub use mail::{RecordingTransportFactory, SmtpTransportFactory};
pub use storage::{InMemoryOptionsRepository, InMemoryUserRepository};
