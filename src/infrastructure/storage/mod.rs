//! In-memory repositories

mod memory;

pub use memory::{InMemoryOptionsRepository, InMemoryUserRepository};
