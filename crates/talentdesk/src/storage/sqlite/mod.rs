//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the repository
//! traits using `rusqlite` for synchronous operations and `tokio-rusqlite`
//! for async wrapping. The engine supplies primary-key generation
//! (AUTOINCREMENT), uniqueness enforcement, and transactional updates.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
