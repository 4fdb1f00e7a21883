//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `talentdesk_core::storage`. Both backends are always compiled; the
//! [`crate::Database`] façade picks one at connect time from the
//! `USE_DYNAMODB` configuration flag.

pub mod dynamodb;
pub mod sqlite;

pub use dynamodb::DynamoDbRepository;
pub use sqlite::SqliteRepository;
