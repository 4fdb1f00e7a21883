//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the repository
//! traits using `aws-sdk-dynamodb`. The store has no auto-increment, joins,
//! or unique indexes, so the adapter compensates: the `sequence` module
//! emulates auto-increment with an atomic counter table, filtered reads are
//! scans, uniqueness is a pre-insert scan, and the pipeline read feeds the
//! pure enrichment join in `talentdesk_core`.

mod conversions;
mod error;
mod expr;
mod repository;
mod sequence;

pub use repository::DynamoDbRepository;
pub use sequence::IdSequence;
