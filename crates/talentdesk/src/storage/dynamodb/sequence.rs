//! Auto-increment emulation for the key-value backend.
//!
//! DynamoDB has no server-side key generation, so every logical table gets a
//! counter record in a shared counter table, incremented with an atomic
//! `ADD`. Concurrent creators are serialized by the store itself; no
//! client-side locking is involved.

use std::time::Duration;

use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;

use talentdesk_core::storage::{RepositoryError, Result};

use super::conversions::get_i64;
use super::error::map_put_item_error;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 50;

/// Hands out strictly increasing integer ids per logical table name.
///
/// For N concurrent callers on the same table name the store's atomic ADD
/// guarantees the returned ids are exactly the next N integers, with no
/// duplicates and no gaps.
#[derive(Debug, Clone)]
pub struct IdSequence {
    client: Client,
    table_name: String,
}

impl IdSequence {
    /// Creates a sequence backed by the given counter table.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Returns the next id for a logical table.
    ///
    /// On first use for a table the counter is created and 1 is returned.
    /// Throttling is retried with exponential backoff up to three attempts,
    /// then surfaced as [`RepositoryError::Throttled`]. A counter table that
    /// was cleared out from under us is recreated starting at 1.
    pub async fn next_id(&self, table: &str) -> Result<i64> {
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = BACKOFF_BASE_MS * 2u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let result = self
                .client
                .update_item()
                .table_name(&self.table_name)
                .key("table_name", AttributeValue::S(table.to_string()))
                .update_expression("ADD next_id :inc")
                .expression_attribute_values(":inc", AttributeValue::N("1".to_string()))
                .return_values(ReturnValue::UpdatedNew)
                .send()
                .await;

            match result {
                Ok(output) => {
                    let attributes = output.attributes.unwrap_or_default();
                    return get_i64(&attributes, "next_id");
                }
                Err(err) => match err.into_service_error() {
                    UpdateItemError::ProvisionedThroughputExceededException(_)
                    | UpdateItemError::RequestLimitExceeded(_) => {
                        tracing::warn!(
                            table,
                            attempt = attempt + 1,
                            "Counter increment throttled, backing off"
                        );
                    }
                    UpdateItemError::ResourceNotFoundException(_) => {
                        return self.recreate(table).await;
                    }
                    other => {
                        return Err(RepositoryError::QueryFailed(format!(
                            "Counter update failed: {other:?}"
                        )));
                    }
                },
            }
        }

        Err(RepositoryError::Throttled(format!(
            "counter increment for '{table}' exhausted {MAX_ATTEMPTS} attempts"
        )))
    }

    /// Recreate a missing counter record, starting the sequence at 1.
    async fn recreate(&self, table: &str) -> Result<i64> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("table_name", AttributeValue::S(table.to_string()))
            .item("next_id", AttributeValue::N("1".to_string()))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, "Counter", table.to_string()))?;

        Ok(1)
    }
}
