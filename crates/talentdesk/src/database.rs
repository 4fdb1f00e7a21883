//! Backend selection.
//!
//! The [`Database`] façade is the only storage surface upstream request
//! handlers see: one trait object per sub-adapter, all backed by the same
//! backend value. The backend is chosen once, at connect time, from the
//! `USE_DYNAMODB` configuration flag; there is no runtime switching
//! afterwards.

use std::sync::Arc;

use talentdesk_core::storage::{
    CompanyRepository, FinancialYearRepository, HolidayRepository, InvoiceRepository,
    LeaveRepository, ProcessProfileRepository, ProfileRepository, RequirementRepository, Result,
    SpocRepository, UserRepository,
};

use crate::config::Config;
use crate::storage::{DynamoDbRepository, SqliteRepository};

/// The storage façade handed to upstream request handlers.
///
/// Callers address sub-adapters by name (`db.company`, `db.leave`, …) and
/// never learn which engine backs them.
#[derive(Clone)]
pub struct Database {
    pub company: Arc<dyn CompanyRepository>,
    pub spoc: Arc<dyn SpocRepository>,
    pub requirement: Arc<dyn RequirementRepository>,
    pub profile: Arc<dyn ProfileRepository>,
    pub process_profile: Arc<dyn ProcessProfileRepository>,
    pub invoice: Arc<dyn InvoiceRepository>,
    pub leave: Arc<dyn LeaveRepository>,
    pub financial_year: Arc<dyn FinancialYearRepository>,
    pub holiday: Arc<dyn HolidayRepository>,
    pub user: Arc<dyn UserRepository>,
}

impl Database {
    /// Connects the backend selected by the configuration.
    ///
    /// For DynamoDB the SDK client is built here, from the default
    /// credential chain, and injected into the repository; for SQLite the
    /// database file is opened (and its schema created) at the configured
    /// path.
    pub async fn connect(config: &Config) -> Result<Self> {
        if config.use_dynamodb {
            tracing::info!(
                environment = %config.environment,
                "Using DynamoDB storage backend"
            );
            let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            let backend = Arc::new(DynamoDbRepository::new(client, config.tables.clone()));
            Ok(Self::from_backend(backend))
        } else {
            tracing::info!(path = %config.sqlite_path, "Using SQLite storage backend");
            let backend = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            Ok(Self::from_backend(backend))
        }
    }

    /// Fan a single backend value out into every sub-adapter slot.
    fn from_backend<R>(backend: Arc<R>) -> Self
    where
        R: CompanyRepository
            + SpocRepository
            + RequirementRepository
            + ProfileRepository
            + ProcessProfileRepository
            + InvoiceRepository
            + LeaveRepository
            + FinancialYearRepository
            + HolidayRepository
            + UserRepository
            + 'static,
    {
        Self {
            company: backend.clone(),
            spoc: backend.clone(),
            requirement: backend.clone(),
            profile: backend.clone(),
            process_profile: backend.clone(),
            invoice: backend.clone(),
            leave: backend.clone(),
            financial_year: backend.clone(),
            holiday: backend.clone(),
            user: backend,
        }
    }

    /// A façade over an in-memory SQLite database, for tests and local
    /// tooling.
    pub async fn connect_in_memory() -> Result<Self> {
        let backend = Arc::new(SqliteRepository::new_in_memory().await?);
        Ok(Self::from_backend(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentdesk_core::domain::{
        CompanyUpdate, NewCompany, NewInvoice, NewRequirement, RecordStatus,
    };
    use chrono::NaiveDate;

    fn new_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            spoc: "Asha Rao".to_string(),
            email_id: "asha@acme.example".to_string(),
            status: RecordStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_facade_routes_all_sub_adapters_to_one_backend() {
        let db = Database::connect_in_memory().await.unwrap();

        let company = db.company.create_company(new_company("Acme")).await.unwrap();

        let requirement = db
            .requirement
            .create_requirement(NewRequirement {
                company_id: company.id,
                key_skill: "Rust".to_string(),
                jd: "Backend engineer".to_string(),
                status_id: 1,
                recruiter_name: None,
                budget: None,
                expected_billing_date: None,
                location: None,
                remarks: None,
                req_cust_ref_id: None,
            })
            .await
            .unwrap();

        let invoice = db
            .invoice
            .create_invoice(NewInvoice {
                invoice_number: "INV-1".to_string(),
                reference: None,
                company_id: company.id,
                po_number: None,
                amount: 1000.0,
                raised_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                due_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
                status: Default::default(),
                remarks: None,
            })
            .await
            .unwrap();

        // Every sub-adapter sees the same storage.
        assert_eq!(
            db.company.get_company(company.id).await.unwrap().unwrap().name,
            "Acme"
        );
        assert_eq!(
            db.requirement
                .get_requirement(requirement.requirement_id)
                .await
                .unwrap()
                .unwrap()
                .company_id,
            company.id
        );
        assert_eq!(
            db.invoice
                .list_invoices_by_company(company.id)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(invoice.company_id, company.id);
    }

    #[tokio::test]
    async fn test_facade_update_through_trait_object() {
        let db = Database::connect_in_memory().await.unwrap();
        let company = db.company.create_company(new_company("Globex")).await.unwrap();

        let matched = db
            .company
            .update_company(
                company.id,
                CompanyUpdate {
                    status: Some(RecordStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matched);

        let reloaded = db.company.get_company(company.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, RecordStatus::Inactive);
    }
}
