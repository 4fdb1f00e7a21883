//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `talentdesk_core::storage` using
//! DynamoDB. Primary keys come from the counter sequence, filtered reads are
//! table scans, uniqueness is a pre-insert scan, and partial updates go
//! through the update-expression builder with its reserved-word aliasing.
//! Scans are O(table size) per call; tables in this domain hold tens to low
//! hundreds of rows.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Datelike, Utc};

use talentdesk_core::domain::{
    ActivelyWorking, Company, CompanyUpdate, FinancialYear, FinancialYearUpdate, Holiday,
    HolidaySelection, HolidayUpdate, Invoice, InvoiceUpdate, Leave, LeaveBalance,
    LeaveBalanceUpdate, LeaveStatus, LeaveUpdate, NewCompany, NewFinancialYear, NewHoliday,
    NewInvoice, NewLeave, NewProcessProfile, NewProfile, NewRequirement, NewSpoc, NewUser,
    PipelineProfile, PlacementActivity, ProcessProfile, Profile, ProfileStatus, ProfileUpdate,
    Requirement, RequirementStatus, RequirementUpdate, SelectedHoliday, Spoc, SpocUpdate, User,
    OPEN_STATUS_IDS, TERMINAL_STATUS_IDS,
};
use talentdesk_core::storage::{
    enrich_process_profiles, CompanyRepository, DateRange, FinancialYearRepository,
    HolidayRepository, InvoiceRepository, LeaveRepository, ProcessProfileRepository,
    ProfileRepository, RepositoryError, RequirementRepository, Result, SpocRepository,
    UserRepository,
};

use crate::config::TableNames;

use super::conversions::{
    bool_attr, company_to_item, date_attr, datetime_attr, financial_year_to_item, get_i64,
    holiday_selection_to_item, holiday_to_item, int_attr, invoice_to_item, item_to_company,
    item_to_financial_year, item_to_holiday, item_to_holiday_selection, item_to_invoice,
    item_to_leave, item_to_leave_balance, item_to_process_profile, item_to_profile,
    item_to_profile_stage, item_to_requirement, item_to_requirement_status, item_to_spoc,
    item_to_user, leave_balance_to_item, leave_to_item, num_attr, process_profile_to_item,
    profile_to_item, requirement_to_item, spoc_to_item, string_attr, user_to_item,
};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_scan_error,
    map_update_item_service_error,
};
use super::expr::UpdateExpression;
use super::sequence::IdSequence;

type Item = HashMap<String, AttributeValue>;

/// DynamoDB-based repository implementation.
///
/// Holds one SDK client (constructed and injected by the process entry
/// point) plus the environment-resolved table names. The client is
/// connection-pooled and shared across all operations.
pub struct DynamoDbRepository {
    client: Client,
    tables: TableNames,
    sequence: IdSequence,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given client and table names.
    pub fn new(client: Client, tables: TableNames) -> Self {
        let sequence = IdSequence::new(client.clone(), tables.counters.clone());
        Self {
            client,
            tables,
            sequence,
        }
    }

    /// Full table scan.
    async fn scan(&self, table: &str) -> Result<Vec<Item>> {
        let result = self
            .client
            .scan()
            .table_name(table)
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(result.items.unwrap_or_default())
    }

    /// Table scan with a filter expression.
    async fn scan_filtered(
        &self,
        table: &str,
        filter: &str,
        names: Option<HashMap<String, String>>,
        values: HashMap<String, AttributeValue>,
    ) -> Result<Vec<Item>> {
        let result = self
            .client
            .scan()
            .table_name(table)
            .filter_expression(filter)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(result.items.unwrap_or_default())
    }

    /// Point lookup by integer key.
    async fn get_by_key(
        &self,
        table: &str,
        key_attr: &str,
        id: i64,
        entity_type: &'static str,
    ) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table)
            .key(key_attr, int_attr(id))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, entity_type, id.to_string()))?;

        Ok(result.item)
    }

    /// Write a whole item.
    async fn put(
        &self,
        table: &str,
        item: Item,
        entity_type: &'static str,
        id: impl Into<String>,
    ) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, entity_type, id))?;

        Ok(())
    }

    /// Apply a partial update, returning whether the record existed.
    ///
    /// The `attribute_exists` condition supplies the "row matched" result a
    /// relational UPDATE reports for free; without it, DynamoDB would mint a
    /// fresh item from the SET expression.
    async fn apply_update(
        &self,
        table: &str,
        key_attr: &str,
        key: AttributeValue,
        expr: UpdateExpression,
        entity_type: &'static str,
        id: String,
    ) -> Result<bool> {
        let result = self
            .client
            .update_item()
            .table_name(table)
            .key(key_attr, key)
            .update_expression(expr.expression())
            .set_expression_attribute_names(expr.names())
            .set_expression_attribute_values(Some(expr.values()))
            .condition_expression(format!("attribute_exists({key_attr})"))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) => match err.into_service_error() {
                UpdateItemError::ConditionalCheckFailedException(_) => Ok(false),
                other => Err(map_update_item_service_error(other, entity_type, id)),
            },
        }
    }

    /// Flip every active financial year to inactive.
    async fn deactivate_financial_years(&self, now: DateTime<Utc>) -> Result<()> {
        let items = self
            .scan_filtered(
                &self.tables.financial_years,
                "is_active = :is_active",
                None,
                HashMap::from([(":is_active".to_string(), bool_attr(true))]),
            )
            .await?;

        for item in &items {
            let id = get_i64(item, "id")?;
            let mut expr = UpdateExpression::new();
            expr.set("is_active", bool_attr(false));
            expr.set("updated_date", datetime_attr(now));
            self.apply_update(
                &self.tables.financial_years,
                "id",
                int_attr(id),
                expr,
                "FinancialYear",
                id.to_string(),
            )
            .await?;
        }

        Ok(())
    }
}

// ============================================================================
// CompanyRepository implementation
// ============================================================================

#[async_trait]
impl CompanyRepository for DynamoDbRepository {
    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        if self.get_company_by_name(&company.name).await?.is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Company",
                id: company.name,
            });
        }

        let id = self.sequence.next_id("companies").await?;
        let now = Utc::now();
        let record = Company {
            id,
            name: company.name,
            spoc: company.spoc,
            email_id: company.email_id,
            status: company.status,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.companies,
            company_to_item(&record),
            "Company",
            record.name.clone(),
        )
        .await?;

        Ok(record)
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>> {
        match self.get_by_key(&self.tables.companies, "id", id, "Company").await? {
            Some(item) => Ok(Some(item_to_company(&item)?)),
            None => Ok(None),
        }
    }

    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        // The filter grammar has no lower(), so the case-insensitive match
        // happens here after a scan.
        let items = self.scan(&self.tables.companies).await?;
        for item in &items {
            let company = item_to_company(item)?;
            if company.name.eq_ignore_ascii_case(name) {
                return Ok(Some(company));
            }
        }
        Ok(None)
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let items = self.scan(&self.tables.companies).await?;
        items.iter().map(item_to_company).collect()
    }

    async fn list_active_companies(&self) -> Result<Vec<Company>> {
        let items = self
            .scan_filtered(
                &self.tables.companies,
                "#status = :status",
                Some(HashMap::from([(
                    "#status".to_string(),
                    "status".to_string(),
                )])),
                HashMap::from([(":status".to_string(), string_attr("active"))]),
            )
            .await?;
        items.iter().map(item_to_company).collect()
    }

    async fn update_company(&self, id: i64, update: CompanyUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("name", update.name.map(string_attr));
        expr.set_opt("spoc", update.spoc.map(string_attr));
        expr.set_opt("email_id", update.email_id.map(string_attr));
        expr.set_opt("status", update.status.map(|s| string_attr(s.as_str())));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.companies,
            "id",
            int_attr(id),
            expr,
            "Company",
            id.to_string(),
        )
        .await
    }
}

// ============================================================================
// SpocRepository implementation
// ============================================================================

#[async_trait]
impl SpocRepository for DynamoDbRepository {
    async fn create_spoc(&self, spoc: NewSpoc) -> Result<Spoc> {
        let id = self.sequence.next_id("spocs").await?;
        let now = Utc::now();
        let record = Spoc {
            id,
            company_id: spoc.company_id,
            name: spoc.name,
            phone: spoc.phone,
            email_id: spoc.email_id,
            location: spoc.location,
            status: spoc.status,
            created_date: now,
            updated_date: now,
        };

        self.put(&self.tables.spocs, spoc_to_item(&record), "Spoc", id.to_string())
            .await?;

        Ok(record)
    }

    async fn get_spoc(&self, id: i64) -> Result<Option<Spoc>> {
        match self.get_by_key(&self.tables.spocs, "id", id, "Spoc").await? {
            Some(item) => Ok(Some(item_to_spoc(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_spocs(&self) -> Result<Vec<Spoc>> {
        let items = self.scan(&self.tables.spocs).await?;
        items.iter().map(item_to_spoc).collect()
    }

    async fn list_spocs_by_company(&self, company_id: i64) -> Result<Vec<Spoc>> {
        let items = self
            .scan_filtered(
                &self.tables.spocs,
                "company_id = :company_id",
                None,
                HashMap::from([(":company_id".to_string(), int_attr(company_id))]),
            )
            .await?;
        items.iter().map(item_to_spoc).collect()
    }

    async fn update_spoc(&self, id: i64, update: SpocUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("name", update.name.map(string_attr));
        expr.set_opt("phone", update.phone.map(string_attr));
        expr.set_opt("email_id", update.email_id.map(string_attr));
        expr.set_opt("location", update.location.map(string_attr));
        expr.set_opt("status", update.status.map(|s| string_attr(s.as_str())));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.spocs,
            "id",
            int_attr(id),
            expr,
            "Spoc",
            id.to_string(),
        )
        .await
    }
}

// ============================================================================
// RequirementRepository implementation
// ============================================================================

#[async_trait]
impl RequirementRepository for DynamoDbRepository {
    async fn create_requirement(&self, requirement: NewRequirement) -> Result<Requirement> {
        let requirement_id = self.sequence.next_id("requirements").await?;
        let now = Utc::now();
        let record = Requirement {
            requirement_id,
            company_id: requirement.company_id,
            key_skill: requirement.key_skill,
            jd: requirement.jd,
            status_id: requirement.status_id,
            recruiter_name: requirement.recruiter_name,
            budget: requirement.budget,
            expected_billing_date: requirement.expected_billing_date,
            location: requirement.location,
            remarks: requirement.remarks,
            req_cust_ref_id: requirement.req_cust_ref_id,
            closed_date: None,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.requirements,
            requirement_to_item(&record),
            "Requirement",
            requirement_id.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn get_requirement(&self, requirement_id: i64) -> Result<Option<Requirement>> {
        match self
            .get_by_key(
                &self.tables.requirements,
                "requirement_id",
                requirement_id,
                "Requirement",
            )
            .await?
        {
            Some(item) => Ok(Some(item_to_requirement(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_requirements(&self) -> Result<Vec<Requirement>> {
        let items = self.scan(&self.tables.requirements).await?;
        items.iter().map(item_to_requirement).collect()
    }

    async fn update_requirement(
        &self,
        requirement_id: i64,
        update: RequirementUpdate,
    ) -> Result<bool> {
        let now = Utc::now();
        let mut expr = UpdateExpression::new();
        expr.set_opt("company_id", update.company_id.map(int_attr));
        expr.set_opt("key_skill", update.key_skill.map(string_attr));
        expr.set_opt("jd", update.jd.map(string_attr));
        expr.set_opt("recruiter_name", update.recruiter_name.map(string_attr));
        expr.set_opt("budget", update.budget.map(num_attr));
        expr.set_opt(
            "expected_billing_date",
            update.expected_billing_date.map(date_attr),
        );
        expr.set_opt("location", update.location.map(string_attr));
        expr.set_opt("remarks", update.remarks.map(string_attr));
        expr.set_opt("req_cust_ref_id", update.req_cust_ref_id.map(string_attr));

        // Entering the terminal set stamps closed_date, leaving it clears it.
        if let Some(status_id) = update.status_id {
            expr.set("status_id", int_attr(status_id));
            if TERMINAL_STATUS_IDS.contains(&status_id) {
                expr.set("closed_date", datetime_attr(now));
            } else {
                expr.remove("closed_date");
            }
        }
        expr.set("updated_date", datetime_attr(now));

        self.apply_update(
            &self.tables.requirements,
            "requirement_id",
            int_attr(requirement_id),
            expr,
            "Requirement",
            requirement_id.to_string(),
        )
        .await
    }

    async fn list_requirement_statuses(&self) -> Result<Vec<RequirementStatus>> {
        let items = self.scan(&self.tables.requirement_statuses).await?;
        let mut statuses: Vec<RequirementStatus> = items
            .iter()
            .map(item_to_requirement_status)
            .collect::<Result<_>>()?;
        statuses.sort_by_key(|s| s.id);
        Ok(statuses)
    }

    async fn list_open_requirements_by_company(
        &self,
        company_id: i64,
    ) -> Result<Vec<Requirement>> {
        let items = self
            .scan_filtered(
                &self.tables.requirements,
                "company_id = :company_id AND status_id IN (:s1, :s2, :s3)",
                None,
                HashMap::from([
                    (":company_id".to_string(), int_attr(company_id)),
                    (":s1".to_string(), int_attr(OPEN_STATUS_IDS[0])),
                    (":s2".to_string(), int_attr(OPEN_STATUS_IDS[1])),
                    (":s3".to_string(), int_attr(OPEN_STATUS_IDS[2])),
                ]),
            )
            .await?;
        items.iter().map(item_to_requirement).collect()
    }

    async fn list_open_requirements_by_company_and_recruiter(
        &self,
        company_id: i64,
        recruiter_name: &str,
    ) -> Result<Vec<Requirement>> {
        // No join: collect the recruiter's requirement ids from the pipeline
        // table, then intersect with the company's open requirements.
        let pipeline_items = self
            .scan_filtered(
                &self.tables.process_profiles,
                "recruiter_name = :recruiter_name",
                None,
                HashMap::from([(
                    ":recruiter_name".to_string(),
                    string_attr(recruiter_name),
                )]),
            )
            .await?;

        let mut assigned_ids = std::collections::HashSet::new();
        for item in &pipeline_items {
            assigned_ids.insert(get_i64(item, "requirement_id")?);
        }
        if assigned_ids.is_empty() {
            return Ok(Vec::new());
        }

        let open = self.list_open_requirements_by_company(company_id).await?;
        Ok(open
            .into_iter()
            .filter(|r| assigned_ids.contains(&r.requirement_id))
            .collect())
    }
}

// ============================================================================
// ProfileRepository implementation
// ============================================================================

#[async_trait]
impl ProfileRepository for DynamoDbRepository {
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile> {
        let id = self.sequence.next_id("profiles").await?;
        let now = Utc::now();
        let record = Profile {
            id,
            name: profile.name,
            email_id: profile.email_id,
            phone: profile.phone,
            key_skills: profile.key_skills,
            experience_years: profile.experience_years,
            current_ctc: profile.current_ctc,
            expected_ctc: profile.expected_ctc,
            notice_period: profile.notice_period,
            status: profile.status,
            remarks: profile.remarks,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.profiles,
            profile_to_item(&record),
            "Profile",
            id.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        match self.get_by_key(&self.tables.profiles, "id", id, "Profile").await? {
            Some(item) => Ok(Some(item_to_profile(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let items = self.scan(&self.tables.profiles).await?;
        items.iter().map(item_to_profile).collect()
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("name", update.name.map(string_attr));
        expr.set_opt("email_id", update.email_id.map(string_attr));
        expr.set_opt("phone", update.phone.map(string_attr));
        expr.set_opt("key_skills", update.key_skills.map(string_attr));
        expr.set_opt("experience_years", update.experience_years.map(num_attr));
        expr.set_opt("current_ctc", update.current_ctc.map(num_attr));
        expr.set_opt("expected_ctc", update.expected_ctc.map(num_attr));
        expr.set_opt("notice_period", update.notice_period.map(string_attr));
        expr.set_opt("status", update.status.map(int_attr));
        expr.set_opt("remarks", update.remarks.map(string_attr));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.profiles,
            "id",
            int_attr(id),
            expr,
            "Profile",
            id.to_string(),
        )
        .await
    }

    async fn list_profile_stages(&self) -> Result<Vec<ProfileStatus>> {
        let items = self.scan(&self.tables.profile_statuses).await?;
        let mut stages: Vec<ProfileStatus> = items
            .iter()
            .map(item_to_profile_stage)
            .collect::<Result<_>>()?;
        stages.sort_by_key(|s| s.id);
        Ok(stages)
    }

    async fn list_placements_by_date_range(
        &self,
        range: DateRange,
        recruiter_name: Option<&str>,
    ) -> Result<Vec<PlacementActivity>> {
        let start = range.start.format("%Y-%m-%d").to_string();
        let end = range.end_exclusive().format("%Y-%m-%d").to_string();

        let profile_items = self
            .scan_filtered(
                &self.tables.profiles,
                "created_date >= :start AND created_date < :end",
                None,
                HashMap::from([
                    (":start".to_string(), string_attr(start)),
                    (":end".to_string(), string_attr(end)),
                ]),
            )
            .await?;

        let mut profiles: Vec<Profile> = profile_items
            .iter()
            .map(item_to_profile)
            .collect::<Result<_>>()?;
        profiles.sort_by_key(|p| p.created_date);

        // Application-level joins: one scan per table, composed in memory.
        let pipeline_items = self.scan(&self.tables.process_profiles).await?;
        let mut pipeline_by_profile: HashMap<i64, ProcessProfile> = HashMap::new();
        for item in &pipeline_items {
            let row = item_to_process_profile(item)?;
            if let Some(profile_id) = row.profile_id {
                pipeline_by_profile.entry(profile_id).or_insert(row);
            }
        }

        let requirement_items = self.scan(&self.tables.requirements).await?;
        let mut requirements: HashMap<i64, Requirement> = HashMap::new();
        for item in &requirement_items {
            let requirement = item_to_requirement(item)?;
            requirements.insert(requirement.requirement_id, requirement);
        }

        let company_items = self.scan(&self.tables.companies).await?;
        let mut company_names: HashMap<i64, String> = HashMap::new();
        for item in &company_items {
            let company = item_to_company(item)?;
            company_names.insert(company.id, company.name);
        }

        let mut result = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let pipeline = pipeline_by_profile.get(&profile.id);
            let recruiter = pipeline.map(|pp| pp.recruiter_name.clone());

            if let Some(filter) = recruiter_name {
                if recruiter.as_deref() != Some(filter) {
                    continue;
                }
            }

            let requirement_id = pipeline.map(|pp| pp.requirement_id);
            let company_name = requirement_id
                .and_then(|id| requirements.get(&id))
                .and_then(|r| company_names.get(&r.company_id))
                .cloned();

            result.push(PlacementActivity {
                profile_id: profile.id,
                status: profile.status,
                name: profile.name,
                recruiter_name: recruiter,
                requirement_id,
                company_name,
            });
        }

        Ok(result)
    }
}

// ============================================================================
// ProcessProfileRepository implementation
// ============================================================================

#[async_trait]
impl ProcessProfileRepository for DynamoDbRepository {
    async fn create_process_profile(
        &self,
        process_profile: NewProcessProfile,
    ) -> Result<ProcessProfile> {
        let pp = process_profile;
        let now = Utc::now();

        let existing = self
            .scan_filtered(
                &self.tables.process_profiles,
                "requirement_id = :requirement_id AND recruiter_name = :recruiter_name",
                None,
                HashMap::from([
                    (":requirement_id".to_string(), int_attr(pp.requirement_id)),
                    (
                        ":recruiter_name".to_string(),
                        string_attr(pp.recruiter_name.clone()),
                    ),
                ]),
            )
            .await?;

        if let Some(item) = existing.first() {
            let mut row = item_to_process_profile(item)?;
            if row.actively_working != pp.actively_working {
                let mut expr = UpdateExpression::new();
                expr.set(
                    "actively_working",
                    string_attr(pp.actively_working.as_str()),
                );
                expr.set("updated_date", datetime_attr(now));
                self.apply_update(
                    &self.tables.process_profiles,
                    "id",
                    int_attr(row.id),
                    expr,
                    "ProcessProfile",
                    row.id.to_string(),
                )
                .await?;
                row.actively_working = pp.actively_working;
                row.updated_date = now;
            }
            return Ok(row);
        }

        let id = self.sequence.next_id("process_profiles").await?;
        let record = ProcessProfile {
            id,
            requirement_id: pp.requirement_id,
            profile_id: pp.profile_id,
            recruiter_name: pp.recruiter_name,
            status: pp.status,
            actively_working: pp.actively_working,
            remarks: pp.remarks,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.process_profiles,
            process_profile_to_item(&record),
            "ProcessProfile",
            id.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn upsert_process_profile(
        &self,
        process_profile: NewProcessProfile,
    ) -> Result<ProcessProfile> {
        let pp = process_profile;
        let now = Utc::now();

        let mut existing = None;
        if let Some(profile_id) = pp.profile_id {
            let items = self
                .scan_filtered(
                    &self.tables.process_profiles,
                    "requirement_id = :requirement_id AND profile_id = :profile_id",
                    None,
                    HashMap::from([
                        (":requirement_id".to_string(), int_attr(pp.requirement_id)),
                        (":profile_id".to_string(), int_attr(profile_id)),
                    ]),
                )
                .await?;
            existing = items.first().map(item_to_process_profile).transpose()?;
        }

        if existing.is_none() {
            // Fall back to the requirement's unassigned placeholder row.
            let items = self
                .scan_filtered(
                    &self.tables.process_profiles,
                    "requirement_id = :requirement_id AND (attribute_not_exists(profile_id) OR profile_id = :zero)",
                    None,
                    HashMap::from([
                        (":requirement_id".to_string(), int_attr(pp.requirement_id)),
                        (":zero".to_string(), int_attr(0)),
                    ]),
                )
                .await?;
            existing = items.first().map(item_to_process_profile).transpose()?;
        }

        if let Some(row) = existing {
            // Merge-and-rewrite the whole item; the id and created_date
            // survive, everything else comes from the caller.
            let merged = ProcessProfile {
                id: row.id,
                requirement_id: pp.requirement_id,
                profile_id: pp.profile_id,
                recruiter_name: pp.recruiter_name,
                status: pp.status,
                actively_working: pp.actively_working,
                remarks: pp.remarks,
                created_date: row.created_date,
                updated_date: now,
            };
            self.put(
                &self.tables.process_profiles,
                process_profile_to_item(&merged),
                "ProcessProfile",
                merged.id.to_string(),
            )
            .await?;
            return Ok(merged);
        }

        let id = self.sequence.next_id("process_profiles").await?;
        let record = ProcessProfile {
            id,
            requirement_id: pp.requirement_id,
            profile_id: pp.profile_id,
            recruiter_name: pp.recruiter_name,
            status: pp.status,
            actively_working: pp.actively_working,
            remarks: pp.remarks,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.process_profiles,
            process_profile_to_item(&record),
            "ProcessProfile",
            id.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn assign_recruiter(&self, requirement_id: i64, recruiter_name: &str) -> Result<bool> {
        let items = self
            .scan_filtered(
                &self.tables.process_profiles,
                "requirement_id = :requirement_id",
                None,
                HashMap::from([(":requirement_id".to_string(), int_attr(requirement_id))]),
            )
            .await?;

        if items.is_empty() {
            return Ok(false);
        }

        let now = Utc::now();
        for item in &items {
            let id = get_i64(item, "id")?;
            let mut expr = UpdateExpression::new();
            expr.set("recruiter_name", string_attr(recruiter_name));
            expr.set("updated_date", datetime_attr(now));
            self.apply_update(
                &self.tables.process_profiles,
                "id",
                int_attr(id),
                expr,
                "ProcessProfile",
                id.to_string(),
            )
            .await?;
        }

        Ok(true)
    }

    async fn assign_profile(&self, requirement_id: i64, profile_id: i64) -> Result<bool> {
        let items = self
            .scan_filtered(
                &self.tables.process_profiles,
                "requirement_id = :requirement_id",
                None,
                HashMap::from([(":requirement_id".to_string(), int_attr(requirement_id))]),
            )
            .await?;

        if items.is_empty() {
            return Ok(false);
        }

        let now = Utc::now();
        for item in &items {
            let id = get_i64(item, "id")?;
            let mut expr = UpdateExpression::new();
            expr.set("profile_id", int_attr(profile_id));
            expr.set("updated_date", datetime_attr(now));
            self.apply_update(
                &self.tables.process_profiles,
                "id",
                int_attr(id),
                expr,
                "ProcessProfile",
                id.to_string(),
            )
            .await?;
        }

        Ok(true)
    }

    async fn set_actively_working(
        &self,
        requirement_id: i64,
        profile_id: i64,
        actively_working: ActivelyWorking,
    ) -> Result<bool> {
        let items = self
            .scan_filtered(
                &self.tables.process_profiles,
                "requirement_id = :requirement_id AND profile_id = :profile_id",
                None,
                HashMap::from([
                    (":requirement_id".to_string(), int_attr(requirement_id)),
                    (":profile_id".to_string(), int_attr(profile_id)),
                ]),
            )
            .await?;

        if items.is_empty() {
            return Ok(false);
        }

        let now = Utc::now();
        for item in &items {
            let id = get_i64(item, "id")?;
            let mut expr = UpdateExpression::new();
            expr.set(
                "actively_working",
                string_attr(actively_working.as_str()),
            );
            expr.set("updated_date", datetime_attr(now));
            self.apply_update(
                &self.tables.process_profiles,
                "id",
                int_attr(id),
                expr,
                "ProcessProfile",
                id.to_string(),
            )
            .await?;
        }

        Ok(true)
    }

    async fn pipeline_by_requirement(&self, requirement_id: i64) -> Result<Vec<PipelineProfile>> {
        let items = self
            .scan_filtered(
                &self.tables.process_profiles,
                "requirement_id = :requirement_id",
                None,
                HashMap::from([(":requirement_id".to_string(), int_attr(requirement_id))]),
            )
            .await?;
        let rows: Vec<ProcessProfile> = items
            .iter()
            .map(item_to_process_profile)
            .collect::<Result<_>>()?;

        // Build the status-to-stage lookup once, then point-fetch each
        // referenced profile. N+1 reads, accepted at this table size.
        let stage_items = self.scan(&self.tables.profile_statuses).await?;
        let mut stages = HashMap::new();
        for item in &stage_items {
            let status = item_to_profile_stage(item)?;
            stages.insert(status.id, status.stage);
        }

        let mut profiles = HashMap::new();
        for row in &rows {
            if let Some(profile_id) = row.profile_id {
                if profile_id > 0 && !profiles.contains_key(&profile_id) {
                    if let Some(item) = self
                        .get_by_key(&self.tables.profiles, "id", profile_id, "Profile")
                        .await?
                    {
                        profiles.insert(profile_id, item_to_profile(&item)?);
                    }
                }
            }
        }

        Ok(enrich_process_profiles(rows, &profiles, &stages))
    }

    async fn list_active_by_requirement(
        &self,
        requirement_id: i64,
    ) -> Result<Vec<ProcessProfile>> {
        let items = self
            .scan_filtered(
                &self.tables.process_profiles,
                "requirement_id = :requirement_id AND actively_working = :actively_working",
                None,
                HashMap::from([
                    (":requirement_id".to_string(), int_attr(requirement_id)),
                    (
                        ":actively_working".to_string(),
                        string_attr(ActivelyWorking::Yes.as_str()),
                    ),
                ]),
            )
            .await?;
        items.iter().map(item_to_process_profile).collect()
    }
}

// ============================================================================
// InvoiceRepository implementation
// ============================================================================

#[async_trait]
impl InvoiceRepository for DynamoDbRepository {
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice> {
        let duplicates = self
            .scan_filtered(
                &self.tables.invoices,
                "invoice_number = :invoice_number",
                None,
                HashMap::from([(
                    ":invoice_number".to_string(),
                    string_attr(invoice.invoice_number.clone()),
                )]),
            )
            .await?;
        if !duplicates.is_empty() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Invoice",
                id: invoice.invoice_number,
            });
        }

        let id = self.sequence.next_id("invoices").await?;
        let now = Utc::now();
        let record = Invoice {
            id,
            invoice_number: invoice.invoice_number,
            reference: invoice.reference,
            company_id: invoice.company_id,
            po_number: invoice.po_number,
            amount: invoice.amount,
            raised_date: invoice.raised_date,
            due_date: invoice.due_date,
            status: invoice.status,
            remarks: invoice.remarks,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.invoices,
            invoice_to_item(&record),
            "Invoice",
            record.invoice_number.clone(),
        )
        .await?;

        Ok(record)
    }

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>> {
        match self.get_by_key(&self.tables.invoices, "id", id, "Invoice").await? {
            Some(item) => Ok(Some(item_to_invoice(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        let items = self.scan(&self.tables.invoices).await?;
        items.iter().map(item_to_invoice).collect()
    }

    async fn list_invoices_by_company(&self, company_id: i64) -> Result<Vec<Invoice>> {
        let items = self
            .scan_filtered(
                &self.tables.invoices,
                "company_id = :company_id",
                None,
                HashMap::from([(":company_id".to_string(), int_attr(company_id))]),
            )
            .await?;
        items.iter().map(item_to_invoice).collect()
    }

    async fn update_invoice(&self, id: i64, update: InvoiceUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("reference", update.reference.map(string_attr));
        expr.set_opt("po_number", update.po_number.map(string_attr));
        expr.set_opt("amount", update.amount.map(num_attr));
        expr.set_opt("raised_date", update.raised_date.map(date_attr));
        expr.set_opt("due_date", update.due_date.map(date_attr));
        expr.set_opt("status", update.status.map(|s| string_attr(s.as_str())));
        expr.set_opt("remarks", update.remarks.map(string_attr));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.invoices,
            "id",
            int_attr(id),
            expr,
            "Invoice",
            id.to_string(),
        )
        .await
    }
}

// ============================================================================
// LeaveRepository implementation
// ============================================================================

#[async_trait]
impl LeaveRepository for DynamoDbRepository {
    async fn create_leave(&self, leave: NewLeave) -> Result<Leave> {
        let id = self.sequence.next_id("leaves").await?;
        let now = Utc::now();
        let record = Leave {
            id,
            username: leave.username,
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            days: leave.days,
            reason: leave.reason,
            status: LeaveStatus::Pending,
            approver_comments: None,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.leaves,
            leave_to_item(&record),
            "Leave",
            id.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn get_leave(&self, id: i64) -> Result<Option<Leave>> {
        match self.get_by_key(&self.tables.leaves, "id", id, "Leave").await? {
            Some(item) => Ok(Some(item_to_leave(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_leaves(&self) -> Result<Vec<Leave>> {
        let items = self.scan(&self.tables.leaves).await?;
        let mut leaves: Vec<Leave> = items.iter().map(item_to_leave).collect::<Result<_>>()?;
        leaves.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(leaves)
    }

    async fn list_leaves_by_user(&self, username: &str) -> Result<Vec<Leave>> {
        let items = self
            .scan_filtered(
                &self.tables.leaves,
                "username = :username",
                None,
                HashMap::from([(":username".to_string(), string_attr(username))]),
            )
            .await?;
        let mut leaves: Vec<Leave> = items.iter().map(item_to_leave).collect::<Result<_>>()?;
        leaves.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(leaves)
    }

    async fn list_pending_leaves(&self) -> Result<Vec<Leave>> {
        let items = self
            .scan_filtered(
                &self.tables.leaves,
                "#status = :status",
                Some(HashMap::from([(
                    "#status".to_string(),
                    "status".to_string(),
                )])),
                HashMap::from([(
                    ":status".to_string(),
                    string_attr(LeaveStatus::Pending.as_str()),
                )]),
            )
            .await?;
        let mut leaves: Vec<Leave> = items.iter().map(item_to_leave).collect::<Result<_>>()?;
        leaves.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(leaves)
    }

    async fn update_leave(&self, id: i64, update: LeaveUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("status", update.status.map(|s| string_attr(s.as_str())));
        expr.set_opt(
            "approver_comments",
            update.approver_comments.map(string_attr),
        );
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.leaves,
            "id",
            int_attr(id),
            expr,
            "Leave",
            id.to_string(),
        )
        .await
    }

    async fn create_leave_balance(&self, username: &str) -> Result<LeaveBalance> {
        let id = self.sequence.next_id("leave_balances").await?;
        let now = Utc::now();
        let record = LeaveBalance {
            id,
            username: username.to_string(),
            annual_leave: 0,
            sick_leave: 0,
            casual_leave: 0,
            year: now.year(),
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.leave_balances,
            leave_balance_to_item(&record),
            "LeaveBalance",
            username,
        )
        .await?;

        Ok(record)
    }

    async fn get_leave_balance(&self, username: &str) -> Result<Option<LeaveBalance>> {
        let items = self
            .scan_filtered(
                &self.tables.leave_balances,
                "username = :username",
                None,
                HashMap::from([(":username".to_string(), string_attr(username))]),
            )
            .await?;
        match items.first() {
            Some(item) => Ok(Some(item_to_leave_balance(item)?)),
            None => Ok(None),
        }
    }

    async fn update_leave_balance(
        &self,
        username: &str,
        update: LeaveBalanceUpdate,
    ) -> Result<bool> {
        // Balances are keyed by id but addressed by username, so resolve
        // the record first.
        let Some(balance) = self.get_leave_balance(username).await? else {
            return Ok(false);
        };

        let mut expr = UpdateExpression::new();
        expr.set_opt("annual_leave", update.annual_leave.map(int_attr));
        expr.set_opt("sick_leave", update.sick_leave.map(int_attr));
        expr.set_opt("casual_leave", update.casual_leave.map(int_attr));
        expr.set_opt("year", update.year.map(|y| int_attr(y as i64)));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.leave_balances,
            "id",
            int_attr(balance.id),
            expr,
            "LeaveBalance",
            username.to_string(),
        )
        .await
    }
}

// ============================================================================
// FinancialYearRepository implementation
// ============================================================================

#[async_trait]
impl FinancialYearRepository for DynamoDbRepository {
    async fn create_financial_year(&self, year: NewFinancialYear) -> Result<FinancialYear> {
        let duplicates = self
            .scan_filtered(
                &self.tables.financial_years,
                "#year = :year",
                Some(HashMap::from([("#year".to_string(), "year".to_string())])),
                HashMap::from([(":year".to_string(), int_attr(year.year as i64))]),
            )
            .await?;
        if !duplicates.is_empty() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "FinancialYear",
                id: year.year.to_string(),
            });
        }

        let now = Utc::now();
        if year.is_active {
            self.deactivate_financial_years(now).await?;
        }

        let id = self.sequence.next_id("financial_years").await?;
        let record = FinancialYear {
            id,
            year: year.year,
            start_date: year.start_date,
            end_date: year.end_date,
            is_active: year.is_active,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.financial_years,
            financial_year_to_item(&record),
            "FinancialYear",
            year.year.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn get_financial_year(&self, id: i64) -> Result<Option<FinancialYear>> {
        match self
            .get_by_key(&self.tables.financial_years, "id", id, "FinancialYear")
            .await?
        {
            Some(item) => Ok(Some(item_to_financial_year(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_financial_years(&self) -> Result<Vec<FinancialYear>> {
        let items = self.scan(&self.tables.financial_years).await?;
        let mut years: Vec<FinancialYear> = items
            .iter()
            .map(item_to_financial_year)
            .collect::<Result<_>>()?;
        years.sort_by_key(|fy| fy.year);
        Ok(years)
    }

    async fn get_active_financial_year(&self) -> Result<Option<FinancialYear>> {
        let items = self
            .scan_filtered(
                &self.tables.financial_years,
                "is_active = :is_active",
                None,
                HashMap::from([(":is_active".to_string(), bool_attr(true))]),
            )
            .await?;
        match items.first() {
            Some(item) => Ok(Some(item_to_financial_year(item)?)),
            None => Ok(None),
        }
    }

    async fn activate_financial_year(&self, id: i64) -> Result<bool> {
        if self.get_financial_year(id).await?.is_none() {
            return Ok(false);
        }

        let now = Utc::now();
        self.deactivate_financial_years(now).await?;

        let mut expr = UpdateExpression::new();
        expr.set("is_active", bool_attr(true));
        expr.set("updated_date", datetime_attr(now));
        self.apply_update(
            &self.tables.financial_years,
            "id",
            int_attr(id),
            expr,
            "FinancialYear",
            id.to_string(),
        )
        .await
    }

    async fn update_financial_year(&self, id: i64, update: FinancialYearUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("start_date", update.start_date.map(date_attr));
        expr.set_opt("end_date", update.end_date.map(date_attr));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.financial_years,
            "id",
            int_attr(id),
            expr,
            "FinancialYear",
            id.to_string(),
        )
        .await
    }
}

// ============================================================================
// HolidayRepository implementation
// ============================================================================

#[async_trait]
impl HolidayRepository for DynamoDbRepository {
    async fn create_holiday(&self, holiday: NewHoliday) -> Result<Holiday> {
        let id = self.sequence.next_id("holidays").await?;
        let now = Utc::now();
        let record = Holiday {
            id,
            financial_year_id: holiday.financial_year_id,
            name: holiday.name,
            date: holiday.date,
            is_mandatory: holiday.is_mandatory,
            created_date: now,
            updated_date: now,
        };

        self.put(
            &self.tables.holidays,
            holiday_to_item(&record),
            "Holiday",
            id.to_string(),
        )
        .await?;

        Ok(record)
    }

    async fn get_holiday(&self, id: i64) -> Result<Option<Holiday>> {
        match self.get_by_key(&self.tables.holidays, "id", id, "Holiday").await? {
            Some(item) => Ok(Some(item_to_holiday(&item)?)),
            None => Ok(None),
        }
    }

    async fn list_holidays_by_year(&self, financial_year_id: i64) -> Result<Vec<Holiday>> {
        let items = self
            .scan_filtered(
                &self.tables.holidays,
                "financial_year_id = :financial_year_id",
                None,
                HashMap::from([(
                    ":financial_year_id".to_string(),
                    int_attr(financial_year_id),
                )]),
            )
            .await?;
        let mut holidays: Vec<Holiday> =
            items.iter().map(item_to_holiday).collect::<Result<_>>()?;
        holidays.sort_by_key(|h| h.date);
        Ok(holidays)
    }

    async fn list_mandatory_holidays(&self, financial_year_id: i64) -> Result<Vec<Holiday>> {
        let holidays = self.list_holidays_by_year(financial_year_id).await?;
        Ok(holidays.into_iter().filter(|h| h.is_mandatory).collect())
    }

    async fn list_optional_holidays(&self, financial_year_id: i64) -> Result<Vec<Holiday>> {
        let holidays = self.list_holidays_by_year(financial_year_id).await?;
        Ok(holidays.into_iter().filter(|h| !h.is_mandatory).collect())
    }

    async fn update_holiday(&self, id: i64, update: HolidayUpdate) -> Result<bool> {
        let mut expr = UpdateExpression::new();
        expr.set_opt("name", update.name.map(string_attr));
        expr.set_opt("date", update.date.map(date_attr));
        expr.set_opt("is_mandatory", update.is_mandatory.map(bool_attr));
        expr.set("updated_date", datetime_attr(Utc::now()));

        self.apply_update(
            &self.tables.holidays,
            "id",
            int_attr(id),
            expr,
            "Holiday",
            id.to_string(),
        )
        .await
    }

    async fn delete_holiday(&self, id: i64) -> Result<bool> {
        if self.get_holiday(id).await?.is_none() {
            return Ok(false);
        }

        self.client
            .delete_item()
            .table_name(&self.tables.holidays)
            .key("id", int_attr(id))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, "Holiday", id.to_string()))?;

        Ok(true)
    }

    async fn replace_holiday_selections(
        &self,
        username: &str,
        financial_year_id: i64,
        holiday_ids: &[i64],
    ) -> Result<()> {
        // Remove the user's existing selections for the year.
        let existing = self
            .scan_filtered(
                &self.tables.holiday_selections,
                "username = :username AND financial_year_id = :financial_year_id",
                None,
                HashMap::from([
                    (":username".to_string(), string_attr(username)),
                    (
                        ":financial_year_id".to_string(),
                        int_attr(financial_year_id),
                    ),
                ]),
            )
            .await?;

        for item in &existing {
            let id = get_i64(item, "id")?;
            self.client
                .delete_item()
                .table_name(&self.tables.holiday_selections)
                .key("id", int_attr(id))
                .send()
                .await
                .map_err(|e| map_delete_item_error(e, "HolidaySelection", id.to_string()))?;
        }

        let now = Utc::now();
        for &holiday_id in holiday_ids {
            let id = self.sequence.next_id("user_holiday_selections").await?;
            let selection = HolidaySelection {
                id,
                username: username.to_string(),
                holiday_id,
                financial_year_id,
                created_date: now,
            };
            self.put(
                &self.tables.holiday_selections,
                holiday_selection_to_item(&selection),
                "HolidaySelection",
                id.to_string(),
            )
            .await?;
        }

        Ok(())
    }

    async fn selected_holidays(
        &self,
        username: &str,
        financial_year_id: i64,
    ) -> Result<Vec<SelectedHoliday>> {
        let items = self
            .scan_filtered(
                &self.tables.holiday_selections,
                "username = :username AND financial_year_id = :financial_year_id",
                None,
                HashMap::from([
                    (":username".to_string(), string_attr(username)),
                    (
                        ":financial_year_id".to_string(),
                        int_attr(financial_year_id),
                    ),
                ]),
            )
            .await?;

        let mut selected = Vec::with_capacity(items.len());
        for item in &items {
            let selection = item_to_holiday_selection(item)?;
            // Selections pointing at a deleted holiday are dropped.
            if let Some(holiday) = self.get_holiday(selection.holiday_id).await? {
                selected.push(SelectedHoliday {
                    holiday,
                    selection_date: selection.created_date,
                });
            }
        }
        selected.sort_by_key(|s| s.holiday.date);

        Ok(selected)
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for DynamoDbRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.username,
            });
        }

        let id = self.sequence.next_id("users").await?;
        let record = User {
            id,
            username: user.username,
            hashed_password: user.hashed_password,
        };

        self.put(
            &self.tables.users,
            user_to_item(&record),
            "User",
            record.username.clone(),
        )
        .await?;

        Ok(record)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let items = self
            .scan_filtered(
                &self.tables.users,
                "username = :username",
                None,
                HashMap::from([(":username".to_string(), string_attr(username))]),
            )
            .await?;
        match items.first() {
            Some(item) => Ok(Some(item_to_user(item)?)),
            None => Ok(None),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let items = self.scan(&self.tables.users).await?;
        items.iter().map(item_to_user).collect()
    }
}
