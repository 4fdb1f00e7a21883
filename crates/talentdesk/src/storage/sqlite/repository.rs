//! SQLite repository implementation.
//!
//! Implements the repository traits from `talentdesk_core::storage` using
//! SQLite. Each operation runs inside one `conn.call` closure, so the
//! underlying connection is acquired and released on every exit path.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rusqlite::params;
use rusqlite::types::Value;
use tokio_rusqlite::Connection;

use talentdesk_core::domain::{
    ActivelyWorking, Company, CompanyUpdate, FinancialYear, FinancialYearUpdate, Holiday,
    HolidayUpdate, Invoice, InvoiceUpdate, Leave, LeaveBalance, LeaveBalanceUpdate, LeaveStatus,
    LeaveUpdate, NewCompany, NewFinancialYear, NewHoliday, NewInvoice, NewLeave,
    NewProcessProfile, NewProfile, NewRequirement, NewSpoc, NewUser, PipelineProfile,
    PlacementActivity, ProcessProfile, Profile, ProfileStatus, ProfileUpdate, Requirement,
    RequirementStatus, RequirementUpdate, SelectedHoliday, Spoc, SpocUpdate, User,
    OPEN_STATUS_IDS, TERMINAL_STATUS_IDS,
};
use talentdesk_core::storage::{
    CompanyRepository, DateRange, FinancialYearRepository, HolidayRepository, InvoiceRepository,
    LeaveRepository, ProcessProfileRepository, ProfileRepository, RepositoryError,
    RequirementRepository, Result, SpocRepository, UserRepository,
};

use super::conversions::{
    format_date, format_datetime, integer, real, row_to_company, row_to_financial_year,
    row_to_holiday, row_to_invoice, row_to_leave, row_to_leave_balance, row_to_pipeline_profile,
    row_to_placement_activity, row_to_process_profile, row_to_profile, row_to_profile_stage,
    row_to_requirement, row_to_requirement_status, row_to_selected_holiday, row_to_spoc,
    row_to_user, text, SetClause,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types. The engine
/// supplies primary keys (AUTOINCREMENT) and backs up the pre-insert
/// uniqueness checks with UNIQUE constraints.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist. Schema tables
    /// and the status lookups are created idempotently.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Run a SELECT returning many rows through a row mapper.
    async fn query_list<T, F>(
        &self,
        sql: &'static str,
        params: Vec<Value>,
        mapper: F,
        entity_type: &'static str,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params), |row| mapper(row))
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    /// Run a SELECT expected to match at most one row.
    async fn query_optional<T, F>(
        &self,
        sql: &'static str,
        params: Vec<Value>,
        mapper: F,
        entity_type: &'static str,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
        F: Fn(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                match stmt.query_row(rusqlite::params_from_iter(params), |row| mapper(row)) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    /// Execute a prebuilt partial UPDATE, returning whether a row matched.
    async fn execute_update(
        &self,
        sql: String,
        params: Vec<Value>,
        entity_type: &'static str,
        id: String,
    ) -> Result<bool> {
        let rows = self
            .conn
            .call(move |conn| {
                conn.execute(&sql, rusqlite::params_from_iter(params))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, entity_type, id))?;

        Ok(rows > 0)
    }
}

// ============================================================================
// CompanyRepository implementation
// ============================================================================

#[async_trait]
impl CompanyRepository for SqliteRepository {
    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        if self.get_company_by_name(&company.name).await?.is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Company",
                id: company.name,
            });
        }

        let now = Utc::now();
        let name = company.name.clone();
        let spoc = company.spoc.clone();
        let email_id = company.email_id.clone();
        let status = company.status;
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COMPANY,
                    params![name, spoc, email_id, status.as_str(), now_str, now_str],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Company", company.name.clone()))?;

        Ok(Company {
            id,
            name: company.name,
            spoc: company.spoc,
            email_id: company.email_id,
            status: company.status,
            created_date: now,
            updated_date: now,
        })
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>> {
        self.query_optional(
            schema::SELECT_COMPANY_BY_ID,
            vec![integer(id)],
            row_to_company,
            "Company",
        )
        .await
    }

    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        self.query_optional(
            schema::SELECT_COMPANY_BY_NAME,
            vec![text(name)],
            row_to_company,
            "Company",
        )
        .await
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        self.query_list(schema::SELECT_COMPANIES, Vec::new(), row_to_company, "Company")
            .await
    }

    async fn list_active_companies(&self) -> Result<Vec<Company>> {
        self.query_list(
            schema::SELECT_ACTIVE_COMPANIES,
            Vec::new(),
            row_to_company,
            "Company",
        )
        .await
    }

    async fn update_company(&self, id: i64, update: CompanyUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("name", update.name.map(text));
        set.push_opt("spoc", update.spoc.map(text));
        set.push_opt("email_id", update.email_id.map(text));
        set.push_opt("status", update.status.map(|s| text(s.as_str())));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("companies", "id", integer(id));
        self.execute_update(sql, params, "Company", id.to_string())
            .await
    }
}

// ============================================================================
// SpocRepository implementation
// ============================================================================

#[async_trait]
impl SpocRepository for SqliteRepository {
    async fn create_spoc(&self, spoc: NewSpoc) -> Result<Spoc> {
        let now = Utc::now();
        let name = spoc.name.clone();
        let phone = spoc.phone.clone();
        let email_id = spoc.email_id.clone();
        let location = spoc.location.clone();
        let status = spoc.status;
        let company_id = spoc.company_id;
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_SPOC,
                    params![
                        company_id,
                        name,
                        phone,
                        email_id,
                        location,
                        status.as_str(),
                        now_str,
                        now_str
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Spoc"))?;

        Ok(Spoc {
            id,
            company_id: spoc.company_id,
            name: spoc.name,
            phone: spoc.phone,
            email_id: spoc.email_id,
            location: spoc.location,
            status: spoc.status,
            created_date: now,
            updated_date: now,
        })
    }

    async fn get_spoc(&self, id: i64) -> Result<Option<Spoc>> {
        self.query_optional(
            schema::SELECT_SPOC_BY_ID,
            vec![integer(id)],
            row_to_spoc,
            "Spoc",
        )
        .await
    }

    async fn list_spocs(&self) -> Result<Vec<Spoc>> {
        self.query_list(schema::SELECT_SPOCS, Vec::new(), row_to_spoc, "Spoc")
            .await
    }

    async fn list_spocs_by_company(&self, company_id: i64) -> Result<Vec<Spoc>> {
        self.query_list(
            schema::SELECT_SPOCS_BY_COMPANY,
            vec![integer(company_id)],
            row_to_spoc,
            "Spoc",
        )
        .await
    }

    async fn update_spoc(&self, id: i64, update: SpocUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("name", update.name.map(text));
        set.push_opt("phone", update.phone.map(text));
        set.push_opt("email_id", update.email_id.map(text));
        set.push_opt("location", update.location.map(text));
        set.push_opt("status", update.status.map(|s| text(s.as_str())));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("spocs", "id", integer(id));
        self.execute_update(sql, params, "Spoc", id.to_string()).await
    }
}

// ============================================================================
// RequirementRepository implementation
// ============================================================================

#[async_trait]
impl RequirementRepository for SqliteRepository {
    async fn create_requirement(&self, requirement: NewRequirement) -> Result<Requirement> {
        let now = Utc::now();
        let key_skill = requirement.key_skill.clone();
        let jd = requirement.jd.clone();
        let recruiter_name = requirement.recruiter_name.clone();
        let location = requirement.location.clone();
        let remarks = requirement.remarks.clone();
        let req_cust_ref_id = requirement.req_cust_ref_id.clone();
        let company_id = requirement.company_id;
        let status_id = requirement.status_id;
        let budget = requirement.budget;
        let billing_date = requirement.expected_billing_date.map(|d| format_date(&d));
        let now_str = format_datetime(&now);

        let requirement_id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_REQUIREMENT,
                    params![
                        company_id,
                        key_skill,
                        jd,
                        status_id,
                        recruiter_name,
                        budget,
                        billing_date,
                        location,
                        remarks,
                        req_cust_ref_id,
                        now_str,
                        now_str
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Requirement"))?;

        Ok(Requirement {
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
        })
    }

    async fn get_requirement(&self, requirement_id: i64) -> Result<Option<Requirement>> {
        self.query_optional(
            schema::SELECT_REQUIREMENT_BY_ID,
            vec![integer(requirement_id)],
            row_to_requirement,
            "Requirement",
        )
        .await
    }

    async fn list_requirements(&self) -> Result<Vec<Requirement>> {
        self.query_list(
            schema::SELECT_REQUIREMENTS,
            Vec::new(),
            row_to_requirement,
            "Requirement",
        )
        .await
    }

    async fn update_requirement(
        &self,
        requirement_id: i64,
        update: RequirementUpdate,
    ) -> Result<bool> {
        let now = Utc::now();
        let mut set = SetClause::new();
        set.push_opt("company_id", update.company_id.map(integer));
        set.push_opt("key_skill", update.key_skill.map(text));
        set.push_opt("jd", update.jd.map(text));
        set.push_opt("recruiter_name", update.recruiter_name.map(text));
        set.push_opt("budget", update.budget.map(real));
        set.push_opt(
            "expected_billing_date",
            update.expected_billing_date.map(|d| text(format_date(&d))),
        );
        set.push_opt("location", update.location.map(text));
        set.push_opt("remarks", update.remarks.map(text));
        set.push_opt("req_cust_ref_id", update.req_cust_ref_id.map(text));

        // Entering the terminal set stamps closed_date, leaving it clears it.
        if let Some(status_id) = update.status_id {
            set.push("status_id", integer(status_id));
            if TERMINAL_STATUS_IDS.contains(&status_id) {
                set.push("closed_date", text(format_datetime(&now)));
            } else {
                set.push("closed_date", Value::Null);
            }
        }
        set.push("updated_date", text(format_datetime(&now)));

        let (sql, params) = set.into_update("requirements", "requirement_id", integer(requirement_id));
        self.execute_update(sql, params, "Requirement", requirement_id.to_string())
            .await
    }

    async fn list_requirement_statuses(&self) -> Result<Vec<RequirementStatus>> {
        self.query_list(
            schema::SELECT_REQUIREMENT_STATUSES,
            Vec::new(),
            row_to_requirement_status,
            "RequirementStatus",
        )
        .await
    }

    async fn list_open_requirements_by_company(
        &self,
        company_id: i64,
    ) -> Result<Vec<Requirement>> {
        self.query_list(
            schema::SELECT_OPEN_REQUIREMENTS_BY_COMPANY,
            vec![
                integer(company_id),
                integer(OPEN_STATUS_IDS[0]),
                integer(OPEN_STATUS_IDS[1]),
                integer(OPEN_STATUS_IDS[2]),
            ],
            row_to_requirement,
            "Requirement",
        )
        .await
    }

    async fn list_open_requirements_by_company_and_recruiter(
        &self,
        company_id: i64,
        recruiter_name: &str,
    ) -> Result<Vec<Requirement>> {
        self.query_list(
            schema::SELECT_OPEN_REQUIREMENTS_BY_COMPANY_AND_RECRUITER,
            vec![
                integer(company_id),
                integer(OPEN_STATUS_IDS[0]),
                integer(OPEN_STATUS_IDS[1]),
                integer(OPEN_STATUS_IDS[2]),
                text(recruiter_name),
            ],
            row_to_requirement,
            "Requirement",
        )
        .await
    }
}

// ============================================================================
// ProfileRepository implementation
// ============================================================================

#[async_trait]
impl ProfileRepository for SqliteRepository {
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile> {
        let now = Utc::now();
        let name = profile.name.clone();
        let email_id = profile.email_id.clone();
        let phone = profile.phone.clone();
        let key_skills = profile.key_skills.clone();
        let notice_period = profile.notice_period.clone();
        let remarks = profile.remarks.clone();
        let experience_years = profile.experience_years;
        let current_ctc = profile.current_ctc;
        let expected_ctc = profile.expected_ctc;
        let status = profile.status;
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PROFILE,
                    params![
                        name,
                        email_id,
                        phone,
                        key_skills,
                        experience_years,
                        current_ctc,
                        expected_ctc,
                        notice_period,
                        status,
                        remarks,
                        now_str,
                        now_str
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Profile"))?;

        Ok(Profile {
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
        })
    }

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>> {
        self.query_optional(
            schema::SELECT_PROFILE_BY_ID,
            vec![integer(id)],
            row_to_profile,
            "Profile",
        )
        .await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.query_list(schema::SELECT_PROFILES, Vec::new(), row_to_profile, "Profile")
            .await
    }

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("name", update.name.map(text));
        set.push_opt("email_id", update.email_id.map(text));
        set.push_opt("phone", update.phone.map(text));
        set.push_opt("key_skills", update.key_skills.map(text));
        set.push_opt("experience_years", update.experience_years.map(real));
        set.push_opt("current_ctc", update.current_ctc.map(real));
        set.push_opt("expected_ctc", update.expected_ctc.map(real));
        set.push_opt("notice_period", update.notice_period.map(text));
        set.push_opt("status", update.status.map(integer));
        set.push_opt("remarks", update.remarks.map(text));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("profiles", "id", integer(id));
        self.execute_update(sql, params, "Profile", id.to_string())
            .await
    }

    async fn list_profile_stages(&self) -> Result<Vec<ProfileStatus>> {
        self.query_list(
            schema::SELECT_PROFILE_STAGES,
            Vec::new(),
            row_to_profile_stage,
            "ProfileStatus",
        )
        .await
    }

    async fn list_placements_by_date_range(
        &self,
        range: DateRange,
        recruiter_name: Option<&str>,
    ) -> Result<Vec<PlacementActivity>> {
        let start = text(format_date(&range.start));
        let end = text(format_date(&range.end_exclusive()));

        match recruiter_name {
            Some(recruiter) => {
                self.query_list(
                    schema::SELECT_PLACEMENTS_BY_DATE_RANGE_AND_RECRUITER,
                    vec![start, end, text(recruiter)],
                    row_to_placement_activity,
                    "Profile",
                )
                .await
            }
            None => {
                self.query_list(
                    schema::SELECT_PLACEMENTS_BY_DATE_RANGE,
                    vec![start, end],
                    row_to_placement_activity,
                    "Profile",
                )
                .await
            }
        }
    }
}

// ============================================================================
// ProcessProfileRepository implementation
// ============================================================================

#[async_trait]
impl ProcessProfileRepository for SqliteRepository {
    async fn create_process_profile(
        &self,
        process_profile: NewProcessProfile,
    ) -> Result<ProcessProfile> {
        let now = Utc::now();
        let pp = process_profile;

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PROCESS_PROFILE_BY_REQ_AND_RECRUITER)
                    .map_err(wrap_err)?;
                let existing = match stmt.query_row(
                    params![pp.requirement_id, pp.recruiter_name],
                    row_to_process_profile,
                ) {
                    Ok(row) => Some(row),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(wrap_err(e)),
                };
                drop(stmt);

                if let Some(mut row) = existing {
                    if row.actively_working != pp.actively_working {
                        conn.execute(
                            "UPDATE process_profiles SET actively_working = ?2, updated_date = ?3 WHERE id = ?1",
                            params![row.id, pp.actively_working.as_str(), format_datetime(&now)],
                        )
                        .map_err(wrap_err)?;
                        row.actively_working = pp.actively_working;
                        row.updated_date = now;
                    }
                    return Ok(row);
                }

                conn.execute(
                    schema::INSERT_PROCESS_PROFILE,
                    params![
                        pp.requirement_id,
                        pp.profile_id,
                        pp.recruiter_name,
                        pp.status,
                        pp.actively_working.as_str(),
                        pp.remarks,
                        format_datetime(&now),
                        format_datetime(&now)
                    ],
                )
                .map_err(wrap_err)?;

                Ok(ProcessProfile {
                    id: conn.last_insert_rowid(),
                    requirement_id: pp.requirement_id,
                    profile_id: pp.profile_id,
                    recruiter_name: pp.recruiter_name,
                    status: pp.status,
                    actively_working: pp.actively_working,
                    remarks: pp.remarks,
                    created_date: now,
                    updated_date: now,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ProcessProfile"))
    }

    async fn upsert_process_profile(
        &self,
        process_profile: NewProcessProfile,
    ) -> Result<ProcessProfile> {
        let now = Utc::now();
        let pp = process_profile;

        self.conn
            .call(move |conn| {
                // Match on (requirement, profile) first, then fall back to
                // the requirement's unassigned placeholder row.
                let mut existing = None;
                if let Some(profile_id) = pp.profile_id {
                    let mut stmt = conn
                        .prepare(schema::SELECT_PROCESS_PROFILE_BY_REQ_AND_PROFILE)
                        .map_err(wrap_err)?;
                    existing = match stmt
                        .query_row(params![pp.requirement_id, profile_id], row_to_process_profile)
                    {
                        Ok(row) => Some(row),
                        Err(rusqlite::Error::QueryReturnedNoRows) => None,
                        Err(e) => return Err(wrap_err(e)),
                    };
                }
                if existing.is_none() {
                    let mut stmt = conn
                        .prepare(schema::SELECT_UNASSIGNED_PROCESS_PROFILE)
                        .map_err(wrap_err)?;
                    existing = match stmt
                        .query_row(params![pp.requirement_id], row_to_process_profile)
                    {
                        Ok(row) => Some(row),
                        Err(rusqlite::Error::QueryReturnedNoRows) => None,
                        Err(e) => return Err(wrap_err(e)),
                    };
                }

                if let Some(row) = existing {
                    conn.execute(
                        schema::UPDATE_PROCESS_PROFILE_FULL,
                        params![
                            row.id,
                            pp.profile_id,
                            pp.recruiter_name,
                            pp.status,
                            pp.actively_working.as_str(),
                            pp.remarks,
                            format_datetime(&now)
                        ],
                    )
                    .map_err(wrap_err)?;

                    return Ok(ProcessProfile {
                        id: row.id,
                        requirement_id: pp.requirement_id,
                        profile_id: pp.profile_id,
                        recruiter_name: pp.recruiter_name,
                        status: pp.status,
                        actively_working: pp.actively_working,
                        remarks: pp.remarks,
                        created_date: row.created_date,
                        updated_date: now,
                    });
                }

                conn.execute(
                    schema::INSERT_PROCESS_PROFILE,
                    params![
                        pp.requirement_id,
                        pp.profile_id,
                        pp.recruiter_name,
                        pp.status,
                        pp.actively_working.as_str(),
                        pp.remarks,
                        format_datetime(&now),
                        format_datetime(&now)
                    ],
                )
                .map_err(wrap_err)?;

                Ok(ProcessProfile {
                    id: conn.last_insert_rowid(),
                    requirement_id: pp.requirement_id,
                    profile_id: pp.profile_id,
                    recruiter_name: pp.recruiter_name,
                    status: pp.status,
                    actively_working: pp.actively_working,
                    remarks: pp.remarks,
                    created_date: now,
                    updated_date: now,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ProcessProfile"))
    }

    async fn assign_recruiter(&self, requirement_id: i64, recruiter_name: &str) -> Result<bool> {
        let recruiter = recruiter_name.to_string();
        let now_str = format_datetime(&Utc::now());

        let rows = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_RECRUITER_BY_REQUIREMENT,
                    params![requirement_id, recruiter, now_str],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ProcessProfile"))?;

        Ok(rows > 0)
    }

    async fn assign_profile(&self, requirement_id: i64, profile_id: i64) -> Result<bool> {
        let now_str = format_datetime(&Utc::now());

        let rows = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_PROFILE_BY_REQUIREMENT,
                    params![requirement_id, profile_id, now_str],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ProcessProfile"))?;

        Ok(rows > 0)
    }

    async fn set_actively_working(
        &self,
        requirement_id: i64,
        profile_id: i64,
        actively_working: ActivelyWorking,
    ) -> Result<bool> {
        let now_str = format_datetime(&Utc::now());

        let rows = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_ACTIVELY_WORKING,
                    params![requirement_id, profile_id, actively_working.as_str(), now_str],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ProcessProfile"))?;

        Ok(rows > 0)
    }

    async fn pipeline_by_requirement(&self, requirement_id: i64) -> Result<Vec<PipelineProfile>> {
        self.query_list(
            schema::SELECT_PIPELINE_BY_REQUIREMENT,
            vec![integer(requirement_id)],
            row_to_pipeline_profile,
            "ProcessProfile",
        )
        .await
    }

    async fn list_active_by_requirement(
        &self,
        requirement_id: i64,
    ) -> Result<Vec<ProcessProfile>> {
        self.query_list(
            schema::SELECT_ACTIVE_BY_REQUIREMENT,
            vec![integer(requirement_id)],
            row_to_process_profile,
            "ProcessProfile",
        )
        .await
    }
}

// ============================================================================
// InvoiceRepository implementation
// ============================================================================

#[async_trait]
impl InvoiceRepository for SqliteRepository {
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice> {
        let duplicate = self
            .query_optional(
                schema::SELECT_INVOICE_BY_NUMBER,
                vec![text(invoice.invoice_number.clone())],
                row_to_invoice,
                "Invoice",
            )
            .await?;
        if duplicate.is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Invoice",
                id: invoice.invoice_number,
            });
        }

        let now = Utc::now();
        let invoice_number = invoice.invoice_number.clone();
        let reference = invoice.reference.clone();
        let po_number = invoice.po_number.clone();
        let remarks = invoice.remarks.clone();
        let company_id = invoice.company_id;
        let amount = invoice.amount;
        let raised_date = format_date(&invoice.raised_date);
        let due_date = format_date(&invoice.due_date);
        let status = invoice.status;
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_INVOICE,
                    params![
                        invoice_number,
                        reference,
                        company_id,
                        po_number,
                        amount,
                        raised_date,
                        due_date,
                        status.as_str(),
                        remarks,
                        now_str,
                        now_str
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "Invoice", invoice.invoice_number.clone())
            })?;

        Ok(Invoice {
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
        })
    }

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>> {
        self.query_optional(
            schema::SELECT_INVOICE_BY_ID,
            vec![integer(id)],
            row_to_invoice,
            "Invoice",
        )
        .await
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.query_list(schema::SELECT_INVOICES, Vec::new(), row_to_invoice, "Invoice")
            .await
    }

    async fn list_invoices_by_company(&self, company_id: i64) -> Result<Vec<Invoice>> {
        self.query_list(
            schema::SELECT_INVOICES_BY_COMPANY,
            vec![integer(company_id)],
            row_to_invoice,
            "Invoice",
        )
        .await
    }

    async fn update_invoice(&self, id: i64, update: InvoiceUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("reference", update.reference.map(text));
        set.push_opt("po_number", update.po_number.map(text));
        set.push_opt("amount", update.amount.map(real));
        set.push_opt("raised_date", update.raised_date.map(|d| text(format_date(&d))));
        set.push_opt("due_date", update.due_date.map(|d| text(format_date(&d))));
        set.push_opt("status", update.status.map(|s| text(s.as_str())));
        set.push_opt("remarks", update.remarks.map(text));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("invoices", "id", integer(id));
        self.execute_update(sql, params, "Invoice", id.to_string())
            .await
    }
}

// ============================================================================
// LeaveRepository implementation
// ============================================================================

#[async_trait]
impl LeaveRepository for SqliteRepository {
    async fn create_leave(&self, leave: NewLeave) -> Result<Leave> {
        let now = Utc::now();
        let username = leave.username.clone();
        let reason = leave.reason.clone();
        let leave_type = leave.leave_type;
        let start_date = format_date(&leave.start_date);
        let end_date = format_date(&leave.end_date);
        let days = leave.days;
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_LEAVE,
                    params![
                        username,
                        leave_type.as_str(),
                        start_date,
                        end_date,
                        days,
                        reason,
                        LeaveStatus::Pending.as_str(),
                        now_str,
                        now_str
                    ],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Leave"))?;

        Ok(Leave {
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
        })
    }

    async fn get_leave(&self, id: i64) -> Result<Option<Leave>> {
        self.query_optional(
            schema::SELECT_LEAVE_BY_ID,
            vec![integer(id)],
            row_to_leave,
            "Leave",
        )
        .await
    }

    async fn list_leaves(&self) -> Result<Vec<Leave>> {
        self.query_list(schema::SELECT_LEAVES, Vec::new(), row_to_leave, "Leave")
            .await
    }

    async fn list_leaves_by_user(&self, username: &str) -> Result<Vec<Leave>> {
        self.query_list(
            schema::SELECT_LEAVES_BY_USER,
            vec![text(username)],
            row_to_leave,
            "Leave",
        )
        .await
    }

    async fn list_pending_leaves(&self) -> Result<Vec<Leave>> {
        self.query_list(
            schema::SELECT_PENDING_LEAVES,
            Vec::new(),
            row_to_leave,
            "Leave",
        )
        .await
    }

    async fn update_leave(&self, id: i64, update: LeaveUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("status", update.status.map(|s| text(s.as_str())));
        set.push_opt("approver_comments", update.approver_comments.map(text));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("leaves", "id", integer(id));
        self.execute_update(sql, params, "Leave", id.to_string()).await
    }

    async fn create_leave_balance(&self, username: &str) -> Result<LeaveBalance> {
        let now = Utc::now();
        let year = now.year();
        let username_owned = username.to_string();
        let insert_username = username_owned.clone();
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_LEAVE_BALANCE,
                    params![insert_username, year, now_str, now_str],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "LeaveBalance", username))?;

        Ok(LeaveBalance {
            id,
            username: username_owned,
            annual_leave: 0,
            sick_leave: 0,
            casual_leave: 0,
            year,
            created_date: now,
            updated_date: now,
        })
    }

    async fn get_leave_balance(&self, username: &str) -> Result<Option<LeaveBalance>> {
        self.query_optional(
            schema::SELECT_LEAVE_BALANCE_BY_USER,
            vec![text(username)],
            row_to_leave_balance,
            "LeaveBalance",
        )
        .await
    }

    async fn update_leave_balance(
        &self,
        username: &str,
        update: LeaveBalanceUpdate,
    ) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("annual_leave", update.annual_leave.map(integer));
        set.push_opt("sick_leave", update.sick_leave.map(integer));
        set.push_opt("casual_leave", update.casual_leave.map(integer));
        set.push_opt("year", update.year.map(|y| integer(y as i64)));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("leave_balances", "username", text(username));
        self.execute_update(sql, params, "LeaveBalance", username.to_string())
            .await
    }
}

// ============================================================================
// FinancialYearRepository implementation
// ============================================================================

#[async_trait]
impl FinancialYearRepository for SqliteRepository {
    async fn create_financial_year(&self, year: NewFinancialYear) -> Result<FinancialYear> {
        let duplicate = self
            .query_optional(
                schema::SELECT_FINANCIAL_YEAR_BY_YEAR,
                vec![integer(year.year as i64)],
                row_to_financial_year,
                "FinancialYear",
            )
            .await?;
        if duplicate.is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "FinancialYear",
                id: year.year.to_string(),
            });
        }

        let now = Utc::now();
        let fy = year;
        let now_str = format_datetime(&now);
        let start_date = format_date(&fy.start_date);
        let end_date = format_date(&fy.end_date);
        let fy_year = fy.year;
        let is_active = fy.is_active;

        let id = self
            .conn
            .call(move |conn| {
                // Creating an active year deactivates every other one first.
                if is_active {
                    conn.execute(schema::DEACTIVATE_FINANCIAL_YEARS, params![now_str])
                        .map_err(wrap_err)?;
                }
                conn.execute(
                    schema::INSERT_FINANCIAL_YEAR,
                    params![fy_year, start_date, end_date, is_active, now_str, now_str],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| {
                map_tokio_rusqlite_error_with_id(e, "FinancialYear", fy.year.to_string())
            })?;

        Ok(FinancialYear {
            id,
            year: fy.year,
            start_date: fy.start_date,
            end_date: fy.end_date,
            is_active: fy.is_active,
            created_date: now,
            updated_date: now,
        })
    }

    async fn get_financial_year(&self, id: i64) -> Result<Option<FinancialYear>> {
        self.query_optional(
            schema::SELECT_FINANCIAL_YEAR_BY_ID,
            vec![integer(id)],
            row_to_financial_year,
            "FinancialYear",
        )
        .await
    }

    async fn list_financial_years(&self) -> Result<Vec<FinancialYear>> {
        self.query_list(
            schema::SELECT_FINANCIAL_YEARS,
            Vec::new(),
            row_to_financial_year,
            "FinancialYear",
        )
        .await
    }

    async fn get_active_financial_year(&self) -> Result<Option<FinancialYear>> {
        self.query_optional(
            schema::SELECT_ACTIVE_FINANCIAL_YEAR,
            Vec::new(),
            row_to_financial_year,
            "FinancialYear",
        )
        .await
    }

    async fn activate_financial_year(&self, id: i64) -> Result<bool> {
        let now_str = format_datetime(&Utc::now());

        let rows = self
            .conn
            .call(move |conn| {
                // Leave the current activation untouched when the target is
                // missing.
                let exists = match conn.query_row(
                    schema::SELECT_FINANCIAL_YEAR_BY_ID,
                    params![id],
                    |_row| Ok(()),
                ) {
                    Ok(()) => true,
                    Err(rusqlite::Error::QueryReturnedNoRows) => false,
                    Err(e) => return Err(wrap_err(e)),
                };
                if !exists {
                    return Ok(0);
                }

                conn.execute(schema::DEACTIVATE_FINANCIAL_YEARS, params![now_str])
                    .map_err(wrap_err)?;
                conn.execute(schema::ACTIVATE_FINANCIAL_YEAR, params![now_str, id])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "FinancialYear", id.to_string()))?;

        Ok(rows > 0)
    }

    async fn update_financial_year(&self, id: i64, update: FinancialYearUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("start_date", update.start_date.map(|d| text(format_date(&d))));
        set.push_opt("end_date", update.end_date.map(|d| text(format_date(&d))));
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("financial_years", "id", integer(id));
        self.execute_update(sql, params, "FinancialYear", id.to_string())
            .await
    }
}

// ============================================================================
// HolidayRepository implementation
// ============================================================================

#[async_trait]
impl HolidayRepository for SqliteRepository {
    async fn create_holiday(&self, holiday: NewHoliday) -> Result<Holiday> {
        let now = Utc::now();
        let name = holiday.name.clone();
        let date = format_date(&holiday.date);
        let financial_year_id = holiday.financial_year_id;
        let is_mandatory = holiday.is_mandatory;
        let now_str = format_datetime(&now);

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_HOLIDAY,
                    params![financial_year_id, name, date, is_mandatory, now_str, now_str],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Holiday"))?;

        Ok(Holiday {
            id,
            financial_year_id: holiday.financial_year_id,
            name: holiday.name,
            date: holiday.date,
            is_mandatory: holiday.is_mandatory,
            created_date: now,
            updated_date: now,
        })
    }

    async fn get_holiday(&self, id: i64) -> Result<Option<Holiday>> {
        self.query_optional(
            schema::SELECT_HOLIDAY_BY_ID,
            vec![integer(id)],
            row_to_holiday,
            "Holiday",
        )
        .await
    }

    async fn list_holidays_by_year(&self, financial_year_id: i64) -> Result<Vec<Holiday>> {
        self.query_list(
            schema::SELECT_HOLIDAYS_BY_YEAR,
            vec![integer(financial_year_id)],
            row_to_holiday,
            "Holiday",
        )
        .await
    }

    async fn list_mandatory_holidays(&self, financial_year_id: i64) -> Result<Vec<Holiday>> {
        self.query_list(
            schema::SELECT_MANDATORY_HOLIDAYS,
            vec![integer(financial_year_id)],
            row_to_holiday,
            "Holiday",
        )
        .await
    }

    async fn list_optional_holidays(&self, financial_year_id: i64) -> Result<Vec<Holiday>> {
        self.query_list(
            schema::SELECT_OPTIONAL_HOLIDAYS,
            vec![integer(financial_year_id)],
            row_to_holiday,
            "Holiday",
        )
        .await
    }

    async fn update_holiday(&self, id: i64, update: HolidayUpdate) -> Result<bool> {
        let mut set = SetClause::new();
        set.push_opt("name", update.name.map(text));
        set.push_opt("date", update.date.map(|d| text(format_date(&d))));
        set.push_opt(
            "is_mandatory",
            update.is_mandatory.map(|b| integer(b as i64)),
        );
        set.push("updated_date", text(format_datetime(&Utc::now())));

        let (sql, params) = set.into_update("holidays", "id", integer(id));
        self.execute_update(sql, params, "Holiday", id.to_string())
            .await
    }

    async fn delete_holiday(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_HOLIDAY, params![id]).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Holiday", id.to_string()))?;

        Ok(rows > 0)
    }

    async fn replace_holiday_selections(
        &self,
        username: &str,
        financial_year_id: i64,
        holiday_ids: &[i64],
    ) -> Result<()> {
        let username = username.to_string();
        let holiday_ids = holiday_ids.to_vec();
        let now_str = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::DELETE_HOLIDAY_SELECTIONS,
                    params![username, financial_year_id],
                )
                .map_err(wrap_err)?;

                for holiday_id in &holiday_ids {
                    conn.execute(
                        schema::INSERT_HOLIDAY_SELECTION,
                        params![username, holiday_id, financial_year_id, now_str],
                    )
                    .map_err(wrap_err)?;
                }
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "HolidaySelection"))
    }

    async fn selected_holidays(
        &self,
        username: &str,
        financial_year_id: i64,
    ) -> Result<Vec<SelectedHoliday>> {
        self.query_list(
            schema::SELECT_SELECTED_HOLIDAYS,
            vec![text(username), integer(financial_year_id)],
            row_to_selected_holiday,
            "HolidaySelection",
        )
        .await
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.username,
            });
        }

        let username = user.username.clone();
        let hashed_password = user.hashed_password.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(schema::INSERT_USER, params![username, hashed_password])
                    .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user.username.clone()))?;

        Ok(User {
            id,
            username: user.username,
            hashed_password: user.hashed_password,
        })
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.query_optional(
            schema::SELECT_USER_BY_USERNAME,
            vec![text(username)],
            row_to_user,
            "User",
        )
        .await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.query_list(schema::SELECT_USERS, Vec::new(), row_to_user, "User")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use talentdesk_core::domain::{InvoiceStatus, LeaveType, RecordStatus};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn new_company(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            spoc: "Asha Rao".to_string(),
            email_id: "contact@acme.example".to_string(),
            status: RecordStatus::Active,
        }
    }

    fn new_requirement(company_id: i64) -> NewRequirement {
        NewRequirement {
            company_id,
            key_skill: "Rust".to_string(),
            jd: "Backend engineer for the billing platform".to_string(),
            status_id: 1,
            recruiter_name: Some("priya".to_string()),
            budget: Some(2_400_000.0),
            expected_billing_date: Some(date(2024, 6, 1)),
            location: Some("Pune".to_string()),
            remarks: None,
            req_cust_ref_id: None,
        }
    }

    fn new_profile(name: &str, status: i64) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            email_id: format!("{}@example.com", name.to_lowercase()),
            phone: "9876543210".to_string(),
            key_skills: "Rust, SQL".to_string(),
            experience_years: Some(4.5),
            current_ctc: None,
            expected_ctc: Some(1_800_000.0),
            notice_period: Some("30 days".to_string()),
            status,
            remarks: None,
        }
    }

    fn new_pipeline_row(
        requirement_id: i64,
        profile_id: Option<i64>,
        recruiter: &str,
    ) -> NewProcessProfile {
        NewProcessProfile {
            requirement_id,
            profile_id,
            recruiter_name: recruiter.to_string(),
            status: None,
            actively_working: ActivelyWorking::Yes,
            remarks: None,
        }
    }

    // ==================== Company tests ====================

    #[tokio::test]
    async fn test_company_create_and_get_round_trip() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let created = repo.create_company(new_company("Acme")).await.unwrap();
        let fetched = repo.get_company(created.id).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_company_name_conflict_is_case_insensitive() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.create_company(new_company("Acme")).await.unwrap();

        let result = repo.create_company(new_company("ACME")).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Company",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_get_company_by_name_ignores_case() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let created = repo.create_company(new_company("Acme")).await.unwrap();

        let found = repo.get_company_by_name("acme").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_supplied_fields() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let created = repo.create_company(new_company("Acme")).await.unwrap();

        let matched = repo
            .update_company(
                created.id,
                CompanyUpdate {
                    status: Some(RecordStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matched);

        let reloaded = repo.get_company(created.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, RecordStatus::Inactive);
        assert_eq!(reloaded.name, created.name);
        assert_eq!(reloaded.spoc, created.spoc);
        assert_eq!(reloaded.email_id, created.email_id);
        assert_eq!(reloaded.created_date, created.created_date);
        assert!(reloaded.updated_date > created.updated_date);
    }

    #[tokio::test]
    async fn test_update_missing_company_reports_no_match() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let matched = repo
            .update_company(
                999,
                CompanyUpdate {
                    status: Some(RecordStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(!matched);
    }

    #[tokio::test]
    async fn test_list_active_companies_filters_inactive() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.create_company(new_company("Acme")).await.unwrap();
        let other = repo.create_company(new_company("Globex")).await.unwrap();
        repo.update_company(
            other.id,
            CompanyUpdate {
                status: Some(RecordStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let active = repo.list_active_companies().await.unwrap();

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Acme");
    }

    // ==================== Requirement tests ====================

    #[tokio::test]
    async fn test_requirement_round_trip() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();

        let created = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        let fetched = repo.get_requirement(created.requirement_id).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_terminal_status_stamps_closed_date_and_reopen_clears_it() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        assert!(requirement.closed_date.is_none());

        repo.update_requirement(
            requirement.requirement_id,
            RequirementUpdate {
                status_id: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let closed = repo
            .get_requirement(requirement.requirement_id)
            .await
            .unwrap()
            .unwrap();
        assert!(closed.closed_date.is_some());

        repo.update_requirement(
            requirement.requirement_id,
            RequirementUpdate {
                status_id: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let reopened = repo
            .get_requirement(requirement.requirement_id)
            .await
            .unwrap()
            .unwrap();
        assert!(reopened.closed_date.is_none());
    }

    #[tokio::test]
    async fn test_open_requirements_by_company_and_recruiter() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();

        let assigned = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        let unassigned = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        // Close a third requirement entirely.
        let closed = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        repo.update_requirement(
            closed.requirement_id,
            RequirementUpdate {
                status_id: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        repo.create_process_profile(new_pipeline_row(assigned.requirement_id, None, "priya"))
            .await
            .unwrap();

        let open = repo
            .list_open_requirements_by_company(company.id)
            .await
            .unwrap();
        assert_eq!(open.len(), 2);

        let for_priya = repo
            .list_open_requirements_by_company_and_recruiter(company.id, "priya")
            .await
            .unwrap();
        assert_eq!(for_priya.len(), 1);
        assert_eq!(for_priya[0].requirement_id, assigned.requirement_id);
        assert_ne!(for_priya[0].requirement_id, unassigned.requirement_id);
    }

    // ==================== Profile and pipeline tests ====================

    #[tokio::test]
    async fn test_profile_stages_are_seeded() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let stages = repo.list_profile_stages().await.unwrap();

        assert!(stages.iter().any(|s| s.stage == "Interview"));
        assert!(stages.iter().any(|s| s.stage == "Offer"));
    }

    #[tokio::test]
    async fn test_pipeline_join_attaches_stage_label() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        // Status 3 is seeded as "Interview".
        let profile = repo.create_profile(new_profile("Meera", 3)).await.unwrap();

        repo.upsert_process_profile(new_pipeline_row(
            requirement.requirement_id,
            Some(profile.id),
            "priya",
        ))
        .await
        .unwrap();

        let pipeline = repo
            .pipeline_by_requirement(requirement.requirement_id)
            .await
            .unwrap();

        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline[0].stage, "Interview");
        assert_eq!(pipeline[0].profile.id, profile.id);
    }

    #[tokio::test]
    async fn test_pipeline_join_falls_back_to_unknown_stage() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        let profile = repo.create_profile(new_profile("Meera", 99)).await.unwrap();

        repo.upsert_process_profile(new_pipeline_row(
            requirement.requirement_id,
            Some(profile.id),
            "priya",
        ))
        .await
        .unwrap();

        let pipeline = repo
            .pipeline_by_requirement(requirement.requirement_id)
            .await
            .unwrap();

        assert_eq!(pipeline.len(), 1);
        assert_eq!(pipeline[0].stage, "Unknown");
    }

    #[tokio::test]
    async fn test_pipeline_join_drops_rows_with_missing_profile() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();

        // Pipeline row pointing at a profile that does not exist.
        repo.upsert_process_profile(new_pipeline_row(
            requirement.requirement_id,
            Some(999),
            "priya",
        ))
        .await
        .unwrap();

        let pipeline = repo
            .pipeline_by_requirement(requirement.requirement_id)
            .await
            .unwrap();

        assert!(pipeline.is_empty());
    }

    #[tokio::test]
    async fn test_create_process_profile_reuses_recruiter_row() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();

        let first = repo
            .create_process_profile(new_pipeline_row(requirement.requirement_id, None, "priya"))
            .await
            .unwrap();
        let mut second_input = new_pipeline_row(requirement.requirement_id, None, "priya");
        second_input.actively_working = ActivelyWorking::No;
        let second = repo.create_process_profile(second_input).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.actively_working, ActivelyWorking::No);
    }

    #[tokio::test]
    async fn test_upsert_claims_unassigned_placeholder_row() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        let profile = repo.create_profile(new_profile("Meera", 1)).await.unwrap();

        let placeholder = repo
            .create_process_profile(new_pipeline_row(requirement.requirement_id, None, "priya"))
            .await
            .unwrap();

        let upserted = repo
            .upsert_process_profile(new_pipeline_row(
                requirement.requirement_id,
                Some(profile.id),
                "priya",
            ))
            .await
            .unwrap();

        // The placeholder was claimed, not duplicated.
        assert_eq!(upserted.id, placeholder.id);
        assert_eq!(upserted.profile_id, Some(profile.id));

        let again = repo
            .upsert_process_profile(new_pipeline_row(
                requirement.requirement_id,
                Some(profile.id),
                "dev",
            ))
            .await
            .unwrap();
        assert_eq!(again.id, placeholder.id);
        assert_eq!(again.recruiter_name, "dev");
    }

    #[tokio::test]
    async fn test_placements_by_date_range_joins_company_context() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();
        let requirement = repo
            .create_requirement(new_requirement(company.id))
            .await
            .unwrap();
        let profile = repo.create_profile(new_profile("Meera", 2)).await.unwrap();
        repo.upsert_process_profile(new_pipeline_row(
            requirement.requirement_id,
            Some(profile.id),
            "priya",
        ))
        .await
        .unwrap();

        let today = Utc::now().date_naive();
        let range = DateRange::new(today.pred_opt().unwrap(), today.succ_opt().unwrap()).unwrap();

        let placements = repo
            .list_placements_by_date_range(range, None)
            .await
            .unwrap();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].profile_id, profile.id);
        assert_eq!(placements[0].recruiter_name.as_deref(), Some("priya"));
        assert_eq!(placements[0].company_name.as_deref(), Some("Acme"));

        let none = repo
            .list_placements_by_date_range(range, Some("dev"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    // ==================== Invoice tests ====================

    #[tokio::test]
    async fn test_invoice_round_trip_and_number_conflict() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let company = repo.create_company(new_company("Acme")).await.unwrap();

        let invoice = NewInvoice {
            invoice_number: "INV-2024-0001".to_string(),
            reference: Some("Q1 retainer".to_string()),
            company_id: company.id,
            po_number: None,
            amount: 125000.75,
            raised_date: date(2024, 1, 10),
            due_date: date(2024, 2, 10),
            status: InvoiceStatus::Pending,
            remarks: None,
        };

        let created = repo.create_invoice(invoice.clone()).await.unwrap();
        let fetched = repo.get_invoice(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));

        let duplicate = repo.create_invoice(invoice).await;
        assert!(matches!(
            duplicate,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Invoice",
                ..
            })
        ));
    }

    // ==================== Leave tests ====================

    #[tokio::test]
    async fn test_leave_lifecycle_and_balance() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let leave = repo
            .create_leave(NewLeave {
                username: "ravi".to_string(),
                leave_type: LeaveType::Casual,
                start_date: date(2024, 3, 4),
                end_date: date(2024, 3, 5),
                days: 2,
                reason: "Family function".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(leave.status, LeaveStatus::Pending);

        assert_eq!(repo.list_pending_leaves().await.unwrap().len(), 1);

        let matched = repo
            .update_leave(
                leave.id,
                LeaveUpdate {
                    status: Some(LeaveStatus::Approved),
                    approver_comments: Some("Enjoy".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(matched);
        assert!(repo.list_pending_leaves().await.unwrap().is_empty());

        let reloaded = repo.get_leave(leave.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, LeaveStatus::Approved);
        assert_eq!(reloaded.approver_comments.as_deref(), Some("Enjoy"));
        assert_eq!(reloaded.days, 2);

        let balance = repo.create_leave_balance("ravi").await.unwrap();
        assert_eq!(balance.casual_leave, 0);

        repo.update_leave_balance(
            "ravi",
            LeaveBalanceUpdate {
                casual_leave: Some(8),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let reloaded_balance = repo.get_leave_balance("ravi").await.unwrap().unwrap();
        assert_eq!(reloaded_balance.casual_leave, 8);
        assert_eq!(reloaded_balance.annual_leave, 0);
    }

    #[tokio::test]
    async fn test_leaves_by_user_are_isolated() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        for user in ["ravi", "meena"] {
            repo.create_leave(NewLeave {
                username: user.to_string(),
                leave_type: LeaveType::Annual,
                start_date: date(2024, 5, 6),
                end_date: date(2024, 5, 7),
                days: 2,
                reason: "Vacation".to_string(),
            })
            .await
            .unwrap();
        }

        let ravi = repo.list_leaves_by_user("ravi").await.unwrap();
        assert_eq!(ravi.len(), 1);
        assert_eq!(ravi[0].username, "ravi");
        assert_eq!(repo.list_leaves().await.unwrap().len(), 2);
    }

    // ==================== Financial year tests ====================

    #[tokio::test]
    async fn test_financial_year_activation_is_exclusive() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let fy_2023 = repo
            .create_financial_year(NewFinancialYear {
                year: 2023,
                start_date: date(2023, 4, 1),
                end_date: date(2024, 3, 31),
                is_active: true,
            })
            .await
            .unwrap();
        let fy_2024 = repo
            .create_financial_year(NewFinancialYear {
                year: 2024,
                start_date: date(2024, 4, 1),
                end_date: date(2025, 3, 31),
                is_active: false,
            })
            .await
            .unwrap();

        let activated = repo.activate_financial_year(fy_2024.id).await.unwrap();
        assert!(activated);

        let years = repo.list_financial_years().await.unwrap();
        let active: Vec<_> = years.iter().filter(|fy| fy.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fy_2024.id);

        let current = repo.get_active_financial_year().await.unwrap().unwrap();
        assert_eq!(current.id, fy_2024.id);
        assert_ne!(current.id, fy_2023.id);
    }

    #[tokio::test]
    async fn test_creating_active_year_deactivates_others() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        repo.create_financial_year(NewFinancialYear {
            year: 2023,
            start_date: date(2023, 4, 1),
            end_date: date(2024, 3, 31),
            is_active: true,
        })
        .await
        .unwrap();
        let fy_2024 = repo
            .create_financial_year(NewFinancialYear {
                year: 2024,
                start_date: date(2024, 4, 1),
                end_date: date(2025, 3, 31),
                is_active: true,
            })
            .await
            .unwrap();

        let years = repo.list_financial_years().await.unwrap();
        let active: Vec<_> = years.iter().filter(|fy| fy.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, fy_2024.id);
    }

    #[tokio::test]
    async fn test_duplicate_financial_year_is_conflict() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        repo.create_financial_year(NewFinancialYear {
            year: 2024,
            start_date: date(2024, 4, 1),
            end_date: date(2025, 3, 31),
            is_active: false,
        })
        .await
        .unwrap();

        let duplicate = repo
            .create_financial_year(NewFinancialYear {
                year: 2024,
                start_date: date(2024, 4, 1),
                end_date: date(2025, 3, 31),
                is_active: false,
            })
            .await;

        assert!(matches!(
            duplicate,
            Err(RepositoryError::AlreadyExists {
                entity_type: "FinancialYear",
                ..
            })
        ));
    }

    // ==================== Holiday tests ====================

    async fn seed_financial_year(repo: &SqliteRepository) -> FinancialYear {
        repo.create_financial_year(NewFinancialYear {
            year: 2024,
            start_date: date(2024, 4, 1),
            end_date: date(2025, 3, 31),
            is_active: true,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_holidays_listed_in_date_order() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let fy = seed_financial_year(&repo).await;

        repo.create_holiday(NewHoliday {
            financial_year_id: fy.id,
            name: "Diwali".to_string(),
            date: date(2024, 11, 1),
            is_mandatory: true,
        })
        .await
        .unwrap();
        repo.create_holiday(NewHoliday {
            financial_year_id: fy.id,
            name: "Independence Day".to_string(),
            date: date(2024, 8, 15),
            is_mandatory: true,
        })
        .await
        .unwrap();
        repo.create_holiday(NewHoliday {
            financial_year_id: fy.id,
            name: "Christmas".to_string(),
            date: date(2024, 12, 25),
            is_mandatory: false,
        })
        .await
        .unwrap();

        let holidays = repo.list_holidays_by_year(fy.id).await.unwrap();
        assert_eq!(holidays.len(), 3);
        assert_eq!(holidays[0].name, "Independence Day");
        assert_eq!(holidays[2].name, "Christmas");

        assert_eq!(repo.list_mandatory_holidays(fy.id).await.unwrap().len(), 2);
        assert_eq!(repo.list_optional_holidays(fy.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_holiday_delete_reports_match() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let fy = seed_financial_year(&repo).await;
        let holiday = repo
            .create_holiday(NewHoliday {
                financial_year_id: fy.id,
                name: "Holi".to_string(),
                date: date(2025, 3, 14),
                is_mandatory: true,
            })
            .await
            .unwrap();

        assert!(repo.delete_holiday(holiday.id).await.unwrap());
        assert!(!repo.delete_holiday(holiday.id).await.unwrap());
        assert!(repo.get_holiday(holiday.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_holiday_selections_are_replaced_wholesale() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let fy = seed_financial_year(&repo).await;

        let mut optional_ids = Vec::new();
        for (name, day) in [("Karva Chauth", 20), ("Bhai Dooj", 3)] {
            let holiday = repo
                .create_holiday(NewHoliday {
                    financial_year_id: fy.id,
                    name: name.to_string(),
                    date: date(2024, 11, day),
                    is_mandatory: false,
                })
                .await
                .unwrap();
            optional_ids.push(holiday.id);
        }

        repo.replace_holiday_selections("ravi", fy.id, &optional_ids[..1])
            .await
            .unwrap();
        assert_eq!(repo.selected_holidays("ravi", fy.id).await.unwrap().len(), 1);

        // A second call replaces, not appends.
        repo.replace_holiday_selections("ravi", fy.id, &optional_ids[1..])
            .await
            .unwrap();
        let selected = repo.selected_holidays("ravi", fy.id).await.unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].holiday.id, optional_ids[1]);
    }

    // ==================== User tests ====================

    #[tokio::test]
    async fn test_user_create_get_and_conflict() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let created = repo
            .create_user(NewUser {
                username: "ravi".to_string(),
                hashed_password: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            })
            .await
            .unwrap();

        let fetched = repo.get_user_by_username("ravi").await.unwrap();
        assert_eq!(fetched, Some(created));

        let duplicate = repo
            .create_user(NewUser {
                username: "ravi".to_string(),
                hashed_password: "other".to_string(),
            })
            .await;
        assert!(matches!(
            duplicate,
            Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                ..
            })
        ));
    }
}
