//! Repository contracts, one trait per sub-adapter.
//!
//! Every trait is implemented twice, once per storage backend; callers only
//! ever see these traits through the backend selector's façade. Shared
//! conventions:
//!
//! - `create_*` returns the full record including the generated key and
//!   `created_date`/`updated_date` timestamps.
//! - Point reads return `Ok(None)` for a miss, never an error.
//! - `update_*` applies only the populated fields of the update struct,
//!   always re-stamps `updated_date`, and returns whether a record matched.
//!   Updates are last-writer-wins on both backends; concurrent writers to
//!   the same record are not detected.

use async_trait::async_trait;

use crate::domain::{
    ActivelyWorking, Company, CompanyUpdate, FinancialYear, FinancialYearUpdate, Holiday,
    HolidayUpdate, Invoice, InvoiceUpdate, Leave, LeaveBalance, LeaveBalanceUpdate, LeaveUpdate,
    NewCompany, NewFinancialYear, NewHoliday, NewInvoice, NewLeave, NewProcessProfile, NewProfile,
    NewRequirement, NewSpoc, NewUser, PipelineProfile, PlacementActivity, ProcessProfile, Profile,
    ProfileStatus, ProfileUpdate, Requirement, RequirementStatus, RequirementUpdate,
    SelectedHoliday, Spoc, SpocUpdate, User,
};

use super::{DateRange, Result};

/// Repository for client companies.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Creates a company. Names are unique case-insensitively; a duplicate
    /// is rejected with `AlreadyExists` before the insert is attempted.
    async fn create_company(&self, company: NewCompany) -> Result<Company>;

    /// Gets a company by its ID.
    async fn get_company(&self, id: i64) -> Result<Option<Company>>;

    /// Gets a company by name, matched case-insensitively.
    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>>;

    /// Lists all companies.
    async fn list_companies(&self) -> Result<Vec<Company>>;

    /// Lists companies whose status is active.
    async fn list_active_companies(&self) -> Result<Vec<Company>>;

    /// Applies the populated fields, returns whether a company matched.
    async fn update_company(&self, id: i64, update: CompanyUpdate) -> Result<bool>;
}

/// Repository for company points of contact.
#[async_trait]
pub trait SpocRepository: Send + Sync {
    async fn create_spoc(&self, spoc: NewSpoc) -> Result<Spoc>;

    async fn get_spoc(&self, id: i64) -> Result<Option<Spoc>>;

    async fn list_spocs(&self) -> Result<Vec<Spoc>>;

    async fn list_spocs_by_company(&self, company_id: i64) -> Result<Vec<Spoc>>;

    async fn update_spoc(&self, id: i64, update: SpocUpdate) -> Result<bool>;
}

/// Repository for requirements (open positions).
#[async_trait]
pub trait RequirementRepository: Send + Sync {
    async fn create_requirement(&self, requirement: NewRequirement) -> Result<Requirement>;

    async fn get_requirement(&self, requirement_id: i64) -> Result<Option<Requirement>>;

    async fn list_requirements(&self) -> Result<Vec<Requirement>>;

    /// Applies the populated fields. When `status_id` moves into the
    /// terminal set, `closed_date` is stamped; when it moves back out, it is
    /// cleared.
    async fn update_requirement(
        &self,
        requirement_id: i64,
        update: RequirementUpdate,
    ) -> Result<bool>;

    /// Lists the requirement status lookup table.
    async fn list_requirement_statuses(&self) -> Result<Vec<RequirementStatus>>;

    /// Lists a company's requirements whose status is open.
    async fn list_open_requirements_by_company(&self, company_id: i64)
        -> Result<Vec<Requirement>>;

    /// Lists a company's open requirements that the given recruiter is
    /// assigned to through the process-profile pipeline.
    async fn list_open_requirements_by_company_and_recruiter(
        &self,
        company_id: i64,
        recruiter_name: &str,
    ) -> Result<Vec<Requirement>>;
}

/// Repository for candidate profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create_profile(&self, profile: NewProfile) -> Result<Profile>;

    async fn get_profile(&self, id: i64) -> Result<Option<Profile>>;

    async fn list_profiles(&self) -> Result<Vec<Profile>>;

    async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<bool>;

    /// Lists the status-to-stage lookup table.
    async fn list_profile_stages(&self) -> Result<Vec<ProfileStatus>>;

    /// Profiles created inside the range, joined to their pipeline context
    /// (recruiter, requirement, company name). Optionally filtered to one
    /// recruiter.
    async fn list_placements_by_date_range(
        &self,
        range: DateRange,
        recruiter_name: Option<&str>,
    ) -> Result<Vec<PlacementActivity>>;
}

/// Repository for the requirement/profile pipeline.
#[async_trait]
pub trait ProcessProfileRepository: Send + Sync {
    /// Creates the recruiter's pipeline row for a requirement, reusing an
    /// existing (requirement, recruiter) row if one exists.
    async fn create_process_profile(
        &self,
        process_profile: NewProcessProfile,
    ) -> Result<ProcessProfile>;

    /// Upserts by (requirement, profile): merges into the matching row, or
    /// claims the requirement's unassigned placeholder row, or inserts
    /// fresh.
    async fn upsert_process_profile(
        &self,
        process_profile: NewProcessProfile,
    ) -> Result<ProcessProfile>;

    /// Reassigns every pipeline row of a requirement to a recruiter.
    async fn assign_recruiter(&self, requirement_id: i64, recruiter_name: &str) -> Result<bool>;

    /// Attaches a profile to a requirement's pipeline rows.
    async fn assign_profile(&self, requirement_id: i64, profile_id: i64) -> Result<bool>;

    /// Flags whether the recruiter is actively working the given pairing.
    async fn set_actively_working(
        &self,
        requirement_id: i64,
        profile_id: i64,
        actively_working: ActivelyWorking,
    ) -> Result<bool>;

    /// The enrichment join: pipeline rows for a requirement, each joined to
    /// its profile and annotated with the stage label from the lookup
    /// table ("Unknown" when the status has no entry). Rows whose profile
    /// is absent are dropped, not errors.
    async fn pipeline_by_requirement(&self, requirement_id: i64) -> Result<Vec<PipelineProfile>>;

    /// Pipeline rows for a requirement that are actively being worked.
    async fn list_active_by_requirement(&self, requirement_id: i64)
        -> Result<Vec<ProcessProfile>>;
}

/// Repository for invoices.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Creates an invoice. Invoice numbers are unique; a duplicate is
    /// rejected with `AlreadyExists` before the insert is attempted.
    async fn create_invoice(&self, invoice: NewInvoice) -> Result<Invoice>;

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>>;

    async fn list_invoices_by_company(&self, company_id: i64) -> Result<Vec<Invoice>>;

    async fn update_invoice(&self, id: i64, update: InvoiceUpdate) -> Result<bool>;
}

/// Repository for leave requests and balances.
#[async_trait]
pub trait LeaveRepository: Send + Sync {
    async fn create_leave(&self, leave: NewLeave) -> Result<Leave>;

    async fn get_leave(&self, id: i64) -> Result<Option<Leave>>;

    async fn list_leaves(&self) -> Result<Vec<Leave>>;

    async fn list_leaves_by_user(&self, username: &str) -> Result<Vec<Leave>>;

    async fn list_pending_leaves(&self) -> Result<Vec<Leave>>;

    async fn update_leave(&self, id: i64, update: LeaveUpdate) -> Result<bool>;

    /// Creates a zeroed balance record for a user.
    async fn create_leave_balance(&self, username: &str) -> Result<LeaveBalance>;

    async fn get_leave_balance(&self, username: &str) -> Result<Option<LeaveBalance>>;

    async fn update_leave_balance(
        &self,
        username: &str,
        update: LeaveBalanceUpdate,
    ) -> Result<bool>;
}

/// Repository for financial years.
#[async_trait]
pub trait FinancialYearRepository: Send + Sync {
    /// Creates a financial year. Years are unique; when created active, all
    /// other years are deactivated first.
    async fn create_financial_year(&self, year: NewFinancialYear) -> Result<FinancialYear>;

    async fn get_financial_year(&self, id: i64) -> Result<Option<FinancialYear>>;

    async fn list_financial_years(&self) -> Result<Vec<FinancialYear>>;

    async fn get_active_financial_year(&self) -> Result<Option<FinancialYear>>;

    /// Deactivates every year, then activates the given one. Exactly one
    /// year is active afterwards; returns whether the target existed.
    async fn activate_financial_year(&self, id: i64) -> Result<bool>;

    async fn update_financial_year(&self, id: i64, update: FinancialYearUpdate) -> Result<bool>;
}

/// Repository for holiday calendars and per-user selections.
#[async_trait]
pub trait HolidayRepository: Send + Sync {
    async fn create_holiday(&self, holiday: NewHoliday) -> Result<Holiday>;

    async fn get_holiday(&self, id: i64) -> Result<Option<Holiday>>;

    /// Holidays of a financial year, date-ordered.
    async fn list_holidays_by_year(&self, financial_year_id: i64) -> Result<Vec<Holiday>>;

    async fn list_mandatory_holidays(&self, financial_year_id: i64) -> Result<Vec<Holiday>>;

    async fn list_optional_holidays(&self, financial_year_id: i64) -> Result<Vec<Holiday>>;

    async fn update_holiday(&self, id: i64, update: HolidayUpdate) -> Result<bool>;

    /// Holidays are the only hard-deletable records.
    async fn delete_holiday(&self, id: i64) -> Result<bool>;

    /// Replaces the user's optional-holiday selections for a financial year
    /// wholesale.
    async fn replace_holiday_selections(
        &self,
        username: &str,
        financial_year_id: i64,
        holiday_ids: &[i64],
    ) -> Result<()>;

    /// The user's selections joined to their holidays; selections whose
    /// holiday no longer exists are dropped.
    async fn selected_holidays(
        &self,
        username: &str,
        financial_year_id: i64,
    ) -> Result<Vec<SelectedHoliday>>;
}

/// Repository for application accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user. Usernames are unique; a duplicate is rejected with
    /// `AlreadyExists` before the insert is attempted.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;
}
