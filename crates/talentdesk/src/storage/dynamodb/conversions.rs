//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and
//! domain records. This is the single serialization boundary for the
//! key-value backend: numbers cross the wire as number attributes through
//! `int_attr`/`num_attr` and their getters, dates and datetimes as ISO-8601
//! strings. All of it is testable without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDate, Utc};

use talentdesk_core::domain::{
    ActivelyWorking, Company, FinancialYear, Holiday, HolidaySelection, Invoice, InvoiceStatus,
    Leave, LeaveBalance, LeaveStatus, LeaveType, ProcessProfile, Profile, ProfileStatus,
    RecordStatus, Requirement, RequirementStatus, Spoc, User,
};
use talentdesk_core::storage::RepositoryError;

type Item = HashMap<String, AttributeValue>;

// ============================================================================
// Attribute builders
// ============================================================================

pub fn int_attr(v: i64) -> AttributeValue {
    AttributeValue::N(v.to_string())
}

pub fn num_attr(v: f64) -> AttributeValue {
    AttributeValue::N(v.to_string())
}

pub fn string_attr(s: impl Into<String>) -> AttributeValue {
    AttributeValue::S(s.into())
}

pub fn bool_attr(b: bool) -> AttributeValue {
    AttributeValue::Bool(b)
}

pub fn date_attr(date: NaiveDate) -> AttributeValue {
    AttributeValue::S(date.format("%Y-%m-%d").to_string())
}

pub fn datetime_attr(dt: DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(dt.to_rfc3339())
}

// ============================================================================
// Attribute getters
// ============================================================================

/// Get a required string attribute.
pub fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get an optional string attribute.
pub fn get_opt_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

/// Get a required integer attribute.
pub fn get_i64(item: &Item, key: &str) -> Result<i64, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))?
        .parse::<i64>()
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid integer {}: {}", key, e)))
}

/// Get an optional integer attribute; absent or non-numeric yields None.
pub fn get_opt_i64(item: &Item, key: &str) -> Option<i64> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|s| s.parse::<i64>().ok())
}

/// Get a required float attribute.
pub fn get_f64(item: &Item, key: &str) -> Result<f64, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))?
        .parse::<f64>()
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid number {}: {}", key, e)))
}

/// Get an optional float attribute; absent or non-numeric yields None.
pub fn get_opt_f64(item: &Item, key: &str) -> Option<f64> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|s| s.parse::<f64>().ok())
}

/// Get a required boolean attribute.
pub fn get_bool(item: &Item, key: &str) -> Result<bool, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {}", key)))
}

/// Get a required date attribute (YYYY-MM-DD format).
pub fn get_date(item: &Item, key: &str) -> Result<NaiveDate, RepositoryError> {
    let s = get_string(item, key)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {}: {}", key, e)))
}

/// Get an optional date attribute.
pub fn get_opt_date(item: &Item, key: &str) -> Result<Option<NaiveDate>, RepositoryError> {
    match get_opt_string(item, key) {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {}: {}", key, e))),
        None => Ok(None),
    }
}

/// Get a required datetime attribute (RFC 3339 format).
pub fn get_datetime(item: &Item, key: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let s = get_string(item, key)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e)))
}

/// Get an optional datetime attribute.
pub fn get_opt_datetime(item: &Item, key: &str) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    match get_opt_string(item, key) {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| RepositoryError::InvalidData(format!("Invalid datetime {}: {}", key, e))),
        None => Ok(None),
    }
}

fn parse_enum<T>(
    value: &str,
    parser: impl Fn(&str) -> Option<T>,
    what: &str,
) -> Result<T, RepositoryError> {
    parser(value).ok_or_else(|| RepositoryError::InvalidData(format!("Unknown {what}: {value}")))
}

// ============================================================================
// Company conversions
// ============================================================================

pub fn company_to_item(company: &Company) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(company.id));
    item.insert("name".to_string(), string_attr(company.name.clone()));
    item.insert("spoc".to_string(), string_attr(company.spoc.clone()));
    item.insert("email_id".to_string(), string_attr(company.email_id.clone()));
    item.insert("status".to_string(), string_attr(company.status.as_str()));
    item.insert(
        "created_date".to_string(),
        datetime_attr(company.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(company.updated_date),
    );
    item
}

pub fn item_to_company(item: &Item) -> Result<Company, RepositoryError> {
    Ok(Company {
        id: get_i64(item, "id")?,
        name: get_string(item, "name")?,
        spoc: get_string(item, "spoc")?,
        email_id: get_string(item, "email_id")?,
        status: parse_enum(&get_string(item, "status")?, RecordStatus::parse, "record status")?,
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

// ============================================================================
// SPOC conversions
// ============================================================================

pub fn spoc_to_item(spoc: &Spoc) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(spoc.id));
    item.insert("company_id".to_string(), int_attr(spoc.company_id));
    item.insert("name".to_string(), string_attr(spoc.name.clone()));
    item.insert("phone".to_string(), string_attr(spoc.phone.clone()));
    item.insert("email_id".to_string(), string_attr(spoc.email_id.clone()));
    if let Some(location) = &spoc.location {
        item.insert("location".to_string(), string_attr(location.clone()));
    }
    item.insert("status".to_string(), string_attr(spoc.status.as_str()));
    item.insert("created_date".to_string(), datetime_attr(spoc.created_date));
    item.insert("updated_date".to_string(), datetime_attr(spoc.updated_date));
    item
}

pub fn item_to_spoc(item: &Item) -> Result<Spoc, RepositoryError> {
    Ok(Spoc {
        id: get_i64(item, "id")?,
        company_id: get_i64(item, "company_id")?,
        name: get_string(item, "name")?,
        phone: get_string(item, "phone")?,
        email_id: get_string(item, "email_id")?,
        location: get_opt_string(item, "location"),
        status: parse_enum(&get_string(item, "status")?, RecordStatus::parse, "record status")?,
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

// ============================================================================
// Requirement conversions
// ============================================================================

pub fn requirement_to_item(requirement: &Requirement) -> Item {
    let mut item = HashMap::new();
    item.insert(
        "requirement_id".to_string(),
        int_attr(requirement.requirement_id),
    );
    item.insert("company_id".to_string(), int_attr(requirement.company_id));
    item.insert("key_skill".to_string(), string_attr(requirement.key_skill.clone()));
    item.insert("jd".to_string(), string_attr(requirement.jd.clone()));
    item.insert("status_id".to_string(), int_attr(requirement.status_id));
    if let Some(recruiter_name) = &requirement.recruiter_name {
        item.insert(
            "recruiter_name".to_string(),
            string_attr(recruiter_name.clone()),
        );
    }
    if let Some(budget) = requirement.budget {
        item.insert("budget".to_string(), num_attr(budget));
    }
    if let Some(date) = requirement.expected_billing_date {
        item.insert("expected_billing_date".to_string(), date_attr(date));
    }
    if let Some(location) = &requirement.location {
        item.insert("location".to_string(), string_attr(location.clone()));
    }
    if let Some(remarks) = &requirement.remarks {
        item.insert("remarks".to_string(), string_attr(remarks.clone()));
    }
    if let Some(ref_id) = &requirement.req_cust_ref_id {
        item.insert("req_cust_ref_id".to_string(), string_attr(ref_id.clone()));
    }
    if let Some(closed_date) = requirement.closed_date {
        item.insert("closed_date".to_string(), datetime_attr(closed_date));
    }
    item.insert(
        "created_date".to_string(),
        datetime_attr(requirement.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(requirement.updated_date),
    );
    item
}

pub fn item_to_requirement(item: &Item) -> Result<Requirement, RepositoryError> {
    Ok(Requirement {
        requirement_id: get_i64(item, "requirement_id")?,
        company_id: get_i64(item, "company_id")?,
        key_skill: get_string(item, "key_skill")?,
        jd: get_string(item, "jd")?,
        status_id: get_i64(item, "status_id")?,
        recruiter_name: get_opt_string(item, "recruiter_name"),
        budget: get_opt_f64(item, "budget"),
        expected_billing_date: get_opt_date(item, "expected_billing_date")?,
        location: get_opt_string(item, "location"),
        remarks: get_opt_string(item, "remarks"),
        req_cust_ref_id: get_opt_string(item, "req_cust_ref_id"),
        closed_date: get_opt_datetime(item, "closed_date")?,
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

pub fn item_to_requirement_status(item: &Item) -> Result<RequirementStatus, RepositoryError> {
    Ok(RequirementStatus {
        id: get_i64(item, "id")?,
        status: get_string(item, "status")?,
    })
}

// ============================================================================
// Profile conversions
// ============================================================================

pub fn profile_to_item(profile: &Profile) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(profile.id));
    item.insert("name".to_string(), string_attr(profile.name.clone()));
    item.insert("email_id".to_string(), string_attr(profile.email_id.clone()));
    item.insert("phone".to_string(), string_attr(profile.phone.clone()));
    item.insert(
        "key_skills".to_string(),
        string_attr(profile.key_skills.clone()),
    );
    if let Some(experience_years) = profile.experience_years {
        item.insert("experience_years".to_string(), num_attr(experience_years));
    }
    if let Some(current_ctc) = profile.current_ctc {
        item.insert("current_ctc".to_string(), num_attr(current_ctc));
    }
    if let Some(expected_ctc) = profile.expected_ctc {
        item.insert("expected_ctc".to_string(), num_attr(expected_ctc));
    }
    if let Some(notice_period) = &profile.notice_period {
        item.insert(
            "notice_period".to_string(),
            string_attr(notice_period.clone()),
        );
    }
    item.insert("status".to_string(), int_attr(profile.status));
    if let Some(remarks) = &profile.remarks {
        item.insert("remarks".to_string(), string_attr(remarks.clone()));
    }
    item.insert(
        "created_date".to_string(),
        datetime_attr(profile.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(profile.updated_date),
    );
    item
}

pub fn item_to_profile(item: &Item) -> Result<Profile, RepositoryError> {
    Ok(Profile {
        id: get_i64(item, "id")?,
        name: get_string(item, "name")?,
        email_id: get_string(item, "email_id")?,
        phone: get_string(item, "phone")?,
        key_skills: get_string(item, "key_skills")?,
        experience_years: get_opt_f64(item, "experience_years"),
        current_ctc: get_opt_f64(item, "current_ctc"),
        expected_ctc: get_opt_f64(item, "expected_ctc"),
        notice_period: get_opt_string(item, "notice_period"),
        status: get_i64(item, "status")?,
        remarks: get_opt_string(item, "remarks"),
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

pub fn item_to_profile_stage(item: &Item) -> Result<ProfileStatus, RepositoryError> {
    Ok(ProfileStatus {
        id: get_i64(item, "id")?,
        stage: get_string(item, "stage")?,
    })
}

// ============================================================================
// Process profile conversions
// ============================================================================

pub fn process_profile_to_item(process_profile: &ProcessProfile) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(process_profile.id));
    item.insert(
        "requirement_id".to_string(),
        int_attr(process_profile.requirement_id),
    );
    if let Some(profile_id) = process_profile.profile_id {
        item.insert("profile_id".to_string(), int_attr(profile_id));
    }
    item.insert(
        "recruiter_name".to_string(),
        string_attr(process_profile.recruiter_name.clone()),
    );
    if let Some(status) = process_profile.status {
        item.insert("status".to_string(), int_attr(status));
    }
    item.insert(
        "actively_working".to_string(),
        string_attr(process_profile.actively_working.as_str()),
    );
    if let Some(remarks) = &process_profile.remarks {
        item.insert("remarks".to_string(), string_attr(remarks.clone()));
    }
    item.insert(
        "created_date".to_string(),
        datetime_attr(process_profile.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(process_profile.updated_date),
    );
    item
}

pub fn item_to_process_profile(item: &Item) -> Result<ProcessProfile, RepositoryError> {
    Ok(ProcessProfile {
        id: get_i64(item, "id")?,
        requirement_id: get_i64(item, "requirement_id")?,
        profile_id: get_opt_i64(item, "profile_id"),
        recruiter_name: get_string(item, "recruiter_name")?,
        status: get_opt_i64(item, "status"),
        actively_working: parse_enum(
            &get_string(item, "actively_working")?,
            ActivelyWorking::parse,
            "actively_working flag",
        )?,
        remarks: get_opt_string(item, "remarks"),
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

// ============================================================================
// Invoice conversions
// ============================================================================

pub fn invoice_to_item(invoice: &Invoice) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(invoice.id));
    item.insert(
        "invoice_number".to_string(),
        string_attr(invoice.invoice_number.clone()),
    );
    if let Some(reference) = &invoice.reference {
        item.insert("reference".to_string(), string_attr(reference.clone()));
    }
    item.insert("company_id".to_string(), int_attr(invoice.company_id));
    if let Some(po_number) = &invoice.po_number {
        item.insert("po_number".to_string(), string_attr(po_number.clone()));
    }
    item.insert("amount".to_string(), num_attr(invoice.amount));
    item.insert("raised_date".to_string(), date_attr(invoice.raised_date));
    item.insert("due_date".to_string(), date_attr(invoice.due_date));
    item.insert("status".to_string(), string_attr(invoice.status.as_str()));
    if let Some(remarks) = &invoice.remarks {
        item.insert("remarks".to_string(), string_attr(remarks.clone()));
    }
    item.insert(
        "created_date".to_string(),
        datetime_attr(invoice.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(invoice.updated_date),
    );
    item
}

pub fn item_to_invoice(item: &Item) -> Result<Invoice, RepositoryError> {
    Ok(Invoice {
        id: get_i64(item, "id")?,
        invoice_number: get_string(item, "invoice_number")?,
        reference: get_opt_string(item, "reference"),
        company_id: get_i64(item, "company_id")?,
        po_number: get_opt_string(item, "po_number"),
        amount: get_f64(item, "amount")?,
        raised_date: get_date(item, "raised_date")?,
        due_date: get_date(item, "due_date")?,
        status: parse_enum(&get_string(item, "status")?, InvoiceStatus::parse, "invoice status")?,
        remarks: get_opt_string(item, "remarks"),
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

// ============================================================================
// Leave conversions
// ============================================================================

pub fn leave_to_item(leave: &Leave) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(leave.id));
    item.insert("username".to_string(), string_attr(leave.username.clone()));
    item.insert(
        "leave_type".to_string(),
        string_attr(leave.leave_type.as_str()),
    );
    item.insert("start_date".to_string(), date_attr(leave.start_date));
    item.insert("end_date".to_string(), date_attr(leave.end_date));
    item.insert("days".to_string(), int_attr(leave.days));
    item.insert("reason".to_string(), string_attr(leave.reason.clone()));
    item.insert("status".to_string(), string_attr(leave.status.as_str()));
    if let Some(comments) = &leave.approver_comments {
        item.insert(
            "approver_comments".to_string(),
            string_attr(comments.clone()),
        );
    }
    item.insert("created_date".to_string(), datetime_attr(leave.created_date));
    item.insert("updated_date".to_string(), datetime_attr(leave.updated_date));
    item
}

pub fn item_to_leave(item: &Item) -> Result<Leave, RepositoryError> {
    Ok(Leave {
        id: get_i64(item, "id")?,
        username: get_string(item, "username")?,
        leave_type: parse_enum(&get_string(item, "leave_type")?, LeaveType::parse, "leave type")?,
        start_date: get_date(item, "start_date")?,
        end_date: get_date(item, "end_date")?,
        days: get_i64(item, "days")?,
        reason: get_string(item, "reason")?,
        status: parse_enum(&get_string(item, "status")?, LeaveStatus::parse, "leave status")?,
        approver_comments: get_opt_string(item, "approver_comments"),
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

pub fn leave_balance_to_item(balance: &LeaveBalance) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(balance.id));
    item.insert("username".to_string(), string_attr(balance.username.clone()));
    item.insert("annual_leave".to_string(), int_attr(balance.annual_leave));
    item.insert("sick_leave".to_string(), int_attr(balance.sick_leave));
    item.insert("casual_leave".to_string(), int_attr(balance.casual_leave));
    item.insert("year".to_string(), int_attr(balance.year as i64));
    item.insert(
        "created_date".to_string(),
        datetime_attr(balance.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(balance.updated_date),
    );
    item
}

pub fn item_to_leave_balance(item: &Item) -> Result<LeaveBalance, RepositoryError> {
    Ok(LeaveBalance {
        id: get_i64(item, "id")?,
        username: get_string(item, "username")?,
        annual_leave: get_i64(item, "annual_leave")?,
        sick_leave: get_i64(item, "sick_leave")?,
        casual_leave: get_i64(item, "casual_leave")?,
        year: get_i64(item, "year")? as i32,
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

// ============================================================================
// Financial year conversions
// ============================================================================

pub fn financial_year_to_item(financial_year: &FinancialYear) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(financial_year.id));
    item.insert("year".to_string(), int_attr(financial_year.year as i64));
    item.insert(
        "start_date".to_string(),
        date_attr(financial_year.start_date),
    );
    item.insert("end_date".to_string(), date_attr(financial_year.end_date));
    item.insert("is_active".to_string(), bool_attr(financial_year.is_active));
    item.insert(
        "created_date".to_string(),
        datetime_attr(financial_year.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(financial_year.updated_date),
    );
    item
}

pub fn item_to_financial_year(item: &Item) -> Result<FinancialYear, RepositoryError> {
    Ok(FinancialYear {
        id: get_i64(item, "id")?,
        year: get_i64(item, "year")? as i32,
        start_date: get_date(item, "start_date")?,
        end_date: get_date(item, "end_date")?,
        is_active: get_bool(item, "is_active")?,
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

// ============================================================================
// Holiday conversions
// ============================================================================

pub fn holiday_to_item(holiday: &Holiday) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(holiday.id));
    item.insert(
        "financial_year_id".to_string(),
        int_attr(holiday.financial_year_id),
    );
    item.insert("name".to_string(), string_attr(holiday.name.clone()));
    item.insert("date".to_string(), date_attr(holiday.date));
    item.insert("is_mandatory".to_string(), bool_attr(holiday.is_mandatory));
    item.insert(
        "created_date".to_string(),
        datetime_attr(holiday.created_date),
    );
    item.insert(
        "updated_date".to_string(),
        datetime_attr(holiday.updated_date),
    );
    item
}

pub fn item_to_holiday(item: &Item) -> Result<Holiday, RepositoryError> {
    Ok(Holiday {
        id: get_i64(item, "id")?,
        financial_year_id: get_i64(item, "financial_year_id")?,
        name: get_string(item, "name")?,
        date: get_date(item, "date")?,
        is_mandatory: get_bool(item, "is_mandatory")?,
        created_date: get_datetime(item, "created_date")?,
        updated_date: get_datetime(item, "updated_date")?,
    })
}

pub fn holiday_selection_to_item(selection: &HolidaySelection) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(selection.id));
    item.insert(
        "username".to_string(),
        string_attr(selection.username.clone()),
    );
    item.insert("holiday_id".to_string(), int_attr(selection.holiday_id));
    item.insert(
        "financial_year_id".to_string(),
        int_attr(selection.financial_year_id),
    );
    item.insert(
        "created_date".to_string(),
        datetime_attr(selection.created_date),
    );
    item
}

pub fn item_to_holiday_selection(item: &Item) -> Result<HolidaySelection, RepositoryError> {
    Ok(HolidaySelection {
        id: get_i64(item, "id")?,
        username: get_string(item, "username")?,
        holiday_id: get_i64(item, "holiday_id")?,
        financial_year_id: get_i64(item, "financial_year_id")?,
        created_date: get_datetime(item, "created_date")?,
    })
}

// ============================================================================
// User conversions
// ============================================================================

pub fn user_to_item(user: &User) -> Item {
    let mut item = HashMap::new();
    item.insert("id".to_string(), int_attr(user.id));
    item.insert("username".to_string(), string_attr(user.username.clone()));
    item.insert(
        "hashed_password".to_string(),
        string_attr(user.hashed_password.clone()),
    );
    item
}

pub fn item_to_user(item: &Item) -> Result<User, RepositoryError> {
    Ok(User {
        id: get_i64(item, "id")?,
        username: get_string(item, "username")?,
        hashed_password: get_string(item, "hashed_password")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    fn sample_company() -> Company {
        Company {
            id: 7,
            name: "Acme Engineering".to_string(),
            spoc: "Asha Rao".to_string(),
            email_id: "asha@acme.example".to_string(),
            status: RecordStatus::Active,
            created_date: ts(),
            updated_date: ts(),
        }
    }

    fn sample_requirement() -> Requirement {
        Requirement {
            requirement_id: 12,
            company_id: 7,
            key_skill: "Rust".to_string(),
            jd: "Backend engineer for the billing platform".to_string(),
            status_id: 1,
            recruiter_name: Some("priya".to_string()),
            budget: Some(2_400_000.5),
            expected_billing_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            location: Some("Pune".to_string()),
            remarks: None,
            req_cust_ref_id: Some("ACME-17".to_string()),
            closed_date: None,
            created_date: ts(),
            updated_date: ts(),
        }
    }

    #[test]
    fn test_company_round_trip() {
        let company = sample_company();
        let item = company_to_item(&company);
        assert_eq!(item_to_company(&item).unwrap(), company);
    }

    #[test]
    fn test_requirement_round_trip_preserves_optionals() {
        let requirement = sample_requirement();
        let item = requirement_to_item(&requirement);

        // Absent optionals are not written at all.
        assert!(!item.contains_key("remarks"));
        assert!(!item.contains_key("closed_date"));

        assert_eq!(item_to_requirement(&item).unwrap(), requirement);
    }

    #[test]
    fn test_numeric_fields_cross_as_number_attributes() {
        let requirement = sample_requirement();
        let item = requirement_to_item(&requirement);

        assert_eq!(
            item.get("budget"),
            Some(&AttributeValue::N("2400000.5".to_string()))
        );
        assert_eq!(
            item.get("requirement_id"),
            Some(&AttributeValue::N("12".to_string()))
        );
    }

    #[test]
    fn test_process_profile_round_trip_without_profile() {
        let row = ProcessProfile {
            id: 3,
            requirement_id: 12,
            profile_id: None,
            recruiter_name: "priya".to_string(),
            status: None,
            actively_working: ActivelyWorking::Yes,
            remarks: None,
            created_date: ts(),
            updated_date: ts(),
        };

        let item = process_profile_to_item(&row);
        assert!(!item.contains_key("profile_id"));
        assert_eq!(item_to_process_profile(&item).unwrap(), row);
    }

    #[test]
    fn test_invoice_round_trip() {
        let invoice = Invoice {
            id: 4,
            invoice_number: "INV-2024-0004".to_string(),
            reference: Some("Q1 retainer".to_string()),
            company_id: 7,
            po_number: None,
            amount: 125000.75,
            raised_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            status: InvoiceStatus::Pending,
            remarks: None,
            created_date: ts(),
            updated_date: ts(),
        };

        let item = invoice_to_item(&invoice);
        assert_eq!(item_to_invoice(&item).unwrap(), invoice);
    }

    #[test]
    fn test_leave_round_trip() {
        let leave = Leave {
            id: 9,
            username: "ravi".to_string(),
            leave_type: LeaveType::Sick,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
            days: 3,
            reason: "Flu".to_string(),
            status: LeaveStatus::Pending,
            approver_comments: None,
            created_date: ts(),
            updated_date: ts(),
        };

        let item = leave_to_item(&leave);
        assert_eq!(item_to_leave(&item).unwrap(), leave);
    }

    #[test]
    fn test_financial_year_round_trip() {
        let financial_year = FinancialYear {
            id: 1,
            year: 2024,
            start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            is_active: true,
            created_date: ts(),
            updated_date: ts(),
        };

        let item = financial_year_to_item(&financial_year);
        assert_eq!(item.get("is_active"), Some(&AttributeValue::Bool(true)));
        assert_eq!(item_to_financial_year(&item).unwrap(), financial_year);
    }

    #[test]
    fn test_missing_required_field_is_invalid_data() {
        let mut item = company_to_item(&sample_company());
        item.remove("email_id");

        assert!(matches!(
            item_to_company(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_unknown_enum_value_is_invalid_data() {
        let mut item = company_to_item(&sample_company());
        item.insert("status".to_string(), string_attr("archived"));

        assert!(matches!(
            item_to_company(&item),
            Err(RepositoryError::InvalidData(_))
        ));
    }
}
