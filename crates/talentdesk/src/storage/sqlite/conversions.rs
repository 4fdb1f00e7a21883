//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain records,
//! plus the `SetClause` builder that assembles partial UPDATE statements.
//! These are testable in isolation without database access.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

use talentdesk_core::domain::{
    ActivelyWorking, Company, FinancialYear, Holiday, Invoice, InvoiceStatus, Leave, LeaveBalance,
    LeaveStatus, LeaveType, PipelineProfile, PlacementActivity, ProcessProfile, Profile,
    ProfileStatus, RecordStatus, Requirement, RequirementStatus, SelectedHoliday, Spoc, User,
};

// ============================================================================
// Row conversions
// ============================================================================

/// Expected columns: id, username, hashed_password
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        hashed_password: row.get(2)?,
    })
}

/// Expected columns: id, name, spoc, email_id, status, created_date, updated_date
pub fn row_to_company(row: &Row) -> rusqlite::Result<Company> {
    let status: String = row.get(4)?;
    let created_date: String = row.get(5)?;
    let updated_date: String = row.get(6)?;

    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        spoc: row.get(2)?,
        email_id: row.get(3)?,
        status: parse_record_status(&status)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, company_id, name, phone, email_id, location, status,
/// created_date, updated_date
pub fn row_to_spoc(row: &Row) -> rusqlite::Result<Spoc> {
    let status: String = row.get(6)?;
    let created_date: String = row.get(7)?;
    let updated_date: String = row.get(8)?;

    Ok(Spoc {
        id: row.get(0)?,
        company_id: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email_id: row.get(4)?,
        location: row.get(5)?,
        status: parse_record_status(&status)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: requirement_id, company_id, key_skill, jd, status_id,
/// recruiter_name, budget, expected_billing_date, location, remarks,
/// req_cust_ref_id, closed_date, created_date, updated_date
pub fn row_to_requirement(row: &Row) -> rusqlite::Result<Requirement> {
    let expected_billing_date: Option<String> = row.get(7)?;
    let closed_date: Option<String> = row.get(11)?;
    let created_date: String = row.get(12)?;
    let updated_date: String = row.get(13)?;

    Ok(Requirement {
        requirement_id: row.get(0)?,
        company_id: row.get(1)?,
        key_skill: row.get(2)?,
        jd: row.get(3)?,
        status_id: row.get(4)?,
        recruiter_name: row.get(5)?,
        budget: row.get(6)?,
        expected_billing_date: expected_billing_date.as_deref().map(parse_date).transpose()?,
        location: row.get(8)?,
        remarks: row.get(9)?,
        req_cust_ref_id: row.get(10)?,
        closed_date: closed_date.as_deref().map(parse_datetime).transpose()?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, status
pub fn row_to_requirement_status(row: &Row) -> rusqlite::Result<RequirementStatus> {
    Ok(RequirementStatus {
        id: row.get(0)?,
        status: row.get(1)?,
    })
}

/// Expected columns: id, name, email_id, phone, key_skills, experience_years,
/// current_ctc, expected_ctc, notice_period, status, remarks, created_date,
/// updated_date
pub fn row_to_profile(row: &Row) -> rusqlite::Result<Profile> {
    let created_date: String = row.get(11)?;
    let updated_date: String = row.get(12)?;

    Ok(Profile {
        id: row.get(0)?,
        name: row.get(1)?,
        email_id: row.get(2)?,
        phone: row.get(3)?,
        key_skills: row.get(4)?,
        experience_years: row.get(5)?,
        current_ctc: row.get(6)?,
        expected_ctc: row.get(7)?,
        notice_period: row.get(8)?,
        status: row.get(9)?,
        remarks: row.get(10)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, stage
pub fn row_to_profile_stage(row: &Row) -> rusqlite::Result<ProfileStatus> {
    Ok(ProfileStatus {
        id: row.get(0)?,
        stage: row.get(1)?,
    })
}

/// Expected columns: id, requirement_id, profile_id, recruiter_name, status,
/// actively_working, remarks, created_date, updated_date
pub fn row_to_process_profile(row: &Row) -> rusqlite::Result<ProcessProfile> {
    let actively_working: String = row.get(5)?;
    let created_date: String = row.get(7)?;
    let updated_date: String = row.get(8)?;

    Ok(ProcessProfile {
        id: row.get(0)?,
        requirement_id: row.get(1)?,
        profile_id: row.get(2)?,
        recruiter_name: row.get(3)?,
        status: row.get(4)?,
        actively_working: parse_actively_working(&actively_working)?,
        remarks: row.get(6)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Convert a row of the pipeline join to a PipelineProfile.
///
/// Expected columns: pp.id, pp.requirement_id, pp.recruiter_name,
/// pp.actively_working, then the full profile column set, then the stage.
pub fn row_to_pipeline_profile(row: &Row) -> rusqlite::Result<PipelineProfile> {
    let actively_working: String = row.get(3)?;
    let profile_created: String = row.get(15)?;
    let profile_updated: String = row.get(16)?;

    let profile = Profile {
        id: row.get(4)?,
        name: row.get(5)?,
        email_id: row.get(6)?,
        phone: row.get(7)?,
        key_skills: row.get(8)?,
        experience_years: row.get(9)?,
        current_ctc: row.get(10)?,
        expected_ctc: row.get(11)?,
        notice_period: row.get(12)?,
        status: row.get(13)?,
        remarks: row.get(14)?,
        created_date: parse_datetime(&profile_created)?,
        updated_date: parse_datetime(&profile_updated)?,
    };

    Ok(PipelineProfile {
        id: row.get(0)?,
        requirement_id: row.get(1)?,
        recruiter_name: row.get(2)?,
        actively_working: parse_actively_working(&actively_working)?,
        profile,
        stage: row.get(17)?,
    })
}

/// Expected columns: p.id, p.status, p.name, pp.recruiter_name,
/// pp.requirement_id, c.name
pub fn row_to_placement_activity(row: &Row) -> rusqlite::Result<PlacementActivity> {
    Ok(PlacementActivity {
        profile_id: row.get(0)?,
        status: row.get(1)?,
        name: row.get(2)?,
        recruiter_name: row.get(3)?,
        requirement_id: row.get(4)?,
        company_name: row.get(5)?,
    })
}

/// Expected columns: id, invoice_number, reference, company_id, po_number,
/// amount, raised_date, due_date, status, remarks, created_date, updated_date
pub fn row_to_invoice(row: &Row) -> rusqlite::Result<Invoice> {
    let raised_date: String = row.get(6)?;
    let due_date: String = row.get(7)?;
    let status: String = row.get(8)?;
    let created_date: String = row.get(10)?;
    let updated_date: String = row.get(11)?;

    Ok(Invoice {
        id: row.get(0)?,
        invoice_number: row.get(1)?,
        reference: row.get(2)?,
        company_id: row.get(3)?,
        po_number: row.get(4)?,
        amount: row.get(5)?,
        raised_date: parse_date(&raised_date)?,
        due_date: parse_date(&due_date)?,
        status: parse_invoice_status(&status)?,
        remarks: row.get(9)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, username, leave_type, start_date, end_date, days,
/// reason, status, approver_comments, created_date, updated_date
pub fn row_to_leave(row: &Row) -> rusqlite::Result<Leave> {
    let leave_type: String = row.get(2)?;
    let start_date: String = row.get(3)?;
    let end_date: String = row.get(4)?;
    let status: String = row.get(7)?;
    let created_date: String = row.get(9)?;
    let updated_date: String = row.get(10)?;

    Ok(Leave {
        id: row.get(0)?,
        username: row.get(1)?,
        leave_type: parse_leave_type(&leave_type)?,
        start_date: parse_date(&start_date)?,
        end_date: parse_date(&end_date)?,
        days: row.get(5)?,
        reason: row.get(6)?,
        status: parse_leave_status(&status)?,
        approver_comments: row.get(8)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, username, annual_leave, sick_leave, casual_leave,
/// year, created_date, updated_date
pub fn row_to_leave_balance(row: &Row) -> rusqlite::Result<LeaveBalance> {
    let created_date: String = row.get(6)?;
    let updated_date: String = row.get(7)?;

    Ok(LeaveBalance {
        id: row.get(0)?,
        username: row.get(1)?,
        annual_leave: row.get(2)?,
        sick_leave: row.get(3)?,
        casual_leave: row.get(4)?,
        year: row.get(5)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, year, start_date, end_date, is_active, created_date,
/// updated_date
pub fn row_to_financial_year(row: &Row) -> rusqlite::Result<FinancialYear> {
    let start_date: String = row.get(2)?;
    let end_date: String = row.get(3)?;
    let created_date: String = row.get(5)?;
    let updated_date: String = row.get(6)?;

    Ok(FinancialYear {
        id: row.get(0)?,
        year: row.get(1)?,
        start_date: parse_date(&start_date)?,
        end_date: parse_date(&end_date)?,
        is_active: row.get(4)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Expected columns: id, financial_year_id, name, date, is_mandatory,
/// created_date, updated_date
pub fn row_to_holiday(row: &Row) -> rusqlite::Result<Holiday> {
    let date: String = row.get(3)?;
    let created_date: String = row.get(5)?;
    let updated_date: String = row.get(6)?;

    Ok(Holiday {
        id: row.get(0)?,
        financial_year_id: row.get(1)?,
        name: row.get(2)?,
        date: parse_date(&date)?,
        is_mandatory: row.get(4)?,
        created_date: parse_datetime(&created_date)?,
        updated_date: parse_datetime(&updated_date)?,
    })
}

/// Convert a row of the selections join to a SelectedHoliday.
///
/// Expected columns: the full holiday column set, then the selection's
/// created_date.
pub fn row_to_selected_holiday(row: &Row) -> rusqlite::Result<SelectedHoliday> {
    let selection_date: String = row.get(7)?;

    Ok(SelectedHoliday {
        holiday: row_to_holiday(row)?,
        selection_date: parse_datetime(&selection_date)?,
    })
}

// ============================================================================
// Enum parsing
// ============================================================================

fn parse_record_status(s: &str) -> rusqlite::Result<RecordStatus> {
    RecordStatus::parse(s).ok_or_else(|| conversion_error(format!("Unknown record status: {s}")))
}

fn parse_actively_working(s: &str) -> rusqlite::Result<ActivelyWorking> {
    ActivelyWorking::parse(s)
        .ok_or_else(|| conversion_error(format!("Unknown actively_working flag: {s}")))
}

fn parse_invoice_status(s: &str) -> rusqlite::Result<InvoiceStatus> {
    InvoiceStatus::parse(s).ok_or_else(|| conversion_error(format!("Unknown invoice status: {s}")))
}

fn parse_leave_type(s: &str) -> rusqlite::Result<LeaveType> {
    LeaveType::parse(s).ok_or_else(|| conversion_error(format!("Unknown leave type: {s}")))
}

fn parse_leave_status(s: &str) -> rusqlite::Result<LeaveStatus> {
    LeaveStatus::parse(s).ok_or_else(|| conversion_error(format!("Unknown leave status: {s}")))
}

fn conversion_error(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

// ============================================================================
// Date helpers
// ============================================================================

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ============================================================================
// Partial update assembly
// ============================================================================

/// Builder for the SET fragment of a partial UPDATE.
///
/// Collects only the populated fields of an update struct, then renders one
/// `UPDATE <table> SET a = ?1, b = ?2 WHERE <key> = ?n` statement with its
/// positional parameters. Callers stamp `updated_date` through the builder
/// like any other column, so every update refreshes it.
#[derive(Debug, Default)]
pub struct SetClause {
    assignments: Vec<String>,
    params: Vec<Value>,
}

impl SetClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column assignment.
    pub fn push(&mut self, column: &str, value: Value) {
        self.params.push(value);
        self.assignments
            .push(format!("{} = ?{}", column, self.params.len()));
    }

    /// Add a column assignment when the value is present.
    pub fn push_opt(&mut self, column: &str, value: Option<Value>) {
        if let Some(value) = value {
            self.push(column, value);
        }
    }

    /// Render the UPDATE statement and its parameters, keyed on `key_column`.
    pub fn into_update(mut self, table: &str, key_column: &str, key: Value) -> (String, Vec<Value>) {
        self.params.push(key);
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            table,
            self.assignments.join(", "),
            key_column,
            self.params.len()
        );
        (sql, self.params)
    }
}

/// Owned text parameter.
pub fn text(s: impl Into<String>) -> Value {
    Value::Text(s.into())
}

/// Owned integer parameter.
pub fn integer(v: i64) -> Value {
    Value::Integer(v)
}

/// Owned real parameter.
pub fn real(v: f64) -> Value {
    Value::Real(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_date(&format_date(&date)).unwrap(), date);
    }

    #[test]
    fn test_format_and_parse_datetime_round_trip() {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:00.250+00:00")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_datetime(&format_datetime(&dt)).unwrap(), dt);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("15/01/2024").is_err());
    }

    #[test]
    fn test_parse_enum_rejects_unknown_values() {
        assert!(parse_record_status("archived").is_err());
        assert!(parse_leave_type("maternity").is_err());
        assert!(parse_invoice_status("written-off").is_err());
    }

    #[test]
    fn test_set_clause_numbers_placeholders_in_order() {
        let mut set = SetClause::new();
        set.push("status", text("inactive"));
        set.push("updated_date", text("2024-01-15T10:30:00+00:00"));

        let (sql, params) = set.into_update("companies", "id", integer(7));

        assert_eq!(
            sql,
            "UPDATE companies SET status = ?1, updated_date = ?2 WHERE id = ?3"
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[2], Value::Integer(7));
    }

    #[test]
    fn test_set_clause_skips_absent_fields() {
        let mut set = SetClause::new();
        set.push_opt("name", None);
        set.push_opt("status", Some(text("inactive")));
        set.push("updated_date", text("2024-01-15T10:30:00+00:00"));

        let (sql, params) = set.into_update("companies", "id", integer(1));

        assert!(!sql.contains("name ="));
        assert!(sql.contains("status = ?1"));
        assert_eq!(params.len(), 3);
    }
}
