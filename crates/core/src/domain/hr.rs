use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Category of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Casual,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Casual => "casual",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "annual" => Some(LeaveType::Annual),
            "sick" => Some(LeaveType::Sick),
            "casual" => Some(LeaveType::Casual),
            _ => None,
        }
    }
}

/// Approval state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LeaveStatus::Pending),
            "approved" => Some(LeaveStatus::Approved),
            "rejected" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }
}

/// A leave request filed by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leave {
    pub id: i64,
    pub username: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Working days covered, computed by the caller from the date range.
    pub days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub approver_comments: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLeave {
    pub username: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: String,
}

/// Partial update for a leave request. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveUpdate {
    pub status: Option<LeaveStatus>,
    pub approver_comments: Option<String>,
}

impl LeaveUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.approver_comments.is_none()
    }
}

/// Per-user leave counters, one record per username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub id: i64,
    pub username: String,
    pub annual_leave: i64,
    pub sick_leave: i64,
    pub casual_leave: i64,
    pub year: i32,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Partial update for a leave balance. `None` leaves the counter unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalanceUpdate {
    pub annual_leave: Option<i64>,
    pub sick_leave: Option<i64>,
    pub casual_leave: Option<i64>,
    pub year: Option<i32>,
}

impl LeaveBalanceUpdate {
    pub fn is_empty(&self) -> bool {
        self.annual_leave.is_none()
            && self.sick_leave.is_none()
            && self.casual_leave.is_none()
            && self.year.is_none()
    }
}

/// An April-to-March financial year. At most one may be active at a time;
/// the repositories enforce this with a deactivate-then-activate sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialYear {
    pub id: i64,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFinancialYear {
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

/// Partial update for a financial year. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialYearUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FinancialYearUpdate {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

/// A holiday in a financial year's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub id: i64,
    pub financial_year_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub is_mandatory: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHoliday {
    pub financial_year_id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub is_mandatory: bool,
}

/// Partial update for a holiday. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_mandatory: Option<bool>,
}

impl HolidayUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.is_mandatory.is_none()
    }
}

/// One user's pick of an optional holiday for a financial year.
///
/// Selections are replaced wholesale per (username, financial year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidaySelection {
    pub id: i64,
    pub username: String,
    pub holiday_id: i64,
    pub financial_year_id: i64,
    pub created_date: DateTime<Utc>,
}

/// A selected holiday joined to its calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedHoliday {
    pub holiday: Holiday,
    pub selection_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_type_round_trip() {
        for leave_type in [LeaveType::Annual, LeaveType::Sick, LeaveType::Casual] {
            assert_eq!(LeaveType::parse(leave_type.as_str()), Some(leave_type));
        }
        assert_eq!(LeaveType::parse("maternity"), None);
    }

    #[test]
    fn test_leave_status_round_trip() {
        for status in [
            LeaveStatus::Pending,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
        ] {
            assert_eq!(LeaveStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeaveStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_balance_update_is_empty() {
        assert!(LeaveBalanceUpdate::default().is_empty());

        let update = LeaveBalanceUpdate {
            annual_leave: Some(12),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
