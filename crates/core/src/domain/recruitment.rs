use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Requirement statuses considered open for assignment and pipeline work.
pub const OPEN_STATUS_IDS: [i64; 3] = [1, 2, 3];

/// Requirement statuses that close a requirement (4 = Closed, 5 = Fulfilled).
///
/// Moving a requirement's `status_id` into this set stamps `closed_date`;
/// moving it back out clears it.
pub const TERMINAL_STATUS_IDS: [i64; 2] = [4, 5];

/// An open position raised by a client company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub requirement_id: i64,
    pub company_id: i64,
    pub key_skill: String,
    /// Job description text.
    pub jd: String,
    pub status_id: i64,
    pub recruiter_name: Option<String>,
    pub budget: Option<f64>,
    pub expected_billing_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub remarks: Option<String>,
    /// Customer-side reference for this requirement.
    pub req_cust_ref_id: Option<String>,
    pub closed_date: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequirement {
    pub company_id: i64,
    pub key_skill: String,
    pub jd: String,
    pub status_id: i64,
    pub recruiter_name: Option<String>,
    pub budget: Option<f64>,
    pub expected_billing_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub remarks: Option<String>,
    pub req_cust_ref_id: Option<String>,
}

/// Partial update for a requirement. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementUpdate {
    pub company_id: Option<i64>,
    pub key_skill: Option<String>,
    pub jd: Option<String>,
    pub status_id: Option<i64>,
    pub recruiter_name: Option<String>,
    pub budget: Option<f64>,
    pub expected_billing_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub remarks: Option<String>,
    pub req_cust_ref_id: Option<String>,
}

impl RequirementUpdate {
    pub fn is_empty(&self) -> bool {
        self.company_id.is_none()
            && self.key_skill.is_none()
            && self.jd.is_none()
            && self.status_id.is_none()
            && self.recruiter_name.is_none()
            && self.budget.is_none()
            && self.expected_billing_date.is_none()
            && self.location.is_none()
            && self.remarks.is_none()
            && self.req_cust_ref_id.is_none()
    }
}

/// Lookup row for requirement statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementStatus {
    pub id: i64,
    pub status: String,
}

/// A candidate profile in the sourcing pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email_id: String,
    pub phone: String,
    pub key_skills: String,
    pub experience_years: Option<f64>,
    pub current_ctc: Option<f64>,
    pub expected_ctc: Option<f64>,
    pub notice_period: Option<String>,
    /// FK into the profile stage lookup.
    pub status: i64,
    pub remarks: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub name: String,
    pub email_id: String,
    pub phone: String,
    pub key_skills: String,
    pub experience_years: Option<f64>,
    pub current_ctc: Option<f64>,
    pub expected_ctc: Option<f64>,
    pub notice_period: Option<String>,
    pub status: i64,
    pub remarks: Option<String>,
}

/// Partial update for a profile. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email_id: Option<String>,
    pub phone: Option<String>,
    pub key_skills: Option<String>,
    pub experience_years: Option<f64>,
    pub current_ctc: Option<f64>,
    pub expected_ctc: Option<f64>,
    pub notice_period: Option<String>,
    pub status: Option<i64>,
    pub remarks: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email_id.is_none()
            && self.phone.is_none()
            && self.key_skills.is_none()
            && self.experience_years.is_none()
            && self.current_ctc.is_none()
            && self.expected_ctc.is_none()
            && self.notice_period.is_none()
            && self.status.is_none()
            && self.remarks.is_none()
    }
}

/// Lookup row mapping a profile status id to its pipeline stage label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStatus {
    pub id: i64,
    pub stage: String,
}

/// Whether a recruiter is actively working a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivelyWorking {
    Yes,
    No,
}

impl ActivelyWorking {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivelyWorking::Yes => "Yes",
            ActivelyWorking::No => "No",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(ActivelyWorking::Yes),
            "No" => Some(ActivelyWorking::No),
            _ => None,
        }
    }
}

impl Default for ActivelyWorking {
    fn default() -> Self {
        ActivelyWorking::No
    }
}

/// The assignment of a recruiter (and eventually a profile) to a requirement.
///
/// At most one row is intended per (requirement_id, profile_id) pair; the
/// repositories enforce this through upsert logic rather than a storage
/// constraint. A row with no profile yet is the "unassigned" placeholder the
/// upsert claims before inserting fresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessProfile {
    pub id: i64,
    pub requirement_id: i64,
    pub profile_id: Option<i64>,
    pub recruiter_name: String,
    pub status: Option<i64>,
    pub actively_working: ActivelyWorking,
    pub remarks: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProcessProfile {
    pub requirement_id: i64,
    pub profile_id: Option<i64>,
    pub recruiter_name: String,
    pub status: Option<i64>,
    #[serde(default)]
    pub actively_working: ActivelyWorking,
    pub remarks: Option<String>,
}

/// A pipeline row joined to its candidate profile and stage label.
///
/// Produced by the enrichment join; rows whose profile cannot be resolved
/// are dropped rather than surfaced partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineProfile {
    pub id: i64,
    pub requirement_id: i64,
    pub recruiter_name: String,
    pub actively_working: ActivelyWorking,
    pub profile: Profile,
    pub stage: String,
}

/// One row of the placements-by-date-range report: a profile created in the
/// window, with whatever requirement/recruiter/company context exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementActivity {
    pub profile_id: i64,
    pub status: i64,
    pub name: String,
    pub recruiter_name: Option<String>,
    pub requirement_id: Option<i64>,
    pub company_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actively_working_round_trip() {
        assert_eq!(ActivelyWorking::parse("Yes"), Some(ActivelyWorking::Yes));
        assert_eq!(ActivelyWorking::parse("No"), Some(ActivelyWorking::No));
        assert_eq!(ActivelyWorking::parse("yes"), None);
        assert_eq!(ActivelyWorking::Yes.as_str(), "Yes");
    }

    #[test]
    fn test_open_and_terminal_statuses_are_disjoint() {
        for id in OPEN_STATUS_IDS {
            assert!(!TERMINAL_STATUS_IDS.contains(&id));
        }
    }

    #[test]
    fn test_requirement_update_is_empty() {
        assert!(RequirementUpdate::default().is_empty());

        let update = RequirementUpdate {
            status_id: Some(4),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
