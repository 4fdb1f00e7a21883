use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Activation state shared by companies and SPOCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(RecordStatus::Active),
            "inactive" => Some(RecordStatus::Inactive),
            _ => None,
        }
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        RecordStatus::Active
    }
}

/// A client company that raises requirements and receives invoices.
///
/// Company names are unique case-insensitively; the repositories check this
/// before inserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    /// Legacy free-text contact field, kept alongside the SPOC records.
    pub spoc: String,
    pub email_id: String,
    pub status: RecordStatus,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

/// Fields supplied when creating a company; the key and timestamps are
/// generated by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub spoc: String,
    pub email_id: String,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Partial update for a company. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub spoc: Option<String>,
    pub email_id: Option<String>,
    pub status: Option<RecordStatus>,
}

impl CompanyUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.spoc.is_none()
            && self.email_id.is_none()
            && self.status.is_none()
    }
}

/// A single point of contact at a client company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spoc {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub phone: String,
    pub email_id: String,
    pub location: Option<String>,
    pub status: RecordStatus,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSpoc {
    pub company_id: i64,
    pub name: String,
    pub phone: String,
    pub email_id: String,
    pub location: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

/// Partial update for a SPOC. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpocUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email_id: Option<String>,
    pub location: Option<String>,
    pub status: Option<RecordStatus>,
}

impl SpocUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email_id.is_none()
            && self.location.is_none()
            && self.status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_round_trip() {
        assert_eq!(RecordStatus::parse("active"), Some(RecordStatus::Active));
        assert_eq!(
            RecordStatus::parse("inactive"),
            Some(RecordStatus::Inactive)
        );
        assert_eq!(RecordStatus::parse("archived"), None);
        assert_eq!(RecordStatus::Active.as_str(), "active");
        assert_eq!(RecordStatus::Inactive.as_str(), "inactive");
    }

    #[test]
    fn test_default_status_is_active() {
        assert_eq!(RecordStatus::default(), RecordStatus::Active);
    }

    #[test]
    fn test_empty_update_detection() {
        assert!(CompanyUpdate::default().is_empty());

        let update = CompanyUpdate {
            status: Some(RecordStatus::Inactive),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_company_serializes_with_snake_case_fields() {
        use chrono::TimeZone;

        let now = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let company = Company {
            id: 7,
            name: "Acme".to_string(),
            spoc: "Asha Rao".to_string(),
            email_id: "asha@acme.example".to_string(),
            status: RecordStatus::Active,
            created_date: now,
            updated_date: now,
        };

        let json = serde_json::to_value(&company).unwrap();
        assert_eq!(json["email_id"], "asha@acme.example");
        assert_eq!(json["status"], "active");

        let back: Company = serde_json::from_value(json).unwrap();
        assert_eq!(back, company);
    }
}
