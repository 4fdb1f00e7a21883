use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Cancelled,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Cancelled => "cancelled",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(InvoiceStatus::Paid),
            "pending" => Some(InvoiceStatus::Pending),
            "cancelled" => Some(InvoiceStatus::Cancelled),
            "overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

/// An invoice raised against a client company.
///
/// Invoice numbers are unique; the repositories check this before inserting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub invoice_number: String,
    pub reference: Option<String>,
    pub company_id: i64,
    pub po_number: Option<String>,
    pub amount: f64,
    pub raised_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub remarks: Option<String>,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvoice {
    pub invoice_number: String,
    pub reference: Option<String>,
    pub company_id: i64,
    pub po_number: Option<String>,
    pub amount: f64,
    pub raised_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub remarks: Option<String>,
}

/// Partial update for an invoice. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceUpdate {
    pub reference: Option<String>,
    pub po_number: Option<String>,
    pub amount: Option<f64>,
    pub raised_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub remarks: Option<String>,
}

impl InvoiceUpdate {
    pub fn is_empty(&self) -> bool {
        self.reference.is_none()
            && self.po_number.is_none()
            && self.amount.is_none()
            && self.raised_date.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.remarks.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_status_round_trip() {
        for status in [
            InvoiceStatus::Paid,
            InvoiceStatus::Pending,
            InvoiceStatus::Cancelled,
            InvoiceStatus::Overdue,
        ] {
            assert_eq!(InvoiceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(InvoiceStatus::parse("written-off"), None);
    }

    #[test]
    fn test_default_status_is_pending() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Pending);
    }
}
