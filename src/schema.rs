use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ReceivablesError, Result};

/// One invoice row in canonical form. Produced by file ingestion or by a
/// validated manual entry; date fields are `None` when the source cell could
/// not be coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceRecord {
    pub customer_name: String,
    pub invoice_number: String,
    pub invoice_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: f64,
    pub payment_date: Option<NaiveDate>,
    pub payment_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum StatusFilter {
    #[schemars(description = "Keep every invoice regardless of payment status")]
    All,

    #[schemars(description = "Keep only invoices with an outstanding balance")]
    UnpaidOnly,

    #[schemars(description = "Keep only fully settled invoices")]
    PaidOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum CashOption {
    #[schemars(
        description = "Forecast open balances only: expected on the due date, for the outstanding amount"
    )]
    UnpaidOnly,

    #[schemars(
        description = "Forecast settled invoices only: dated by the recorded payment, for the payment amount"
    )]
    PaidOnly,

    #[schemars(
        description = "Forecast both: payment date when recorded, due date otherwise; payment amount for settled rows, outstanding amount for open ones"
    )]
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ForecastBucket {
    #[schemars(description = "Group expected cash by exact date")]
    Daily,

    #[schemars(description = "Group expected cash by ISO calendar week (bucket dated at its Monday)")]
    Weekly,

    #[schemars(description = "Group expected cash by calendar month (bucket dated at the 1st)")]
    Monthly,
}

/// Payload for a single manually entered invoice, as submitted by the entry
/// form. Serialized to JSON Schema so the collaborating UI can build and
/// validate the form without duplicating these rules.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ManualInvoiceDraft {
    #[schemars(description = "Customer the invoice was issued to. Required, non-empty.")]
    pub customer_name: String,

    #[schemars(description = "Invoice reference. Required, non-empty; duplicates are allowed.")]
    pub invoice_number: String,

    #[schemars(description = "Date the invoice was issued, YYYY-MM-DD.")]
    pub invoice_date: NaiveDate,

    #[schemars(description = "Date payment falls due. Must not precede the invoice date.")]
    pub due_date: NaiveDate,

    #[schemars(description = "Invoiced amount. Must be non-negative.")]
    pub amount: f64,

    #[serde(default)]
    #[schemars(description = "Whether a payment has been received against this invoice.")]
    pub has_payment: bool,

    #[serde(default)]
    #[schemars(
        description = "Date the payment was received. Only read when has_payment is true; defaults to today."
    )]
    pub payment_date: Option<NaiveDate>,

    #[serde(default)]
    #[schemars(
        description = "Amount received. Only read when has_payment is true; defaults to 0. Must be non-negative."
    )]
    pub payment_amount: Option<f64>,
}

impl ManualInvoiceDraft {
    /// Checks the entry rules and converts the draft into a canonical record.
    /// Nothing is stored when validation fails; the caller re-prompts.
    pub fn validate(&self, today: NaiveDate) -> Result<InvoiceRecord> {
        if self.customer_name.trim().is_empty() {
            return Err(ReceivablesError::Validation {
                details: "Customer Name is required".to_string(),
            });
        }
        if self.invoice_number.trim().is_empty() {
            return Err(ReceivablesError::Validation {
                details: "Invoice Number is required".to_string(),
            });
        }
        if self.due_date < self.invoice_date {
            return Err(ReceivablesError::Validation {
                details: format!(
                    "Due Date {} cannot be before Invoice Date {}",
                    self.due_date, self.invoice_date
                ),
            });
        }
        if self.amount < 0.0 {
            return Err(ReceivablesError::Validation {
                details: format!("Amount {} cannot be negative", self.amount),
            });
        }

        let (payment_date, payment_amount) = if self.has_payment {
            let received = self.payment_amount.unwrap_or(0.0);
            if received < 0.0 {
                return Err(ReceivablesError::Validation {
                    details: format!("Payment Amount {} cannot be negative", received),
                });
            }
            (Some(self.payment_date.unwrap_or(today)), received)
        } else {
            (None, 0.0)
        };

        Ok(InvoiceRecord {
            customer_name: self.customer_name.trim().to_string(),
            invoice_number: self.invoice_number.trim().to_string(),
            invoice_date: Some(self.invoice_date),
            due_date: Some(self.due_date),
            amount: self.amount,
            payment_date,
            payment_amount,
        })
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ManualInvoiceDraft)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ManualInvoiceDraft {
        ManualInvoiceDraft {
            customer_name: "Acme Ltd".to_string(),
            invoice_number: "INV-001".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
            amount: 500.0,
            has_payment: false,
            payment_date: None,
            payment_amount: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 15).unwrap()
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = ManualInvoiceDraft::schema_as_json().unwrap();
        assert!(schema_json.contains("customer_name"));
        assert!(schema_json.contains("has_payment"));
        assert!(schema_json.contains("payment_amount"));
    }

    #[test]
    fn test_valid_draft_becomes_record() {
        let record = draft().validate(today()).unwrap();
        assert_eq!(record.customer_name, "Acme Ltd");
        assert_eq!(record.payment_amount, 0.0);
        assert_eq!(record.payment_date, None);
    }

    #[test]
    fn test_due_before_invoice_rejected() {
        let mut d = draft();
        d.due_date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        let err = d.validate(today()).unwrap_err();
        assert!(err.to_string().contains("cannot be before"));
    }

    #[test]
    fn test_blank_required_fields_rejected() {
        let mut d = draft();
        d.customer_name = "   ".to_string();
        assert!(d.validate(today()).is_err());

        let mut d = draft();
        d.invoice_number = String::new();
        assert!(d.validate(today()).is_err());
    }

    #[test]
    fn test_payment_defaults_when_flagged() {
        let mut d = draft();
        d.has_payment = true;
        let record = d.validate(today()).unwrap();
        // Date falls back to today, amount to zero.
        assert_eq!(record.payment_date, Some(today()));
        assert_eq!(record.payment_amount, 0.0);
    }

    #[test]
    fn test_payment_fields_ignored_without_flag() {
        let mut d = draft();
        d.payment_date = Some(today());
        d.payment_amount = Some(500.0);
        let record = d.validate(today()).unwrap();
        assert_eq!(record.payment_date, None);
        assert_eq!(record.payment_amount, 0.0);
    }

    #[test]
    fn test_serialization_round_trip() {
        let json = serde_json::to_string_pretty(&draft()).unwrap();
        assert!(json.contains("Acme Ltd"));

        let deserialized: ManualInvoiceDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.invoice_number, "INV-001");
    }
}
