use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::{InvoiceRecord, PaymentStatus, StatusFilter};

/// Fixed days-past-due ranges for grouping outstanding receivables. Upper
/// bounds are inclusive; anything not yet due lands in the first bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgingBucket {
    Days0To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    pub const ALL: [AgingBucket; 4] = [
        AgingBucket::Days0To30,
        AgingBucket::Days31To60,
        AgingBucket::Days61To90,
        AgingBucket::Over90,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgingBucket::Days0To30 => "0-30",
            AgingBucket::Days31To60 => "31-60",
            AgingBucket::Days61To90 => "61-90",
            AgingBucket::Over90 => ">90",
        }
    }

    /// Classifies a days-outstanding count. `None` means the due date was
    /// unknown; such rows are treated as stale and land in `>90`.
    pub fn classify(days_outstanding: Option<i64>) -> AgingBucket {
        match days_outstanding {
            Some(days) if days <= 30 => AgingBucket::Days0To30,
            Some(days) if days <= 60 => AgingBucket::Days31To60,
            Some(days) if days <= 90 => AgingBucket::Days61To90,
            _ => AgingBucket::Over90,
        }
    }
}

impl fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An invoice record with its derived receivable state, anchored to the
/// reporting date the engine was run with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgedInvoice {
    pub record: InvoiceRecord,
    pub outstanding_amount: f64,
    pub payment_status: PaymentStatus,
    pub days_outstanding: Option<i64>,
    pub aging_bucket: AgingBucket,
}

/// One row of the aging summary: a bucket and the outstanding total it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingBucketTotal {
    pub bucket: AgingBucket,
    pub outstanding_amount: f64,
}

/// Derives outstanding amount, payment status, days outstanding, and aging
/// bucket for every record, anchored to `today`.
pub fn age_records(records: &[InvoiceRecord], today: NaiveDate) -> Vec<AgedInvoice> {
    records.iter().map(|r| age_record(r, today)).collect()
}

fn age_record(record: &InvoiceRecord, today: NaiveDate) -> AgedInvoice {
    let outstanding_amount = (record.amount - record.payment_amount).max(0.0);

    let payment_status = if outstanding_amount == 0.0 {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    };

    let days_outstanding = record
        .due_date
        .map(|due| (today - due).num_days().max(0));

    AgedInvoice {
        record: record.clone(),
        outstanding_amount,
        payment_status,
        days_outstanding,
        aging_bucket: AgingBucket::classify(days_outstanding),
    }
}

/// Applies the user's status filter ahead of any aggregation.
pub fn filter_by_status(invoices: &[AgedInvoice], filter: StatusFilter) -> Vec<AgedInvoice> {
    invoices
        .iter()
        .filter(|inv| match filter {
            StatusFilter::All => true,
            StatusFilter::UnpaidOnly => inv.payment_status == PaymentStatus::Unpaid,
            StatusFilter::PaidOnly => inv.payment_status == PaymentStatus::Paid,
        })
        .cloned()
        .collect()
}

/// Sums outstanding amounts per bucket. All four buckets are always present
/// in fixed order, zero-filled, so tables and charts render consistently.
pub fn aging_summary(invoices: &[AgedInvoice]) -> Vec<AgingBucketTotal> {
    let mut totals: BTreeMap<AgingBucket, f64> = BTreeMap::new();
    for invoice in invoices {
        *totals.entry(invoice.aging_bucket).or_insert(0.0) += invoice.outstanding_amount;
    }

    AgingBucket::ALL
        .iter()
        .map(|bucket| AgingBucketTotal {
            bucket: *bucket,
            outstanding_amount: totals.get(bucket).copied().unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()
    }

    fn record(amount: f64, payment_amount: f64, due_days_ago: i64) -> InvoiceRecord {
        InvoiceRecord {
            customer_name: "Acme".to_string(),
            invoice_number: "INV-1".to_string(),
            invoice_date: Some(today() - chrono::Duration::days(due_days_ago + 30)),
            due_date: Some(today() - chrono::Duration::days(due_days_ago)),
            amount,
            payment_date: None,
            payment_amount,
        }
    }

    #[test]
    fn test_outstanding_floors_at_zero() {
        let aged = age_records(&[record(100.0, 150.0, 10)], today());
        assert_eq!(aged[0].outstanding_amount, 0.0);
        assert_eq!(aged[0].payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_status_paid_iff_zero_outstanding() {
        let aged = age_records(
            &[record(100.0, 100.0, 10), record(100.0, 99.99, 10)],
            today(),
        );
        assert_eq!(aged[0].payment_status, PaymentStatus::Paid);
        assert_eq!(aged[1].payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_bucket_boundaries_inclusive() {
        let cases = [
            (0, AgingBucket::Days0To30),
            (30, AgingBucket::Days0To30),
            (31, AgingBucket::Days31To60),
            (60, AgingBucket::Days31To60),
            (61, AgingBucket::Days61To90),
            (90, AgingBucket::Days61To90),
            (91, AgingBucket::Over90),
        ];
        for (days, expected) in cases {
            assert_eq!(AgingBucket::classify(Some(days)), expected, "days={}", days);
        }
    }

    #[test]
    fn test_future_due_date_clamps_to_zero_days() {
        let aged = age_records(&[record(100.0, 0.0, -20)], today());
        assert_eq!(aged[0].days_outstanding, Some(0));
        assert_eq!(aged[0].aging_bucket, AgingBucket::Days0To30);
    }

    #[test]
    fn test_unknown_due_date_lands_over_90() {
        let mut r = record(100.0, 0.0, 10);
        r.due_date = None;
        let aged = age_records(&[r], today());
        assert_eq!(aged[0].days_outstanding, None);
        assert_eq!(aged[0].aging_bucket, AgingBucket::Over90);
    }

    #[test]
    fn test_summary_fixed_order_and_zero_fill() {
        let aged = age_records(&[record(500.0, 0.0, 45)], today());
        let summary = aging_summary(&aged);

        let labels: Vec<&str> = summary.iter().map(|t| t.bucket.label()).collect();
        assert_eq!(labels, vec!["0-30", "31-60", "61-90", ">90"]);

        assert_eq!(summary[0].outstanding_amount, 0.0);
        assert_eq!(summary[1].outstanding_amount, 500.0);
        assert_eq!(summary[2].outstanding_amount, 0.0);
        assert_eq!(summary[3].outstanding_amount, 0.0);
    }

    #[test]
    fn test_summary_totals_match_filtered_outstanding() {
        let aged = age_records(
            &[
                record(100.0, 0.0, 10),
                record(200.0, 50.0, 45),
                record(300.0, 300.0, 100),
            ],
            today(),
        );

        let unpaid = filter_by_status(&aged, StatusFilter::UnpaidOnly);
        let summary = aging_summary(&unpaid);

        let bucket_total: f64 = summary.iter().map(|t| t.outstanding_amount).sum();
        let outstanding_total: f64 = unpaid.iter().map(|i| i.outstanding_amount).sum();
        assert!((bucket_total - outstanding_total).abs() < f64::EPSILON);
        assert!((bucket_total - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_filter() {
        let aged = age_records(
            &[record(100.0, 100.0, 5), record(100.0, 0.0, 5)],
            today(),
        );

        assert_eq!(filter_by_status(&aged, StatusFilter::All).len(), 2);
        assert_eq!(filter_by_status(&aged, StatusFilter::PaidOnly).len(), 1);
        assert_eq!(filter_by_status(&aged, StatusFilter::UnpaidOnly).len(), 1);
    }
}
