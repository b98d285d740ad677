use chrono::NaiveDate;

use crate::aging::{AgedInvoice, AgingBucketTotal};
use crate::error::{ReceivablesError, Result};
use crate::forecast::CashBucketTotal;
use crate::schema::PaymentStatus;

/// Header row of the full-table export. The first seven columns are the
/// canonical invoice fields, so a re-ingested export resolves without any
/// alias lookups beyond normalization.
const FULL_TABLE_HEADERS: [&str; 11] = [
    "Customer Name",
    "Invoice Number",
    "Invoice Date",
    "Due Date",
    "Amount",
    "Payment Date",
    "Payment Amount",
    "Outstanding Amount",
    "Payment Status",
    "Days Outstanding",
    "Aging Category",
];

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_amount(value: f64) -> String {
    format!("{}", value)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ReceivablesError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Serializes the full merged+derived table. Null dates become empty fields
/// and coerce back to null on re-ingestion.
pub fn full_table_csv(invoices: &[AgedInvoice]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(FULL_TABLE_HEADERS)?;

    for invoice in invoices {
        let record = &invoice.record;
        writer.write_record([
            record.customer_name.clone(),
            record.invoice_number.clone(),
            fmt_date(record.invoice_date),
            fmt_date(record.due_date),
            fmt_amount(record.amount),
            fmt_date(record.payment_date),
            fmt_amount(record.payment_amount),
            fmt_amount(invoice.outstanding_amount),
            match invoice.payment_status {
                PaymentStatus::Paid => "Paid".to_string(),
                PaymentStatus::Unpaid => "Unpaid".to_string(),
            },
            invoice
                .days_outstanding
                .map(|d| d.to_string())
                .unwrap_or_default(),
            invoice.aging_bucket.label().to_string(),
        ])?;
    }

    finish(writer)
}

/// Serializes the aging summary as `aging_category,outstanding_amount`.
pub fn aging_summary_csv(summary: &[AgingBucketTotal]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["aging_category", "outstanding_amount"])?;

    for total in summary {
        writer.write_record([
            total.bucket.label().to_string(),
            fmt_amount(total.outstanding_amount),
        ])?;
    }

    finish(writer)
}

/// Serializes the cash forecast as `bucket_date,cash_amount`.
pub fn cash_forecast_csv(forecast: &[CashBucketTotal]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["bucket_date", "cash_amount"])?;

    for bucket in forecast {
        writer.write_record([
            bucket.bucket_date.format("%Y-%m-%d").to_string(),
            fmt_amount(bucket.cash_amount),
        ])?;
    }

    finish(writer)
}
