//! # Receivables Aging
//!
//! A library for normalizing invoice records into accounts-receivable aging
//! buckets and a bucketed cash-inflow forecast.
//!
//! ## Core Concepts
//!
//! - **Column Resolution**: arbitrary upload headers are matched to seven
//!   canonical columns through ordered alias tables
//! - **Working Set**: the current upload partition plus the session's manual
//!   entries, merged fresh for every reporting pass
//! - **Aging**: outstanding amount, payment status, and a days-past-due
//!   bucket (0-30 / 31-60 / 61-90 / >90) derived per invoice
//! - **Cash Forecast**: expected inflows bucketed by day, ISO week, or
//!   calendar month under a payment-inclusion policy
//!
//! ## Example
//!
//! ```rust,ignore
//! use receivables_aging::*;
//! use chrono::{Local, NaiveDate};
//!
//! let uploaded = read_invoice_file(std::path::Path::new("invoices.csv"))?;
//!
//! let mut ledger = SessionLedger::new();
//! let today = Local::now().date_naive();
//! ledger.submit(
//!     &ManualInvoiceDraft {
//!         customer_name: "Acme Ltd".to_string(),
//!         invoice_number: "INV-100".to_string(),
//!         invoice_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
//!         due_date: NaiveDate::from_ymd_opt(2023, 3, 31).unwrap(),
//!         amount: 1500.0,
//!         has_payment: false,
//!         payment_date: None,
//!         payment_amount: None,
//!     },
//!     today,
//! )?;
//!
//! let options = ReportOptions {
//!     status_filter: StatusFilter::UnpaidOnly,
//!     cash_option: CashOption::UnpaidOnly,
//!     bucket: ForecastBucket::Monthly,
//!     customer: None,
//! };
//!
//! let report = ReceivablesProcessor::report(Some(&uploaded), &ledger, &options, today);
//! println!("total outstanding: {}", report.total_outstanding);
//! ```

pub mod aging;
pub mod columns;
pub mod error;
pub mod export;
pub mod forecast;
pub mod ingestion;
pub mod report;
pub mod schema;
pub mod store;
pub mod utils;

pub use aging::{
    age_records, aging_summary, filter_by_status, AgedInvoice, AgingBucket, AgingBucketTotal,
};
pub use columns::{match_columns, normalize_header, resolve_columns, CanonicalColumn, ColumnResolution};
pub use error::{ReceivablesError, Result};
pub use export::{aging_summary_csv, cash_forecast_csv, full_table_csv};
pub use forecast::{bucket_start, cash_forecast, project_cash, CashBucketTotal, CashProjection};
pub use ingestion::{build_records, read_csv_table, read_invoice_file, read_spreadsheet_table, RawTable};
pub use report::{build_report, CustomerBreakdown, ReceivablesReport, ReportOptions};
pub use schema::{
    CashOption, ForecastBucket, InvoiceRecord, ManualInvoiceDraft, PaymentStatus, StatusFilter,
};
pub use store::{merge_sources, SessionLedger};

use chrono::NaiveDate;
use log::info;

/// Entry point the collaborating UI calls once per parameter change or manual
/// submission: merges the sources into a working set and runs both engines.
pub struct ReceivablesProcessor;

impl ReceivablesProcessor {
    pub fn report(
        uploaded: Option<&[InvoiceRecord]>,
        ledger: &SessionLedger,
        options: &ReportOptions,
        today: NaiveDate,
    ) -> ReceivablesReport {
        let working = merge_sources(uploaded, ledger);
        info!(
            "Reporting pass: {} uploaded + {} manual records",
            uploaded.map(<[InvoiceRecord]>::len).unwrap_or(0),
            ledger.len()
        );
        build_report(&working, options, today)
    }
}

/// Convenience wrapper over [`ReceivablesProcessor::report`].
pub fn report_receivables(
    uploaded: Option<&[InvoiceRecord]>,
    ledger: &SessionLedger,
    options: &ReportOptions,
    today: NaiveDate,
) -> ReceivablesReport {
    ReceivablesProcessor::report(uploaded, ledger, options, today)
}
