use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::aging::{age_records, aging_summary, filter_by_status, AgedInvoice, AgingBucketTotal};
use crate::forecast::{cash_forecast, CashBucketTotal};
use crate::schema::{CashOption, ForecastBucket, InvoiceRecord, StatusFilter};

/// The user-driven configuration for one reporting pass. Every widget choice
/// in the collaborating UI maps to one field here; there is no hidden state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    pub status_filter: StatusFilter,
    pub cash_option: CashOption,
    pub bucket: ForecastBucket,
    pub customer: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            status_filter: StatusFilter::All,
            cash_option: CashOption::UnpaidOnly,
            bucket: ForecastBucket::Daily,
            customer: None,
        }
    }
}

/// Aging and forecast restricted to one customer's rows, computed with the
/// same parameters as the portfolio views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerBreakdown {
    pub customer_name: String,
    pub aging: Vec<AgingBucketTotal>,
    pub forecast: Vec<CashBucketTotal>,
}

/// Everything one reporting pass produces: portfolio aggregates, the optional
/// per-customer views, summary scalars, and the full derived table for
/// export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceivablesReport {
    /// Every merged row with derived fields, unfiltered. This is what the
    /// full-table CSV export serializes.
    pub full_table: Vec<AgedInvoice>,
    /// Portfolio aging summary over the status-filtered set.
    pub aging: Vec<AgingBucketTotal>,
    /// Portfolio cash forecast over the status-filtered set.
    pub forecast: Vec<CashBucketTotal>,
    /// Distinct customer names present after filtering, in first-seen order.
    pub customers: Vec<String>,
    pub customer: Option<CustomerBreakdown>,
    pub total_outstanding: f64,
    pub total_expected_cash: f64,
}

/// Runs both engines over the working set under the chosen parameters. Pure
/// and stateless: the same records, options, and `today` always produce the
/// same report.
pub fn build_report(
    records: &[InvoiceRecord],
    options: &ReportOptions,
    today: NaiveDate,
) -> ReceivablesReport {
    info!(
        "Building receivables report over {} records (anchored to {})",
        records.len(),
        today
    );

    let full_table = age_records(records, today);
    let filtered = filter_by_status(&full_table, options.status_filter);
    debug!(
        "{} of {} rows remain after status filter",
        filtered.len(),
        full_table.len()
    );

    let aging = aging_summary(&filtered);
    let forecast = cash_forecast(&filtered, options.cash_option, options.bucket);

    let customers = distinct_customers(&filtered);

    let customer = options.customer.as_ref().map(|name| {
        let rows: Vec<AgedInvoice> = filtered
            .iter()
            .filter(|inv| inv.record.customer_name == *name)
            .cloned()
            .collect();

        CustomerBreakdown {
            customer_name: name.clone(),
            aging: aging_summary(&rows),
            forecast: cash_forecast(&rows, options.cash_option, options.bucket),
        }
    });

    let total_outstanding = filtered.iter().map(|inv| inv.outstanding_amount).sum();
    let total_expected_cash = forecast.iter().map(|b| b.cash_amount).sum();

    ReceivablesReport {
        full_table,
        aging,
        forecast,
        customers,
        customer,
        total_outstanding,
        total_expected_cash,
    }
}

fn distinct_customers(invoices: &[AgedInvoice]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for invoice in invoices {
        let name = invoice.record.customer_name.trim();
        if name.is_empty() {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
