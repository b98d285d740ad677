use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::aging::AgedInvoice;
use crate::schema::{CashOption, ForecastBucket};
use crate::utils::{iso_week_start, month_start};

/// A single expected cash inflow: when the money is expected and how much.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashProjection {
    pub customer_name: String,
    pub invoice_number: String,
    pub expected_payment_date: Option<NaiveDate>,
    pub cash_amount: f64,
}

/// One row of the bucketed forecast: a calendar period start and the cash
/// expected within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashBucketTotal {
    pub bucket_date: NaiveDate,
    pub cash_amount: f64,
}

/// Applies the payment-inclusion policy: which rows count, which date the
/// cash is expected on, and which amount flows.
pub fn project_cash(invoices: &[AgedInvoice], option: CashOption) -> Vec<CashProjection> {
    invoices
        .iter()
        .filter_map(|invoice| match option {
            CashOption::UnpaidOnly => {
                if invoice.outstanding_amount > 0.0 {
                    Some(CashProjection {
                        customer_name: invoice.record.customer_name.clone(),
                        invoice_number: invoice.record.invoice_number.clone(),
                        expected_payment_date: invoice.record.due_date,
                        cash_amount: invoice.outstanding_amount,
                    })
                } else {
                    None
                }
            }
            CashOption::PaidOnly => {
                if invoice.outstanding_amount == 0.0 {
                    Some(CashProjection {
                        customer_name: invoice.record.customer_name.clone(),
                        invoice_number: invoice.record.invoice_number.clone(),
                        expected_payment_date: invoice.record.payment_date,
                        cash_amount: invoice.record.payment_amount,
                    })
                } else {
                    None
                }
            }
            CashOption::Both => {
                let cash_amount = if invoice.outstanding_amount == 0.0 {
                    invoice.record.payment_amount
                } else {
                    invoice.outstanding_amount
                };
                Some(CashProjection {
                    customer_name: invoice.record.customer_name.clone(),
                    invoice_number: invoice.record.invoice_number.clone(),
                    expected_payment_date: invoice
                        .record
                        .payment_date
                        .or(invoice.record.due_date),
                    cash_amount,
                })
            }
        })
        .collect()
}

/// Maps an expected-payment date to the start of its calendar bucket.
pub fn bucket_start(date: NaiveDate, bucket: ForecastBucket) -> NaiveDate {
    match bucket {
        ForecastBucket::Daily => date,
        ForecastBucket::Weekly => iso_week_start(date),
        ForecastBucket::Monthly => month_start(date),
    }
}

/// Buckets projections by calendar period and sums cash per bucket, ascending
/// by bucket date. Projections with no usable date (e.g. a settled invoice
/// with no recorded payment date) are dropped from the grouping. An empty
/// result is the "no forecastable rows" state and is logged, not raised.
pub fn cash_forecast(
    invoices: &[AgedInvoice],
    option: CashOption,
    bucket: ForecastBucket,
) -> Vec<CashBucketTotal> {
    let projections = project_cash(invoices, option);

    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for projection in &projections {
        match projection.expected_payment_date {
            Some(date) => {
                *totals.entry(bucket_start(date, bucket)).or_insert(0.0) +=
                    projection.cash_amount;
            }
            None => debug!(
                "Invoice {} has no expected payment date, excluded from forecast",
                projection.invoice_number
            ),
        }
    }

    if totals.is_empty() {
        warn!("No invoices available for the selected cash forecast options");
    }

    totals
        .into_iter()
        .map(|(bucket_date, cash_amount)| CashBucketTotal {
            bucket_date,
            cash_amount,
        })
        .collect()
}
