use chrono::NaiveDate;
use log::info;

use crate::error::Result;
use crate::schema::{InvoiceRecord, ManualInvoiceDraft};

/// Ordered accumulator for manually entered invoices. One ledger exists per
/// interactive session, owned by the session context and passed into each
/// reporting pass; it is never shared across sessions and dies with the
/// session.
#[derive(Debug, Default)]
pub struct SessionLedger {
    entries: Vec<InvoiceRecord>,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a draft and appends the resulting record. On validation
    /// failure nothing is stored and the error carries the message to show
    /// the user.
    pub fn submit(&mut self, draft: &ManualInvoiceDraft, today: NaiveDate) -> Result<()> {
        let record = draft.validate(today)?;
        info!(
            "Manual invoice {} for {} added",
            record.invoice_number, record.customer_name
        );
        self.entries.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Builds the working dataset for a reporting pass: the current upload
/// partition first (if any), then manual entries in submission order. Both
/// sources empty yields an empty working set, which downstream treats as the
/// "no data" state rather than an error.
pub fn merge_sources(
    uploaded: Option<&[InvoiceRecord]>,
    ledger: &SessionLedger,
) -> Vec<InvoiceRecord> {
    let mut working = Vec::with_capacity(
        uploaded.map(<[InvoiceRecord]>::len).unwrap_or(0) + ledger.len(),
    );

    if let Some(batch) = uploaded {
        working.extend_from_slice(batch);
    }
    working.extend_from_slice(ledger.records());

    working
}
