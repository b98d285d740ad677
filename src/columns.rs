use std::collections::BTreeMap;

use crate::error::{ReceivablesError, Result};

/// The seven columns every working dataset must resolve to before the
/// pipeline runs. Variants are ordered as they appear in the canonical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalColumn {
    CustomerName,
    InvoiceNumber,
    InvoiceDate,
    DueDate,
    Amount,
    PaymentDate,
    PaymentAmount,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 7] = [
        CanonicalColumn::CustomerName,
        CanonicalColumn::InvoiceNumber,
        CanonicalColumn::InvoiceDate,
        CanonicalColumn::DueDate,
        CanonicalColumn::Amount,
        CanonicalColumn::PaymentDate,
        CanonicalColumn::PaymentAmount,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalColumn::CustomerName => "customer name",
            CanonicalColumn::InvoiceNumber => "invoice number",
            CanonicalColumn::InvoiceDate => "invoice date",
            CanonicalColumn::DueDate => "due date",
            CanonicalColumn::Amount => "amount",
            CanonicalColumn::PaymentDate => "payment date",
            CanonicalColumn::PaymentAmount => "payment amount",
        }
    }

    /// Accepted header spellings, in priority order. The canonical name leads
    /// each list, so resolving an already-canonical header set is the
    /// identity mapping.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalColumn::CustomerName => {
                &["customer name", "cust name", "client name", "customer"]
            }
            CanonicalColumn::InvoiceNumber => {
                &["invoice number", "invoice no", "inv no", "vendor name"]
            }
            CanonicalColumn::InvoiceDate => &[
                "invoice date",
                "date of invoice",
                "inv date",
                "billing date",
                "date",
            ],
            CanonicalColumn::DueDate => &["due date", "payment due date"],
            CanonicalColumn::Amount => &["amount", "invoice amount", "total"],
            CanonicalColumn::PaymentDate => {
                &["payment date", "paid date", "date paid", "payment received"]
            }
            CanonicalColumn::PaymentAmount => {
                &["payment amount", "paid amount", "amount paid"]
            }
        }
    }
}

/// Outcome of matching raw headers against the alias tables: which input
/// column position serves each canonical column, and which canonical columns
/// found no match at all.
#[derive(Debug, Clone)]
pub struct ColumnResolution {
    pub mapping: BTreeMap<CanonicalColumn, usize>,
    pub missing: Vec<CanonicalColumn>,
}

impl ColumnResolution {
    pub fn index_of(&self, column: CanonicalColumn) -> Option<usize> {
        self.mapping.get(&column).copied()
    }
}

/// Normalizes a header for alias matching: lowercase, trim, strip everything
/// outside `[a-z0-9 ]`, collapse internal whitespace runs. Applied to input
/// headers and alias keys alike, so matching is punctuation- and
/// casing-insensitive.
pub fn normalize_header(raw: &str) -> String {
    let lowered: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matches raw headers against the alias tables. Does not mutate or reorder
/// the caller's headers; duplicated matches resolve to the first occurrence.
/// Unmatched canonical columns are reported in `missing` rather than raised.
pub fn match_columns(headers: &[String]) -> ColumnResolution {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let mut mapping = BTreeMap::new();
    let mut missing = Vec::new();

    for column in CanonicalColumn::ALL {
        let found = column.aliases().iter().find_map(|alias| {
            let alias_key = normalize_header(alias);
            normalized.iter().position(|h| *h == alias_key)
        });

        match found {
            Some(index) => {
                mapping.insert(column, index);
            }
            None => missing.push(column),
        }
    }

    ColumnResolution { mapping, missing }
}

/// Like [`match_columns`], but fails when any canonical column is
/// unresolved. Ingestion must not proceed with a partial schema.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnResolution> {
    let resolution = match_columns(headers);

    if !resolution.missing.is_empty() {
        return Err(ReceivablesError::MissingColumns(
            resolution
                .missing
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        ));
    }

    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Customer Name  "), "customer name");
        assert_eq!(normalize_header("Invoice_No."), "invoiceno");
        assert_eq!(normalize_header("Due   Date!!"), "due date");
        assert_eq!(normalize_header("AMOUNT ($)"), "amount");
    }

    #[test]
    fn test_canonical_headers_resolve_to_identity() {
        let raw = headers(&[
            "customer name",
            "invoice number",
            "invoice date",
            "due date",
            "amount",
            "payment date",
            "payment amount",
        ]);

        let resolution = resolve_columns(&raw).unwrap();
        for (position, column) in CanonicalColumn::ALL.iter().enumerate() {
            assert_eq!(resolution.index_of(*column), Some(position));
        }
    }

    #[test]
    fn test_alias_resolution() {
        let raw = headers(&[
            "Client Name",
            "Vendor Name",
            "Billing Date",
            "Payment Due Date",
            "Invoice Amount",
            "Date Paid",
            "Amount Paid",
        ]);

        let resolution = resolve_columns(&raw).unwrap();
        assert_eq!(resolution.index_of(CanonicalColumn::CustomerName), Some(0));
        assert_eq!(resolution.index_of(CanonicalColumn::InvoiceNumber), Some(1));
        assert_eq!(resolution.index_of(CanonicalColumn::InvoiceDate), Some(2));
        assert_eq!(resolution.index_of(CanonicalColumn::DueDate), Some(3));
        assert_eq!(resolution.index_of(CanonicalColumn::Amount), Some(4));
        assert_eq!(resolution.index_of(CanonicalColumn::PaymentDate), Some(5));
        assert_eq!(resolution.index_of(CanonicalColumn::PaymentAmount), Some(6));
    }

    #[test]
    fn test_first_alias_wins() {
        // Both "amount" and "total" are present; the earlier alias in the
        // table takes priority regardless of input order.
        let raw = headers(&[
            "Total",
            "Customer Name",
            "Invoice Number",
            "Invoice Date",
            "Due Date",
            "Amount",
            "Payment Date",
            "Payment Amount",
        ]);

        let resolution = resolve_columns(&raw).unwrap();
        assert_eq!(resolution.index_of(CanonicalColumn::Amount), Some(5));
    }

    #[test]
    fn test_match_columns_reports_missing() {
        let raw = headers(&["Customer Name", "Invoice Number", "Amount"]);
        let resolution = match_columns(&raw);
        assert_eq!(resolution.mapping.len(), 3);
        assert_eq!(
            resolution.missing,
            vec![
                CanonicalColumn::InvoiceDate,
                CanonicalColumn::DueDate,
                CanonicalColumn::PaymentDate,
                CanonicalColumn::PaymentAmount,
            ]
        );
    }

    #[test]
    fn test_missing_columns_fail() {
        let raw = headers(&["Customer Name", "Invoice Number", "Amount"]);
        let err = resolve_columns(&raw).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invoice date"));
        assert!(message.contains("due date"));
        assert!(message.contains("payment date"));
        assert!(message.contains("payment amount"));
    }

    #[test]
    fn test_punctuation_and_case_insensitive() {
        let raw = headers(&[
            "CUSTOMER  NAME",
            "Invoice  Number.",
            "Invoice Date",
            "Due Date!!",
            "Amount",
            "Payment Date",
            "Payment Amount",
        ]);

        let resolution = resolve_columns(&raw).unwrap();
        assert_eq!(resolution.index_of(CanonicalColumn::DueDate), Some(3));
        assert!(resolution.missing.is_empty());
    }
}
