//! Document number types.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::numbering::error::NumberingError;

/// Minimum number of digits in the sequence part.
pub const SEQUENCE_WIDTH: usize = 4;

/// Kind of numbered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Customer invoice.
    Invoice,
    /// Receipt issued for a confirmed payment.
    Receipt,
    /// Tax invoice issued against an invoice.
    TaxInvoice,
    /// Credit note issued for a confirmed refund.
    CreditNote,
    /// Customer payment transaction.
    CustomerPayment,
    /// Customer refund transaction.
    CustomerRefund,
    /// Payment to a wholesaler.
    WholesalePayment,
    /// Refund from a wholesaler.
    WholesaleRefund,
}

impl DocumentType {
    /// All document types.
    pub const ALL: [Self; 8] = [
        Self::Invoice,
        Self::Receipt,
        Self::TaxInvoice,
        Self::CreditNote,
        Self::CustomerPayment,
        Self::CustomerRefund,
        Self::WholesalePayment,
        Self::WholesaleRefund,
    ];

    /// Returns the printed prefix.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Invoice => "IVN",
            Self::Receipt => "PM",
            Self::TaxInvoice => "RVN",
            Self::CreditNote => "CN",
            Self::CustomerPayment => "TP",
            Self::CustomerRefund => "TR",
            Self::WholesalePayment => "WP",
            Self::WholesaleRefund => "WR",
        }
    }

    /// Looks a document type up by its prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.prefix() == prefix)
    }

    /// Returns how the year is printed for this type.
    #[must_use]
    pub fn year_style(&self) -> YearStyle {
        match self {
            Self::TaxInvoice => YearStyle::FourDigit,
            _ => YearStyle::TwoDigit,
        }
    }

    /// Stable key used for the counter row.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Receipt => "receipt",
            Self::TaxInvoice => "tax_invoice",
            Self::CreditNote => "credit_note",
            Self::CustomerPayment => "customer_payment",
            Self::CustomerRefund => "customer_refund",
            Self::WholesalePayment => "wholesale_payment",
            Self::WholesaleRefund => "wholesale_refund",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the year appears in a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearStyle {
    /// `YY`, e.g. `26`.
    TwoDigit,
    /// `YYYY`, e.g. `2026`.
    FourDigit,
}

impl YearStyle {
    fn width(self) -> usize {
        match self {
            Self::TwoDigit => 2,
            Self::FourDigit => 4,
        }
    }
}

/// Calendar month that scopes a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year, e.g. 2026.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
}

impl Period {
    /// Creates a period, rejecting months outside 1..=12 and years that do
    /// not print as four digits.
    pub fn new(year: i32, month: u32) -> Result<Self, NumberingError> {
        if !(1..=12).contains(&month) || !(1000..=9999).contains(&year) {
            return Err(NumberingError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// Period containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Period prefix, e.g. `2601` or `202601`.
    #[must_use]
    pub fn format(&self, style: YearStyle) -> String {
        match style {
            YearStyle::TwoDigit => format!("{:02}{:02}", self.year.rem_euclid(100), self.month),
            YearStyle::FourDigit => format!("{:04}{:02}", self.year, self.month),
        }
    }
}

/// A fully formatted document number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentNumber {
    /// Document type, which fixes the prefix.
    pub doc_type: DocumentType,
    /// Issue period.
    pub period: Period,
    /// Sequence within `(doc_type, period)`, starting at 1.
    pub sequence: u32,
}

impl DocumentNumber {
    /// Creates a document number.
    #[must_use]
    pub const fn new(doc_type: DocumentType, period: Period, sequence: u32) -> Self {
        Self {
            doc_type,
            period,
            sequence,
        }
    }

    /// Parses a number such as `PM2601-0012`.
    ///
    /// Two-digit years are read as 20YY.
    pub fn parse(s: &str) -> Result<Self, NumberingError> {
        let invalid = || NumberingError::InvalidFormat(s.to_string());

        let (head, seq) = s.split_once('-').ok_or_else(invalid)?;
        if seq.len() < SEQUENCE_WIDTH || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sequence: u32 = seq.parse().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }

        let split = head
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (prefix, digits) = head.split_at(split);
        let doc_type = DocumentType::from_prefix(prefix)
            .ok_or_else(|| NumberingError::UnknownPrefix(prefix.to_string()))?;

        let year_width = doc_type.year_style().width();
        if digits.len() != year_width + 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let (year, month) = digits.split_at(year_width);
        let mut year: i32 = year.parse().map_err(|_| invalid())?;
        if year_width == 2 {
            year += 2000;
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Ok(Self::new(doc_type, Period::new(year, month)?, sequence))
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{:0width$}",
            self.doc_type.prefix(),
            self.period.format(self.doc_type.year_style()),
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for DocumentNumber {
    type Err = NumberingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
