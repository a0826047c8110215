// ⏰ Temporal Filter - Restrict the ledger to a year window
//
// Filtering never touches the table being scanned: it reads the full ledger
// and collects the surviving rows into a new, owned collection.

use crate::ledger::TransactionRecord;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Textual format of every date in the edge table
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn parse_transaction_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .with_context(|| format!("Invalid transaction date '{}' (expected DD/MM/YYYY)", date))
}

// ============================================================================
// YEAR RANGE
// ============================================================================

/// Inclusive `[start, end]` range of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            bail!("Invalid year range: start {} is after end {}", start, end);
        }
        Ok(YearRange { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange {
            start: 2010,
            end: 2019,
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// FILTERED LEDGER
// ============================================================================

/// Transactions that survived the year filter, plus the accounts they touch.
#[derive(Debug, Clone, Default)]
pub struct FilteredLedger {
    /// Surviving transactions in ledger order
    pub transactions: Vec<TransactionRecord>,

    /// Distinct source/target ids in first-appearance order
    pub accounts: Vec<String>,
}

impl FilteredLedger {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Largest amount in the window, `None` when nothing survived
    pub fn max_amount(&self) -> Option<f64> {
        self.transactions
            .iter()
            .map(|tx| tx.amount)
            .fold(None, |max, amount| match max {
                Some(m) if m >= amount => Some(m),
                _ => Some(amount),
            })
    }

    /// Accounts in the window plus the queried account.
    ///
    /// The queried account is appended when it has no surviving transactions.
    pub fn account_universe(&self, queried: &str) -> Vec<String> {
        let mut universe = self.accounts.clone();
        if !universe.iter().any(|id| id == queried) {
            universe.push(queried.to_string());
        }
        universe
    }
}

/// Keep every transaction whose year lies in `range` (both ends inclusive).
///
/// A malformed date anywhere in the ledger aborts the whole call.
pub fn filter_by_years(transactions: &[TransactionRecord], range: YearRange) -> Result<FilteredLedger> {
    let mut filtered = FilteredLedger::default();
    let mut seen = HashSet::new();

    for tx in transactions {
        let date = parse_transaction_date(&tx.date)
            .with_context(|| format!("Transaction {} -> {}", tx.source, tx.target))?;
        if !range.contains(date.year()) {
            continue;
        }

        for account in [&tx.source, &tx.target] {
            if seen.insert(account.clone()) {
                filtered.accounts.push(account.clone());
            }
        }
        filtered.transactions.push(tx.clone());
    }

    log::debug!(
        "year filter {}: {} of {} transactions kept, {} accounts",
        range,
        filtered.transactions.len(),
        transactions.len(),
        filtered.accounts.len()
    );

    Ok(filtered)
}
