// 📒 Ledger - Transaction and account tables
// The read side of the pipeline: CSV rows in, immutable records out.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

// ============================================================================
// RECORDS
// ============================================================================

/// One money transfer between two accounts.
///
/// The date stays in its textual `DD/MM/YYYY` form so hover text shows it
/// exactly as the dataset spells it; the temporal filter parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "Source")]
    pub source: String,

    #[serde(rename = "Target")]
    pub target: String,

    #[serde(rename = "TransactionAmt")]
    pub amount: f64,

    #[serde(rename = "Date")]
    pub date: String,
}

impl TransactionRecord {
    pub fn new(source: &str, target: &str, amount: f64, date: &str) -> Self {
        TransactionRecord {
            source: source.to_string(),
            target: target.to_string(),
            amount,
            date: date.to_string(),
        }
    }
}

/// Account metadata row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "Account")]
    pub id: String,

    #[serde(rename = "CustomerName")]
    pub customer_name: String,

    #[serde(rename = "Type")]
    pub account_type: String,
}

impl AccountRecord {
    pub fn new(id: &str, customer_name: &str, account_type: &str) -> Self {
        AccountRecord {
            id: id.to_string(),
            customer_name: customer_name.to_string(),
            account_type: account_type.to_string(),
        }
    }
}

// ============================================================================
// ACCOUNT DIRECTORY
// ============================================================================

/// Account metadata keyed by account id.
///
/// Later rows overwrite earlier rows with the same id.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory {
    accounts: HashMap<String, AccountRecord>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        AccountDirectory {
            accounts: HashMap::new(),
        }
    }

    pub fn register(&mut self, account: AccountRecord) {
        self.accounts.insert(account.id.clone(), account);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&AccountRecord> {
        self.accounts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accounts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FromIterator<AccountRecord> for AccountDirectory {
    fn from_iter<I: IntoIterator<Item = AccountRecord>>(iter: I) -> Self {
        let mut directory = AccountDirectory::new();
        for account in iter {
            directory.register(account);
        }
        directory
    }
}

// ============================================================================
// CSV LOADING
// ============================================================================

pub fn load_transactions<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut transactions = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let record: TransactionRecord = result
            .with_context(|| format!("Failed to deserialize transaction row {}", row + 1))?;
        transactions.push(record);
    }

    Ok(transactions)
}

pub fn load_accounts<R: Read>(reader: R) -> Result<AccountDirectory> {
    let mut rdr = csv::Reader::from_reader(reader);

    let mut directory = AccountDirectory::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let record: AccountRecord =
            result.with_context(|| format!("Failed to deserialize account row {}", row + 1))?;
        directory.register(record);
    }

    Ok(directory)
}

pub fn load_transactions_csv(csv_path: &Path) -> Result<Vec<TransactionRecord>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open edge CSV file {}", csv_path.display()))?;
    load_transactions(file)
}

pub fn load_accounts_csv(csv_path: &Path) -> Result<AccountDirectory> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open node CSV file {}", csv_path.display()))?;
    load_accounts(file)
}

// ============================================================================
// DATA SOURCES
// ============================================================================

/// DataSource - where the two tables come from
///
/// Every pipeline call asks for fresh tables; implementations must not hand
/// out state that a caller could mutate behind another caller's back.
pub trait DataSource: Send + Sync {
    fn load_transactions(&self) -> Result<Vec<TransactionRecord>>;

    fn load_accounts(&self) -> Result<AccountDirectory>;
}

/// Reads both CSV files from disk on every call.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    pub edges_path: PathBuf,
    pub nodes_path: PathBuf,
}

impl CsvDataSource {
    pub fn new(edges_path: impl Into<PathBuf>, nodes_path: impl Into<PathBuf>) -> Self {
        CsvDataSource {
            edges_path: edges_path.into(),
            nodes_path: nodes_path.into(),
        }
    }
}

impl DataSource for CsvDataSource {
    fn load_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let transactions = load_transactions_csv(&self.edges_path)?;
        log::info!(
            "loaded {} transactions from {}",
            transactions.len(),
            self.edges_path.display()
        );
        Ok(transactions)
    }

    fn load_accounts(&self) -> Result<AccountDirectory> {
        let accounts = load_accounts_csv(&self.nodes_path)?;
        log::info!(
            "loaded {} accounts from {}",
            accounts.len(),
            self.nodes_path.display()
        );
        Ok(accounts)
    }
}

/// Tables already in memory. Hands out copies.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    transactions: Vec<TransactionRecord>,
    accounts: Vec<AccountRecord>,
}

impl InMemoryDataSource {
    pub fn new(transactions: Vec<TransactionRecord>, accounts: Vec<AccountRecord>) -> Self {
        InMemoryDataSource {
            transactions,
            accounts,
        }
    }
}

impl DataSource for InMemoryDataSource {
    fn load_transactions(&self) -> Result<Vec<TransactionRecord>> {
        Ok(self.transactions.clone())
    }

    fn load_accounts(&self) -> Result<AccountDirectory> {
        Ok(self.accounts.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: &str = "\
Source,Target,TransactionAmt,Date
A0001,A0002,100.5,01/01/2015
A0002,A0003,50,12/06/2016
";

    const NODES: &str = "\
Account,CustomerName,Type
A0001,Alice,Checking
A0002,Bob,Savings
A0002,Robert,Savings
";

    #[test]
    fn test_load_transactions_from_csv_text() {
        let transactions = load_transactions(EDGES.as_bytes()).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions[0],
            TransactionRecord::new("A0001", "A0002", 100.5, "01/01/2015")
        );
        assert_eq!(transactions[1].amount, 50.0);
        assert_eq!(transactions[1].date, "12/06/2016");
    }

    #[test]
    fn test_load_accounts_last_row_wins() {
        let directory = load_accounts(NODES.as_bytes()).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.find_by_id("A0001").unwrap().customer_name, "Alice");
        assert_eq!(directory.find_by_id("A0002").unwrap().customer_name, "Robert");
        assert!(directory.find_by_id("A9999").is_none());
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let csv = "Source,Target,TransactionAmt,Date\nA,B,lots,01/01/2015\n";
        let err = load_transactions(csv.as_bytes()).unwrap_err();

        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = CsvDataSource::new("/nonexistent/edges.csv", "/nonexistent/nodes.csv");

        assert!(source.load_transactions().is_err());
        assert!(source.load_accounts().is_err());
    }

    #[test]
    fn test_in_memory_source_hands_out_copies() {
        let source = InMemoryDataSource::new(
            vec![TransactionRecord::new("A", "B", 1.0, "01/01/2015")],
            vec![AccountRecord::new("A", "Alice", "Checking")],
        );

        let mut first = source.load_transactions().unwrap();
        first.clear();

        assert_eq!(source.load_transactions().unwrap().len(), 1);
        assert!(source.load_accounts().unwrap().contains("A"));
    }
}
