//! Connection capability used by the ledger reader and migration runner
//!
//! A provider only has to run statements, read history rows, and open
//! transactions. Dropping a [`HistoryTransaction`] without calling
//! [`HistoryTransaction::commit`] must roll it back, so an early `?` return
//! always releases the transaction.

use crate::errors::DriverResult;
use strata_core::dialect::{DatabaseKind, ParamStyle};
use strata_core::model::NewHistoryRow;

/// A history row as read from the database; any column may be null
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRow {
    pub installed_rank: Option<i64>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub script_type: Option<String>,
    pub script_name: Option<String>,
    pub checksum: Option<String>,
    pub installed_by: Option<String>,
    /// Raw timestamp text as returned by the driver
    pub installed_on: Option<String>,
    pub execution_time: Option<i64>,
    pub success: Option<bool>,
}

/// A database connection able to host a migration run
pub trait HistoryConnection {
    /// Kind of database behind this connection
    fn kind(&self) -> DatabaseKind;

    /// Run a statement outside of an explicit transaction
    fn execute(&mut self, sql: &str) -> DriverResult<()>;

    /// Run the history select and return its rows in result order
    fn query_history(&mut self, sql: &str) -> DriverResult<Vec<HistoryRow>>;

    /// Open a transaction
    fn transaction(&mut self) -> DriverResult<Box<dyn HistoryTransaction + '_>>;
}

/// An open transaction; rolled back on drop unless committed
pub trait HistoryTransaction {
    /// Execute raw script text as one batch
    fn execute_batch(&mut self, sql: &str) -> DriverResult<()>;

    /// Bind `row` into the dialect's insert statement and run it
    fn insert_history(
        &mut self,
        sql: &str,
        row: &NewHistoryRow,
        style: ParamStyle,
    ) -> DriverResult<usize>;

    fn commit(self: Box<Self>) -> DriverResult<()>;
}
