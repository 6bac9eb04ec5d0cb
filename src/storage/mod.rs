//! On-disk state of a sync: season tables, combined tables, the
//! checked-games ledger and the run log.

pub mod aggregator;
pub mod csv_store;
pub mod ledger;
pub mod run_log;

pub use aggregator::{CombinedTable, combine_seasons};
pub use csv_store::{UpdateSummary, read_table, update_csv};
pub use ledger::Ledger;
pub use run_log::RunLog;
