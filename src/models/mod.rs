pub mod company;
pub mod listing;
pub mod station;

use serde::Serialize;

/// A record produced by one crawl run.
///
/// `Serialize` drives the CSV export (field names are the column labels);
/// `row` drives the database insert.
pub trait Record: Serialize + Send + Sync + 'static {
    /// Whether the required fields are present after trimming.
    fn is_complete(&self) -> bool;

    /// Column/value pairs for one insert into the profile's table.
    fn row(&self) -> Vec<(&'static str, String)>;
}

pub(crate) fn present(value: &str) -> bool {
    !value.trim().is_empty()
}
