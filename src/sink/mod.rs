pub mod export;
pub mod store;

use serde::Serialize;

use crate::crawler::ListingKind;
use crate::error::PersistenceError;
use crate::models::Record;

pub use export::CsvSink;
pub use store::{DbSink, Store};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersistSummary {
    pub written: usize,
    pub failed: usize,
}

/// Where a run's records end up. One mode per run.
pub enum Sink {
    Csv(CsvSink),
    Database(DbSink),
}

impl Sink {
    /// Persist one run's records. An empty run writes nothing.
    pub async fn persist<R: Record>(
        &self,
        kind: ListingKind,
        records: &[R],
    ) -> Result<PersistSummary, PersistenceError> {
        if records.is_empty() {
            tracing::warn!("No {kind} records collected; nothing persisted");
            return Ok(PersistSummary::default());
        }

        match self {
            Sink::Csv(file) => file.write(kind.csv_file(), records).await,
            Sink::Database(db) => Ok(db.insert_all(kind.table(), records).await),
        }
    }
}
