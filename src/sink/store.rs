use std::sync::Arc;

use async_trait::async_trait;

use crate::models::Record;
use crate::sink::PersistSummary;

/// The job-board database, seen as a row writer. Tables are owned by the
/// job-board API; the crawler only inserts.
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert(
        &self,
        table: &'static str,
        row: Vec<(&'static str, String)>,
    ) -> Result<(), sqlx::Error>;
}

pub struct DbSink {
    store: Arc<dyn Store>,
}

impl DbSink {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// One insert per record. A failed insert is logged and skipped;
    /// rows already written stay written.
    pub async fn insert_all<R: Record>(&self, table: &'static str, records: &[R]) -> PersistSummary {
        let mut summary = PersistSummary::default();

        for record in records {
            match self.store.insert(table, record.row()).await {
                Ok(()) => summary.written += 1,
                Err(e) => {
                    tracing::warn!("Failed to insert into {table}: {e}");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            "Inserted {} rows into {table} ({} failed)",
            summary.written,
            summary.failed
        );
        summary
    }
}
