//! Archival message-store seam.
//!
//! The store itself (bag files, databases, whatever holds the log) is an
//! external collaborator. The loader only needs to enumerate record locations
//! inside a time window and read individual records back.

use thiserror::Error;

/// Error from the archival store.
///
/// The loader treats every store failure as recoverable: a failed window
/// listing becomes an empty window, a failed record read skips that record.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not service the request.
    #[error("archive access failed: {0}")]
    Access(String),
}

/// One timestamped record read back from the archive.
#[derive(Debug, Clone)]
pub struct Record<M> {
    /// Topic the record was logged on.
    pub topic: String,
    /// The decoded message payload.
    pub message: M,
    /// Receive timestamp, absolute seconds.
    pub stamp: f64,
}

/// Reader over an archival message store.
///
/// One store instance is shared across all loaders reading the same log,
/// behind a single lock; each loader acquires it for the duration of one call
/// only.
pub trait RecordStore {
    /// Decoded message type.
    type Message;

    /// Opaque handle to one record's position in the archive.
    type Location: Clone + Send;

    /// Ordered locations of the records on `topic` within `[start, end]`
    /// (absolute seconds).
    fn list_records_in_window(
        &mut self,
        topic: &str,
        start: f64,
        end: f64,
    ) -> Result<Vec<Self::Location>, StoreError>;

    /// Read one record.
    fn read_record(&mut self, location: &Self::Location) -> Result<Record<Self::Message>, StoreError>;
}
