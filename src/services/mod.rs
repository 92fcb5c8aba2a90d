// Service exports
pub mod appwrite;
pub mod ports;
pub mod records;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError};
pub use ports::{MatchRecordStore, Notifier, PortError, ProfileDirectory, Severity};
pub use records::{PostgresRecordStore, RecordStoreError};
