use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Event, NewEvent};

pub mod memory;
pub mod mysql;

pub use memory::InMemoryEventRepository;
pub use mysql::MySqlEventRepository;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence port for the `eventos` table.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Returns every event, or only those whose title, description or type
    /// contains `filter` when a non-empty filter is given.
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Event>, StorageError>;

    async fn get_by_id(&self, id: u64) -> Result<Option<Event>, StorageError>;

    /// Inserts a row and returns its generated id.
    async fn create(&self, event: &NewEvent) -> Result<u64, StorageError>;

    /// Replaces every mutable column of the row. Returns the affected row count.
    async fn update_by_id(&self, id: u64, event: &NewEvent) -> Result<u64, StorageError>;

    /// Removes the row if present. Returns the affected row count.
    async fn delete_by_id(&self, id: u64) -> Result<u64, StorageError>;
}
