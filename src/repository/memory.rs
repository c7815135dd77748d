use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::mapper::parse_storage_timestamp;
use crate::models::{Event, NewEvent};
use crate::repository::{EventRepository, StorageError};

#[derive(Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<u64, Event>,
}

/// Process-local substitute for the MySQL backend. Rows are listed in id
/// order and the filter match is case-sensitive.
#[derive(Default)]
pub struct InMemoryEventRepository {
    table: RwLock<Table>,
    failing: AtomicBool,
    failing_reads: AtomicBool,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation fails with `StorageError::Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// While set, `list` and `get_by_id` fail and writes still succeed.
    pub fn set_failing_reads(&self, failing: bool) {
        self.failing_reads.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("connection lost".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_readable(&self) -> Result<(), StorageError> {
        self.check_available()?;
        if self.failing_reads.load(Ordering::SeqCst) {
            Err(StorageError::Unavailable("connection lost".to_string()))
        } else {
            Ok(())
        }
    }
}

fn to_row(id: u64, event: &NewEvent) -> Event {
    Event {
        id,
        title: event.title.clone(),
        start: parse_storage_timestamp(&event.start),
        end: parse_storage_timestamp(&event.end),
        color: event.color.clone(),
        location: event.location.clone(),
        description: event.description.clone(),
        notify: event.notify,
        notify_time: event.notify_time,
        kind: event.kind.clone(),
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Event>, StorageError> {
        self.check_readable()?;
        let table = self.table.read().await;

        let events = match filter.filter(|f| !f.is_empty()) {
            Some(filter) => table
                .rows
                .values()
                .filter(|e| {
                    e.title.contains(filter)
                        || e.description.contains(filter)
                        || e.kind.contains(filter)
                })
                .cloned()
                .collect(),
            None => table.rows.values().cloned().collect(),
        };

        Ok(events)
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Event>, StorageError> {
        self.check_readable()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, event: &NewEvent) -> Result<u64, StorageError> {
        self.check_available()?;
        let mut table = self.table.write().await;

        table.next_id += 1;
        let id = table.next_id;
        table.rows.insert(id, to_row(id, event));

        Ok(id)
    }

    async fn update_by_id(&self, id: u64, event: &NewEvent) -> Result<u64, StorageError> {
        self.check_available()?;
        let mut table = self.table.write().await;

        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = to_row(id, event);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: u64) -> Result<u64, StorageError> {
        self.check_available()?;
        let removed = self.table.write().await.rows.remove(&id);

        Ok(u64::from(removed.is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event(title: &str, description: &str, kind: &str) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            start: "2024-01-01 09:00:00".to_string(),
            end: "2024-01-01 09:30:00".to_string(),
            color: "#3788d8".to_string(),
            location: "Room A".to_string(),
            description: description.to_string(),
            notify: false,
            notify_time: None,
            kind: kind.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryEventRepository::new();

        let first = repo.create(&new_event("a", "b", "Social")).await.unwrap();
        let second = repo.create(&new_event("c", "d", "Social")).await.unwrap();

        assert_eq!((first, second), (1, 2));
        let stored = repo.get_by_id(first).await.unwrap().unwrap();
        assert_eq!(stored.title, "a");
        assert!(stored.start.is_some());
    }

    #[tokio::test]
    async fn test_filter_matches_any_of_three_columns() {
        let repo = InMemoryEventRepository::new();
        repo.create(&new_event("Standup", "Daily sync", "Work")).await.unwrap();
        repo.create(&new_event("Lunch", "Team outing", "Social")).await.unwrap();
        repo.create(&new_event("Retro", "Sprint review", "Work")).await.unwrap();

        let titles = |events: Vec<Event>| events.into_iter().map(|e| e.title).collect::<Vec<_>>();

        assert_eq!(titles(repo.list(Some("Work")).await.unwrap()), ["Standup", "Retro"]);
        assert_eq!(titles(repo.list(Some("outing")).await.unwrap()), ["Lunch"]);
        assert_eq!(titles(repo.list(Some("Lun")).await.unwrap()), ["Lunch"]);
        assert!(repo.list(Some("nothing")).await.unwrap().is_empty());
        assert_eq!(repo.list(Some("")).await.unwrap().len(), 3);
        assert_eq!(repo.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_affected_rows() {
        let repo = InMemoryEventRepository::new();
        let id = repo.create(&new_event("a", "b", "Social")).await.unwrap();

        assert_eq!(repo.update_by_id(id, &new_event("z", "b", "Work")).await.unwrap(), 1);
        assert_eq!(repo.update_by_id(99, &new_event("z", "b", "Work")).await.unwrap(), 0);
        assert!(repo.get_by_id(99).await.unwrap().is_none());
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().kind, "Work");

        assert_eq!(repo.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(repo.delete_by_id(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let repo = InMemoryEventRepository::new();
        repo.set_failing(true);

        assert!(matches!(
            repo.list(None).await,
            Err(StorageError::Unavailable(_))
        ));

        repo.set_failing(false);
        assert!(repo.list(None).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_reads_still_accept_writes() {
        let repo = InMemoryEventRepository::new();
        repo.set_failing_reads(true);

        let id = repo.create(&new_event("a", "b", "Social")).await.unwrap();
        assert!(repo.get_by_id(id).await.is_err());
        assert!(repo.list(None).await.is_err());

        repo.set_failing_reads(false);
        assert!(repo.get_by_id(id).await.unwrap().is_some());
    }
}
