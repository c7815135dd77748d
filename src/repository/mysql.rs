use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

use crate::config::Config;
use crate::models::{Event, NewEvent};
use crate::repository::{EventRepository, StorageError};

const SELECT_EVENTS: &str = "SELECT id, title, `start`, `end`, color, location, description, \
     notify, notify_time, `type` FROM eventos";

/// Opens the connection pool. Callers beyond `db_max_connections` wait for a
/// free connection.
pub async fn create_pool(config: &Config) -> Result<MySqlPool, StorageError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .test_before_acquire(true)
        .connect_with(config.connect_options())
        .await?;

    Ok(pool)
}

#[derive(Clone)]
pub struct MySqlEventRepository {
    pool: MySqlPool,
}

impl MySqlEventRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for MySqlEventRepository {
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Event>, StorageError> {
        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            let events = sqlx::query_as::<_, Event>(SELECT_EVENTS)
                .fetch_all(&self.pool)
                .await?;
            return Ok(events);
        };

        let pattern = like_pattern(filter);
        let sql = format!("{SELECT_EVENTS} WHERE title LIKE ? OR description LIKE ? OR `type` LIKE ?");
        let events = sqlx::query_as::<_, Event>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Event>, StorageError> {
        let event = sqlx::query_as::<_, Event>(&format!("{SELECT_EVENTS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    async fn create(&self, event: &NewEvent) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO eventos (title, `start`, `end`, color, location, description, notify, notify_time, `type`) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.title)
        .bind(&event.start)
        .bind(&event.end)
        .bind(&event.color)
        .bind(&event.location)
        .bind(&event.description)
        .bind(event.notify)
        .bind(event.notify_time)
        .bind(&event.kind)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn update_by_id(&self, id: u64, event: &NewEvent) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "UPDATE eventos SET title = ?, `start` = ?, `end` = ?, color = ?, location = ?, \
             description = ?, notify = ?, notify_time = ?, `type` = ? WHERE id = ?",
        )
        .bind(&event.title)
        .bind(&event.start)
        .bind(&event.end)
        .bind(&event.color)
        .bind(&event.location)
        .bind(&event.description)
        .bind(event.notify)
        .bind(event.notify_time)
        .bind(&event.kind)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: u64) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM eventos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Wraps `filter` for a substring `LIKE`, escaping its wildcard characters.
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
