use std::sync::Arc;

use crate::repository::EventRepository;

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
}

impl AppState {
    pub fn new(events: Arc<dyn EventRepository>) -> Self {
        Self { events }
    }
}
