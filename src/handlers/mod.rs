pub mod events;

pub async fn index() -> &'static str {
    "Event management API"
}
