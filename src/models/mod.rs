pub mod event;
pub mod input;

pub use event::{Event, EventResponse, NewEvent};
pub use input::EventInput;
