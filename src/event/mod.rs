//! Event system: host input events, notification records, widget sessions.

pub mod input;
pub mod notify;

pub use input::{HostEvent, KeyboardEvent, Modifiers, TouchPhase};
pub use notify::{Category, Notification, Outbox, Payload, SwipeDirection, WidgetSession};
