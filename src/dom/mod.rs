//! Headless document: slotmap-backed element arena with string-id lookup,
//! containment queries, inline styles, scroll state and fixed layout.

pub mod node;
pub mod tree;

pub use node::{px, ElementData, ElementId, Placement, ScrollBehavior, ScrollState};
pub use tree::Document;
