//! Headless testing framework.
//!
//! Use the [`Pilot`] to drive an [`InteropBridge`](crate::bridge::InteropBridge)
//! over an in-memory document, and [`received`] to collect what a widget was
//! sent.

pub mod pilot;

pub use pilot::{received, Pilot};
