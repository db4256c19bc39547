//! # widget-interop
//!
//! A coordination layer between UI widgets and a host document.
//!
//! Widgets ask for DOM-level behaviors they cannot express themselves
//! (click-outside detection, drawer and carousel swipes, resize-handle drags,
//! floating placement with overflow correction, global keyboard shortcuts).
//! One shared listener module owns every registry and document-level listener
//! for the session; the [`bridge`] routes its notifications back to the widget
//! that registered, and tears everything down safely when widgets go away.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: slotmap-backed headless document with containment, inline styles, scroll state
//! - **[`event`]**: host input events, notification records, widget sessions
//! - **[`registry`]**: insertion-ordered per-category registration map
//! - **[`listener`]**: click-outside, gestures, resize, positioning, keyboard
//! - **[`bridge`]**: widget-facing API with lazy loading and idempotent teardown
//! - **[`config`]**: thresholds and spacing constants
//! - **[`error`]**: error type and disconnect-tolerant helpers
//! - **[`testing`]**: headless `Pilot` for driving a bridge in tests
//! - **[`geometry`]**: Point, Delta, Size, Rect primitives

// Foundation
pub mod config;
pub mod error;
pub mod geometry;

// Core systems
pub mod dom;
pub mod event;
pub mod registry;

// Listeners and the widget-facing bridge
pub mod bridge;
pub mod listener;

// Headless testing
pub mod testing;

pub use bridge::{Dimension, InteropBridge, ShortcutId, WidgetId};
pub use config::InteropConfig;
pub use error::{IgnoreDisconnected, InteropError, Result};
