//! Notification records, the outbox queue, and widget sessions.
//!
//! The listener module never calls into widget code. It emits a
//! [`Notification`] `(category, id, payload)` into the [`Outbox`]; the bridge
//! drains the outbox, resolves each record against its live bindings, and
//! forwards it over the owning widget's [`WidgetSession`].

use std::collections::VecDeque;
use std::fmt;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{InteropError, Result};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Behavior category a registration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    ClickOutside,
    DrawerSwipe,
    CarouselSwipe,
    ResizeHandle,
    Shortcut,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ClickOutside => "click-outside",
            Self::DrawerSwipe => "drawer-swipe",
            Self::CarouselSwipe => "carousel-swipe",
            Self::ResizeHandle => "resize-handle",
            Self::Shortcut => "shortcut",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Direction reported by a carousel swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Prev,
    Next,
}

impl SwipeDirection {
    /// Wire name: `"prev"` or `"next"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prev => "prev",
            Self::Next => "next",
        }
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    /// A pointer-down landed outside the element and its trigger.
    Outside,
    /// A drawer was swiped down past the dismiss threshold.
    Dismiss,
    /// A carousel swipe in the given direction.
    Swipe(SwipeDirection),
    /// A carousel scrolled.
    ScrollPosition { position: f64, max: f64 },
    /// Incremental resize drag along the handle's axis.
    Resize { delta: f64 },
    /// The resize drag finished.
    ResizeEnd,
    /// A registered shortcut matched.
    Shortcut,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// One dispatch record: `(category, id, payload)`.
///
/// `id` is the element id for element categories and the shortcut id for
/// [`Category::Shortcut`].
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub category: Category,
    pub id: String,
    pub payload: Payload,
}

impl Notification {
    pub fn new(category: Category, id: impl Into<String>, payload: Payload) -> Self {
        Self {
            category,
            id: id.into(),
            payload,
        }
    }

    /// Whether this record is for `(category, id)`.
    pub fn is_for(&self, category: Category, id: &str) -> bool {
        self.category == category && self.id == id
    }
}

// ---------------------------------------------------------------------------
// Outbox
// ---------------------------------------------------------------------------

/// FIFO queue of notifications produced while handling host events.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<Notification>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a notification for later delivery.
    pub fn push(&mut self, notification: Notification) {
        self.queue.push_back(notification);
    }

    /// Take the oldest pending notification.
    pub fn pop(&mut self) -> Option<Notification> {
        self.queue.pop_front()
    }

    /// Drain everything pending, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.queue.drain(..).collect()
    }

    /// Drop every pending notification for `(category, id)`.
    pub fn discard(&mut self, category: Category, id: &str) {
        self.queue
            .retain(|n| !n.is_for(category, id));
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WidgetSession
// ---------------------------------------------------------------------------

/// Sending half of a widget's notification channel.
///
/// The widget's logic owns the receiver. Once it drops the receiver the
/// session is disconnected and every delivery reports
/// [`InteropError::Disconnected`].
#[derive(Debug, Clone)]
pub struct WidgetSession {
    tx: UnboundedSender<Notification>,
}

impl WidgetSession {
    /// Open a session, returning it with the widget-side receiver.
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver a notification to the widget.
    pub fn notify(&self, notification: Notification) -> Result<()> {
        self.tx
            .send(notification)
            .map_err(|_| InteropError::Disconnected)
    }

    /// Whether the widget side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn outside(id: &str) -> Notification {
        Notification::new(Category::ClickOutside, id, Payload::Outside)
    }

    // ── Outbox ───────────────────────────────────────────────────────

    #[test]
    fn outbox_preserves_order() {
        let mut outbox = Outbox::new();
        outbox.push(outside("a"));
        outbox.push(outside("b"));
        outbox.push(outside("c"));
        assert_eq!(outbox.pending_count(), 3);

        assert_eq!(outbox.pop().unwrap().id, "a");
        let rest: Vec<_> = outbox.drain().into_iter().map(|n| n.id).collect();
        assert_eq!(rest, vec!["b", "c"]);
        assert!(outbox.is_empty());
    }

    #[test]
    fn outbox_discard_matches_category_and_id() {
        let mut outbox = Outbox::new();
        outbox.push(outside("menu"));
        outbox.push(Notification::new(Category::DrawerSwipe, "menu", Payload::Dismiss));
        outbox.push(outside("other"));
        outbox.discard(Category::ClickOutside, "menu");

        let left: Vec<_> = outbox.drain();
        assert_eq!(left.len(), 2);
        assert_eq!(left[0].category, Category::DrawerSwipe);
        assert_eq!(left[1].id, "other");
    }

    // ── WidgetSession ────────────────────────────────────────────────

    #[test]
    fn session_delivers() {
        let (session, mut rx) = WidgetSession::channel();
        session.notify(outside("menu")).unwrap();
        assert_eq!(rx.try_recv().unwrap(), outside("menu"));
        assert!(!session.is_closed());
    }

    #[test]
    fn dropped_receiver_is_disconnected() {
        let (session, rx) = WidgetSession::channel();
        drop(rx);
        assert!(session.is_closed());
        assert_eq!(session.notify(outside("menu")), Err(InteropError::Disconnected));
    }

    #[tokio::test]
    async fn receiver_awaits_notifications() {
        let (session, mut rx) = WidgetSession::channel();
        session
            .notify(Notification::new(
                Category::CarouselSwipe,
                "track",
                Payload::Swipe(SwipeDirection::Next),
            ))
            .unwrap();
        let got = rx.recv().await.unwrap();
        assert_eq!(got.payload, Payload::Swipe(SwipeDirection::Next));
    }

    // ── Display ──────────────────────────────────────────────────────

    #[test]
    fn names() {
        assert_eq!(Category::ResizeHandle.to_string(), "resize-handle");
        assert_eq!(SwipeDirection::Prev.as_str(), "prev");
        assert_eq!(SwipeDirection::Next.as_str(), "next");
    }
}
