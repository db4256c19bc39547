//! Pilot: programmatic interaction with a headless bridge.
//!
//! The `Pilot` wraps an [`InteropBridge`] over an in-memory [`Document`] and
//! provides methods to build elements, attach widgets, and simulate host input
//! (clicks, touch swipes, resize drags, key presses, animation frames). Every
//! simulated event is dispatched and pumped, so notifications are waiting on
//! the widget receivers as soon as the call returns.

use tokio::sync::mpsc::UnboundedReceiver;

use crate::bridge::{InteropBridge, WidgetId};
use crate::config::InteropConfig;
use crate::dom::{Document, ElementData, ElementId, ScrollState};
use crate::event::{HostEvent, KeyboardEvent, Modifiers, Notification, TouchPhase, WidgetSession};
use crate::geometry::{Point, Rect, Size};
use crate::listener::EventOutcome;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless bridge driver for testing.
///
/// # Examples
///
/// ```
/// use widget_interop::geometry::Rect;
/// use widget_interop::testing::{received, Pilot};
///
/// let mut pilot = Pilot::new(800.0, 600.0);
/// pilot.add_element(None, "menu", Rect::new(0.0, 0.0, 100.0, 100.0));
/// pilot.add_element(None, "page", Rect::new(0.0, 200.0, 800.0, 400.0));
///
/// let (widget, mut rx) = pilot.widget();
/// pilot.bridge_mut().register_click_outside(widget, "menu", None).unwrap();
/// pilot.click("page");
/// assert_eq!(received(&mut rx).len(), 1);
/// ```
#[derive(Debug)]
pub struct Pilot {
    bridge: InteropBridge,
    body: ElementId,
}

impl Pilot {
    /// Create a pilot whose document is a single `body` element covering a
    /// viewport of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_config(width, height, InteropConfig::default())
    }

    /// Like [`new`](Self::new) with custom thresholds.
    pub fn with_config(width: f64, height: f64, config: InteropConfig) -> Self {
        let mut doc = Document::new(Size::new(width, height));
        let body = doc.insert(
            ElementData::new()
                .with_id("body")
                .with_rect(Rect::new(0.0, 0.0, width, height)),
        );
        Self {
            bridge: InteropBridge::new(doc, config),
            body,
        }
    }

    // ── Document ─────────────────────────────────────────────────────

    /// Append an element under `parent` (the body when `None` or unknown).
    pub fn add_element(&mut self, parent: Option<&str>, id: &str, rect: Rect) -> ElementId {
        self.insert(parent, ElementData::new().with_id(id).with_rect(rect))
    }

    /// Append a scroll container under `parent`.
    pub fn add_scroller(
        &mut self,
        parent: Option<&str>,
        id: &str,
        rect: Rect,
        scroll: ScrollState,
    ) -> ElementId {
        self.insert(
            parent,
            ElementData::new()
                .with_id(id)
                .with_rect(rect)
                .with_scroll(scroll),
        )
    }

    fn insert(&mut self, parent: Option<&str>, data: ElementData) -> ElementId {
        let doc = self.bridge.document_mut();
        let parent = parent.and_then(|id| doc.find(id)).unwrap_or(self.body);
        doc.insert_child(parent, data)
    }

    /// Set an element's measured size, as the host's layout would.
    pub fn resize_element(&mut self, id: &str, width: f64, height: f64) {
        if let Some(element) = self.bridge.document_mut().element_mut(id) {
            element.rect.width = width;
            element.rect.height = height;
        }
    }

    // ── Widgets ──────────────────────────────────────────────────────

    /// Attach a widget, returning its id and notification receiver.
    pub fn widget(&mut self) -> (WidgetId, UnboundedReceiver<Notification>) {
        let (session, rx) = WidgetSession::channel();
        (self.bridge.attach_widget(session), rx)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Pointer-down at the center of element `id`.
    ///
    /// An unknown id dispatches nothing.
    pub fn click(&mut self, id: &str) -> EventOutcome {
        let Some((target, point)) = self.locate(id) else {
            return EventOutcome::default();
        };
        self.bridge
            .dispatch(&HostEvent::PointerDown { target, point })
    }

    /// A one-finger touch sequence on `id` from `from` to `to`.
    pub fn touch_swipe(&mut self, id: &str, from: Point, to: Point) {
        let Some(target) = self.bridge.document().find(id) else {
            return;
        };
        for (phase, point) in [
            (TouchPhase::Start, from),
            (TouchPhase::Move, to),
            (TouchPhase::End, to),
        ] {
            self.bridge.dispatch(&HostEvent::Touch {
                target,
                phase,
                point,
            });
        }
    }

    /// Press on `handle` at the first position, move through the rest, then
    /// release at the last.
    pub fn drag(&mut self, handle: &str, positions: &[Point]) -> EventOutcome {
        let (Some(target), Some(&first), Some(&last)) = (
            self.bridge.document().find(handle),
            positions.first(),
            positions.last(),
        ) else {
            return EventOutcome::default();
        };
        let outcome = self.bridge.dispatch(&HostEvent::PointerDown {
            target,
            point: first,
        });
        for &point in &positions[1..] {
            self.bridge.dispatch(&HostEvent::PointerMove { point });
        }
        self.bridge.dispatch(&HostEvent::PointerUp { point: last });
        outcome
    }

    /// A keydown with the given key, code, and modifiers.
    pub fn press(&mut self, key: &str, code: &str, modifiers: Modifiers) -> EventOutcome {
        let event = KeyboardEvent::new(key, code).with_modifiers(modifiers);
        self.bridge.dispatch(&HostEvent::KeyDown(event))
    }

    /// Set the scroll position of `id` and report a scroll event on it.
    pub fn scroll(&mut self, id: &str, left: f64, top: f64) {
        let Some(target) = self.bridge.document().find(id) else {
            return;
        };
        if let Some(element) = self.bridge.document_mut().get_mut(target) {
            element.scroll.left = left;
            element.scroll.top = top;
        }
        self.bridge.dispatch(&HostEvent::Scroll { target });
    }

    /// Run one animation frame.
    pub fn frame(&mut self) {
        self.bridge.dispatch(&HostEvent::AnimationFrame);
    }

    fn locate(&self, id: &str) -> Option<(ElementId, Point)> {
        let doc = self.bridge.document();
        let target = doc.find(id)?;
        let rect = doc.get(target)?.rect;
        Some((target, Point::new(rect.center_x(), rect.y + rect.height / 2.0)))
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the underlying bridge immutably.
    pub fn bridge(&self) -> &InteropBridge {
        &self.bridge
    }

    /// Borrow the underlying bridge mutably.
    pub fn bridge_mut(&mut self) -> &mut InteropBridge {
        &mut self.bridge
    }

    /// Borrow the document.
    pub fn document(&self) -> &Document {
        self.bridge.document()
    }

    /// Inline style `name` of element `id`.
    pub fn style(&self, id: &str, name: &str) -> Option<String> {
        self.document()
            .element(id)
            .and_then(|element| element.style(name))
            .map(str::to_owned)
    }
}

/// Everything currently waiting on `rx`, oldest first.
pub fn received(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}

// ===========================================================================
// Tests
// ===========================================================================
