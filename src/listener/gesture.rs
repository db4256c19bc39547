//! Touch gesture recognition: drawer dismiss-by-swipe and carousel swipes.
//!
//! Both recognizers consume the same touch plumbing. A touch is routed to
//! every registration whose element contains the touch target.

use crate::dom::{px, Document, ElementId, ScrollBehavior};
use crate::event::{Category, Notification, Outbox, Payload, SwipeDirection, TouchPhase};
use crate::geometry::{Orientation, Point};
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// GestureSession
// ---------------------------------------------------------------------------

/// Transient state for one touch sequence, start to end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start: Point,
    pub current: Point,
    pub dragging: bool,
}

impl GestureSession {
    /// Begin a sequence at `point`.
    pub fn begin(point: Point) -> Self {
        Self {
            start: point,
            current: point,
            dragging: true,
        }
    }

    /// Vertical travel since the start.
    pub fn delta_y(&self) -> f64 {
        self.current.y - self.start.y
    }
}

/// Ids of registrations whose element contains `target`.
fn containing<R>(registry: &Registry<R>, doc: &Document, target: ElementId) -> Vec<String> {
    registry
        .keys()
        .into_iter()
        .filter(|element_id| doc.contains_by_id(element_id, target))
        .collect()
}

// ---------------------------------------------------------------------------
// Drawer
// ---------------------------------------------------------------------------

/// Drawer gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerState {
    #[default]
    Idle,
    Dragging,
    /// The last sequence crossed the threshold and dismissed the drawer.
    Committed,
}

#[derive(Debug, Default)]
struct DrawerEntry {
    state: DrawerState,
    session: Option<GestureSession>,
}

/// Swipe-down-to-dismiss recognizer for drawers.
#[derive(Debug)]
pub struct DrawerSwipe {
    registry: Registry<DrawerEntry>,
    dismiss_threshold: f64,
}

impl DrawerSwipe {
    pub fn new(dismiss_threshold: f64) -> Self {
        Self {
            registry: Registry::new(),
            dismiss_threshold,
        }
    }

    /// Register (or reset) the drawer `element_id`.
    pub fn register(&mut self, element_id: &str) {
        self.registry.insert(element_id, DrawerEntry::default());
    }

    /// Remove the drawer registration. Returns whether one existed.
    pub fn unregister(&mut self, element_id: &str) -> bool {
        self.registry.remove(element_id).is_some()
    }

    pub fn is_registered(&self, element_id: &str) -> bool {
        self.registry.contains(element_id)
    }

    /// Current state of a drawer's recognizer.
    pub fn state(&self, element_id: &str) -> Option<DrawerState> {
        self.registry.get(element_id).map(|entry| entry.state)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Feed one touch event.
    pub fn handle_touch(
        &mut self,
        doc: &mut Document,
        target: ElementId,
        phase: TouchPhase,
        point: Point,
        outbox: &mut Outbox,
    ) {
        for element_id in containing(&self.registry, doc, target) {
            let Some(entry) = self.registry.get_mut(&element_id) else {
                continue;
            };
            match phase {
                TouchPhase::Start => {
                    entry.session = Some(GestureSession::begin(point));
                    entry.state = DrawerState::Dragging;
                    if let Some(el) = doc.element_mut(&element_id) {
                        el.set_style("transition", "none");
                    }
                }
                TouchPhase::Move => {
                    let Some(session) = entry.session.as_mut().filter(|s| s.dragging) else {
                        continue;
                    };
                    session.current = point;
                    let delta_y = session.delta_y();
                    if delta_y > 0.0 {
                        if let Some(el) = doc.element_mut(&element_id) {
                            el.set_style("transform", format!("translateY({})", px(delta_y)));
                        }
                    }
                }
                TouchPhase::End => {
                    let Some(mut session) = entry.session.take() else {
                        continue;
                    };
                    session.current = point;
                    let committed = session.delta_y() > self.dismiss_threshold;
                    if let Some(el) = doc.element_mut(&element_id) {
                        el.remove_style("transition");
                        if !committed {
                            el.remove_style("transform");
                        }
                    }
                    if committed {
                        entry.state = DrawerState::Committed;
                        tracing::trace!(element_id = %element_id, "drawer dismissed by swipe");
                        outbox.push(Notification::new(
                            Category::DrawerSwipe,
                            element_id,
                            Payload::Dismiss,
                        ));
                    } else {
                        entry.state = DrawerState::Idle;
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Carousel
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CarouselEntry {
    orientation: Orientation,
    session: Option<GestureSession>,
}

/// Swipe-direction and scroll-progress reporter for carousels.
#[derive(Debug)]
pub struct CarouselSwipe {
    registry: Registry<CarouselEntry>,
    swipe_threshold: f64,
}

impl CarouselSwipe {
    pub fn new(swipe_threshold: f64) -> Self {
        Self {
            registry: Registry::new(),
            swipe_threshold,
        }
    }

    /// Register (or replace) the carousel `element_id`.
    pub fn register(&mut self, element_id: &str, orientation: Orientation) {
        self.registry.insert(
            element_id,
            CarouselEntry {
                orientation,
                session: None,
            },
        );
    }

    /// Remove the carousel registration. Returns whether one existed.
    pub fn unregister(&mut self, element_id: &str) -> bool {
        self.registry.remove(element_id).is_some()
    }

    pub fn is_registered(&self, element_id: &str) -> bool {
        self.registry.contains(element_id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Feed one touch event. Swipes are decided on touch end only.
    pub fn handle_touch(
        &mut self,
        doc: &Document,
        target: ElementId,
        phase: TouchPhase,
        point: Point,
        outbox: &mut Outbox,
    ) {
        for element_id in containing(&self.registry, doc, target) {
            let Some(entry) = self.registry.get_mut(&element_id) else {
                continue;
            };
            match phase {
                TouchPhase::Start => entry.session = Some(GestureSession::begin(point)),
                TouchPhase::Move => {
                    if let Some(session) = entry.session.as_mut() {
                        session.current = point;
                    }
                }
                TouchPhase::End => {
                    let Some(mut session) = entry.session.take() else {
                        continue;
                    };
                    session.current = point;
                    let delta = session.current - session.start;
                    let along = delta.along(entry.orientation);
                    let across = delta.across(entry.orientation);
                    if along.abs() > across.abs() && along.abs() > self.swipe_threshold {
                        let direction = if along > 0.0 {
                            SwipeDirection::Prev
                        } else {
                            SwipeDirection::Next
                        };
                        outbox.push(Notification::new(
                            Category::CarouselSwipe,
                            element_id,
                            Payload::Swipe(direction),
                        ));
                    }
                }
            }
        }
    }

    /// Report the scroll position of a registered carousel that scrolled.
    ///
    /// Scroll events do not bubble, so only a registration on `target`
    /// itself reports. Every tick reports; there is no threshold.
    pub fn handle_scroll(&self, doc: &Document, target: ElementId, outbox: &mut Outbox) {
        let Some(data) = doc.get(target) else {
            return;
        };
        let Some(element_id) = data.id.as_deref() else {
            return;
        };
        let Some(entry) = self.registry.get(element_id) else {
            return;
        };
        outbox.push(Notification::new(
            Category::CarouselSwipe,
            element_id,
            Payload::ScrollPosition {
                position: data.scroll.position(entry.orientation),
                max: data.scroll.max_extent(entry.orientation),
            },
        ));
    }

    /// Scroll a carousel so its `index`-th child is at the leading edge.
    ///
    /// Uses the registered orientation, or horizontal for an unregistered
    /// element. Emits the resulting scroll report. Returns `false` when the
    /// element or child does not exist.
    pub fn scroll_to(
        &self,
        doc: &mut Document,
        element_id: &str,
        index: usize,
        behavior: ScrollBehavior,
        outbox: &mut Outbox,
    ) -> bool {
        let Some(track) = doc.find(element_id) else {
            return false;
        };
        let Some(&child) = doc.children(track).get(index) else {
            return false;
        };
        let orientation = self
            .registry
            .get(element_id)
            .map(|entry| entry.orientation)
            .unwrap_or_default();
        let (Some(track_data), Some(child_data)) = (doc.get(track), doc.get(child)) else {
            return false;
        };
        let offset = child_data.rect.origin().along(orientation)
            - track_data.rect.origin().along(orientation)
            + track_data.scroll.position(orientation);
        doc.scroll_to(track, orientation, offset, behavior);
        self.handle_scroll(doc, track, outbox);
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
