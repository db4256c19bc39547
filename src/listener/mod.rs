//! The shared listener module.
//!
//! [`ListenerModule`] owns the DOM-side registries of every behavior category
//! and the attach state of their document-level listeners. It turns
//! [`HostEvent`]s into [`Notification`](crate::event::Notification) records
//! in its [`Outbox`]; it never calls widget code directly.

pub mod click_outside;
pub mod gesture;
pub mod keyboard;
pub mod position;
pub mod resize;

pub use click_outside::ClickOutsideTracker;
pub use gesture::{CarouselSwipe, DrawerState, DrawerSwipe, GestureSession};
pub use keyboard::{normalize_combo, Combo, KeyboardDispatcher};
pub use position::{Align, FloatingPositioner};
pub use resize::ResizeController;

use crate::config::InteropConfig;
use crate::dom::Document;
use crate::event::{Category, HostEvent, Outbox};

// ---------------------------------------------------------------------------
// EventOutcome
// ---------------------------------------------------------------------------

/// What the host should do after forwarding one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Suppress the browser's default action for the event.
    pub default_prevented: bool,
    /// Notifications queued by this event.
    pub notifications: usize,
}

// ---------------------------------------------------------------------------
// ListenerModule
// ---------------------------------------------------------------------------

/// Every shared listener, plus the queue of records they produced.
#[derive(Debug)]
pub struct ListenerModule {
    pub click_outside: ClickOutsideTracker,
    pub drawer: DrawerSwipe,
    pub carousel: CarouselSwipe,
    pub resize: ResizeController,
    pub keyboard: KeyboardDispatcher,
    pub positioner: FloatingPositioner,
    pub outbox: Outbox,
}

impl ListenerModule {
    /// Create a module with every listener detached and empty.
    pub fn new(config: &InteropConfig) -> Self {
        Self {
            click_outside: ClickOutsideTracker::new(),
            drawer: DrawerSwipe::new(config.drawer_dismiss_threshold),
            carousel: CarouselSwipe::new(config.swipe_threshold),
            resize: ResizeController::new(),
            keyboard: KeyboardDispatcher::new(),
            positioner: FloatingPositioner::new(config.floating_gap, config.viewport_margin),
            outbox: Outbox::new(),
        }
    }

    /// Whether the listener for `category` is currently live.
    ///
    /// Click-outside is live for the module's whole lifetime. Touch
    /// listeners and resize listeners are live while they have
    /// registrations. Keyboard follows its explicit attach/detach.
    pub fn is_listening(&self, category: Category) -> bool {
        match category {
            Category::ClickOutside => true,
            Category::DrawerSwipe => !self.drawer.is_empty(),
            Category::CarouselSwipe => !self.carousel.is_empty(),
            Category::ResizeHandle => self.resize.is_attached(),
            Category::Shortcut => self.keyboard.is_attached(),
        }
    }

    /// Remove a registration from its category. Returns whether it existed.
    ///
    /// Also drops any record for it that is still waiting in the outbox.
    pub fn unregister(&mut self, doc: &mut Document, category: Category, id: &str) -> bool {
        let existed = match category {
            Category::ClickOutside => self.click_outside.unregister(id),
            Category::DrawerSwipe => self.drawer.unregister(id),
            Category::CarouselSwipe => self.carousel.unregister(id),
            Category::ResizeHandle => self.resize.unregister(doc, id),
            Category::Shortcut => self.keyboard.remove_shortcut(id),
        };
        self.outbox.discard(category, id);
        existed
    }

    /// Route one host event through every interested listener.
    pub fn handle_event(&mut self, doc: &mut Document, event: &HostEvent) -> EventOutcome {
        let before = self.outbox.pending_count();
        let mut outcome = EventOutcome::default();

        match event {
            HostEvent::PointerDown { target, point } => {
                self.click_outside
                    .handle_pointer_down(doc, *target, &mut self.outbox);
                if self.resize.pointer_down(doc, *target, *point) {
                    // Keeps the drag from selecting text.
                    outcome.default_prevented = true;
                }
            }
            HostEvent::PointerMove { point } => {
                self.resize.pointer_move(*point, &mut self.outbox);
            }
            HostEvent::PointerUp { .. } => {
                self.resize.pointer_up(doc, &mut self.outbox);
            }
            HostEvent::Touch {
                target,
                phase,
                point,
            } => {
                self.drawer
                    .handle_touch(doc, *target, *phase, *point, &mut self.outbox);
                self.carousel
                    .handle_touch(doc, *target, *phase, *point, &mut self.outbox);
            }
            HostEvent::Scroll { target } => {
                self.carousel.handle_scroll(doc, *target, &mut self.outbox);
            }
            HostEvent::KeyDown(key) => {
                outcome.default_prevented = self.keyboard.handle_keydown(key, &mut self.outbox);
            }
            HostEvent::AnimationFrame => {
                self.positioner.on_frame(doc);
            }
        }

        outcome.notifications = self.outbox.pending_count() - before;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;
    use crate::event::{KeyboardEvent, Modifiers, Payload};
    use crate::geometry::{Orientation, Point, Rect};

    fn module() -> ListenerModule {
        ListenerModule::new(&InteropConfig::default())
    }

    #[test]
    fn new_module_listens_only_for_clicks() {
        let m = module();
        assert!(m.is_listening(Category::ClickOutside));
        assert!(!m.is_listening(Category::DrawerSwipe));
        assert!(!m.is_listening(Category::CarouselSwipe));
        assert!(!m.is_listening(Category::ResizeHandle));
        assert!(!m.is_listening(Category::Shortcut));
    }

    #[test]
    fn pointer_down_feeds_click_outside_and_resize() {
        let mut doc = Document::default();
        let body = doc.insert(ElementData::new().with_id("body"));
        let handle = doc.insert_child(body, ElementData::new().with_id("handle"));
        doc.insert_child(body, ElementData::new().with_id("menu"));

        let mut m = module();
        m.click_outside.register("menu", None);
        m.resize.register("handle", Orientation::Horizontal);

        let outcome = m.handle_event(
            &mut doc,
            &HostEvent::PointerDown {
                target: handle,
                point: Point::new(10.0, 0.0),
            },
        );
        assert_eq!(outcome.notifications, 1);
        assert!(outcome.default_prevented);
        assert!(m.resize.is_dragging());
        assert_eq!(m.outbox.pop().unwrap().payload, Payload::Outside);
    }

    #[test]
    fn keydown_reports_default_prevented() {
        let mut doc = Document::default();
        let mut m = module();
        m.keyboard.add_shortcut("id-1", "ctrl+s", true).unwrap();
        let outcome = m.handle_event(
            &mut doc,
            &HostEvent::KeyDown(KeyboardEvent::new("s", "KeyS").with_modifiers(Modifiers::CTRL)),
        );
        assert_eq!(
            outcome,
            EventOutcome {
                default_prevented: true,
                notifications: 1
            }
        );
    }

    #[test]
    fn unregister_discards_queued_records() {
        let mut doc = Document::default();
        let body = doc.insert(ElementData::new().with_id("body"));
        let other = doc.insert_child(body, ElementData::new());
        doc.insert_child(body, ElementData::new().with_id("menu"));

        let mut m = module();
        m.click_outside.register("menu", None);
        m.handle_event(
            &mut doc,
            &HostEvent::PointerDown {
                target: other,
                point: Point::default(),
            },
        );
        assert_eq!(m.outbox.pending_count(), 1);
        assert!(m.unregister(&mut doc, Category::ClickOutside, "menu"));
        assert!(m.outbox.is_empty());
        assert!(!m.unregister(&mut doc, Category::ClickOutside, "menu"));
    }

    #[test]
    fn animation_frame_runs_positioner() {
        let mut doc = Document::default();
        doc.insert(
            ElementData::new()
                .with_id("ref")
                .with_rect(Rect::new(0.0, 740.0, 50.0, 20.0)),
        );
        let panel = doc.insert(
            ElementData::new()
                .with_id("panel")
                .with_rect(Rect::new(0.0, 0.0, 100.0, 100.0)),
        );
        let mut m = module();
        assert!(m.positioner.place(&mut doc, "panel", "ref", Align::Start, false));
        m.handle_event(&mut doc, &HostEvent::AnimationFrame);
        assert_eq!(doc.get(panel).unwrap().rect.y, 636.0);
    }
}
