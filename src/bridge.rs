//! The widget-facing interop bridge.
//!
//! [`InteropBridge`] is the single owner of every piece of shared listener
//! state for one UI session. Widgets attach with a [`WidgetSession`], register
//! behaviors against element ids, and receive
//! [`Notification`](crate::event::Notification)s over their
//! session channel after the host's events are [`pump`](InteropBridge::pump)ed.
//!
//! Teardown is best-effort and idempotent: unregistering an unknown id,
//! disposing a widget twice, or calling into a bridge whose listener module
//! has already been disposed are all silent no-ops.

use std::collections::{BTreeMap, BTreeSet};

use slotmap::{new_key_type, SlotMap};

use crate::config::InteropConfig;
use crate::dom::{Document, ScrollBehavior};
use crate::error::{IgnoreDisconnected, InteropError, Result};
use crate::event::{Category, HostEvent, WidgetSession};
use crate::geometry::{Orientation, Rect};
use crate::listener::{normalize_combo, Align, EventOutcome, ListenerModule};
use crate::registry::Registry;

new_key_type! {
    /// Handle to a widget attached to an [`InteropBridge`].
    pub struct WidgetId;
}

/// Opaque id of a registered keyboard shortcut.
pub type ShortcutId = String;

/// Which extent [`InteropBridge::element_dimension`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct WidgetRecord {
    session: WidgetSession,
    /// Every `(category, id)` this widget registered.
    touched: BTreeSet<(Category, String)>,
}

/// Lifetime of the lazily loaded listener module.
#[derive(Debug)]
enum ModuleSlot {
    Unloaded,
    Loaded(Box<ListenerModule>),
    Disposed,
}

// ---------------------------------------------------------------------------
// InteropBridge
// ---------------------------------------------------------------------------

/// Per-session owner of the document, the listener module and the mapping
/// from registrations back to widgets.
#[derive(Debug)]
pub struct InteropBridge {
    document: Document,
    config: InteropConfig,
    module: ModuleSlot,
    widgets: SlotMap<WidgetId, WidgetRecord>,
    bindings: BTreeMap<Category, Registry<WidgetId>>,
}

impl InteropBridge {
    /// Create a bridge over `document`. The listener module loads on first
    /// registration.
    pub fn new(document: Document, config: InteropConfig) -> Self {
        Self {
            document,
            config,
            module: ModuleSlot::Unloaded,
            widgets: SlotMap::with_key(),
            bindings: BTreeMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn config(&self) -> &InteropConfig {
        &self.config
    }

    /// The listener module, if it has been loaded and not disposed.
    pub fn module(&self) -> Option<&ListenerModule> {
        match &self.module {
            ModuleSlot::Loaded(module) => Some(module),
            _ => None,
        }
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        matches!(self.module, ModuleSlot::Disposed)
    }

    /// Load the module on first use; fail once the bridge is disposed.
    fn module_mut(&mut self) -> Result<&mut ListenerModule> {
        if matches!(self.module, ModuleSlot::Unloaded) {
            tracing::debug!("loading listener module");
            self.module = ModuleSlot::Loaded(Box::new(ListenerModule::new(&self.config)));
        }
        match &mut self.module {
            ModuleSlot::Loaded(module) => Ok(module),
            _ => Err(InteropError::Disconnected),
        }
    }

    /// Split borrow of the loaded module and the document.
    fn parts(&mut self) -> Result<(&mut ListenerModule, &mut Document)> {
        self.module_mut()?;
        match &mut self.module {
            ModuleSlot::Loaded(module) => Ok((module, &mut self.document)),
            _ => Err(InteropError::Disconnected),
        }
    }

    // ── Widgets ──────────────────────────────────────────────────────

    /// Attach a widget that will receive notifications over `session`.
    pub fn attach_widget(&mut self, session: WidgetSession) -> WidgetId {
        self.widgets.insert(WidgetRecord {
            session,
            touched: BTreeSet::new(),
        })
    }

    /// Whether `widget` is attached.
    pub fn is_attached(&self, widget: WidgetId) -> bool {
        self.widgets.contains_key(widget)
    }

    /// Number of attached widgets.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Record that `widget` owns `(category, id)`.
    fn bind(&mut self, widget: WidgetId, category: Category, id: &str) -> Result<()> {
        let record = self
            .widgets
            .get_mut(widget)
            .ok_or(InteropError::UnknownWidget)?;
        record.touched.insert((category, id.to_owned()));
        let previous = self.bindings.entry(category).or_default().insert(id, widget);
        if let Some(previous) = previous.filter(|&previous| previous != widget) {
            if let Some(former) = self.widgets.get_mut(previous) {
                former.touched.remove(&(category, id.to_owned()));
            }
            tracing::debug!(%category, id, "registration taken over by another widget");
        }
        Ok(())
    }

    /// Owner of `(category, id)`, if any.
    pub fn owner(&self, category: Category, id: &str) -> Option<WidgetId> {
        self.bindings
            .get(&category)
            .and_then(|registry| registry.get(id))
            .copied()
    }

    /// Number of live registrations in `category`.
    pub fn registration_count(&self, category: Category) -> usize {
        self.bindings.get(&category).map_or(0, Registry::len)
    }

    /// Drop the binding and the module registration for `(category, id)`.
    fn unregister(&mut self, category: Category, id: &str) -> Result<()> {
        let owner = self
            .bindings
            .get_mut(&category)
            .and_then(|registry| registry.remove(id));
        if let Some(record) = owner.and_then(|owner| self.widgets.get_mut(owner)) {
            record.touched.remove(&(category, id.to_owned()));
        }
        let (module, doc) = match self.module {
            // Nothing was ever registered, so nothing to remove.
            ModuleSlot::Unloaded => return Ok(()),
            _ => self.parts()?,
        };
        module.unregister(doc, category, id);
        Ok(())
    }

    /// Unregister every registration `widget` still owns and detach it.
    ///
    /// Unknown or already disposed widgets are a no-op.
    pub fn dispose_widget(&mut self, widget: WidgetId) {
        let Some(record) = self.widgets.get(widget) else {
            return;
        };
        let touched: Vec<_> = record.touched.iter().cloned().collect();
        for (category, id) in touched {
            if self.owner(category, &id) != Some(widget) {
                continue;
            }
            if let Err(err) = self.unregister(category, &id).ignore_disconnected() {
                tracing::warn!(%category, id = %id, %err, "failed to unregister during widget disposal");
            }
        }
        self.widgets.remove(widget);
        tracing::trace!("widget disposed");
    }

    /// Tear down the whole session: every widget, every registration, and
    /// the keyboard listener. A second call is a no-op.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        let widgets: Vec<_> = self.widgets.keys().collect();
        for widget in widgets {
            self.dispose_widget(widget);
        }
        if let ModuleSlot::Loaded(module) = &mut self.module {
            module.keyboard.detach();
        }
        self.bindings.clear();
        self.module = ModuleSlot::Disposed;
        tracing::debug!("interop bridge disposed");
    }

    // ── Click outside ────────────────────────────────────────────────

    /// Notify `widget` whenever a pointer-down lands outside `element_id`
    /// (and outside `trigger_id`, when given).
    pub fn register_click_outside(
        &mut self,
        widget: WidgetId,
        element_id: &str,
        trigger_id: Option<&str>,
    ) -> Result<()> {
        self.ensure_widget(widget)?;
        self.module_mut()?
            .click_outside
            .register(element_id, trigger_id);
        self.bind(widget, Category::ClickOutside, element_id)
    }

    pub fn unregister_click_outside(&mut self, element_id: &str) -> Result<()> {
        self.unregister_quietly(Category::ClickOutside, element_id)
    }

    // ── Drawer ───────────────────────────────────────────────────────

    /// Notify `widget` when the drawer `element_id` is swiped down to dismiss.
    pub fn register_drawer_swipe(&mut self, widget: WidgetId, element_id: &str) -> Result<()> {
        self.ensure_widget(widget)?;
        self.module_mut()?.drawer.register(element_id);
        self.bind(widget, Category::DrawerSwipe, element_id)
    }

    pub fn unregister_drawer_swipe(&mut self, element_id: &str) -> Result<()> {
        self.unregister_quietly(Category::DrawerSwipe, element_id)
    }

    // ── Carousel ─────────────────────────────────────────────────────

    /// Notify `widget` of swipes on, and scrolling of, the carousel track.
    pub fn register_carousel_swipe(
        &mut self,
        widget: WidgetId,
        element_id: &str,
        orientation: Orientation,
    ) -> Result<()> {
        self.ensure_widget(widget)?;
        self.module_mut()?.carousel.register(element_id, orientation);
        self.bind(widget, Category::CarouselSwipe, element_id)
    }

    pub fn unregister_carousel_swipe(&mut self, element_id: &str) -> Result<()> {
        self.unregister_quietly(Category::CarouselSwipe, element_id)
    }

    /// Scroll the carousel to its `index`-th slide.
    ///
    /// Returns `false` if the track or slide does not exist.
    pub fn carousel_scroll_to(
        &mut self,
        element_id: &str,
        index: usize,
        behavior: ScrollBehavior,
    ) -> Result<bool> {
        let (module, doc) = self.parts()?;
        Ok(module
            .carousel
            .scroll_to(doc, element_id, index, behavior, &mut module.outbox))
    }

    // ── Resize ───────────────────────────────────────────────────────

    /// Notify `widget` of drag deltas on the resize handle `element_id`.
    pub fn register_resize_handle(
        &mut self,
        widget: WidgetId,
        element_id: &str,
        direction: Orientation,
    ) -> Result<()> {
        self.ensure_widget(widget)?;
        self.module_mut()?.resize.register(element_id, direction);
        self.bind(widget, Category::ResizeHandle, element_id)
    }

    pub fn unregister_resize_handle(&mut self, element_id: &str) -> Result<()> {
        self.unregister_quietly(Category::ResizeHandle, element_id)
    }

    // ── Positioning & measurement ────────────────────────────────────

    /// Place floating `content_id` below `reference_id`; overflow is
    /// corrected on the next [`HostEvent::AnimationFrame`].
    ///
    /// Returns `false` if either element is missing.
    pub fn position_fixed(
        &mut self,
        content_id: &str,
        reference_id: &str,
        align: Align,
        match_width: bool,
    ) -> Result<bool> {
        let (module, doc) = self.parts()?;
        Ok(module
            .positioner
            .place(doc, content_id, reference_id, align, match_width))
    }

    /// Snapshot of an element's bounding box, `None` if it does not exist.
    pub fn element_rect(&self, element_id: &str) -> Option<Rect> {
        self.document.rect(element_id)
    }

    /// Width or height of an element, `0.0` if it does not exist.
    pub fn element_dimension(&self, element_id: &str, dimension: Dimension) -> f64 {
        self.element_rect(element_id)
            .map_or(0.0, |rect| match dimension {
                Dimension::Width => rect.width,
                Dimension::Height => rect.height,
            })
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Register a global shortcut for `widget`, returning its opaque id.
    pub fn register_shortcut(
        &mut self,
        widget: WidgetId,
        combo: &str,
        prevent_default: bool,
    ) -> Result<ShortcutId> {
        self.ensure_widget(widget)?;
        let normalized = normalize_combo(combo)?;
        let id = uuid::Uuid::new_v4().to_string();
        self.module_mut()?
            .keyboard
            .add_shortcut(&id, &normalized, prevent_default)?;
        self.bind(widget, Category::Shortcut, &id)?;
        tracing::trace!(id = %id, combo = %normalized, "shortcut registered");
        Ok(id)
    }

    pub fn unregister_shortcut(&mut self, id: &str) -> Result<()> {
        self.unregister_quietly(Category::Shortcut, id)
    }

    /// Detach the keyboard listener and drop every shortcut.
    pub fn unregister_keyboard_shortcuts(&mut self) -> Result<()> {
        let ids = self
            .bindings
            .get(&Category::Shortcut)
            .map(Registry::keys)
            .unwrap_or_default();
        for id in ids {
            self.unregister_quietly(Category::Shortcut, &id)?;
        }
        if let ModuleSlot::Loaded(module) = &mut self.module {
            module.keyboard.detach();
        }
        Ok(())
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Forward a host event to the listener module.
    ///
    /// Before the module loads, and after disposal, no listener is attached
    /// and the event passes through untouched.
    pub fn handle_event(&mut self, event: &HostEvent) -> EventOutcome {
        match &mut self.module {
            ModuleSlot::Loaded(module) => module.handle_event(&mut self.document, event),
            _ => EventOutcome::default(),
        }
    }

    /// Deliver every queued notification to its owning widget.
    ///
    /// Each record is resolved against the live bindings at delivery time;
    /// records for ids unregistered since they were queued are dropped, as
    /// are deliveries to widgets whose session has closed. Returns the
    /// number delivered.
    pub fn pump(&mut self) -> usize {
        let ModuleSlot::Loaded(module) = &mut self.module else {
            return 0;
        };
        let mut delivered = 0;
        while let Some(notification) = module.outbox.pop() {
            let Some(record) = self
                .bindings
                .get(&notification.category)
                .and_then(|registry| registry.get(&notification.id))
                .and_then(|&owner| self.widgets.get(owner))
            else {
                tracing::trace!(category = %notification.category, id = %notification.id, "dropping notification for unregistered id");
                continue;
            };
            match record.session.notify(notification).ignore_disconnected() {
                Ok(Some(())) => delivered += 1,
                Ok(None) => {}
                Err(err) => tracing::warn!(%err, "notification delivery failed"),
            }
        }
        delivered
    }

    /// [`handle_event`](Self::handle_event) followed by [`pump`](Self::pump).
    pub fn dispatch(&mut self, event: &HostEvent) -> EventOutcome {
        let outcome = self.handle_event(event);
        self.pump();
        outcome
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn ensure_widget(&self, widget: WidgetId) -> Result<()> {
        if self.widgets.contains_key(widget) {
            Ok(())
        } else {
            Err(InteropError::UnknownWidget)
        }
    }

    fn unregister_quietly(&mut self, category: Category, id: &str) -> Result<()> {
        self.unregister(category, id).ignore_disconnected()?;
        Ok(())
    }
}

impl Drop for InteropBridge {
    fn drop(&mut self) {
        self.dispose();
    }
}

// ===========================================================================
// Tests
// ===========================================================================
