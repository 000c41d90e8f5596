//! Panel bookkeeping: identifier allocation, surface dispatch, lifecycle.
//!
//! The registry maps generated panel identifiers to host-managed surfaces.
//! It never owns a surface's true lifetime — it mirrors it: the host's
//! disposal callback removes the bookkeeping entry, and every operation
//! taking an identifier degrades to a `false`/`None` result when the
//! identifier is unknown.
//!
//! All registry state lives behind a single `Rc<RefCell<_>>` so disposal
//! callbacks can fire reentrantly (e.g. mid-`dispose_all`) without
//! corrupting an in-progress traversal; iteration always happens over a
//! snapshot of identifiers, and no borrow is held across a call into the
//! host.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::content;
use crate::host::{
    Delivery, PanelSurface, Placement, SurfaceConfig, SurfaceHost,
};
use crate::message::PanelMessage;
use crate::options::ViewerOptions;

// ── Identifiers ──────────────────────────────────────────────────────────

/// Opaque identifier for one preview panel.
///
/// Derived from the registry's monotonic counter; never reused within a
/// registry's lifetime, even after intervening disposals.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PanelId(String);

impl PanelId {
    fn from_serial(serial: u64) -> Self {
        Self(format!("preview-{serial}"))
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Registry ─────────────────────────────────────────────────────────────

/// Entries in insertion order plus the identifier counter.
struct PanelTable<S> {
    entries: Vec<(PanelId, Rc<S>)>,
    counter: u64,
}

impl<S> PanelTable<S> {
    fn remove(&mut self, id: &PanelId) -> bool {
        let Some(idx) = self.entries.iter().position(|(pid, _)| pid == id)
        else {
            return false;
        };
        let _ = self.entries.remove(idx);
        true
    }
}

/// Registry of open preview panels over one host environment.
///
/// Construct one at application startup and pass it by reference to all
/// call sites; a fresh instance per test gives full isolation.
pub struct PanelRegistry<H: SurfaceHost> {
    host: H,
    options: ViewerOptions,
    panels: Rc<RefCell<PanelTable<H::Surface>>>,
}

impl<H: SurfaceHost> PanelRegistry<H> {
    /// Create an empty registry over the given host capability.
    #[must_use]
    pub fn new(host: H, options: ViewerOptions) -> Self {
        Self {
            host,
            options,
            panels: Rc::new(RefCell::new(PanelTable {
                entries: Vec::new(),
                counter: 0,
            })),
        }
    }

    /// The options used when generating panel content.
    #[must_use]
    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    /// Create a new preview panel and return its identifier.
    ///
    /// Materializes a surface at `placement`, injects freshly generated
    /// content, and registers the disposal and visibility callbacks. By
    /// contract this does not fail; host materialization errors are the
    /// host's to report.
    pub fn create_panel(&mut self, placement: Placement) -> PanelId {
        let serial = {
            let mut table = self.panels.borrow_mut();
            table.counter += 1;
            table.counter
        };
        let id = PanelId::from_serial(serial);

        let config = SurfaceConfig {
            placement,
            ..Default::default()
        };
        let surface = Rc::new(
            self.host.materialize(&format!("3D Viewer {serial}"), &config),
        );
        surface.set_content(&content::generate(
            &surface.style_source(),
            &self.options,
        ));

        let table = Rc::downgrade(&self.panels);
        let disposed_id = id.clone();
        surface.on_disposed(Box::new(move || {
            if let Some(table) = table.upgrade() {
                if table.borrow_mut().remove(&disposed_id) {
                    log::debug!("panel {disposed_id} disposed by host");
                }
            }
        }));

        let visible_id = id.clone();
        surface.on_visibility_changed(Box::new(move |visible| {
            if visible {
                log::debug!("panel {visible_id} became visible");
            }
        }));

        self.panels
            .borrow_mut()
            .entries
            .push((id.clone(), surface));
        log::info!("created panel {id}");
        id
    }

    /// Reveal the most recently created live panel, or create a new one if
    /// none is open. Returns the identifier of the panel shown.
    pub fn create_or_show(&mut self, placement: Placement) -> PanelId {
        let last = self
            .panels
            .borrow()
            .entries
            .last()
            .map(|(id, surface)| (id.clone(), Rc::clone(surface)));
        if let Some((id, surface)) = last {
            surface.reveal(Some(placement));
            return id;
        }
        self.create_panel(placement)
    }

    /// Look up a panel's surface handle.
    #[must_use]
    pub fn get_panel(&self, id: &PanelId) -> Option<Rc<H::Surface>> {
        self.panels
            .borrow()
            .entries
            .iter()
            .find(|(pid, _)| pid == id)
            .map(|(_, surface)| Rc::clone(surface))
    }

    /// Reveal an existing panel. Returns whether the panel was found.
    pub fn show_panel(&self, id: &PanelId, placement: Option<Placement>) -> bool {
        let Some(surface) = self.get_panel(id) else {
            return false;
        };
        surface.reveal(placement);
        true
    }

    /// Remove a panel's bookkeeping entry. The host surface itself is not
    /// destroyed — the host owns that. Returns whether the panel was found.
    pub fn dispose_panel(&self, id: &PanelId) -> bool {
        self.panels.borrow_mut().remove(id)
    }

    /// Dispose every tracked panel: signal in-surface cleanup, request host
    /// disposal of each surface, then clear the mapping.
    ///
    /// Idempotent and safe on an empty registry. Iterates over a snapshot
    /// of identifiers so disposal callbacks firing mid-iteration cannot
    /// corrupt the traversal.
    pub fn dispose_all(&self) {
        for id in self.active_panel_ids() {
            // An earlier callback may already have removed this entry.
            let Some(surface) = self.get_panel(&id) else {
                continue;
            };
            let _ = surface.post_message(&PanelMessage::dispose());
            surface.request_dispose();
        }
        self.panels.borrow_mut().entries.clear();
        log::debug!("all panels disposed");
    }

    /// Identifiers of all tracked panels, in insertion order.
    #[must_use]
    pub fn active_panel_ids(&self) -> Vec<PanelId> {
        self.panels
            .borrow()
            .entries
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Regenerate and re-inject a panel's content (with a fresh nonce).
    /// Returns whether the panel was found.
    pub fn update_panel(&self, id: &PanelId) -> bool {
        let Some(surface) = self.get_panel(id) else {
            return false;
        };
        surface
            .set_content(&content::generate(&surface.style_source(), &self.options));
        true
    }

    /// Forward a structured message to a panel's in-content listener.
    ///
    /// Unknown identifiers resolve `false` with no side effects; otherwise
    /// the host's delivery receipt is returned unchanged.
    #[must_use]
    pub fn post_message(&self, id: &PanelId, message: &PanelMessage) -> Delivery {
        let Some(surface) = self.get_panel(id) else {
            return Delivery::resolved(false);
        };
        surface.post_message(message)
    }

    /// Post a message to every tracked panel. Returns how many posts were
    /// attempted; individual receipts are not awaited.
    pub fn broadcast(&self, message: &PanelMessage) -> usize {
        let mut attempted = 0;
        for id in self.active_panel_ids() {
            let Some(surface) = self.get_panel(&id) else {
                continue;
            };
            let _ = surface.post_message(message);
            attempted += 1;
        }
        attempted
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Shared state of one mock surface; the host keeps a handle so tests
    /// can fire host-driven lifecycle events.
    struct SurfaceState {
        title: String,
        config: SurfaceConfig,
        contents: RefCell<Vec<String>>,
        reveals: RefCell<Vec<Option<Placement>>>,
        posted: RefCell<Vec<PanelMessage>>,
        deliver: Cell<bool>,
        alive: Cell<bool>,
        dispose_requested: Cell<bool>,
        disposed_cb: RefCell<Option<Box<dyn FnMut()>>>,
        visibility_cb: RefCell<Option<Box<dyn FnMut(bool)>>>,
    }

    impl SurfaceState {
        fn new(title: &str, config: &SurfaceConfig) -> Self {
            Self {
                title: title.into(),
                config: config.clone(),
                contents: RefCell::new(Vec::new()),
                reveals: RefCell::new(Vec::new()),
                posted: RefCell::new(Vec::new()),
                deliver: Cell::new(true),
                alive: Cell::new(true),
                dispose_requested: Cell::new(false),
                disposed_cb: RefCell::new(None),
                visibility_cb: RefCell::new(None),
            }
        }

        /// Simulate the host destroying this surface (user closed it or
        /// disposal was requested).
        fn fire_disposed(&self) {
            self.alive.set(false);
            let cb = self.disposed_cb.borrow_mut().take();
            if let Some(mut cb) = cb {
                cb();
            }
        }

        fn fire_visibility(&self, visible: bool) {
            if let Some(cb) = self.visibility_cb.borrow_mut().as_mut() {
                cb(visible);
            }
        }
    }

    struct MockSurface(Rc<SurfaceState>);

    impl PanelSurface for MockSurface {
        fn reveal(&self, placement: Option<Placement>) {
            self.0.reveals.borrow_mut().push(placement);
        }

        fn set_content(&self, payload: &str) {
            self.0.contents.borrow_mut().push(payload.into());
        }

        fn post_message(&self, message: &PanelMessage) -> Delivery {
            if !self.0.alive.get() {
                return Delivery::resolved(false);
            }
            self.0.posted.borrow_mut().push(message.clone());
            Delivery::resolved(self.0.deliver.get())
        }

        fn request_dispose(&self) {
            self.0.dispose_requested.set(true);
            self.0.fire_disposed();
        }

        fn on_disposed(&self, callback: Box<dyn FnMut()>) {
            *self.0.disposed_cb.borrow_mut() = Some(callback);
        }

        fn on_visibility_changed(&self, callback: Box<dyn FnMut(bool)>) {
            *self.0.visibility_cb.borrow_mut() = Some(callback);
        }

        fn style_source(&self) -> String {
            "mock-style:".into()
        }
    }

    #[derive(Default)]
    struct MockHost {
        created: Rc<RefCell<Vec<Rc<SurfaceState>>>>,
    }

    impl SurfaceHost for MockHost {
        type Surface = MockSurface;

        fn materialize(
            &mut self,
            title: &str,
            config: &SurfaceConfig,
        ) -> MockSurface {
            let state = Rc::new(SurfaceState::new(title, config));
            self.created.borrow_mut().push(Rc::clone(&state));
            MockSurface(state)
        }
    }

    fn registry() -> (PanelRegistry<MockHost>, Rc<RefCell<Vec<Rc<SurfaceState>>>>)
    {
        let host = MockHost::default();
        let created = Rc::clone(&host.created);
        (PanelRegistry::new(host, ViewerOptions::default()), created)
    }

    #[test]
    fn identifiers_are_unique_and_never_reused() {
        let (mut reg, _) = registry();
        let a = reg.create_panel(Placement::Active);
        let b = reg.create_panel(Placement::Active);
        assert!(reg.dispose_panel(&a));
        let c = reg.create_panel(Placement::Active);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(c.as_str(), "preview-3");
    }

    #[test]
    fn active_ids_reflect_creates_minus_disposes_in_order() {
        let (mut reg, _) = registry();
        let a = reg.create_panel(Placement::Active);
        let b = reg.create_panel(Placement::Beside);
        let c = reg.create_panel(Placement::Column(2));
        assert_eq!(reg.active_panel_ids(), vec![a.clone(), b.clone(), c.clone()]);

        assert!(reg.dispose_panel(&b));
        assert_eq!(reg.active_panel_ids(), vec![a, c]);
    }

    #[test]
    fn unknown_identifier_degrades_gracefully() {
        let (mut reg, created) = registry();
        let _ = reg.create_panel(Placement::Active);
        let ghost = PanelId("preview-999".into());

        assert!(reg.get_panel(&ghost).is_none());
        assert!(!reg.show_panel(&ghost, None));
        assert!(!reg.dispose_panel(&ghost));
        assert!(!reg.update_panel(&ghost));
        assert!(!reg.post_message(&ghost, &PanelMessage::dispose()).wait());

        // No side effects on the panel that does exist.
        assert!(created.borrow()[0].posted.borrow().is_empty());
        assert!(created.borrow()[0].reveals.borrow().is_empty());
    }

    #[test]
    fn dispose_panel_removes_bookkeeping_without_destroying_surface() {
        let (mut reg, created) = registry();
        let id = reg.create_panel(Placement::Active);
        assert!(reg.dispose_panel(&id));

        assert!(reg.get_panel(&id).is_none());
        let states = created.borrow();
        assert!(states[0].alive.get());
        assert!(!states[0].dispose_requested.get());
    }

    #[test]
    fn host_initiated_close_removes_the_entry() {
        let (mut reg, created) = registry();
        let a = reg.create_panel(Placement::Active);
        let b = reg.create_panel(Placement::Active);

        created.borrow()[0].fire_disposed();
        assert_eq!(reg.active_panel_ids(), vec![b]);
        assert!(reg.get_panel(&a).is_none());
    }

    #[test]
    fn dispose_all_signals_cleanup_and_clears() {
        let (mut reg, created) = registry();
        let _ = reg.create_panel(Placement::Active);
        let _ = reg.create_panel(Placement::Active);

        reg.dispose_all();
        assert!(reg.active_panel_ids().is_empty());
        for state in created.borrow().iter() {
            // Each surface saw the dispose message, then host disposal.
            assert!(state.posted.borrow().iter().any(PanelMessage::is_dispose));
            assert!(state.dispose_requested.get());
        }

        // Idempotent, and fine on an already-empty registry.
        reg.dispose_all();
        reg.dispose_all();
        assert!(reg.active_panel_ids().is_empty());
    }

    #[test]
    fn dispose_all_tolerates_reentrant_disposal_callbacks() {
        let (mut reg, _) = registry();
        for _ in 0..5 {
            let _ = reg.create_panel(Placement::Active);
        }
        // request_dispose fires on_disposed synchronously, which mutates
        // the table while dispose_all is mid-iteration.
        reg.dispose_all();
        assert!(reg.active_panel_ids().is_empty());
    }

    #[test]
    fn update_panel_reinjects_content_with_fresh_nonce() {
        let (mut reg, created) = registry();
        let id = reg.create_panel(Placement::Active);
        assert!(reg.update_panel(&id));

        let contents = created.borrow()[0].contents.borrow().clone();
        assert_eq!(contents.len(), 2);
        // Same template, different nonce.
        assert_ne!(contents[0], contents[1]);
    }

    #[test]
    fn post_message_returns_host_delivery_result_unchanged() {
        let (mut reg, created) = registry();
        let id = reg.create_panel(Placement::Active);

        assert!(reg.post_message(&id, &PanelMessage::new("ping")).wait());

        created.borrow()[0].deliver.set(false);
        assert!(!reg.post_message(&id, &PanelMessage::new("ping")).wait());
        assert_eq!(created.borrow()[0].posted.borrow().len(), 2);
    }

    #[test]
    fn broadcast_reaches_every_live_panel() {
        let (mut reg, created) = registry();
        let _ = reg.create_panel(Placement::Active);
        let _ = reg.create_panel(Placement::Active);

        assert_eq!(reg.broadcast(&PanelMessage::new("refresh")), 2);
        for state in created.borrow().iter() {
            assert_eq!(state.posted.borrow().len(), 1);
        }
    }

    #[test]
    fn create_or_show_reveals_the_most_recent_panel() {
        let (mut reg, created) = registry();
        let id = reg.create_or_show(Placement::Active);
        assert_eq!(reg.active_panel_ids().len(), 1);

        let again = reg.create_or_show(Placement::Beside);
        assert_eq!(again, id);
        assert_eq!(reg.active_panel_ids().len(), 1);
        assert_eq!(
            created.borrow()[0].reveals.borrow().as_slice(),
            &[Some(Placement::Beside)]
        );

        // Once everything is gone a new panel is created.
        reg.dispose_all();
        let fresh = reg.create_or_show(Placement::Active);
        assert_ne!(fresh, id);
    }

    #[test]
    fn created_surface_gets_csp_content_and_titles_count_up() {
        let (mut reg, created) = registry();
        let _ = reg.create_panel(Placement::Active);
        let _ = reg.create_panel(Placement::Active);

        let states = created.borrow();
        assert_eq!(states[0].title, "3D Viewer 1");
        assert_eq!(states[1].title, "3D Viewer 2");
        assert!(states[0].config.enable_scripts);
        assert!(states[0].config.retain_when_hidden);

        let content = states[0].contents.borrow()[0].clone();
        assert!(content.contains("default-src 'none'"));
        assert!(content.contains("style-src mock-style: 'unsafe-inline'"));
    }

    #[test]
    fn show_panel_passes_placement_through() {
        let (mut reg, created) = registry();
        let id = reg.create_panel(Placement::Active);
        assert!(reg.show_panel(&id, Some(Placement::Column(3))));
        assert_eq!(
            created.borrow()[0].reveals.borrow().as_slice(),
            &[Some(Placement::Column(3))]
        );
    }

    #[test]
    fn visibility_callback_is_wired() {
        let (mut reg, created) = registry();
        let _ = reg.create_panel(Placement::Active);
        // Only checks the callback path doesn't panic; the handler just
        // logs.
        created.borrow()[0].fire_visibility(true);
        created.borrow()[0].fire_visibility(false);
    }
}
