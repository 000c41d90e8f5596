//! Host environment capability surface.
//!
//! The editor that embeds glimpse owns every display surface. The registry
//! only ever talks to it through these traits: [`SurfaceHost`] materializes
//! surfaces, [`PanelSurface`] dispatches to one (reveal, inject content,
//! post a message, request disposal). The host keeps true ownership of each
//! surface's lifetime; the registry mirrors it via the disposal callback.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::message::PanelMessage;

// ── Placement ────────────────────────────────────────────────────────────

/// Where the host should place a surface within its panel chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Placement {
    /// Wherever the host's active editor region currently is.
    #[default]
    Active,
    /// Split next to the active region.
    Beside,
    /// An explicit column position.
    Column(
        /// One-based column index.
        u32,
    ),
}

/// Surface creation parameters passed to [`SurfaceHost::materialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Requested placement.
    pub placement: Placement,
    /// Whether injected content may execute scripts.
    pub enable_scripts: bool,
    /// Whether the surface keeps its content alive while hidden.
    pub retain_when_hidden: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            placement: Placement::Active,
            enable_scripts: true,
            retain_when_hidden: true,
        }
    }
}

// ── Delivery ─────────────────────────────────────────────────────────────

/// Asynchronous receipt for a message posted to a surface.
///
/// The post itself returns immediately; the host fulfills the receipt once
/// the surface has (or has not) taken delivery. Messages to a single
/// surface are delivered FIFO; there is no ordering across surfaces. If the
/// surface is disposed while a post is in flight the receipt resolves
/// `false` — a post is always safe to race with disposal.
#[derive(Debug)]
pub struct Delivery {
    rx: mpsc::Receiver<bool>,
}

impl Delivery {
    /// A receipt that is already resolved. Used for immediate outcomes,
    /// e.g. posting to an identifier the registry doesn't know.
    #[must_use]
    pub fn resolved(delivered: bool) -> Self {
        let (slot, delivery) = Self::pending();
        slot.fulfill(delivered);
        delivery
    }

    /// A pending receipt plus the slot the host uses to fulfill it.
    #[must_use]
    pub fn pending() -> (DeliverySlot, Self) {
        let (tx, rx) = mpsc::channel();
        (DeliverySlot { tx }, Self { rx })
    }

    /// Block until the outcome is known. A slot dropped unfulfilled (the
    /// surface went away) counts as not delivered.
    #[must_use]
    pub fn wait(self) -> bool {
        self.rx.recv().unwrap_or(false)
    }

    /// Non-blocking poll. `None` while the outcome is still pending.
    #[must_use]
    pub fn try_result(&self) -> Option<bool> {
        self.rx.try_recv().ok()
    }
}

/// Fulfillment side of a [`Delivery`]. Dropping it unfulfilled resolves the
/// receipt as not delivered.
#[derive(Debug)]
pub struct DeliverySlot {
    tx: mpsc::Sender<bool>,
}

impl DeliverySlot {
    /// Record the delivery outcome. The paired [`Delivery`] may already be
    /// gone; that's fine, the outcome is simply unobserved.
    pub fn fulfill(self, delivered: bool) {
        let _ = self.tx.send(delivered);
    }
}

// ── Capability traits ────────────────────────────────────────────────────

/// One host-managed display surface, as seen by the registry.
///
/// All methods take `&self`: the registry shares handles and the host is
/// expected to provide its own interior mutability, exactly as a real
/// windowing layer does.
pub trait PanelSurface {
    /// Bring the surface to the front, optionally moving it.
    fn reveal(&self, placement: Option<Placement>);

    /// Replace the surface's content with a freshly generated payload.
    fn set_content(&self, payload: &str);

    /// Post a structured message to the content's in-surface listener.
    fn post_message(&self, message: &PanelMessage) -> Delivery;

    /// Ask the host to destroy the surface. The registry learns about the
    /// actual destruction through the [`Self::on_disposed`] callback.
    fn request_dispose(&self);

    /// Register the callback fired when the host destroys the surface,
    /// whether user-initiated or programmatic.
    fn on_disposed(&self, callback: Box<dyn FnMut()>);

    /// Register the callback fired when the surface is shown or hidden.
    fn on_visibility_changed(&self, callback: Box<dyn FnMut(bool)>);

    /// Host-assigned style source token for this surface's
    /// content-security policy.
    fn style_source(&self) -> String;
}

/// The host capability that materializes display surfaces.
pub trait SurfaceHost {
    /// Handle type for one surface. `'static` because the registry shares
    /// handles with lifecycle callbacks it hands back to the host.
    type Surface: PanelSurface + 'static;

    /// Create a new display surface. By contract this does not fail; host
    /// materialization errors are the host's to surface.
    fn materialize(&mut self, title: &str, config: &SurfaceConfig) -> Self::Surface;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_delivery_yields_its_outcome() {
        assert!(Delivery::resolved(true).wait());
        assert!(!Delivery::resolved(false).wait());
    }

    #[test]
    fn pending_delivery_resolves_on_fulfill() {
        let (slot, delivery) = Delivery::pending();
        assert_eq!(delivery.try_result(), None);
        slot.fulfill(true);
        assert_eq!(delivery.try_result(), Some(true));
    }

    #[test]
    fn dropped_slot_counts_as_not_delivered() {
        let (slot, delivery) = Delivery::pending();
        drop(slot);
        assert!(!delivery.wait());
    }
}
