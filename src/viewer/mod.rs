//! The in-surface viewer protocol.
//!
//! Each surface runs exactly one [`ViewerSession`] over the capabilities
//! its environment provides: an opaque [`RenderBackend`] plus the
//! [`SurfaceShell`] plumbing (listeners, frame scheduling, the error
//! channel). The session owns at most one [`ResourceSet`] and guarantees
//! the cleanup protocol: whatever initialization built, teardown releases,
//! in one idempotent pass.

mod backend;
mod input;
mod resources;
mod session;

pub use backend::{
    CameraId, EventKind, EventSource, FrameRequest, LightKind, ListenerToken,
    NodeId, PrimitiveKind, RenderBackend, RendererId, SceneId, SurfaceShell,
};
pub use input::InputEvent;
pub use resources::{ListenerRecord, ResourceSet};
pub use session::ViewerSession;
