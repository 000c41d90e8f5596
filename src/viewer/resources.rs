//! Arena of everything one viewer session owns while initialized.

use super::backend::{
    CameraId, EventKind, EventSource, FrameRequest, ListenerToken, NodeId,
    RendererId, SceneId,
};

/// One recorded listener registration, kept so cleanup can reverse it.
#[derive(Debug, Clone, Copy)]
pub struct ListenerRecord {
    /// Where the listener is attached.
    pub source: EventSource,
    /// Which event class it handles.
    pub kind: EventKind,
    /// Detach token returned by the shell.
    pub token: ListenerToken,
}

/// Pointer-drag state for rotate interaction.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DragState {
    pub(crate) active: bool,
    pub(crate) last: (f32, f32),
}

/// Every resource owned by one surface's viewer while it is initialized.
///
/// Exists iff initialization succeeded and teardown has not yet run. The
/// teardown routine in [`super::ViewerSession`] is the sole writer of
/// "released" state: it consumes the whole set at once, so callers never
/// observe a partially torn-down arena.
#[derive(Debug)]
pub struct ResourceSet {
    pub(crate) renderer: RendererId,
    pub(crate) scene: SceneId,
    pub(crate) camera: CameraId,
    /// The default visible primitive. Absent only while setup is mid-flight
    /// or after setup failed partway.
    pub(crate) subject: Option<NodeId>,
    pub(crate) lights: Vec<NodeId>,
    pub(crate) pending_frame: Option<FrameRequest>,
    pub(crate) listeners: Vec<ListenerRecord>,
    pub(crate) drag: DragState,
    pub(crate) scale: f32,
}

impl ResourceSet {
    /// A fresh arena around the base renderer/scene/camera triple, with no
    /// scene content or listeners yet.
    pub(crate) fn new(
        renderer: RendererId,
        scene: SceneId,
        camera: CameraId,
    ) -> Self {
        Self {
            renderer,
            scene,
            camera,
            subject: None,
            lights: Vec::new(),
            pending_frame: None,
            listeners: Vec::new(),
            drag: DragState::default(),
            scale: 1.0,
        }
    }

    /// Currently tracked listener registrations.
    #[must_use]
    pub fn listeners(&self) -> &[ListenerRecord] {
        &self.listeners
    }

    /// Current subject scale factor.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }
}
