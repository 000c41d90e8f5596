//! Opaque capabilities the embedding surface provides to a viewer session.
//!
//! The rendering engine is never modeled — only the handles it returns.
//! [`RenderBackend`] covers scene/camera/renderer construction, frame
//! rendering, and per-object release; [`SurfaceShell`] covers the
//! surface's own plumbing: event listeners, animation-frame scheduling,
//! the user-visible error channel, and output attachment.

use crate::error::ViewerError;

// ── Handles ──────────────────────────────────────────────────────────────

/// Handle to a backend scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(
    /// Raw handle value assigned by the backend.
    pub u32,
);

/// Handle to a backend camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId(
    /// Raw handle value assigned by the backend.
    pub u32,
);

/// Handle to a backend renderer and its output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RendererId(
    /// Raw handle value assigned by the backend.
    pub u32,
);

/// Handle to one node in a scene graph (mesh or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(
    /// Raw handle value assigned by the backend.
    pub u32,
);

/// Token for one registered event listener, kept so the registration can
/// be reversed during cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(
    /// Raw token value assigned by the shell.
    pub u64,
);

/// Token for one pending animation-frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(
    /// Raw token value assigned by the shell.
    pub u64,
);

// ── Scene content ────────────────────────────────────────────────────────

/// Primitives the viewer asks the backend to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveKind {
    /// An axis-aligned cube with the given edge length.
    Cube {
        /// Edge length in scene units.
        size: f32,
    },
}

/// Light sources the viewer asks the backend to build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform scene-wide illumination.
    Ambient {
        /// Light intensity in `[0, 1]`.
        intensity: f32,
    },
    /// Parallel light from a fixed position.
    Directional {
        /// Light intensity in `[0, 1]`.
        intensity: f32,
        /// World-space position the light shines from.
        position: [f32; 3],
    },
}

// ── Events ───────────────────────────────────────────────────────────────

/// Where an event listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// The renderer's output canvas.
    Canvas,
    /// The surface's top-level window context.
    Window,
}

/// Event classes the viewer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Pointer released.
    PointerUp,
    /// Pointer left the source.
    PointerLeave,
    /// Scroll wheel.
    Wheel,
    /// Surface resized.
    Resize,
}

// ── Capability traits ────────────────────────────────────────────────────

/// The rendering engine as an opaque capability: create scene, camera,
/// renderer; accept primitives; render frames; dispose.
pub trait RenderBackend {
    /// Acquire a renderer and its output surface.
    ///
    /// This is where environment support is decided: a surface with no
    /// GPU-capable context returns [`ViewerError::ContextUnavailable`].
    fn create_renderer(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RendererId, ViewerError>;

    /// Create an empty scene with the given CSS background color.
    fn create_scene(&mut self, background: &str) -> SceneId;

    /// Create a perspective camera at `distance` along the view axis.
    fn create_camera(
        &mut self,
        fov_degrees: f32,
        aspect: f32,
        distance: f32,
    ) -> CameraId;

    /// Build a primitive and add it to the scene.
    fn add_mesh(
        &mut self,
        scene: SceneId,
        primitive: PrimitiveKind,
    ) -> Result<NodeId, ViewerError>;

    /// Build a light source and add it to the scene.
    fn add_light(&mut self, scene: SceneId, light: LightKind) -> NodeId;

    /// Apply incremental pitch/yaw rotation to a node, in radians.
    fn rotate_node(&mut self, node: NodeId, pitch: f32, yaw: f32);

    /// Set a node's uniform scale factor.
    fn scale_node(&mut self, node: NodeId, factor: f32);

    /// Update a camera's aspect ratio.
    fn set_aspect(&mut self, camera: CameraId, aspect: f32);

    /// Resize a renderer's output surface.
    fn resize_output(&mut self, renderer: RendererId, width: u32, height: u32);

    /// Render one frame of the scene through the camera.
    fn render_frame(
        &mut self,
        renderer: RendererId,
        scene: SceneId,
        camera: CameraId,
    );

    /// Snapshot of every node currently in the scene, for the release walk.
    fn scene_nodes(&self, scene: SceneId) -> Vec<NodeId>;

    /// Release a node's geometry/material/texture resources.
    fn release_node(&mut self, node: NodeId);

    /// Remove all nodes from the scene.
    fn clear_scene(&mut self, scene: SceneId);

    /// Release the rendering context.
    fn dispose_renderer(&mut self, renderer: RendererId);
}

/// The surface's own cooperative-loop plumbing, layered over the backend.
pub trait SurfaceShell: RenderBackend {
    /// Current output size in pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Attach an event listener, returning the token needed to detach it.
    fn add_listener(
        &mut self,
        source: EventSource,
        kind: EventKind,
    ) -> ListenerToken;

    /// Detach a previously registered listener.
    fn remove_listener(&mut self, token: ListenerToken);

    /// Schedule the next animation frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a pending animation-frame request.
    fn cancel_frame(&mut self, request: FrameRequest);

    /// Show a user-visible error message in the surface.
    fn show_error(&mut self, message: &str);

    /// Detach the renderer's output surface from the document.
    fn detach_output(&mut self, renderer: RendererId);
}
