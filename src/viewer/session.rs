//! One surface's viewer lifecycle: initialize, interact, render, tear down.

use super::backend::{
    EventKind, EventSource, FrameRequest, LightKind, PrimitiveKind,
    SurfaceShell,
};
use super::input::InputEvent;
use super::resources::{ListenerRecord, ResourceSet};
use crate::error::ViewerError;
use crate::message::PanelMessage;
use crate::options::ViewerOptions;

/// Edge length of the default cube primitive, in scene units.
const SUBJECT_SIZE: f32 = 2.0;

/// Listener registrations made during setup, in binding order.
const LISTENER_BINDINGS: [(EventSource, EventKind); 6] = [
    (EventSource::Canvas, EventKind::PointerDown),
    (EventSource::Canvas, EventKind::PointerMove),
    (EventSource::Canvas, EventKind::PointerUp),
    (EventSource::Canvas, EventKind::PointerLeave),
    (EventSource::Canvas, EventKind::Wheel),
    (EventSource::Window, EventKind::Resize),
];

/// Controller for the content running inside one surface.
///
/// Owns the shell capability and at most one [`ResourceSet`]. All failure
/// modes degrade to a user-visible message through the shell's error
/// channel; nothing here is fatal to the host.
pub struct ViewerSession<S: SurfaceShell> {
    shell: S,
    options: ViewerOptions,
    resources: Option<ResourceSet>,
}

impl<S: SurfaceShell> ViewerSession<S> {
    /// Create an uninitialized session over the given shell.
    #[must_use]
    pub fn new(shell: S, options: ViewerOptions) -> Self {
        Self {
            shell,
            options,
            resources: None,
        }
    }

    /// Whether a resource set currently exists.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.resources.is_some()
    }

    /// Current resource set, if initialized.
    #[must_use]
    pub fn resources(&self) -> Option<&ResourceSet> {
        self.resources.as_ref()
    }

    /// The pending animation-frame request, if one is scheduled.
    #[must_use]
    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.resources.as_ref().and_then(|rs| rs.pending_frame)
    }

    /// Shared access to the underlying shell.
    #[must_use]
    pub fn shell(&self) -> &S {
        &self.shell
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Set up the viewer: renderer, scene, camera, default cube, lights,
    /// and interaction listeners, then schedule the first frame.
    ///
    /// Returns whether the session is active afterwards. Already-active
    /// sessions return `true` without rebuilding. On any setup error the
    /// message is shown through the shell's error channel and every
    /// partially created resource is released; no resource set survives.
    pub fn initialize(&mut self) -> bool {
        if self.resources.is_some() {
            return true;
        }

        let (width, height) = self.shell.surface_size();
        let renderer = match self.shell.create_renderer(width, height) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::warn!("viewer init aborted: {e}");
                self.shell
                    .show_error(&format!("Failed to initialize 3D viewer: {e}"));
                return false;
            }
        };

        let scene = self.shell.create_scene(&self.options.background);
        let aspect = width as f32 / height.max(1) as f32;
        let camera = self.shell.create_camera(
            self.options.fov_degrees,
            aspect,
            self.options.camera_distance,
        );
        self.resources = Some(ResourceSet::new(renderer, scene, camera));

        if let Err(e) = self.populate() {
            log::warn!("viewer setup failed: {e}");
            self.shell
                .show_error(&format!("Failed to initialize 3D viewer: {e}"));
            self.teardown();
            return false;
        }

        self.schedule_frame();
        true
    }

    /// Build scene content and bind listeners into the fresh resource set.
    fn populate(&mut self) -> Result<(), ViewerError> {
        let Some(rs) = self.resources.as_mut() else {
            return Ok(());
        };

        rs.subject = Some(
            self.shell
                .add_mesh(rs.scene, PrimitiveKind::Cube { size: SUBJECT_SIZE })?,
        );
        rs.lights.push(
            self.shell
                .add_light(rs.scene, LightKind::Ambient { intensity: 0.6 }),
        );
        rs.lights.push(self.shell.add_light(
            rs.scene,
            LightKind::Directional {
                intensity: 0.8,
                position: [10.0, 10.0, 5.0],
            },
        ));

        for (source, kind) in LISTENER_BINDINGS {
            let token = self.shell.add_listener(source, kind);
            rs.listeners.push(ListenerRecord {
                source,
                kind,
                token,
            });
        }
        Ok(())
    }

    /// Release everything the session owns. Invoked on page teardown, an
    /// explicit dispose message, or a caught initialization error.
    ///
    /// Idempotent: with no resource set present this is a no-op. Order —
    /// cancel the pending frame, detach every recorded listener, walk the
    /// scene releasing per-node resources, clear the scene, dispose the
    /// renderer, detach its output.
    pub fn teardown(&mut self) {
        let Some(mut rs) = self.resources.take() else {
            return;
        };

        if let Some(frame) = rs.pending_frame.take() {
            self.shell.cancel_frame(frame);
        }
        for record in rs.listeners.drain(..) {
            self.shell.remove_listener(record.token);
        }
        for node in self.shell.scene_nodes(rs.scene) {
            self.shell.release_node(node);
        }
        self.shell.clear_scene(rs.scene);
        self.shell.dispose_renderer(rs.renderer);
        self.shell.detach_output(rs.renderer);

        log::debug!("viewer resources released");
    }

    /// React to a structured host message. The one mandated command is
    /// `"dispose"`; unknown commands are no-ops.
    pub fn handle_message(&mut self, message: &PanelMessage) {
        if message.is_dispose() {
            self.teardown();
        } else {
            log::debug!("ignoring unknown command '{}'", message.command);
        }
    }

    // ── Render loop ──────────────────────────────────────────────────────

    /// A scheduled animation frame fired. Stale tokens (from before a
    /// teardown/reinit) are ignored; otherwise render and reschedule.
    pub fn on_frame(&mut self, request: FrameRequest) {
        let Some(rs) = self.resources.as_mut() else {
            return;
        };
        if rs.pending_frame != Some(request) {
            return;
        }
        rs.pending_frame = None;

        let (renderer, scene, camera) = (rs.renderer, rs.scene, rs.camera);
        self.shell.render_frame(renderer, scene, camera);
        self.schedule_frame();
    }

    fn schedule_frame(&mut self) {
        let Some(rs) = self.resources.as_mut() else {
            return;
        };
        rs.pending_frame = Some(self.shell.request_frame());
    }

    // ── Interaction ──────────────────────────────────────────────────────

    /// Feed one normalized input event through the interaction handlers.
    /// No-op while no resource set exists.
    pub fn handle_event(&mut self, event: InputEvent) {
        let Some(rs) = self.resources.as_mut() else {
            return;
        };

        match event {
            InputEvent::PointerDown { x, y } => {
                rs.drag.active = true;
                rs.drag.last = (x, y);
            }
            InputEvent::PointerMove { x, y } => {
                if !rs.drag.active {
                    return;
                }
                let (dx, dy) = (x - rs.drag.last.0, y - rs.drag.last.1);
                rs.drag.last = (x, y);
                if let Some(subject) = rs.subject {
                    let s = self.options.rotate_sensitivity;
                    self.shell.rotate_node(subject, dy * s, dx * s);
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                rs.drag.active = false;
            }
            InputEvent::Wheel { delta_y } => {
                let step = if delta_y > 0.0 {
                    self.options.zoom_out_step
                } else {
                    self.options.zoom_in_step
                };
                rs.scale = self.options.clamp_scale(rs.scale * step);
                if let Some(subject) = rs.subject {
                    self.shell.scale_node(subject, rs.scale);
                }
            }
            InputEvent::Resize { width, height } => {
                let aspect = width as f32 / height.max(1) as f32;
                self.shell.set_aspect(rs.camera, aspect);
                self.shell.resize_output(rs.renderer, width, height);
            }
        }
    }
}
