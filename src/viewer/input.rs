//! Interaction events forwarded from the surface into a viewer session.

/// One surface input event, already normalized by the shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed at surface coordinates.
    PointerDown {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Pointer moved to surface coordinates.
    PointerMove {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Pointer released.
    PointerUp,
    /// Pointer left the surface.
    PointerLeave,
    /// Scroll wheel turned. Positive `delta_y` zooms out, matching
    /// browser wheel conventions.
    Wheel {
        /// Signed scroll amount.
        delta_y: f32,
    },
    /// Surface resized to the given pixel dimensions.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}
