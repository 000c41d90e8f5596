// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Lifecycle and content delivery for embedded interactive 3D preview
//! surfaces hosted inside a larger editor application.
//!
//! Glimpse tracks multiple concurrently open preview surfaces, generates
//! isolated renderable content per surface (markup plus a strict
//! content-security policy), and guarantees that graphics resources —
//! GPU objects, event listeners, animation loops — are fully released
//! when a surface closes, across any number of open/close cycles.
//!
//! # Key entry points
//!
//! - [`registry::PanelRegistry`] - create/show/dispose/broadcast over the
//!   host's display surfaces
//! - [`content`] - per-surface payload generation (nonce, CSP, template)
//! - [`viewer::ViewerSession`] - the in-surface protocol: initialize,
//!   interact, render, idempotent teardown
//! - [`options::ViewerOptions`] - interaction bounds, camera, colors,
//!   rendering-library source
//!
//! # Architecture
//!
//! The host editor owns every surface; glimpse talks to it through the
//! [`host::SurfaceHost`] and [`host::PanelSurface`] capability traits and
//! mirrors surface lifetime via disposal callbacks. Cross-surface state is
//! never shared: each surface runs its own cooperative loop, reached only
//! by one-directional structured messages ([`message::PanelMessage`]).

pub mod content;
pub mod error;
pub mod host;
pub mod message;
pub mod options;
pub mod registry;
pub mod viewer;

pub use error::{GlimpseError, ViewerError};
pub use host::{
    Delivery, DeliverySlot, PanelSurface, Placement, SurfaceConfig,
    SurfaceHost,
};
pub use message::PanelMessage;
pub use options::ViewerOptions;
pub use registry::{PanelId, PanelRegistry};
pub use viewer::{InputEvent, ViewerSession};
