//! Content generation for preview surfaces.
//!
//! Each surface receives a self-contained payload: markup, a strict
//! content-security policy, and the viewer script implementing the
//! in-surface resource-cleanup protocol. Generation is a pure function of
//! the CSP nonce, the host-assigned style source token, and the viewer
//! options — no global state, so policy correctness is testable in
//! isolation.

mod csp;
mod nonce;
mod page;

pub use csp::ContentSecurityPolicy;
pub use nonce::Nonce;
pub use page::render_page;

use crate::options::ViewerOptions;

/// Generate the full content payload for one surface, with a fresh nonce.
///
/// `style_source` is the host-assigned style token for this surface
/// (the rendering-context token in the host's content model).
#[must_use]
pub fn generate(style_source: &str, options: &ViewerOptions) -> String {
    render_page(&Nonce::generate(), style_source, options)
}
