//! Content-security policy assembly.

use super::nonce::Nonce;

/// Builder for the restrictive policy embedded in every surface.
///
/// Everything is denied by default. Styles are limited to the host's style
/// source plus inline styles; scripts are limited to the generated nonce
/// plus one allow-listed external origin serving the rendering library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSecurityPolicy {
    style_source: String,
    script_origin: String,
}

impl ContentSecurityPolicy {
    /// Build a policy from the host-assigned style source token and the
    /// allow-listed rendering-library origin.
    #[must_use]
    pub fn new(
        style_source: impl Into<String>,
        script_origin: impl Into<String>,
    ) -> Self {
        Self {
            style_source: style_source.into(),
            script_origin: script_origin.into(),
        }
    }

    /// Render the policy string for a given nonce.
    #[must_use]
    pub fn header_value(&self, nonce: &Nonce) -> String {
        format!(
            "default-src 'none'; style-src {style} 'unsafe-inline'; \
             script-src 'nonce-{nonce}' {origin};",
            style = self.style_source,
            origin = self.script_origin,
        )
    }
}
