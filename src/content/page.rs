//! HTML/script template for the embedded viewer.
//!
//! [`render_page`] is a pure function of the nonce, the host style-source
//! token, and the viewer options. The emitted script implements the
//! in-surface cleanup protocol: a single resource holder, reversed listener
//! registrations, an idempotent cleanup routine, and a render loop that
//! stops itself once the holder is cleared.

use super::csp::ContentSecurityPolicy;
use super::nonce::Nonce;
use crate::options::ViewerOptions;

/// Render the complete content payload for one surface.
///
/// Deterministic for a given `(nonce, style_source, options)` triple. The
/// nonce appears in the policy and on every inline script tag, and nowhere
/// else; the external library tag is authorized by origin instead.
#[must_use]
pub fn render_page(
    nonce: &Nonce,
    style_source: &str,
    options: &ViewerOptions,
) -> String {
    let policy = ContentSecurityPolicy::new(style_source, &options.library_origin)
        .header_value(nonce);
    let script = viewer_script(options);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta http-equiv="Content-Security-Policy" content="{policy}">
    <title>3D Viewer</title>
    <style>
        body {{
            margin: 0;
            padding: 0;
            overflow: hidden;
            background-color: {background};
        }}
        #canvas-container {{
            width: 100vw;
            height: 100vh;
            position: relative;
        }}
        #info {{
            position: absolute;
            top: 10px;
            left: 10px;
            color: #cccccc;
            padding: 10px;
            border-radius: 4px;
            font-size: 12px;
            opacity: 0.9;
        }}
        #error-message {{
            color: #f48771;
            font-family: sans-serif;
            text-align: center;
            padding: 20px;
            display: none;
        }}
    </style>
</head>
<body>
    <div id="canvas-container">
        <div id="info">3D Viewer initialized<br>Use mouse to interact</div>
        <div id="error-message"></div>
    </div>
    <script src="{library_url}"></script>
    <script nonce="{nonce}">
{script}
    </script>
</body>
</html>"#,
        background = options.background,
        library_url = options.library_url,
    )
}

/// Emit the viewer script with options-derived constants interpolated.
fn viewer_script(options: &ViewerOptions) -> String {
    VIEWER_SCRIPT
        .replace("@MIN_SCALE@", &options.min_scale.to_string())
        .replace("@MAX_SCALE@", &options.max_scale.to_string())
        .replace("@ZOOM_IN@", &options.zoom_in_step.to_string())
        .replace("@ZOOM_OUT@", &options.zoom_out_step.to_string())
        .replace("@ROTATE@", &options.rotate_sensitivity.to_string())
        .replace("@FOV@", &options.fov_degrees.to_string())
        .replace("@CAMERA_Z@", &options.camera_distance.to_string())
        .replace("@BACKGROUND@", &css_hex_to_js(&options.background))
}

/// Convert a `#rrggbb` CSS color to a JS numeric literal (`0xrrggbb`).
fn css_hex_to_js(color: &str) -> String {
    let hex = color.strip_prefix('#').unwrap_or(color);
    format!("0x{hex}")
}

/// The in-surface viewer protocol. Placeholders (`@NAME@`) are replaced
/// with option values before emission.
const VIEWER_SCRIPT: &str = r#"
// Single holder for every resource this surface owns.
let viewerResources = null;

const MIN_SCALE = @MIN_SCALE@;
const MAX_SCALE = @MAX_SCALE@;

function isContextSupported() {
    try {
        const canvas = document.createElement('canvas');
        return !!(window.WebGLRenderingContext &&
            (canvas.getContext('webgl') || canvas.getContext('experimental-webgl')));
    } catch (e) {
        return false;
    }
}

function showError(message) {
    const errorDiv = document.getElementById('error-message');
    errorDiv.textContent = message;
    errorDiv.style.display = 'block';
}

// Idempotent cleanup: safe to call with no resources, and twice in a row.
function cleanupResources() {
    if (!viewerResources) return;

    if (viewerResources.animationId) {
        cancelAnimationFrame(viewerResources.animationId);
        viewerResources.animationId = null;
    }

    viewerResources.eventListeners.forEach(({ element, event, handler }) => {
        element.removeEventListener(event, handler);
    });
    viewerResources.eventListeners = [];

    if (viewerResources.scene) {
        viewerResources.scene.traverse((object) => {
            if (object.geometry) object.geometry.dispose();
            if (object.material) {
                if (Array.isArray(object.material)) {
                    object.material.forEach(m => m.dispose());
                } else {
                    object.material.dispose();
                }
            }
            if (object.texture) object.texture.dispose();
        });
        viewerResources.scene.clear();
    }

    if (viewerResources.renderer) {
        viewerResources.renderer.dispose();
        viewerResources.renderer.forceContextLoss();
        const canvas = viewerResources.renderer.domElement;
        if (canvas && canvas.parentNode) {
            canvas.parentNode.removeChild(canvas);
        }
    }

    viewerResources = null;
}

window.addEventListener('beforeunload', cleanupResources);
window.addEventListener('unload', cleanupResources);

// Host messages: 'dispose' triggers cleanup, anything else is a no-op.
window.addEventListener('message', (event) => {
    const message = event.data;
    if (message && message.command === 'dispose') {
        cleanupResources();
    }
});

function track(element, event, handler) {
    element.addEventListener(event, handler);
    viewerResources.eventListeners.push({ element, event, handler });
}

function initializeViewer() {
    viewerResources = {
        scene: null,
        camera: null,
        renderer: null,
        subject: null,
        animationId: null,
        eventListeners: []
    };

    viewerResources.scene = new THREE.Scene();
    viewerResources.scene.background = new THREE.Color(@BACKGROUND@);

    viewerResources.camera = new THREE.PerspectiveCamera(
        @FOV@, window.innerWidth / window.innerHeight, 0.1, 1000);
    viewerResources.camera.position.z = @CAMERA_Z@;

    viewerResources.renderer = new THREE.WebGLRenderer({ antialias: true });
    viewerResources.renderer.setSize(window.innerWidth, window.innerHeight);
    viewerResources.renderer.setPixelRatio(window.devicePixelRatio);
    document.getElementById('canvas-container')
        .appendChild(viewerResources.renderer.domElement);

    const geometry = new THREE.BoxGeometry(2, 2, 2);
    const material = new THREE.MeshPhongMaterial({
        color: 0x0099ff, specular: 0x111111, shininess: 100
    });
    viewerResources.subject = new THREE.Mesh(geometry, material);
    viewerResources.scene.add(viewerResources.subject);

    viewerResources.scene.add(new THREE.AmbientLight(0xffffff, 0.6));
    const directional = new THREE.DirectionalLight(0xffffff, 0.8);
    directional.position.set(10, 10, 5);
    viewerResources.scene.add(directional);

    let isDragging = false;
    let previous = { x: 0, y: 0 };
    let currentScale = 1;

    const canvas = viewerResources.renderer.domElement;
    track(canvas, 'mousedown', (e) => {
        isDragging = true;
        previous = { x: e.clientX, y: e.clientY };
    });
    track(canvas, 'mousemove', (e) => {
        if (!isDragging || !viewerResources || !viewerResources.subject) return;
        viewerResources.subject.rotation.y += (e.clientX - previous.x) * @ROTATE@;
        viewerResources.subject.rotation.x += (e.clientY - previous.y) * @ROTATE@;
        previous = { x: e.clientX, y: e.clientY };
    });
    track(canvas, 'mouseup', () => { isDragging = false; });
    track(canvas, 'mouseleave', () => { isDragging = false; });
    track(canvas, 'wheel', (e) => {
        if (!viewerResources || !viewerResources.subject) return;
        e.preventDefault();
        const step = e.deltaY > 0 ? @ZOOM_OUT@ : @ZOOM_IN@;
        currentScale = Math.min(MAX_SCALE, Math.max(MIN_SCALE, currentScale * step));
        viewerResources.subject.scale.set(currentScale, currentScale, currentScale);
    });
    track(window, 'resize', () => {
        if (!viewerResources || !viewerResources.camera || !viewerResources.renderer) return;
        viewerResources.camera.aspect = window.innerWidth / window.innerHeight;
        viewerResources.camera.updateProjectionMatrix();
        viewerResources.renderer.setSize(window.innerWidth, window.innerHeight);
    });

    // Render loop: each reschedule re-checks that the holder is present,
    // so no frame can fire after teardown.
    function animate() {
        if (!viewerResources || !viewerResources.renderer) return;
        viewerResources.animationId = requestAnimationFrame(animate);
        viewerResources.renderer.render(viewerResources.scene, viewerResources.camera);
    }

    animate();
}

if (!isContextSupported()) {
    showError('WebGL is not supported in your environment.');
} else {
    try {
        initializeViewer();
    } catch (error) {
        showError('Failed to initialize 3D viewer: ' + error.message);
        cleanupResources();
    }
}
"#;
