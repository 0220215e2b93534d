//! Capability probe: can the engine turn this source into a texture at all?

use crate::native::NativeEngine;

/// Ask the engine whether `uri` can be decoded into a texture.
///
/// A `false` verdict is final for that source; callers should not retry.
/// Empty URIs are rejected without crossing the boundary.
pub fn can_output_to_texture<E: NativeEngine + ?Sized>(engine: &E, uri: &str) -> bool {
    if uri.is_empty() {
        tracing::info!("Player cannot play the media: empty URI");
        return false;
    }

    let playable = engine.can_output_to_texture(uri);
    if playable {
        tracing::info!("Player can play the media: {}", uri);
    } else {
        tracing::info!("Player cannot play the media: {}", uri);
    }
    playable
}
