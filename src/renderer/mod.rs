pub mod particle;
pub mod render_target;
#[allow(clippy::module_inception)]
mod renderer;

pub use renderer::Renderer;

/// Whether the format encodes linear shader output to sRGB on store.
pub fn is_srgb(format: wgpu::TextureFormat) -> bool {
    format.describe().srgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_srgb() {
        assert!(is_srgb(wgpu::TextureFormat::Bgra8UnormSrgb));
        assert!(is_srgb(wgpu::TextureFormat::Rgba8UnormSrgb));
        assert!(!is_srgb(wgpu::TextureFormat::Bgra8Unorm));
        assert!(!is_srgb(wgpu::TextureFormat::Rgba16Float));
    }
}
