use serde::{Deserialize, Serialize};

/// Pixel dimensions of a window, surface or viewport.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Minimized windows report a zero dimension.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl From<Size> for wgpu::Extent3d {
    fn from(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        }
    }
}

pub trait HasSize {
    fn size(&self) -> Size;
}

impl HasSize for winit::window::Window {
    fn size(&self) -> Size {
        self.inner_size().into()
    }
}

/// Anything the renderer can create a surface for.
pub trait Window: HasSize + raw_window_handle::HasRawWindowHandle {}

impl Window for winit::window::Window {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimized_sizes_are_empty() {
        assert!(Size::default().is_empty());
        assert!(Size::from(winit::dpi::PhysicalSize::<u32>::new(0, 720)).is_empty());
        assert!(Size::from(winit::dpi::PhysicalSize::<u32>::new(1280, 0)).is_empty());
        assert!(!Size::from(winit::dpi::PhysicalSize::<u32>::new(1, 1)).is_empty());
    }

    #[test]
    fn test_extent_is_single_layer() {
        let extent: wgpu::Extent3d = Size {
            width: 640,
            height: 360,
        }
        .into();
        assert_eq!((extent.width, extent.height), (640, 360));
        assert_eq!(extent.depth_or_array_layers, 1);
    }

    #[test]
    fn test_aspect_ratio() {
        let size = Size {
            width: 1920,
            height: 1080,
        };
        assert!((size.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
