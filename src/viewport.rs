use winit::dpi::PhysicalSize;

/// Rasterization rectangle in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Viewport {
    /// Covers the whole framebuffer from the origin.
    #[inline]
    pub(crate) const fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// A minimized window reports a zero-sized framebuffer; nothing can be drawn into it.
    #[inline]
    pub(crate) fn is_drawable(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl From<PhysicalSize<u32>> for Viewport {
    fn from(size: PhysicalSize<u32>) -> Self {
        Self::full(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_starts_at_origin() {
        for (width, height) in [(800, 600), (1, 1), (3840, 2160), (600, 800)] {
            assert_eq!(
                Viewport::full(width, height),
                Viewport {
                    x: 0,
                    y: 0,
                    width,
                    height
                }
            );
        }
    }

    #[test]
    fn from_physical_size_keeps_width_and_height_order() {
        let viewport = Viewport::from(PhysicalSize::new(1024, 768));
        assert_eq!(viewport, Viewport::full(1024, 768));
    }

    #[test]
    fn resize_replaces_previous_viewport() {
        let mut viewport = Viewport::full(800, 600);
        assert!(viewport.is_drawable());

        for size in [PhysicalSize::new(1920, 1080), PhysicalSize::new(320, 240)] {
            viewport = Viewport::from(size);
            assert_eq!(viewport, Viewport::full(size.width, size.height));
        }
    }

    #[test]
    fn zero_sized_is_not_drawable() {
        assert!(!Viewport::full(0, 600).is_drawable());
        assert!(!Viewport::full(800, 0).is_drawable());
        assert!(Viewport::full(800, 600).is_drawable());
    }
}
