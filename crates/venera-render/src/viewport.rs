//! Viewport/scissor sub-rectangles for picture-in-picture rendering.

/// A pixel-space sub-rectangle of the window surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// The whole surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Apply as both viewport and scissor so the pass cannot paint outside
    /// its picture-in-picture rectangle.
    pub fn apply(&self, pass: &mut wgpu::RenderPass) {
        pass.set_viewport(self.x, self.y, self.width, self.height, 0.0, 1.0);
        pass.set_scissor_rect(
            self.x as u32,
            self.y as u32,
            self.width as u32,
            self.height as u32,
        );
    }

    /// Width / height, guarded against degenerate rectangles.
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

/// The globe minimap: a square of side `width/4` in the bottom-left corner.
///
/// Surface coordinates put y=0 at the top, so "bottom-left" starts at
/// `height - side`.
pub fn minimap_viewport(surface_width: u32, surface_height: u32) -> Viewport {
    let side = surface_width as f32 / 4.0;
    Viewport {
        x: 0.0,
        y: (surface_height as f32 - side).max(0.0),
        width: side,
        height: side.min(surface_height as f32),
    }
}

/// Debug view of the capture texture feeding the height field: a fixed
/// 256×256 square partway up the left edge.
pub fn capture_debug_viewport(surface_height: u32) -> Viewport {
    let side = 256.0_f32.min(surface_height as f32);
    Viewport {
        x: 0.0,
        y: (surface_height as f32 - 384.0 - side).max(0.0),
        width: side,
        height: side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_viewport_covers_surface() {
        let vp = Viewport::full(1280, 720);
        assert_eq!(vp.x, 0.0);
        assert_eq!(vp.y, 0.0);
        assert_eq!(vp.width, 1280.0);
        assert_eq!(vp.height, 720.0);
    }

    #[test]
    fn test_minimap_is_quarter_width_square_bottom_left() {
        let vp = minimap_viewport(1200, 800);
        assert_eq!(vp.width, 300.0);
        assert_eq!(vp.height, 300.0);
        assert_eq!(vp.x, 0.0);
        assert_eq!(vp.y, 500.0);
        assert!((vp.aspect_ratio() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_minimap_clamped_in_short_windows() {
        // A window shorter than width/4 must not produce a negative origin.
        let vp = minimap_viewport(1200, 200);
        assert_eq!(vp.y, 0.0);
        assert_eq!(vp.height, 200.0);
    }

    #[test]
    fn test_capture_debug_view_sits_above_minimap() {
        let vp = capture_debug_viewport(800);
        assert_eq!(vp.width, 256.0);
        assert_eq!(vp.y, 800.0 - 384.0 - 256.0);
    }
}
