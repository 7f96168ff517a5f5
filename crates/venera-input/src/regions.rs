//! Screen-region routing for pointer drags.

use glam::Vec2;

/// Which view a drag should steer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    /// The main terrain/vehicle view.
    MainView,
    /// The globe minimap in the bottom-left corner.
    Minimap,
}

/// The minimap's rectangle in normalized window coordinates.
///
/// A square of side `width/4` pinned to the bottom-left corner, matching the
/// picture-in-picture viewport the frame driver renders into. Returned as
/// `(min, max)` with y growing downward, the same convention as cursor
/// positions.
pub fn minimap_rect(window_size: (u32, u32)) -> (Vec2, Vec2) {
    let (w, h) = (window_size.0.max(1) as f32, window_size.1.max(1) as f32);
    let side = w / 4.0;
    (
        Vec2::new(0.0, (h - side) / h),
        Vec2::new(side / w, 1.0),
    )
}

/// Decide which view a drag at `position` steers.
///
/// Drags land on the minimap only while it is visible (the modifier held)
/// and the cursor is inside its corner rectangle; everywhere else they steer
/// the main view.
pub fn route_drag(position: Vec2, window_size: (u32, u32), minimap_visible: bool) -> DragTarget {
    if minimap_visible {
        let (min, max) = minimap_rect(window_size);
        if position.x >= min.x && position.x <= max.x && position.y >= min.y && position.y <= max.y
        {
            return DragTarget::Minimap;
        }
    }
    DragTarget::MainView
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: (u32, u32) = (1200, 800);

    #[test]
    fn test_minimap_rect_is_quarter_width_square() {
        let (min, max) = minimap_rect(WINDOW);
        // 300px square in a 1200x800 window.
        assert!((max.x - 0.25).abs() < 1e-6);
        assert!((min.y - (800.0 - 300.0) / 800.0).abs() < 1e-6);
        assert_eq!(min.x, 0.0);
        assert_eq!(max.y, 1.0);
    }

    #[test]
    fn test_bottom_left_drag_hits_minimap() {
        let pos = Vec2::new(0.1, 0.95);
        assert_eq!(route_drag(pos, WINDOW, true), DragTarget::Minimap);
    }

    #[test]
    fn test_minimap_ignored_when_hidden() {
        let pos = Vec2::new(0.1, 0.95);
        assert_eq!(route_drag(pos, WINDOW, false), DragTarget::MainView);
    }

    #[test]
    fn test_center_drag_hits_main_view() {
        let pos = Vec2::new(0.5, 0.5);
        assert_eq!(route_drag(pos, WINDOW, true), DragTarget::MainView);
    }

    #[test]
    fn test_corner_boundary_is_inclusive() {
        let (min, _) = minimap_rect(WINDOW);
        let pos = Vec2::new(0.25, min.y);
        assert_eq!(route_drag(pos, WINDOW, true), DragTarget::Minimap);
    }
}
