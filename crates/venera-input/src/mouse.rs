//! Mouse state tracker for drag and zoom input.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Frame-coherent mouse state.
///
/// Positions are tracked in normalized window coordinates (fractions of the
/// window size), so drag deltas are resolution-independent: the same
/// convention the drag rigs expect. Forward winit events via the `on_*`
/// methods, query during the tick, and call
/// [`clear_transients`](Self::clear_transients) at end of frame.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    buttons_held: u32,
    scroll: f32,
}

impl MouseState {
    /// Creates a new `MouseState` with all fields zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. `x`/`y` are window-pixel coordinates;
    /// `window_size` converts them to the normalized convention.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64, window_size: (u32, u32)) {
        let (w, h) = window_size;
        let new_pos = Vec2::new(
            x as f32 / w.max(1) as f32,
            y as f32 / h.max(1) as f32,
        );
        self.delta += new_pos - self.position;
        self.position = new_pos;
    }

    /// Process a `MouseInput` event.
    pub fn on_button(&mut self, _button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => self.buttons_held += 1,
            ElementState::Released => self.buttons_held = self.buttons_held.saturating_sub(1),
        }
    }

    /// Process a `MouseWheel` event.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        match delta {
            MouseScrollDelta::LineDelta(_x, y) => {
                self.scroll += y;
            }
            MouseScrollDelta::PixelDelta(pos) => {
                // ~40 pixels of wheel travel is about one line.
                self.scroll += (pos.y / 40.0) as f32;
            }
        }
    }

    /// Clears per-frame transients: delta and scroll.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Cursor position as fractions of the window.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Movement since the last transient clear, in window fractions.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Whether any mouse button is currently held (a drag is in progress).
    #[must_use]
    pub fn any_button_held(&self) -> bool {
        self.buttons_held > 0
    }

    /// Scroll wheel lines accumulated this frame (positive = scroll up).
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: (u32, u32) = (800, 600);

    #[test]
    fn test_position_is_normalized() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(400.0, 150.0, WINDOW);
        assert_eq!(ms.position(), Vec2::new(0.5, 0.25));
    }

    #[test]
    fn test_delta_accumulates_between_clears() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(400.0, 300.0, WINDOW);
        ms.clear_transients();
        ms.on_cursor_moved(440.0, 300.0, WINDOW);
        ms.on_cursor_moved(480.0, 270.0, WINDOW);
        let d = ms.delta();
        assert!((d.x - 0.1).abs() < 1e-6);
        assert!((d.y + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_delta_resets_each_frame() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 100.0, WINDOW);
        ms.clear_transients();
        assert_eq!(ms.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_any_button_held_counts_overlapping_presses() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Left, ElementState::Pressed);
        ms.on_button(MouseButton::Right, ElementState::Pressed);
        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(ms.any_button_held());
        ms.on_button(MouseButton::Right, ElementState::Released);
        assert!(!ms.any_button_held());
    }

    #[test]
    fn test_release_without_press_is_harmless() {
        let mut ms = MouseState::new();
        ms.on_button(MouseButton::Left, ElementState::Released);
        assert!(!ms.any_button_held());
    }

    #[test]
    fn test_scroll_accumulates_and_clears() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 0.5));
        assert!((ms.scroll() - 1.5).abs() < f32::EPSILON);
        ms.clear_transients();
        assert_eq!(ms.scroll(), 0.0);
    }

    #[test]
    fn test_pixel_scroll_normalized_to_lines() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::PixelDelta(
            winit::dpi::PhysicalPosition::new(0.0, 80.0),
        ));
        assert!((ms.scroll() - 2.0).abs() < 1e-6);
    }
}
