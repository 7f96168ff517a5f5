//! Motion key bindings and the per-tick intent snapshot.

use winit::keyboard::{KeyCode, PhysicalKey};

use crate::KeyboardState;

/// Physical keys driving walk, turn, and the minimap modifier.
#[derive(Debug, Clone, Copy)]
pub struct MotionBindings {
    pub walk_forward: KeyCode,
    pub walk_back: KeyCode,
    pub turn_left: KeyCode,
    pub turn_right: KeyCode,
    pub show_minimap: KeyCode,
}

impl Default for MotionBindings {
    fn default() -> Self {
        Self {
            walk_forward: KeyCode::KeyW,
            walk_back: KeyCode::KeyS,
            turn_left: KeyCode::KeyA,
            turn_right: KeyCode::KeyD,
            show_minimap: KeyCode::ShiftLeft,
        }
    }
}

/// What the player is asking for this tick, as plain booleans.
///
/// Snapshotted once per tick so every system in the frame sees the same
/// input, however events interleave with the redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionIntent {
    pub walk_forward: bool,
    pub walk_back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub show_minimap: bool,
}

impl MotionIntent {
    /// Snapshot the bound keys from the current keyboard state.
    pub fn capture(keyboard: &KeyboardState, bindings: &MotionBindings) -> Self {
        let held = |code: KeyCode| keyboard.is_pressed(PhysicalKey::Code(code));
        Self {
            walk_forward: held(bindings.walk_forward),
            walk_back: held(bindings.walk_back),
            turn_left: held(bindings.turn_left),
            turn_right: held(bindings.turn_right),
            show_minimap: held(bindings.show_minimap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawKeyEvent;
    use winit::event::ElementState;

    fn press(kb: &mut KeyboardState, code: KeyCode) {
        kb.process_raw(RawKeyEvent {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        });
    }

    #[test]
    fn test_default_bindings_are_wasd_shift() {
        let b = MotionBindings::default();
        assert_eq!(b.walk_forward, KeyCode::KeyW);
        assert_eq!(b.walk_back, KeyCode::KeyS);
        assert_eq!(b.turn_left, KeyCode::KeyA);
        assert_eq!(b.turn_right, KeyCode::KeyD);
        assert_eq!(b.show_minimap, KeyCode::ShiftLeft);
    }

    #[test]
    fn test_capture_reflects_held_keys() {
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::KeyW);
        press(&mut kb, KeyCode::ShiftLeft);

        let intent = MotionIntent::capture(&kb, &MotionBindings::default());
        assert!(intent.walk_forward);
        assert!(intent.show_minimap);
        assert!(!intent.walk_back);
        assert!(!intent.turn_left);
        assert!(!intent.turn_right);
    }

    #[test]
    fn test_rebound_keys_respected() {
        let mut kb = KeyboardState::new();
        press(&mut kb, KeyCode::ArrowUp);

        let bindings = MotionBindings {
            walk_forward: KeyCode::ArrowUp,
            ..MotionBindings::default()
        };
        let intent = MotionIntent::capture(&kb, &bindings);
        assert!(intent.walk_forward);
    }
}
