//! Per-tick lockstep of the orbit rig and the heading frame.

use crate::{HeadingFrame, OrbitRig};

/// Advance both frames by one tick of walk/turn motion.
///
/// The orbit rig walks then yaws; the heading frame counter-yaws by the same
/// turn, so the angular offset between the rig's walk direction and the
/// heading cue is invariant across any input sequence.
pub fn sync_rigs(rig: &mut OrbitRig, heading: &mut HeadingFrame, walk: f32, turn: f32) {
    rig.advance(walk, turn);
    heading.apply_turn(turn);
}
