//! Collision and containment for molecules
//!
//! Molecules reflect off the chamber frame and off the partition. All
//! reflections are axis-aligned sign flips, so speed never changes.
//! Molecules do not collide with each other.

use super::gate::Gate;
use super::state::Molecule;
use crate::consts::*;

/// What happened at the partition during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionCrossing {
    /// The molecule did not reach a partition face
    None,
    /// The molecule hit the partition and bounced back
    Blocked,
    /// The molecule went through the open slit
    Admitted,
}

/// Keep a molecule inside the chamber frame.
///
/// Returns true if any edge was hit.
pub fn contain_in_frame(m: &mut Molecule) -> bool {
    let mut hit = false;

    if m.pos.x < FRAME_LEFT {
        m.pos.x = FRAME_LEFT;
        m.vel.x = -m.vel.x;
        hit = true;
    }
    if m.pos.x > FRAME_RIGHT {
        m.pos.x = FRAME_RIGHT;
        m.vel.x = -m.vel.x;
        hit = true;
    }
    if m.pos.y < FRAME_TOP {
        m.pos.y = FRAME_TOP;
        m.vel.y = -m.vel.y;
        hit = true;
    }
    if m.pos.y > FRAME_BOTTOM {
        m.pos.y = FRAME_BOTTOM;
        m.vel.y = -m.vel.y;
        hit = true;
    }

    hit
}

/// Block or admit a molecule that crossed a partition face this tick.
///
/// `prev_x` is the x position before the tick's move. Comparing it with the
/// current x catches molecules that would otherwise skip past a face. A
/// molecule starting exactly on a face still counts as crossing when it
/// moves through it; one just bounced off a face moves away from it.
pub fn resolve_partition(m: &mut Molecule, prev_x: f32, gate: &Gate) -> PartitionCrossing {
    let face = if prev_x <= PARTITION_LEFT && m.pos.x > PARTITION_LEFT {
        PARTITION_LEFT
    } else if prev_x >= PARTITION_RIGHT && m.pos.x < PARTITION_RIGHT {
        PARTITION_RIGHT
    } else {
        return PartitionCrossing::None;
    };

    if gate.admits(m.pos.y) {
        return PartitionCrossing::Admitted;
    }

    m.pos.x = face;
    m.vel.x = -m.vel.x;
    PartitionCrossing::Blocked
}

/// Full per-tick resolution for one molecule after it moved
pub fn resolve(m: &mut Molecule, prev_x: f32, gate: &Gate) -> PartitionCrossing {
    contain_in_frame(m);
    resolve_partition(m, prev_x, gate)
}

/// Whether the molecule will reach a partition face during its next step,
/// and at what height. Used to steer the slit ahead of time.
pub fn next_crossing(m: &Molecule) -> Option<f32> {
    let next = m.pos + m.vel;
    let crosses = (m.pos.x <= PARTITION_LEFT && next.x > PARTITION_LEFT)
        || (m.pos.x >= PARTITION_RIGHT && next.x < PARTITION_RIGHT);
    // Frame containment runs before the partition check
    crosses.then_some(next.y.clamp(FRAME_TOP, FRAME_BOTTOM))
}
