/*!
Predicted character movement.

Layout:
- `component.rs`: the movement component (sprint/crouch/jump intents + kinematic state)
- `simulate.rs`: the pure kinematic step `(MoveState, MoveInput) -> MoveState`
- `saved_move.rs`: one captured input sample, combinable and replayable
- `prediction.rs`: client-side saved move queue, acknowledgment and correction replay
- `server.rs`: authoritative move processing and validation
- `wire.rs`: move packets and acknowledgments

Speed selection is never predicted ahead. Every step derives `max_walk_speed` from the flags
of the move being simulated, so a replay with a corrected flag corrects the speed too.
*/

mod component;
mod prediction;
mod saved_move;
mod server;
mod simulate;
mod wire;

pub use component::MovementComponent;
pub use prediction::{ClientPredictionData, Correction, CorrectionKind};
pub use saved_move::SavedMove;
pub use server::ServerMoveState;
pub use simulate::{select_max_walk_speed, simulate};
pub use wire::{MoveAck, NetMove, NetMoveState};

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::bitmask_flags::CompressedFlags;

pub type Vec3 = na::Vector3<f32>;

/// Lookup-only back-reference from stamina to whatever holds the sprint intent.
pub trait SprintIntent {
    fn is_sprinting(&self) -> bool;

    /// Clears the intent because stamina ran out.
    fn force_stop_sprinting(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Walking,
    Falling,
    /// Movement disabled.
    None,
}

/// Everything the kinematic step reads and writes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveState {
    pub location: Vec3,
    pub velocity: Vec3,
    pub mode: MovementMode,
    /// Derived during walking steps, kept as-is while falling.
    pub max_walk_speed: f32,
}

impl MoveState {
    pub fn at(location: Vec3, max_walk_speed: f32) -> Self {
        Self {
            location,
            velocity: Vec3::zeros(),
            mode: MovementMode::Walking,
            max_walk_speed,
        }
    }
}

/// One input sample as the simulation sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveInput {
    pub delta_time: f32,
    /// World-space acceleration, already scaled by max acceleration.
    pub acceleration: Vec3,
    pub flags: CompressedFlags,
}
