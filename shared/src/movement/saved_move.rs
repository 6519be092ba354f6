use super::{MoveState, MovementComponent, NetMove, Vec3};
use crate::{
    bitmask_flags::{CompressedFlags, MoveFlag, SPRINT_FLAG},
    constants::{ACCEL_DOT_THRESHOLD_COMBINE, ACCEL_MAG_THRESHOLD_COMBINE},
};

/// One captured input sample, kept until the server acknowledges it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SavedMove {
    pub sequence: u32,
    pub delta_time: f32,
    pub acceleration: Vec3,
    pub wants_sprint: bool,
    pub wants_crouch: bool,
    pub jump_pressed: bool,
    /// State before the move was simulated.
    pub start: MoveState,
    /// State after the move was simulated.
    pub end: MoveState,
}

impl SavedMove {
    /// Captures the intents and start state of `movement` for a move about to be simulated.
    pub fn set_move_for(
        movement: &MovementComponent,
        sequence: u32,
        delta_time: f32,
        acceleration: Vec3,
    ) -> Self {
        let flags = movement.compressed_flags();
        let state = movement.state();
        Self {
            sequence,
            delta_time,
            acceleration,
            wants_sprint: flags.has(SPRINT_FLAG),
            wants_crouch: flags.has(MoveFlag::WantsToCrouch),
            jump_pressed: flags.has(MoveFlag::JumpPressed),
            start: state,
            end: state,
        }
    }

    /// Records the state reached after simulating this move.
    pub fn post_update(&mut self, movement: &MovementComponent) {
        self.end = movement.state();
    }

    pub fn compressed_flags(&self) -> CompressedFlags {
        let mut flags = CompressedFlags::default();
        flags.set(MoveFlag::JumpPressed, self.jump_pressed);
        flags.set(MoveFlag::WantsToCrouch, self.wants_crouch);
        flags.set(SPRINT_FLAG, self.wants_sprint);
        flags
    }

    /// Whether `newer` can be folded into `self` (the pending move) and sent as one.
    ///
    /// The base predicate compares accelerations, movement mode, the non-sprint flags and the
    /// combined duration. The sprint bit is checked separately and vetoes on any mismatch.
    pub fn can_combine_with(&self, newer: &SavedMove, max_delta_time: f32) -> bool {
        if !self.base_can_combine_with(newer, max_delta_time) {
            return false;
        }
        self.wants_sprint == newer.wants_sprint
    }

    fn base_can_combine_with(&self, newer: &SavedMove, max_delta_time: f32) -> bool {
        // A jump must reach the server as its own move.
        if self.jump_pressed || newer.jump_pressed {
            return false;
        }
        if self.wants_crouch != newer.wants_crouch {
            return false;
        }
        if self.start.mode != newer.start.mode {
            return false;
        }
        if self.delta_time + newer.delta_time > max_delta_time {
            return false;
        }

        let a = self.acceleration;
        let b = newer.acceleration;
        let a_zero = a.norm_squared() == 0.0;
        let b_zero = b.norm_squared() == 0.0;
        if a_zero != b_zero {
            return false;
        }
        if a_zero {
            return true;
        }

        let (a_len, b_len) = (a.norm(), b.norm());
        if (a_len - b_len).abs() > ACCEL_MAG_THRESHOLD_COMBINE {
            return false;
        }
        (a / a_len).dot(&(b / b_len)) >= ACCEL_DOT_THRESHOLD_COMBINE
    }

    /// Absorbs the older `pending` move: the combined move starts where `pending` started and
    /// covers both durations.
    pub fn combine_with(&mut self, pending: &SavedMove) {
        self.delta_time += pending.delta_time;
        self.start = pending.start;
    }

    /// Restores this move's intents onto `movement` before it is replayed.
    pub fn prep_move_for(&self, movement: &mut MovementComponent) {
        movement.update_from_compressed_flags(self.compressed_flags());
    }

    pub fn to_net(&self) -> NetMove {
        NetMove {
            sequence: self.sequence,
            delta_time: self.delta_time,
            acceleration: self.acceleration.into(),
            flags: self.compressed_flags().bits,
            client_location: self.end.location.into(),
        }
    }
}
