//! Runtime tuning.
//!
//! Every struct here defaults to the values in [`crate::constants`]. The server persists a
//! single settings row and rebuilds these on demand, so both sides of the link simulate with
//! the same numbers.

use std::time::Duration;

use crate::constants::*;

/// Stamina timer configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaminaSettings {
    /// Period of the drain/regen timer.
    pub tick_interval: Duration,
    /// Amount removed per tick while sprinting.
    pub drain_amount: f32,
    /// Amount restored per tick while resting.
    pub fill_amount: f32,
    /// `can_sprint` threshold.
    pub sprint_threshold: f32,
}

impl Default for StaminaSettings {
    fn default() -> Self {
        Self {
            tick_interval: STAMINA_TICK_INTERVAL,
            drain_amount: STAMINA_DRAIN_AMOUNT,
            fill_amount: STAMINA_FILL_AMOUNT,
            sprint_threshold: SPRINT_STAMINA_THRESHOLD,
        }
    }
}

/// Kinematic movement configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementSettings {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouched_speed: f32,
    pub max_acceleration: f32,
    pub braking_deceleration: f32,
    pub jump_z_velocity: f32,
    pub gravity_z: f32,
    pub air_control: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            crouched_speed: CROUCHED_SPEED,
            max_acceleration: MAX_ACCELERATION,
            braking_deceleration: BRAKING_DECELERATION_WALKING,
            jump_z_velocity: JUMP_Z_VELOCITY,
            gravity_z: GRAVITY_Z,
            air_control: AIR_CONTROL,
        }
    }
}

/// Client prediction and server validation configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictionSettings {
    pub max_move_delta_time: f32,
    pub max_saved_moves: usize,
    pub max_position_error_sq: f32,
    pub max_smooth_net_update_dist: f32,
    pub no_smooth_net_update_dist: f32,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            max_move_delta_time: MAX_MOVE_DELTA_TIME,
            max_saved_moves: MAX_SAVED_MOVES,
            max_position_error_sq: MAX_POSITION_ERROR_SQUARED,
            max_smooth_net_update_dist: MAX_SMOOTH_NET_UPDATE_DIST,
            no_smooth_net_update_dist: NO_SMOOTH_NET_UPDATE_DIST,
        }
    }
}

/// Door swing configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorSettings {
    pub closed_yaw: f32,
    pub open_yaw: f32,
    pub open_speed: f32,
    pub rotation_interval: Duration,
    pub yaw_tolerance: f32,
}

impl Default for DoorSettings {
    fn default() -> Self {
        Self {
            closed_yaw: DOOR_CLOSED_YAW,
            open_yaw: DOOR_OPEN_YAW,
            open_speed: DOOR_OPEN_SPEED,
            rotation_interval: DOOR_ROTATION_INTERVAL,
            yaw_tolerance: DOOR_YAW_TOLERANCE,
        }
    }
}

/// Everything a character needs, grouped so it can be passed around as one value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterSettings {
    pub movement: MovementSettings,
    pub stamina: StaminaSettings,
    pub prediction: PredictionSettings,
    pub camera_distance: f32,
    pub base_interact_distance: f32,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            movement: MovementSettings::default(),
            stamina: StaminaSettings::default(),
            prediction: PredictionSettings::default(),
            camera_distance: CAMERA_DISTANCE,
            base_interact_distance: BASE_INTERACT_DISTANCE,
        }
    }
}
