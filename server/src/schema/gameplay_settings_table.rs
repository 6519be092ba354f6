use std::time::Duration;

use shared::{
    CharacterSettings, MovementSettings, PredictionSettings, StaminaSettings,
};
use spacetimedb::*;

/// Gameplay tuning shared by server and clients.
///
/// This is a single-row table (`id = 1`) that both:
/// - the server reads before replaying moves or ticking stamina, and
/// - clients subscribe to so their prediction runs on the same numbers.
///
/// Notes
/// - Distances in centimeters, speeds in cm/s, times in seconds unless the name says otherwise.
#[table(name = gameplay_settings, public)]
#[derive(Debug, Clone)]
pub struct GameplaySettings {
    /// Unique id (primary key). Use a single row with `id = 1`.
    #[primary_key]
    pub id: u32,

    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouched_speed: f32,
    pub max_acceleration: f32,
    pub braking_deceleration: f32,
    pub jump_z_velocity: f32,
    pub gravity_z: f32,
    pub air_control: f32,

    /// Period of the stamina drain/regen timer (milliseconds).
    pub stamina_tick_millis: u64,
    pub stamina_drain_amount: f32,
    pub stamina_fill_amount: f32,
    pub sprint_stamina_threshold: f32,

    /// Longest delta time a single (possibly combined) move may carry.
    pub max_move_delta_time: f32,
    pub max_saved_moves: u32,
    /// Squared distance above which the server corrects a client.
    pub max_position_error_sq: f32,
    pub max_smooth_net_update_dist: f32,
    pub no_smooth_net_update_dist: f32,

    pub camera_distance: f32,
    pub base_interact_distance: f32,
}

impl GameplaySettings {
    pub fn from_character_settings(id: u32, settings: &CharacterSettings) -> Self {
        let CharacterSettings {
            movement,
            stamina,
            prediction,
            camera_distance,
            base_interact_distance,
        } = *settings;

        Self {
            id,
            walk_speed: movement.walk_speed,
            sprint_speed: movement.sprint_speed,
            crouched_speed: movement.crouched_speed,
            max_acceleration: movement.max_acceleration,
            braking_deceleration: movement.braking_deceleration,
            jump_z_velocity: movement.jump_z_velocity,
            gravity_z: movement.gravity_z,
            air_control: movement.air_control,
            stamina_tick_millis: stamina.tick_interval.as_millis() as u64,
            stamina_drain_amount: stamina.drain_amount,
            stamina_fill_amount: stamina.fill_amount,
            sprint_stamina_threshold: stamina.sprint_threshold,
            max_move_delta_time: prediction.max_move_delta_time,
            max_saved_moves: prediction.max_saved_moves as u32,
            max_position_error_sq: prediction.max_position_error_sq,
            max_smooth_net_update_dist: prediction.max_smooth_net_update_dist,
            no_smooth_net_update_dist: prediction.no_smooth_net_update_dist,
            camera_distance,
            base_interact_distance,
        }
    }

    pub fn to_character_settings(&self) -> CharacterSettings {
        CharacterSettings {
            movement: MovementSettings {
                walk_speed: self.walk_speed,
                sprint_speed: self.sprint_speed,
                crouched_speed: self.crouched_speed,
                max_acceleration: self.max_acceleration,
                braking_deceleration: self.braking_deceleration,
                jump_z_velocity: self.jump_z_velocity,
                gravity_z: self.gravity_z,
                air_control: self.air_control,
            },
            stamina: StaminaSettings {
                tick_interval: Duration::from_millis(self.stamina_tick_millis),
                drain_amount: self.stamina_drain_amount,
                fill_amount: self.stamina_fill_amount,
                sprint_threshold: self.sprint_stamina_threshold,
            },
            prediction: PredictionSettings {
                max_move_delta_time: self.max_move_delta_time,
                max_saved_moves: self.max_saved_moves as usize,
                max_position_error_sq: self.max_position_error_sq,
                max_smooth_net_update_dist: self.max_smooth_net_update_dist,
                no_smooth_net_update_dist: self.no_smooth_net_update_dist,
            },
            camera_distance: self.camera_distance,
            base_interact_distance: self.base_interact_distance,
        }
    }
}
