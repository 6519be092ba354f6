use super::{MoveInput, MoveState, MovementMode, Vec3};
use crate::{
    bitmask_flags::{MoveFlag, SPRINT_FLAG},
    settings::MovementSettings,
};

/// Max walking speed for the given intents. Sprint wins over crouch if both bits are set.
pub fn select_max_walk_speed(
    wants_sprint: bool,
    wants_crouch: bool,
    settings: &MovementSettings,
) -> f32 {
    if wants_sprint {
        settings.sprint_speed
    } else if wants_crouch {
        settings.crouched_speed
    } else {
        settings.walk_speed
    }
}

/// One deterministic movement step.
///
/// Behavior
/// - Re-derives `max_walk_speed` from the move's flags, but only while walking.
/// - A jump bit launches a walking character into `Falling`.
/// - Walking: accelerates toward the input, caps planar speed, brakes without input.
/// - Falling: reduced planar control plus gravity; landing on `z <= 0` returns to `Walking`.
/// - `None`: nothing moves.
///
/// The same function runs on the client when predicting, on the client when replaying after a
/// correction, and on the server when validating. It must stay free of any outside state.
pub fn simulate(state: MoveState, input: MoveInput, settings: &MovementSettings) -> MoveState {
    let mut next = state;
    let dt = if input.delta_time.is_finite() {
        input.delta_time.max(0.0)
    } else {
        0.0
    };

    if next.mode == MovementMode::None || dt <= 0.0 {
        return next;
    }

    // 1) Speed selection.
    if next.mode == MovementMode::Walking {
        next.max_walk_speed = select_max_walk_speed(
            input.flags.has(SPRINT_FLAG),
            input.flags.has(MoveFlag::WantsToCrouch),
            settings,
        );
    }

    // 2) Jump.
    if next.mode == MovementMode::Walking && input.flags.has(MoveFlag::JumpPressed) {
        next.velocity.z = settings.jump_z_velocity;
        next.mode = MovementMode::Falling;
    }

    // 3) Planar velocity.
    let accel = planar(input.acceleration).cap_magnitude(settings.max_acceleration);
    let mut planar_velocity = planar(next.velocity);
    match next.mode {
        MovementMode::Walking => {
            if accel.norm_squared() > 0.0 {
                planar_velocity += accel * dt;
            } else {
                let speed = planar_velocity.norm();
                let braked = (speed - settings.braking_deceleration * dt).max(0.0);
                planar_velocity = if speed > 0.0 {
                    planar_velocity * (braked / speed)
                } else {
                    Vec3::zeros()
                };
            }
        }
        MovementMode::Falling => {
            planar_velocity += accel * settings.air_control * dt;
            next.velocity.z += settings.gravity_z * dt;
        }
        MovementMode::None => {}
    }
    planar_velocity = planar_velocity.cap_magnitude(next.max_walk_speed.max(0.0));
    next.velocity.x = planar_velocity.x;
    next.velocity.y = planar_velocity.y;
    if next.mode == MovementMode::Walking {
        next.velocity.z = 0.0;
    }

    // 4) Integrate and land.
    next.location += next.velocity * dt;
    if next.mode == MovementMode::Falling && next.location.z <= 0.0 && next.velocity.z <= 0.0 {
        next.location.z = 0.0;
        next.velocity.z = 0.0;
        next.mode = MovementMode::Walking;
    }

    next
}

#[inline]
fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}
