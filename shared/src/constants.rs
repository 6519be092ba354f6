use std::time::Duration;

// All distances are centimeters and all speeds are centimeters per second.

/// Default value for current, maximum and base health on spawn.
pub const DEFAULT_HEALTH: f32 = 100.0;

/// Default value for current and maximum stamina on spawn.
pub const DEFAULT_STAMINA: f32 = 100.0;

/// Minimum stamina required to be allowed to sprint.
///
/// `has_stamina` only needs `current > 0`, this threshold is the stricter `can_sprint` gate.
pub const SPRINT_STAMINA_THRESHOLD: f32 = 5.0;

/// How often the stamina timer fires.
pub const STAMINA_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Stamina removed per timer tick while sprinting.
pub const STAMINA_DRAIN_AMOUNT: f32 = 1.0;

/// Stamina restored per timer tick while resting.
pub const STAMINA_FILL_AMOUNT: f32 = 1.0;

/// Max walking speed while the sprint intent is held.
pub const SPRINT_SPEED: f32 = 500.0;

/// Max walking speed without sprint intent.
pub const WALK_SPEED: f32 = 250.0;

/// Max walking speed while crouched.
pub const CROUCHED_SPEED: f32 = 250.0;

/// Acceleration applied toward the input direction.
pub const MAX_ACCELERATION: f32 = 2048.0;

/// Deceleration applied on the ground when there is no input.
pub const BRAKING_DECELERATION_WALKING: f32 = 900.0;

/// Launch velocity of a jump.
pub const JUMP_Z_VELOCITY: f32 = 280.0;

/// Gravity along Z (negative is down).
pub const GRAVITY_Z: f32 = -980.0;

/// Fraction of ground acceleration available while falling.
///
/// Convention:
/// - 1.0 = full ground control in air
/// - 0.0 = no air control
pub const AIR_CONTROL: f32 = 0.05;

/// Largest delta time a single saved move may cover (seconds).
///
/// Combining stops once the merged move would exceed this, and the server clamps
/// incoming moves to it.
pub const MAX_MOVE_DELTA_TIME: f32 = 0.125;

/// Maximum number of unacknowledged moves a client keeps before dropping the oldest.
pub const MAX_SAVED_MOVES: usize = 96;

/// Minimum dot product between two normalized accelerations for them to be considered equal.
pub const ACCEL_DOT_THRESHOLD_COMBINE: f32 = 0.999;

/// Maximum difference in acceleration magnitude for two moves to combine.
pub const ACCEL_MAG_THRESHOLD_COMBINE: f32 = 1.0;

/// Squared distance between client and server end locations the server tolerates
/// before sending a correction.
pub const MAX_POSITION_ERROR_SQUARED: f32 = 3.0;

/// Corrections up to this distance are smoothed over a few frames.
pub const MAX_SMOOTH_NET_UPDATE_DIST: f32 = 92.0;

/// Corrections beyond this distance snap without any smoothing.
pub const NO_SMOOTH_NET_UPDATE_DIST: f32 = 140.0;

/// Distance from the camera to the character in third person.
pub const CAMERA_DISTANCE: f32 = 300.0;

/// Reach of an interaction trace from the camera in first person.
pub const BASE_INTERACT_DISTANCE: f32 = 120.0;

/// Time to blend the camera into and out of the crouch offset (seconds).
pub const CROUCH_BLEND_DURATION: f32 = 0.1;

/// Door yaw when closed (degrees).
pub const DOOR_CLOSED_YAW: f32 = 0.0;

/// Door yaw when open (degrees).
pub const DOOR_OPEN_YAW: f32 = 90.0;

/// Interpolation speed used when swinging a door.
pub const DOOR_OPEN_SPEED: f32 = 2.0;

/// How often the door rotation is stepped while swinging.
pub const DOOR_ROTATION_INTERVAL: Duration = Duration::from_millis(10);

/// A swinging door stops once within this many degrees of its target.
pub const DOOR_YAW_TOLERANCE: f32 = 0.1;
