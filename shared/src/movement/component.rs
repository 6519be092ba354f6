use super::{simulate, MoveInput, MoveState, MovementMode, SprintIntent, Vec3};
use crate::{
    bitmask_flags::{CompressedFlags, MoveFlag, SPRINT_FLAG},
    settings::MovementSettings,
};

/// Movement intents plus the kinematic state they drive.
///
/// Exists identically on the predicting client and on the server. Intents are written only
/// through the named start/stop operations or by decoding a move's compressed flags.
#[derive(Clone, Debug)]
pub struct MovementComponent {
    settings: MovementSettings,
    state: MoveState,
    wants_sprint: bool,
    wants_crouch: bool,
    jump_pressed: bool,
}

impl MovementComponent {
    pub fn new(location: Vec3, settings: MovementSettings) -> Self {
        Self {
            state: MoveState::at(location, settings.walk_speed),
            settings,
            wants_sprint: false,
            wants_crouch: false,
            jump_pressed: false,
        }
    }

    pub fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    /// Overwrites the kinematic state (server correction, combine rewind).
    pub fn set_state(&mut self, state: MoveState) {
        self.state = state;
    }

    pub fn location(&self) -> Vec3 {
        self.state.location
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn mode(&self) -> MovementMode {
        self.state.mode
    }

    pub fn set_mode(&mut self, mode: MovementMode) {
        self.state.mode = mode;
    }

    pub fn max_walk_speed(&self) -> f32 {
        self.state.max_walk_speed
    }

    pub fn wants_sprint(&self) -> bool {
        self.wants_sprint
    }

    pub fn wants_crouch(&self) -> bool {
        self.wants_crouch
    }

    pub fn is_crouching(&self) -> bool {
        self.wants_crouch && self.state.mode == MovementMode::Walking
    }

    /// Sets the sprint intent and drops any crouch intent.
    pub fn start_sprinting(&mut self) {
        self.wants_sprint = true;
        self.wants_crouch = false;
    }

    pub fn stop_sprinting(&mut self) {
        self.wants_sprint = false;
    }

    /// Sets the crouch intent and drops any sprint intent.
    pub fn start_crouching(&mut self) {
        self.wants_crouch = true;
        self.wants_sprint = false;
    }

    pub fn stop_crouching(&mut self) {
        self.wants_crouch = false;
    }

    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Packs the current intents into the compressed flags byte.
    pub fn compressed_flags(&self) -> CompressedFlags {
        let mut flags = CompressedFlags::default();
        flags.set(MoveFlag::JumpPressed, self.jump_pressed);
        flags.set(MoveFlag::WantsToCrouch, self.wants_crouch);
        flags.set(SPRINT_FLAG, self.wants_sprint);
        flags
    }

    /// Restores intents from a received or saved move before it is simulated.
    pub fn update_from_compressed_flags(&mut self, flags: CompressedFlags) {
        self.jump_pressed = flags.has(MoveFlag::JumpPressed);
        self.wants_crouch = flags.has(MoveFlag::WantsToCrouch);
        self.wants_sprint = flags.has(SPRINT_FLAG);
    }

    /// Converts a raw input direction into the acceleration a move carries.
    pub fn scale_input(&self, direction: Vec3) -> Vec3 {
        direction.cap_magnitude(1.0) * self.settings.max_acceleration
    }

    /// Simulates one step with the intents currently set.
    pub fn perform_move(&mut self, delta_time: f32, acceleration: Vec3) {
        let input = MoveInput {
            delta_time,
            acceleration,
            flags: self.compressed_flags(),
        };
        self.state = simulate(self.state, input, &self.settings);
        // One-shot: a jump is consumed by the step that sees it.
        self.jump_pressed = false;
    }
}

impl SprintIntent for MovementComponent {
    fn is_sprinting(&self) -> bool {
        self.wants_sprint
    }

    fn force_stop_sprinting(&mut self) {
        log::info!("sprint cleared: out of stamina");
        self.stop_sprinting();
    }
}
