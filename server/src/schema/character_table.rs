use shared::{MoveState, MovementComponent, MovementSettings};
use spacetimedb::*;

use crate::types::{DbMovementMode, DbVec3};

/// Authoritative movement state of a live character.
///
/// Public so simulated proxies can follow other characters. The owning client reconciles
/// against `move_ack` instead of this row.
#[table(name = character, public)]
#[derive(Debug, Clone)]
pub struct CharacterRow {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    #[unique]
    pub owner: Identity,

    pub location: DbVec3,
    pub velocity: DbVec3,
    pub mode: DbMovementMode,
    pub max_walk_speed: f32,

    pub wants_sprint: bool,
    pub wants_crouch: bool,

    /// Sequence of the last client move replayed for this character.
    pub last_move_sequence: Option<u32>,
}

impl CharacterRow {
    pub fn spawn(owner: Identity, location: DbVec3, settings: &MovementSettings) -> Self {
        Self {
            id: 0,
            owner,
            location,
            velocity: DbVec3::ZERO,
            mode: DbMovementMode::Walking,
            max_walk_speed: settings.walk_speed,
            wants_sprint: false,
            wants_crouch: false,
            last_move_sequence: None,
        }
    }

    pub fn move_state(&self) -> MoveState {
        MoveState {
            location: self.location.into(),
            velocity: self.velocity.into(),
            mode: self.mode.into(),
            max_walk_speed: self.max_walk_speed,
        }
    }

    /// Rebuilds the movement component, intents included.
    pub fn to_movement(&self, settings: MovementSettings) -> MovementComponent {
        let mut movement = MovementComponent::new(self.location.into(), settings);
        movement.set_state(self.move_state());
        if self.wants_sprint {
            movement.start_sprinting();
        } else if self.wants_crouch {
            movement.start_crouching();
        }
        movement
    }

    pub fn with_movement(
        self,
        movement: &MovementComponent,
        last_move_sequence: Option<u32>,
    ) -> Self {
        let state = movement.state();
        Self {
            location: state.location.into(),
            velocity: state.velocity.into(),
            mode: state.mode.into(),
            max_walk_speed: state.max_walk_speed,
            wants_sprint: movement.wants_sprint(),
            wants_crouch: movement.wants_crouch(),
            last_move_sequence,
            ..self
        }
    }
}
