pub mod authority;
pub mod bitmask_flags;
pub mod camera;
pub mod character;
pub mod constants;
pub mod door;
pub mod error;
pub mod hud;
pub mod movement;
pub mod notify;
pub mod replication;
pub mod resource;
pub mod rpc;
pub mod sequence;
pub mod settings;
pub mod timer;

pub use authority::NetRole;
pub use bitmask_flags::{CompressedFlags, MoveFlag, SPRINT_FLAG};
pub use character::Character;
pub use door::{Door, Interactable};
pub use error::{Outcome, Rejection, WireError};
pub use movement::{
    ClientPredictionData, MoveAck, MoveState, MovementComponent, MovementMode, NetMove,
    NetMoveState, SavedMove, ServerMoveState, SprintIntent,
};
pub use replication::{Replicable, ResourceDelta};
pub use resource::{Health, Resource, ResourceChanged, ResourceKind, Stamina, StaminaTick};
pub use rpc::{HealthOp, Request, StaminaOp};
pub use settings::{
    CharacterSettings, DoorSettings, MovementSettings, PredictionSettings, StaminaSettings,
};
pub use timer::{TimerHandle, TimerManager, TimerService};
