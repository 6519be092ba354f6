use shared::{MovementMode, NetMove, NetMoveState};

use super::DbVec3;

/// Movement mode as stored in the database.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbMovementMode {
    Walking,
    Falling,
    /// Movement disabled.
    None,
}

impl From<DbMovementMode> for MovementMode {
    fn from(mode: DbMovementMode) -> Self {
        match mode {
            DbMovementMode::Walking => MovementMode::Walking,
            DbMovementMode::Falling => MovementMode::Falling,
            DbMovementMode::None => MovementMode::None,
        }
    }
}

impl From<MovementMode> for DbMovementMode {
    fn from(mode: MovementMode) -> Self {
        match mode {
            MovementMode::Walking => DbMovementMode::Walking,
            MovementMode::Falling => DbMovementMode::Falling,
            MovementMode::None => DbMovementMode::None,
        }
    }
}

/// One client move as passed to `server_move`.
///
/// `flags` is the compressed flags byte; the sprint intent is its `Custom0` bit.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbNetMove {
    pub sequence: u32,
    pub delta_time: f32,
    pub acceleration: DbVec3,
    pub flags: u8,
    pub client_location: DbVec3,
}

impl From<DbNetMove> for NetMove {
    fn from(m: DbNetMove) -> Self {
        NetMove {
            sequence: m.sequence,
            delta_time: m.delta_time,
            acceleration: m.acceleration.into(),
            flags: m.flags,
            client_location: m.client_location.into(),
        }
    }
}

impl From<NetMove> for DbNetMove {
    fn from(m: NetMove) -> Self {
        DbNetMove {
            sequence: m.sequence,
            delta_time: m.delta_time,
            acceleration: m.acceleration.into(),
            flags: m.flags,
            client_location: m.client_location.into(),
        }
    }
}

/// Kinematic state carried by a move acknowledgment.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbMoveState {
    pub location: DbVec3,
    pub velocity: DbVec3,
    pub mode: DbMovementMode,
    pub max_walk_speed: f32,
}

impl From<NetMoveState> for DbMoveState {
    fn from(s: NetMoveState) -> Self {
        DbMoveState {
            location: s.location.into(),
            velocity: s.velocity.into(),
            mode: s.mode.into(),
            max_walk_speed: s.max_walk_speed,
        }
    }
}

impl From<DbMoveState> for NetMoveState {
    fn from(s: DbMoveState) -> Self {
        NetMoveState {
            location: s.location.into(),
            velocity: s.velocity.into(),
            mode: s.mode.into(),
            max_walk_speed: s.max_walk_speed,
        }
    }
}
