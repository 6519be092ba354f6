//! Move packets (client -> server) and acknowledgments (server -> client).
//!
//! Vectors travel as `[f32; 3]` so the wire layout does not depend on nalgebra's serde support.

use serde::{Deserialize, Serialize};

use super::{MoveState, MovementMode, Vec3};
use crate::{bitmask_flags::CompressedFlags, error::WireError};

/// One (possibly combined) move as sent to the server.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetMove {
    pub sequence: u32,
    pub delta_time: f32,
    pub acceleration: [f32; 3],
    /// Compressed flags byte; the sprint intent is the `Custom0` bit.
    pub flags: u8,
    /// Where the client ended up after simulating this move.
    pub client_location: [f32; 3],
}

impl NetMove {
    pub fn acceleration(&self) -> Vec3 {
        Vec3::from(self.acceleration)
    }

    pub fn client_location(&self) -> Vec3 {
        Vec3::from(self.client_location)
    }

    pub fn compressed_flags(&self) -> CompressedFlags {
        CompressedFlags::new(self.flags)
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Kinematic state as carried by an acknowledgment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetMoveState {
    pub location: [f32; 3],
    pub velocity: [f32; 3],
    pub mode: MovementMode,
    pub max_walk_speed: f32,
}

impl From<MoveState> for NetMoveState {
    fn from(state: MoveState) -> Self {
        Self {
            location: state.location.into(),
            velocity: state.velocity.into(),
            mode: state.mode,
            max_walk_speed: state.max_walk_speed,
        }
    }
}

impl From<NetMoveState> for MoveState {
    fn from(state: NetMoveState) -> Self {
        Self {
            location: Vec3::from(state.location),
            velocity: Vec3::from(state.velocity),
            mode: state.mode,
            max_walk_speed: state.max_walk_speed,
        }
    }
}

/// The server's answer to a move. `state` is authoritative when `corrected` is set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveAck {
    pub sequence: u32,
    pub corrected: bool,
    pub state: NetMoveState,
}

impl MoveAck {
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask_flags::SPRINT_FLAG;

    #[test]
    fn sprint_bit_survives_the_wire() {
        let net = NetMove {
            sequence: 7,
            delta_time: 0.016,
            acceleration: [2048.0, 0.0, 0.0],
            flags: 0x10,
            client_location: [1.0, 2.0, 0.0],
        };
        let decoded = NetMove::decode(&net.encode().unwrap()).unwrap();
        assert_eq!(decoded, net);
        assert!(decoded.compressed_flags().has(SPRINT_FLAG));
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let ack = MoveAck {
            sequence: 3,
            corrected: true,
            state: MoveState::at(Vec3::new(5.0, 0.0, 0.0), 250.0).into(),
        };
        let bytes = ack.encode().unwrap();
        assert!(MoveAck::decode(&bytes[..bytes.len() - 2]).is_err());
    }
}
