use crate::error::{Outcome, Rejection};

/// Where a piece of state is being simulated.
///
/// There is exactly one authority per simulated world. Every other participant holds a
/// read-only replicated shadow and may only send requests to the authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum NetRole {
    /// The server (or a standalone game). Owns the state.
    #[default]
    Authority,
    /// The client controlling this character. Predicts its own movement.
    AutonomousProxy,
    /// Any other client. Only mirrors replicated state.
    SimulatedProxy,
}

impl NetRole {
    pub fn has_authority(self) -> bool {
        matches!(self, NetRole::Authority)
    }

    pub fn is_locally_controlled(self) -> bool {
        matches!(self, NetRole::AutonomousProxy)
    }

    /// Entry check for every state-changing handler.
    pub fn require_authority(self) -> Outcome {
        if self.has_authority() {
            Ok(())
        } else {
            Err(Rejection::NoAuthority)
        }
    }
}
