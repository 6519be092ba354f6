use super::{MoveAck, MovementComponent, NetMove};
use crate::{
    bitmask_flags::SPRINT_FLAG,
    error::Rejection,
    sequence::is_newer,
    settings::PredictionSettings,
};

/// Authoritative replay of client moves.
#[derive(Clone, Debug)]
pub struct ServerMoveState {
    settings: PredictionSettings,
    last_sequence: Option<u32>,
}

impl ServerMoveState {
    pub fn new(settings: PredictionSettings) -> Self {
        Self {
            settings,
            last_sequence: None,
        }
    }

    /// Rebuilds the state from a persisted last sequence.
    pub fn resume(settings: PredictionSettings, last_sequence: Option<u32>) -> Self {
        Self {
            settings,
            last_sequence,
        }
    }

    pub fn last_sequence(&self) -> Option<u32> {
        self.last_sequence
    }

    /// Decodes and replays one client move, then compares against where the client ended up.
    ///
    /// Behavior
    /// - Rejects sequences that are not newer than the last processed one (wrap-aware).
    /// - Clamps delta time to `[0, max_move_delta_time]` and acceleration to max acceleration.
    /// - Drops the sprint bit when `sprint_allowed` is false (no stamina on the authority).
    /// - Requests a correction when the squared position error exceeds the tolerance.
    pub fn process_move(
        &mut self,
        movement: &mut MovementComponent,
        net: &NetMove,
        sprint_allowed: bool,
    ) -> Result<MoveAck, Rejection> {
        if let Some(last) = self
            .last_sequence
            .filter(|&last| !is_newer(net.sequence, last))
        {
            return Err(Rejection::StaleSequence {
                received: net.sequence,
                last,
            });
        }

        let delta_time = if net.delta_time.is_finite() {
            net.delta_time.clamp(0.0, self.settings.max_move_delta_time)
        } else {
            0.0
        };
        let mut acceleration = net.acceleration();
        if !acceleration.iter().all(|c| c.is_finite()) {
            acceleration = acceleration.map(|_| 0.0);
        }
        let acceleration = acceleration.cap_magnitude(movement.settings().max_acceleration);

        let mut flags = net.compressed_flags();
        if flags.has(SPRINT_FLAG) && !sprint_allowed {
            log::debug!("move {}: sprint bit dropped, no stamina", net.sequence);
            flags.remove(SPRINT_FLAG);
        }
        movement.update_from_compressed_flags(flags);
        movement.perform_move(delta_time, acceleration);
        self.last_sequence = Some(net.sequence);

        let error_sq = (movement.location() - net.client_location()).norm_squared();
        let corrected = !error_sq.is_finite() || error_sq > self.settings.max_position_error_sq;
        if corrected {
            log::warn!(
                "move {}: client off by {:.2}, sending correction",
                net.sequence,
                error_sq.sqrt()
            );
        }

        Ok(MoveAck {
            sequence: net.sequence,
            corrected,
            state: movement.state().into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        movement::{ClientPredictionData, Vec3},
        settings::MovementSettings,
    };

    fn components() -> (MovementComponent, MovementComponent) {
        (
            MovementComponent::new(Vec3::zeros(), MovementSettings::default()),
            MovementComponent::new(Vec3::zeros(), MovementSettings::default()),
        )
    }

    #[test]
    fn honest_client_is_not_corrected() {
        let (mut client, mut server) = components();
        let mut prediction = ClientPredictionData::new(PredictionSettings::default());
        let mut authority = ServerMoveState::new(PredictionSettings::default());

        client.start_sprinting();
        let forward = client.scale_input(Vec3::x());
        let mut sent = Vec::new();
        for _ in 0..5 {
            sent.extend(prediction.replicate_move(&mut client, 0.1, forward));
        }
        sent.extend(prediction.flush());

        for net in &sent {
            let ack = authority.process_move(&mut server, net, true).unwrap();
            assert!(!ack.corrected);
        }
        assert!(server.wants_sprint());
        assert_eq!(server.max_walk_speed(), server.settings().sprint_speed);
        assert_eq!(server.location(), client.location());
    }

    #[test]
    fn stale_and_duplicate_moves_are_rejected() {
        let (mut client, mut server) = components();
        let mut authority = ServerMoveState::new(PredictionSettings::default());
        let net = NetMove {
            sequence: 4,
            delta_time: 0.05,
            acceleration: [0.0; 3],
            flags: 0,
            client_location: client.location().into(),
        };
        authority.process_move(&mut server, &net, true).unwrap();
        assert_eq!(
            authority.process_move(&mut server, &net, true),
            Err(Rejection::StaleSequence {
                received: 4,
                last: 4
            })
        );
        client.perform_move(0.05, Vec3::zeros());
        assert_eq!(authority.last_sequence(), Some(4));
    }

    #[test]
    fn sprint_without_stamina_is_corrected() {
        let (mut client, mut server) = components();
        let mut prediction = ClientPredictionData::new(PredictionSettings::default());
        let mut authority = ServerMoveState::new(PredictionSettings::default());
        client.start_sprinting();
        let forward = client.scale_input(Vec3::x());

        // Accelerate long enough for sprint and walk speeds to diverge.
        let mut sent = Vec::new();
        for _ in 0..4 {
            sent.extend(prediction.replicate_move(&mut client, 0.1, forward));
        }
        sent.extend(prediction.flush());

        let acks: Vec<_> = sent
            .iter()
            .map(|net| authority.process_move(&mut server, net, false).unwrap())
            .collect();
        assert!(!server.wants_sprint());
        assert_eq!(server.max_walk_speed(), server.settings().walk_speed);
        assert!(acks.last().unwrap().corrected);
    }

    #[test]
    fn oversized_delta_time_is_clamped() {
        let (_, mut server) = components();
        let mut authority = ServerMoveState::new(PredictionSettings::default());
        let net = NetMove {
            sequence: 0,
            delta_time: 10.0,
            acceleration: [1.0e9, 0.0, 0.0],
            flags: 0,
            client_location: [0.0; 3],
        };
        authority.process_move(&mut server, &net, true).unwrap();
        let max_step = server.settings().walk_speed * PredictionSettings::default().max_move_delta_time;
        assert!(server.location().x <= max_step + 1e-3);
    }

    #[test]
    fn sequence_wraps_past_u32_max() {
        let (_, mut server) = components();
        let mut authority = ServerMoveState::resume(PredictionSettings::default(), Some(u32::MAX));
        let net = NetMove {
            sequence: 0,
            delta_time: 0.05,
            acceleration: [0.0; 3],
            flags: 0,
            client_location: [0.0; 3],
        };

        assert!(authority.process_move(&mut server, &net, true).is_ok());
        assert_eq!(authority.last_sequence(), Some(0));

        let old = NetMove {
            sequence: u32::MAX,
            ..net
        };
        assert!(matches!(
            authority.process_move(&mut server, &old, true),
            Err(Rejection::StaleSequence { .. })
        ));
    }
}
