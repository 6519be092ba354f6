use std::collections::VecDeque;

use super::{MoveAck, MoveState, MovementComponent, NetMove, SavedMove, Vec3};
use crate::{
    sequence::{is_newer, is_stale},
    settings::PredictionSettings,
};

/// How a server correction is presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrectionKind {
    /// Small error: blend the visual offset away.
    Smooth,
    /// Medium error: blend, but cap the visual offset to the smoothing distance.
    Clamped,
    /// Large error: teleport.
    Snap,
}

impl CorrectionKind {
    pub fn classify(distance: f32, settings: &PredictionSettings) -> Self {
        if distance > settings.no_smooth_net_update_dist {
            CorrectionKind::Snap
        } else if distance > settings.max_smooth_net_update_dist {
            CorrectionKind::Clamped
        } else {
            CorrectionKind::Smooth
        }
    }
}

/// Result of applying a server correction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correction {
    pub kind: CorrectionKind,
    /// Distance between the predicted and the corrected location.
    pub distance: f32,
    /// Offset a renderer should blend away (old minus new location). Zero on snap.
    pub visual_offset: Vec3,
}

/// Client-side prediction bookkeeping for the locally controlled character.
///
/// Moves are identified by a monotonically increasing sequence number. The newest move is held
/// back as `pending` for one frame so the next sample can be folded into it; everything already
/// sent waits in `saved_moves` until the server acknowledges it.
#[derive(Debug)]
pub struct ClientPredictionData {
    settings: PredictionSettings,
    saved_moves: VecDeque<SavedMove>,
    pending: Option<SavedMove>,
    next_sequence: u32,
    last_acked: Option<u32>,
}

impl ClientPredictionData {
    pub fn new(settings: PredictionSettings) -> Self {
        Self {
            settings,
            saved_moves: VecDeque::with_capacity(settings.max_saved_moves),
            pending: None,
            next_sequence: 0,
            last_acked: None,
        }
    }

    pub fn saved_moves(&self) -> impl Iterator<Item = &SavedMove> {
        self.saved_moves.iter()
    }

    pub fn unacked_len(&self) -> usize {
        self.saved_moves.len()
    }

    pub fn pending(&self) -> Option<&SavedMove> {
        self.pending.as_ref()
    }

    pub fn last_acked(&self) -> Option<u32> {
        self.last_acked
    }

    /// Captures, simulates and queues one input sample.
    ///
    /// Returns the moves that became ready to send: the previous pending move when the new
    /// sample could not be folded into it. A frame longer than `max_move_delta_time` is split
    /// into equal moves the server will replay unclamped.
    pub fn replicate_move(
        &mut self,
        movement: &mut MovementComponent,
        delta_time: f32,
        acceleration: Vec3,
    ) -> Vec<NetMove> {
        let max_dt = self.settings.max_move_delta_time;
        if max_dt <= 0.0 || !delta_time.is_finite() || delta_time <= max_dt {
            return self.replicate_step(movement, delta_time, acceleration);
        }

        let steps = (delta_time / max_dt).ceil() as u32;
        let step = (delta_time / steps as f32).min(max_dt);
        let mut outbound = Vec::new();
        for _ in 0..steps {
            outbound.extend(self.replicate_step(movement, step, acceleration));
        }
        outbound
    }

    fn replicate_step(
        &mut self,
        movement: &mut MovementComponent,
        delta_time: f32,
        acceleration: Vec3,
    ) -> Vec<NetMove> {
        let mut outbound = Vec::new();
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);

        let mut new_move = SavedMove::set_move_for(movement, sequence, delta_time, acceleration);

        if let Some(pending) = self.pending.take() {
            if pending.can_combine_with(&new_move, self.settings.max_move_delta_time) {
                // Rewind to where the pending move started and simulate both as one.
                new_move.combine_with(&pending);
                movement.set_state(new_move.start);
            } else {
                outbound.push(self.send(pending));
            }
        }

        new_move.prep_move_for(movement);
        movement.perform_move(new_move.delta_time, new_move.acceleration);
        new_move.post_update(movement);
        self.pending = Some(new_move);
        outbound
    }

    /// Sends the pending move now instead of waiting for the next sample.
    pub fn flush(&mut self) -> Option<NetMove> {
        let pending = self.pending.take()?;
        Some(self.send(pending))
    }

    fn send(&mut self, saved: SavedMove) -> NetMove {
        if self.saved_moves.len() >= self.settings.max_saved_moves {
            if let Some(dropped) = self.saved_moves.pop_front() {
                log::warn!(
                    "saved move queue full, dropping unacknowledged move {}",
                    dropped.sequence
                );
            }
        }
        let net = saved.to_net();
        self.saved_moves.push_back(saved);
        net
    }

    /// Applies a server acknowledgment.
    ///
    /// Acknowledged moves are discarded. On a correction the authoritative state is applied and
    /// every remaining move (including the pending one) is replayed on top of it. The live
    /// intents of `movement` are restored afterwards.
    pub fn receive_ack(
        &mut self,
        movement: &mut MovementComponent,
        ack: MoveAck,
    ) -> Option<Correction> {
        if is_stale(ack.sequence, self.last_acked) {
            log::debug!("ignoring stale ack {}", ack.sequence);
            return None;
        }
        self.last_acked = Some(ack.sequence);
        while self
            .saved_moves
            .front()
            .is_some_and(|m| !is_newer(m.sequence, ack.sequence))
        {
            self.saved_moves.pop_front();
        }

        if !ack.corrected {
            return None;
        }

        let predicted = movement.location();
        let live_flags = movement.compressed_flags();

        movement.set_state(MoveState::from(ack.state));
        for saved in self.saved_moves.iter_mut().chain(self.pending.iter_mut()) {
            saved.start = movement.state();
            saved.prep_move_for(movement);
            movement.perform_move(saved.delta_time, saved.acceleration);
            saved.post_update(movement);
        }
        movement.update_from_compressed_flags(live_flags);

        let offset = predicted - movement.location();
        let distance = offset.norm();
        let kind = CorrectionKind::classify(distance, &self.settings);
        let visual_offset = match kind {
            CorrectionKind::Smooth => offset,
            CorrectionKind::Clamped => offset.cap_magnitude(self.settings.max_smooth_net_update_dist),
            CorrectionKind::Snap => Vec3::zeros(),
        };
        log::warn!(
            "corrected by server at move {} ({distance:.1}, {kind:?})",
            ack.sequence
        );

        Some(Correction {
            kind,
            distance,
            visual_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        movement::{MovementMode, NetMoveState},
        settings::MovementSettings,
    };

    fn setup() -> (ClientPredictionData, MovementComponent) {
        (
            ClientPredictionData::new(PredictionSettings::default()),
            MovementComponent::new(Vec3::zeros(), MovementSettings::default()),
        )
    }

    #[test]
    fn similar_samples_are_combined_until_a_change() {
        let (mut prediction, mut movement) = setup();
        let forward = movement.scale_input(Vec3::x());

        assert!(prediction.replicate_move(&mut movement, 0.02, forward).is_empty());
        assert!(prediction.replicate_move(&mut movement, 0.02, forward).is_empty());
        assert!((prediction.pending().unwrap().delta_time - 0.04).abs() < 1e-6);

        movement.start_sprinting();
        let sent = prediction.replicate_move(&mut movement, 0.02, forward);
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].compressed_flags().has(crate::bitmask_flags::SPRINT_FLAG));
        assert!((sent[0].delta_time - 0.04).abs() < 1e-6);
        assert_eq!(prediction.unacked_len(), 1);
    }

    #[test]
    fn combined_move_matches_single_simulation() {
        let (mut prediction, mut movement) = setup();
        let forward = movement.scale_input(Vec3::x());
        prediction.replicate_move(&mut movement, 0.02, forward);
        prediction.replicate_move(&mut movement, 0.03, forward);

        let combined = *prediction.pending().unwrap();
        assert_eq!(combined.start.location, Vec3::zeros());

        let mut reference = MovementComponent::new(Vec3::zeros(), MovementSettings::default());
        reference.perform_move(combined.delta_time, forward);
        assert_eq!(movement.location(), reference.location());
        assert_eq!(prediction.pending().unwrap().end.location, reference.location());
    }

    #[test]
    fn ack_discards_moves_and_ignores_stale() {
        let (mut prediction, mut movement) = setup();
        let forward = movement.scale_input(Vec3::x());
        for _ in 0..4 {
            prediction.replicate_move(&mut movement, 0.1, forward);
        }
        assert_eq!(prediction.unacked_len(), 3);

        let ack = |sequence| MoveAck {
            sequence,
            corrected: false,
            state: NetMoveState::from(MoveState::at(Vec3::zeros(), 250.0)),
        };
        assert!(prediction.receive_ack(&mut movement, ack(1)).is_none());
        assert_eq!(prediction.unacked_len(), 1);
        assert!(prediction.receive_ack(&mut movement, ack(0)).is_none());
        assert_eq!(prediction.last_acked(), Some(1));
    }

    #[test]
    fn correction_replays_unacked_moves() {
        let (mut prediction, mut movement) = setup();
        let forward = movement.scale_input(Vec3::x());
        for _ in 0..3 {
            prediction.replicate_move(&mut movement, 0.1, forward);
        }
        let before = movement.location();

        // Server says move 0 actually ended 10 units to the side.
        let mut server_state = prediction.saved_moves().next().unwrap().end;
        server_state.location.y += 10.0;
        let correction = prediction
            .receive_ack(
                &mut movement,
                MoveAck {
                    sequence: 0,
                    corrected: true,
                    state: server_state.into(),
                },
            )
            .unwrap();

        assert_eq!(correction.kind, CorrectionKind::Smooth);
        assert!((correction.distance - 10.0).abs() < 1e-3);
        assert!((movement.location().y - 10.0).abs() < 1e-3);
        assert!((movement.location().x - before.x).abs() < 1e-3);
        assert_eq!(movement.mode(), MovementMode::Walking);
    }

    #[test]
    fn replay_restores_live_intent() {
        let (mut prediction, mut movement) = setup();
        let forward = movement.scale_input(Vec3::x());
        movement.start_sprinting();
        prediction.replicate_move(&mut movement, 0.1, forward);
        prediction.flush();
        movement.stop_sprinting();

        let state = MoveState::at(Vec3::zeros(), 250.0);
        prediction.receive_ack(
            &mut movement,
            MoveAck {
                sequence: 0,
                corrected: true,
                state: state.into(),
            },
        );
        assert!(!movement.wants_sprint());
    }

    #[test]
    fn correction_kinds_follow_distance() {
        let settings = PredictionSettings::default();
        assert_eq!(CorrectionKind::classify(10.0, &settings), CorrectionKind::Smooth);
        assert_eq!(CorrectionKind::classify(100.0, &settings), CorrectionKind::Clamped);
        assert_eq!(CorrectionKind::classify(200.0, &settings), CorrectionKind::Snap);
    }

    #[test]
    fn queue_is_bounded() {
        let settings = PredictionSettings {
            max_saved_moves: 2,
            ..PredictionSettings::default()
        };
        let mut prediction = ClientPredictionData::new(settings);
        let mut movement = MovementComponent::new(Vec3::zeros(), MovementSettings::default());
        for i in 0..6 {
            // Alternate direction so nothing combines.
            let dir = if i % 2 == 0 { Vec3::x() } else { -Vec3::x() };
            let accel = movement.scale_input(dir);
            prediction.replicate_move(&mut movement, 0.016, accel);
        }
        assert_eq!(prediction.unacked_len(), 2);
        assert_eq!(prediction.saved_moves().next().unwrap().sequence, 3);
    }

    #[test]
    fn long_frames_are_split_within_the_move_limit() {
        let (mut prediction, mut movement) = setup();
        let forward = movement.scale_input(Vec3::x());

        let mut sent = prediction.replicate_move(&mut movement, 0.3, forward);
        sent.extend(prediction.flush());

        assert_eq!(sent.len(), 3);
        for net in &sent {
            assert!((net.delta_time - 0.1).abs() < 1e-6);
        }
        assert_eq!(sent[2].sequence, 2);
    }

    #[test]
    fn acks_keep_working_across_the_sequence_wrap() {
        let (mut prediction, mut movement) = setup();
        prediction.next_sequence = u32::MAX - 1;
        for i in 0..3 {
            let dir = if i % 2 == 0 { Vec3::x() } else { -Vec3::x() };
            let accel = movement.scale_input(dir);
            prediction.replicate_move(&mut movement, 0.016, accel);
        }
        prediction.flush();
        assert_eq!(prediction.unacked_len(), 3);

        let ack = |sequence| MoveAck {
            sequence,
            corrected: false,
            state: NetMoveState::from(MoveState::at(Vec3::zeros(), 250.0)),
        };
        prediction.receive_ack(&mut movement, ack(u32::MAX));
        assert_eq!(prediction.unacked_len(), 1);
        assert_eq!(prediction.saved_moves().next().unwrap().sequence, 0);

        prediction.receive_ack(&mut movement, ack(u32::MAX - 1));
        assert_eq!(prediction.last_acked(), Some(u32::MAX));

        prediction.receive_ack(&mut movement, ack(0));
        assert_eq!(prediction.unacked_len(), 0);
    }
}
