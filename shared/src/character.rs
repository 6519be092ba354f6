//! A playable character: health, stamina and predicted movement composed into one actor.
//!
//! The same type runs on every participant. `role` decides which half of it is live:
//! - `Authority` replays client moves, owns the stamina timer and produces replication deltas.
//! - `AutonomousProxy` predicts its own moves, reconciles against acks and applies deltas.
//! - `SimulatedProxy` only applies deltas.

use crate::{
    authority::NetRole,
    camera::Perspective,
    door::Interactable,
    error::{Outcome, Rejection},
    movement::{
        ClientPredictionData, Correction, MoveAck, MovementComponent, NetMove, ServerMoveState,
        SprintIntent, Vec3,
    },
    replication::{ReplicationReceiver, ReplicationSender, ResourceDelta},
    resource::{Health, ResourceKind, Stamina, StaminaTick},
    rpc::{Request, RequestQueue},
    settings::CharacterSettings,
    timer::TimerService,
};

#[derive(Debug, Default)]
struct ReplicationChannels {
    health_out: ReplicationSender,
    stamina_out: ReplicationSender,
    health_in: ReplicationReceiver,
    stamina_in: ReplicationReceiver,
}

#[derive(Debug)]
pub struct Character {
    id: u64,
    role: NetRole,
    settings: CharacterSettings,
    health: Health,
    stamina: Stamina,
    movement: MovementComponent,
    prediction: Option<ClientPredictionData>,
    server_moves: ServerMoveState,
    perspective: Perspective,
    channels: ReplicationChannels,
}

impl Character {
    pub fn new(id: u64, role: NetRole, location: Vec3, settings: CharacterSettings) -> Self {
        Self {
            id,
            role,
            health: Health::new(role),
            stamina: Stamina::new(role, settings.stamina),
            movement: MovementComponent::new(location, settings.movement),
            prediction: role
                .is_locally_controlled()
                .then(|| ClientPredictionData::new(settings.prediction)),
            server_moves: ServerMoveState::new(settings.prediction),
            perspective: Perspective::default(),
            channels: ReplicationChannels::default(),
            settings,
        }
    }

    /// Reassembles a character from persisted parts.
    pub fn from_parts(
        id: u64,
        role: NetRole,
        settings: CharacterSettings,
        health: Health,
        stamina: Stamina,
        movement: MovementComponent,
        server_moves: ServerMoveState,
    ) -> Self {
        Self {
            id,
            role,
            settings,
            health,
            stamina,
            movement,
            prediction: None,
            server_moves,
            perspective: Perspective::default(),
            channels: ReplicationChannels::default(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    pub fn settings(&self) -> &CharacterSettings {
        &self.settings
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    pub fn stamina(&self) -> &Stamina {
        &self.stamina
    }

    pub fn stamina_mut(&mut self) -> &mut Stamina {
        &mut self.stamina
    }

    pub fn movement(&self) -> &MovementComponent {
        &self.movement
    }

    pub fn server_moves(&self) -> &ServerMoveState {
        &self.server_moves
    }

    pub fn prediction(&self) -> Option<&ClientPredictionData> {
        self.prediction.as_ref()
    }

    pub fn into_parts(self) -> (Health, Stamina, MovementComponent, ServerMoveState) {
        (self.health, self.stamina, self.movement, self.server_moves)
    }

    /// Sets the sprint intent if there is any stamina. On the authority this also starts the
    /// stamina timer when it is idle.
    pub fn start_sprinting(&mut self, timers: &mut dyn TimerService) -> Outcome {
        if !self.stamina.has_stamina() {
            log::debug!("character {}: sprint refused, no stamina", self.id);
            return Err(Rejection::NoStamina);
        }
        self.movement.start_sprinting();
        log::info!("character {} started sprinting", self.id);
        if self.role.has_authority() && !self.stamina.is_timer_active(timers) {
            self.stamina.start_manipulation(timers)?;
        }
        Ok(())
    }

    pub fn stop_sprinting(&mut self) {
        self.movement.stop_sprinting();
    }

    pub fn start_crouching(&mut self) {
        self.movement.start_crouching();
    }

    pub fn stop_crouching(&mut self) {
        self.movement.stop_crouching();
    }

    pub fn jump(&mut self) {
        self.movement.set_jump_pressed(true);
    }

    /// Dispatch target for the stamina timer.
    pub fn on_stamina_timer(
        &mut self,
        timers: &mut dyn TimerService,
    ) -> Result<StaminaTick, Rejection> {
        self.stamina.tick(Some(&mut self.movement), timers)
    }

    /// Locally controlled client: captures one input sample, predicts it and returns the moves
    /// that are ready to send.
    pub fn tick_autonomous(
        &mut self,
        delta_time: f32,
        input_direction: Vec3,
    ) -> Result<Vec<NetMove>, Rejection> {
        let prediction = self
            .prediction
            .as_mut()
            .ok_or(Rejection::MissingCollaborator("client prediction"))?;
        let acceleration = self.movement.scale_input(input_direction);
        Ok(prediction.replicate_move(&mut self.movement, delta_time, acceleration))
    }

    /// Sends the held-back move immediately.
    pub fn flush_moves(&mut self) -> Option<NetMove> {
        self.prediction.as_mut()?.flush()
    }

    /// Authority: replays one client move. A sprinting move starts the stamina timer.
    pub fn receive_move(
        &mut self,
        net: &NetMove,
        timers: &mut dyn TimerService,
    ) -> Result<MoveAck, Rejection> {
        self.role.require_authority()?;
        let ack =
            self.server_moves
                .process_move(&mut self.movement, net, self.stamina.has_stamina())?;
        if self.movement.wants_sprint() && !self.stamina.is_timer_active(timers) {
            self.stamina.start_manipulation(timers)?;
        }
        Ok(ack)
    }

    /// Locally controlled client: applies a server acknowledgment.
    pub fn receive_ack(&mut self, ack: MoveAck) -> Result<Option<Correction>, Rejection> {
        let prediction = self
            .prediction
            .as_mut()
            .ok_or(Rejection::MissingCollaborator("client prediction"))?;
        Ok(prediction.receive_ack(&mut self.movement, ack))
    }

    /// Authority: applies a request sent by this character's owner.
    ///
    /// Door and interact requests need the world and are rejected here.
    pub fn handle_request(&mut self, request: Request, timers: &mut dyn TimerService) -> Outcome {
        self.role.require_authority()?;
        match request {
            Request::Health(op) => op.apply(&mut self.health),
            Request::Stamina(op) => op.apply(&mut self.stamina),
            Request::StartSprinting => self.start_sprinting(timers),
            Request::StopSprinting => {
                self.stop_sprinting();
                Ok(())
            }
            Request::StartCrouching => {
                self.start_crouching();
                Ok(())
            }
            Request::StopCrouching => {
                self.stop_crouching();
                Ok(())
            }
            Request::Interact { .. } => Err(Rejection::MissingCollaborator("interact target")),
            Request::ToggleDoor { .. } => Err(Rejection::MissingCollaborator("door")),
        }
    }

    /// Authority: dirty-field deltas for health and stamina since the last call.
    pub fn replicate(&mut self) -> Vec<ResourceDelta> {
        if !self.role.has_authority() {
            return Vec::new();
        }
        let mut deltas = Vec::new();
        deltas.extend(self.channels.health_out.diff(&self.health));
        deltas.extend(self.channels.stamina_out.diff(&self.stamina));
        deltas
    }

    /// Proxy: applies a delta to the matching shadow resource.
    ///
    /// When the stamina shadow runs dry the local sprint intent is dropped, mirroring what the
    /// authority's stamina tick does to its own copy.
    pub fn apply_replication(&mut self, delta: &ResourceDelta) -> bool {
        if self.role.has_authority() {
            return false;
        }
        match delta.kind {
            ResourceKind::Health => self.channels.health_in.apply(&mut self.health, delta),
            ResourceKind::Stamina => {
                let applied = self.channels.stamina_in.apply(&mut self.stamina, delta);
                if applied && !self.stamina.has_stamina() && self.movement.wants_sprint() {
                    self.movement.force_stop_sprinting();
                }
                applied
            }
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn toggle_perspective(&mut self) {
        self.perspective = self.perspective.toggled();
    }

    /// Length of the interaction trace from the camera.
    pub fn interact_distance(&self) -> f32 {
        match self.perspective {
            Perspective::ThirdPerson => {
                self.settings.camera_distance + self.settings.base_interact_distance
            }
            Perspective::FirstPerson => self.settings.base_interact_distance,
        }
    }

    /// Locally controlled client: the host traced from the camera and hit `target` at
    /// `hit_distance`. Queues an interact request for the authority.
    pub fn begin_interact(
        &self,
        target: u64,
        hit_distance: f32,
        outbox: &mut RequestQueue,
    ) -> Outcome {
        if !self.role.is_locally_controlled() && !self.role.has_authority() {
            return Err(Rejection::NotLocallyControlled);
        }
        if hit_distance > self.interact_distance() {
            return Err(Rejection::OutOfReach(hit_distance));
        }
        outbox.push(Request::Interact { target });
        Ok(())
    }

    /// Authority: forwards an interact request to the target.
    pub fn interact_with(
        &self,
        target: Option<&mut dyn Interactable>,
        timers: &mut dyn TimerService,
        outbox: &mut RequestQueue,
    ) -> Outcome {
        self.role.require_authority()?;
        let target = target.ok_or(Rejection::MissingCollaborator("interact target"))?;
        target.interact(self.id, self.role, timers, outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        door::Door,
        resource::Resource,
        rpc::{HealthOp, RequestInbox, StaminaOp},
        settings::DoorSettings,
        timer::TimerManager,
    };
    use std::{cell::Cell, rc::Rc, time::Duration};

    struct Session {
        server: Character,
        client: Character,
        server_timers: TimerManager,
    }

    impl Session {
        fn new() -> Self {
            let settings = CharacterSettings::default();
            Self {
                server: Character::new(1, NetRole::Authority, Vec3::zeros(), settings),
                client: Character::new(1, NetRole::AutonomousProxy, Vec3::zeros(), settings),
                server_timers: TimerManager::new(),
            }
        }

        /// Delivers moves, acks and deltas in both directions.
        fn exchange(&mut self, moves: Vec<NetMove>) -> Vec<Option<Correction>> {
            let mut corrections = Vec::new();
            for net in moves {
                let wire = net.encode().unwrap();
                let net = NetMove::decode(&wire).unwrap();
                if let Ok(ack) = self.server.receive_move(&net, &mut self.server_timers) {
                    corrections.push(self.client.receive_ack(ack).unwrap());
                }
            }
            self.replicate();
            corrections
        }

        fn replicate(&mut self) {
            for delta in self.server.replicate() {
                let wire = delta.encode().unwrap();
                self.client
                    .apply_replication(&ResourceDelta::decode(&wire).unwrap());
            }
        }

        /// Advances the server clock and dispatches stamina timer firings.
        fn advance_server(&mut self, dt: Duration) {
            for handle in self.server_timers.advance(dt) {
                if self.server.stamina().timer_handle() == Some(handle)
                    && self.server_timers.is_active(handle)
                {
                    self.server.on_stamina_timer(&mut self.server_timers).unwrap();
                }
            }
        }
    }

    #[test]
    fn health_damage_reaches_the_client_hud() {
        let mut session = Session::new();
        let seen = Rc::new(Cell::new(0u32));
        let s = seen.clone();
        session.client.health_mut().subscribe(move |_| s.set(s.get() + 1));

        session
            .server
            .handle_request(
                Request::Health(HealthOp::DecreaseCurrent(30.0)),
                &mut session.server_timers,
            )
            .unwrap();
        session.replicate();

        assert_eq!(session.client.health().current(), 70.0);
        assert!(seen.get() >= 1);
    }

    #[test]
    fn long_client_frame_is_not_corrected() {
        let mut session = Session::new();
        let max_dt = session.client.settings().prediction.max_move_delta_time;

        let mut moves = session.client.tick_autonomous(0.2, Vec3::x()).unwrap();
        moves.extend(session.client.flush_moves());
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| m.delta_time <= max_dt));

        let corrections = session.exchange(moves);
        assert_eq!(corrections.len(), 2);
        assert!(corrections.iter().all(Option::is_none));
        let drift = session.server.movement().location() - session.client.movement().location();
        assert!(drift.norm() < 1e-3);
    }

    #[test]
    fn client_cannot_mutate_directly() {
        let mut session = Session::new();
        let mut timers = TimerManager::new();
        assert_eq!(
            session.client.handle_request(
                Request::Health(HealthOp::SetCurrent(1.0)),
                &mut timers
            ),
            Err(Rejection::NoAuthority)
        );
        assert_eq!(
            session.client.health_mut().decrease_current(50.0),
            Err(Rejection::NoAuthority)
        );
        assert_eq!(session.client.health().current(), 100.0);
    }

    #[test]
    fn sprinting_drains_server_stamina_and_replicates() {
        let mut session = Session::new();
        session
            .client
            .start_sprinting(&mut TimerManager::new())
            .unwrap();

        let mut moves = Vec::new();
        for _ in 0..10 {
            moves.extend(session.client.tick_autonomous(0.1, Vec3::x()).unwrap());
        }
        moves.extend(session.client.flush_moves());
        let corrections = session.exchange(moves);
        assert!(corrections.iter().all(Option::is_none));
        assert!(session.server.movement().wants_sprint());
        assert!(session.server.stamina().is_timer_active(&session.server_timers));

        session.advance_server(Duration::from_secs(3));
        session.replicate();
        assert_eq!(session.server.stamina().current(), 97.0);
        assert_eq!(session.client.stamina().current(), 97.0);
    }

    #[test]
    fn exhaustion_clears_sprint_on_both_sides() {
        let mut session = Session::new();
        session
            .server
            .handle_request(
                Request::Stamina(StaminaOp::SetCurrent(1.0)),
                &mut session.server_timers,
            )
            .unwrap();
        session.replicate();

        session
            .client
            .start_sprinting(&mut TimerManager::new())
            .unwrap();
        let mut moves = session.client.tick_autonomous(0.1, Vec3::x()).unwrap();
        moves.extend(session.client.flush_moves());
        session.exchange(moves);
        assert!(session.server.movement().is_sprinting());

        // One drain tick empties stamina and forces the intent off on the authority.
        session.advance_server(Duration::from_secs(1));
        assert_eq!(session.server.stamina().current(), 0.0);
        assert!(!session.server.movement().wants_sprint());

        // The client mirrors it once the delta arrives.
        session.replicate();
        assert!(!session.client.movement().wants_sprint());

        // The next movement update runs at walking speed on both sides.
        let mut moves = session.client.tick_autonomous(0.1, Vec3::x()).unwrap();
        moves.extend(session.client.flush_moves());
        session.exchange(moves);
        let walk = session.server.settings().movement.walk_speed;
        assert_eq!(session.client.movement().max_walk_speed(), walk);
        assert_eq!(session.server.movement().max_walk_speed(), walk);
    }

    #[test]
    fn server_ignores_sprint_bit_without_stamina() {
        let mut session = Session::new();
        session
            .server
            .handle_request(
                Request::Stamina(StaminaOp::SetCurrent(0.0)),
                &mut session.server_timers,
            )
            .unwrap();

        // The client has not heard about it yet and keeps predicting a sprint.
        session
            .client
            .start_sprinting(&mut TimerManager::new())
            .unwrap();
        let mut moves = Vec::new();
        for _ in 0..4 {
            moves.extend(session.client.tick_autonomous(0.1, Vec3::x()).unwrap());
        }
        moves.extend(session.client.flush_moves());
        let corrections = session.exchange(moves);

        assert!(!session.server.movement().wants_sprint());
        assert!(corrections.iter().any(Option::is_some));
        // After replay the client agrees with the server on where it is.
        let error = (session.client.movement().location() - session.server.movement().location())
            .norm();
        assert!(error < 1.0);
    }

    #[test]
    fn sprint_refused_without_stamina() {
        let mut session = Session::new();
        session
            .server
            .stamina_mut()
            .set_current(0.0)
            .unwrap();
        assert_eq!(
            session.server.start_sprinting(&mut session.server_timers),
            Err(Rejection::NoStamina)
        );
        assert_eq!(session.server_timers.active_count(), 0);
    }

    #[test]
    fn sprint_and_crouch_requests_are_exclusive() {
        let mut session = Session::new();
        let mut inbox = RequestInbox::new();
        let mut outbox = RequestQueue::new();
        outbox.push(Request::StartCrouching);
        outbox.push(Request::StartSprinting);

        for envelope in outbox.drain() {
            if let Some(request) = inbox.accept(envelope) {
                session
                    .server
                    .handle_request(request, &mut session.server_timers)
                    .unwrap();
            }
        }
        assert!(session.server.movement().wants_sprint());
        assert!(!session.server.movement().wants_crouch());

        session
            .server
            .handle_request(Request::StartCrouching, &mut session.server_timers)
            .unwrap();
        assert!(session.server.movement().wants_crouch());
        assert!(!session.server.movement().wants_sprint());
    }

    #[test]
    fn interact_distance_depends_on_perspective() {
        let mut session = Session::new();
        assert_eq!(session.client.interact_distance(), 420.0);
        session.client.toggle_perspective();
        assert_eq!(session.client.interact_distance(), 120.0);

        let mut outbox = RequestQueue::new();
        assert_eq!(
            session.client.begin_interact(5, 200.0, &mut outbox),
            Err(Rejection::OutOfReach(200.0))
        );
        session.client.begin_interact(5, 100.0, &mut outbox).unwrap();
        assert_eq!(outbox.drain()[0].request, Request::Interact { target: 5 });
    }

    #[test]
    fn interact_request_toggles_door_on_authority() {
        let mut session = Session::new();
        let mut door = Door::new(5, false, DoorSettings::default());
        let mut outbox = RequestQueue::new();

        session
            .server
            .interact_with(Some(&mut door), &mut session.server_timers, &mut outbox)
            .unwrap();
        assert!(door.is_open());
        assert!(outbox.is_empty());

        assert_eq!(
            session
                .server
                .interact_with(None, &mut session.server_timers, &mut outbox),
            Err(Rejection::MissingCollaborator("interact target"))
        );
    }

    #[test]
    fn simulated_proxy_has_no_prediction() {
        let mut proxy = Character::new(
            2,
            NetRole::SimulatedProxy,
            Vec3::zeros(),
            CharacterSettings::default(),
        );
        assert!(proxy.prediction().is_none());
        assert_eq!(
            proxy.tick_autonomous(0.1, Vec3::x()),
            Err(Rejection::MissingCollaborator("client prediction"))
        );
        let mut outbox = RequestQueue::new();
        assert_eq!(
            proxy.begin_interact(1, 10.0, &mut outbox),
            Err(Rejection::NotLocallyControlled)
        );
    }
}
