//! Requests from non-authoritative callers to the authority.
//!
//! Requests are fire-and-forget: the sender never learns whether the authority applied one,
//! it only observes the replicated result. Each request carries a sequence number so the
//! receiver applies it exactly once and in send order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Outcome, WireError},
    resource::{Health, Stamina},
    sequence::is_stale,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum HealthOp {
    IncreaseCurrent(f32),
    DecreaseCurrent(f32),
    SetCurrent(f32),
    IncreaseMax(f32),
    DecreaseMax(f32),
    SetMax(f32),
    IncreaseBase(f32),
    DecreaseBase(f32),
    SetBase(f32),
    SetHealable(bool),
    SetDead(bool),
}

impl HealthOp {
    pub fn apply(self, health: &mut Health) -> Outcome {
        match self {
            HealthOp::IncreaseCurrent(v) => health.increase_current(v),
            HealthOp::DecreaseCurrent(v) => health.decrease_current(v),
            HealthOp::SetCurrent(v) => health.set_current(v),
            HealthOp::IncreaseMax(v) => health.increase_max(v),
            HealthOp::DecreaseMax(v) => health.decrease_max(v),
            HealthOp::SetMax(v) => health.set_max(v),
            HealthOp::IncreaseBase(v) => health.increase_base(v),
            HealthOp::DecreaseBase(v) => health.decrease_base(v),
            HealthOp::SetBase(v) => health.set_base(v),
            HealthOp::SetHealable(b) => health.set_healable(b),
            HealthOp::SetDead(b) => health.set_dead(b),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StaminaOp {
    IncreaseCurrent(f32),
    DecreaseCurrent(f32),
    SetCurrent(f32),
    IncreaseMax(f32),
    DecreaseMax(f32),
    SetMax(f32),
}

impl StaminaOp {
    pub fn apply(self, stamina: &mut Stamina) -> Outcome {
        match self {
            StaminaOp::IncreaseCurrent(v) => stamina.increase_current(v),
            StaminaOp::DecreaseCurrent(v) => stamina.decrease_current(v),
            StaminaOp::SetCurrent(v) => stamina.set_current(v),
            StaminaOp::IncreaseMax(v) => stamina.increase_max(v),
            StaminaOp::DecreaseMax(v) => stamina.decrease_max(v),
            StaminaOp::SetMax(v) => stamina.set_max(v),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Request {
    Health(HealthOp),
    Stamina(StaminaOp),
    StartSprinting,
    StopSprinting,
    StartCrouching,
    StopCrouching,
    /// Interact with whatever the local trace hit.
    Interact { target: u64 },
    /// Sent by a door that was toggled without authority.
    ToggleDoor { door: u64 },
}

/// A request tagged with its send order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub seq: u32,
    pub request: Request,
}

impl Envelope {
    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Sender side: requests waiting to be flushed to the authority.
#[derive(Debug, Default)]
pub struct RequestQueue {
    next_seq: u32,
    outbox: VecDeque<Envelope>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: Request) -> u32 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.outbox.push_back(Envelope { seq, request });
        seq
    }

    pub fn len(&self) -> usize {
        self.outbox.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outbox.is_empty()
    }

    /// Takes everything queued, oldest first.
    pub fn drain(&mut self) -> Vec<Envelope> {
        self.outbox.drain(..).collect()
    }
}

/// Receiver side: filters out duplicates and reordered requests.
#[derive(Debug, Default)]
pub struct RequestInbox {
    last_seq: Option<u32>,
}

impl RequestInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the request if it is newer than everything accepted so far.
    pub fn accept(&mut self, envelope: Envelope) -> Option<Request> {
        if is_stale(envelope.seq, self.last_seq) {
            log::debug!("dropping duplicate request {}", envelope.seq);
            return None;
        }
        self.last_seq = Some(envelope.seq);
        Some(envelope.request)
    }
}
