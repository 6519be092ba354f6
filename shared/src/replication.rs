//! Property replication for resources.
//!
//! The authority snapshots each resource at a fixed point in its tick and diffs it against the
//! last snapshot it sent. Only dirty fields travel, tagged with a per-resource sequence number.
//! The receiving side drops anything older than what it already applied, overwrites its shadow
//! copy, and runs the on-rep hook (`recompute_status`) when a value it depends on changed.

use serde::{Deserialize, Serialize};

use crate::{
    bitmask_flags::{DirtyFields, ReplicatedField},
    error::WireError,
    resource::{Health, Resource, ResourceKind, Stamina},
    sequence::is_stale,
};

/// Replicated view of a resource. Stamina has no base, dead or healable state and reports
/// fixed values for them, so those fields never go dirty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceSnapshot {
    pub base: f32,
    pub current: f32,
    pub max: f32,
    pub dead: bool,
    pub healable: bool,
}

/// Dirty fields of one resource since the previous delta.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub kind: ResourceKind,
    pub seq: u32,
    /// [`ReplicatedField`] mask.
    pub dirty: u8,
    pub base: Option<f32>,
    pub current: Option<f32>,
    pub max: Option<f32>,
    pub dead: Option<bool>,
    pub healable: Option<bool>,
}

impl ResourceDelta {
    pub fn dirty_fields(&self) -> DirtyFields {
        DirtyFields::new(self.dirty)
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A resource that can be snapshotted on the authority and patched on a proxy.
pub trait Replicable: Resource {
    fn snapshot(&self) -> ResourceSnapshot;

    /// Overwrites the shadow copy with the delta's values, then runs the on-rep hook if needed.
    fn apply_replicated(&mut self, delta: &ResourceDelta);
}

impl Replicable for Health {
    fn snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            base: self.base(),
            current: self.current(),
            max: self.max(),
            dead: self.dead(),
            healable: self.is_healable(),
        }
    }

    fn apply_replicated(&mut self, delta: &ResourceDelta) {
        self.overwrite_replicated(delta.base, delta.current, delta.max, delta.healable);
        if needs_recompute(delta.dirty_fields()) {
            self.on_rep_current();
        }
    }
}

impl Replicable for Stamina {
    fn snapshot(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            base: 0.0,
            current: self.current(),
            max: self.max(),
            dead: false,
            healable: true,
        }
    }

    fn apply_replicated(&mut self, delta: &ResourceDelta) {
        self.overwrite_replicated(delta.current, delta.max);
        if needs_recompute(delta.dirty_fields()) {
            self.on_rep_current();
        }
    }
}

fn needs_recompute(dirty: DirtyFields) -> bool {
    dirty.has_any(&[
        ReplicatedField::Current,
        ReplicatedField::Max,
        ReplicatedField::Dead,
    ])
}

/// Authority side: remembers what was last sent for one resource.
#[derive(Debug, Default)]
pub struct ReplicationSender {
    last_sent: Option<ResourceSnapshot>,
    next_seq: u32,
}

impl ReplicationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs `resource` against the last sent snapshot. `None` when nothing changed.
    ///
    /// The first call sends every field.
    pub fn diff<R: Replicable>(&mut self, resource: &R) -> Option<ResourceDelta> {
        let now = resource.snapshot();
        let mut dirty = DirtyFields::default();
        let mut delta = ResourceDelta {
            kind: resource.kind(),
            seq: self.next_seq,
            dirty: 0,
            base: None,
            current: None,
            max: None,
            dead: None,
            healable: None,
        };

        let prev = self.last_sent;
        let changed = |old: Option<f32>, new: f32| old != Some(new);

        if changed(prev.map(|p| p.base), now.base) {
            dirty.add(ReplicatedField::Base);
            delta.base = Some(now.base);
        }
        if changed(prev.map(|p| p.current), now.current) {
            dirty.add(ReplicatedField::Current);
            delta.current = Some(now.current);
        }
        if changed(prev.map(|p| p.max), now.max) {
            dirty.add(ReplicatedField::Max);
            delta.max = Some(now.max);
        }
        if prev.map(|p| p.dead) != Some(now.dead) {
            dirty.add(ReplicatedField::Dead);
            delta.dead = Some(now.dead);
        }
        if prev.map(|p| p.healable) != Some(now.healable) {
            dirty.add(ReplicatedField::Healable);
            delta.healable = Some(now.healable);
        }

        if dirty.is_empty() {
            return None;
        }
        delta.dirty = dirty.bits;
        self.last_sent = Some(now);
        self.next_seq = self.next_seq.wrapping_add(1);
        Some(delta)
    }
}

/// Proxy side: applies deltas for one resource in order.
#[derive(Debug, Default)]
pub struct ReplicationReceiver {
    last_seq: Option<u32>,
}

impl ReplicationReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and changes nothing) for a delta that is not newer than the last one.
    pub fn apply<R: Replicable>(&mut self, target: &mut R, delta: &ResourceDelta) -> bool {
        if delta.kind != target.kind() {
            log::debug!("delta for {:?} sent to {:?}", delta.kind, target.kind());
            return false;
        }
        if is_stale(delta.seq, self.last_seq) {
            log::debug!("dropping stale {:?} delta {}", delta.kind, delta.seq);
            return false;
        }
        self.last_seq = Some(delta.seq);
        target.apply_replicated(delta);
        true
    }
}
