//! Server-authoritative numeric resources.
//!
//! Layout:
//! - `health.rs`: current/max/base health, healable gate, dead flag
//! - `stamina.rs`: current/max stamina, sprint gates, drain/regen timer
//!
//! Both follow the same contract: every mutator checks authority first, clamps, then goes
//! through `recompute_status()`, which refreshes the derived flags and broadcasts a
//! [`ResourceChanged`] to subscribers. A rejected mutator changes nothing and broadcasts nothing.

mod health;
mod stamina;

pub use health::Health;
pub use stamina::{Stamina, StaminaTick};

use serde::{Deserialize, Serialize};

use crate::notify::{Notifier, SubscriptionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Health,
    Stamina,
}

/// Broadcast after every status recompute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResourceChanged {
    pub kind: ResourceKind,
    pub current: f32,
    pub max: f32,
    pub percentage: f32,
}

/// Read side shared by health and stamina.
pub trait Resource {
    fn kind(&self) -> ResourceKind;
    fn current(&self) -> f32;
    fn max(&self) -> f32;
    fn on_changed(&mut self) -> &mut Notifier<ResourceChanged>;

    /// `current / max`, or 0 when `max <= 0`.
    fn percentage(&self) -> f32 {
        percentage(self.current(), self.max())
    }

    fn subscribe(&mut self, callback: impl FnMut(&ResourceChanged) + 'static) -> SubscriptionId
    where
        Self: Sized,
    {
        self.on_changed().subscribe(callback)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.on_changed().unsubscribe(id)
    }
}

pub(crate) fn percentage(current: f32, max: f32) -> f32 {
    if max <= 0.0 {
        return 0.0;
    }
    current / max
}

/// Clamps into `[0, max]`, treating a negative max as zero.
pub(crate) fn clamp_current(value: f32, max: f32) -> f32 {
    value.clamp(0.0, max.max(0.0))
}

pub(crate) fn changed_event<R: Resource>(resource: &R) -> ResourceChanged {
    ResourceChanged {
        kind: resource.kind(),
        current: resource.current(),
        max: resource.max(),
        percentage: resource.percentage(),
    }
}
