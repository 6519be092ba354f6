//! What a HUD needs from the resource layer: a bar that follows a resource's percentage and
//! picks a colour tier. Layout and drawing belong to the host.

use std::{cell::Cell, rc::Rc};

use crate::{notify::SubscriptionId, resource::Resource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarTier {
    Critical,
    Low,
    Medium,
    Healthy,
}

impl BarTier {
    pub fn from_percent(percent: f32) -> Self {
        if percent <= 0.25 {
            BarTier::Critical
        } else if percent <= 0.5 {
            BarTier::Low
        } else if percent <= 0.7 {
            BarTier::Medium
        } else {
            BarTier::Healthy
        }
    }

    /// Linear RGBA fill colour.
    pub fn color(self) -> [f32; 4] {
        match self {
            BarTier::Critical => [1.0, 0.0, 0.0, 1.0],
            BarTier::Low => [1.0, 0.65, 0.0, 1.0],
            BarTier::Medium => [1.0, 1.0, 0.0, 1.0],
            BarTier::Healthy => [0.0, 1.0, 0.0, 1.0],
        }
    }
}

/// A progress bar bound to one resource's change notifications.
#[derive(Debug)]
pub struct ResourceBar {
    percent: Rc<Cell<f32>>,
    subscription: SubscriptionId,
}

impl ResourceBar {
    /// Subscribes to `resource` and starts from its current percentage.
    pub fn bind<R: Resource>(resource: &mut R) -> Self {
        let percent = Rc::new(Cell::new(resource.percentage()));
        let sink = percent.clone();
        let subscription = resource.subscribe(move |event| sink.set(event.percentage));
        Self {
            percent,
            subscription,
        }
    }

    pub fn percent(&self) -> f32 {
        self.percent.get()
    }

    pub fn tier(&self) -> BarTier {
        BarTier::from_percent(self.percent())
    }

    pub fn unbind<R: Resource>(self, resource: &mut R) -> bool {
        resource.unsubscribe(self.subscription)
    }
}
