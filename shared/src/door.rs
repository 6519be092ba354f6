use crate::{
    authority::NetRole,
    error::{Outcome, Rejection},
    rpc::{Request, RequestQueue},
    settings::DoorSettings,
    timer::{TimerHandle, TimerService},
};

/// Something a character can use.
pub trait Interactable {
    /// Runs on the authority once a character's interact request reaches it.
    fn interact(
        &mut self,
        interactor: u64,
        role: NetRole,
        timers: &mut dyn TimerService,
        outbox: &mut RequestQueue,
    ) -> Outcome;
}

/// A hinged door. Only `is_open` replicates; the swing is simulated locally everywhere.
#[derive(Debug)]
pub struct Door {
    id: u64,
    is_open: bool,
    yaw: f32,
    settings: DoorSettings,
    timer: Option<TimerHandle>,
}

impl Door {
    pub fn new(id: u64, is_open: bool, settings: DoorSettings) -> Self {
        Self {
            id,
            is_open,
            yaw: if is_open {
                settings.open_yaw
            } else {
                settings.closed_yaw
            },
            settings,
            timer: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn target_yaw(&self) -> f32 {
        if self.is_open {
            self.settings.open_yaw
        } else {
            self.settings.closed_yaw
        }
    }

    pub fn is_swinging(&self, timers: &dyn TimerService) -> bool {
        self.timer.is_some_and(|h| timers.is_active(h))
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Flips the door on the authority, or asks the authority to do it.
    pub fn toggle(
        &mut self,
        role: NetRole,
        timers: &mut dyn TimerService,
        outbox: &mut RequestQueue,
    ) -> Outcome {
        if role.has_authority() {
            self.is_open = !self.is_open;
            log::info!(
                "door {} {}",
                self.id,
                if self.is_open { "opened" } else { "closed" }
            );
            self.on_rep_is_open(timers);
        } else {
            outbox.push(Request::ToggleDoor { door: self.id });
        }
        Ok(())
    }

    /// Authority: applies a `ToggleDoor` request sent by a proxy copy of this door.
    pub fn handle_request(
        &mut self,
        request: Request,
        role: NetRole,
        timers: &mut dyn TimerService,
        outbox: &mut RequestQueue,
    ) -> Outcome {
        role.require_authority()?;
        match request {
            Request::ToggleDoor { door } if door == self.id => self.toggle(role, timers, outbox),
            _ => {
                log::debug!("door {}: ignoring {request:?}", self.id);
                Err(Rejection::MissingCollaborator("door"))
            }
        }
    }

    /// Applies a replicated `is_open`.
    pub fn apply_replicated(&mut self, is_open: bool, timers: &mut dyn TimerService) {
        if self.is_open != is_open {
            self.is_open = is_open;
            self.on_rep_is_open(timers);
        }
    }

    /// Starts (or re-arms) the swing timer.
    pub fn on_rep_is_open(&mut self, timers: &mut dyn TimerService) {
        self.timer = Some(timers.start_repeating(self.timer, self.settings.rotation_interval));
    }

    /// One swing step. Stops the timer once within tolerance of the target.
    pub fn update_rotation(&mut self, delta_seconds: f32, timers: &mut dyn TimerService) {
        let target = self.target_yaw();
        self.yaw = interp_yaw_to(self.yaw, target, delta_seconds, self.settings.open_speed);
        if normalize_axis(target - self.yaw).abs() <= self.settings.yaw_tolerance {
            if let Some(handle) = self.timer.take() {
                timers.stop(handle);
            }
        }
    }
}

impl Interactable for Door {
    fn interact(
        &mut self,
        _interactor: u64,
        role: NetRole,
        timers: &mut dyn TimerService,
        outbox: &mut RequestQueue,
    ) -> Outcome {
        self.toggle(role, timers, outbox)
    }
}

/// Wraps an angle into `(-180, 180]` degrees.
pub fn normalize_axis(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Moves `current` toward `target` by `delta * speed` of the remaining shortest arc.
///
/// A non-positive speed jumps straight to the target.
pub fn interp_yaw_to(current: f32, target: f32, delta_seconds: f32, speed: f32) -> f32 {
    if speed <= 0.0 {
        return target;
    }
    let remaining = normalize_axis(target - current);
    if remaining.abs() < 1.0e-4 {
        return target;
    }
    let alpha = (delta_seconds * speed).clamp(0.0, 1.0);
    normalize_axis(current + remaining * alpha)
}
