use super::{changed_event, clamp_current, Resource, ResourceChanged, ResourceKind};
use crate::{
    authority::NetRole,
    constants::DEFAULT_STAMINA,
    error::{check_amount, Outcome, Rejection},
    movement::SprintIntent,
    notify::Notifier,
    settings::StaminaSettings,
    timer::{TimerHandle, TimerService},
};

/// What a single stamina timer tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaminaTick {
    /// Sprinting: one drain unit was removed.
    Drained,
    /// Sprinting with nothing left: the owner's sprint intent was cleared.
    Exhausted,
    /// Resting below max: one fill unit was restored.
    Regenerated,
    /// Resting at max: the timer stopped itself.
    Idle,
}

/// Stamina of a single actor, plus the drain/regen timer that manipulates it.
#[derive(Debug)]
pub struct Stamina {
    role: NetRole,
    current: f32,
    max: f32,
    has_stamina: bool,
    can_sprint: bool,
    settings: StaminaSettings,
    timer: Option<TimerHandle>,
    on_changed: Notifier<ResourceChanged>,
}

impl Stamina {
    pub fn new(role: NetRole, settings: StaminaSettings) -> Self {
        Self::from_parts(role, DEFAULT_STAMINA, DEFAULT_STAMINA, settings)
    }

    pub fn from_parts(role: NetRole, current: f32, max: f32, settings: StaminaSettings) -> Self {
        let current = clamp_current(current, max);
        Self {
            role,
            current,
            max,
            has_stamina: current > 0.0,
            can_sprint: current >= settings.sprint_threshold,
            settings,
            timer: None,
            on_changed: Notifier::default(),
        }
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    pub fn settings(&self) -> &StaminaSettings {
        &self.settings
    }

    pub fn has_stamina(&self) -> bool {
        self.has_stamina
    }

    pub fn can_sprint(&self) -> bool {
        self.can_sprint
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn increase_current(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.current = clamp_current(self.current + amount, self.max);
        self.recompute_status();
        Ok(())
    }

    pub fn decrease_current(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.current = clamp_current(self.current - amount, self.max);
        self.recompute_status();
        Ok(())
    }

    pub fn set_current(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.current = clamp_current(amount, self.max);
        self.recompute_status();
        Ok(())
    }

    pub fn increase_max(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.max += amount;
        self.recompute_status();
        Ok(())
    }

    pub fn decrease_max(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.require_positive_max()?;
        self.max = (self.max - amount).max(0.0);
        self.current = self.current.min(self.max);
        self.recompute_status();
        Ok(())
    }

    pub fn set_max(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.require_positive_max()?;
        if amount <= 0.0 {
            return Err(Rejection::NonPositive(amount));
        }
        self.max = amount;
        self.current = self.current.min(self.max);
        self.recompute_status();
        Ok(())
    }

    pub fn recompute_status(&mut self) {
        self.has_stamina = self.current > 0.0;
        self.can_sprint = self.current >= self.settings.sprint_threshold;
        let event = changed_event(self);
        self.on_changed.broadcast(&event);
    }

    /// Post-deserialize hook for a replicated `current`.
    pub fn on_rep_current(&mut self) {
        self.recompute_status();
    }

    pub(crate) fn overwrite_replicated(&mut self, current: Option<f32>, max: Option<f32>) {
        if let Some(max) = max {
            self.max = max;
        }
        if let Some(current) = current {
            self.current = current;
        }
    }

    /// Arms the drain/regen timer. Re-arms the same handle if it is already running.
    pub fn start_manipulation(&mut self, timers: &mut dyn TimerService) -> Outcome {
        self.role.require_authority()?;
        let handle = timers.start_repeating(self.timer, self.settings.tick_interval);
        if self.timer != Some(handle) {
            log::info!("stamina timer started ({handle:?})");
        }
        self.timer = Some(handle);
        Ok(())
    }

    /// Stops the timer. A no-op when it is not running.
    pub fn stop_manipulation(&mut self, timers: &mut dyn TimerService) {
        if let Some(handle) = self.timer.take() {
            timers.stop(handle);
            log::info!("stamina timer stopped ({handle:?})");
        }
    }

    pub fn is_timer_active(&self, timers: &dyn TimerService) -> bool {
        self.timer.is_some_and(|h| timers.is_active(h))
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Restores a handle persisted by the host.
    pub fn set_timer_handle(&mut self, handle: Option<TimerHandle>) {
        self.timer = handle;
    }

    /// One firing of the drain/regen timer.
    ///
    /// `owner` is the sprint intent this stamina drains for. Without it the tick does nothing
    /// and reports a missing collaborator.
    pub fn tick(
        &mut self,
        owner: Option<&mut dyn SprintIntent>,
        timers: &mut dyn TimerService,
    ) -> Result<StaminaTick, Rejection> {
        self.role.require_authority()?;
        let owner = owner.ok_or(Rejection::MissingCollaborator("sprint intent"))?;

        if owner.is_sprinting() {
            if !self.has_stamina {
                owner.force_stop_sprinting();
                return Ok(StaminaTick::Exhausted);
            }
            self.decrease_current(self.settings.drain_amount)?;
            if !self.has_stamina {
                owner.force_stop_sprinting();
                return Ok(StaminaTick::Exhausted);
            }
            return Ok(StaminaTick::Drained);
        }

        if !self.is_full() {
            self.increase_current(self.settings.fill_amount)?;
            return Ok(StaminaTick::Regenerated);
        }

        self.stop_manipulation(timers);
        Ok(StaminaTick::Idle)
    }

    fn require_positive_max(&self) -> Outcome {
        if self.max > 0.0 {
            Ok(())
        } else {
            Err(Rejection::NonPositive(self.max))
        }
    }
}

impl Resource for Stamina {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Stamina
    }

    fn current(&self) -> f32 {
        self.current
    }

    fn max(&self) -> f32 {
        self.max
    }

    fn on_changed(&mut self) -> &mut Notifier<ResourceChanged> {
        &mut self.on_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerManager;
    use std::time::Duration;

    #[derive(Default)]
    struct Runner {
        sprinting: bool,
    }

    impl SprintIntent for Runner {
        fn is_sprinting(&self) -> bool {
            self.sprinting
        }

        fn force_stop_sprinting(&mut self) {
            self.sprinting = false;
        }
    }

    fn stamina(current: f32) -> Stamina {
        Stamina::from_parts(
            NetRole::Authority,
            current,
            DEFAULT_STAMINA,
            StaminaSettings::default(),
        )
    }

    #[test]
    fn sprint_threshold_scenario() {
        let mut stamina = stamina(4.0);
        assert!(stamina.has_stamina());
        assert!(!stamina.can_sprint());

        stamina.increase_current(10.0).unwrap();
        assert_eq!(stamina.current(), 14.0);
        assert!(stamina.can_sprint());
    }

    #[test]
    fn last_drain_clears_sprint_intent() {
        let mut stamina = stamina(1.0);
        let mut timers = TimerManager::new();
        let mut runner = Runner { sprinting: true };

        let tick = stamina.tick(Some(&mut runner), &mut timers).unwrap();
        assert_eq!(tick, StaminaTick::Exhausted);
        assert_eq!(stamina.current(), 0.0);
        assert!(!stamina.has_stamina());
        assert!(!runner.sprinting);
    }

    #[test]
    fn drain_then_regen_then_idle() {
        let mut stamina = stamina(98.0);
        let mut timers = TimerManager::new();
        let mut runner = Runner { sprinting: true };
        stamina.start_manipulation(&mut timers).unwrap();

        assert_eq!(
            stamina.tick(Some(&mut runner), &mut timers),
            Ok(StaminaTick::Drained)
        );
        assert_eq!(stamina.current(), 97.0);

        runner.sprinting = false;
        for _ in 0..3 {
            assert_eq!(
                stamina.tick(Some(&mut runner), &mut timers),
                Ok(StaminaTick::Regenerated)
            );
        }
        assert!(stamina.is_full());
        assert!(stamina.is_timer_active(&timers));

        assert_eq!(
            stamina.tick(Some(&mut runner), &mut timers),
            Ok(StaminaTick::Idle)
        );
        assert!(!stamina.is_timer_active(&timers));
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn exhausted_tick_keeps_timer_running() {
        let mut stamina = stamina(0.0);
        let mut timers = TimerManager::new();
        let mut runner = Runner { sprinting: true };
        stamina.start_manipulation(&mut timers).unwrap();

        assert_eq!(
            stamina.tick(Some(&mut runner), &mut timers),
            Ok(StaminaTick::Exhausted)
        );
        assert!(!runner.sprinting);
        assert!(stamina.is_timer_active(&timers));
    }

    #[test]
    fn tick_without_owner_is_a_no_op() {
        let mut stamina = stamina(50.0);
        let mut timers = TimerManager::new();
        assert_eq!(
            stamina.tick(None, &mut timers),
            Err(Rejection::MissingCollaborator("sprint intent"))
        );
        assert_eq!(stamina.current(), 50.0);
    }

    #[test]
    fn start_is_idempotent_and_stop_tolerates_inactive() {
        let mut stamina = stamina(50.0);
        let mut timers = TimerManager::new();

        stamina.start_manipulation(&mut timers).unwrap();
        let first = stamina.timer_handle();
        stamina.start_manipulation(&mut timers).unwrap();
        assert_eq!(stamina.timer_handle(), first);
        assert_eq!(timers.active_count(), 1);

        stamina.stop_manipulation(&mut timers);
        stamina.stop_manipulation(&mut timers);
        assert!(!stamina.is_timer_active(&timers));
        assert!(timers.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn proxies_cannot_start_the_timer() {
        let mut stamina = Stamina::new(NetRole::SimulatedProxy, StaminaSettings::default());
        let mut timers = TimerManager::new();
        assert_eq!(
            stamina.start_manipulation(&mut timers),
            Err(Rejection::NoAuthority)
        );
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn max_recovers_after_reaching_zero() {
        let mut stamina = stamina(50.0);
        stamina.decrease_max(30.0).unwrap();
        assert_eq!(stamina.max(), 70.0);
        assert_eq!(stamina.current(), 50.0);

        stamina.decrease_max(100.0).unwrap();
        assert_eq!(stamina.max(), 0.0);
        assert_eq!(stamina.current(), 0.0);
        assert_eq!(stamina.percentage(), 0.0);

        assert_eq!(stamina.set_max(10.0), Err(Rejection::NonPositive(0.0)));
        assert_eq!(stamina.decrease_max(10.0), Err(Rejection::NonPositive(0.0)));

        stamina.increase_max(50.0).unwrap();
        assert_eq!(stamina.max(), 50.0);
        stamina.increase_current(20.0).unwrap();
        assert_eq!(stamina.current(), 20.0);
        assert!(stamina.can_sprint());
        stamina.set_max(40.0).unwrap();
        assert_eq!(stamina.max(), 40.0);
    }

    #[test]
    fn set_max_clamps_current() {
        let mut stamina = stamina(80.0);
        assert_eq!(stamina.set_max(-1.0), Err(Rejection::InvalidAmount(-1.0)));
        stamina.set_max(60.0).unwrap();
        assert_eq!(stamina.current(), 60.0);
        assert!(stamina.is_full());
    }
}
