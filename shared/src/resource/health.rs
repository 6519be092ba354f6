use super::{changed_event, clamp_current, Resource, ResourceChanged, ResourceKind};
use crate::{
    authority::NetRole,
    constants::DEFAULT_HEALTH,
    error::{check_amount, Outcome, Rejection},
    notify::Notifier,
};

/// Health of a single actor.
///
/// `base` is the unmodified health pool, `max` the current ceiling (base plus any bonuses) and
/// `current` always sits in `[0, max]`. Heals (`increase_*`) are refused while the actor is
/// not healable; damage and explicit sets are not.
#[derive(Debug)]
pub struct Health {
    role: NetRole,
    base: f32,
    current: f32,
    max: f32,
    healable: bool,
    dead: bool,
    on_changed: Notifier<ResourceChanged>,
}

impl Health {
    /// Spawn defaults: full health, healable.
    pub fn new(role: NetRole) -> Self {
        Self::from_parts(role, DEFAULT_HEALTH, DEFAULT_HEALTH, DEFAULT_HEALTH, true)
    }

    /// Rebuilds health from stored values. `current` is clamped and `dead` derived.
    pub fn from_parts(role: NetRole, base: f32, current: f32, max: f32, healable: bool) -> Self {
        let current = clamp_current(current, max);
        Self {
            role,
            base,
            current,
            max,
            healable,
            dead: current <= 0.0,
            on_changed: Notifier::default(),
        }
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn is_healable(&self) -> bool {
        self.healable
    }

    /// The derived dead flag as of the last recompute.
    pub fn dead(&self) -> bool {
        self.dead
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current == self.max
    }

    /// False when `max <= 0`.
    pub fn is_below_percentage(&self, threshold: f32) -> bool {
        self.max > 0.0 && self.percentage() <= threshold
    }

    /// False when `max <= 0`.
    pub fn is_above_percentage(&self, threshold: f32) -> bool {
        self.max > 0.0 && self.percentage() >= threshold
    }

    pub fn increase_current(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.require_healable()?;
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
        self.require_healable()?;
        self.max += amount;
        self.recompute_status();
        Ok(())
    }

    /// Floors `max` at zero and pulls `current` down with it.
    pub fn decrease_max(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.max = (self.max - amount).max(0.0);
        self.current = self.current.min(self.max);
        self.recompute_status();
        Ok(())
    }

    pub fn set_max(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        if amount <= 0.0 {
            return Err(Rejection::NonPositive(amount));
        }
        self.max = amount;
        self.current = self.current.min(self.max);
        self.recompute_status();
        Ok(())
    }

    /// Raises `max` to the new base if it falls behind.
    pub fn increase_base(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.require_healable()?;
        if self.base <= 0.0 {
            return Err(Rejection::NonPositive(self.base));
        }
        self.base += amount;
        if self.max < self.base {
            self.max = self.base;
        }
        self.recompute_status();
        Ok(())
    }

    pub fn decrease_base(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.base = (self.base - amount).max(0.0);
        self.recompute_status();
        Ok(())
    }

    pub fn set_base(&mut self, amount: f32) -> Outcome {
        self.role.require_authority()?;
        check_amount(amount)?;
        self.require_healable()?;
        if amount <= 0.0 {
            return Err(Rejection::NonPositive(amount));
        }
        self.base = amount;
        self.recompute_status();
        Ok(())
    }

    /// Toggles the heal gate. Does not broadcast; the change still replicates.
    pub fn set_healable(&mut self, healable: bool) -> Outcome {
        self.role.require_authority()?;
        self.healable = healable;
        Ok(())
    }

    /// Marking dead zeroes `current`. Marking alive only clears the flag if `current > 0`,
    /// because `dead` is always re-derived; revive by setting `current`.
    pub fn set_dead(&mut self, dead: bool) -> Outcome {
        self.role.require_authority()?;
        if self.dead == dead {
            return Ok(());
        }
        if dead {
            self.current = 0.0;
        }
        self.recompute_status();
        Ok(())
    }

    /// The single choke point every mutation goes through.
    pub fn recompute_status(&mut self) {
        self.dead = self.is_dead();
        let event = changed_event(self);
        self.on_changed.broadcast(&event);
    }

    /// Post-deserialize hook for a replicated `current`.
    pub fn on_rep_current(&mut self) {
        self.recompute_status();
    }

    /// Overwrites the shadow copy with authoritative values. Proxy side only.
    pub(crate) fn overwrite_replicated(
        &mut self,
        base: Option<f32>,
        current: Option<f32>,
        max: Option<f32>,
        healable: Option<bool>,
    ) {
        if let Some(base) = base {
            self.base = base;
        }
        if let Some(max) = max {
            self.max = max;
        }
        if let Some(current) = current {
            self.current = current;
        }
        if let Some(healable) = healable {
            self.healable = healable;
        }
    }

    pub fn base_text(&self, round: bool) -> String {
        number_text(self.base, round)
    }

    pub fn current_text(&self, round: bool) -> String {
        number_text(self.current, round)
    }

    pub fn max_text(&self, round: bool) -> String {
        number_text(self.max, round)
    }

    /// `"{current} / {max}"`
    pub fn fraction_text(&self, round: bool) -> String {
        format!(
            "{} / {}",
            number_text(self.current, round),
            number_text(self.max, round)
        )
    }

    fn require_healable(&self) -> Outcome {
        if self.healable {
            Ok(())
        } else {
            Err(Rejection::NotHealable)
        }
    }
}

impl Resource for Health {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Health
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

fn number_text(value: f32, round: bool) -> String {
    if round {
        format!("{}", value.round() as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    fn counted(health: &mut Health) -> Rc<Cell<u32>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        health.subscribe(move |_| c.set(c.get() + 1));
        count
    }

    #[test]
    fn damage_scenario_clamps_and_marks_dead() {
        let mut health = Health::new(NetRole::Authority);
        let count = counted(&mut health);

        health.decrease_current(30.0).unwrap();
        assert_eq!(health.current(), 70.0);
        assert!(!health.is_dead());
        assert_eq!(count.get(), 1);

        health.decrease_current(100.0).unwrap();
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
        assert!(health.dead());
        assert!(!health.is_alive());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn current_stays_within_bounds_for_any_sequence() {
        let mut health = Health::new(NetRole::Authority);
        let steps: [(u8, f32); 8] = [
            (0, 500.0),
            (1, 17.5),
            (2, 250.0),
            (1, 1000.0),
            (0, 3.0),
            (2, 0.0),
            (0, 99.0),
            (1, 0.5),
        ];

        for (op, amount) in steps {
            let _ = match op {
                0 => health.increase_current(amount),
                1 => health.decrease_current(amount),
                _ => health.set_current(amount),
            };
            assert!(health.current() >= 0.0 && health.current() <= health.max());
        }
    }

    #[test]
    fn proxy_mutations_are_ignored() {
        let mut health = Health::new(NetRole::AutonomousProxy);
        let count = counted(&mut health);

        assert_eq!(health.decrease_current(10.0), Err(Rejection::NoAuthority));
        assert_eq!(health.set_max(50.0), Err(Rejection::NoAuthority));
        assert_eq!(health.current(), 100.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn negative_amounts_are_rejected_without_notification() {
        let mut health = Health::new(NetRole::Authority);
        health.decrease_current(50.0).unwrap();
        let count = counted(&mut health);

        assert_eq!(
            health.increase_current(-5.0),
            Err(Rejection::InvalidAmount(-5.0))
        );
        assert_eq!(
            health.decrease_current(-5.0),
            Err(Rejection::InvalidAmount(-5.0))
        );
        assert_eq!(health.current(), 50.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn decreasing_max_pulls_current_down() {
        let mut health = Health::new(NetRole::Authority);
        health.decrease_max(40.0).unwrap();
        assert_eq!(health.max(), 60.0);
        assert_eq!(health.current(), 60.0);

        health.decrease_max(500.0).unwrap();
        assert_eq!(health.max(), 0.0);
        assert_eq!(health.current(), 0.0);
        assert_eq!(health.percentage(), 0.0);
        assert!(!health.is_below_percentage(0.5));
        assert!(!health.is_above_percentage(0.0));
    }

    #[test]
    fn set_max_rejects_non_positive() {
        let mut health = Health::new(NetRole::Authority);
        assert_eq!(health.set_max(0.0), Err(Rejection::NonPositive(0.0)));
        assert_eq!(health.max(), 100.0);

        health.set_max(40.0).unwrap();
        assert_eq!(health.current(), 40.0);
        assert!(health.is_full());
    }

    #[test]
    fn heals_are_gated_by_healable() {
        let mut health = Health::new(NetRole::Authority);
        health.decrease_current(50.0).unwrap();
        health.set_healable(false).unwrap();

        assert_eq!(health.increase_current(10.0), Err(Rejection::NotHealable));
        assert_eq!(health.increase_max(10.0), Err(Rejection::NotHealable));
        assert_eq!(health.increase_base(10.0), Err(Rejection::NotHealable));
        assert_eq!(health.set_base(10.0), Err(Rejection::NotHealable));

        // Damage still applies.
        health.decrease_current(10.0).unwrap();
        assert_eq!(health.current(), 40.0);
    }

    #[test]
    fn increasing_base_raises_max() {
        let mut health = Health::new(NetRole::Authority);
        health.increase_base(25.0).unwrap();
        assert_eq!(health.base(), 125.0);
        assert_eq!(health.max(), 125.0);
        assert_eq!(health.current(), 100.0);
        assert!(!health.is_full());
    }

    #[test]
    fn base_guards() {
        let mut health = Health::new(NetRole::Authority);
        assert_eq!(health.set_base(0.0), Err(Rejection::NonPositive(0.0)));

        health.decrease_base(1000.0).unwrap();
        assert_eq!(health.base(), 0.0);
        assert_eq!(health.increase_base(5.0), Err(Rejection::NonPositive(0.0)));

        health.set_base(80.0).unwrap();
        assert_eq!(health.base(), 80.0);
    }

    #[test]
    fn set_dead_zeroes_current() {
        let mut health = Health::new(NetRole::Authority);
        let count = counted(&mut health);

        health.set_dead(true).unwrap();
        assert_eq!(health.current(), 0.0);
        assert!(health.dead());
        assert_eq!(count.get(), 1);

        // Already dead: nothing to do.
        health.set_dead(true).unwrap();
        assert_eq!(count.get(), 1);

        health.set_current(20.0).unwrap();
        assert!(!health.dead());
    }

    #[test]
    fn percentage_predicates() {
        let mut health = Health::new(NetRole::Authority);
        health.set_current(20.0).unwrap();
        assert!(health.is_below_percentage(0.25));
        assert!(!health.is_above_percentage(0.25));
        assert!(health.is_above_percentage(0.2));
    }

    #[test]
    fn notification_carries_percentage() {
        let mut health = Health::new(NetRole::Authority);
        let last = Rc::new(Cell::new(None));
        let l = last.clone();
        health.subscribe(move |e: &ResourceChanged| l.set(Some(e.percentage)));

        health.set_current(25.0).unwrap();
        assert_eq!(last.get(), Some(0.25));
    }

    #[test]
    fn text_helpers() {
        let mut health = Health::new(NetRole::Authority);
        health.set_current(42.6).unwrap();
        assert_eq!(health.current_text(true), "43");
        assert_eq!(health.current_text(false), "42.6");
        assert_eq!(health.fraction_text(true), "43 / 100");
        assert_eq!(health.base_text(true), "100");
        assert_eq!(health.max_text(false), "100");
    }
}
