//! Stamina drain/regen timer.
//!
//! Each character with an active stamina timer owns one row in `stamina_tick_timer`. The row
//! id is the `TimerHandle` the shared stamina logic holds, so starting, re-arming and stopping
//! the timer from gameplay code maps directly onto inserting, updating and deleting the row.
//!
//! Behavior
//! - `stamina_tick_reducer` rebuilds the character, runs one stamina tick and saves it.
//! - The tick itself decides whether to drain, regenerate, force the sprint off or stop the
//!   timer once stamina is full and the character is resting.
//! - A row whose character no longer exists is deleted.

use std::time::Duration;

use shared::{TimerHandle, TimerService};
use spacetimedb::{ReducerContext, ScheduleAt, Table};

use crate::{
    schema::character,
    utils::{character_settings, load_character, log_rejection, save_character},
};

#[spacetimedb::table(name = stamina_tick_timer, scheduled(stamina_tick_reducer))]
pub struct StaminaTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
    #[index(btree)]
    pub character_id: u64,
}

/// [`TimerService`] backed by `stamina_tick_timer` rows for one character.
pub struct StaminaTimers<'a> {
    ctx: &'a ReducerContext,
    character_id: u64,
}

impl<'a> StaminaTimers<'a> {
    pub fn new(ctx: &'a ReducerContext, character_id: u64) -> Self {
        Self { ctx, character_id }
    }
}

impl TimerService for StaminaTimers<'_> {
    fn start_repeating(&mut self, handle: Option<TimerHandle>, interval: Duration) -> TimerHandle {
        let timers = self.ctx.db.stamina_tick_timer();
        let scheduled_at: ScheduleAt = interval.into();

        if let Some(row) = handle.and_then(|h| timers.scheduled_id().find(h.0)) {
            let id = row.scheduled_id;
            timers.scheduled_id().update(StaminaTickTimer {
                scheduled_at,
                ..row
            });
            return TimerHandle(id);
        }

        let row = timers.insert(StaminaTickTimer {
            scheduled_id: 0,
            scheduled_at,
            character_id: self.character_id,
        });
        log::debug!(
            "stamina timer {} started for character {}",
            row.scheduled_id,
            self.character_id
        );
        TimerHandle(row.scheduled_id)
    }

    fn stop(&mut self, handle: TimerHandle) {
        if self.ctx.db.stamina_tick_timer().scheduled_id().delete(handle.0) {
            log::debug!(
                "stamina timer {} stopped for character {}",
                handle.0,
                self.character_id
            );
        }
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.ctx
            .db
            .stamina_tick_timer()
            .scheduled_id()
            .find(handle.0)
            .is_some()
    }
}

/// Deletes every stamina timer row belonging to `character_id`.
pub fn clear_stamina_timers(ctx: &ReducerContext, character_id: u64) {
    let ids: Vec<u64> = ctx
        .db
        .stamina_tick_timer()
        .character_id()
        .filter(character_id)
        .map(|t| t.scheduled_id)
        .collect();
    for id in ids {
        ctx.db.stamina_tick_timer().scheduled_id().delete(id);
    }
}

#[spacetimedb::reducer]
pub fn stamina_tick_reducer(ctx: &ReducerContext, timer: StaminaTickTimer) -> Result<(), String> {
    // Only the server (module identity) may invoke scheduled reducers.
    if ctx.sender != ctx.identity() {
        return Err("`stamina_tick_reducer` may not be invoked by clients.".into());
    }

    let Some(row) = ctx.db.character().id().find(timer.character_id) else {
        log::warn!(
            "stamina timer {} has no character {}, removing",
            timer.scheduled_id,
            timer.character_id
        );
        ctx.db
            .stamina_tick_timer()
            .scheduled_id()
            .delete(timer.scheduled_id);
        return Ok(());
    };

    let mut character = load_character(ctx, &row, character_settings(ctx))?;
    let mut timers = StaminaTimers::new(ctx, row.id);
    match character.on_stamina_timer(&mut timers) {
        Ok(tick) => {
            log::trace!("character {} stamina tick: {tick:?}", row.id);
            save_character(ctx, row, &character);
        }
        Err(rejection) => log_rejection("stamina_tick_reducer", row.id, rejection),
    }
    Ok(())
}
