use log::{info, warn};
use shared::{Character, CharacterSettings, NetRole, Outcome, Rejection, ServerMoveState};
use spacetimedb::{log_stopwatch::LogStopwatch as SpacetimeLogStopwatch, ReducerContext};

use crate::{
    reducers::stamina_tick::StaminaTimers,
    schema::{character, gameplay_settings, health_tbl, player, stamina_tbl, CharacterRow},
};

/// Settings from the `gameplay_settings` row, or the built-in defaults if it is missing.
pub fn character_settings(ctx: &ReducerContext) -> CharacterSettings {
    match ctx.db.gameplay_settings().id().find(1) {
        Some(row) => row.to_character_settings(),
        None => {
            warn!("gameplay_settings row missing, using defaults");
            CharacterSettings::default()
        }
    }
}

/// The live character owned by the caller.
pub fn caller_character(ctx: &ReducerContext) -> Result<CharacterRow, String> {
    let Some(player) = ctx.db.player().identity().find(ctx.sender) else {
        return Err("Player not found".into());
    };
    let Some(character_id) = player.character_id else {
        return Err("Player is not in world".into());
    };
    let Some(row) = ctx.db.character().id().find(character_id) else {
        return Err("Character not found".into());
    };
    Ok(row)
}

/// Rebuilds the authoritative character from its rows.
pub fn load_character(
    ctx: &ReducerContext,
    row: &CharacterRow,
    settings: CharacterSettings,
) -> Result<Character, String> {
    let Some(health) = ctx.db.health_tbl().character_id().find(row.id) else {
        return Err(format!("Health not found for character {}", row.id));
    };
    let Some(stamina) = ctx.db.stamina_tbl().character_id().find(row.id) else {
        return Err(format!("Stamina not found for character {}", row.id));
    };

    Ok(Character::from_parts(
        row.id,
        NetRole::Authority,
        settings,
        health.to_health(),
        stamina.to_stamina(settings.stamina),
        row.to_movement(settings.movement),
        ServerMoveState::resume(settings.prediction, row.last_move_sequence),
    ))
}

/// Writes the character back to its rows. Unchanged resource rows are left alone.
pub fn save_character(ctx: &ReducerContext, row: CharacterRow, character: &Character) {
    let id = row.id;
    let last_move_sequence = character.server_moves().last_sequence();
    ctx.db
        .character()
        .id()
        .update(row.with_movement(character.movement(), last_move_sequence));

    if let Some(health) = ctx.db.health_tbl().character_id().find(id) {
        health.store(ctx, character.health());
    }
    if let Some(stamina) = ctx.db.stamina_tbl().character_id().find(id) {
        stamina.store(ctx, character.stamina());
    }
}

/// Gameplay rejections are not reducer errors: the request is dropped and the caller only
/// ever observes the replicated result.
pub fn log_rejection(action: &str, character_id: u64, rejection: Rejection) {
    warn!("`{action}` ignored for character {character_id}: {rejection}");
}

/// Loads the caller's character, applies `action` and saves the result.
///
/// Nothing is written when `action` is rejected.
pub fn with_caller_character<F>(
    ctx: &ReducerContext,
    name: &str,
    action: F,
) -> Result<(), String>
where
    F: FnOnce(&mut Character, &mut StaminaTimers<'_>) -> Outcome,
{
    let row = caller_character(ctx)?;
    let mut character = load_character(ctx, &row, character_settings(ctx))?;
    let mut timers = StaminaTimers::new(ctx, row.id);

    match action(&mut character, &mut timers) {
        Ok(()) => save_character(ctx, row, &character),
        Err(rejection) => log_rejection(name, row.id, rejection),
    }
    Ok(())
}

/// Sampled begin/end logging around a reducer, timed with SpacetimeDB's `log_stopwatch`.
///
/// Sampling draws from `ctx.random`, so the module stays deterministic.
pub struct LogStopwatch {
    stopwatch: Option<SpacetimeLogStopwatch>,
    name: &'static str,
}

impl LogStopwatch {
    pub fn sampled(ctx: &ReducerContext, name: &'static str, sample_rate: f32) -> Self {
        let sampled = sample_rate > 0.0 && ctx.random::<f32>() <= sample_rate;
        if sampled {
            info!("--------- {name} begin ---------");
        }
        Self {
            stopwatch: sampled.then(|| SpacetimeLogStopwatch::new(name)),
            name,
        }
    }
}

impl Drop for LogStopwatch {
    fn drop(&mut self) {
        if let Some(sw) = self.stopwatch.take() {
            sw.end();
            info!("---------- {} end ----------", self.name);
        }
    }
}
