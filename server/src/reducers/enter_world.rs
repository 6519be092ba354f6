use crate::{schema::*, utils::character_settings};
use shared::{Health, NetRole, Stamina};
use spacetimedb::{ReducerContext, Table};

/// Enter the world: spawn the caller's character at their last known location.
///
/// Behavior:
/// - Validates a Player row exists for the caller.
/// - Rejects if the caller already has a live character.
/// - Inserts the character row plus full health and stamina rows.
/// - Sets `player.character_id = Some(character.id)`.
///
/// Determinism:
/// - Spawn state comes from the Player row and gameplay settings only.
#[spacetimedb::reducer]
pub fn enter_world(ctx: &ReducerContext) -> Result<(), String> {
    let Some(mut player) = ctx.db.player().identity().find(ctx.sender) else {
        return Err("No player found!".into());
    };

    if player.character_id.is_some() {
        return Err("Player is already in world".into());
    }

    let settings = character_settings(ctx);
    let character = ctx.db.character().insert(CharacterRow::spawn(
        player.identity,
        player.last_location,
        &settings.movement,
    ));
    HealthRow::insert(ctx, character.id, &Health::new(NetRole::Authority));
    StaminaRow::insert(
        ctx,
        character.id,
        &Stamina::new(NetRole::Authority, settings.stamina),
    );

    log::info!("Character {} entered the world for {:?}", character.id, ctx.sender);

    player.character_id = Some(character.id);
    ctx.db.player().identity().update(player);
    Ok(())
}
