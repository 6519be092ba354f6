use crate::{reducers::stamina_tick::clear_stamina_timers, schema::*};
use spacetimedb::ReducerContext;

/// Leave the world: despawn the caller's character and keep where it stood.
#[spacetimedb::reducer]
pub fn leave_world(ctx: &ReducerContext) -> Result<(), String> {
    let Some(player) = ctx.db.player().identity().find(ctx.sender) else {
        return Err("Player not found".into());
    };

    if player.character_id.is_none() {
        return Err("Player is not in world".into());
    }

    despawn_character(ctx, player);
    Ok(())
}

/// Deletes the player's character with its resource, ack and timer rows, then unlinks it.
pub fn despawn_character(ctx: &ReducerContext, mut player: Player) {
    let Some(character_id) = player.character_id.take() else {
        return;
    };

    if let Some(row) = ctx.db.character().id().find(character_id) {
        player.last_location = row.location;
        ctx.db.character().id().delete(character_id);
    }
    ctx.db.health_tbl().character_id().delete(character_id);
    ctx.db.stamina_tbl().character_id().delete(character_id);
    ctx.db.move_ack().character_id().delete(character_id);
    clear_stamina_timers(ctx, character_id);

    log::info!("Character {character_id} left the world");
    ctx.db.player().identity().update(player);
}
