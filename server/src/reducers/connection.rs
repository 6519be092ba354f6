//! Connection lifecycle reducers.
//!
//! These reducers handle Player row creation and cleanup for clients as they
//! connect to, and disconnect from, the authoritative module.
//!
//! Behavior
//! - On connect:
//!   - Ensure a `Player` row exists for the caller's identity.
//!   - Despawn any character left behind by an earlier session.
//! - On disconnect:
//!   - Despawn the live character, keeping its last location on the `Player` row.
//!
//! Determinism
//! - Data-layer operations only; no simulation runs here.

use crate::{reducers::leave_world::despawn_character, schema::*, types::DbVec3};
use spacetimedb::{ReducerContext, Table};

/// Fired when a client connects to the module.
///
/// This reducer does not spawn a character. That is handled by `enter_world`.
#[spacetimedb::reducer(client_connected)]
pub fn identity_connected(ctx: &ReducerContext) {
    log::info!("Client connected: {:?}", ctx.sender);

    if let Some(player) = ctx.db.player().identity().find(ctx.sender) {
        if player.character_id.is_some() {
            log::warn!("Despawning dangling character for {:?}", ctx.sender);
            despawn_character(ctx, player);
        }
    } else {
        ctx.db.player().insert(Player {
            identity: ctx.sender,
            character_id: None,
            last_location: DbVec3::ZERO,
        });
    }
}

/// Fired when a client disconnects from the module.
#[spacetimedb::reducer(client_disconnected)]
pub fn identity_disconnected(ctx: &ReducerContext) {
    log::info!("Client disconnected: {:?}", ctx.sender);

    let Some(player) = ctx.db.player().identity().find(ctx.sender) else {
        return;
    };
    if player.character_id.is_some() {
        despawn_character(ctx, player);
    }
}
