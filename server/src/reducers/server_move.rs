use crate::{
    reducers::stamina_tick::StaminaTimers,
    schema::MoveAckRow,
    types::DbNetMove,
    utils::{
        caller_character, character_settings, load_character, log_rejection, save_character,
        LogStopwatch,
    },
};
use shared::NetMove;
use spacetimedb::ReducerContext;

/// Replays one client move on the caller's character.
///
/// Behavior:
/// - Stale or duplicate sequences are logged and ignored.
/// - Delta time and acceleration are clamped, and the sprint bit only counts while the
///   character has stamina.
/// - A sprinting move starts the stamina timer if it is idle.
/// - The result is written to the caller's `move_ack` row; `corrected` is set when the
///   client's reported location is off by more than the error tolerance.
#[spacetimedb::reducer]
pub fn server_move(ctx: &ReducerContext, net_move: DbNetMove) -> Result<(), String> {
    let _sw = LogStopwatch::sampled(ctx, "server_move", 0.001);

    let row = caller_character(ctx)?;
    let mut character = load_character(ctx, &row, character_settings(ctx))?;
    let mut timers = StaminaTimers::new(ctx, row.id);

    let ack = match character.receive_move(&NetMove::from(net_move), &mut timers) {
        Ok(ack) => ack,
        Err(rejection) => {
            log_rejection("server_move", row.id, rejection);
            return Ok(());
        }
    };

    if ack.corrected {
        log::debug!("character {} corrected at move {}", row.id, ack.sequence);
    }

    MoveAckRow::upsert(ctx, row.id, &ack);
    save_character(ctx, row, &character);
    Ok(())
}
