use crate::{
    types::{DbHealthOp, DbStaminaOp},
    utils::with_caller_character,
};
use shared::Request;
use spacetimedb::ReducerContext;

/// Applies a health operation to the caller's character.
///
/// Invalid amounts and heals on a non-healable character are ignored and leave the row
/// untouched. Accepted changes reach subscribers through `health_tbl`.
#[spacetimedb::reducer]
pub fn health_request(ctx: &ReducerContext, op: DbHealthOp) -> Result<(), String> {
    log::debug!("health_request {op:?} from {:?}", ctx.sender);
    with_caller_character(ctx, "health_request", |character, timers| {
        character.handle_request(Request::Health(op.into()), timers)
    })
}

/// Applies a stamina operation to the caller's character.
#[spacetimedb::reducer]
pub fn stamina_request(ctx: &ReducerContext, op: DbStaminaOp) -> Result<(), String> {
    log::debug!("stamina_request {op:?} from {:?}", ctx.sender);
    with_caller_character(ctx, "stamina_request", |character, timers| {
        character.handle_request(Request::Stamina(op.into()), timers)
    })
}
