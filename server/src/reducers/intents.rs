//! Sprint and crouch intents.
//!
//! Clients also carry these intents in the compressed flags of every move; the reducers
//! exist so an intent change takes effect (and starts the stamina timer) without waiting
//! for the next move.

use crate::utils::with_caller_character;
use shared::Request;
use spacetimedb::ReducerContext;

/// Ignored while the character has no stamina.
#[spacetimedb::reducer]
pub fn start_sprinting(ctx: &ReducerContext) -> Result<(), String> {
    with_caller_character(ctx, "start_sprinting", |character, timers| {
        character.handle_request(Request::StartSprinting, timers)
    })
}

#[spacetimedb::reducer]
pub fn stop_sprinting(ctx: &ReducerContext) -> Result<(), String> {
    with_caller_character(ctx, "stop_sprinting", |character, timers| {
        character.handle_request(Request::StopSprinting, timers)
    })
}

#[spacetimedb::reducer]
pub fn start_crouching(ctx: &ReducerContext) -> Result<(), String> {
    with_caller_character(ctx, "start_crouching", |character, timers| {
        character.handle_request(Request::StartCrouching, timers)
    })
}

#[spacetimedb::reducer]
pub fn stop_crouching(ctx: &ReducerContext) -> Result<(), String> {
    with_caller_character(ctx, "stop_crouching", |character, timers| {
        character.handle_request(Request::StopCrouching, timers)
    })
}
