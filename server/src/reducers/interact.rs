use crate::{
    schema::*,
    types::DbVec3,
    utils::{caller_character, character_settings, load_character, log_rejection},
};
use nalgebra::Vector3;
use shared::{
    rpc::RequestQueue, Character, Door, NetRole, Outcome, Rejection, Request, TimerManager,
};
use spacetimedb::{ReducerContext, Table};

/// Interact with a door.
///
/// Behavior:
/// - The client has already traced from its camera and hit `door_id`.
/// - The server re-checks reach from the character's location, using the third-person trace
///   length since it does not know the client's camera.
/// - The door toggles on the server; clients animate the swing from the replicated `is_open`.
#[spacetimedb::reducer]
pub fn interact(ctx: &ReducerContext, door_id: u64) -> Result<(), String> {
    with_door_in_reach(ctx, door_id, "interact", |character, door, swing, outbox| {
        character.interact_with(Some(door), swing, outbox)
    })
}

/// A proxy copy of a door asked the authority to toggle it.
///
/// Same reach check as `interact`; the request goes straight to the door.
#[spacetimedb::reducer]
pub fn toggle_door(ctx: &ReducerContext, door_id: u64) -> Result<(), String> {
    with_door_in_reach(ctx, door_id, "toggle_door", |_, door, swing, outbox| {
        door.handle_request(
            Request::ToggleDoor { door: door_id },
            NetRole::Authority,
            swing,
            outbox,
        )
    })
}

fn with_door_in_reach<F>(
    ctx: &ReducerContext,
    door_id: u64,
    name: &str,
    action: F,
) -> Result<(), String>
where
    F: FnOnce(&Character, &mut Door, &mut TimerManager, &mut RequestQueue) -> Outcome,
{
    let row = caller_character(ctx)?;
    let settings = character_settings(ctx);
    let character = load_character(ctx, &row, settings)?;

    let Some(door_row) = ctx.db.door().id().find(door_id) else {
        return Err(format!("Door {door_id} not found"));
    };

    let distance = (Vector3::from(door_row.location) - character.movement().location()).norm();
    let reach = settings.camera_distance + settings.base_interact_distance;
    if distance > reach {
        log_rejection(name, row.id, Rejection::OutOfReach(distance));
        return Ok(());
    }

    let mut door = door_row.to_door();
    // The swing is client-side; these only absorb what the authority toggle would arm.
    let mut swing = TimerManager::new();
    let mut outbox = RequestQueue::new();
    if let Err(rejection) = action(&character, &mut door, &mut swing, &mut outbox) {
        log_rejection(name, row.id, rejection);
        return Ok(());
    }

    ctx.db.door().id().update(DoorRow {
        is_open: door.is_open(),
        ..door_row
    });
    Ok(())
}

/// Places a closed door. Any player may build.
#[spacetimedb::reducer]
pub fn spawn_door(ctx: &ReducerContext, location: DbVec3) -> Result<(), String> {
    if ctx.db.player().identity().find(ctx.sender).is_none() {
        return Err("Player not found".into());
    }

    let door = ctx.db.door().insert(DoorRow {
        id: 0,
        location,
        is_open: false,
    });
    log::info!("Door {} spawned at {:?}", door.id, location);
    Ok(())
}
