mod reducers {
    mod connection;
    pub mod enter_world;
    pub mod interact;
    pub mod intents;
    pub mod leave_world;
    pub mod resource_request;
    pub mod server_move;
    pub(crate) mod stamina_tick;
}
pub mod schema;
pub mod types;
mod utils;

use crate::schema::*;
use shared::CharacterSettings;
use spacetimedb::*;

#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    ctx.db.gameplay_settings().id().delete(1);
    ctx.db
        .gameplay_settings()
        .insert(GameplaySettings::from_character_settings(1, &CharacterSettings::default()));
    log::info!("Gameplay settings seeded");
}
