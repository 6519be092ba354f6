use shared::MoveAck;
use spacetimedb::*;

use crate::types::DbMoveState;

/// The latest acknowledgment for each character's client moves.
///
/// One row per character, overwritten by every processed move. The owning client
/// subscribes to its own row and reconciles when `corrected` is set.
#[table(name = move_ack, public)]
#[derive(Debug, Clone)]
pub struct MoveAckRow {
    #[primary_key]
    pub character_id: u64,
    pub sequence: u32,
    pub corrected: bool,
    pub state: DbMoveState,
}

impl MoveAckRow {
    pub fn upsert(ctx: &ReducerContext, character_id: u64, ack: &MoveAck) {
        let row = MoveAckRow {
            character_id,
            sequence: ack.sequence,
            corrected: ack.corrected,
            state: ack.state.into(),
        };
        if ctx.db.move_ack().character_id().find(character_id).is_some() {
            ctx.db.move_ack().character_id().update(row);
        } else {
            ctx.db.move_ack().insert(row);
        }
    }
}
