use spacetimedb::*;

use crate::types::DbVec3;

/// Player account data persisted across sessions.
///
/// The live character is created and destroyed on demand. While it is out of the world the
/// player keeps the last known location so a rejoin resumes there.
#[table(name = player, public)]
pub struct Player {
    #[primary_key]
    pub identity: Identity,

    /// Live character id. None if not currently in-world.
    #[index(btree)]
    pub character_id: Option<u64>,

    pub last_location: DbVec3,
}
